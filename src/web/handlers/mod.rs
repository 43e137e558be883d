pub mod tools;

pub use tools::{
    create_tool, delete_tool_by_id, delete_tool_by_name, get_tool_by_id, get_tool_by_name,
    list_tools, update_tool_by_id, update_tool_by_name,
};
