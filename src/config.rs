//! アプリケーション設定と定数

use std::path::PathBuf;

/// SQLite ファイルパスの環境変数
pub const ENV_DB_PATH: &str = "CATALOG_DB_PATH";

/// 待ち受けアドレスの環境変数
pub const ENV_BIND_ADDR: &str = "CATALOG_BIND_ADDR";

/// ログ出力ディレクトリの環境変数
pub const ENV_LOG_DIR: &str = "CATALOG_LOG_DIR";

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite データベースファイル
    pub db_path: PathBuf,
    /// HTTP 待ち受けアドレス
    pub bind_addr: String,
    /// ローテーションログの出力先
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("catalog.sqlite"),
            bind_addr: "0.0.0.0:3000".to_string(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// 新しい設定インスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 環境変数から設定を読む (`.env` があれば先に読み込む)。未設定の項目はデフォルト値。
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            db_path: non_empty(ENV_DB_PATH).map(PathBuf::from).unwrap_or(defaults.db_path),
            bind_addr: non_empty(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
            log_dir: non_empty(ENV_LOG_DIR).map(PathBuf::from).unwrap_or(defaults.log_dir),
        }
    }
}
