use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tool_catalog::codec::{to_storage, to_wire};
use tool_catalog::models::{WireImage, WireItem};

fn sample_item() -> WireItem {
    // 64KiB 程度の擬似画像 (乱数を使わず決定的に生成)
    let bytes: Vec<u8> = (0..65_536u32).map(|i| (i * 31 % 251) as u8).collect();
    use base64::Engine;
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
    WireItem {
        image: Some(WireImage {
            data: Some(format!("data:image/png;base64,{payload}").into()),
            type_file: Some("image/png".to_string()),
        }),
        fields: Default::default(),
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let item = sample_item();
    let stored = to_storage(&item).unwrap();
    c.bench_function("to_storage 64KiB", |b| b.iter(|| to_storage(black_box(&item)).unwrap()));
    c.bench_function("to_wire 64KiB", |b| b.iter(|| to_wire(black_box(&stored))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
