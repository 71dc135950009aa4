//! Benchmark suite for `desc.txt` parsing
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench desc_parse

use std::hint::black_box;

use bootanim_benches::generate_desc;
use bootanim_types::file::{Description, TrimRect};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn bench_parse_desc(c: &mut Criterion) {
	let mut group = c.benchmark_group("desc_parse");

	for parts in [1usize, 8, 64, 512] {
		let text = generate_desc(1080, 1920, 60, parts);
		group.throughput(Throughput::Bytes(text.len() as u64));
		group.bench_with_input(BenchmarkId::new("parse", parts), &text, |b, text| {
			b.iter(|| black_box(Description::parse(black_box(text))));
		});
	}

	group.finish();
}

fn bench_parse_trim(c: &mut Criterion) {
	c.bench_function("trim_line", |b| {
		b.iter(|| black_box(TrimRect::parse(black_box("1080x1920+12+340"))));
	});
}

criterion_group!(benches, bench_parse_desc, bench_parse_trim);
criterion_main!(benches);
