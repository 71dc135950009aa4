//! Benchmark suite for bundle loading
//!
//! Measures the stored ZIP index, the loader that matches entries to parts,
//! and the first-repeat texture decode.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench bundle_load

use std::{fs, hint::black_box};

use bootanim_benches::{generate_bundle, generate_frame, sizes};
use bootanim_player::{Loader, texture::TextureImage};
use bootanim_types::file::Archive;
use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn bench_archive_index(c: &mut Criterion) {
	let mut group = c.benchmark_group("archive_index");

	for (name, (parts, frames)) in [("small", sizes::SMALL), ("typical", sizes::TYPICAL), ("large", sizes::LARGE)] {
		let data = Bytes::from(generate_bundle(64, 64, parts, frames));
		group.throughput(Throughput::Elements((parts * frames) as u64));
		group.bench_with_input(BenchmarkId::new("open", name), &data, |b, data| {
			b.iter(|| black_box(Archive::from_bytes(black_box(data.clone()))));
		});
	}

	group.finish();
}

fn bench_loader(c: &mut Criterion) {
	let mut group = c.benchmark_group("loader");
	let dir = std::env::temp_dir().join(format!("bootanim-bench-{}", std::process::id()));
	if fs::create_dir_all(&dir).is_err() {
		eprintln!("Warning: cannot create {}", dir.display());
		return;
	}

	for (name, (parts, frames)) in [("small", sizes::SMALL), ("typical", sizes::TYPICAL)] {
		let path = dir.join(format!("{name}.zip"));
		if fs::write(&path, generate_bundle(64, 64, parts, frames)).is_err() {
			eprintln!("Warning: cannot write {}", path.display());
			continue;
		}
		group.bench_with_input(BenchmarkId::new("load", name), &path, |b, path| {
			b.iter(|| black_box(Loader::new(dir.join("system.zip")).load(path)));
		});
	}

	group.finish();
	let _ = fs::remove_dir_all(&dir);
}

fn bench_texture_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("texture_decode");

	for (w, h) in [(64u32, 64u32), (480, 800), (1080, 1920)] {
		let png = generate_frame(w, h, 0x40);
		group.throughput(Throughput::Elements(u64::from(w) * u64::from(h)));
		group.bench_with_input(BenchmarkId::new("npot", format!("{w}x{h}")), &png, |b, png| {
			b.iter(|| black_box(TextureImage::decode(black_box(png), true)));
		});
		group.bench_with_input(BenchmarkId::new("pot", format!("{w}x{h}")), &png, |b, png| {
			b.iter(|| black_box(TextureImage::decode(black_box(png), false)));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_archive_index, bench_loader, bench_texture_decode);
criterion_main!(benches);
