//! Benchmark for compiling a directory of contracts end to end.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use evmaot_common::utils::{io::file::write_file, strings::encode_hex};
use evmaot_compiler::{compile, CompilerArgsBuilder};
use tokio::runtime::Runtime;

/// Writes `count` contracts of `blocks` dispatcher-like blocks each and returns the directory.
fn contracts(count: usize, blocks: usize) -> String {
    let dir = std::env::temp_dir().join("evmaot-bench-compile").join(format!("{count}x{blocks}"));
    let _ = std::fs::remove_dir_all(&dir);

    let mut code = Vec::with_capacity(blocks * 16);
    for _ in 0..blocks {
        let next = (code.len() + 12) as u16;
        code.extend_from_slice(&[0x60, 0x01, 0x80, 0x14, 0x61]);
        code.extend_from_slice(&next.to_be_bytes());
        code.extend_from_slice(&[0x57, 0x60, 0x00, 0x54, 0x50, 0x5b]);
    }
    code.push(0x00);
    let hex = encode_hex(&code);

    for i in 0..count {
        let name = format!("{:040x}", i + 1);
        write_file(&dir.join(name).to_string_lossy(), &hex).expect("failed to write contract");
    }
    dir.to_string_lossy().to_string()
}

fn test_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("evmaot_compiler");
    let input_dir = contracts(32, 500);

    for threads in [1usize, 4] {
        group.sample_size(20);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, threads| {
            b.to_async::<Runtime>(Runtime::new().expect("failed to start runtime")).iter(|| async {
                let args = CompilerArgsBuilder::new()
                    .input_dir(input_dir.clone())
                    .threads(Some(*threads))
                    .build()
                    .expect("failed to build CompilerArgs");
                compile(args).await.expect("failed to compile")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, test_compile);
criterion_main!(benches);
