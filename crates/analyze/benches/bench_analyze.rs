//! Benchmark for the bytecode analyzer on a large synthetic contract.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use evmaot_analyzer::analyze;
use evmaot_vm::core::revision::Revision;

/// Builds `n` dispatcher-like blocks: compare, conditional jump to the next JUMPDEST, and a few
/// arithmetic and storage opcodes in between.
fn synthetic_contract(n: usize) -> Vec<u8> {
    let mut code = Vec::with_capacity(n * 16);
    for _ in 0..n {
        let next = (code.len() + 12) as u16;
        code.extend_from_slice(&[0x60, 0x01, 0x80, 0x14]); // PUSH1 1, DUP1, EQ
        code.push(0x61); // PUSH2 <next>
        code.extend_from_slice(&next.to_be_bytes());
        code.push(0x57); // JUMPI
        code.extend_from_slice(&[0x60, 0x00, 0x54, 0x50]); // PUSH1 0, SLOAD, POP
        code.push(0x5b); // JUMPDEST
    }
    code.push(0x00);
    code
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("evmaot_analyzer");
    let code = synthetic_contract(2_000);

    group.sample_size(100);
    group.bench_function(BenchmarkId::from_parameter("synthetic_2000_blocks"), |b| {
        b.iter(|| analyze(Revision::latest(), &code))
    });

    group.finish();
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
