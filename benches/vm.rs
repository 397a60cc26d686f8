//! Benchmarks for the bytecode compiler and the VM dispatch loop.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jolt::ast::Program;
use jolt::bytecode::{Compiler, Vm};
use jolt::lexer::Scanner;
use jolt::parser::Parser;

const PROGRAMS: &[(&str, &str)] = &[
    ("arithmetic", "1 + 2 * 3 - 4 / 5 % 6;"),
    ("strings", "\"a\" + \"b\" + \"c\" + 1 + 2.5;"),
    ("variables", "var a = 1, b = 2; var c = a + b; c * c;"),
    ("coercions", "1 + \"2\"; null + 1; true + 1; undefined + 1;"),
];

/// Parse source into an AST.
fn parse(source: &str) -> Program {
    let tokens = Scanner::new(source).scan_tokens().expect("lexer error");
    Parser::new(tokens).parse().expect("parser error")
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for (name, source) in PROGRAMS {
        let program = parse(source);
        group.bench_with_input(BenchmarkId::from_parameter(name), &program, |b, program| {
            b.iter(|| {
                let mut compiler = Compiler::new();
                black_box(compiler.compile(program).expect("compile error"))
            })
        });
    }
    group.finish();
}

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");
    for (name, source) in PROGRAMS {
        let program = parse(source);
        let chunk = Compiler::new().compile(&program).expect("compile error");
        group.bench_with_input(BenchmarkId::from_parameter(name), &chunk, |b, chunk| {
            let mut vm = Vm::new();
            b.iter(|| vm.run(black_box(chunk)).expect("runtime error"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile, bench_execute);
criterion_main!(benches);
