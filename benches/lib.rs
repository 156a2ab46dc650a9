//! # nestrepl 性能基准测试
//!
//! 使用 Criterion.rs 进行性能基准测试。
//!
//! ## 基准测试分组
//! - `history`: 历史记录过滤与保存
//! - `dispatch`: 命令匹配与分发
//!
//! ## 使用方法
//! ```bash
//! cargo bench          # 运行所有
//! cargo bench history  # 只运行历史记录测试
//! ```

use criterion::{criterion_group, criterion_main, Criterion};
use nestrepl::calc::Calculator;
use nestrepl::repl::{CommandRegistry, HistoryStore, ScriptInput, SessionEngine, Value};
use regex::Regex;
use std::hint::black_box;

fn history(lines: usize) -> HistoryStore {
    let mut history = HistoryStore::new();
    for i in 0..lines {
        if i % 3 == 0 {
            history.push(format!("let x{} = {}", i, i));
        } else {
            history.push(format!("x{} + {}", i - i % 3, i));
        }
    }
    history
}

// ============================================================================
// History Benchmarks
// ============================================================================

fn bench_history_grep(c: &mut Criterion) {
    let history = history(10_000);
    let pattern = Regex::new(r"^let x\d+7 ").unwrap();
    c.bench_function("history_grep", |b| b.iter(|| black_box(history.grep(&pattern)).len()));
}

fn bench_history_tail(c: &mut Criterion) {
    let history = history(10_000);
    c.bench_function("history_tail", |b| b.iter(|| black_box(history.tail(100)).len()));
}

fn bench_history_save(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    c.bench_function("history_save_100", |b| {
        b.iter(|| {
            let mut history = history(100);
            history.save(&path).unwrap()
        })
    });
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_find_command(c: &mut Criterion) {
    let registry = CommandRegistry::builtin();
    c.bench_function("find_command", |b| {
        b.iter(|| {
            (
                registry.find(black_box("hist --tail 20")).is_some(),
                registry.find(black_box("amend-line 2..3 x + 1")).is_some(),
                registry.find(black_box("players + 1")).is_some(),
            )
        })
    });
}

fn bench_session_script(c: &mut Criterion) {
    let script = "let x = 1\n(x +\n2)\nshow-input\ncd x\nself * 2\nexit\nhist --tail 3\n".repeat(20);
    c.bench_function("session_script", |b| {
        b.iter(|| {
            let mut engine = SessionEngine::new(
                Calculator::new(),
                Box::new(ScriptInput::new(&script)),
                Box::new(std::io::sink()),
            );
            engine.start(Value::main())
        })
    });
}

// ============================================================================
// Criterion Groups
// ============================================================================

criterion_group!(
    name = history_benches;
    config = Criterion::default().sample_size(50);
    targets = bench_history_grep, bench_history_tail, bench_history_save
);

criterion_group!(
    name = dispatch;
    config = Criterion::default().sample_size(30);
    targets = bench_find_command, bench_session_script
);

criterion_main!(history_benches, dispatch);
