//! Criterion benchmarks for the key translation table and key-state tracker.
//!
//! Both run once per local key event on the hot path, so they should stay in
//! the tens-of-nanoseconds range.
//!
//! Run with:
//! ```bash
//! cargo bench --package mirror-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mirror_core::{KeyMapper, KeyStateTracker, LocalButton, LocalKey};

// ── Representative keys for benchmarking ─────────────────────────────────────

/// Common keys plus a few outside the table, so misses are measured too.
const BENCH_KEYS: &[LocalKey] = &[
    LocalKey::KeyA,
    LocalKey::KeyZ,
    LocalKey::Enter,
    LocalKey::Escape,
    LocalKey::Backspace,
    LocalKey::Tab,
    LocalKey::Space,
    LocalKey::ControlLeft,
    LocalKey::ShiftLeft,
    LocalKey::AltLeft,
    LocalKey::Digit1,
    LocalKey::Digit0,
    LocalKey::F1,
    LocalKey::ArrowUp,
    LocalKey::MetaLeft,
    LocalKey::Other(0x1D),
];

// ── Benchmarks: KeySym translation ───────────────────────────────────────────

fn bench_translate_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_x11");

    // The table is scanned linearly; first entry vs last entry vs a miss.
    for key in [LocalKey::KeyA, LocalKey::AltRight, LocalKey::F12] {
        group.bench_with_input(BenchmarkId::new("translate", key), &key, |b, &key| {
            b.iter(|| KeyMapper::translate(black_box(key)))
        });
    }

    group.bench_function("translate_batch_16", |b| {
        b.iter(|| {
            BENCH_KEYS
                .iter()
                .map(|&key| KeyMapper::translate(black_box(key)))
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("translate_button", |b| {
        b.iter(|| KeyMapper::translate_button(black_box(LocalButton::Middle)))
    });

    group.finish();
}

// ── Benchmarks: tracker and combo detection ──────────────────────────────────

fn bench_tracker(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_state");

    group.bench_function("set_get_cycle", |b| {
        let mut tracker = KeyStateTracker::new();
        b.iter(|| {
            tracker.set(black_box(LocalKey::KeyQ), true);
            let pressed = tracker.get(black_box(LocalKey::KeyQ));
            tracker.set(black_box(LocalKey::KeyQ), false);
            pressed
        })
    });

    // ctrl+shift+alt plus three letters held: the worst realistic combo scan.
    let mut held = KeyStateTracker::new();
    for key in [
        LocalKey::ControlLeft,
        LocalKey::ShiftLeft,
        LocalKey::AltLeft,
        LocalKey::KeyA,
        LocalKey::KeyS,
        LocalKey::KeyD,
    ] {
        held.set(key, true);
    }
    group.bench_function("active_combos_six_held", |b| {
        b.iter(|| black_box(&held).active_combos())
    });

    group.finish();
}

criterion_group!(benches, bench_translate_key, bench_tracker);
criterion_main!(benches);
