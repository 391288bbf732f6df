use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use lot_ledger::core::{replay, LotLedger};
use lot_ledger::domain::{EventDraft, Journal};
use lot_ledger::storage::{load_journal_from_path, save_journal_to_path};
use tempfile::tempdir;

/// Alternates two purchases with one smaller sale so inventory never runs dry.
fn build_sample_journal(rounds: usize) -> Journal {
    let mut journal = Journal::new("Benchmark");
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    for idx in 0..rounds {
        let at = start + Duration::minutes((idx * 3) as i64);
        let price = 10.0 + (idx % 50) as f64;
        journal
            .append(EventDraft::purchase(5.0, price, at))
            .expect("append purchase");
        journal
            .append(EventDraft::purchase(3.0, price + 1.0, at + Duration::minutes(1)))
            .expect("append purchase");
        journal
            .append(EventDraft::liquidation(6.5, price + 4.0, at + Duration::minutes(2)))
            .expect("append liquidation");
    }
    journal
}

fn bench_replay(c: &mut Criterion) {
    let journal = build_sample_journal(black_box(3_000));

    c.bench_function("replay_9k_events", |b| {
        b.iter(|| {
            let ordered = journal.list_ordered();
            let state = replay(ordered.iter()).expect("replay");
            black_box(state);
        })
    });

    c.bench_function("ledger_from_journal_9k", |b| {
        b.iter_batched(
            || journal.clone(),
            |journal| black_box(LotLedger::from_journal(journal).expect("ledger")),
            BatchSize::LargeInput,
        )
    });
}

fn bench_journal_io(c: &mut Criterion) {
    let journal = build_sample_journal(black_box(3_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("journal.json");

    c.bench_function("journal_save_9k", |b| {
        b.iter(|| save_journal_to_path(&journal, &file_path).expect("save journal"))
    });

    save_journal_to_path(&journal, &file_path).expect("seed");

    c.bench_function("journal_load_9k", |b| {
        b.iter(|| black_box(load_journal_from_path(&file_path).expect("load journal")))
    });
}

criterion_group!(benches, bench_replay, bench_journal_io);
criterion_main!(benches);
