//! Queue recomputation cost over a realistic vocabulary size.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tt_core::{Label, Session, TermRecord, TermStore};

const WORDS: [&str; 12] = [
    "neural", "networks", "deep", "learning", "data", "mining", "signal", "processing", "image",
    "graph", "model", "inference",
];

fn records(n: usize) -> Vec<TermRecord> {
    (0..n)
        .map(|i| {
            let a = WORDS[i % WORDS.len()];
            let b = WORDS[(i / WORDS.len() + i) % WORDS.len()];
            TermRecord::new(&format!("{a} {b} {i}"))
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let records = records(5_000);

    c.bench_function("classify_5k_vocabulary", |b| {
        b.iter(|| {
            let store = TermStore::load(&records).unwrap();
            let mut session = Session::new(store, Label::None);
            for _ in 0..20 {
                session.classify(black_box(Label::Keyword)).unwrap();
            }
            session
        })
    });

    c.bench_function("session_resume_5k", |b| {
        let store = TermStore::load(&records).unwrap();
        let mut session = Session::new(store, Label::None);
        session.classify(Label::Keyword).unwrap();
        let snapshot = session.store().records();
        b.iter(|| {
            let store = TermStore::load(black_box(&snapshot)).unwrap();
            Session::new(store, Label::None)
        })
    });
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
