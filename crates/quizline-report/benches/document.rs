use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizline_core::engine::{SessionConfig, SessionEngine};
use quizline_core::ledger::ScoreLedger;
use quizline_core::model::{Candidate, Question};
use quizline_core::session::SessionState;
use quizline_core::versions::VersionLedger;
use quizline_report::layout::{explanations_document, review_document, review_sheet, LayoutOptions};
use quizline_report::raster::{render_lines, COLUMNS};

fn completed_session(dir: &std::path::Path, n: usize) -> SessionState {
    let questions: Vec<Question> = (0..n)
        .filter_map(|i| {
            Question::new(
                "Chemistry",
                format!("Question {i}: which element has the listed (approximate) atomic mass?"),
                ["H".into(), "He".into(), "Li".into(), "Be".into()],
                i % 4,
                format!("Worked answer for question {i}."),
            )
        })
        .collect();
    let mut engine = SessionEngine::new(
        SessionConfig::default(),
        ScoreLedger::new(dir.join("scores.csv")),
        VersionLedger::new(dir.join("qversions")),
    )
    .with_seed(5);
    let mut state = engine
        .start(&questions, "Chemistry", Candidate::new("1", "Bench", "X"))
        .unwrap();
    while !state.is_completed() {
        let i = state.current_index();
        engine.select(&mut state, i, i % 4).unwrap();
        engine.advance(&mut state).unwrap();
    }
    state
}

fn bench_serialize(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let options = LayoutOptions::default();
    let mut group = c.benchmark_group("pdf");

    for n in [12, 120] {
        let state = completed_session(dir.path(), n);
        group.bench_function(format!("review_n={n}"), |b| {
            b.iter(|| review_document(black_box(&state), &options).serialize())
        });
        group.bench_function(format!("explanations_n={n}"), |b| {
            b.iter(|| explanations_document(black_box(&state), &options).serialize())
        });
    }

    group.finish();
}

fn bench_raster(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let state = completed_session(dir.path(), 40);
    let sheet = review_sheet(&state, COLUMNS);

    c.bench_function("render_sheet_40", |b| b.iter(|| render_lines(black_box(&sheet))));
}

criterion_group!(benches, bench_serialize, bench_raster);
criterion_main!(benches);
