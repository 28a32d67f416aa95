use quizline_core::engine::{SessionConfig, SessionEngine};
use quizline_core::ledger::ScoreLedger;
use quizline_core::model::{Candidate, Question};
use quizline_core::session::SessionState;
use quizline_core::versions::VersionLedger;
use tempfile::TempDir;

fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            let explanation = if i % 2 == 0 {
                format!("Explanation for question {i} (see chapter {})", i + 1)
            } else {
                String::new()
            };
            Question::new(
                "Physics",
                format!("Question {i}: which of the following statements about motion holds?"),
                [
                    "Alpha".into(),
                    "Beta".into(),
                    "Gamma".into(),
                    "Delta".into(),
                ],
                i % 4,
                explanation,
            )
            .unwrap()
        })
        .collect()
}

fn engine(dir: &TempDir) -> SessionEngine {
    SessionEngine::new(
        SessionConfig::default(),
        ScoreLedger::new(dir.path().join("scores.csv")),
        VersionLedger::new(dir.path().join("qversions")),
    )
    .with_seed(11)
}

fn candidate() -> Candidate {
    Candidate::new("42", "Ana", "7A")
}

/// Started session of `n` questions, first question shown.
pub fn in_progress_session(n: usize) -> (TempDir, SessionState) {
    let dir = tempfile::tempdir().unwrap();
    let state = engine(&dir)
        .start(&questions(n), "Physics", candidate())
        .unwrap();
    (dir, state)
}

/// Finished session of `n` questions. Positions in `correct` are answered
/// correctly; the rest are left blank.
pub fn completed_session(n: usize, correct: &[usize]) -> (TempDir, SessionState) {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine(&dir);
    let mut state = engine
        .start(&questions(n), "Physics", candidate())
        .unwrap();
    for i in 0..n {
        if correct.contains(&i) {
            let item = &state.items()[i];
            let answer = item.question.correct_index();
            let slot = item
                .mapping()
                .unwrap()
                .iter()
                .position(|&o| o == answer)
                .unwrap();
            engine.select(&mut state, i, slot).unwrap();
        }
        engine.advance(&mut state).unwrap();
    }
    assert!(state.is_completed());
    (dir, state)
}
