//! Assessment session engine.
//!
//! Drives one [`SessionState`] through `InProgress -> Completed`: question
//! order and slot permutations, answer recording, the per-question
//! countdown, navigation, and finalization into the ledgers.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use uuid::Uuid;

use crate::error::SessionError;
use crate::fingerprint::{digest, question_id};
use crate::ledger::{ScoreLedger, ScoreRecord};
use crate::model::{Candidate, Question, OPTION_COUNT};
use crate::parser::filter_by_subject;
use crate::session::{
    recompute_score, tally, Presentation, SessionItem, SessionPhase, SessionState,
    SessionSummary, SlotMapping,
};
use crate::versions::VersionLedger;

/// Default countdown per question, in seconds.
pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 60;

/// Configuration for the session engine.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Countdown length for each question.
    pub seconds_per_question: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
        }
    }
}

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time remains on the current question.
    Running { time_left: u32 },
    /// Time ran out; the engine advanced without recording an answer.
    Expired(AdvanceOutcome),
}

/// Result of advancing past the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the next question.
    Moved(Presentation),
    /// The last question was passed and the session was finalized.
    Completed(SessionSummary),
}

/// The session engine.
pub struct SessionEngine {
    config: SessionConfig,
    rng: StdRng,
    scores: ScoreLedger,
    versions: VersionLedger,
}

impl SessionEngine {
    pub fn new(config: SessionConfig, scores: ScoreLedger, versions: VersionLedger) -> Self {
        Self {
            config,
            rng: StdRng::from_os_rng(),
            scores,
            versions,
        }
    }

    /// Use a fixed seed for question order and slot permutations.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start an attempt on `subject`.
    ///
    /// Filters `questions` by subject, shuffles them once, snapshots which
    /// of them changed since they were last seen, and presents the first.
    /// Nothing is written to either ledger here.
    pub fn start(
        &mut self,
        questions: &[Question],
        subject: &str,
        candidate: Candidate,
    ) -> Result<SessionState, SessionError> {
        if let Some(field) = candidate.missing_field() {
            return Err(SessionError::Validation(field));
        }
        let subject = subject.trim();
        let mut selected = filter_by_subject(questions, subject);
        if selected.is_empty() {
            return Err(SessionError::NoQuestionsAvailable(subject.to_string()));
        }
        selected.shuffle(&mut self.rng);

        let known = self.versions.load();
        let items = selected
            .into_iter()
            .map(|question| {
                let id = question_id(&question);
                let digest = digest(&question);
                let changed_since_last_seen = known.was_updated(&id, &digest);
                SessionItem {
                    question,
                    id,
                    digest,
                    changed_since_last_seen,
                    mapping: None,
                    selected: None,
                }
            })
            .collect();

        let mut state = SessionState {
            id: Uuid::new_v4(),
            candidate,
            subject: subject.to_string(),
            started_at: Utc::now(),
            items,
            current: 0,
            score: 0,
            time_left: self.config.seconds_per_question,
            timed_question: None,
            phase: SessionPhase::InProgress,
            summary: None,
        };
        self.present(&mut state, 0)?;

        tracing::info!(
            session = %state.id,
            subject = %state.subject,
            questions = state.len(),
            "session started"
        );
        Ok(state)
    }

    /// Show question `index`, making it current.
    ///
    /// The slot permutation is generated the first time a question is shown
    /// and reused on every later visit. The countdown restarts whenever a
    /// different question is shown.
    pub fn present(
        &mut self,
        state: &mut SessionState,
        index: usize,
    ) -> Result<Presentation, SessionError> {
        ensure_in_progress(state)?;
        let len = state.len();
        let item = state
            .items
            .get_mut(index)
            .ok_or(SessionError::QuestionOutOfRange { index, len })?;

        if item.mapping.is_none() {
            let mut mapping: SlotMapping = std::array::from_fn(|slot| slot);
            mapping.shuffle(&mut self.rng);
            item.mapping = Some(mapping);
        }

        state.current = index;
        if state.timed_question != Some(index) {
            state.timed_question = Some(index);
            state.time_left = self.config.seconds_per_question;
        }

        Ok(presentation(state, index))
    }

    /// Record `slot` (displayed coordinates) as the answer to `index` and
    /// recompute the score. The countdown is not affected.
    pub fn select(
        &self,
        state: &mut SessionState,
        index: usize,
        slot: usize,
    ) -> Result<usize, SessionError> {
        ensure_in_progress(state)?;
        if slot >= OPTION_COUNT {
            return Err(SessionError::InvalidSlot(slot));
        }
        let len = state.len();
        let item = state
            .items
            .get_mut(index)
            .ok_or(SessionError::QuestionOutOfRange { index, len })?;
        if item.mapping.is_none() {
            return Err(SessionError::NotPresented(index));
        }
        item.selected = Some(slot);
        state.score = recompute_score(state);
        Ok(state.score)
    }

    /// One countdown step. At zero the engine advances exactly as if the
    /// user had moved on without choosing.
    pub fn tick(&mut self, state: &mut SessionState) -> Result<TickOutcome, SessionError> {
        ensure_in_progress(state)?;
        state.time_left = state.time_left.saturating_sub(1);
        if state.time_left > 0 {
            return Ok(TickOutcome::Running {
                time_left: state.time_left,
            });
        }
        tracing::debug!(question = state.current, "time expired");
        self.advance(state).map(TickOutcome::Expired)
    }

    /// Move to the next question, or finalize after the last one.
    pub fn advance(&mut self, state: &mut SessionState) -> Result<AdvanceOutcome, SessionError> {
        ensure_in_progress(state)?;
        state.score = recompute_score(state);
        if state.current + 1 < state.len() {
            let next = state.current + 1;
            return self.present(state, next).map(AdvanceOutcome::Moved);
        }
        self.finalize(state).map(AdvanceOutcome::Completed)
    }

    /// Move back one question. Fails with `AtFirstQuestion`, leaving the
    /// state untouched, when already at the start.
    pub fn retreat(&mut self, state: &mut SessionState) -> Result<Presentation, SessionError> {
        ensure_in_progress(state)?;
        if state.current == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        let previous = state.current - 1;
        let shown = self.present(state, previous)?;
        state.score = recompute_score(state);
        Ok(shown)
    }

    /// Terminal transition. Re-derives the totals, appends the score record
    /// and merges this session's digests into the version ledger.
    ///
    /// If the score cannot be written the session stays in progress so the
    /// caller can retry. A version ledger failure is logged and reported in
    /// the summary since it only affects change annotations.
    fn finalize(&mut self, state: &mut SessionState) -> Result<SessionSummary, SessionError> {
        let tally = tally(state);
        let record = ScoreRecord {
            roll: state.candidate.roll.clone(),
            name: state.candidate.name.clone(),
            class: state.candidate.class.clone(),
            subject: state.subject.clone(),
            score: count_u32(tally.correct),
            total: count_u32(tally.total()),
            timestamp: ScoreRecord::now_timestamp(),
        };
        self.scores.add(&record)?;

        let digests = state
            .items
            .iter()
            .map(|item| (item.id.clone(), item.digest.clone()));
        let versions_persisted = match self.versions.merge_and_persist(digests) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(session = %state.id, "question versions not saved: {e}");
                false
            }
        };

        let summary = SessionSummary {
            session_id: state.id,
            subject: state.subject.clone(),
            tally,
            versions_persisted,
        };
        state.score = tally.correct;
        state.phase = SessionPhase::Completed;
        state.timed_question = None;
        state.time_left = 0;
        state.summary = Some(summary.clone());

        tracing::info!(
            session = %state.id,
            score = tally.correct,
            total = tally.total(),
            "session completed"
        );
        Ok(summary)
    }
}

fn ensure_in_progress(state: &SessionState) -> Result<(), SessionError> {
    match state.phase {
        SessionPhase::InProgress => Ok(()),
        SessionPhase::Completed => Err(SessionError::Completed),
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn presentation(state: &SessionState, index: usize) -> Presentation {
    let item = &state.items[index];
    let options = item
        .displayed_options()
        .map(|opts| opts.map(String::from))
        .unwrap_or_default();
    Presentation {
        index,
        total: state.len(),
        prompt: item.question.prompt().to_string(),
        options,
        selected: item.selected,
        time_left: state.time_left,
        changed_since_last_seen: item.changed_since_last_seen,
    }
}
