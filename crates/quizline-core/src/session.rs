//! Per-attempt session state.
//!
//! Answers are stored as displayed slots, not option indices. Each question
//! keeps the slot permutation it was first shown with, and scoring resolves
//! the slot through that permutation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::model::{Candidate, Question, OPTION_COUNT};
use crate::statistics::SessionTally;

/// Displayed slot -> original option index.
pub type SlotMapping = [usize; OPTION_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    InProgress,
    Completed,
}

/// One question within a session, with everything recorded about it.
#[derive(Debug, Clone)]
pub struct SessionItem {
    pub question: Question,
    /// Stable id from subject and prompt.
    pub id: String,
    /// Content digest at session start.
    pub digest: String,
    /// Whether the persisted digest differed when the session started.
    pub changed_since_last_seen: bool,
    pub(crate) mapping: Option<SlotMapping>,
    pub(crate) selected: Option<usize>,
}

impl SessionItem {
    pub fn mapping(&self) -> Option<&SlotMapping> {
        self.mapping.as_ref()
    }

    /// The chosen slot, in displayed coordinates.
    pub fn selected_slot(&self) -> Option<usize> {
        self.selected
    }

    /// Original option index of the chosen slot, if answered and mapped.
    pub fn resolved_answer(&self) -> Option<usize> {
        let slot = self.selected?;
        self.mapping?.get(slot).copied()
    }

    pub fn is_correct(&self) -> bool {
        self.resolved_answer() == Some(self.question.correct_index())
    }

    /// Text of the chosen option, if any.
    pub fn answer_text(&self) -> Option<&str> {
        self.resolved_answer()
            .map(|i| self.question.options()[i].as_str())
    }

    /// Options in displayed order. `None` until the question is presented.
    pub fn displayed_options(&self) -> Option<[&str; OPTION_COUNT]> {
        let mapping = self.mapping?;
        Some(mapping.map(|i| self.question.options()[i].as_str()))
    }
}

/// Outcome written at finalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub subject: String,
    pub tally: SessionTally,
    /// False if the version ledger could not be rewritten.
    pub versions_persisted: bool,
}

/// Mutable state for one attempt. Owned by the caller and passed explicitly
/// to every [`SessionEngine`](crate::engine::SessionEngine) operation.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) id: Uuid,
    pub(crate) candidate: Candidate,
    pub(crate) subject: String,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) items: Vec<SessionItem>,
    pub(crate) current: usize,
    pub(crate) score: usize,
    pub(crate) time_left: u32,
    pub(crate) timed_question: Option<usize>,
    pub(crate) phase: SessionPhase,
    pub(crate) summary: Option<SessionSummary>,
}

impl SessionState {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn items(&self) -> &[SessionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Running score, as of the last recomputation.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Seconds remaining on the current question.
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    /// Present once the session has been finalized.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }
}

/// Count of questions whose selected slot resolves to the correct option.
/// Unanswered or unmapped questions never count.
pub fn recompute_score(state: &SessionState) -> usize {
    state.items.iter().filter(|item| item.is_correct()).count()
}

/// Correct/incorrect counts derived from the recorded answers.
pub fn tally(state: &SessionState) -> SessionTally {
    let correct = recompute_score(state);
    SessionTally {
        correct,
        incorrect: state.items.len() - correct,
    }
}

/// What the user sees for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    /// Option texts in displayed order.
    pub options: [String; OPTION_COUNT],
    /// Previously chosen slot, restored on revisit.
    pub selected: Option<usize>,
    pub time_left: u32,
    pub changed_since_last_seen: bool,
}

impl Presentation {
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }

    /// Rounded percentage of the way through the session.
    pub fn progress_percent(&self) -> usize {
        ((self.index + 1) * 100 + self.total / 2) / self.total.max(1)
    }
}
