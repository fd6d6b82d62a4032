use crate::models::CardId;
use serde::Serialize;
use std::collections::VecDeque;
use thiserror::Error;
use uuid::Uuid;

/// Most recent mistakes kept for near-term repetition.
pub const MISTAKE_QUEUE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Practice,
    Review,
    Results,
}

impl Phase {
    /// Phases in which cards are presented and answers accepted.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Practice | Phase::Review)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    Graded { target_reached: bool, wrong_pending: usize },
    Restart { wrong_pending: usize },
    BackToSetup,
}

/// Next phase for `event`. Events that do not apply leave the phase as is.
pub fn transition(phase: Phase, event: SessionEvent) -> Phase {
    match (phase, event) {
        (_, SessionEvent::BackToSetup) => Phase::Setup,
        (Phase::Setup | Phase::Results, SessionEvent::Start) => Phase::Practice,
        (
            Phase::Practice,
            SessionEvent::Graded {
                target_reached: true,
                wrong_pending,
            },
        ) => {
            if wrong_pending > 0 {
                Phase::Review
            } else {
                Phase::Results
            }
        }
        (Phase::Review, SessionEvent::Graded { wrong_pending: 0, .. }) => Phase::Results,
        (Phase::Results, SessionEvent::Restart { wrong_pending }) => {
            if wrong_pending > 0 {
                Phase::Review
            } else {
                Phase::Practice
            }
        }
        (phase, _) => phase,
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot start: empty deck")]
    EmptyDeck,

    #[error("no session in progress")]
    NotInSession,

    #[error("a session is already running")]
    AlreadyRunning,

    #[error("no finished session to restart")]
    NothingToRestart,

    #[error("no card is being presented")]
    NoCurrentCard,

    #[error("the previous answer has not been acknowledged yet")]
    AwaitingAdvance,

    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    #[error("unknown stage: {0}")]
    UnknownStage(usize),

    #[error("invalid session length: {0} (expected 10..=60 in steps of 5)")]
    InvalidSessionLength(u32),
}

/// Bounded forced-repeat list for the practice phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MistakeQueue(VecDeque<CardId>);

impl MistakeQueue {
    /// Moves `id` to the tail and keeps only the newest entries.
    pub fn push(&mut self, id: &str) {
        self.remove(id);
        self.0.push_back(id.to_string());
        while self.0.len() > MISTAKE_QUEUE_LEN {
            self.0.pop_front();
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.0.retain(|queued| queued != id);
    }

    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.0.retain(|queued| keep(queued));
    }

    pub fn head(&self) -> Option<&str> {
        self.0.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Insertion-ordered set of cards missed during the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrongList(Vec<CardId>);

impl WrongList {
    pub fn insert(&mut self, id: &str) {
        if !self.contains(id) {
            self.0.push(id.to_string());
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.0.retain(|listed| listed != id);
    }

    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.0.retain(|listed| keep(listed));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|listed| listed == id)
    }

    pub fn head(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ephemeral per-session counters and mistake bookkeeping.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub correct: u32,
    pub total: u32,
    pub target: u32,
    pub mistakes: MistakeQueue,
    pub wrong: WrongList,
}

impl Session {
    pub fn new(target: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            correct: 0,
            total: 0,
            target,
            mistakes: MistakeQueue::default(),
            wrong: WrongList::default(),
        }
    }

    /// Counts one graded answer and updates the mistake queue and wrong list.
    pub fn record(&mut self, id: &str, correct: bool, phase: Phase) {
        self.total += 1;
        if correct {
            self.correct += 1;
            self.mistakes.remove(id);
            if phase == Phase::Review {
                self.wrong.remove(id);
            }
        } else {
            self.mistakes.push(id);
            self.wrong.insert(id);
        }
    }

    /// Drops queued and listed cards for which `in_deck` is false.
    pub fn forget_missing<F: Fn(&str) -> bool>(&mut self, in_deck: F) {
        self.mistakes.retain(&in_deck);
        self.wrong.retain(&in_deck);
    }

    pub fn target_reached(&self) -> bool {
        self.total >= self.target
    }

    pub fn graded_event(&self) -> SessionEvent {
        SessionEvent::Graded {
            target_reached: self.target_reached(),
            wrong_pending: self.wrong.len(),
        }
    }

    /// Rounded accuracy in percent, 0 before the first attempt.
    pub fn accuracy(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.correct as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}
