use crate::data::{self, STAGES};
use crate::db::ProgressSink;
use crate::deck;
use crate::feedback::FeedbackGenerator;
use crate::models::{Card, Feedback, ProgressStore, Pronoun, Stage};
use crate::selector;
use crate::session::{transition, Phase, Session, SessionError, SessionEvent};
use crate::srs;
use crate::timer::AutoAdvance;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

pub type SharedApp = Arc<Mutex<App>>;

pub const DEFAULT_SESSION_LENGTH: u32 = 20;
pub const DEFAULT_AUTO_ADVANCE: Duration = Duration::from_secs(10);

pub fn validate_session_length(length: u32) -> Result<u32, SessionError> {
    if (10..=60).contains(&length) && length % 5 == 0 {
        Ok(length)
    } else {
        Err(SessionError::InvalidSessionLength(length))
    }
}

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub session_length: u32,
    pub auto_advance: Duration,
    pub rng_seed: Option<u64>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            session_length: DEFAULT_SESSION_LENGTH,
            auto_advance: DEFAULT_AUTO_ADVANCE,
            rng_seed: None,
        }
    }
}

/// A card on screen. Each presentation gets its own ticket.
#[derive(Debug, Clone)]
pub struct Presented {
    pub card: Card,
    pub ticket: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub correct: bool,
    pub ticket: Uuid,
    pub phase_changed: bool,
}

impl SubmitOutcome {
    pub fn should_auto_advance(&self) -> bool {
        self.correct && !self.phase_changed
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    pub index: usize,
    pub label: &'static str,
    pub pronouns: &'static [Pronoun],
    pub hints: bool,
    pub ignore_accents: bool,
}

impl StageView {
    pub fn new(index: usize, stage: &Stage) -> Self {
        Self {
            index,
            label: stage.label,
            pronouns: stage.pronouns,
            hints: stage.hints,
            ignore_accents: stage.ignore_accents,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Prompt {
    pub ticket: Uuid,
    pub verb: String,
    pub pronoun: Pronoun,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionProgress {
    pub attempts: u32,
    pub target: u32,
    pub correct: u32,
    pub accuracy: u32,
}

/// Everything the presentation layer needs to render one frame.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub stage: StageView,
    pub prompt: Option<Prompt>,
    pub progress: SessionProgress,
    pub feedback: Option<Feedback>,
    pub pending_mistakes: usize,
    pub wrong_pending: usize,
    pub deck_size: usize,
    pub mastered: usize,
    pub mastery_percent: u32,
    pub auto_advance_armed: bool,
    pub enabled_verbs: Vec<String>,
    pub session_length: u32,
}

pub struct App {
    store: ProgressStore,
    sink: Box<dyn ProgressSink>,
    rng: StdRng,
    enabled_verbs: Vec<String>,
    stage_index: usize,
    session_length: u32,
    deck: Vec<Card>,
    phase: Phase,
    session: Session,
    current: Option<Presented>,
    feedback: Option<Feedback>,
    auto_advance: Option<AutoAdvance>,
    auto_advance_delay: Duration,
}

impl App {
    pub fn new(store: ProgressStore, sink: Box<dyn ProgressSink>, options: AppOptions) -> Self {
        let rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let enabled_verbs = data::default_enabled_verbs();
        let deck = deck::build_deck(&enabled_verbs, STAGES[0].pronouns);

        Self {
            store,
            sink,
            rng,
            enabled_verbs,
            stage_index: 0,
            session_length: options.session_length,
            deck,
            phase: Phase::Setup,
            session: Session::new(options.session_length),
            current: None,
            feedback: None,
            auto_advance: None,
            auto_advance_delay: options.auto_advance,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stage(&self) -> &'static Stage {
        &STAGES[self.stage_index]
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.as_ref().map(|p| &p.card)
    }

    pub fn current_ticket(&self) -> Option<Uuid> {
        self.current.as_ref().map(|p| p.ticket)
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn enabled_verbs(&self) -> &[String] {
        &self.enabled_verbs
    }

    // ---- settings ----

    pub fn set_enabled_verbs(&mut self, verbs: Vec<String>) -> Result<(), SessionError> {
        let mut unique: Vec<String> = Vec::with_capacity(verbs.len());
        for verb in verbs {
            if !data::is_known_verb(&verb) {
                return Err(SessionError::UnknownVerb(verb));
            }
            if !unique.contains(&verb) {
                unique.push(verb);
            }
        }
        self.apply_deck_change(unique, self.stage_index)
    }

    pub fn toggle_verb(&mut self, key: &str, enabled: bool) -> Result<(), SessionError> {
        let mut verbs = self.enabled_verbs.clone();
        if enabled {
            verbs.push(key.to_string());
        } else {
            verbs.retain(|v| v != key);
        }
        self.set_enabled_verbs(verbs)
    }

    pub fn select_all_verbs(&mut self) -> Result<(), SessionError> {
        let all = data::VERB_BANK.iter().map(|v| v.key.to_string()).collect();
        self.apply_deck_change(all, self.stage_index)
    }

    pub fn select_no_verbs(&mut self) -> Result<(), SessionError> {
        self.apply_deck_change(Vec::new(), self.stage_index)
    }

    pub fn set_stage(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= STAGES.len() {
            return Err(SessionError::UnknownStage(index));
        }
        self.apply_deck_change(self.enabled_verbs.clone(), index)
    }

    /// Takes effect from the next session.
    pub fn set_session_length(&mut self, length: u32) -> Result<(), SessionError> {
        self.session_length = validate_session_length(length)?;
        if self.phase == Phase::Setup {
            self.session.target = self.session_length;
        }
        Ok(())
    }

    fn apply_deck_change(&mut self, verbs: Vec<String>, stage_index: usize) -> Result<(), SessionError> {
        let deck = deck::build_deck(&verbs, STAGES[stage_index].pronouns);
        if deck.is_empty() && self.phase.is_active() {
            return Err(SessionError::EmptyDeck);
        }

        self.enabled_verbs = verbs;
        self.stage_index = stage_index;
        self.deck = deck;
        log::debug!(
            "deck rebuilt: {} cards (stage {})",
            self.deck.len(),
            self.stage_index + 1
        );

        if !self.phase.is_active() {
            return Ok(());
        }

        // Cards that left the deck can no longer be asked.
        let deck = &self.deck;
        self.session.forget_missing(|id| deck.iter().any(|c| c.id == id));
        let phase_changed = self.enter(transition(self.phase, self.session.graded_event()));

        let current_gone = self
            .current
            .as_ref()
            .is_some_and(|p| !self.deck.iter().any(|c| c.id == p.card.id));
        if self.feedback.is_none() && (phase_changed || current_gone) {
            self.select_next();
        }
        Ok(())
    }

    // ---- session ----

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase.is_active() {
            return Err(SessionError::AlreadyRunning);
        }
        if self.deck.is_empty() {
            return Err(SessionError::EmptyDeck);
        }

        self.begin_practice();
        let next = transition(self.phase, SessionEvent::Start);
        self.enter(next);
        self.select_next();
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Results {
            return Err(SessionError::NothingToRestart);
        }
        let next = transition(
            self.phase,
            SessionEvent::Restart {
                wrong_pending: self.session.wrong.len(),
            },
        );
        if next == Phase::Practice {
            if self.deck.is_empty() {
                return Err(SessionError::EmptyDeck);
            }
            self.begin_practice();
        }

        self.feedback = None;
        self.enter(next);
        self.select_next();
        Ok(())
    }

    pub fn back_to_setup(&mut self) {
        self.feedback = None;
        self.enter(transition(self.phase, SessionEvent::BackToSetup));
        self.session = Session::new(self.session_length);
        self.current = None;
        self.cancel_auto_advance();
    }

    fn begin_practice(&mut self) {
        self.session = Session::new(self.session_length);
        self.feedback = None;
        log::info!(
            "session {} started: {} cards, target {}",
            self.session.id,
            self.deck.len(),
            self.session.target
        );
    }

    pub fn submit(&mut self, answer: &str) -> Result<SubmitOutcome, SessionError> {
        if !self.phase.is_active() {
            return Err(SessionError::NotInSession);
        }
        if self.feedback.is_some() {
            return Err(SessionError::AwaitingAdvance);
        }
        let Presented { card, ticket } = self.current.clone().ok_or(SessionError::NoCurrentCard)?;

        let before = self.store.stats(&card.id);
        let (correct, after) = srs::grade(&before, answer, &card.answer, self.stage().ignore_accents);
        if after.level != before.level {
            log::debug!("{}: level {} -> {}", card.id, before.level, after.level);
        }
        self.store.cards.insert(card.id.clone(), after);
        self.persist();

        self.session.record(&card.id, correct, self.phase);

        let explanation = if correct {
            None
        } else {
            FeedbackGenerator::generate_explanation(&card, answer)
        };
        self.feedback = Some(Feedback {
            ticket,
            correct,
            user_input: answer.to_string(),
            expected: card.answer,
            explanation,
        });

        let next = transition(self.phase, self.session.graded_event());
        let phase_changed = self.enter(next);

        Ok(SubmitOutcome {
            correct,
            ticket,
            phase_changed,
        })
    }

    /// Moves past the answered card. Only the first call for a given card
    /// instance has an effect.
    pub fn advance(&mut self, ticket: Option<Uuid>) -> bool {
        let Some(feedback) = &self.feedback else {
            return false;
        };
        if ticket.is_some_and(|t| t != feedback.ticket) {
            return false;
        }

        self.feedback = None;
        self.select_next();
        true
    }

    fn select_next(&mut self) {
        self.cancel_auto_advance();
        if !self.phase.is_active() {
            self.current = None;
            return;
        }

        let items = deck::candidates(&self.deck, &self.store);
        let picked = selector::select(
            &items,
            self.phase,
            &self.session.mistakes,
            &self.session.wrong,
            &mut self.rng,
        )
        .map(|c| c.card.clone());

        self.current = picked.map(|card| Presented {
            card,
            ticket: Uuid::new_v4(),
        });
    }

    fn enter(&mut self, next: Phase) -> bool {
        if next == self.phase {
            return false;
        }
        log::info!("phase {:?} -> {:?}", self.phase, next);
        self.cancel_auto_advance();
        self.phase = next;
        if !next.is_active() {
            self.current = None;
        }
        true
    }

    // ---- progress ----

    pub fn reset_progress(&mut self) {
        self.store = ProgressStore::default();
        self.persist();
        log::info!("progress reset");
    }

    fn persist(&self) {
        self.sink.save(&self.store);
    }

    // ---- auto-advance ----

    pub fn auto_advance_delay(&self) -> Duration {
        self.auto_advance_delay
    }

    pub fn arm_auto_advance(&mut self, timer: AutoAdvance) {
        if self.feedback.as_ref().map(|f| f.ticket) != Some(timer.ticket()) {
            timer.cancel();
            return;
        }
        self.cancel_auto_advance();
        self.auto_advance = Some(timer);
    }

    pub fn auto_advance_armed(&self) -> bool {
        self.auto_advance.as_ref().is_some_and(AutoAdvance::is_pending)
    }

    fn cancel_auto_advance(&mut self) {
        if let Some(timer) = self.auto_advance.take() {
            timer.cancel();
        }
    }

    // ---- presentation ----

    pub fn snapshot(&self) -> Snapshot {
        let stage = self.stage();
        let mastered = deck::mastered_count(&self.deck, &self.store);
        let mastery_percent =
            ((mastered as f64 / self.deck.len().max(1) as f64) * 100.0).round() as u32;

        Snapshot {
            phase: self.phase,
            stage: StageView::new(self.stage_index, stage),
            prompt: self.current.as_ref().map(|p| Prompt {
                ticket: p.ticket,
                verb: p.card.verb.clone(),
                pronoun: p.card.pronoun,
                hint: stage
                    .hints
                    .then(|| FeedbackGenerator::hint(stage.ignore_accents)),
            }),
            progress: SessionProgress {
                attempts: self.session.total,
                target: self.session.target,
                correct: self.session.correct,
                accuracy: self.session.accuracy(),
            },
            feedback: self.feedback.clone(),
            pending_mistakes: self.session.mistakes.len(),
            wrong_pending: self.session.wrong.len(),
            deck_size: self.deck.len(),
            mastered,
            mastery_percent,
            auto_advance_armed: self.auto_advance_armed(),
            enabled_verbs: self.enabled_verbs.clone(),
            session_length: self.session_length,
        }
    }
}


#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
