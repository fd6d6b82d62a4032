use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Highest mastery level a card can reach.
pub const MAX_LEVEL: u8 = 3;

/// Version tag written into every persisted progress blob.
pub const PROGRESS_VERSION: u32 = 1;

/// `verb::pronoun`, stable across deck rebuilds.
pub type CardId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pronoun {
    #[serde(rename = "je")]
    Je,
    #[serde(rename = "tu")]
    Tu,
    #[serde(rename = "il/elle")]
    IlElle,
    #[serde(rename = "nous")]
    Nous,
    #[serde(rename = "vous")]
    Vous,
    #[serde(rename = "ils/elles")]
    IlsElles,
}

impl Pronoun {
    pub fn as_str(self) -> &'static str {
        match self {
            Pronoun::Je => "je",
            Pronoun::Tu => "tu",
            Pronoun::IlElle => "il/elle",
            Pronoun::Nous => "nous",
            Pronoun::Vous => "vous",
            Pronoun::IlsElles => "ils/elles",
        }
    }

    /// Subject written in the expected answer. The two mixed categories use
    /// the masculine form.
    pub fn reference_subject(self) -> &'static str {
        match self {
            Pronoun::IlElle => "il",
            Pronoun::IlsElles => "ils",
            other => other.as_str(),
        }
    }

    /// Regular present-tense ending for -er verbs.
    pub fn er_ending(self) -> &'static str {
        match self {
            Pronoun::Je | Pronoun::IlElle => "e",
            Pronoun::Tu => "es",
            Pronoun::Nous => "ons",
            Pronoun::Vous => "ez",
            Pronoun::IlsElles => "ent",
        }
    }
}

impl fmt::Display for Pronoun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub verb: String,
    pub pronoun: Pronoun,
    /// Full expected answer including the subject, e.g. `j'aime`.
    pub answer: String,
}

impl Card {
    pub fn card_id(verb: &str, pronoun: Pronoun) -> CardId {
        format!("{}::{}", verb, pronoun.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardStats {
    pub level: u8,
    pub seen: u32,
    pub correct: u32,
    pub wrong: u32,
    pub streak_correct: u32,
    pub streak_wrong: u32,
}

impl CardStats {
    pub fn is_mastered(&self) -> bool {
        self.level >= MAX_LEVEL
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStore {
    pub version: u32,
    #[serde(default)]
    pub cards: BTreeMap<CardId, CardStats>,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self {
            version: PROGRESS_VERSION,
            cards: BTreeMap::new(),
        }
    }
}

impl ProgressStore {
    pub fn stats(&self, id: &str) -> CardStats {
        self.cards.get(id).copied().unwrap_or_default()
    }

    /// Repairs statistics that break the store invariants after loading
    /// external data. `None` if a card's counts cannot be represented.
    pub fn sanitized(mut self) -> Option<Self> {
        for stats in self.cards.values_mut() {
            stats.level = stats.level.min(MAX_LEVEL);
            stats.seen = stats.correct.checked_add(stats.wrong)?;
        }
        Some(self)
    }
}

/// Difficulty preset chosen manually by the learner.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Stage {
    pub label: &'static str,
    pub pronouns: &'static [Pronoun],
    pub hints: bool,
    pub ignore_accents: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub ticket: Uuid,
    pub correct: bool,
    pub user_input: String,
    pub expected: String,
    pub explanation: Option<String>,
}
