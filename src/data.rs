use crate::models::{Pronoun, Stage};

pub struct VerbEntry {
    pub key: &'static str,
    pub gloss: &'static str,
}

// Regular -er verbs only. -ger and -cer keep their nous spelling rules.
pub const VERB_BANK: &[VerbEntry] = &[
    VerbEntry { key: "parler", gloss: "to speak" },
    VerbEntry { key: "aimer", gloss: "to like / to love" },
    VerbEntry { key: "regarder", gloss: "to watch" },
    VerbEntry { key: "travailler", gloss: "to work" },
    VerbEntry { key: "écouter", gloss: "to listen" },
    VerbEntry { key: "habiter", gloss: "to live" },
    VerbEntry { key: "jouer", gloss: "to play" },
    VerbEntry { key: "marcher", gloss: "to walk" },
    VerbEntry { key: "chercher", gloss: "to look for" },
    VerbEntry { key: "arriver", gloss: "to arrive" },
    VerbEntry { key: "chanter", gloss: "to sing" },
    VerbEntry { key: "étudier", gloss: "to study" },
    VerbEntry { key: "penser", gloss: "to think" },
    VerbEntry { key: "porter", gloss: "to carry" },
    VerbEntry { key: "visiter", gloss: "to visit" },
    VerbEntry { key: "danser", gloss: "to dance" },
    VerbEntry { key: "manger", gloss: "to eat" },
    VerbEntry { key: "commencer", gloss: "to begin" },
];

pub const DEFAULT_ENABLED_VERBS: usize = 8;

pub const ALL_PRONOUNS: &[Pronoun] = &[
    Pronoun::Je,
    Pronoun::Tu,
    Pronoun::IlElle,
    Pronoun::Nous,
    Pronoun::Vous,
    Pronoun::IlsElles,
];

pub const STAGES: &[Stage] = &[
    Stage {
        label: "Easy start",
        pronouns: &[Pronoun::Je, Pronoun::Tu],
        hints: true,
        ignore_accents: true,
    },
    Stage {
        label: "+ il/elle",
        pronouns: &[Pronoun::Je, Pronoun::Tu, Pronoun::IlElle],
        hints: true,
        ignore_accents: true,
    },
    Stage {
        label: "+ nous, vous",
        pronouns: &[Pronoun::Je, Pronoun::Tu, Pronoun::IlElle, Pronoun::Nous, Pronoun::Vous],
        hints: true,
        ignore_accents: true,
    },
    Stage {
        label: "All pronouns",
        pronouns: ALL_PRONOUNS,
        hints: true,
        ignore_accents: true,
    },
    Stage {
        label: "Pro: accents required, no hints",
        pronouns: ALL_PRONOUNS,
        hints: false,
        ignore_accents: false,
    },
];

pub fn default_enabled_verbs() -> Vec<String> {
    VERB_BANK
        .iter()
        .take(DEFAULT_ENABLED_VERBS)
        .map(|v| v.key.to_string())
        .collect()
}

pub fn is_known_verb(key: &str) -> bool {
    VERB_BANK.iter().any(|v| v.key == key)
}
