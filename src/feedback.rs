use crate::conjugation::{conjugate, stem};
use crate::models::{Card, Pronoun};
use crate::srs::normalize;

pub struct FeedbackGenerator;

impl FeedbackGenerator {
    /// Explains the most likely cause of a wrong answer, if one is
    /// recognisable.
    pub fn generate_explanation(card: &Card, user_input: &str) -> Option<String> {
        let input = normalize(user_input, false);
        let expected = normalize(&card.answer, false);
        if input.is_empty() || input == expected {
            return None;
        }

        let form = conjugate(&card.verb, card.pronoun);

        if expected.starts_with("j'") && input.starts_with("je ") {
            return Some(format!(
                "Elision: je becomes j' before a vowel or h, so the answer is '{}'.",
                card.answer
            ));
        }
        if expected.starts_with("je ") && input.starts_with("j'") {
            return Some(format!(
                "No elision here: '{}' starts with a consonant, write '{}'.",
                form, card.answer
            ));
        }

        if card.pronoun == Pronoun::Nous {
            let plain = format!("nous {}ons", stem(&card.verb));
            if input == plain && card.verb.ends_with("ger") {
                return Some(format!(
                    "-ger verbs keep the e before -ons to keep the soft g: '{}'.",
                    card.answer
                ));
            }
            if input == plain && card.verb.ends_with("cer") {
                return Some(format!(
                    "-cer verbs take a cedilla before -ons to keep the soft c: '{}'.",
                    card.answer
                ));
            }
        }

        if normalize(&input, true) == normalize(&expected, true) {
            return Some(format!("Watch the accents: '{}'.", card.answer));
        }

        let feminine = match card.pronoun {
            Pronoun::IlElle => Some(("elle ", "il ")),
            Pronoun::IlsElles => Some(("elles ", "ils ")),
            _ => None,
        };
        if let Some((used, reference)) = feminine {
            if input.strip_prefix(used) == expected.strip_prefix(reference) {
                return Some(format!(
                    "Answers use the masculine reference form: '{}'.",
                    card.answer
                ));
            }
        }

        let subject = card.pronoun.reference_subject();
        if input.starts_with(&format!("{} ", subject)) || input.starts_with("j'") {
            return Some(format!(
                "The ending for {} is -{}: '{}'.",
                card.pronoun,
                card.pronoun.er_ending(),
                card.answer
            ));
        }

        None
    }

    pub fn hint(ignore_accents: bool) -> String {
        if ignore_accents {
            "Present tense • accents optional".to_string()
        } else {
            "Present tense • accents required".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::build_deck;

    fn card(verb: &str, pronoun: Pronoun) -> Card {
        build_deck(&[verb], &[pronoun]).remove(0)
    }

    #[test]
    fn test_missing_elision() {
        let msg = FeedbackGenerator::generate_explanation(&card("aimer", Pronoun::Je), "je aime");
        assert!(msg.unwrap().contains("j'aime"));
    }

    #[test]
    fn test_spurious_elision() {
        let msg = FeedbackGenerator::generate_explanation(&card("parler", Pronoun::Je), "j'parle");
        assert!(msg.unwrap().starts_with("No elision"));
    }

    #[test]
    fn test_ger_and_cer_rules() {
        let ger = FeedbackGenerator::generate_explanation(&card("manger", Pronoun::Nous), "nous mangons");
        assert!(ger.unwrap().starts_with("-ger"));

        let cer =
            FeedbackGenerator::generate_explanation(&card("commencer", Pronoun::Nous), "nous commencons");
        assert!(cer.unwrap().starts_with("-cer"));
    }

    #[test]
    fn test_accent_only_difference() {
        let msg = FeedbackGenerator::generate_explanation(&card("écouter", Pronoun::Tu), "tu ecoutes");
        assert!(msg.unwrap().starts_with("Watch the accents"));
    }

    #[test]
    fn test_feminine_subject() {
        let msg = FeedbackGenerator::generate_explanation(&card("parler", Pronoun::IlsElles), "elles parlent");
        assert!(msg.unwrap().contains("masculine"));
    }

    #[test]
    fn test_wrong_ending() {
        let msg = FeedbackGenerator::generate_explanation(&card("parler", Pronoun::Vous), "vous parlons");
        assert!(msg.unwrap().contains("-ez"));
    }

    #[test]
    fn test_unrelated_answer_has_no_explanation() {
        assert!(FeedbackGenerator::generate_explanation(&card("parler", Pronoun::Vous), "bonjour").is_none());
        assert!(FeedbackGenerator::generate_explanation(&card("parler", Pronoun::Vous), "   ").is_none());
    }
}
