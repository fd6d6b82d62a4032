//! Present tense of regular -er verbs.
//!
//! The stem is the infinitive minus `-er`. Two spelling rules apply to the
//! `nous` form only: `-ger` verbs keep an `e` before `-ons` and `-cer` verbs
//! take a cedilla.

use crate::models::Pronoun;

const ELISION_INITIALS: &str = "aeiouhâêîôûéèëïüœæàù";

/// Drops the last `n` characters (n >= 1), respecting char boundaries.
fn drop_last_chars(s: &str, n: usize) -> &str {
    let end = s
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &s[..end]
}

pub fn stem(verb: &str) -> &str {
    drop_last_chars(verb, 2)
}

pub fn conjugate(verb: &str, pronoun: Pronoun) -> String {
    let stem = stem(verb);
    if pronoun == Pronoun::Nous {
        if verb.ends_with("ger") {
            return format!("{}eons", stem);
        }
        if verb.ends_with("cer") {
            return format!("{}çons", drop_last_chars(stem, 1));
        }
    }
    format!("{}{}", stem, pronoun.er_ending())
}

pub fn starts_with_vowel_or_h(s: &str) -> bool {
    s.chars()
        .next()
        .and_then(|c| c.to_lowercase().next())
        .is_some_and(|c| ELISION_INITIALS.contains(c))
}

/// Expected answer with its subject, e.g. `j'aime` or `ils parlent`.
pub fn full_answer(verb: &str, pronoun: Pronoun) -> String {
    let form = conjugate(verb, pronoun);
    let subject = pronoun.reference_subject();
    if pronoun == Pronoun::Je && starts_with_vowel_or_h(&form) {
        format!("j'{}", form)
    } else {
        format!("{} {}", subject, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_endings() {
        assert_eq!(conjugate("parler", Pronoun::Je), "parle");
        assert_eq!(conjugate("parler", Pronoun::Tu), "parles");
        assert_eq!(conjugate("parler", Pronoun::IlElle), "parle");
        assert_eq!(conjugate("parler", Pronoun::Nous), "parlons");
        assert_eq!(conjugate("parler", Pronoun::Vous), "parlez");
        assert_eq!(conjugate("parler", Pronoun::IlsElles), "parlent");
    }

    #[test]
    fn test_nous_is_stem_plus_ons_for_plain_verbs() {
        for verb in ["aimer", "regarder", "travailler", "jouer", "étudier", "chanter"] {
            assert_eq!(conjugate(verb, Pronoun::Nous), format!("{}ons", stem(verb)));
        }
    }

    #[test]
    fn test_spelling_exceptions() {
        assert_eq!(conjugate("manger", Pronoun::Nous), "mangeons");
        assert_eq!(conjugate("commencer", Pronoun::Nous), "commençons");
        // Only nous is affected.
        assert_eq!(conjugate("manger", Pronoun::Vous), "mangez");
        assert_eq!(conjugate("commencer", Pronoun::IlsElles), "commencent");
    }

    #[test]
    fn test_full_answer() {
        assert_eq!(full_answer("aimer", Pronoun::Je), "j'aime");
        assert_eq!(full_answer("parler", Pronoun::Tu), "tu parles");
        assert_eq!(full_answer("habiter", Pronoun::IlElle), "il habite");
        assert_eq!(full_answer("habiter", Pronoun::Je), "j'habite");
        assert_eq!(full_answer("écouter", Pronoun::Je), "j'écoute");
        assert_eq!(full_answer("danser", Pronoun::IlsElles), "ils dansent");
        assert_eq!(full_answer("parler", Pronoun::Je), "je parle");
    }

    #[test]
    fn test_elision_initials_ignore_case() {
        assert!(starts_with_vowel_or_h("Étudie"));
        assert!(starts_with_vowel_or_h("Habite"));
        assert!(!starts_with_vowel_or_h("parle"));
        assert!(!starts_with_vowel_or_h(""));
    }
}
