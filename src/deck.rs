use crate::conjugation::full_answer;
use crate::models::{Card, CardStats, ProgressStore, Pronoun};

/// A deck card paired with its current statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub card: &'a Card,
    pub stats: CardStats,
}

/// Cross product of verbs and pronouns, verb-major, in input order.
pub fn build_deck<S: AsRef<str>>(verbs: &[S], pronouns: &[Pronoun]) -> Vec<Card> {
    let mut deck = Vec::with_capacity(verbs.len() * pronouns.len());
    for verb in verbs {
        let verb = verb.as_ref();
        for &pronoun in pronouns {
            deck.push(Card {
                id: Card::card_id(verb, pronoun),
                verb: verb.to_string(),
                pronoun,
                answer: full_answer(verb, pronoun),
            });
        }
    }
    deck
}

/// Merges the deck with stored statistics. Unseen cards get zeroed stats.
pub fn candidates<'a>(deck: &'a [Card], store: &ProgressStore) -> Vec<Candidate<'a>> {
    deck.iter()
        .map(|card| Candidate {
            card,
            stats: store.stats(&card.id),
        })
        .collect()
}

pub fn mastered_count(deck: &[Card], store: &ProgressStore) -> usize {
    deck.iter()
        .filter(|card| store.stats(&card.id).is_mastered())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_order_is_verb_major() {
        let deck = build_deck(&["parler", "aimer"], &[Pronoun::Je, Pronoun::Nous]);
        let ids: Vec<_> = deck.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["parler::je", "parler::nous", "aimer::je", "aimer::nous"]);
        assert_eq!(deck[2].answer, "j'aime");
    }

    #[test]
    fn test_deck_is_deterministic() {
        let verbs = vec!["manger".to_string(), "jouer".to_string()];
        assert_eq!(
            build_deck(&verbs, &[Pronoun::Vous, Pronoun::Tu]),
            build_deck(&verbs, &[Pronoun::Vous, Pronoun::Tu])
        );
    }

    #[test]
    fn test_empty_inputs_give_empty_deck() {
        let none: [&str; 0] = [];
        assert!(build_deck(&none, &[Pronoun::Je]).is_empty());
        assert!(build_deck(&["parler"], &[]).is_empty());
    }

    #[test]
    fn test_candidates_default_unseen_cards() {
        let deck = build_deck(&["parler"], &[Pronoun::Je, Pronoun::Tu]);
        let mut store = ProgressStore::default();
        store.cards.insert(
            "parler::tu".to_string(),
            CardStats { level: 3, ..Default::default() },
        );

        let merged = candidates(&deck, &store);
        assert_eq!(merged[0].stats, CardStats::default());
        assert_eq!(merged[1].stats.level, 3);
        assert_eq!(mastered_count(&deck, &store), 1);
    }
}
