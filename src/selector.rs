//! Picks the next card to present.
//!
//! Forced repeats come first: the head of the mistake queue in practice, the
//! head of the wrong list in review. Otherwise a weighted lottery favours low
//! levels and recent failures.

use crate::deck::Candidate;
use crate::models::{CardStats, MAX_LEVEL};
use crate::session::{MistakeQueue, Phase, WrongList};
use rand::Rng;

pub fn weight(stats: &CardStats) -> u32 {
    1 + u32::from(MAX_LEVEL.saturating_sub(stats.level)) + 2 * stats.streak_wrong
}

pub fn weighted_choice<'c, 'a, R: Rng + ?Sized>(
    items: &'c [Candidate<'a>],
    rng: &mut R,
) -> Option<&'c Candidate<'a>> {
    let total: u64 = items.iter().map(|c| u64::from(weight(&c.stats))).sum();
    if total == 0 {
        return None;
    }

    let mut remainder = rng.gen_range(0..total);
    for item in items {
        let w = u64::from(weight(&item.stats));
        if remainder < w {
            return Some(item);
        }
        remainder -= w;
    }
    items.last()
}

fn find<'c, 'a>(items: &'c [Candidate<'a>], id: &str) -> Option<&'c Candidate<'a>> {
    items.iter().find(|c| c.card.id == id)
}

/// Chooses the next card for `phase`. Returns `None` outside practice and
/// review or when there is nothing to choose from.
pub fn select<'c, 'a, R: Rng + ?Sized>(
    items: &'c [Candidate<'a>],
    phase: Phase,
    mistakes: &MistakeQueue,
    wrong: &WrongList,
    rng: &mut R,
) -> Option<&'c Candidate<'a>> {
    let forced = match phase {
        Phase::Practice => mistakes.head(),
        Phase::Review => wrong.head(),
        Phase::Setup | Phase::Results => return None,
    };

    forced
        .and_then(|id| find(items, id))
        .or_else(|| weighted_choice(items, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::build_deck;
    use crate::models::{Card, Pronoun};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck() -> Vec<Card> {
        build_deck(&["parler", "aimer"], &[Pronoun::Je])
    }

    fn with_levels<'a>(deck: &'a [Card], levels: &[u8]) -> Vec<Candidate<'a>> {
        deck.iter()
            .zip(levels)
            .map(|(card, &level)| Candidate {
                card,
                stats: CardStats { level, ..Default::default() },
            })
            .collect()
    }

    #[test]
    fn test_weight_formula() {
        assert_eq!(weight(&CardStats::default()), 4);
        assert_eq!(weight(&CardStats { level: 3, ..Default::default() }), 1);
        assert_eq!(
            weight(&CardStats { level: 1, streak_wrong: 2, ..Default::default() }),
            7
        );
    }

    #[test]
    fn test_lottery_favours_low_levels() {
        let deck = deck();
        let items = with_levels(&deck, &[0, 3]);
        let mut rng = StdRng::seed_from_u64(7);

        let trials = 20_000;
        let mut low = 0u32;
        for _ in 0..trials {
            if weighted_choice(&items, &mut rng).unwrap().card.id == "parler::je" {
                low += 1;
            }
        }
        let ratio = low as f64 / (trials - low) as f64;
        assert!((3.5..4.5).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn test_empty_candidates() {
        let mut rng = StdRng::seed_from_u64(1);
        let items: Vec<Candidate<'_>> = Vec::new();
        assert!(weighted_choice(&items, &mut rng).is_none());
        assert!(select(
            &items,
            Phase::Practice,
            &MistakeQueue::default(),
            &WrongList::default(),
            &mut rng
        )
        .is_none());
    }

    #[test]
    fn test_practice_prefers_mistake_head() {
        let deck = deck();
        let items = with_levels(&deck, &[3, 0]);
        let mut mistakes = MistakeQueue::default();
        mistakes.push("parler::je");
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let picked = select(&items, Phase::Practice, &mistakes, &WrongList::default(), &mut rng);
            assert_eq!(picked.unwrap().card.id, "parler::je");
        }
    }

    #[test]
    fn test_missing_forced_card_falls_back_to_lottery() {
        let deck = deck();
        let items = with_levels(&deck, &[0, 0]);
        let mut mistakes = MistakeQueue::default();
        mistakes.push("danser::je");
        let mut wrong = WrongList::default();
        wrong.insert("danser::je");
        let mut rng = StdRng::seed_from_u64(3);

        assert!(select(&items, Phase::Practice, &mistakes, &wrong, &mut rng).is_some());
        assert!(select(&items, Phase::Review, &mistakes, &wrong, &mut rng).is_some());
    }

    #[test]
    fn test_review_uses_wrong_list_not_mistakes() {
        let deck = deck();
        let items = with_levels(&deck, &[0, 0]);
        let mut mistakes = MistakeQueue::default();
        mistakes.push("parler::je");
        let mut wrong = WrongList::default();
        wrong.insert("aimer::je");
        let mut rng = StdRng::seed_from_u64(11);

        let picked = select(&items, Phase::Review, &mistakes, &wrong, &mut rng);
        assert_eq!(picked.unwrap().card.id, "aimer::je");
        assert!(select(&items, Phase::Results, &mistakes, &wrong, &mut rng).is_none());
    }
}
