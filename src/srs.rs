use crate::models::{CardStats, MAX_LEVEL};
use unicode_normalization::UnicodeNormalization;

/// Consecutive correct answers needed to move up one level.
pub const PROMOTION_STREAK: u32 = 2;

fn strip_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Lowercases and trims. With `ignore_accents`, also drops combining marks
/// and turns the typographic apostrophe into a plain one.
pub fn normalize(s: &str, ignore_accents: bool) -> String {
    let lower = s.to_lowercase();
    if ignore_accents {
        strip_diacritics(&lower)
            .replace('\u{2019}', "'")
            .trim()
            .to_string()
    } else {
        lower.trim().to_string()
    }
}

pub fn is_correct(user_input: &str, expected: &str, ignore_accents: bool) -> bool {
    normalize(user_input, ignore_accents) == normalize(expected, ignore_accents)
}

/// Applies one graded answer to the card statistics.
///
/// Correct: two in a row move the card up one level (streak restarts).
/// Wrong: the card drops one level, never below zero.
pub fn apply_grade(stats: &CardStats, correct: bool) -> CardStats {
    let mut next = *stats;
    next.seen += 1;

    if correct {
        next.correct += 1;
        next.streak_correct += 1;
        next.streak_wrong = 0;
        if next.level < MAX_LEVEL && next.streak_correct >= PROMOTION_STREAK {
            next.level += 1;
            next.streak_correct = 0;
        }
    } else {
        next.wrong += 1;
        next.streak_wrong += 1;
        next.streak_correct = 0;
        next.level = next.level.saturating_sub(1);
    }

    next
}

/// Grades `user_input` against `expected` and returns the verdict with the
/// updated statistics.
pub fn grade(
    stats: &CardStats,
    user_input: &str,
    expected: &str,
    ignore_accents: bool,
) -> (bool, CardStats) {
    let correct = is_correct(user_input, expected, ignore_accents);
    (correct, apply_grade(stats, correct))
}
