//! Crate-wide constants: form thresholds, rescue pattern ids, and the
//! scoring weights used by the batch driver summary.

/// Accepted syllable counts per line; any other count rejects the poem in
/// the form classifier.
pub const FIVE_CHAR_LINE: usize = 5;
pub const SEVEN_CHAR_LINE: usize = 7;

/// Line counts recognised as a quatrain or a regulated-verse poem.
pub const JUEJU_LINES: usize = 4;
pub const LVSHI_LINES: usize = 8;

/// Rescue pattern ids used by the line matcher and the tone scorer to find
/// whether a nominally-wrong `●` should be promoted to correct.
pub const SELF_RESCUE_PATTERN: &str = "平平仄平仄";
pub const COUPLET_RESCUE_UPPER: &str = "中仄中仄仄";

/// Scoring weights applied when the batch driver averages a poem's three
/// component scores into one summary figure.
pub const FORMAT_SCORE_WEIGHT: f64 = 1.0 / 3.0;
pub const TONE_SCORE_WEIGHT: f64 = 1.0 / 3.0;
pub const RHYME_SCORE_WEIGHT: f64 = 1.0 / 3.0;

/// Minimum number of lines that must match the dominant length for a poem
/// to be accepted as that form, keyed by target line count.
#[must_use]
pub const fn min_matching_lines(total_lines: usize) -> Option<usize> {
    match total_lines {
        JUEJU_LINES => Some(4),
        LVSHI_LINES => Some(7),
        _ => None,
    }
}
