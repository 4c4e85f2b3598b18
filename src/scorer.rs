//! Turns a structured match against a declared form, plus a [`PoemReport`],
//! into the three independent scores a caller actually wants: how well the
//! text fits the declared shape, how clean its tonal pattern is, and how
//! well it rhymes.

use crate::report::PoemReport;

/// 50 points for a matching line length, 50 for a matching line count /
/// poem type; independent of each other.
#[must_use]
pub fn form_score(length_matches: bool, type_matches: bool) -> f64 {
    f64::from(u8::from(length_matches)) * 50.0 + f64::from(u8::from(type_matches)) * 50.0
}

/// Fraction of tonal positions the matcher accepted, scaled to [0, 100].
/// Rescue credit needs no separate promotion step here: the matcher already
/// picked whichever candidate pattern (plain or rescued) fit best, so a
/// genuinely rescued line already reports every position as a match.
#[must_use]
pub fn tone_score(report: &PoemReport) -> f64 {
    let total = report.total_chars();
    if total == 0 {
        return 0.0;
    }
    100.0 * report.total_correct() as f64 / total as f64
}

/// `100 * rhymed / floor(total_lines / 2)`, capped at 100: a quatrain's
/// denominator is 2, a regulated poem's is 4, and longer forms scale the
/// same way. `rhymed` may exceed the denominator when the first line also
/// rhymes, which the cap turns into no more than full credit.
#[must_use]
pub fn rhyme_score(total_lines: usize, rhymed: usize) -> f64 {
    let denominator = (total_lines / 2).max(1);
    (100.0 * rhymed as f64 / denominator as f64).min(100.0)
}

/// Unweighted mean of the three axis scores.
#[must_use]
pub fn aggregate(form: f64, tone: f64, rhyme: f64) -> f64 {
    (form + tone + rhyme) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_score_awards_fifty_per_matching_axis() {
        assert_eq!(form_score(true, true), 100.0);
        assert_eq!(form_score(true, false), 50.0);
        assert_eq!(form_score(false, false), 0.0);
    }

    #[test]
    fn rhyme_score_for_quatrain_denominator() {
        assert_eq!(rhyme_score(4, 2), 100.0);
        assert_eq!(rhyme_score(4, 1), 50.0);
        assert_eq!(rhyme_score(4, 0), 0.0);
    }

    #[test]
    fn rhyme_score_caps_at_full_credit_when_first_line_also_rhymes() {
        assert_eq!(rhyme_score(4, 3), 100.0);
    }

    #[test]
    fn rhyme_score_for_regulated_denominator() {
        assert_eq!(rhyme_score(8, 1), 25.0);
        assert_eq!(rhyme_score(8, 4), 100.0);
    }
}
