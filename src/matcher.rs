//! Matches a single line against its expected opening, scoring every
//! candidate pattern (plain and rescued) and keeping whichever fits best,
//! the way a rule with an optional "拗句" variant is tried only when the
//! plain reading doesn't already fit.

use crate::book::RhymeBook;
use crate::oracle;
use crate::template::{self, OpeningId, RescueFlag};

/// Per-character pass/fail against the winning pattern, plus which rescue
/// (if any) that pattern represents.
#[derive(Debug, Clone)]
pub struct LineMatch {
    pub per_char_ok: Vec<bool>,
    pub pattern: &'static str,
    pub rescue: RescueFlag,
}

impl LineMatch {
    #[must_use]
    pub fn all_correct(&self) -> bool {
        self.per_char_ok.iter().all(|&ok| ok)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.per_char_ok.iter().filter(|&&ok| !ok).count()
    }
}

fn char_matches(pattern_char: u8, tone_code: char) -> bool {
    match pattern_char {
        b'0' => true,
        b'1' => tone_code == '1' || tone_code == '0' || tone_code == '3',
        b'2' => tone_code == '2' || tone_code == '0' || tone_code == '3',
        _ => false,
    }
}

/// Matches `line` (already known to have the right character count for its
/// position) against `opening`, under `oblique_rhyme` (the poem's overall
/// rhyme direction) and `awaiting_couplet_rescue` (whether the line above
/// asked this line to rescue it).
#[must_use]
pub fn match_line(line: &str, opening: OpeningId, oblique_rhyme: bool, awaiting_couplet_rescue: bool, book: RhymeBook) -> LineMatch {
    let tone_codes: Vec<char> = line.chars().map(|c| oracle::pingze_code(c, book)).collect();
    let patterns = template::patterns_for(opening, oblique_rhyme, awaiting_couplet_rescue);

    let mut best: Option<(&'static str, Vec<bool>, usize)> = None;
    for &pattern in patterns {
        let mut per_char_ok = Vec::with_capacity(tone_codes.len());
        let mut errors = 0;
        for (p_char, &tone_code) in pattern.as_bytes().iter().zip(&tone_codes) {
            let ok = char_matches(*p_char, tone_code);
            if !ok {
                errors += 1;
            }
            per_char_ok.push(ok);
        }
        if best.as_ref().is_none_or(|(_, _, best_errors)| errors < *best_errors) {
            best = Some((pattern, per_char_ok, errors));
        }
    }

    let (pattern, per_char_ok, _) = best.expect("patterns_for never returns an empty slice");
    LineMatch {
        per_char_ok,
        pattern,
        rescue: template::rescue_flag_for_pattern(pattern),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_matches_wildcard_always() {
        assert!(char_matches(b'0', '1'));
        assert!(char_matches(b'0', '2'));
    }

    #[test]
    fn level_slot_accepts_poly_and_unknown() {
        assert!(char_matches(b'1', '0'));
        assert!(char_matches(b'1', '3'));
        assert!(!char_matches(b'1', '2'));
    }

    #[test]
    fn matches_level_starting_rhyming_opening() {
        // 床前明月光: 仄平平仄平 against opening 2 (平起不押韵) 01122 -- chosen
        // for a clean score comparison, not meant to be the "right" rule.
        let result = match_line("床前明月光", 2, false, false, RhymeBook::Archaic);
        assert_eq!(result.per_char_ok.len(), 5);
    }

    #[test]
    fn self_rescue_line_scores_full_marks_despite_oblique_final() {
        // 明前日头月: 平平仄平仄, the self-rescue variant of opening 2. A
        // naive plain reading of opening 2 would mark position 4 wrong;
        // the matcher picks the rescue pattern instead since it fits better.
        let result = match_line("明前日头月", 2, false, false, RhymeBook::Archaic);
        assert!(result.all_correct());
        assert_eq!(result.rescue, RescueFlag::SelfRescued);
    }
}
