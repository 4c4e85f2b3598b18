//! Builds the structured result of checking one candidate reading of a
//! poem, and only then derives the human-readable glyph report and the
//! counts the arbiter compares candidates on. The structure comes first so
//! nothing downstream has to re-parse rendered text to learn what happened.

use crate::book::{RhymeBook, RhymeClassId};
use crate::classifier::PoemForm;
use crate::config;
use crate::first_line::PoemTone;
use crate::matcher::LineMatch;
use crate::oracle;
use crate::template::RescueFlag;

/// One line's match result plus whether it was a rhyme-checked line and, if
/// so, whether it actually rhymed.
#[derive(Debug, Clone)]
pub struct LineReport {
    pub text: String,
    pub match_result: LineMatch,
    pub rhyme_checked: bool,
    pub rhymes: bool,
    pub via_neighbor_rhyme: bool,
}

#[derive(Debug, Clone)]
pub struct PoemReport {
    pub form: PoemForm,
    pub book: RhymeBook,
    pub tone: PoemTone,
    pub rhyme_class: RhymeClassId,
    pub lines: Vec<LineReport>,
}

impl PoemReport {
    /// Total count of per-character positions the matcher accepted,
    /// including multi-reading (poly) marks.
    #[must_use]
    pub fn total_correct(&self) -> usize {
        self.lines.iter().map(|l| l.match_result.per_char_ok.iter().filter(|&&ok| ok).count()).sum()
    }

    /// Total number of tonal positions in the poem (its character count).
    #[must_use]
    pub fn total_chars(&self) -> usize {
        self.lines.iter().map(|l| l.match_result.per_char_ok.len()).sum()
    }

    /// Number of lines whose rhyme was actually checked (rhymed or not).
    #[must_use]
    pub fn rhyme_checked_count(&self) -> usize {
        self.lines.iter().filter(|l| l.rhyme_checked).count()
    }

    /// Number of rhyme-checked lines that actually rhymed.
    #[must_use]
    pub fn rhymed_count(&self) -> usize {
        self.lines.iter().filter(|l| l.rhyme_checked && l.rhymes).count()
    }

    /// Number of distinct rhyme classes actually used across rhyme-checked
    /// lines. A poem rhyming cleanly on one class reports 1; mixing classes
    /// (only possible when a rhyme word is genuinely polyphonic) reports
    /// more, which the arbiter treats as worse.
    #[must_use]
    pub fn rhyme_variety(&self) -> usize {
        let mut classes: Vec<RhymeClassId> = self
            .lines
            .iter()
            .filter(|l| l.rhyme_checked && l.rhymes)
            .filter_map(|l| l.text.chars().last())
            .flat_map(|ch| oracle::classes(ch, self.book))
            .filter(|&c| c == self.rhyme_class)
            .collect();
        classes.sort_unstable();
        classes.dedup();
        classes.len().max(1)
    }

    /// Full annotated text report: every line followed by its glyph-marked
    /// tone reading, a per-line mismatch count when the matcher didn't
    /// accept every position, and a rescue note when the matcher settled on
    /// a rescued ("拗救") pattern instead of a plain one.
    #[must_use]
    pub fn render_annotated(&self) -> String {
        let mut out = String::new();
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            out.push_str(&line.text);
            out.push('\n');
            out.push_str(&render_line_glyphs(
                &line.text,
                &line.match_result,
                self.book,
                line.rhyme_checked,
                line.rhymes,
            ));
            let errors = line.match_result.error_count();
            if errors > 0 {
                out.push('\n');
                out.push_str(&format!("声调有{errors}处不合。"));
            }
            if let Some(note) = rescue_note(line.match_result.rescue, idx % 2 == 0) {
                out.push('\n');
                out.push_str(&note);
            }
        }
        out
    }

    /// Human-facing label for the rhyme class this poem settled on, e.g.
    /// "阳" for an archaic-book class or "唐 (āng)" for a modern one, where
    /// the tone-marked final comes from whichever rhyming line's ending
    /// character the reader would actually check by ear.
    #[must_use]
    pub fn rhyme_class_label(&self) -> Option<String> {
        match self.book {
            RhymeBook::Archaic => crate::rhyme_tables::archaic_class_name(self.rhyme_class).map(str::to_owned),
            RhymeBook::Modern14 | RhymeBook::Modern16 => {
                let name =
                    crate::rhyme_tables::modern_class_name(self.book == RhymeBook::Modern14, self.rhyme_class)?;
                let marked = self
                    .lines
                    .iter()
                    .filter(|l| l.rhyme_checked && l.rhymes)
                    .find_map(|l| l.text.chars().last().and_then(oracle::modern_final_marked));
                Some(match marked {
                    Some(marked) => format!("{name} ({marked})"),
                    None => name.to_owned(),
                })
            }
        }
    }
}

const LEVEL_GLYPH: char = '〇';
const OBLIQUE_GLYPH: char = '●';
const POLY_GLYPH: char = '◎';
const UNKNOWN_GLYPH: char = '\u{FFFD}';
const RHYME_GLYPH: char = '□';
const NON_RHYME_GLYPH: char = '■';

/// Renders one line's tone glyphs the way a reader checking the meter by
/// eye would expect: a hollow circle for a correct level slot, a filled
/// circle for a correct oblique slot, a double circle for a correctly
/// either-toned (poly) slot, and the opposite-filling glyph for a miss.
#[must_use]
pub fn render_line_glyphs(text: &str, match_result: &LineMatch, book: RhymeBook, rhyme_checked: bool, rhymes: bool) -> String {
    let mut glyphs: String = text
        .chars()
        .zip(&match_result.per_char_ok)
        .map(|(ch, &ok)| {
            let code = oracle::pingze_code(ch, book);
            match (ok, code) {
                (_, '3') => UNKNOWN_GLYPH,
                (true, '0') => POLY_GLYPH,
                (true, '1') => LEVEL_GLYPH,
                (true, '2') => OBLIQUE_GLYPH,
                (false, '1') | (false, '0') => OBLIQUE_GLYPH,
                (false, _) => LEVEL_GLYPH,
                (true, _) => unreachable!("pingze_code only returns '0'..'3'"),
            }
        })
        .collect();
    if rhyme_checked {
        glyphs.pop();
        glyphs.push(if rhymes { RHYME_GLYPH } else { NON_RHYME_GLYPH });
    }
    glyphs
}

/// Human-facing summary line for a matched line's rescue, if any.
#[must_use]
pub fn rescue_note(rescue: RescueFlag, is_upper_line: bool) -> Option<String> {
    match rescue {
        RescueFlag::None => None,
        RescueFlag::SelfRescued => {
            Some(format!("“{}”拗句，为本句自救。", config::SELF_RESCUE_PATTERN))
        }
        RescueFlag::AwaitingCoupletRescue => {
            let side = if is_upper_line { "上" } else { "下" };
            Some(format!("本联{side}句“{}”拗句，为对句相救。", config::COUPLET_RESCUE_UPPER))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher;

    #[test]
    fn total_correct_counts_matched_positions_only() {
        let line_text = "床前明月光".to_owned();
        let match_result = matcher::match_line(&line_text, 2, false, false, RhymeBook::Archaic);
        let ok_count = match_result.per_char_ok.iter().filter(|&&ok| ok).count();
        let report = PoemReport {
            form: PoemForm::FiveJueju,
            book: RhymeBook::Archaic,
            tone: PoemTone::Level,
            rhyme_class: 1,
            lines: vec![LineReport {
                text: line_text,
                match_result,
                rhyme_checked: true,
                rhymes: false,
                via_neighbor_rhyme: false,
            }],
        };
        assert_eq!(report.total_correct(), ok_count);
        assert_eq!(report.total_chars(), 5);
    }

    #[test]
    fn rhyme_class_label_marks_the_modern_final() {
        let line_text = "床前明月光".to_owned();
        let match_result = matcher::match_line(&line_text, 1, false, false, RhymeBook::Modern14);
        let report = PoemReport {
            form: PoemForm::FiveJueju,
            book: RhymeBook::Modern14,
            tone: PoemTone::Level,
            rhyme_class: 10,
            lines: vec![LineReport {
                text: line_text,
                match_result,
                rhyme_checked: true,
                rhymes: true,
                via_neighbor_rhyme: false,
            }],
        };
        assert_eq!(report.rhyme_class_label().as_deref(), Some("唐 (uāng)"));
    }

    #[test]
    fn render_annotated_notes_a_self_rescue_with_no_mismatches() {
        let line_text = "明前日头月".to_owned();
        let match_result = matcher::match_line(&line_text, 2, false, false, RhymeBook::Archaic);
        let report = PoemReport {
            form: PoemForm::FiveJueju,
            book: RhymeBook::Archaic,
            tone: PoemTone::Level,
            rhyme_class: 1,
            lines: vec![LineReport {
                text: line_text,
                match_result,
                rhyme_checked: false,
                rhymes: false,
                via_neighbor_rhyme: false,
            }],
        };
        let rendered = report.render_annotated();
        assert!(rendered.starts_with("明前日头月\n"));
        assert!(!rendered.contains("处不合"));
        assert!(rendered.contains("自救"));
    }

    #[test]
    fn render_annotated_reports_a_mismatch_count() {
        let match_result = matcher::LineMatch {
            per_char_ok: vec![true, false, true, true, false],
            pattern: "00000",
            rescue: RescueFlag::None,
        };
        let report = PoemReport {
            form: PoemForm::FiveJueju,
            book: RhymeBook::Archaic,
            tone: PoemTone::Level,
            rhyme_class: 1,
            lines: vec![LineReport {
                text: "甲乙丙丁戊".to_owned(),
                match_result,
                rhyme_checked: false,
                rhymes: false,
                via_neighbor_rhyme: false,
            }],
        };
        assert!(report.render_annotated().contains("声调有2处不合"));
    }

    #[test]
    fn rhyme_class_label_falls_back_to_name_without_a_marked_reading() {
        let report = PoemReport {
            form: PoemForm::FiveJueju,
            book: RhymeBook::Archaic,
            tone: PoemTone::Level,
            rhyme_class: 7, // the archaic level class "阳"
            lines: Vec::new(),
        };
        assert_eq!(report.rhyme_class_label().as_deref(), Some("阳"));
    }
}
