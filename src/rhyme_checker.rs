//! Finds which rhyme class a poem is actually using, whether the first
//! line joins in (directly, or via a neighbor-rhyme grace in the archaic
//! book), and whether the rhyme word itself is ambiguous enough that the
//! poem's tone direction can't be read off it alone.

use crate::book::{RhymeBook, RhymeClassId};
use crate::first_line::{FirstLineRhyme, PoemTone};
use crate::oracle;
use crate::rhyme_tables;
use crate::tone::ToneCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhymeCheckError {
    /// Every rhyme-position character is outside the dictionary: there's
    /// nothing to check a rhyme scheme against.
    AllUnknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RhymeAnalysis {
    pub main_class: RhymeClassId,
    pub tone: PoemTone,
    /// True when every rhyme-position character is polyphonic in both
    /// directions, so the tone direction above was picked arbitrarily and
    /// the caller should try both.
    pub ambiguous_tone: bool,
    pub first_line: FirstLineRhyme,
    pub first_line_via_neighbor: bool,
}

/// 0-indexed positions of the lines whose last character must rhyme: every
/// even line (2, 4, 6, ...) in 1-indexed terms.
fn rhyme_line_indices(total_lines: usize) -> Vec<usize> {
    (1..total_lines).step_by(2).collect()
}

fn most_frequent_class(per_line_classes: &[Vec<RhymeClassId>]) -> Option<RhymeClassId> {
    let mut seen_order: Vec<RhymeClassId> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for classes in per_line_classes {
        for &class in classes {
            if oracle::is_unknown_class(class) {
                continue;
            }
            if let Some(pos) = seen_order.iter().position(|&c| c == class) {
                counts[pos] += 1;
            } else {
                seen_order.push(class);
                counts.push(1);
            }
        }
    }
    let max_count = *counts.iter().max()?;
    seen_order
        .into_iter()
        .zip(counts)
        .find(|&(_, count)| count == max_count)
        .map(|(class, _)| class)
}

fn class_tone(ch: char, class: RhymeClassId, book: RhymeBook) -> Option<ToneCategory> {
    if oracle::classes(ch, book).contains(&class) {
        Some(oracle::tone(ch, book))
    } else {
        None
    }
}

/// Analyzes the rhyme scheme of a poem already known to be split into
/// `lines` and classified under `book`.
///
/// # Errors
/// Returns [`RhymeCheckError::AllUnknown`] if no rhyme-position character
/// has any recorded reading in `book`.
pub fn analyze(lines: &[String], book: RhymeBook) -> Result<RhymeAnalysis, RhymeCheckError> {
    let rhyme_indices = rhyme_line_indices(lines.len());
    let rhyme_chars: Vec<char> = rhyme_indices
        .iter()
        .filter_map(|&i| lines[i].chars().last())
        .collect();
    let per_line_classes: Vec<Vec<RhymeClassId>> =
        rhyme_chars.iter().map(|&ch| oracle::classes(ch, book)).collect();

    let main_class = most_frequent_class(&per_line_classes).ok_or(RhymeCheckError::AllUnknown)?;

    let tone = rhyme_chars
        .iter()
        .find_map(|&ch| class_tone(ch, main_class, book))
        .map(|t| if t.is_oblique() { PoemTone::Oblique } else { PoemTone::Level })
        .unwrap_or(PoemTone::Level);

    let ambiguous_tone = rhyme_chars
        .iter()
        .all(|&ch| oracle::tone(ch, book) == ToneCategory::Poly);

    let (first_line, first_line_via_neighbor) = first_line_rhyme(lines, book, main_class, tone);

    Ok(RhymeAnalysis { main_class, tone, ambiguous_tone, first_line, first_line_via_neighbor })
}

/// Whether line 1 joins the poem's rhyme scheme under a candidate tone
/// direction: used both by [`analyze`] and by the engine when the main
/// tone direction itself is ambiguous and several candidates are tried.
#[must_use]
pub fn first_line_rhyme(lines: &[String], book: RhymeBook, main_class: RhymeClassId, tone: PoemTone) -> (FirstLineRhyme, bool) {
    let Some(first_char) = lines[0].chars().last() else {
        return (FirstLineRhyme::None, false);
    };
    let first_classes = oracle::classes(first_char, book);
    if first_classes.contains(&main_class) {
        return (rhyme_direction(tone), false);
    }
    if matches!(book, RhymeBook::Archaic)
        && first_classes.iter().any(|&c| rhyme_tables::are_archaic_neighbors(c, main_class))
    {
        return (rhyme_direction(tone), true);
    }
    (FirstLineRhyme::None, false)
}

fn rhyme_direction(tone: PoemTone) -> FirstLineRhyme {
    match tone {
        PoemTone::Level => FirstLineRhyme::Level,
        PoemTone::Oblique => FirstLineRhyme::Oblique,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_main_class_from_even_lines() {
        let lines = vec![
            "床前明月光".to_owned(),
            "疑是地上霜".to_owned(),
            "举头望明月".to_owned(),
            "低头思故乡".to_owned(),
        ];
        let analysis = analyze(&lines, RhymeBook::Archaic).expect("dictionary covers this poem");
        assert_eq!(analysis.tone, PoemTone::Level);
        assert!(matches!(analysis.first_line, FirstLineRhyme::Level));
    }

    #[test]
    fn all_unknown_rhyme_position_is_rejected() {
        let lines = vec![
            "龘龘龘龘龘".to_owned(),
            "龘龘龘龘龘".to_owned(),
            "龘龘龘龘龘".to_owned(),
            "龘龘龘龘龘".to_owned(),
        ];
        assert_eq!(analyze(&lines, RhymeBook::Archaic), Err(RhymeCheckError::AllUnknown));
    }
}
