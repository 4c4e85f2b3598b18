//! The character oracle: per-character tone and rhyme-class lookups that
//! everything downstream (the line matcher, the rhyme checker) is built on.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::book::{RhymeBook, RhymeClassId, UNKNOWN_RHYME_CLASS};
use crate::rhyme_tables::{self, ArchaicReading, CharacterEntry, ModernReading};
use crate::tone::ToneCategory;

static BY_CHAR: LazyLock<HashMap<char, &'static CharacterEntry>> = LazyLock::new(|| {
    rhyme_tables::CHARACTERS
        .iter()
        .map(|entry| (entry.ch, entry))
        .collect()
});

fn lookup(ch: char) -> Option<&'static CharacterEntry> {
    BY_CHAR.get(&ch).copied()
}

/// All rhyme-class ids `ch` belongs to in `book`, or an empty vec if the
/// character has no recorded reading for that book (the caller treats this
/// the same as the sentinel "unknown" class).
#[must_use]
pub fn classes(ch: char, book: RhymeBook) -> Vec<RhymeClassId> {
    let Some(entry) = lookup(ch) else {
        return Vec::new();
    };
    match book {
        RhymeBook::Archaic => entry.archaic.iter().map(|r| r.class).collect(),
        RhymeBook::Modern14 => entry.modern.iter().map(|r| r.modern14_class).collect(),
        RhymeBook::Modern16 => entry.modern.iter().map(|r| r.modern16_class).collect(),
    }
}

/// The tone category of `ch` in `book`: `Unknown` if the character isn't in
/// the table for that book, `Poly` if it has readings of both tone
/// super-categories, otherwise the single tone all its readings share.
#[must_use]
pub fn tone(ch: char, book: RhymeBook) -> ToneCategory {
    let Some(entry) = lookup(ch) else {
        return ToneCategory::Unknown;
    };
    let tones: Vec<ToneCategory> = match book {
        RhymeBook::Archaic => entry.archaic.iter().map(|r: &ArchaicReading| r.tone()).collect(),
        RhymeBook::Modern14 | RhymeBook::Modern16 => {
            entry.modern.iter().map(|r: &ModernReading| r.tone).collect()
        }
    };
    combine_tones(&tones)
}

fn combine_tones(tones: &[ToneCategory]) -> ToneCategory {
    let has_level = tones.iter().any(|t: &ToneCategory| t.is_level());
    let has_oblique = tones.iter().any(|t: &ToneCategory| t.is_oblique());
    match (has_level, has_oblique) {
        (true, true) => ToneCategory::Poly,
        (true, false) => ToneCategory::Level,
        (false, true) => ToneCategory::Oblique,
        (false, false) => ToneCategory::Unknown,
    }
}

/// Whether `class` is the sentinel meaning "no reading recorded", i.e. not
/// a real value from any book's dictionary.
#[must_use]
pub fn is_unknown_class(class: RhymeClassId) -> bool {
    class == UNKNOWN_RHYME_CLASS
}

/// The '0'/'1'/'2'/'3' tone code a line matcher compares against a
/// template: '0' poly (either tone is a legitimate reading), '1' level,
/// '2' oblique, '3' unknown (no data, treated leniently like poly).
#[must_use]
pub fn pingze_code(ch: char, book: RhymeBook) -> char {
    match tone(ch, book) {
        ToneCategory::Poly => '0',
        ToneCategory::Level => '1',
        ToneCategory::Oblique => '2',
        ToneCategory::Unknown => '3',
    }
}

/// Tone-marked rendering of `ch`'s modern pinyin final, for diagnostic
/// output that needs to show *why* a character belongs to a modern rhyme
/// class (e.g. "uang1" renders as "uāng"). The tone number is a stand-in
/// for the reading's super-category (1 for level, 4 for oblique) since this
/// table doesn't track the original four-way tone. `None` if `ch` carries
/// no modern reading at all.
#[must_use]
pub fn modern_final_marked(ch: char) -> Option<String> {
    let reading = lookup(ch)?.modern.first()?;
    let tone_digit = if reading.tone.is_level() { '1' } else { '4' };
    Some(crate::pinyin::pinyin_mark_from_num(&format!("{}{tone_digit}", reading.final_)))
}

/// Two classes from the archaic book count as the same rhyme group either
/// when they're equal, or — for the first line's extra leniency — when
/// they're 19-class neighbors. Modern books never grant this leniency.
#[must_use]
pub fn rhyme_group_neighbors(book: RhymeBook, a: RhymeClassId, b: RhymeClassId) -> bool {
    match book {
        RhymeBook::Archaic => rhyme_tables::are_archaic_neighbors(a, b),
        RhymeBook::Modern14 | RhymeBook::Modern16 => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_tone_character() {
        assert_eq!(tone('光', RhymeBook::Archaic), ToneCategory::Level);
    }

    #[test]
    fn oblique_tone_character() {
        assert_eq!(tone('是', RhymeBook::Archaic), ToneCategory::Oblique);
    }

    #[test]
    fn polyphonic_character_is_poly() {
        assert_eq!(tone('看', RhymeBook::Archaic), ToneCategory::Poly);
    }

    #[test]
    fn unknown_character_is_unknown() {
        assert_eq!(tone('龘', RhymeBook::Archaic), ToneCategory::Unknown);
        assert!(classes('龘', RhymeBook::Archaic).is_empty());
    }

    #[test]
    fn same_level_class_rhymes() {
        let guang = classes('光', RhymeBook::Archaic);
        let xiang = classes('乡', RhymeBook::Archaic);
        assert!(guang.iter().any(|a| xiang.iter().any(|b| rhyme_group_neighbors(
            RhymeBook::Archaic,
            *a,
            *b
        ))));
    }

    #[test]
    fn modern_final_renders_tone_mark() {
        assert_eq!(modern_final_marked('光').as_deref(), Some("uāng"));
        assert_eq!(modern_final_marked('龘'), None);
    }

    #[test]
    fn modern_book_groups_same_final() {
        let guang = classes('光', RhymeBook::Modern14);
        let xiang = classes('乡', RhymeBook::Modern14);
        assert_eq!(guang, xiang);
    }
}
