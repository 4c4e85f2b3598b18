//! The three rhyme books a poem can be checked against.

/// Which rhyme book a poem is checked against.
///
/// `Archaic` is 平水韵 (106 classes, with a derived 19-class grouping used
/// only to grant the first line a wider, "neighbor rhyme" allowance).
/// `Modern14`/`Modern16` are 新韵/通韵, both keyed off the pinyin final
/// rather than a historical dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RhymeBook {
    Archaic,
    Modern14,
    Modern16,
}

impl RhymeBook {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RhymeBook::Archaic => "平水韵",
            RhymeBook::Modern14 => "新韵",
            RhymeBook::Modern16 => "通韵",
        }
    }
}

/// A rhyme-class id within whichever book is in play. Meaning is only
/// comparable within the same book. `UNKNOWN_RHYME_CLASS` is the sentinel
/// used when a character has no reading recorded for the book.
pub type RhymeClassId = u16;

pub const UNKNOWN_RHYME_CLASS: RhymeClassId = 0;
