//! Tonal category of a character reading, shared by every rhyme book.

/// The four-way tone classification used throughout the prosody engine.
///
/// `Poly` means the character has at least one level and one oblique
/// reading and the correct one can only be picked by context (the
/// candidate arbiter tries both and keeps whichever scores higher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneCategory {
    Level,
    Oblique,
    Poly,
    Unknown,
}

impl ToneCategory {
    #[must_use]
    pub fn is_level(self) -> bool {
        matches!(self, ToneCategory::Level)
    }

    #[must_use]
    pub fn is_oblique(self) -> bool {
        matches!(self, ToneCategory::Oblique)
    }

    /// Resolves a `Poly` reading to one of the two plain directions, for a
    /// candidate arbiter pass that has already picked a tone direction.
    #[must_use]
    pub fn resolve(self, prefer_level: bool) -> ToneCategory {
        match self {
            ToneCategory::Poly => {
                if prefer_level {
                    ToneCategory::Level
                } else {
                    ToneCategory::Oblique
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poly_resolves_either_way() {
        assert_eq!(ToneCategory::Poly.resolve(true), ToneCategory::Level);
        assert_eq!(ToneCategory::Poly.resolve(false), ToneCategory::Oblique);
    }

    #[test]
    fn plain_readings_ignore_preference() {
        assert_eq!(ToneCategory::Level.resolve(false), ToneCategory::Level);
        assert_eq!(ToneCategory::Oblique.resolve(true), ToneCategory::Oblique);
    }
}
