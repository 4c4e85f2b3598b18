//! Text-surgery helpers shared by the line splitter and the form classifier:
//! stripping bracketed asides and punctuation, and recognising CJK glyphs.

use std::sync::LazyLock;

use regex::Regex;

/// Represents either a single Unicode code point or a range of code points.
enum HanChar {
    Single(u32),
    Range(u32, u32),
}

/// The Unicode blocks that hold Han ideographs, including the rarer
/// compatibility and supplementary-plane ranges a classical poem can still
/// draw characters from.
static LHAN: &[HanChar] = &[
    HanChar::Range(0x2E80, 0x2E99),
    HanChar::Range(0x2E9B, 0x2EF3),
    HanChar::Range(0x2F00, 0x2FD5),
    HanChar::Single(0x3005),
    HanChar::Single(0x3007),
    HanChar::Range(0x3021, 0x3029),
    HanChar::Range(0x3038, 0x303A),
    HanChar::Single(0x303B),
    HanChar::Range(0x3400, 0x4DBF),
    HanChar::Range(0x4E00, 0x9FFF),
    HanChar::Range(0xF900, 0xFAFF),
    HanChar::Range(0x20000, 0x2A6DF),
    HanChar::Range(0x2A700, 0x2EBEF),
    HanChar::Range(0x2F800, 0x2FA1F),
];

fn hanzi_only_pattern() -> String {
    let mut pattern_list = String::new();
    for han_char in LHAN {
        match *han_char {
            HanChar::Range(from, to) => {
                pattern_list.push_str(&format!(
                    "{}-{}",
                    char::from_u32(from).expect("LHAN range start is a valid code point"),
                    char::from_u32(to).expect("LHAN range end is a valid code point")
                ));
            }
            HanChar::Single(val) => {
                pattern_list
                    .push(char::from_u32(val).expect("LHAN single entry is a valid code point"));
            }
        }
    }
    format!("[{pattern_list}]")
}

static HANZI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&hanzi_only_pattern()).expect("hanzi pattern is valid regex"));

static BRACKETED_ASIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(（][^)）]*[)）]|\[[^\]]*\]|〔[^〕]*〕").expect("valid regex"));

/// True if `ch` falls in one of the CJK ideograph blocks.
#[must_use]
pub fn is_hanzi(ch: char) -> bool {
    HANZI_REGEX.is_match(&ch.to_string())
}

/// Strips parenthetical/bracketed asides (editorial notes, pinyin glosses)
/// the way an OCR'd or dataset-scraped poem tends to carry them.
#[must_use]
pub fn strip_bracketed_asides(text: &str) -> String {
    BRACKETED_ASIDE.replace_all(text, "").into_owned()
}

/// Keeps only CJK ideographs from `text`, in order, dropping punctuation,
/// whitespace and any surviving Latin annotation.
#[must_use]
pub fn extract_hanzi_only(text: &str) -> String {
    text.chars().filter(|&c| is_hanzi(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_common_ideographs() {
        assert!(is_hanzi('床'));
        assert!(is_hanzi('光'));
        assert!(!is_hanzi('a'));
        assert!(!is_hanzi('，'));
    }

    #[test]
    fn strips_parenthetical_asides() {
        assert_eq!(
            strip_bracketed_asides("床前明月光（chuáng qián）"),
            "床前明月光"
        );
        assert_eq!(strip_bracketed_asides("疑是地上霜[注]"), "疑是地上霜");
    }

    #[test]
    fn extracts_only_hanzi() {
        assert_eq!(
            extract_hanzi_only("床前明月光, 疑是地上霜。"),
            "床前明月光疑是地上霜"
        );
    }
}
