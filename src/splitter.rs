//! Splits a raw poem blob into its individual lines, tolerating the messy
//! ways a scraped or pasted poem can show up: one line per `\n`, two lines
//! with internal punctuation, no newlines at all, or no punctuation at all.
//! Bracketed asides (editorial notes, pinyin glosses) are stripped first so
//! they never leak into a line's hanzi count or its rhyme-position character.

use regex::Regex;
use std::sync::LazyLock;

use crate::common;

static LINE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[，。；！？、]").expect("valid regex"));

static SENTENCE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[。！？；]").expect("valid regex"));

/// Character counts the uniform-slicing fallback recognises: a 5- or
/// 7-character quatrain or regulated-verse poem with no punctuation at all.
const UNIFORM_TOTALS: &[(usize, usize)] = &[(20, 5), (28, 7), (40, 5), (56, 7)];

fn non_empty_trimmed(parts: impl Iterator<Item = impl AsRef<str>>) -> Vec<String> {
    parts
        .map(|p| p.as_ref().trim().to_owned())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Splits `text` into lines. Returns `None` only when every fallback is
/// exhausted and the text can't be split at all (the caller then treats
/// the whole blob as a single unsplittable "line").
#[must_use]
pub fn split_into_lines(text: &str) -> Option<Vec<String>> {
    let text = common::strip_bracketed_asides(text);
    let by_newline: Vec<&str> = text.split('\n').collect();
    let by_newline_trimmed = non_empty_trimmed(by_newline.iter());

    if by_newline_trimmed.len() == 4 || by_newline_trimmed.len() == 8 {
        return Some(by_newline_trimmed);
    }

    if by_newline_trimmed.len() == 2 {
        let fragments: Vec<String> = by_newline_trimmed
            .iter()
            .flat_map(|line| non_empty_trimmed(LINE_PUNCTUATION.split(line)))
            .collect();
        if fragments.len() == 8 {
            return Some(fragments);
        }
    }

    if by_newline_trimmed.len() == 1 {
        let fragments = non_empty_trimmed(SENTENCE_PUNCTUATION.split(&by_newline_trimmed[0]));
        if fragments.len() == 4 || fragments.len() == 8 {
            return Some(fragments);
        }
    }

    let hanzi_only = common::extract_hanzi_only(&text);
    let total = hanzi_only.chars().count();
    if let Some(&(_, line_len)) = UNIFORM_TOTALS.iter().find(|&&(t, _)| t == total) {
        let chars: Vec<char> = hanzi_only.chars().collect();
        return Some(chars.chunks(line_len).map(|c| c.iter().collect()).collect());
    }

    if !by_newline_trimmed.is_empty() {
        return Some(by_newline_trimmed);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_four_newline_lines() {
        let text = "床前明月光\n疑是地上霜\n举头望明月\n低头思故乡";
        assert_eq!(
            split_into_lines(text),
            Some(vec![
                "床前明月光".to_owned(),
                "疑是地上霜".to_owned(),
                "举头望明月".to_owned(),
                "低头思故乡".to_owned(),
            ])
        );
    }

    #[test]
    fn splits_single_run_on_punctuation() {
        let text = "床前明月光，疑是地上霜。举头望明月，低头思故乡。";
        let lines = split_into_lines(text).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "床前明月光");
    }

    #[test]
    fn splits_two_lines_with_internal_punctuation() {
        let text = "床前明月光，疑是地上霜。\n举头望明月，低头思故乡。";
        let lines = split_into_lines(text).unwrap();
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn falls_back_to_uniform_slicing_with_no_punctuation() {
        let text = "床前明月光疑是地上霜举头望明月低头思故乡";
        let lines = split_into_lines(text).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].chars().count(), 5);
    }

    #[test]
    fn length_mismatch_does_not_crash() {
        let text = "床前明月光疑是地上霜举头望明";
        let lines = split_into_lines(text);
        assert!(lines.is_some());
        assert_ne!(lines.unwrap().len(), 4);
    }

    #[test]
    fn strips_a_bracketed_aside_before_splitting() {
        let text = "床前明月光（一作别本）\n疑是地上霜\n举头望明月\n低头思故乡";
        let lines = split_into_lines(text).unwrap();
        assert_eq!(lines[0], "床前明月光");
        assert_eq!(lines[0].chars().count(), 5);
    }
}
