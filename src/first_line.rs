//! Infers which of the eight canonical openings a poem's first line is
//! using, from the tone of its 2nd, 4th and last characters alone (these
//! three positions are the ones every one of the eight templates pins down;
//! the rest can be "中", either tone).
//!
//! A single line is usually ambiguous between several openings (a poly
//! character or an unset "中" slot in the template can leave more than one
//! candidate standing), so this also looks at whether the first line rhymes
//! and, failing that, walks forward through the poem's later lines until
//! only one candidate opening survives.

use std::collections::HashSet;

use crate::book::RhymeBook;
use crate::oracle;
use crate::template::OpeningId;

/// Whether, and how, the first line rhymes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstLineRhyme {
    Level,
    Oblique,
    None,
}

/// The poem's overall rhyme direction, already resolved to one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoemTone {
    Level,
    Oblique,
}

fn combo_rule(combo: &str) -> u8 {
    match combo {
        "111" => 0,
        "112" | "122" => 2,
        "121" => 1,
        "211" => 3,
        "212" | "222" => 4,
        _ => 0,
    }
}

/// Last five characters of `line` (the ones a five- or seven-character line
/// actually pins tonal positions on).
fn last_five(line: &str) -> Vec<char> {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= 5 {
        chars
    } else {
        chars[chars.len() - 5..].to_vec()
    }
}

/// The 2nd/4th/5th-character tone code string ('0' poly, '1' level, '2'
/// oblique, '3' unknown) a line is matched against.
fn line_tone_string(line: &str, book: RhymeBook) -> String {
    let five = last_five(line);
    [five[1], five[3], five[4]]
        .iter()
        .map(|&c| oracle::pingze_code(c, book))
        .collect()
}

/// Every fixed 1/2-only combination ("111".."222") consistent with a '0'
/// wildcard tone string.
fn match_combinations(tone_string: &str) -> Vec<String> {
    const COMBINATIONS: [&str; 8] = ["111", "112", "121", "122", "211", "212", "221", "222"];
    let bytes = tone_string.as_bytes();
    COMBINATIONS
        .iter()
        .filter(|combo| {
            combo
                .as_bytes()
                .iter()
                .zip(bytes)
                .all(|(&c, &s)| s == b'0' || s == b'3' || c == s)
        })
        .map(|s| (*s).to_owned())
        .collect()
}

fn current_pattern(sen: usize, level: bool) -> [u8; 2] {
    const PING_INITIAL: [[u8; 2]; 4] = [[1, 3], [3, 1], [4, 2], [1, 3]];
    const PING_CYCLE: [[u8; 2]; 4] = [[2, 4], [3, 1], [4, 2], [1, 3]];
    const ZE_INITIAL: [[u8; 2]; 4] = [[2, 4], [4, 2], [1, 3], [2, 4]];
    const ZE_CYCLE: [[u8; 2]; 4] = [[3, 1], [4, 2], [1, 3], [2, 4]];
    if level {
        if sen <= 3 { PING_INITIAL[sen] } else { PING_CYCLE[sen % 4] }
    } else if sen <= 3 {
        ZE_INITIAL[sen]
    } else {
        ZE_CYCLE[sen % 4]
    }
}

fn resolve(matched_lists: &[Vec<String>], total_lines: usize, first_rhyme: FirstLineRhyme, poem_tone: PoemTone) -> OpeningId {
    let mut match_time = 0usize;
    loop {
        let matched_list = &matched_lists[match_time];
        let changed_set: HashSet<u8> = matched_list.iter().map(|c| combo_rule(c)).collect();

        match first_rhyme {
            FirstLineRhyme::Level => {
                let current = current_pattern(match_time, true);
                let current_set: HashSet<u8> = current.iter().copied().collect();
                let intersection: Vec<u8> = changed_set.intersection(&current_set).copied().collect();
                if intersection.len() == 1 {
                    let value = intersection[0];
                    let place = current.iter().position(|&v| v == value).expect("value came from current");
                    return current_pattern(0, true)[place];
                }
            }
            FirstLineRhyme::Oblique => {
                let current = current_pattern(match_time, false);
                let current_set: HashSet<u8> = current.iter().copied().collect();
                let intersection: Vec<u8> = changed_set.intersection(&current_set).copied().collect();
                if intersection.len() == 1 {
                    let value = intersection[0];
                    let place = current.iter().position(|&v| v == value).expect("value came from current");
                    return current_pattern(0, false)[place];
                }
            }
            FirstLineRhyme::None => {
                if changed_set.len() == 1 && changed_set != HashSet::from([0]) {
                    let value = *changed_set.iter().next().expect("len checked above");
                    let mut result = i64::from(value) - i64::try_from(match_time).unwrap_or(0);
                    while result <= 0 {
                        result += 4;
                    }
                    return result as OpeningId;
                }
            }
        }

        if total_lines == match_time + 1 {
            if matched_list.is_empty() {
                return if matches!(poem_tone, PoemTone::Level) { 1 } else { 2 };
            }
            let mut co_rule = combo_rule(&matched_list[0]);
            if co_rule == 0 {
                co_rule = match (matched_list[0].as_str(), poem_tone) {
                    ("111", PoemTone::Level) => 1,
                    ("221", PoemTone::Level) => 3,
                    ("111", PoemTone::Oblique) => 2,
                    _ => 4,
                };
            }
            if matches!(co_rule, 2 | 4) && matches!(poem_tone, PoemTone::Level) {
                co_rule -= 1;
            }
            if matches!(co_rule, 1 | 3) && matches!(poem_tone, PoemTone::Oblique) {
                co_rule += 1;
            }
            return if matches!(first_rhyme, FirstLineRhyme::None) {
                (co_rule + 1) % 4
            } else {
                co_rule
            };
        }
        match_time += 1;
    }
}

/// Determines which of the eight canonical openings the poem's first line
/// uses, given every line of the poem (used to disambiguate a first line
/// that alone is consistent with more than one opening).
#[must_use]
pub fn infer_opening(lines: &[String], book: RhymeBook, first_rhyme: FirstLineRhyme, poem_tone: PoemTone) -> OpeningId {
    let matched_lists: Vec<Vec<String>> = lines
        .iter()
        .map(|line| match_combinations(&line_tone_string(line, book)))
        .collect();
    let opening = resolve(&matched_lists, lines.len(), first_rhyme, poem_tone);
    if lines[0].chars().count() == 5 { opening } else { opening + 4 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jueren_jiang_opening_from_pure_level_oblique_line() {
        let tone_string = "121";
        let combos = match_combinations(tone_string);
        assert_eq!(combos, vec!["121".to_owned()]);
    }

    #[test]
    fn wildcard_tone_matches_every_combination() {
        assert_eq!(match_combinations("000").len(), 8);
    }

    #[test]
    fn current_pattern_cycles_after_fourth_line() {
        assert_eq!(current_pattern(0, true), [1, 3]);
        assert_eq!(current_pattern(4, true), current_pattern(0, true));
    }
}
