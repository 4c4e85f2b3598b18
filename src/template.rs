//! The eight canonical line-opening templates and the successor maps that
//! turn a known first line into the expected shape of every other line in
//! the poem. Patterns are written in the '0'/'1'/'2' encoding ('0' = 中,
//! either tone is fine; '1' = 平, level; '2' = 仄, oblique) the same way the
//! rhyme-class tables keep their source ordering: a faithful port of data,
//! not a reinterpretation of it.
//!
//! Openings 1-4 are 平起 (the second character of the first line is level)
//! and openings 5-8 are the same four shifted one step, 仄起. Within each
//! opening the last pattern listed is a rescued ("拗") variant and must be
//! tried only after the plain ones have failed to match, which is why
//! [`patterns_for`] always returns patterns in this fixed order.

pub type OpeningId = u8;

/// Patterns for a five-character opening, '0'/'1'/'2' encoded, plain
/// variants first and the rescued variant (if any) last.
fn base_patterns(opening: OpeningId, oblique_rhyme: bool) -> &'static [&'static str] {
    match (opening, oblique_rhyme) {
        (1, false) => &["11221", "21121", "11121"],
        (1, true) => &["11221", "21121", "11121", "21221"],
        (2, _) => &["01122", "11212"],
        (3, _) => &["02211"],
        (4, false) => &["02012", "02022"],
        (4, true) => &["02012"],
        (5, false) => &["0211221", "0221121", "0211121"],
        (5, true) => &["0211221", "0221121", "0211121"],
        (6, _) => &["0201122", "0211212"],
        (7, _) => &["0102211"],
        (8, false) => &["0102012", "0102022"],
        (8, true) => &["0102012"],
        _ => &[],
    }
}

/// Patterns for `opening`, given the poem's rhyme direction and whether the
/// previous line was flagged as needing couplet-rescue (in which case only
/// the last patterns - the rescued ones - are eligible).
#[must_use]
pub fn patterns_for(opening: OpeningId, oblique_rhyme: bool, awaiting_couplet_rescue: bool) -> &'static [&'static str] {
    let patterns = base_patterns(opening, oblique_rhyme);
    if awaiting_couplet_rescue && patterns.len() >= 2 {
        &patterns[patterns.len() - 2..]
    } else {
        patterns
    }
}

/// What input_flag a matched pattern sets for the following line: a line
/// matching "中仄中仄仄" asks its couplet partner to rescue it, a line
/// matching "平平仄平仄" has already rescued itself.
#[must_use]
pub fn rescue_flag_for_pattern(pattern: &str) -> RescueFlag {
    match pattern {
        "02022" | "0102022" => RescueFlag::AwaitingCoupletRescue,
        "11212" | "0211212" => RescueFlag::SelfRescued,
        _ => RescueFlag::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescueFlag {
    None,
    SelfRescued,
    AwaitingCoupletRescue,
}

/// Opening id of the line that follows a line of `opening`, for lines after
/// the first.
#[must_use]
pub fn turn_rule(opening: OpeningId, level_rhyme: bool) -> OpeningId {
    if level_rhyme {
        match opening {
            1 => 2,
            2 => 3,
            3 => 4,
            4 => 1,
            5 => 6,
            6 => 7,
            7 => 8,
            8 => 5,
            other => other,
        }
    } else {
        match opening {
            2 => 1,
            3 => 2,
            4 => 3,
            1 => 4,
            6 => 5,
            7 => 6,
            8 => 7,
            5 => 8,
            other => other,
        }
    }
}

/// Opening id of the second line, given a rhyming first line of `opening`.
#[must_use]
pub fn first_rule(opening: OpeningId, level_rhyme: bool) -> OpeningId {
    if level_rhyme {
        match opening {
            1 => 3,
            2 => 4,
            3 => 1,
            4 => 2,
            5 => 7,
            6 => 8,
            7 => 5,
            8 => 6,
            other => other,
        }
    } else {
        match opening {
            3 => 1,
            4 => 2,
            1 => 3,
            2 => 4,
            7 => 5,
            8 => 6,
            5 => 7,
            6 => 8,
            other => other,
        }
    }
}

/// Opening id of every line of the poem, derived from the first line's
/// opening the way the rest of the poem is expected to mirror and alternate
/// from it.
#[must_use]
pub fn line_openings(first_opening: OpeningId, total_lines: usize, first_line_rhymes: bool, level_rhyme: bool) -> Vec<OpeningId> {
    let mut openings = Vec::with_capacity(total_lines);
    let mut current = first_opening;
    for i in 0..total_lines {
        openings.push(current);
        current = if first_line_rhymes && i == 0 {
            first_rule(current, level_rhyme)
        } else {
            turn_rule(current, level_rhyme)
        };
    }
    openings
}
