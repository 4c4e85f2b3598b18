//! Classifies a split poem (plus its optional title) into one of the four
//! recognised forms, or rejects it with a reason.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::common;
use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoemForm {
    FiveJueju,
    SevenJueju,
    FiveLvshi,
    SevenLvshi,
}

impl PoemForm {
    #[must_use]
    pub fn line_length(self) -> usize {
        match self {
            PoemForm::FiveJueju | PoemForm::FiveLvshi => config::FIVE_CHAR_LINE,
            PoemForm::SevenJueju | PoemForm::SevenLvshi => config::SEVEN_CHAR_LINE,
        }
    }

    #[must_use]
    pub fn total_lines(self) -> usize {
        match self {
            PoemForm::FiveJueju | PoemForm::SevenJueju => config::JUEJU_LINES,
            PoemForm::FiveLvshi | PoemForm::SevenLvshi => config::LVSHI_LINES,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PoemForm::FiveJueju => "五言绝句",
            PoemForm::SevenJueju => "七言绝句",
            PoemForm::FiveLvshi => "五言律诗",
            PoemForm::SevenLvshi => "七言律诗",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Not 4 lines and not in the 7-9 line band a regulated-verse poem
    /// (with a couple of OCR-dropped or merged lines) could still be.
    LineCount,
    /// Too few lines have a length the per-character CJK count agrees with.
    InconsistentLineLength,
    /// Title marks this as one piece of a multi-poem series.
    Series,
    /// Title marks this as a 词 (lyric to a fixed tune), a different form.
    CiLyric,
    /// Lines carry a 联句/variant marker (`--`, `〔`, `［`) rather than a
    /// single clean reading.
    InterLineMarker,
}

/// Markers that indicate the lines are a 联句 (linked-verse) or variant
/// layout rather than a single clean poem.
const INTER_LINE_MARKERS: &[&str] = &["--", "〔", "［"];

/// Titles naming a well-known multi-part sequence, e.g. 《秋兴八首》, where
/// each part is conventionally quoted on its own rather than as "the poem".
const SERIES_WHITELIST: &[&str] = &["秋兴八首", "咏怀古迹五首", "诸将五首", "羌村三首"];

static SERIES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*[一二三四五六七八九十\d]+[首篇章阕]").expect("valid regex"));

static PART_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"其[一二三四五六七八九十\d]+",
        r"第[一二三四五六七八九十\d]+首",
        r"[（(]其[一二三四五六七八九十\d]+[）)]",
        r"[一二三四五六七八九十\d]+[/／][一二三四五六七八九十\d]+",
        r"组诗",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// A representative sample of fixed-tune (词牌) names; a full list would
/// run into the hundreds, but "title is this exact tune name" is already
/// the dominant signal in practice.
const CI_KEYWORDS: &[&str] = &[
    "浣溪沙", "虞美人", "蝶恋花", "水调歌头", "念奴娇", "满江红", "卜算子", "如梦令", "西江月",
    "菩萨蛮", "一剪梅", "清平乐", "渔家傲", "长相思", "鹊桥仙", "临江仙", "木兰花", "定风波",
    "沁园春", "江城子",
];

/// Suffixes that mark a title as a poem (诗) even when it also matches a
/// ci-lyric marker character, since `is_likely_ci`'s marker-character check
/// would otherwise false-positive on e.g. 《醉歌行》.
const POEM_ENDINGS: &[&str] = &["诗", "吟", "歌", "行", "引", "谣", "篇", "辞"];

static CI_MARKER_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[令引近慢犯摊破减字]").expect("valid regex"));

/// Parses a declared-form string in the four recognised Chinese forms
/// (`"五言绝句"`, `"七言绝句"`, `"五言律诗"`, `"七言律诗"`); anything else is `None`.
#[must_use]
pub fn parse_declared_form(instruct: &str) -> Option<PoemForm> {
    let five = instruct.contains('五');
    let seven = instruct.contains('七');
    let jueju = instruct.contains('绝');
    let lvshi = instruct.contains('律');
    match (five, seven, jueju, lvshi) {
        (true, _, true, _) => Some(PoemForm::FiveJueju),
        (_, true, true, _) => Some(PoemForm::SevenJueju),
        (true, _, _, true) => Some(PoemForm::FiveLvshi),
        (_, true, _, true) => Some(PoemForm::SevenLvshi),
        _ => None,
    }
}

#[must_use]
pub fn is_part_of_series(title: &str) -> bool {
    SERIES_WHITELIST.iter().any(|w| title.contains(w))
        || SERIES_PATTERN.is_match(title)
        || PART_PATTERNS.iter().any(|p| p.is_match(title))
}

#[must_use]
pub fn is_likely_ci(title: &str) -> bool {
    if CI_KEYWORDS.iter().any(|k| title.contains(k)) {
        return true;
    }
    if CI_MARKER_CHAR.is_match(title) {
        return true;
    }
    title.chars().count() > 2 && !POEM_ENDINGS.iter().any(|e| title.ends_with(e))
}

fn dominant_length(lines: &[String]) -> Option<(usize, usize)> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for line in lines {
        *counts.entry(common::extract_hanzi_only(line).chars().count())
            .or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|&(len, _)| len == 5 || len == 7)
        .max_by_key(|&(_, count)| count)
}

/// Classifies a poem already split into lines. `title` is optional; when
/// present it can reject a series entry or a 词 lyric before the per-line
/// length check even runs.
///
/// # Errors
/// Returns the specific reason the poem doesn't fit any recognised form.
pub fn classify_poem(lines: &[String], title: Option<&str>) -> Result<PoemForm, RejectReason> {
    if lines.iter().any(|l| INTER_LINE_MARKERS.iter().any(|m| l.contains(m))) {
        return Err(RejectReason::InterLineMarker);
    }

    if let Some(title) = title {
        if is_part_of_series(title) {
            return Err(RejectReason::Series);
        }
        if is_likely_ci(title) {
            return Err(RejectReason::CiLyric);
        }
    }

    let is_jueju = lines.len() == config::JUEJU_LINES;
    let is_lvshi = (config::LVSHI_LINES - 1..=config::LVSHI_LINES + 1).contains(&lines.len());
    if !is_jueju && !is_lvshi {
        return Err(RejectReason::LineCount);
    }

    let Some((main_length, main_count)) = dominant_length(lines) else {
        return Err(RejectReason::InconsistentLineLength);
    };

    let required_main_count = if is_jueju { 3 } else { 5 };
    if main_count < required_main_count {
        return Err(RejectReason::InconsistentLineLength);
    }

    let valid_count = lines
        .iter()
        .filter(|line| {
            let len = common::extract_hanzi_only(line).chars().count();
            len.abs_diff(main_length) <= 1
        })
        .count();
    let nominal_lines = if is_jueju { config::JUEJU_LINES } else { config::LVSHI_LINES };
    let required_valid_count = config::min_matching_lines(nominal_lines).unwrap_or(valid_count);
    if valid_count < required_valid_count {
        return Err(RejectReason::InconsistentLineLength);
    }

    Ok(match (is_jueju, main_length) {
        (true, 5) => PoemForm::FiveJueju,
        (true, _) => PoemForm::SevenJueju,
        (false, 5) => PoemForm::FiveLvshi,
        (false, _) => PoemForm::SevenLvshi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(poem: &str) -> Vec<String> {
        poem.split('\n').map(str::to_owned).collect()
    }

    #[test]
    fn recognises_five_jueju() {
        let l = lines("床前明月光\n疑是地上霜\n举头望明月\n低头思故乡");
        assert_eq!(classify_poem(&l, None), Ok(PoemForm::FiveJueju));
    }

    #[test]
    fn recognises_seven_jueju() {
        let l = lines("白日依山尽千里\n黄河入海流更远\n欲穷千里目更高\n更上一层楼顶峰");
        assert_eq!(classify_poem(&l, None), Ok(PoemForm::SevenJueju));
    }

    #[test]
    fn rejects_wrong_line_count() {
        let l = lines("床前明月光\n疑是地上霜\n举头望明月");
        assert_eq!(classify_poem(&l, None), Err(RejectReason::LineCount));
    }

    #[test]
    fn rejects_series_title() {
        let l = lines("床前明月光\n疑是地上霜\n举头望明月\n低头思故乡");
        assert_eq!(
            classify_poem(&l, Some("秋兴八首 其一")),
            Err(RejectReason::Series)
        );
    }

    #[test]
    fn parses_all_four_declared_forms() {
        assert_eq!(parse_declared_form("五言绝句"), Some(PoemForm::FiveJueju));
        assert_eq!(parse_declared_form("七言绝句"), Some(PoemForm::SevenJueju));
        assert_eq!(parse_declared_form("五言律诗"), Some(PoemForm::FiveLvshi));
        assert_eq!(parse_declared_form("七言律诗"), Some(PoemForm::SevenLvshi));
        assert_eq!(parse_declared_form("水调歌头"), None);
    }

    #[test]
    fn rejects_ci_by_tune_name() {
        let l = lines("床前明月光\n疑是地上霜\n举头望明月\n低头思故乡");
        assert_eq!(classify_poem(&l, Some("水调歌头")), Err(RejectReason::CiLyric));
    }

    #[test]
    fn rejects_lines_with_an_inter_line_marker() {
        let l = lines("床前明月光\n疑是地上霜--举头望明月\n低头思故乡\n第四句");
        assert_eq!(classify_poem(&l, None), Err(RejectReason::InterLineMarker));
    }
}
