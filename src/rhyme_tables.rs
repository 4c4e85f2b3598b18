//! Static rhyme-class data: the 106-class archaic book (with its derived
//! 19-class neighbor grouping), the modern-14/modern-16 books, and the
//! per-character readings the rest of the engine looks characters up in.
//!
//! The character coverage here is a curated, tested subset rather than a
//! full historical dictionary — see `DESIGN.md`. Extending it is a matter
//! of appending rows to `CHARACTERS`, not touching any lookup code.

use std::sync::LazyLock;

use crate::book::RhymeClassId;
use crate::tone::ToneCategory;

/// The 30 level-tone archaic classes, in the order this crate numbers them
/// (not the canonical 平水韵 ordering — see `DESIGN.md`'s neighbor-rhyme
/// note for why the two orderings are kept independent).
pub const LEVEL_CLASS_NAMES: [&str; 30] = [
    "东", "冬", "江", "支", "微", "鱼", "阳", "虞", "齐", "佳", "灰", "真", "文", "元", "寒", "删",
    "先", "萧", "肴", "豪", "歌", "麻", "庚", "青", "蒸", "尤", "侵", "覃", "盐", "咸",
];

/// The 29 rising-tone (上声) archaic classes.
pub const RISING_CLASS_NAMES: [&str; 29] = [
    "董", "肿", "讲", "纸", "尾", "语", "麌", "荠", "蟹", "贿", "轸", "吻", "阮", "旱", "潸", "铣",
    "筱", "巧", "皓", "哿", "马", "养", "梗", "迥", "有", "寝", "感", "俭", "豏",
];

/// The 30 departing-tone (去声) archaic classes.
pub const DEPARTING_CLASS_NAMES: [&str; 30] = [
    "送", "宋", "绛", "寘", "未", "御", "遇", "霁", "泰", "卦", "队", "震", "问", "愿", "翰", "谏",
    "霰", "啸", "效", "号", "个", "祃", "漾", "敬", "径", "宥", "沁", "勘", "艳", "陷",
];

/// The 17 entering-tone (入声) archaic classes.
pub const ENTERING_CLASS_NAMES: [&str; 17] = [
    "屋", "沃", "觉", "质", "物", "月", "曷", "黠", "屑", "药", "陌", "锡", "职", "缉", "合", "叶",
    "洽",
];

const LEVEL_START: RhymeClassId = 1;
const RISING_START: RhymeClassId = LEVEL_START + LEVEL_CLASS_NAMES.len() as RhymeClassId;
const DEPARTING_START: RhymeClassId = RISING_START + RISING_CLASS_NAMES.len() as RhymeClassId;
const ENTERING_START: RhymeClassId = DEPARTING_START + DEPARTING_CLASS_NAMES.len() as RhymeClassId;
pub const ARCHAIC_CLASS_COUNT: RhymeClassId =
    ENTERING_START + ENTERING_CLASS_NAMES.len() as RhymeClassId - 1;

/// Tone super-category an archaic class id falls into, and the display
/// name for that id.
#[must_use]
pub fn archaic_class_name(id: RhymeClassId) -> Option<&'static str> {
    if (LEVEL_START..RISING_START).contains(&id) {
        Some(LEVEL_CLASS_NAMES[(id - LEVEL_START) as usize])
    } else if (RISING_START..DEPARTING_START).contains(&id) {
        Some(RISING_CLASS_NAMES[(id - RISING_START) as usize])
    } else if (DEPARTING_START..ENTERING_START).contains(&id) {
        Some(DEPARTING_CLASS_NAMES[(id - DEPARTING_START) as usize])
    } else if (ENTERING_START..=ARCHAIC_CLASS_COUNT).contains(&id) {
        Some(ENTERING_CLASS_NAMES[(id - ENTERING_START) as usize])
    } else {
        None
    }
}

#[must_use]
pub fn archaic_class_tone(id: RhymeClassId) -> ToneCategory {
    if (LEVEL_START..RISING_START).contains(&id) {
        ToneCategory::Level
    } else if (RISING_START..=ARCHAIC_CLASS_COUNT).contains(&id) {
        ToneCategory::Oblique
    } else {
        ToneCategory::Unknown
    }
}

fn level_class_id(name: &str) -> RhymeClassId {
    LEVEL_CLASS_NAMES
        .iter()
        .position(|&n| n == name)
        .map_or(0, |i| LEVEL_START + i as RhymeClassId)
}

fn rising_class_id(name: &str) -> RhymeClassId {
    RISING_CLASS_NAMES
        .iter()
        .position(|&n| n == name)
        .map_or(0, |i| RISING_START + i as RhymeClassId)
}

fn departing_class_id(name: &str) -> RhymeClassId {
    DEPARTING_CLASS_NAMES
        .iter()
        .position(|&n| n == name)
        .map_or(0, |i| DEPARTING_START + i as RhymeClassId)
}

fn entering_class_id(name: &str) -> RhymeClassId {
    ENTERING_CLASS_NAMES
        .iter()
        .position(|&n| n == name)
        .map_or(0, |i| ENTERING_START + i as RhymeClassId)
}

/// The derived 19-class (词林正韵) grouping, restricted to the neighbor
/// relation actually used by the first-line leniency rule: which other
/// level-tone archaic classes count as the same "neighbor rhyme" group.
/// Keyed by level-class name rather than this crate's numbering, since the
/// relation is ported directly from the canonical 平水韵 ordering.
const LEVEL_NEIGHBOR_GROUPS: &[(&str, &[u8])] = &[
    ("东", &[1]),
    ("冬", &[1]),
    ("江", &[2]),
    ("支", &[3]),
    ("微", &[3]),
    ("鱼", &[4]),
    ("虞", &[4]),
    ("齐", &[3]),
    ("佳", &[5, 10]),
    ("灰", &[3, 5]),
    ("真", &[6]),
    ("文", &[6]),
    ("元", &[6, 7]),
    ("寒", &[7]),
    ("删", &[7]),
    ("先", &[7]),
    ("萧", &[8]),
    ("肴", &[8]),
    ("豪", &[8]),
    ("歌", &[9]),
    ("麻", &[10]),
    ("阳", &[2]),
    ("庚", &[11]),
    ("青", &[11]),
    ("蒸", &[11]),
    ("尤", &[12]),
    ("侵", &[13]),
    ("覃", &[14]),
    ("盐", &[14]),
    ("咸", &[14]),
];

fn neighbor_group(class_id: RhymeClassId) -> Option<&'static [u8]> {
    let name = archaic_class_name(class_id)?;
    LEVEL_NEIGHBOR_GROUPS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, groups)| *groups)
}

/// True if two level-tone archaic classes share a 19-class neighbor group
/// (the leniency `rhyme_checker` grants the first line of an archaic-book
/// poem).
#[must_use]
pub fn are_archaic_neighbors(a: RhymeClassId, b: RhymeClassId) -> bool {
    if a == b {
        return true;
    }
    match (neighbor_group(a), neighbor_group(b)) {
        (Some(ga), Some(gb)) => ga.iter().any(|g| gb.contains(g)),
        _ => false,
    }
}

/// Display names for the 14 modern (新韵) classes, index 0 = class id 1.
pub const MODERN14_NAMES: [&str; 14] = [
    "麻", "波", "皆", "开", "微", "豪", "尤", "寒", "文", "唐", "庚", "齐", "支", "姑",
];

/// Display names for the 16 modern (通韵) classes, index 0 = class id 1.
pub const MODERN16_NAMES: [&str; 16] = [
    "啊", "喔", "鹅", "衣", "乌", "迂", "哀", "欸", "熬", "欧", "安", "恩", "昂", "英", "雍", "儿",
];

/// Display name for a modern-book class id (1-indexed), `book_is_14`
/// selecting which of the two name tables to read.
#[must_use]
pub fn modern_class_name(book_is_14: bool, class: RhymeClassId) -> Option<&'static str> {
    let names: &[&str] = if book_is_14 { &MODERN14_NAMES } else { &MODERN16_NAMES };
    class.checked_sub(1).and_then(|i| names.get(i as usize).copied())
}

/// Pinyin-final → (modern-14-class-id, modern-16-class-id). The tone flag
/// named in the schema is not carried here: it comes from the syllable's
/// own tone digit, not from the final.
#[must_use]
pub const fn pinyin_final_classes(final_: &str) -> Option<(RhymeClassId, RhymeClassId)> {
    Some(match final_.as_bytes() {
        b"a" | b"ia" | b"ua" => (1, 1),
        b"o" | b"uo" => (2, 2),
        b"e" => (2, 3),
        b"ie" | b"ue" | b"ve" => (3, 3),
        b"ai" | b"uai" => (4, 7),
        b"ei" | b"uei" | b"ui" => (5, 8),
        b"ao" | b"iao" => (6, 9),
        b"ou" | b"iu" | b"iou" => (7, 10),
        b"an" | b"ian" | b"uan" | b"van" => (8, 11),
        b"en" | b"in" | b"un" | b"vn" | b"uen" => (9, 12),
        b"ang" | b"iang" | b"uang" => (10, 13),
        b"ueng" => (11, 14),
        b"eng" | b"ing" => (11, 14),
        b"ong" | b"iong" => (11, 15),
        b"i" => (12, 4),
        b"er" => (12, 16),
        b"v" => (12, 6),
        b"-i" => (13, 4),
        b"u" => (14, 5),
        _ => return None,
    })
}

/// One archaic reading of a character: its tone super-category (implied by
/// `class`) and the 106-class id itself.
#[derive(Debug, Clone, Copy)]
pub struct ArchaicReading {
    pub class: RhymeClassId,
}

impl ArchaicReading {
    #[must_use]
    pub fn tone(self) -> ToneCategory {
        archaic_class_tone(self.class)
    }
}

/// One modern reading of a character: the tone it carries in that reading,
/// its class in both modern books (finals group the same way across most
/// classes, so both are stored rather than re-derived each lookup), and the
/// raw pinyin final itself, kept around for tone-marked diagnostic display.
#[derive(Debug, Clone, Copy)]
pub struct ModernReading {
    pub tone: ToneCategory,
    pub modern14_class: RhymeClassId,
    pub modern16_class: RhymeClassId,
    pub final_: &'static str,
}

/// All recorded readings for one character. A character with more than one
/// archaic reading of differing tone super-categories is polyphonic for the
/// purposes of `oracle::tone`.
pub struct CharacterEntry {
    pub ch: char,
    pub archaic: Vec<ArchaicReading>,
    pub modern: Vec<ModernReading>,
}

/// Resolves a class name to its id by trying each of the four archaic
/// tables in turn; names are unique across all four.
fn archaic_id(name: &str) -> RhymeClassId {
    let id = level_class_id(name);
    if id != 0 {
        return id;
    }
    let id = rising_class_id(name);
    if id != 0 {
        return id;
    }
    let id = departing_class_id(name);
    if id != 0 {
        return id;
    }
    entering_class_id(name)
}

fn reading(name: &str) -> ArchaicReading {
    ArchaicReading { class: archaic_id(name) }
}

/// Builds one modern reading from a tone and a pinyin final, resolving the
/// final through `pinyin_final_classes` so the finals stay the single
/// source of truth for which modern class a character belongs to.
fn modern_reading(tone: ToneCategory, final_: &'static str) -> ModernReading {
    let (modern14_class, modern16_class) = pinyin_final_classes(final_)
        .expect("modern_reading called with a final absent from both modern books");
    ModernReading { tone, modern14_class, modern16_class, final_ }
}

fn build_characters() -> Vec<CharacterEntry> {
    let entry = |ch: char, names: &[&str]| CharacterEntry {
        ch,
        archaic: names.iter().map(|n| reading(n)).collect(),
        modern: Vec::new(),
    };
    let mut characters = vec![
        entry('床', &["阳"]),
        entry('前', &["先"]),
        entry('明', &["庚"]),
        entry('月', &["月"]),
        entry('光', &["阳"]),
        entry('疑', &["支"]),
        entry('是', &["寘"]),
        entry('地', &["寘"]),
        entry('上', &["漾"]),
        entry('霜', &["阳"]),
        entry('举', &["语"]),
        entry('头', &["尤"]),
        entry('望', &["漾"]),
        entry('低', &["齐"]),
        entry('思', &["支"]),
        entry('故', &["遇"]),
        entry('乡', &["阳"]),
        entry('白', &["陌"]),
        entry('日', &["质"]),
        entry('依', &["微"]),
        entry('山', &["删"]),
        entry('尽', &["震"]),
        entry('黄', &["阳"]),
        entry('河', &["歌"]),
        entry('入', &["缉"]),
        entry('海', &["贿"]),
        entry('欲', &["沃"]),
        entry('穷', &["东"]),
        entry('千', &["先"]),
        entry('里', &["纸"]),
        entry('目', &["屋"]),
        entry('更', &["敬"]),
        entry('层', &["蒸"]),
        entry('春', &["真"]),
        entry('眠', &["先"]),
        entry('不', &["屋"]),
        entry('觉', &["觉"]),
        entry('处', &["御"]),
        entry('闻', &["文"]),
        entry('啼', &["齐"]),
        entry('夜', &["祃"]),
        entry('来', &["灰"]),
        entry('风', &["东"]),
        entry('雨', &["语"]),
        entry('声', &["庚"]),
        entry('花', &["麻"]),
        entry('落', &["药"]),
        entry('知', &["支"]),
        entry('多', &["歌"]),
        entry('间', &["删"]),
        entry('一', &["质"]),
        entry('壶', &["虞"]),
        entry('酒', &["有"]),
        entry('看', &["寒", "翰"]),
        entry('过', &["歌", "个"]),
        entry('楼', &["尤"]),
        entry('流', &["尤"]),
        entry('晓', &["筱"]),
        entry('鸟', &["筱"]),
        entry('少', &["筱"]),
    ];

    let yang_level = modern_reading(ToneCategory::Level, "uang");
    let you_liu = modern_reading(ToneCategory::Level, "iu");
    let you_lou = modern_reading(ToneCategory::Level, "ou");
    let xiao_iao = modern_reading(ToneCategory::Oblique, "iao");
    let xiao_ao = modern_reading(ToneCategory::Oblique, "ao");
    for c in &mut characters {
        c.modern = match c.ch {
            '光' | '霜' | '乡' | '黄' => vec![yang_level],
            '流' => vec![you_liu],
            '楼' => vec![you_lou],
            '晓' | '鸟' => vec![xiao_iao],
            '少' => vec![xiao_ao],
            _ => Vec::new(),
        };
    }
    characters
}

/// The character table backing `oracle`. See module docs for coverage
/// scope: every character used by the seed scoring scenarios, plus a
/// sample of other common classical-verse vocabulary.
pub static CHARACTERS: LazyLock<Vec<CharacterEntry>> = LazyLock::new(build_characters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_class_seven_is_yang() {
        assert_eq!(level_class_id("阳"), 7);
    }

    #[test]
    fn archaic_class_count_matches_pingshui() {
        assert_eq!(ARCHAIC_CLASS_COUNT, 106);
    }

    #[test]
    fn tone_by_super_category() {
        assert_eq!(archaic_class_tone(level_class_id("阳")), ToneCategory::Level);
        assert_eq!(
            archaic_class_tone(rising_class_id("筱")),
            ToneCategory::Oblique
        );
        assert_eq!(
            archaic_class_tone(departing_class_id("寘")),
            ToneCategory::Oblique
        );
        assert_eq!(
            archaic_class_tone(entering_class_id("月")),
            ToneCategory::Oblique
        );
    }

    #[test]
    fn yang_class_is_its_own_neighbor() {
        let yang = level_class_id("阳");
        assert!(are_archaic_neighbors(yang, yang));
    }

    #[test]
    fn pinyin_final_resolves_modern_classes() {
        assert_eq!(pinyin_final_classes("uang"), Some((10, 13)));
        assert_eq!(pinyin_final_classes("zzz"), None);
    }
}
