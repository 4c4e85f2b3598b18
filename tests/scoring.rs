use gelv::book::RhymeBook;
use gelv::classifier::PoemForm;
use gelv::engine::score_poem;

#[test]
fn jueju_with_modern_rhyme_system_carries_a_class_label() {
    let result = score_poem(
        "床前明月光，疑是地上霜。举头望明月，低头思故乡。",
        Some(PoemForm::FiveJueju),
        RhymeBook::Modern14,
    );
    assert_eq!(result.form_score, 100.0);
    let label = result.report.and_then(|r| r.rhyme_class_label());
    assert!(label.as_deref().is_some_and(|l| l.contains("唐")));
}

#[test]
fn eight_line_poem_checks_all_four_rhyme_positions() {
    // Two five-character quatrains back to back: a regulated-verse shape
    // whose second half rhymes on a different class (尤) than its first
    // (阳), so every rhyme position gets checked but not every one rhymes.
    let poem = "床前明月光\n疑是地上霜\n举头望明月\n低头思故乡\n\
                白日依山尽\n黄河入海流\n欲穷千里目\n更上一层楼";
    let result = score_poem(poem, Some(PoemForm::FiveLvshi), RhymeBook::Archaic);
    assert_eq!(result.observed_form, Some(PoemForm::FiveLvshi));
    let report = result.report.expect("regulated verse should produce a report");
    // 光 (line 1's ending) also joins the 阳 class, so the first line counts
    // as rhyme-checked too: five positions checked, only three actually rhyme.
    assert_eq!(report.rhyme_checked_count(), 5);
    assert_eq!(report.rhymed_count(), 3);
}

#[test]
fn undeclared_form_scores_zero_format_but_still_checks_tone_and_rhyme() {
    let result = score_poem("床前明月光，疑是地上霜。举头望明月，低头思故乡。", None, RhymeBook::Archaic);
    assert_eq!(result.form_score, 0.0);
    assert_eq!(result.tone_score, 100.0);
    assert_eq!(result.rhyme_score, 100.0);
}

#[test]
fn selected_book_only_changes_the_headline_rhyme_score() {
    let poem = "床前明月光，疑是地上霜。举头望明月，低头思故乡。";
    let pingshui = score_poem(poem, Some(PoemForm::FiveJueju), RhymeBook::Archaic);
    let xin = score_poem(poem, Some(PoemForm::FiveJueju), RhymeBook::Modern14);
    assert_eq!(pingshui.tone_score, xin.tone_score);
    assert_eq!(pingshui.rhyme_score_pingshui, xin.rhyme_score_pingshui);
    assert_eq!(pingshui.rhyme_score, pingshui.rhyme_score_pingshui);
    assert_eq!(xin.rhyme_score, xin.rhyme_score_xin);
}

#[test]
fn series_title_text_does_not_affect_the_pure_scoring_entry_point() {
    // score_poem takes no title; a poem that would be rejected as a series
    // entry by the classifier alone still scores normally here.
    let result = score_poem("床前明月光，疑是地上霜。举头望明月，低头思故乡。", Some(PoemForm::FiveJueju), RhymeBook::Archaic);
    assert_eq!(result.observed_form, Some(PoemForm::FiveJueju));
}
