//! Ties the line splitter, form classifier, first-line inferrer, line
//! matcher, rhyme checker, candidate arbiter and scorer into one pure
//! entry point: text in, scores and an optional annotated report out.
//!
//! Tone scoring always runs against the archaic book regardless of which
//! book the caller selected for rhyme scoring (the selected book only
//! picks which of the three rhyme scores becomes the headline
//! `rhyme_score`) — this mirrors how the source tool always measures
//! tonal correctness off its 平水韵 pass and treats the other two books as
//! rhyme-only alternates.

use crate::arbiter;
use crate::book::{RhymeBook, RhymeClassId};
use crate::classifier::{self, PoemForm};
use crate::common;
use crate::first_line::{self, FirstLineRhyme, PoemTone};
use crate::matcher;
use crate::report::{LineReport, PoemReport};
use crate::rhyme_checker;
use crate::scorer;
use crate::splitter;
use crate::template::{self, RescueFlag};

#[derive(Debug, Clone)]
pub struct EngineResult {
    pub observed_form: Option<PoemForm>,
    pub form_score: f64,
    pub tone_score: f64,
    pub rhyme_score_pingshui: f64,
    pub rhyme_score_xin: f64,
    pub rhyme_score_tong: f64,
    pub rhyme_score: f64,
    pub report: Option<PoemReport>,
}

impl EngineResult {
    #[must_use]
    pub fn aggregate_score(&self) -> f64 {
        scorer::aggregate(self.form_score, self.tone_score, self.rhyme_score)
    }
}

fn declared_is_jueju(declared: PoemForm) -> bool {
    matches!(declared, PoemForm::FiveJueju | PoemForm::SevenJueju)
}

fn compute_form_score(hanzi_total: usize, declared: Option<PoemForm>) -> f64 {
    let Some(declared) = declared else { return 0.0 };
    if hanzi_total == 0 {
        return 0.0;
    }
    let (actual_len, actual_lines) = if hanzi_total % 5 == 0 {
        (5, hanzi_total / 5)
    } else if hanzi_total % 7 == 0 {
        (7, hanzi_total / 7)
    } else {
        return 0.0;
    };
    let length_matches = declared.line_length() == actual_len;
    let type_matches = if actual_lines == 4 {
        declared_is_jueju(declared)
    } else if actual_lines == 8 {
        !declared_is_jueju(declared)
    } else {
        false
    };
    scorer::form_score(length_matches, type_matches)
}

/// Builds the full structured report for one (book, tone-direction)
/// candidate, threading the rescue carry flag sequentially through the
/// lines and resetting it at the start of every couplet.
fn build_report(
    lines: &[String],
    form: PoemForm,
    book: RhymeBook,
    main_class: RhymeClassId,
    tone: PoemTone,
    first_rhyme: FirstLineRhyme,
    first_line_via_neighbor: bool,
) -> PoemReport {
    let oblique_rhyme = matches!(tone, PoemTone::Oblique);
    let first_line_rhymes = !matches!(first_rhyme, FirstLineRhyme::None);
    let opening = first_line::infer_opening(lines, book, first_rhyme, tone);
    let openings = template::line_openings(opening, lines.len(), first_line_rhymes, matches!(tone, PoemTone::Level));

    let mut awaiting_rescue = false;
    let mut line_reports = Vec::with_capacity(lines.len());
    for (idx, (line, &opening_id)) in lines.iter().zip(&openings).enumerate() {
        let carry_in = if idx % 2 == 0 { false } else { awaiting_rescue };
        let match_result = matcher::match_line(line, opening_id, oblique_rhyme, carry_in, book);
        awaiting_rescue = matches!(match_result.rescue, RescueFlag::AwaitingCoupletRescue);

        let is_rhyme_line = idx % 2 == 1 || (idx == 0 && first_line_rhymes);
        let (rhymes, via_neighbor) = if idx == 0 {
            (first_line_rhymes, first_line_via_neighbor)
        } else if is_rhyme_line {
            let last = line.chars().last();
            let rhymes = last.is_some_and(|ch| crate::oracle::classes(ch, book).contains(&main_class));
            (rhymes, false)
        } else {
            (false, false)
        };

        line_reports.push(LineReport {
            text: line.clone(),
            match_result,
            rhyme_checked: is_rhyme_line,
            rhymes,
            via_neighbor_rhyme: via_neighbor,
        });
    }

    PoemReport { form, book, tone, rhyme_class: main_class, lines: line_reports }
}

/// Runs the full tonal + rhyme pipeline for one book, trying both tone
/// directions when the rhyme word itself is ambiguous and returning
/// whichever candidate the arbiter prefers.
fn run_book(lines: &[String], form: PoemForm, book: RhymeBook) -> Option<PoemReport> {
    let analysis = rhyme_checker::analyze(lines, book).ok()?;
    let tone_candidates = if analysis.ambiguous_tone { vec![PoemTone::Level, PoemTone::Oblique] } else { vec![analysis.tone] };

    let reports: Vec<PoemReport> = tone_candidates
        .into_iter()
        .map(|tone| {
            let (first_rhyme, via_neighbor) = if analysis.ambiguous_tone {
                rhyme_checker::first_line_rhyme(lines, book, analysis.main_class, tone)
            } else {
                (analysis.first_line, analysis.first_line_via_neighbor)
            };
            build_report(lines, form, book, analysis.main_class, tone, first_rhyme, via_neighbor)
        })
        .collect();

    arbiter::best_of(reports)
}

/// Scores `text` against `declared` (the poem's declared form, if any)
/// under `selected_book` (which of the three rhyme scores becomes the
/// headline `rhyme_score`).
#[must_use]
pub fn score_poem(text: &str, declared: Option<PoemForm>, selected_book: RhymeBook) -> EngineResult {
    let hanzi_total = common::extract_hanzi_only(text).chars().count();
    let form_score = compute_form_score(hanzi_total, declared);

    let lines = splitter::split_into_lines(text);
    let observed_form = lines.as_ref().and_then(|l| classifier::classify_poem(l, None).ok());

    let Some((lines, form)) = lines.zip(observed_form) else {
        return EngineResult {
            observed_form: None,
            form_score,
            tone_score: 0.0,
            rhyme_score_pingshui: 0.0,
            rhyme_score_xin: 0.0,
            rhyme_score_tong: 0.0,
            rhyme_score: 0.0,
            report: None,
        };
    };

    let archaic_report = run_book(&lines, form, RhymeBook::Archaic);
    let tone_score = archaic_report.as_ref().map_or(0.0, scorer::tone_score);

    let score_for = |book: RhymeBook| -> (f64, Option<PoemReport>) {
        let report = if book == RhymeBook::Archaic { archaic_report.clone() } else { run_book(&lines, form, book) };
        let score = report.as_ref().map_or(0.0, |r| scorer::rhyme_score(lines.len(), r.rhymed_count()));
        (score, report)
    };

    let (rhyme_score_pingshui, pingshui_report) = score_for(RhymeBook::Archaic);
    let (rhyme_score_xin, xin_report) = score_for(RhymeBook::Modern14);
    let (rhyme_score_tong, tong_report) = score_for(RhymeBook::Modern16);

    let (rhyme_score, report) = match selected_book {
        RhymeBook::Archaic => (rhyme_score_pingshui, pingshui_report),
        RhymeBook::Modern14 => (rhyme_score_xin, xin_report),
        RhymeBook::Modern16 => (rhyme_score_tong, tong_report),
    };

    EngineResult {
        observed_form: Some(form),
        form_score,
        tone_score,
        rhyme_score_pingshui,
        rhyme_score_xin,
        rhyme_score_tong,
        rhyme_score,
        report,
    }
}
