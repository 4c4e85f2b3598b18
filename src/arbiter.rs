//! Picks the best of several candidate readings of the same poem. Multiple
//! candidates arise whenever the text itself is ambiguous: a 70-character
//! total could be five-character or seven-character lines, and an
//! all-polyphonic rhyme word leaves the poem's tone direction undetermined.
//! Rather than guess, the engine builds a full report for every candidate
//! and lets this module pick the one that actually fits best.

use std::cmp::Ordering;

use crate::report::PoemReport;

fn compare(a: &PoemReport, b: &PoemReport) -> Ordering {
    a.total_correct()
        .cmp(&b.total_correct())
        .then_with(|| a.rhymed_count().cmp(&b.rhymed_count()))
        .then_with(|| b.rhyme_variety().cmp(&a.rhyme_variety()))
}

/// Picks the better of two candidate reports: more correctly-toned
/// characters wins outright; a tie is broken by more lines actually
/// verified as rhyming, then by fewer distinct rhyme classes used.
#[must_use]
pub fn better(a: PoemReport, b: PoemReport) -> PoemReport {
    if compare(&a, &b) == Ordering::Less { b } else { a }
}

/// Folds [`better`] over every candidate, returning `None` only if
/// `candidates` was empty.
#[must_use]
pub fn best_of(candidates: Vec<PoemReport>) -> Option<PoemReport> {
    candidates.into_iter().reduce(better)
}
