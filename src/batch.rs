//! Drives the scorer over a whole dataset: reads JSON or JSON-Lines records,
//! scores each poem, and either writes the scored dataset back out (`score`)
//! or keeps only the best samples per form (`extract`).
//!
//! Per-record field access goes through `serde_json::Value` so callers can
//! carry arbitrary extra fields through untouched; only the two declared
//! field names (`poem_field`, `instruct_field`) are ever read.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};

use crate::book::RhymeBook;
use crate::classifier::{self, PoemForm};
use crate::config;
use crate::engine;
use crate::report;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum RhymeSystemArg {
    Pingshui,
    Xin,
    Tong,
}

impl RhymeSystemArg {
    fn to_book(self) -> RhymeBook {
        match self {
            RhymeSystemArg::Pingshui => RhymeBook::Archaic,
            RhymeSystemArg::Xin => RhymeBook::Modern14,
            RhymeSystemArg::Tong => RhymeBook::Modern16,
        }
    }
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Dataset to score, one JSON array or one record per line.
    pub input: PathBuf,

    /// Where to write the per-record scored dataset; omitted to skip it.
    #[arg(long)]
    pub detailed_output: Option<PathBuf>,

    /// Where to write the dataset-level summary; stdout if omitted.
    #[arg(long)]
    pub summary_output: Option<PathBuf>,

    /// Record field holding the poem text.
    #[arg(long, default_value = "content")]
    pub poem_field: String,

    /// Record field holding the declared form, e.g. "五言绝句".
    #[arg(long, default_value = "instruct")]
    pub instruct_field: String,

    /// Input is JSON-Lines (one record per line) rather than a JSON array.
    #[arg(long)]
    pub is_jsonl: bool,

    /// Which rhyme book's score becomes the headline `rhyme_score`.
    #[arg(long, value_enum, default_value_t = RhymeSystemArg::Pingshui)]
    pub rhyme_system: RhymeSystemArg,

    /// Include the line-by-line annotated tone/rhyme report in each record.
    #[arg(long)]
    pub report: bool,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Dataset to score and filter.
    pub input: PathBuf,

    /// Where to write the kept records.
    pub output: PathBuf,

    /// Fields to keep in the output records; keeps every field if empty.
    #[arg(long, value_delimiter = ',')]
    pub keep_fields: Vec<String>,

    /// Record field holding the poem text.
    #[arg(long, default_value = "content")]
    pub poem_field: String,

    /// Record field holding the declared form, e.g. "五言绝句".
    #[arg(long, default_value = "instruct")]
    pub instruct_field: String,

    /// Cap on kept five-character quatrains.
    #[arg(long)]
    pub max_five_quatrain: Option<usize>,

    /// Cap on kept seven-character quatrains.
    #[arg(long)]
    pub max_seven_quatrain: Option<usize>,

    /// Cap on kept five-character regulated poems.
    #[arg(long)]
    pub max_five_regulated: Option<usize>,

    /// Cap on kept seven-character regulated poems.
    #[arg(long)]
    pub max_seven_regulated: Option<usize>,

    /// Input (and output) is JSON-Lines rather than a JSON array.
    #[arg(long)]
    pub is_jsonl: bool,

    /// Which rhyme book's score ranks samples within a form bucket.
    #[arg(long, value_enum, default_value_t = RhymeSystemArg::Pingshui)]
    pub rhyme_system: RhymeSystemArg,
}

fn read_records(path: &Path, is_jsonl: bool) -> Result<Vec<Value>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    if is_jsonl {
        let mut records = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("reading line {} of {}", i + 1, path.display()))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(record) => records.push(record),
                Err(err) => eprintln!("skipping malformed record at line {}: {err}", i + 1),
            }
        }
        Ok(records)
    } else {
        let value: Value =
            serde_json::from_reader(reader).with_context(|| format!("parsing {}", path.display()))?;
        match value {
            Value::Array(items) => Ok(items),
            other => Ok(vec![other]),
        }
    }
}

fn write_records(path: &Path, records: &[Value], is_jsonl: bool) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    if is_jsonl {
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
    } else {
        serde_json::to_writer_pretty(&mut writer, records)?;
    }
    Ok(())
}

struct Scored {
    record: Value,
    result: engine::EngineResult,
}

fn score_record(record: &Value, poem_field: &str, instruct_field: &str, book: RhymeBook) -> Option<Scored> {
    let text = record.as_object()?.get(poem_field)?.as_str()?;
    let declared = record
        .as_object()?
        .get(instruct_field)
        .and_then(Value::as_str)
        .and_then(classifier::parse_declared_form);
    let result = engine::score_poem(text, declared, book);
    Some(Scored { record: record.clone(), result })
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn with_scores(record: Value, result: &engine::EngineResult, include_report: bool) -> Value {
    let mut obj = record.as_object().cloned().unwrap_or_default();
    obj.insert("format_score".to_owned(), json_number(result.form_score));
    obj.insert("pingze_score".to_owned(), json_number(result.tone_score));
    obj.insert("rhyme_score_pingshui".to_owned(), json_number(result.rhyme_score_pingshui));
    obj.insert("rhyme_score_xin".to_owned(), json_number(result.rhyme_score_xin));
    obj.insert("rhyme_score_tong".to_owned(), json_number(result.rhyme_score_tong));
    obj.insert("rhyme_score".to_owned(), json_number(result.rhyme_score));
    if let Some(label) = result.report.as_ref().and_then(|r| r.rhyme_class_label()) {
        obj.insert("rhyme_class".to_owned(), Value::String(label));
    }
    if include_report {
        if let Some(annotated) = result.report.as_ref().map(report::PoemReport::render_annotated) {
            obj.insert("annotated_report".to_owned(), Value::String(annotated));
        }
    }
    Value::Object(obj)
}

fn build_summary(n: usize, form_sum: f64, tone_sum: f64, rhyme_sum: f64, book: RhymeBook) -> Value {
    let (mean_form, mean_tone, mean_rhyme) = if n == 0 {
        (0.0, 0.0, 0.0)
    } else {
        (form_sum / n as f64, tone_sum / n as f64, rhyme_sum / n as f64)
    };
    let mean_total = config::FORMAT_SCORE_WEIGHT * mean_form
        + config::TONE_SCORE_WEIGHT * mean_tone
        + config::RHYME_SCORE_WEIGHT * mean_rhyme;
    serde_json::json!({
        "sample_count": n,
        "mean_format_score": mean_form,
        "mean_pingze_score": mean_tone,
        "mean_rhyme_score": mean_rhyme,
        "mean_total_score": mean_total,
        "rhyme_system": book.name(),
        "weights": {
            "format": config::FORMAT_SCORE_WEIGHT,
            "pingze": config::TONE_SCORE_WEIGHT,
            "rhyme": config::RHYME_SCORE_WEIGHT,
        },
    })
}

/// Scores every record in `args.input`, writing the scored dataset (if
/// requested) and a dataset-level summary.
///
/// # Errors
/// Returns an error if the input can't be opened/parsed or an output file
/// can't be created; a single malformed or unscorable record is logged to
/// stderr and skipped rather than aborting the batch.
pub fn run_score(args: &ScoreArgs) -> Result<()> {
    let book = args.rhyme_system.to_book();
    let records = read_records(&args.input, args.is_jsonl)?;

    let mut detailed = Vec::with_capacity(records.len());
    let (mut form_sum, mut tone_sum, mut rhyme_sum, mut n) = (0.0, 0.0, 0.0, 0usize);

    for (i, record) in records.iter().enumerate() {
        let Some(scored) = score_record(record, &args.poem_field, &args.instruct_field, book) else {
            eprintln!("skipping record {i}: missing or non-string `{}` field", args.poem_field);
            continue;
        };
        form_sum += scored.result.form_score;
        tone_sum += scored.result.tone_score;
        rhyme_sum += scored.result.rhyme_score;
        n += 1;
        detailed.push(with_scores(scored.record, &scored.result, args.report));
    }

    if let Some(path) = &args.detailed_output {
        write_records(path, &detailed, args.is_jsonl)?;
    }

    let summary = build_summary(n, form_sum, tone_sum, rhyme_sum, book);
    match &args.summary_output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), &summary)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

fn filter_fields(record: &Value, keep_fields: &[String]) -> Value {
    if keep_fields.is_empty() {
        return record.clone();
    }
    let Some(obj) = record.as_object() else { return record.clone() };
    let filtered: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| keep_fields.iter().any(|f| f == *k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(filtered)
}

fn stats_sidecar_path(output: &Path) -> PathBuf {
    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let file_name = match output.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{stem}_statistics.{ext}"),
        None => format!("{stem}_statistics"),
    };
    output.with_file_name(file_name)
}

/// Scores every record in `args.input`, buckets it by its detected form, and
/// keeps only the top-scoring samples per bucket (ranked by the three-axis
/// average), up to whichever `--max-*` cap applies to that form. Records
/// that don't parse into a known form are dropped. Writes the kept records
/// to `args.output` plus a `_statistics` sidecar next to it.
///
/// # Errors
/// Returns an error if the input can't be opened/parsed or an output file
/// can't be created.
pub fn run_extract(args: &ExtractArgs) -> Result<()> {
    let book = args.rhyme_system.to_book();
    let records = read_records(&args.input, args.is_jsonl)?;

    let mut buckets: HashMap<PoemForm, Vec<(f64, Value)>> = HashMap::new();
    let mut skipped = 0usize;

    for (i, record) in records.iter().enumerate() {
        let Some(scored) = score_record(record, &args.poem_field, &args.instruct_field, book) else {
            eprintln!("skipping record {i}: missing or non-string `{}` field", args.poem_field);
            skipped += 1;
            continue;
        };
        let Some(form) = scored.result.observed_form else {
            skipped += 1;
            continue;
        };
        let kept = filter_fields(&scored.record, &args.keep_fields);
        buckets.entry(form).or_default().push((scored.result.aggregate_score(), kept));
    }

    let caps = [
        (PoemForm::FiveJueju, args.max_five_quatrain),
        (PoemForm::SevenJueju, args.max_seven_quatrain),
        (PoemForm::FiveLvshi, args.max_five_regulated),
        (PoemForm::SevenLvshi, args.max_seven_regulated),
    ];

    let mut output = Vec::new();
    let mut stats = Map::new();
    for (form, cap) in caps {
        let mut bucket = buckets.remove(&form).unwrap_or_default();
        bucket.sort_by(|a, b| b.0.total_cmp(&a.0));
        let total = bucket.len();
        let kept = cap.map_or(total, |c| c.min(total));
        if let Some(c) = cap {
            if total > c {
                eprintln!("{}: keeping top {c} of {total} samples", form.name());
            }
        }
        output.extend(bucket.into_iter().take(kept).map(|(_, v)| v));
        stats.insert(form.name().to_owned(), serde_json::json!({ "total": total, "kept": kept }));
    }
    stats.insert("skipped".to_owned(), Value::from(u64::try_from(skipped).unwrap_or(u64::MAX)));

    write_records(&args.output, &output, args.is_jsonl)?;

    let stats_path = stats_sidecar_path(&args.output);
    let file = File::create(&stats_path).with_context(|| format!("creating {}", stats_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &Value::Object(stats))?;

    Ok(())
}
