//! Slotframe evaluation tool
//!
//! Scores a predicted tagged file against the gold file of a task and prints
//! the metric map as one JSON object on stdout.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use slotframe_core::{
    classification_report, compute_metrics, get_intent_labels, init_logger,
    multi_compute_metrics, multilabel2one_hot, read_file, IntentIds, LabelVocab, Metrics,
    TaggedCorpus, TaskConfig,
};
use tracing::{info, warn};

/// Label used for intents missing from the vocabulary.
const UNKNOWN_INTENT: &str = "UNK";

/// CLI arguments
#[derive(Parser)]
#[command(name = "slotframe-eval")]
#[command(about = "Evaluate joint intent/slot predictions against gold data")]
#[command(long_about = "Evaluate joint intent/slot predictions against gold data.

Intents missing from the intent vocabulary are mapped to its `UNK` entry when \
there is one. Two different unknown intents (gold `foo`, predicted `bar`) then \
share the `UNK` id and count as a correct intent and frame, which can inflate \
intent and frame accuracy. Without `UNK` an unknown intent never matches. In \
--multi-intent mode unknown intents are dropped from the multi-hot vectors.")]
#[command(version)]
struct Cli {
    /// Gold tagged file
    #[arg(long)]
    gold: PathBuf,

    /// Predicted tagged file (same format as the gold file)
    #[arg(long)]
    pred: PathBuf,

    /// Treat intent markers as joined multi-intent labels
    #[arg(long)]
    multi_intent: bool,

    /// Separator between joined intents
    #[arg(long, default_value_t = '#')]
    sep: char,

    /// Also log a per-type slot report
    #[arg(long)]
    report: bool,

    #[command(flatten)]
    task: TaskConfig,
}

#[derive(Serialize)]
struct EvalOutput {
    mode: &'static str,
    examples: usize,
    metrics: Metrics,
}

/// Map each sentence's first intent to its vocabulary id. Unknown intents go
/// to `UNK` when the vocabulary has it, otherwise to `fallback`.
fn single_intent_ids(corpus: &TaggedCorpus, vocab: &LabelVocab, fallback: usize) -> Vec<usize> {
    let unknown = vocab.id_of(UNKNOWN_INTENT).unwrap_or(fallback);
    corpus
        .intents
        .iter()
        .map(|intents| {
            intents
                .first()
                .and_then(|intent| vocab.id_of(intent))
                .unwrap_or(unknown)
        })
        .collect()
}

fn multi_hot(corpus: &TaggedCorpus, vocab: &LabelVocab) -> Vec<Vec<f32>> {
    corpus
        .intents
        .iter()
        .map(|intents| {
            let ids: Vec<usize> = intents
                .iter()
                .filter_map(|intent| {
                    let id = vocab.id_of(intent);
                    if id.is_none() {
                        warn!(intent = %intent, "intent not in vocabulary");
                    }
                    id
                })
                .collect();
            multilabel2one_hot(&IntentIds::from(ids), vocab.len())
        })
        .collect()
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();

    let vocab = LabelVocab::new(
        get_intent_labels(&cli.task).context("Failed to load intent labels")?,
    );
    info!(task = %cli.task.task, intents = vocab.len(), "loaded intent vocabulary");

    let mut gold = read_file(&cli.gold)
        .with_context(|| format!("Failed to read gold file {}", cli.gold.display()))?;
    let mut pred = read_file(&cli.pred)
        .with_context(|| format!("Failed to read prediction file {}", cli.pred.display()))?;

    if gold.len() != pred.len() {
        bail!(
            "gold has {} examples but predictions have {}",
            gold.len(),
            pred.len()
        );
    }
    info!(examples = gold.len(), "read gold and predicted corpora");

    let (mode, metrics) = if cli.multi_intent {
        gold = gold.split_multi_intents(cli.sep);
        pred = pred.split_multi_intents(cli.sep);

        let metrics = multi_compute_metrics(
            &multi_hot(&pred, &vocab),
            &multi_hot(&gold, &vocab),
            &pred.slots,
            &gold.slots,
            &pred.intents,
            &gold.intents,
        )?;
        ("multi", metrics)
    } else {
        let metrics = compute_metrics(
            // distinct fallbacks so two out-of-vocabulary intents never match
            &single_intent_ids(&pred, &vocab, usize::MAX),
            &single_intent_ids(&gold, &vocab, usize::MAX - 1),
            &pred.slots,
            &gold.slots,
        )?;
        ("single", metrics)
    };

    info!("{}", metrics);

    if cli.report {
        let report = classification_report(&gold.slots, &pred.slots)?;
        for (kind, scores) in &report.per_type {
            info!(
                slot = %kind,
                precision = scores.precision,
                recall = scores.recall,
                f1 = scores.f1,
                support = scores.support,
                "slot report"
            );
        }
    }

    let output = EvalOutput {
        mode,
        examples: gold.len(),
        metrics,
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}
