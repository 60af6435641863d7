//! # Evaluation Metrics
//!
//! Turns materialized model predictions into named scalar scores: intent
//! accuracy and macro F1, entity-level slot precision/recall/F1, and
//! semantic frame accuracy (intent and every slot tag of a sentence right).
//!
//! Single-intent functions compare one intent per sentence. The `multi_*`
//! variants take multi-hot intent matrices for F1 plus per-sentence intent
//! lists for exact-match accuracy.
//!
//! Every function checks that its parallel inputs have matching lengths and
//! returns [`SlotframeError::LengthMismatch`] otherwise.
//!
//! [`SlotframeError::LengthMismatch`]: crate::error::SlotframeError::LengthMismatch

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_same_len, Result};
use crate::slot_metrics;

pub const INTENT_ACC: &str = "intent_acc";
pub const INTENT_F1: &str = "intent_f1";
pub const INTENT_PRECISION: &str = "intent_precision";
pub const SLOT_PRECISION: &str = "slot_precision";
pub const SLOT_RECALL: &str = "slot_recall";
pub const SLOT_F1: &str = "slot_f1";
/// Keeps the historical spelling downstream training scripts read.
pub const SEMANTIC_FRAME_ACC: &str = "sementic_frame_acc";

/// Metric name to score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, f64>);

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Merge `other` into `self`; keys already present are overwritten.
    pub fn update(&mut self, other: Metrics) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name} = {value:.4}")?;
        }
        Ok(())
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Mean of a boolean mask; 0 for an empty mask.
fn mean(mask: impl IntoIterator<Item = bool>) -> f64 {
    let (hits, total) = mask
        .into_iter()
        .fold((0usize, 0usize), |(h, t), ok| (h + ok as usize, t + 1));
    ratio(hits, total)
}

fn all_tags_match<S: PartialEq>(preds: &[Vec<S>], labels: &[Vec<S>]) -> Result<Vec<bool>> {
    preds
        .iter()
        .zip(labels)
        .map(|(p, l)| {
            ensure_same_len("slot tags of a sentence", p.len(), l.len())?;
            Ok(p == l)
        })
        .collect()
}

/// F1 of one class from raw counts; 0 when undefined.
fn class_f1(tp: usize, fp: usize, fn_: usize) -> f64 {
    ratio(2 * tp, 2 * tp + fp + fn_)
}

/// Macro-averaged F1 over the classes seen in either sequence.
pub fn macro_f1<T: Eq + Hash>(preds: &[T], labels: &[T]) -> Result<f64> {
    ensure_same_len("intent preds/labels", preds.len(), labels.len())?;

    let classes: HashSet<&T> = preds.iter().chain(labels).collect();
    if classes.is_empty() {
        return Ok(0.0);
    }

    let total: f64 = classes
        .iter()
        .map(|&class| {
            let (mut tp, mut fp, mut fn_) = (0, 0, 0);
            for (p, l) in preds.iter().zip(labels) {
                match (p == class, l == class) {
                    (true, true) => tp += 1,
                    (true, false) => fp += 1,
                    (false, true) => fn_ += 1,
                    (false, false) => {}
                }
            }
            class_f1(tp, fp, fn_)
        })
        .sum();

    Ok(total / classes.len() as f64)
}

/// Macro-averaged F1 over the columns of multi-hot matrices. A cell above
/// 0.5 is a positive.
pub fn multilabel_macro_f1(preds: &[Vec<f32>], labels: &[Vec<f32>]) -> Result<f64> {
    ensure_same_len("multi-hot intent rows", preds.len(), labels.len())?;

    let width = labels.first().or(preds.first()).map_or(0, Vec::len);
    for (p, l) in preds.iter().zip(labels) {
        ensure_same_len("multi-hot width", p.len(), width)?;
        ensure_same_len("multi-hot width", l.len(), width)?;
    }
    if width == 0 {
        return Ok(0.0);
    }

    let mut counts = vec![(0usize, 0usize, 0usize); width];
    for (p_row, l_row) in preds.iter().zip(labels) {
        for ((p, l), c) in p_row.iter().zip(l_row).zip(counts.iter_mut()) {
            match (*p > 0.5, *l > 0.5) {
                (true, true) => c.0 += 1,
                (true, false) => c.1 += 1,
                (false, true) => c.2 += 1,
                (false, false) => {}
            }
        }
    }

    let total: f64 = counts
        .iter()
        .map(|&(tp, fp, fn_)| class_f1(tp, fp, fn_))
        .sum();
    Ok(total / width as f64)
}

/// Fraction of paired entries that are exactly equal.
pub fn intent_acc<T: PartialEq>(pred_intents: &[T], real_intents: &[T]) -> Result<f64> {
    ensure_same_len("intent preds/labels", pred_intents.len(), real_intents.len())?;
    Ok(mean(pred_intents.iter().zip(real_intents).map(|(p, r)| p == r)))
}

/// `intent_acc`: element-wise intent accuracy.
pub fn get_intent_acc<T: PartialEq>(preds: &[T], labels: &[T]) -> Result<Metrics> {
    let acc = intent_acc(preds, labels)?;
    Ok(Metrics::from_iter([(INTENT_ACC, acc)]))
}

/// `intent_f1` (macro) and `intent_precision` (accuracy) for single intents.
pub fn get_intent_metrics<T: Eq + Hash>(preds: &[T], labels: &[T]) -> Result<Metrics> {
    Ok(Metrics::from_iter([
        (INTENT_F1, macro_f1(preds, labels)?),
        (INTENT_PRECISION, intent_acc(labels, preds)?),
    ]))
}

/// `slot_precision`, `slot_recall`, `slot_f1` over entity chunks.
pub fn get_slot_metrics<S: AsRef<str>>(preds: &[Vec<S>], labels: &[Vec<S>]) -> Result<Metrics> {
    ensure_same_len("slot preds/labels", preds.len(), labels.len())?;
    let (precision, recall, f1) = slot_metrics::prf(labels, preds)?;
    Ok(Metrics::from_iter([
        (SLOT_PRECISION, precision),
        (SLOT_RECALL, recall),
        (SLOT_F1, f1),
    ]))
}

/// Slot metrics for the multi-intent setting; slots are scored the same way.
pub fn multi_get_slot_metrics<S: AsRef<str>>(
    preds: &[Vec<S>],
    labels: &[Vec<S>],
) -> Result<Metrics> {
    get_slot_metrics(preds, labels)
}

/// `intent_f1` (macro over multi-hot columns) and `intent_precision`
/// (exact match of each sentence's intent list).
pub fn multi_get_intent_metrics<I: PartialEq>(
    preds: &[Vec<f32>],
    labels: &[Vec<f32>],
    pred_intents: &[Vec<I>],
    real_intents: &[Vec<I>],
) -> Result<Metrics> {
    Ok(Metrics::from_iter([
        (INTENT_F1, multilabel_macro_f1(preds, labels)?),
        (INTENT_PRECISION, intent_acc(pred_intents, real_intents)?),
    ]))
}

/// `sementic_frame_acc`: sentences whose intent and every slot tag are right.
pub fn get_sentence_frame_acc<T: PartialEq, S: PartialEq>(
    intent_preds: &[T],
    intent_labels: &[T],
    slot_preds: &[Vec<S>],
    slot_labels: &[Vec<S>],
) -> Result<Metrics> {
    ensure_same_len("intent preds/labels", intent_preds.len(), intent_labels.len())?;
    ensure_same_len("slot preds/labels", slot_preds.len(), slot_labels.len())?;
    ensure_same_len("intents/slots", intent_preds.len(), slot_preds.len())?;

    let slot_ok = all_tags_match(slot_preds, slot_labels)?;
    let acc = mean(
        intent_preds
            .iter()
            .zip(intent_labels)
            .zip(slot_ok)
            .map(|((p, l), slots)| p == l && slots),
    );
    Ok(Metrics::from_iter([(SEMANTIC_FRAME_ACC, acc)]))
}

/// Multi-intent frame accuracy comparing each sentence's intent list
/// position by position.
pub fn multi_get_sentence_frame_acc<I: PartialEq, S: PartialEq>(
    pred_intents: &[Vec<I>],
    real_intents: &[Vec<I>],
    slot_preds: &[Vec<S>],
    slot_labels: &[Vec<S>],
) -> Result<Metrics> {
    ensure_same_len("intent preds/labels", pred_intents.len(), real_intents.len())?;
    ensure_same_len("slot preds/labels", slot_preds.len(), slot_labels.len())?;
    ensure_same_len("intents/slots", pred_intents.len(), slot_preds.len())?;

    let intent_ok = pred_intents
        .iter()
        .zip(real_intents)
        .map(|(p, l)| {
            ensure_same_len("intents of a sentence", p.len(), l.len())?;
            Ok(p == l)
        })
        .collect::<Result<Vec<_>>>()?;
    let slot_ok = all_tags_match(slot_preds, slot_labels)?;

    let acc = mean(intent_ok.into_iter().zip(slot_ok).map(|(i, s)| i && s));
    Ok(Metrics::from_iter([(SEMANTIC_FRAME_ACC, acc)]))
}

/// Whole-sentence accuracy: slot sequence and intent sequence both exactly
/// equal. Unequal lengths inside a sentence simply count as wrong.
pub fn mutisemantic_acc<S: PartialEq, I: PartialEq>(
    pred_slots: &[Vec<S>],
    real_slots: &[Vec<S>],
    pred_intents: &[Vec<I>],
    real_intents: &[Vec<I>],
) -> Result<Metrics> {
    ensure_same_len("slot preds/labels", pred_slots.len(), real_slots.len())?;
    ensure_same_len("intent preds/labels", pred_intents.len(), real_intents.len())?;
    ensure_same_len("intents/slots", pred_intents.len(), pred_slots.len())?;

    let acc = mean(
        pred_slots
            .iter()
            .zip(real_slots)
            .zip(pred_intents.iter().zip(real_intents))
            .map(|((ps, rs), (pi, ri))| ps == rs && pi == ri),
    );
    Ok(Metrics::from_iter([(SEMANTIC_FRAME_ACC, acc)]))
}

/// Intent accuracy, slot P/R/F1 and frame accuracy for single-intent data.
pub fn compute_metrics<T: PartialEq, S: AsRef<str> + PartialEq>(
    intent_preds: &[T],
    intent_labels: &[T],
    slot_preds: &[Vec<S>],
    slot_labels: &[Vec<S>],
) -> Result<Metrics> {
    ensure_same_len("intent preds/labels", intent_preds.len(), intent_labels.len())?;
    ensure_same_len("intent labels/slot preds", intent_labels.len(), slot_preds.len())?;
    ensure_same_len("slot preds/labels", slot_preds.len(), slot_labels.len())?;

    let mut results = Metrics::new();
    results.update(get_intent_acc(intent_preds, intent_labels)?);
    results.update(get_slot_metrics(slot_preds, slot_labels)?);
    results.update(get_sentence_frame_acc(
        intent_preds,
        intent_labels,
        slot_preds,
        slot_labels,
    )?);
    Ok(results)
}

/// Intent F1/accuracy, slot P/R/F1 and frame accuracy for multi-intent data.
///
/// `intent_preds`/`intent_labels` are multi-hot rows; `pred_intents`/
/// `real_intents` list each sentence's intents for exact matching.
pub fn multi_compute_metrics<I: PartialEq, S: AsRef<str> + PartialEq>(
    intent_preds: &[Vec<f32>],
    intent_labels: &[Vec<f32>],
    slot_preds: &[Vec<S>],
    slot_labels: &[Vec<S>],
    pred_intents: &[Vec<I>],
    real_intents: &[Vec<I>],
) -> Result<Metrics> {
    ensure_same_len("intent preds/labels", intent_preds.len(), intent_labels.len())?;
    ensure_same_len("intent labels/slot preds", intent_labels.len(), slot_preds.len())?;
    ensure_same_len("slot preds/labels", slot_preds.len(), slot_labels.len())?;

    let mut results = Metrics::new();
    results.update(multi_get_intent_metrics(
        intent_preds,
        intent_labels,
        pred_intents,
        real_intents,
    )?);
    results.update(multi_get_slot_metrics(slot_preds, slot_labels)?);
    results.update(mutisemantic_acc(
        slot_preds,
        slot_labels,
        pred_intents,
        real_intents,
    )?);
    Ok(results)
}
