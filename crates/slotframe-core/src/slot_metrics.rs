//! Entity-level precision, recall and F1 over slot-tag sequences.
//!
//! Scoring is delegated to [`rusev`], the Rust port of seqeval, in its
//! default lenient mode (conlleval chunking, no scheme check). An entity
//! counts as correct only when type and span both match. Scores are
//! micro-averaged over every entity in the corpus; a zero denominator
//! scores 0.

use std::collections::BTreeMap;

use rusev::{Average, DivByZeroStrat, SchemeType};
use serde::Serialize;

use crate::error::{ensure_same_len, Result, SlotframeError};

/// seqeval's `zero_division` default.
const ZERO_DIVISION: DivByZeroStrat = DivByZeroStrat::ReplaceBy0;

const MICRO_ROW: &str = "Overall_Micro";
const OVERALL_PREFIX: &str = "Overall_";

fn check_consistent<S>(labels: &[Vec<S>], preds: &[Vec<S>]) -> Result<()> {
    ensure_same_len("slot sentences", labels.len(), preds.len())?;
    for (gold, pred) in labels.iter().zip(preds) {
        ensure_same_len("slot tags of a sentence", gold.len(), pred.len())?;
    }
    Ok(())
}

fn as_str_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<Vec<&str>> {
    rows.iter()
        .map(|row| row.iter().map(AsRef::as_ref).collect())
        .collect()
}

/// rusev rejects empty input; with no tags there is nothing to score.
fn has_tags<S>(rows: &[Vec<S>]) -> bool {
    rows.iter().any(|row| !row.is_empty())
}

fn first_value<'a>(mut values: impl Iterator<Item = &'a f32>) -> f64 {
    values.next().map_or(0.0, |v| f64::from(*v))
}

/// Fraction of predicted entities that are correct.
pub fn precision_score<S: AsRef<str>>(labels: &[Vec<S>], preds: &[Vec<S>]) -> Result<f64> {
    Ok(prf(labels, preds)?.0)
}

/// Fraction of gold entities that were predicted.
pub fn recall_score<S: AsRef<str>>(labels: &[Vec<S>], preds: &[Vec<S>]) -> Result<f64> {
    Ok(prf(labels, preds)?.1)
}

/// Harmonic mean of entity precision and recall.
pub fn f1_score<S: AsRef<str>>(labels: &[Vec<S>], preds: &[Vec<S>]) -> Result<f64> {
    Ok(prf(labels, preds)?.2)
}

/// Micro precision, recall and F1 in one pass.
pub fn prf<S: AsRef<str>>(labels: &[Vec<S>], preds: &[Vec<S>]) -> Result<(f64, f64, f64)> {
    check_consistent(labels, preds)?;
    if !has_tags(labels) {
        return Ok((0.0, 0.0, 0.0));
    }

    let (precision, recall, f1, _support) = rusev::precision_recall_fscore_support(
        as_str_rows(labels),
        as_str_rows(preds),
        1.0_f32,
        Average::Micro,
        None,
        ZERO_DIVISION,
        SchemeType::default(),
        false,
        false,
        false,
    )
    .map_err(|e| SlotframeError::SlotScoring(e.to_string()))?;

    Ok((
        first_value(precision.iter()),
        first_value(recall.iter()),
        first_value(f1.iter()),
    ))
}

/// Scores for one entity type.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TypeScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of gold entities of this type.
    pub support: usize,
}

/// Per-type breakdown plus the micro average.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClassificationReport {
    pub per_type: BTreeMap<String, TypeScores>,
    pub micro: TypeScores,
}

impl ClassificationReport {
    /// Read the `Class, Precision, Recall, Fscore, Support` table rusev
    /// prints for a [`rusev::Reporter`].
    fn from_table(table: &str) -> Result<Self> {
        let mut report = Self::default();

        for line in table.lines().skip(1).filter(|l| !l.trim().is_empty()) {
            let (class, scores) = parse_row(line)?;
            if class == MICRO_ROW {
                report.micro = scores;
            } else if !class.starts_with(OVERALL_PREFIX) {
                report.per_type.insert(class.to_string(), scores);
            }
        }

        Ok(report)
    }
}

fn parse_row(line: &str) -> Result<(&str, TypeScores)> {
    let bad_row = || SlotframeError::SlotScoring(format!("unreadable report row {line:?}"));
    let float = |field: &str| field.trim().parse::<f64>().map_err(|_| bad_row());

    // the class name is the only field that may contain a comma
    let fields: Vec<&str> = line.rsplitn(5, ',').collect();
    let &[support, fscore, recall, precision, class] = fields.as_slice() else {
        return Err(bad_row());
    };

    let scores = TypeScores {
        precision: float(precision)?,
        recall: float(recall)?,
        f1: float(fscore)?,
        support: support.trim().parse().map_err(|_| bad_row())?,
    };
    Ok((class.trim(), scores))
}

/// Per-entity-type precision/recall/F1/support.
pub fn classification_report<S: AsRef<str>>(
    labels: &[Vec<S>],
    preds: &[Vec<S>],
) -> Result<ClassificationReport> {
    check_consistent(labels, preds)?;
    if !has_tags(labels) {
        return Ok(ClassificationReport::default());
    }

    let reporter = rusev::classification_report(
        as_str_rows(labels),
        as_str_rows(preds),
        None,
        ZERO_DIVISION,
        SchemeType::default(),
        false,
        false,
        false,
    )
    .map_err(|e| SlotframeError::SlotScoring(e.to_string()))?;

    ClassificationReport::from_table(&reporter.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seqs(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn readme_case() -> (Vec<Vec<String>>, Vec<Vec<String>>) {
        let y_true = seqs(&[
            &["O", "O", "O", "B-MISC", "I-MISC", "I-MISC", "O"],
            &["B-PER", "I-PER", "O"],
        ]);
        let y_pred = seqs(&[
            &["O", "O", "B-MISC", "I-MISC", "I-MISC", "I-MISC", "O"],
            &["B-PER", "I-PER", "O"],
        ]);
        (y_true, y_pred)
    }

    #[test]
    fn test_seqeval_readme_scores() {
        let (y_true, y_pred) = readme_case();

        let (p, r, f) = prf(&y_true, &y_pred).unwrap();
        assert!(approx(p, 0.5));
        assert!(approx(r, 0.5));
        assert!(approx(f, 0.5));
        assert_eq!(precision_score(&y_true, &y_pred).unwrap(), p);
        assert_eq!(recall_score(&y_true, &y_pred).unwrap(), r);
        assert_eq!(f1_score(&y_true, &y_pred).unwrap(), f);
    }

    #[test]
    fn test_inside_without_begin_is_an_entity() {
        let y_true = seqs(&[&["O", "B-MISC", "I-MISC"]]);
        let y_pred = seqs(&[&["O", "I-MISC", "I-MISC"]]);
        assert!(approx(f1_score(&y_true, &y_pred).unwrap(), 1.0));
    }

    #[test]
    fn test_no_entities_scores_zero() {
        let y = seqs(&[&["O", "O"]]);
        assert_eq!(prf(&y, &y).unwrap(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_corpus_scores_zero() {
        let empty: Vec<Vec<String>> = Vec::new();
        assert_eq!(prf(&empty, &empty).unwrap(), (0.0, 0.0, 0.0));
        assert!(classification_report(&empty, &empty).unwrap().per_type.is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let y_true = seqs(&[&["O"], &["O"]]);
        let y_pred = seqs(&[&["O"]]);
        assert!(matches!(
            f1_score(&y_true, &y_pred),
            Err(SlotframeError::LengthMismatch { .. })
        ));

        let y_pred = seqs(&[&["O"], &["O", "O"]]);
        assert!(precision_score(&y_true, &y_pred).is_err());
    }

    #[test]
    fn test_classification_report() {
        let (y_true, y_pred) = readme_case();

        let report = classification_report(&y_true, &y_pred).unwrap();
        assert_eq!(report.per_type.len(), 2);
        let misc = &report.per_type["MISC"];
        assert_eq!(misc.support, 1);
        assert_eq!(misc.f1, 0.0);
        let per = &report.per_type["PER"];
        assert_eq!(per.support, 1);
        assert_eq!(per.f1, 1.0);
        assert!(approx(report.micro.f1, 0.5));
        assert_eq!(report.micro.support, 2);
    }

    #[test]
    fn test_report_table_rows() {
        let table = "Class, Precision, Recall, Fscore, Support\n\
                     Overall_Weighted, 1, 0.6666667, 0.77777785, 3\n\
                     Overall_Micro, 0.6666667, 0.6666667, 0.6666667, 3\n\
                     Overall_Macro, 0.6666667, 0.5, 0.5555556, 3\n\
                     NOTEST, 1, 1, 1, 1\n\
                     OTHER, 0, 0, 0, 0\n\
                     TEST, 1, 0.5, 0.6666667, 2\n";

        let report = ClassificationReport::from_table(table).unwrap();
        assert_eq!(report.per_type.len(), 3);
        assert_eq!(report.per_type["TEST"].support, 2);
        assert!(approx(report.per_type["TEST"].recall, 0.5));
        assert!(approx(report.micro.precision, 2.0 / 3.0));
        assert_eq!(report.micro.support, 3);

        assert!(ClassificationReport::from_table("header\nTEST, x, 1, 1, 1\n").is_err());
    }
}
