//! Label vocabularies and prediction text files.
//!
//! A vocabulary file holds one label per line; the line number is the label id.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::config::TaskConfig;
use crate::error::{Result, SlotframeError};

/// Ordered label vocabulary. Index position is the label id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocab {
    labels: Vec<String>,
}

impl LabelVocab {
    /// Build a vocabulary from labels already in memory.
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Load a vocabulary file. Fails on a missing or empty file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let labels = read_trimmed_lines(path)?;
        if labels.is_empty() {
            return Err(SlotframeError::EmptyLabelFile {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), count = labels.len(), "loaded label vocabulary");
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Id of `label`, if it is in the vocabulary.
    pub fn id_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Label for `id`.
    pub fn label_of(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn into_inner(self) -> Vec<String> {
        self.labels
    }
}

impl<'a> IntoIterator for &'a LabelVocab {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

/// Read every line of `path`, trimmed, keeping file order.
pub fn read_trimmed_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| SlotframeError::io(path, e))?;
    let reader = BufReader::new(file);

    reader
        .lines()
        .map(|line| {
            line.map(|l| l.trim().to_string())
                .map_err(|e| SlotframeError::io(path, e))
        })
        .collect()
}

/// Shared reader for vocabulary files.
pub fn load_label_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    LabelVocab::from_file(path).map(LabelVocab::into_inner)
}

/// Intent labels of the task.
pub fn get_intent_labels(cfg: &TaskConfig) -> Result<Vec<String>> {
    load_label_file(cfg.intent_label_path())
}

/// Slot labels of the task.
pub fn get_slot_labels(cfg: &TaskConfig) -> Result<Vec<String>> {
    load_label_file(cfg.slot_label_path())
}

/// Intent labels of the test split, read from `test_<intent_label_file>`.
pub fn change_intent_labels(cfg: &TaskConfig) -> Result<Vec<String>> {
    load_label_file(cfg.test_intent_label_path())
}

/// Raw prediction input, one trimmed line per utterance.
pub fn read_prediction_text(cfg: &TaskConfig) -> Result<Vec<String>> {
    read_trimmed_lines(&cfg.pred_input_path())
}
