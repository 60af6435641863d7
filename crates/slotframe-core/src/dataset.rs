//! # Tagged Corpus Reader
//!
//! Reads the two-column tagged format used by ATIS/SNIPS-style joint NLU
//! corpora:
//!
//! ```text
//! show O
//! flights O
//! to O
//! boston B-toloc.city_name
//! atis/atis_flight
//! ```
//!
//! Every `token tag` line is buffered; a single-column line closes the
//! example and carries its intent. A `domain/intent` marker keeps only the
//! intent part.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SlotframeError};

/// One utterance with its per-token slot tags and intent labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedExample {
    pub tokens: Vec<String>,
    pub slots: Vec<String>,
    pub intents: Vec<String>,
}

/// Parallel sequences of texts, slot-tag sequences and intent-label sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedCorpus {
    pub texts: Vec<Vec<String>>,
    pub slots: Vec<Vec<String>>,
    pub intents: Vec<Vec<String>>,
}

impl TaggedCorpus {
    /// Number of examples.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Iterate the corpus example by example.
    pub fn examples(&self) -> impl Iterator<Item = TaggedExample> + '_ {
        self.texts
            .iter()
            .zip(&self.slots)
            .zip(&self.intents)
            .map(|((tokens, slots), intents)| TaggedExample {
                tokens: tokens.clone(),
                slots: slots.clone(),
                intents: intents.clone(),
            })
    }

    /// Consume into the `(texts, slots, intents)` triple.
    pub fn into_parts(self) -> (Vec<Vec<String>>, Vec<Vec<String>>, Vec<Vec<String>>) {
        (self.texts, self.slots, self.intents)
    }

    /// Expand joined multi-intent markers (`atis_flight#atis_airfare`) into
    /// separate labels.
    pub fn split_multi_intents(mut self, sep: char) -> Self {
        for intents in &mut self.intents {
            *intents = intents
                .iter()
                .flat_map(|intent| intent.split(sep))
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();
        }
        self
    }

    fn push(&mut self, tokens: Vec<String>, slots: Vec<String>, intents: Vec<String>) {
        self.texts.push(tokens);
        self.slots.push(slots);
        self.intents.push(intents);
    }
}

/// Intent labels carried by a terminator line.
fn intent_marker(item: &str) -> Vec<String> {
    match item.split_once('/') {
        Some((_domain, rest)) => {
            let intent = rest.split('/').next().unwrap_or_default();
            vec![intent.to_string()]
        }
        None => vec![item.to_string()],
    }
}

/// Parse a tagged corpus from any buffered reader.
pub fn read_tagged<R: BufRead>(reader: R, origin: &Path) -> Result<TaggedCorpus> {
    let mut corpus = TaggedCorpus::default();
    let mut text = Vec::new();
    let mut slot = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| SlotframeError::io(origin, e))?;
        let items: Vec<&str> = line.split_whitespace().collect();

        match items.as_slice() {
            [marker] => {
                corpus.push(
                    std::mem::take(&mut text),
                    std::mem::take(&mut slot),
                    intent_marker(marker),
                );
            }
            [token, tag] => {
                text.push((*token).to_string());
                slot.push((*tag).to_string());
            }
            _ => {}
        }
    }

    if !text.is_empty() {
        debug!(
            path = %origin.display(),
            dangling = text.len(),
            "tokens after the last intent line were dropped"
        );
    }

    Ok(corpus)
}

/// Read a tagged data file.
pub fn read_file(path: impl AsRef<Path>) -> Result<TaggedCorpus> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SlotframeError::io(path, e))?;
    let corpus = read_tagged(BufReader::new(file), path)?;
    debug!(path = %path.display(), examples = corpus.len(), "read tagged corpus");
    Ok(corpus)
}
