//! Multi-hot encoding of multi-intent labels.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Intent label ids of one utterance, either flat (`[3, 7]`) or wrapped in a
/// single outer list (`[[3, 7]]`) as some prediction dumps emit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntentIds {
    Nested(Vec<Vec<i64>>),
    Flat(Vec<i64>),
}

impl IntentIds {
    /// Parse ids from text. Values that are not integers are logged and dropped.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Self {
        let ids = raw
            .iter()
            .filter_map(|s| {
                let s = s.as_ref().trim();
                match s.parse::<i64>() {
                    Ok(id) => Some(id),
                    Err(_) => {
                        warn!(value = s, "ignoring non-numeric intent label id");
                        None
                    }
                }
            })
            .collect();
        IntentIds::Flat(ids)
    }

    /// The ids that get encoded; for the nested form only the first inner list.
    pub fn ids(&self) -> &[i64] {
        match self {
            IntentIds::Flat(ids) => ids,
            IntentIds::Nested(lists) => lists.first().map(Vec::as_slice).unwrap_or(&[]),
        }
    }
}

impl From<Vec<usize>> for IntentIds {
    fn from(ids: Vec<usize>) -> Self {
        IntentIds::Flat(ids.into_iter().map(|id| id as i64).collect())
    }
}

impl From<&[usize]> for IntentIds {
    fn from(ids: &[usize]) -> Self {
        IntentIds::Flat(ids.iter().map(|&id| id as i64).collect())
    }
}

/// Encode label ids as a `width`-wide 0/1 vector.
///
/// Ids outside `0..width` are logged and skipped; encoding never fails.
pub fn multilabel2one_hot(labels: &IntentIds, width: usize) -> Vec<f32> {
    let mut res = vec![0.0f32; width];

    for &id in labels.ids() {
        match usize::try_from(id).ok().filter(|&idx| idx < width) {
            Some(idx) => res[idx] = 1.0,
            None => warn!(id, width, "intent label id out of range for one-hot width"),
        }
    }

    res
}
