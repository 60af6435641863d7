use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading task data or scoring predictions.
#[derive(Debug, Error)]
pub enum SlotframeError {
    /// A label, data or prediction file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A label vocabulary file exists but has no lines.
    #[error("label file {path:?} is empty")]
    EmptyLabelFile {
        /// The offending label file.
        path: PathBuf,
    },

    /// Two sequences that must be parallel have different lengths.
    #[error("length mismatch in {what}: {left} vs {right}")]
    LengthMismatch {
        /// Which pair of inputs disagreed.
        what: &'static str,
        left: usize,
        right: usize,
    },

    /// The model type has no entry in the model registry.
    #[error("unknown model type: {0:?}")]
    UnknownModelType(String),

    /// The pretrained tokenizer could not be loaded.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Fetching pretrained files from the Hugging Face hub failed.
    #[error("hub error: {0}")]
    Hub(String),

    /// A JSON config or prediction file was malformed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The sequence-tagging scorer rejected its input.
    #[error("slot scoring error: {0}")]
    SlotScoring(String),

    /// Candle device error (seeding the CUDA RNG).
    #[error("device error: {0}")]
    Device(String),
}

impl SlotframeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn length_mismatch(what: &'static str, left: usize, right: usize) -> Self {
        Self::LengthMismatch { what, left, right }
    }
}

/// Result type alias for slotframe operations.
pub type Result<T> = std::result::Result<T, SlotframeError>;

/// Fails with [`SlotframeError::LengthMismatch`] unless both lengths agree.
pub(crate) fn ensure_same_len(what: &'static str, left: usize, right: usize) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(SlotframeError::length_mismatch(what, left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = SlotframeError::EmptyLabelFile {
            path: "data/atis/intent_label.txt".into(),
        };
        assert!(err.to_string().contains("intent_label.txt"));

        let err = SlotframeError::length_mismatch("intent preds/labels", 3, 4);
        assert_eq!(
            err.to_string(),
            "length mismatch in intent preds/labels: 3 vs 4"
        );
    }

    #[test]
    fn ensure_same_len_rejects_mismatch() {
        assert!(ensure_same_len("x", 2, 2).is_ok());
        assert!(matches!(
            ensure_same_len("x", 2, 5),
            Err(SlotframeError::LengthMismatch {
                left: 2,
                right: 5,
                ..
            })
        ));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SlotframeError>();
    }
}
