//! # Task Configuration
//!
//! The knobs shared by every loader: where the task data lives, which label
//! files to read, which pretrained model the tokenizer comes from, and the
//! random seed. [`TaskConfig`] can be flattened into a binary's CLI or read
//! from a JSON file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotframeError};

/// Model classes known to the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// BERT encoder with a WordPiece tokenizer.
    #[default]
    Bert,
}

impl ModelType {
    /// Get all registered model types.
    pub fn all() -> &'static [ModelType] {
        &[ModelType::Bert]
    }

    /// Pretrained checkpoint used when no explicit path is configured.
    pub fn default_pretrained(&self) -> &'static str {
        match self {
            ModelType::Bert => "bert-base-uncased",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Bert => write!(f, "bert"),
        }
    }
}

impl FromStr for ModelType {
    type Err = SlotframeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bert" => Ok(ModelType::Bert),
            other => Err(SlotframeError::UnknownModelType(other.to_string())),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_intent_label_file() -> String {
    "intent_label.txt".to_string()
}

fn default_slot_label_file() -> String {
    "slot_label.txt".to_string()
}

fn default_pred_dir() -> PathBuf {
    PathBuf::from("./preds")
}

fn default_pred_input_file() -> String {
    "preds.txt".to_string()
}

fn default_seed() -> u64 {
    1234
}

/// Paths and run settings for one NLU task.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Root directory of the task data
    #[arg(long, env = "SLOTFRAME_DATA_DIR", default_value = "./data")]
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Task name (sub-directory of the data dir), e.g. MixATIS_clean
    #[arg(long, env = "SLOTFRAME_TASK")]
    pub task: String,

    /// Intent label vocabulary file name
    #[arg(long, default_value = "intent_label.txt")]
    #[serde(default = "default_intent_label_file")]
    pub intent_label_file: String,

    /// Slot label vocabulary file name
    #[arg(long, default_value = "slot_label.txt")]
    #[serde(default = "default_slot_label_file")]
    pub slot_label_file: String,

    /// Model class
    #[arg(long, default_value = "bert")]
    #[serde(default)]
    pub model_type: ModelType,

    /// Local directory, tokenizer file or hub repo id of the pretrained model
    #[arg(long, env = "SLOTFRAME_MODEL")]
    #[serde(default)]
    pub model_name_or_path: Option<String>,

    /// Directory holding prediction input
    #[arg(long, default_value = "./preds")]
    #[serde(default = "default_pred_dir")]
    pub pred_dir: PathBuf,

    /// Prediction input file name
    #[arg(long, default_value = "preds.txt")]
    #[serde(default = "default_pred_input_file")]
    pub pred_input_file: String,

    /// Random seed
    #[arg(long, env = "SLOTFRAME_SEED", default_value_t = 1234)]
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Never use CUDA even when available
    #[arg(long)]
    #[serde(default)]
    pub no_cuda: bool,
}

impl TaskConfig {
    /// Create a configuration for `task` with default settings.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            data_dir: default_data_dir(),
            task: task.into(),
            intent_label_file: default_intent_label_file(),
            slot_label_file: default_slot_label_file(),
            model_type: ModelType::default(),
            model_name_or_path: None,
            pred_dir: default_pred_dir(),
            pred_input_file: default_pred_input_file(),
            seed: default_seed(),
            no_cuda: false,
        }
    }

    /// Load a configuration from a JSON file. Missing optional fields take
    /// their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| SlotframeError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Set the data root.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the prediction directory.
    pub fn with_pred_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pred_dir = dir.into();
        self
    }

    /// Set the pretrained model location.
    pub fn with_model(mut self, name_or_path: impl Into<String>) -> Self {
        self.model_name_or_path = Some(name_or_path.into());
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn task_dir(&self) -> PathBuf {
        self.data_dir.join(&self.task)
    }

    pub fn intent_label_path(&self) -> PathBuf {
        self.task_dir().join(&self.intent_label_file)
    }

    pub fn slot_label_path(&self) -> PathBuf {
        self.task_dir().join(&self.slot_label_file)
    }

    /// Intent vocabulary of the test split (`test_` + intent label file).
    pub fn test_intent_label_path(&self) -> PathBuf {
        self.task_dir()
            .join(format!("test_{}", self.intent_label_file))
    }

    pub fn pred_input_path(&self) -> PathBuf {
        self.pred_dir.join(&self.pred_input_file)
    }

    /// The configured model location, or the registry default for the model type.
    pub fn resolved_model_name(&self) -> &str {
        self.model_name_or_path
            .as_deref()
            .unwrap_or_else(|| self.model_type.default_pretrained())
    }
}
