//! # Pretrained Tokenizer and Config Loading
//!
//! Resolves `model_name_or_path` the way pretrained checkpoints are usually
//! referenced: a local model directory, a direct path to the file, or a
//! Hugging Face hub repo id whose files are downloaded (and cached) on first
//! use.

use std::path::{Path, PathBuf};

use candle_transformers::models::bert::Config as BertConfig;
use tokenizers::Tokenizer as HfTokenizer;
use tracing::info;

use crate::config::{ModelType, TaskConfig};
use crate::error::{Result, SlotframeError};

pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";

/// Locate `file_name` for the model `name_or_path`.
///
/// An existing directory is searched for `file_name`; an existing file is
/// returned as is; anything else is treated as a hub repo id.
pub fn resolve_model_file(name_or_path: &str, file_name: &str) -> Result<PathBuf> {
    let local = Path::new(name_or_path);

    if local.is_dir() {
        let path = local.join(file_name);
        if !path.is_file() {
            return Err(SlotframeError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "missing in model directory"),
            ));
        }
        return Ok(path);
    }
    if local.is_file() {
        return Ok(local.to_path_buf());
    }

    info!(repo = name_or_path, file = file_name, "fetching from hub");
    let api = hf_hub::api::sync::Api::new().map_err(|e| SlotframeError::Hub(e.to_string()))?;
    api.model(name_or_path.to_string())
        .get(file_name)
        .map_err(|e| SlotframeError::Hub(format!("{name_or_path}/{file_name}: {e}")))
}

/// Load the tokenizer of the configured pretrained model.
pub fn load_tokenizer(cfg: &TaskConfig) -> Result<HfTokenizer> {
    let name = cfg.resolved_model_name();
    let path = match cfg.model_type {
        ModelType::Bert => resolve_model_file(name, TOKENIZER_FILE)?,
    };

    let tokenizer =
        HfTokenizer::from_file(&path).map_err(|e| SlotframeError::Tokenizer(e.to_string()))?;
    info!(
        model_type = %cfg.model_type,
        path = %path.display(),
        vocab = tokenizer.get_vocab_size(true),
        "loaded tokenizer"
    );
    Ok(tokenizer)
}

/// Load the encoder configuration of the configured pretrained model.
pub fn load_model_config(cfg: &TaskConfig) -> Result<BertConfig> {
    let name = cfg.resolved_model_name();
    let path = match cfg.model_type {
        ModelType::Bert => resolve_model_file(name, CONFIG_FILE)?,
    };

    let content = std::fs::read_to_string(&path).map_err(|e| SlotframeError::io(&path, e))?;
    Ok(serde_json::from_str(&content)?)
}
