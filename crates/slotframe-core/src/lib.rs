//! # Slotframe Core
//!
//! Data loading and evaluation for joint intent-classification and
//! slot-filling models. Reads label vocabularies and tagged corpora,
//! resolves the pretrained tokenizer, and turns predictions into intent
//! accuracy, entity-level slot precision/recall/F1 and semantic frame
//! accuracy.
//!
//! ## Quick Start
//!
//! ```rust
//! use slotframe_core::compute_metrics;
//!
//! let intent_labels = vec!["atis_flight", "atis_airfare"];
//! let intent_preds = vec!["atis_flight", "atis_flight"];
//! let slot_labels = vec![vec!["O", "B-toloc.city_name"], vec!["O", "O"]];
//! let slot_preds = vec![vec!["O", "B-toloc.city_name"], vec!["O", "O"]];
//!
//! let metrics = compute_metrics(&intent_preds, &intent_labels, &slot_preds, &slot_labels).unwrap();
//!
//! assert_eq!(metrics.get("intent_acc"), Some(0.5));
//! assert_eq!(metrics.get("slot_f1"), Some(1.0));
//! assert_eq!(metrics.get("sementic_frame_acc"), Some(0.5));
//! ```
pub mod config;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod logging;
pub mod metrics;
pub mod one_hot;
pub mod seed;
pub mod slot_metrics;
pub mod tokenizer;

// Re-export primary API
pub use config::{ModelType, TaskConfig};
pub use dataset::{read_file, TaggedCorpus, TaggedExample};
pub use error::{Result, SlotframeError};
pub use labels::{
    change_intent_labels, get_intent_labels, get_slot_labels, load_label_file,
    read_prediction_text, LabelVocab,
};
pub use logging::init_logger;
pub use metrics::{
    compute_metrics, get_intent_acc, get_intent_metrics, get_sentence_frame_acc,
    get_slot_metrics, intent_acc, multi_compute_metrics, multi_get_intent_metrics,
    multi_get_sentence_frame_acc, multi_get_slot_metrics, mutisemantic_acc, Metrics,
};
pub use one_hot::{multilabel2one_hot, IntentIds};
pub use seed::{set_seed, SeededRng};
pub use slot_metrics::{classification_report, ClassificationReport};
pub use tokenizer::{load_model_config, load_tokenizer};
