//! # Slotframe
//!
//! Evaluation toolkit for joint intent classification and slot filling.
//! Re-exports [`slotframe_core`].

pub use slotframe_core::*;
