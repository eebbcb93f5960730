//! Utility module with helper functions
//!
//! This module provides:
//! - Configuration handling
//! - Checkpoint save/load utilities

mod checkpoint;
mod config;

pub use checkpoint::{
    load_checkpoint, load_state_dict, save_checkpoint, state_dict, CheckpointRecord,
    LoadedCheckpoint, TensorState, TrainingSnapshot,
};
pub use config::{ensure_config_exists, Config, ModelConfig};
