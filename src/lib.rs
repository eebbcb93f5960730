//! # GAN for 32x32 Color Images
//!
//! This crate provides the model definitions for a generative adversarial
//! network targeting small color images, plus checkpoint persistence for
//! the generator's parameters and training metadata.
//!
//! ## Modules
//!
//! - `model`: GAN architecture (Generator and Discriminator)
//! - `utils`: Configuration and checkpoint save/load
//! - `error`: Checkpoint error taxonomy
//!
//! There is no training loop, optimizer, or data pipeline here; those
//! live with the caller. All operations are synchronous and
//! single-threaded.

pub mod error;
pub mod model;
pub mod utils;

pub use error::CheckpointError;
pub use model::{Discriminator, DiscriminatorConfig, Generator, GeneratorConfig};
pub use model::{IMAGE_CHANNELS, IMAGE_SIZE};
pub use utils::{load_checkpoint, save_checkpoint, CheckpointRecord, LoadedCheckpoint};
pub use utils::{Config, TrainingSnapshot};
