//! Model module containing GAN architecture components
//!
//! This module provides:
//! - Generator network for creating synthetic 32x32 color images
//! - Discriminator network for distinguishing real from fake
//! - Weight initialization helpers

mod discriminator;
mod generator;
pub mod init;

pub use discriminator::{Discriminator, DiscriminatorConfig};
pub use generator::{Generator, GeneratorConfig};

/// Number of image channels (RGB).
pub const IMAGE_CHANNELS: i64 = 3;

/// Image side length in pixels.
pub const IMAGE_SIZE: i64 = 32;
