//! Discriminator network for the image GAN
//!
//! The Discriminator classifies 32x32 color images as real or fake.
//! Architecture uses 2D convolutions to extract features, then
//! fully-connected layers with dropout for classification.

use tch::{nn, nn::Module, nn::ModuleT, Tensor};

use super::init::{conv_config, linear_config};
use super::{IMAGE_CHANNELS, IMAGE_SIZE};

/// Filters and kernel of the first convolution stage.
const CONV1_FILTERS: i64 = 6;
const CONV1_KERNEL: i64 = 3;

/// Filters and kernel of the second convolution stage.
const CONV2_FILTERS: i64 = 12;
const CONV2_KERNEL: i64 = 6;

/// Output classes: real vs. fake.
const NUM_CLASSES: i64 = 2;

/// Spatial size after a valid convolution with stride 1 and no padding.
const fn conv_output_size(input: i64, kernel: i64) -> i64 {
    input - kernel + 1
}

/// Width of the flattened feature map feeding the first linear layer,
/// derived from the input geometry and the convolution parameters.
/// Equals 7500 for 32x32x3 input.
const fn flattened_width() -> i64 {
    let side = conv_output_size(conv_output_size(IMAGE_SIZE, CONV1_KERNEL), CONV2_KERNEL);
    CONV2_FILTERS * side * side
}

/// Discriminator network configuration
#[derive(Debug, Clone)]
pub struct DiscriminatorConfig {
    /// Dropout rate between the fully-connected stages
    pub dropout: f64,
    /// Initialize layer weights with Xavier-uniform instead of the defaults
    pub init_weights_xavier: bool,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self {
            dropout: 0.2,
            init_weights_xavier: false,
        }
    }
}

/// Discriminator network
///
/// Architecture:
/// 1. Conv2d(3, 6, 3) -> ReLU -> Conv2d(6, 12, 6) -> ReLU
/// 2. Flatten to (batch, 7500)
/// 3. Linear(7500, 1000) -> ReLU -> Dropout
/// 4. Linear(1000, 100) -> ReLU -> Dropout
/// 5. Linear(100, 2) -> Sigmoid
///
/// Outputs are independent per-class probabilities in [0, 1], not a
/// normalized distribution.
#[derive(Debug)]
pub struct Discriminator {
    config: DiscriminatorConfig,
    conv1: nn::Conv2D,
    conv2: nn::Conv2D,
    linear1: nn::Linear,
    linear2: nn::Linear,
    linear3: nn::Linear,
}

impl Discriminator {
    /// Create a new Discriminator network
    ///
    /// # Arguments
    ///
    /// * `vs` - Variable store path to register parameters under
    /// * `config` - Discriminator configuration
    pub fn new(vs: &nn::Path, config: DiscriminatorConfig) -> Self {
        let xavier = config.init_weights_xavier;

        let conv1 = nn::conv2d(
            vs / "conv1",
            IMAGE_CHANNELS,
            CONV1_FILTERS,
            CONV1_KERNEL,
            conv_config(IMAGE_CHANNELS, CONV1_FILTERS, CONV1_KERNEL, xavier),
        );
        let conv2 = nn::conv2d(
            vs / "conv2",
            CONV1_FILTERS,
            CONV2_FILTERS,
            CONV2_KERNEL,
            conv_config(CONV1_FILTERS, CONV2_FILTERS, CONV2_KERNEL, xavier),
        );

        let flat = flattened_width();
        let linear1 = nn::linear(vs / "linear1", flat, 1000, linear_config(flat, 1000, xavier));
        let linear2 = nn::linear(vs / "linear2", 1000, 100, linear_config(1000, 100, xavier));
        let linear3 = nn::linear(
            vs / "linear3",
            100,
            NUM_CLASSES,
            linear_config(100, NUM_CLASSES, xavier),
        );

        Self {
            config,
            conv1,
            conv2,
            linear1,
            linear2,
            linear3,
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    ///
    /// * `input` - Tensor of shape (batch_size, 3, 32, 32)
    /// * `train` - Whether in training mode (affects dropout)
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch_size, 2) with per-class probabilities
    pub fn forward_t(&self, input: &Tensor, train: bool) -> Tensor {
        let x = self.conv1.forward(input).relu();
        let x = self.conv2.forward(&x).relu();

        let batch_size = x.size()[0];
        let x = x.view([batch_size, -1]);

        let x = self
            .linear1
            .forward(&x)
            .relu()
            .dropout(self.config.dropout, train);
        let x = self
            .linear2
            .forward(&x)
            .relu()
            .dropout(self.config.dropout, train);

        self.linear3.forward(&x).sigmoid()
    }

    /// Classify images (inference mode)
    ///
    /// Returns per-class probabilities with dropout disabled
    pub fn classify(&self, input: &Tensor) -> Tensor {
        self.forward_t(input, false)
    }

    /// Get configuration
    pub fn config(&self) -> &DiscriminatorConfig {
        &self.config
    }
}

impl ModuleT for Discriminator {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        Discriminator::forward_t(self, xs, train)
    }
}
