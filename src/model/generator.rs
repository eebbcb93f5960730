//! Generator network for the image GAN
//!
//! The Generator transforms random noise vectors into synthetic 32x32
//! color images. Architecture uses fully-connected layers to expand from
//! latent space up to the flattened image width.

use tch::{nn, nn::Module, Device, Kind, Tensor};

use super::init::linear_config;
use super::{IMAGE_CHANNELS, IMAGE_SIZE};

/// Generator network configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Size of the latent noise vector
    pub latent_vector_length: i64,
    /// Initialize layer weights with Xavier-uniform instead of the defaults
    pub init_weights_xavier: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            latent_vector_length: 100,
            init_weights_xavier: false,
        }
    }
}

/// Generator network
///
/// Architecture:
/// 1. Four fully-connected layers expanding latent_vector_length -> 768 -> 1536 -> 2304 -> 3072
/// 2. LeakyReLU between the first three stages, Tanh at the output stage
/// 3. Reshape to (batch, 3, 32, 32); output values lie in [-1, 1]
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    linear1: nn::Linear,
    linear2: nn::Linear,
    linear3: nn::Linear,
    linear4: nn::Linear,
}

impl Generator {
    /// Create a new Generator network
    ///
    /// # Arguments
    ///
    /// * `vs` - Variable store path to register parameters under
    /// * `config` - Generator configuration
    pub fn new(vs: &nn::Path, config: GeneratorConfig) -> Self {
        let out = IMAGE_CHANNELS * IMAGE_SIZE * IMAGE_SIZE;
        let latent = config.latent_vector_length;
        let xavier = config.init_weights_xavier;

        let linear1 = nn::linear(
            vs / "linear1",
            latent,
            out / 4,
            linear_config(latent, out / 4, xavier),
        );
        let linear2 = nn::linear(
            vs / "linear2",
            out / 4,
            out / 2,
            linear_config(out / 4, out / 2, xavier),
        );
        let linear3 = nn::linear(
            vs / "linear3",
            out / 2,
            out * 3 / 4,
            linear_config(out / 2, out * 3 / 4, xavier),
        );
        let linear4 = nn::linear(
            vs / "linear4",
            out * 3 / 4,
            out,
            linear_config(out * 3 / 4, out, xavier),
        );

        Self {
            config,
            linear1,
            linear2,
            linear3,
            linear4,
        }
    }

    /// Generate images from noise (inference helper)
    ///
    /// # Arguments
    ///
    /// * `noise` - Tensor of shape (batch_size, latent_vector_length)
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch_size, 3, 32, 32) with values in [-1, 1]
    pub fn generate(&self, noise: &Tensor) -> Tensor {
        self.forward(noise)
    }

    /// Generate images from internally drawn standard-normal noise
    ///
    /// # Arguments
    ///
    /// * `num_samples` - Number of images to generate
    /// * `device` - Device to create the noise tensor on
    pub fn sample(&self, num_samples: i64, device: Device) -> Tensor {
        let noise = Tensor::randn(
            [num_samples, self.config.latent_vector_length],
            (Kind::Float, device),
        );
        self.forward(&noise)
    }

    /// Get latent vector length
    pub fn latent_vector_length(&self) -> i64 {
        self.config.latent_vector_length
    }

    /// Get configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl Module for Generator {
    fn forward(&self, xs: &Tensor) -> Tensor {
        let x = self.linear1.forward(xs).leaky_relu();
        let x = self.linear2.forward(&x).leaky_relu();
        let x = self.linear3.forward(&x).leaky_relu();
        let x = self.linear4.forward(&x).tanh();

        x.view([-1, IMAGE_CHANNELS, IMAGE_SIZE, IMAGE_SIZE])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::nn::VarStore;

    #[test]
    fn test_generator_output_shape() {
        let vs = VarStore::new(Device::Cpu);
        let config = GeneratorConfig {
            latent_vector_length: 100,
            init_weights_xavier: false,
        };
        let gen = Generator::new(&vs.root(), config);

        let noise = Tensor::randn([4, 100], (Kind::Float, Device::Cpu));
        let output = gen.generate(&noise);

        assert_eq!(output.size(), vec![4, 3, 32, 32]);
    }

    #[test]
    fn test_generator_output_range() {
        let vs = VarStore::new(Device::Cpu);
        let gen = Generator::new(&vs.root(), GeneratorConfig::default());

        let output = gen.sample(2, Device::Cpu);

        let min_val: f64 = output.min().double_value(&[]);
        let max_val: f64 = output.max().double_value(&[]);
        assert!(min_val >= -1.0 && max_val <= 1.0);
    }

    #[test]
    fn test_generator_small_latent() {
        let vs = VarStore::new(Device::Cpu);
        let config = GeneratorConfig {
            latent_vector_length: 1,
            init_weights_xavier: false,
        };
        let gen = Generator::new(&vs.root(), config);

        let noise = Tensor::randn([1, 1], (Kind::Float, Device::Cpu));
        let output = gen.generate(&noise);

        assert_eq!(output.size(), vec![1, 3, 32, 32]);
    }

    #[test]
    fn test_xavier_init_changes_weights() {
        tch::manual_seed(42);
        let vs_default = VarStore::new(Device::Cpu);
        let _default = Generator::new(
            &vs_default.root(),
            GeneratorConfig {
                latent_vector_length: 100,
                init_weights_xavier: false,
            },
        );

        tch::manual_seed(42);
        let vs_xavier = VarStore::new(Device::Cpu);
        let _xavier = Generator::new(
            &vs_xavier.root(),
            GeneratorConfig {
                latent_vector_length: 100,
                init_weights_xavier: true,
            },
        );

        let w_default: Vec<f32> = vs_default.variables()["linear1.weight"]
            .flatten(0, -1)
            .try_into()
            .unwrap();
        let w_xavier: Vec<f32> = vs_xavier.variables()["linear1.weight"]
            .flatten(0, -1)
            .try_into()
            .unwrap();

        assert_ne!(w_default, w_xavier);
    }

    #[test]
    fn test_xavier_weights_within_bound() {
        let vs = VarStore::new(Device::Cpu);
        let _gen = Generator::new(
            &vs.root(),
            GeneratorConfig {
                latent_vector_length: 100,
                init_weights_xavier: true,
            },
        );

        // linear1: fan_in = 100, fan_out = 768
        let bound = (6.0 / 868.0_f64).sqrt();
        let max_abs: f64 = vs.variables()["linear1.weight"]
            .abs()
            .max()
            .double_value(&[]);

        assert!(max_abs <= bound);
    }
}
