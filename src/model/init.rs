//! Weight initialization helpers
//!
//! Xavier-uniform initialization applied at layer construction time.
//! The fan computation is explicit per layer kind: plain in/out widths for
//! linear layers, channels times kernel area for convolutions.

use tch::nn;

/// Xavier-uniform initialization: U(-b, b) with b = sqrt(6 / (fan_in + fan_out)).
pub fn xavier_uniform(fan_in: i64, fan_out: i64) -> nn::Init {
    let bound = (6.0 / (fan_in + fan_out) as f64).sqrt();
    nn::Init::Uniform {
        lo: -bound,
        up: bound,
    }
}

/// Linear layer config, with Xavier weights when requested.
pub(crate) fn linear_config(fan_in: i64, fan_out: i64, xavier: bool) -> nn::LinearConfig {
    if xavier {
        nn::LinearConfig {
            ws_init: xavier_uniform(fan_in, fan_out),
            ..Default::default()
        }
    } else {
        nn::LinearConfig::default()
    }
}

/// Conv2d config, with Xavier weights when requested.
///
/// Fans for a square convolution are channels times kernel area.
pub(crate) fn conv_config(
    in_channels: i64,
    out_channels: i64,
    kernel: i64,
    xavier: bool,
) -> nn::ConvConfig {
    if xavier {
        nn::ConvConfig {
            ws_init: xavier_uniform(in_channels * kernel * kernel, out_channels * kernel * kernel),
            ..Default::default()
        }
    } else {
        nn::ConvConfig::default()
    }
}
