//! GAN model management for 32x32 color images
//!
//! Main entry point providing CLI interface for:
//! - Initializing a configuration file
//! - Snapshotting a freshly constructed generator to a checkpoint
//! - Generating images from a saved checkpoint
//! - Inspecting checkpoint metadata

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rust_gan_cifar10::{
    load_checkpoint, save_checkpoint,
    utils::{ensure_config_exists, Config},
    CheckpointRecord, Generator, TrainingSnapshot, IMAGE_CHANNELS, IMAGE_SIZE,
};

/// GAN generator and discriminator for 32x32 color images
#[derive(Parser)]
#[command(name = "gan_cifar10")]
#[command(version = "0.1.0")]
#[command(about = "Manage GAN checkpoints and generate synthetic images")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize default configuration file
    Init {
        /// Output configuration file path
        #[arg(short, long, default_value = "config.json")]
        output: String,
    },

    /// Create a fresh generator and save an epoch-0 checkpoint
    Snapshot {
        /// Output checkpoint path
        #[arg(short, long, default_value = "checkpoint.json")]
        output: String,
    },

    /// Generate synthetic images from a checkpoint
    Generate {
        /// Path to checkpoint file
        #[arg(long)]
        checkpoint: String,

        /// Number of images to generate
        #[arg(short, long, default_value = "16")]
        num_samples: i64,

        /// Output CSV file
        #[arg(short, long, default_value = "samples.csv")]
        output: String,
    },

    /// Print checkpoint metadata without building a model
    Inspect {
        /// Path to checkpoint file
        #[arg(long)]
        checkpoint: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { output } => {
            init_config(&output)?;
        }
        Commands::Snapshot { output } => {
            snapshot_model(&cli.config, &output)?;
        }
        Commands::Generate {
            checkpoint,
            num_samples,
            output,
        } => {
            generate_images(&checkpoint, num_samples, &output)?;
        }
        Commands::Inspect { checkpoint } => {
            inspect_checkpoint(&checkpoint)?;
        }
    }

    Ok(())
}

/// Initialize default configuration file
fn init_config(output_path: &str) -> Result<()> {
    let config = Config::default();

    if output_path.ends_with(".toml") {
        config.save_toml(output_path)?;
    } else {
        config.save_json(output_path)?;
    }

    info!("Created default configuration at {}", output_path);
    Ok(())
}

/// Create a fresh generator and save it as an epoch-0 checkpoint
fn snapshot_model(config_path: &str, output_path: &str) -> Result<()> {
    let config = ensure_config_exists(config_path)?;
    config.validate()?;

    let device = config.get_device();
    info!("Using device: {:?}", device);

    let vs = tch::nn::VarStore::new(device);
    let generator = Generator::new(&vs.root(), config.generator_config());

    let record = CheckpointRecord::for_generator(
        &generator,
        &vs,
        TrainingSnapshot {
            epoch: 0,
            epoch_loss: 0.0,
            disc_accuracy_real: 0.0,
            disc_accuracy_generated: 0.0,
        },
    )?;

    save_checkpoint(&record, output_path)?;
    Ok(())
}

/// Generate synthetic images from a checkpoint
fn generate_images(checkpoint_path: &str, num_samples: i64, output_path: &str) -> Result<()> {
    let loaded = load_checkpoint(checkpoint_path, tch::Device::Cpu)?;

    info!("Generating {} synthetic images", num_samples);
    let samples = loaded.generator.sample(num_samples, tch::Device::Cpu);

    let samples_vec: Vec<f32> = samples.flatten(0, -1).try_into()?;

    let channels = IMAGE_CHANNELS as usize;
    let size = IMAGE_SIZE as usize;

    // Save to CSV, one row per pixel
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["sample_id", "channel", "row", "col", "value"])?;

    for sample_idx in 0..num_samples as usize {
        for c in 0..channels {
            for y in 0..size {
                for x in 0..size {
                    let idx = ((sample_idx * channels + c) * size + y) * size + x;
                    writer.write_record([
                        sample_idx.to_string(),
                        c.to_string(),
                        y.to_string(),
                        x.to_string(),
                        format!("{:.6}", samples_vec[idx]),
                    ])?;
                }
            }
        }
    }

    writer.flush()?;
    info!("Saved synthetic images to {}", output_path);

    print_sample_stats(&samples_vec, channels, size);

    Ok(())
}

/// Print checkpoint metadata without reconstructing the generator
fn inspect_checkpoint(checkpoint_path: &str) -> Result<()> {
    let content = std::fs::read_to_string(checkpoint_path)?;
    let record: CheckpointRecord = serde_json::from_str(&content)?;

    info!("Checkpoint: {}", checkpoint_path);
    info!("Class name: {}", record.class_name);
    info!("Epoch: {}", record.epoch);
    info!("Epoch train loss: {}", record.epoch_loss);
    info!("Save dttm: {}", record.save_dttm);
    info!("Latent vector length: {}", record.latent_vector_length);
    info!("Discriminator accuracy (real): {}", record.disc_accuracy_real);
    info!(
        "Discriminator accuracy (generated): {}",
        record.disc_accuracy_generated
    );
    info!("Parameters: {}", record.num_parameters());

    Ok(())
}

/// Print basic statistics of generated images
fn print_sample_stats(data: &[f32], channels: usize, size: usize) {
    let num_samples = data.len() / (channels * size * size);
    let channel_names = ["R", "G", "B"];

    info!("Sample statistics ({} images):", num_samples);

    for (c, name) in channel_names.iter().enumerate().take(channels) {
        let values: Vec<f32> = (0..data.len())
            .filter(|i| (i / (size * size)) % channels == c)
            .map(|i| data[i])
            .collect();

        let mean: f32 = values.iter().sum::<f32>() / values.len() as f32;
        let min: f32 = values.iter().cloned().fold(f32::INFINITY, f32::min);
        let max: f32 = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        info!("  {}: mean={:.4}, min={:.4}, max={:.4}", name, mean, min, max);
    }
}
