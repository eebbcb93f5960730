//! Checkpoint save/load utilities
//!
//! Provides functions for persisting generator parameters along with
//! training metadata, and for reconstructing a generator from a saved
//! record.
//!
//! The on-disk format is a single self-describing JSON document. Both
//! operations are synchronous and single-shot; concurrent save/load
//! against the same path is not coordinated and the outcome of
//! overlapping writers is undefined.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tch::nn::VarStore;
use tch::{Device, Tensor};
use tracing::info;

use crate::error::CheckpointError;
use crate::model::{Generator, GeneratorConfig};

/// Raw contents of one named parameter tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorState {
    /// Tensor dimensions
    pub shape: Vec<i64>,
    /// Flattened element data, row-major
    pub data: Vec<f32>,
}

/// Training metadata captured alongside the model parameters.
#[derive(Debug, Clone, Copy)]
pub struct TrainingSnapshot {
    /// Last finished epoch number
    pub epoch: usize,
    /// Generator training loss at that epoch
    pub epoch_loss: f64,
    /// Discriminator accuracy on real data
    pub disc_accuracy_real: f64,
    /// Discriminator accuracy on generated data
    pub disc_accuracy_generated: f64,
}

/// A complete checkpoint record
///
/// Every field is required; a record missing any of them fails to load.
/// The record is immutable once written, loading never mutates the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    /// Generator parameter state, keyed by variable name
    pub model_state_dict: BTreeMap<String, TensorState>,
    /// Latent vector length the generator was built with
    pub latent_vector_length: i64,
    /// Last finished epoch number
    pub epoch: usize,
    /// Generator training loss at that epoch
    pub epoch_loss: f64,
    /// Save timestamp, RFC 3339
    pub save_dttm: String,
    /// Name of the persisted model type
    pub class_name: String,
    /// Discriminator accuracy on real data
    pub disc_accuracy_real: f64,
    /// Discriminator accuracy on generated data
    pub disc_accuracy_generated: f64,
}

impl CheckpointRecord {
    /// Build a record from a live generator and its variable store
    pub fn for_generator(
        generator: &Generator,
        vs: &VarStore,
        snapshot: TrainingSnapshot,
    ) -> Result<Self, CheckpointError> {
        Ok(Self {
            model_state_dict: state_dict(vs)?,
            latent_vector_length: generator.latent_vector_length(),
            epoch: snapshot.epoch,
            epoch_loss: snapshot.epoch_loss,
            save_dttm: chrono::Utc::now().to_rfc3339(),
            class_name: "Generator".to_string(),
            disc_accuracy_real: snapshot.disc_accuracy_real,
            disc_accuracy_generated: snapshot.disc_accuracy_generated,
        })
    }

    /// Total number of parameters in the stored state
    pub fn num_parameters(&self) -> i64 {
        self.model_state_dict
            .values()
            .map(|t| t.shape.iter().product::<i64>())
            .sum()
    }
}

/// A generator reconstructed from a checkpoint, together with the
/// variable store owning its parameters and the full raw record.
#[derive(Debug)]
pub struct LoadedCheckpoint {
    pub generator: Generator,
    pub vs: VarStore,
    pub record: CheckpointRecord,
}

/// Extract the parameter state of a variable store
pub fn state_dict(vs: &VarStore) -> Result<BTreeMap<String, TensorState>, CheckpointError> {
    let mut state = BTreeMap::new();

    for (name, tensor) in vs.variables() {
        let shape = tensor.size();
        let data: Vec<f32> = tensor
            .detach()
            .to_device(Device::Cpu)
            .flatten(0, -1)
            .try_into()?;
        state.insert(name, TensorState { shape, data });
    }

    Ok(state)
}

/// Restore a parameter state into a variable store
///
/// The state must cover exactly the variables registered in the store.
/// Missing, unexpected, or wrong-shape entries fail without partially
/// applying the rest.
pub fn load_state_dict(
    vs: &VarStore,
    state: &BTreeMap<String, TensorState>,
) -> Result<(), CheckpointError> {
    let variables = vs.variables();

    for name in state.keys() {
        if !variables.contains_key(name) {
            return Err(CheckpointError::UnexpectedParameter(name.clone()));
        }
    }

    for (name, tensor) in &variables {
        let entry = state
            .get(name)
            .ok_or_else(|| CheckpointError::MissingParameter(name.clone()))?;
        if entry.shape != tensor.size() {
            return Err(CheckpointError::ShapeMismatch {
                name: name.clone(),
                expected: tensor.size(),
                found: entry.shape.clone(),
            });
        }
    }

    for (name, mut tensor) in variables {
        let entry = &state[&name];
        let source = Tensor::from_slice(&entry.data)
            .f_reshape(entry.shape.as_slice())?
            .to_device(tensor.device());
        tch::no_grad(|| tensor.f_copy_(&source))?;
    }

    Ok(())
}

/// Save a checkpoint record to the given path
///
/// Writes the record verbatim as JSON. Fails only if the destination is
/// unwritable.
pub fn save_checkpoint(
    record: &CheckpointRecord,
    path: impl AsRef<Path>,
) -> Result<(), CheckpointError> {
    let path = path.as_ref();

    info!("Saving checkpoint to {}", path.display());

    let payload = serde_json::to_string(record)?;
    std::fs::write(path, payload)?;

    info!("Saved model to checkpoint: {}", path.display());

    Ok(())
}

/// Load a checkpoint record from the given path
///
/// Reconstructs a [`Generator`] with the stored latent vector length and
/// weight initialization disabled, then restores the saved parameters
/// into it. Fails if the file is absent or malformed, if a required key
/// is missing, or if the stored parameter state does not match the
/// generator's expected structure.
pub fn load_checkpoint(
    path: impl AsRef<Path>,
    device: Device,
) -> Result<LoadedCheckpoint, CheckpointError> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)?;
    let record: CheckpointRecord = serde_json::from_str(&content)?;

    let vs = VarStore::new(device);
    let generator = Generator::new(
        &vs.root(),
        GeneratorConfig {
            latent_vector_length: record.latent_vector_length,
            init_weights_xavier: false,
        },
    );
    load_state_dict(&vs, &record.model_state_dict)?;

    info!("Loaded model from checkpoint: {}", path.display());
    info!("Class name: {}", record.class_name);
    info!("Epoch: {}", record.epoch);
    info!("Epoch train loss: {}", record.epoch_loss);
    info!("Save dttm: {}", record.save_dttm);

    Ok(LoadedCheckpoint {
        generator,
        vs,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CheckpointRecord {
        let mut state = BTreeMap::new();
        state.insert(
            "linear1.weight".to_string(),
            TensorState {
                shape: vec![2, 2],
                data: vec![0.5, -0.25, 1.0, 0.0],
            },
        );

        CheckpointRecord {
            model_state_dict: state,
            latent_vector_length: 2,
            epoch: 10,
            epoch_loss: 0.5,
            save_dttm: "2024-01-01T00:00:00Z".to_string(),
            class_name: "Generator".to_string(),
            disc_accuracy_real: 0.9,
            disc_accuracy_generated: 0.8,
        }
    }

    #[test]
    fn test_record_serialization_roundtrip() {
        let record = sample_record();

        let json = serde_json::to_string(&record).unwrap();
        let loaded: CheckpointRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, loaded);
    }

    #[test]
    fn test_record_num_parameters() {
        assert_eq!(sample_record().num_parameters(), 4);
    }

    #[test]
    fn test_state_dict_names() {
        let vs = VarStore::new(Device::Cpu);
        let _gen = Generator::new(&vs.root(), GeneratorConfig::default());

        let state = state_dict(&vs).unwrap();

        assert_eq!(state.len(), 8);
        for layer in ["linear1", "linear2", "linear3", "linear4"] {
            assert!(state.contains_key(&format!("{layer}.weight")));
            assert!(state.contains_key(&format!("{layer}.bias")));
        }
    }

    #[test]
    fn test_state_dict_shapes() {
        let vs = VarStore::new(Device::Cpu);
        let _gen = Generator::new(
            &vs.root(),
            GeneratorConfig {
                latent_vector_length: 64,
                init_weights_xavier: false,
            },
        );

        let state = state_dict(&vs).unwrap();

        assert_eq!(state["linear1.weight"].shape, vec![768, 64]);
        assert_eq!(state["linear4.weight"].shape, vec![3072, 2304]);
        assert_eq!(state["linear4.bias"].shape, vec![3072]);
    }

    #[test]
    fn test_load_state_dict_rejects_unexpected_key() {
        let vs = VarStore::new(Device::Cpu);
        let _gen = Generator::new(&vs.root(), GeneratorConfig::default());

        let mut state = state_dict(&vs).unwrap();
        state.insert(
            "linear5.weight".to_string(),
            TensorState {
                shape: vec![1],
                data: vec![0.0],
            },
        );

        let err = load_state_dict(&vs, &state).unwrap_err();
        assert!(matches!(err, CheckpointError::UnexpectedParameter(_)));
    }

    #[test]
    fn test_load_state_dict_rejects_missing_key() {
        let vs = VarStore::new(Device::Cpu);
        let _gen = Generator::new(&vs.root(), GeneratorConfig::default());

        let mut state = state_dict(&vs).unwrap();
        state.remove("linear2.bias");

        let err = load_state_dict(&vs, &state).unwrap_err();
        assert!(matches!(err, CheckpointError::MissingParameter(_)));
    }
}
