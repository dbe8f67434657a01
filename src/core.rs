// src/core.rs
pub mod activations;
pub mod layers;
pub mod neurons;
pub mod trainers;

// Re-export commonly used items
pub use activations::Activation;
pub use layers::NeuronLayer;
pub use neurons::{Cache, Neuron};
pub use trainers::{BackPropagationTraining, MutationTraining, Trainer};
