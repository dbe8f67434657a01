extern crate plotters;

pub mod core;
pub mod dataset;
pub mod error;
pub mod models;
pub mod prelude;

// Re-export types
pub use crate::core::{Activation, Neuron, NeuronLayer, Trainer};
pub use crate::models::{Initialization, NeuralNetwork};

pub mod plot {
    pub mod plot_predictions;
}
