use crate::prelude::*;

/// Common contract of the two training strategies: drive `network` toward
/// `dataset` until convergence or an iteration cap, returning the iteration
/// count (the cap signals non-convergence).
pub trait Trainer {
    fn train(&self, network: &mut NeuralNetwork, dataset: &[Example]) -> Result<u64>;
}

/// Hyperparameters for gradient-free mutation training.
#[derive(Debug, Clone)]
pub struct MutationTraining {
    /// Per-neuron probability of mutating in a failed iteration.
    pub mutate_chance: f64,
    /// Largest tolerated absolute error on any output channel.
    pub min_error: f64,
    pub max_iterations: u64,
}

impl Trainer for MutationTraining {
    fn train(&self, network: &mut NeuralNetwork, dataset: &[Example]) -> Result<u64> {
        network.mutation_train(dataset, self.mutate_chance, self.min_error, self.max_iterations)
    }
}

/// Hyperparameters for backpropagation training. State caches must already
/// be enabled on the network.
#[derive(Debug, Clone)]
pub struct BackPropagationTraining {
    pub learning_speed: f64,
    /// One threshold per output channel.
    pub min_allowed_error: Vec<f64>,
    pub max_iterations: u64,
}

impl Trainer for BackPropagationTraining {
    fn train(&self, network: &mut NeuralNetwork, dataset: &[Example]) -> Result<u64> {
        network.back_propagation_train(
            dataset,
            self.learning_speed,
            &self.min_allowed_error,
            self.max_iterations,
        )
    }
}
