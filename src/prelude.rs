pub use serde::{Serialize, Deserialize};
pub use std::fs::File;
pub use std::io::{Read, Write};

pub use ndarray::*;
pub use ndarray_rand::RandomExt;
pub use ndarray_rand::rand_distr::Uniform;
pub use rand::rngs::StdRng;
pub use rand::{Rng, SeedableRng};

pub use crate::models::{Initialization, NeuralNetwork};
pub use crate::error::*;

// Internal re-exports
pub use crate::core::{
    Activation,
    BackPropagationTraining,
    Cache,
    MutationTraining,
    Neuron,
    NeuronLayer,
    Trainer,
};
pub use crate::dataset::Example;
