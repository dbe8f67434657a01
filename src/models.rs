use crate::prelude::*;
use crate::core::neurons::{read_i32, write_i32};
use log::debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Weight initialization scheme applied by [`NeuralNetwork::randomise`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
    Random,
    NguyenWidrow,
}

impl Initialization {
    pub(crate) fn tag(&self) -> i32 {
        match self {
            Initialization::Random => 0,
            Initialization::NguyenWidrow => 1,
        }
    }

    pub(crate) fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            0 => Ok(Initialization::Random),
            1 => Ok(Initialization::NguyenWidrow),
            other => Err(NNError::CorruptModelData(format!(
                "unknown initialization tag {}",
                other
            ))),
        }
    }
}

/// A feedforward network: an input layer, zero or more hidden layers and an
/// output layer held in one forward-ordered chain.
///
/// Construction leaves every trainable weight at zero; call
/// [`Self::randomise`] before training. The recorded [`Initialization`] is
/// consulted only by `randomise`.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    layers: Vec<NeuronLayer>,
    initialization: Initialization,
}

// Links are established here and nowhere else, so input == Some(i - 1) and
// output == Some(i + 1) hold for every layer in the chain.
fn append_layer<R: Rng>(
    layers: &mut Vec<NeuronLayer>,
    width: usize,
    seed_source: &mut R,
    activation: Activation,
) {
    let index = layers.len();
    let (input, fan_in) = match layers.last() {
        Some(previous) => (Some(previous.index()), previous.len()),
        None => (None, 1),
    };
    let layer = NeuronLayer::with_width(index, width, input, fan_in, seed_source, activation);
    if let Some(previous) = layers.last_mut() {
        previous.set_output_link(index);
    }
    layers.push(layer);
}

impl NeuralNetwork {
    /// Builds the layer chain for the given topology. Input-layer neurons are
    /// Linear pass-throughs with their single weight pinned to 1.0; every
    /// other neuron belongs to `activation` and keeps zero weights until
    /// [`Self::randomise`].
    pub fn new<R: Rng>(
        inputs: usize,
        hidden_sizes: &[usize],
        outputs: usize,
        seed_source: &mut R,
        activation: Activation,
        initialization: Initialization,
    ) -> Self {
        let mut layers = Vec::with_capacity(hidden_sizes.len() + 2);
        append_layer(&mut layers, inputs, seed_source, Activation::Linear);
        for neuron in layers[0].neurons_mut() {
            neuron.initialize_weights(1.0);
        }
        for &width in hidden_sizes {
            append_layer(&mut layers, width, seed_source, activation);
        }
        append_layer(&mut layers, outputs, seed_source, activation);
        Self {
            layers,
            initialization,
        }
    }

    /// Rebuilds a network from its persisted byte stream.
    ///
    /// The stream carries no RNG state, so each rebuilt neuron gets a fresh
    /// stream seeded from `seed_source`.
    pub fn from_reader<R: Read, G: Rng>(reader: &mut R, seed_source: &mut G) -> Result<Self> {
        let hidden_count = read_i32(reader)?;
        if hidden_count < 0 {
            return Err(NNError::CorruptModelData(format!(
                "negative hidden layer count {}",
                hidden_count
            )));
        }
        let mut layers: Vec<NeuronLayer> = Vec::with_capacity(hidden_count as usize + 2);
        for index in 0..hidden_count as usize + 2 {
            let neuron_count = read_i32(reader)?;
            if neuron_count < 0 {
                return Err(NNError::CorruptModelData(format!(
                    "negative neuron count {} in layer {}",
                    neuron_count, index
                )));
            }
            let mut neurons = Vec::with_capacity(neuron_count as usize);
            for _ in 0..neuron_count {
                neurons.push(Neuron::read_record(reader, seed_source)?);
            }
            let expected_weights = match layers.last() {
                Some(previous) => previous.len(),
                None => 1,
            };
            for neuron in &neurons {
                if neuron.weights().len() != expected_weights {
                    return Err(NNError::CorruptModelData(format!(
                        "layer {} neuron carries {} weights, expected {}",
                        index,
                        neuron.weights().len(),
                        expected_weights
                    )));
                }
            }
            let input = layers.last().map(NeuronLayer::index);
            if let Some(previous) = layers.last_mut() {
                previous.set_output_link(index);
            }
            layers.push(NeuronLayer::from_neurons(index, neurons, input));
        }
        let initialization = Initialization::from_tag(read_i32(reader)?)?;
        Ok(Self {
            layers,
            initialization,
        })
    }

    pub fn load<P: AsRef<Path>, R: Rng>(path: P, seed_source: &mut R) -> Result<Self> {
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        Self::from_reader(&mut buffer.as_slice(), seed_source)
    }

    /// Feeds `inputs` through every layer in order and returns the
    /// output-layer activations. Weights are untouched; only the state
    /// caches, when enabled, are updated as a side effect.
    pub fn output(&mut self, inputs: &Array1<f64>) -> Result<Array1<f64>> {
        if inputs.len() != self.layers[0].len() {
            return Err(NNError::DimensionMismatch(format!(
                "expected {} input values, got {}",
                self.layers[0].len(),
                inputs.len()
            )));
        }
        let mut current = inputs.clone();
        for layer in &mut self.layers {
            current = layer.output(&current)?;
        }
        Ok(current)
    }

    /// Redraws every non-input weight and bias uniformly from `(-0.5, 0.5)`,
    /// layer by layer, neuron by neuron.
    ///
    /// Under [`Initialization::NguyenWidrow`] a second pass rescales each
    /// hidden-layer neuron's weight vector to the layer norm
    /// `beta = 0.7 * width^(1/fan_in)` and redraws its bias from
    /// `(-beta, beta)`, spreading initial sums across the useful range of a
    /// saturating activation. The output layer keeps its plain draws.
    pub fn randomise(&mut self) -> &mut Self {
        for layer in self.layers.iter_mut().skip(1) {
            for neuron in layer.neurons_mut() {
                neuron.randomise();
            }
        }
        if self.initialization == Initialization::NguyenWidrow {
            for li in 1..self.layers.len() - 1 {
                let width = self.layers[li].len();
                let fan_in = self.layers[li - 1].len();
                // Zero-width layers leave beta undefined; skip them.
                if width == 0 || fan_in == 0 {
                    continue;
                }
                let beta = 0.7 * (width as f64).powf(1.0 / fan_in as f64);
                for neuron in self.layers[li].neurons_mut() {
                    neuron.nguyen_widrow_rescale(beta);
                }
            }
        }
        self
    }

    /// Enables the gradient-staging cache on every neuron, input layer
    /// included: backpropagation reads the predecessor layer's cached
    /// activations, and the predecessor may be the input layer.
    pub fn enable_state_caches(&mut self) -> &mut Self {
        for layer in &mut self.layers {
            for neuron in layer.neurons_mut() {
                neuron.enable_cache();
            }
        }
        self
    }

    pub fn disable_state_caches(&mut self) -> &mut Self {
        for layer in &mut self.layers {
            for neuron in layer.neurons_mut() {
                neuron.disable_cache();
            }
        }
        self
    }

    /// Gradient-free training by random perturbation.
    ///
    /// Each iteration first evaluates the dataset; if every output channel of
    /// every example is within `min_error` of its target, training stops.
    /// Otherwise every non-input neuron mutates independently with
    /// probability `mutate_chance` (weights and bias perturbed by uniform
    /// draws in `(-0.1, 0.1)`, then clamped into `[-1, 1]`). There is no
    /// fitness comparison and no rollback; the walk is not guaranteed to
    /// converge. Returns the iteration count, `max_iterations` signalling
    /// non-convergence.
    pub fn mutation_train(
        &mut self,
        dataset: &[Example],
        mutate_chance: f64,
        min_error: f64,
        max_iterations: u64,
    ) -> Result<u64> {
        let mut iterations: u64 = 0;
        loop {
            iterations += 1;
            if iterations % 1000 == 0 {
                debug!("mutation iteration {}", iterations);
            }
            let mut valid = true;
            'examples: for (input, target) in dataset {
                let predicted = self.output(input)?;
                if target.len() != predicted.len() {
                    return Err(NNError::DimensionMismatch(format!(
                        "target carries {} values, the network outputs {}",
                        target.len(),
                        predicted.len()
                    )));
                }
                for j in 0..predicted.len() {
                    if (target[j] - predicted[j]).abs() > min_error {
                        valid = false;
                        break 'examples;
                    }
                }
            }
            if valid {
                break;
            } else if iterations < max_iterations {
                let rate = 0.1;
                for layer in self.layers.iter_mut().skip(1) {
                    for neuron in layer.neurons_mut() {
                        neuron.mutate(mutate_chance, rate)?;
                    }
                }
            } else {
                break;
            }
        }
        Ok(iterations)
    }

    /// Per-example stochastic gradient descent with staged corrections.
    ///
    /// Requires state caches on every neuron and one error threshold per
    /// output channel. Examples are processed in dataset order; for each, a
    /// forward pass fills the caches, error signals propagate backward from
    /// the output layer, corrections are staged against the predecessor
    /// layers' cached activations and then committed network-wide, one full
    /// weight update per example. An iteration converges when every channel's
    /// max absolute error over the dataset is within its threshold. Returns
    /// the iteration count, `max_iterations` signalling non-convergence.
    pub fn back_propagation_train(
        &mut self,
        dataset: &[Example],
        learning_speed: f64,
        min_allowed_error: &[f64],
        max_iterations: u64,
    ) -> Result<u64> {
        let output_width = self.output_layer().len();
        if min_allowed_error.len() != output_width {
            return Err(NNError::DimensionMismatch(format!(
                "expected {} error thresholds, got {}",
                output_width,
                min_allowed_error.len()
            )));
        }
        let caches_missing = self
            .layers
            .iter()
            .any(|layer| layer.neurons().iter().any(|neuron| !neuron.has_cache()));
        if caches_missing {
            return Err(NNError::PreconditionViolation(
                "back-propagation needs state caches enabled on every neuron".to_string(),
            ));
        }
        let last = self.layers.len() - 1;
        let mut iterations: u64 = 0;
        while iterations < max_iterations {
            let mut current_error = Array1::zeros(output_width);
            for (input, target) in dataset {
                if target.len() != output_width {
                    return Err(NNError::DimensionMismatch(format!(
                        "target carries {} values, the network outputs {}",
                        target.len(),
                        output_width
                    )));
                }
                let answer = self.output(input)?;

                // Output layer: error signals and corrections staged against
                // the predecessor's cached activations.
                let predecessor_activations = self.layers[last - 1].cached_activations()?;
                let mut signals = Array1::zeros(output_width);
                for (j, neuron) in self.layers[last].neurons_mut().iter_mut().enumerate() {
                    let error = target[j] - answer[j];
                    current_error[j] = f64::max(current_error[j], error.abs());
                    let signal = error * neuron.activation().derivative(neuron.cached_raw_sum()?);
                    signals[j] = signal;
                    let weight_count = neuron.weights().len();
                    for k in 0..weight_count {
                        neuron.stage_weight_correction(
                            k,
                            learning_speed * signal * predecessor_activations[k],
                        )?;
                    }
                    neuron.stage_bias_correction(learning_speed * signal)?;
                }

                // Hidden layers, walking backward toward the input layer. A
                // hidden neuron's signal sums its successors' signals through
                // the weights pointing at it.
                for li in (1..last).rev() {
                    let width = self.layers[li].len();
                    let successor = &self.layers[li + 1];
                    let mut new_signals = Array1::zeros(width);
                    for j in 0..width {
                        let mut propagated = 0.0;
                        for (k, successor_neuron) in successor.neurons().iter().enumerate() {
                            propagated += signals[k] * successor_neuron.weights()[j];
                        }
                        new_signals[j] = propagated;
                    }
                    let predecessor_activations = self.layers[li - 1].cached_activations()?;
                    for (j, neuron) in self.layers[li].neurons_mut().iter_mut().enumerate() {
                        let signal =
                            new_signals[j] * neuron.activation().derivative(neuron.cached_raw_sum()?);
                        new_signals[j] = signal;
                        let weight_count = neuron.weights().len();
                        for k in 0..weight_count {
                            neuron.stage_weight_correction(
                                k,
                                learning_speed * signal * predecessor_activations[k],
                            )?;
                        }
                        neuron.stage_bias_correction(learning_speed * signal)?;
                    }
                    signals = new_signals;
                }

                // One full weight update per example.
                for layer in self.layers.iter_mut().skip(1) {
                    for neuron in layer.neurons_mut() {
                        neuron.commit_correction()?;
                    }
                }
            }
            if iterations % 1000 == 0 {
                debug!(
                    "iteration {} - per-channel max errors {:?}",
                    iterations, current_error
                );
            }
            let valid = current_error
                .iter()
                .zip(min_allowed_error)
                .all(|(observed, allowed)| observed <= allowed);
            if valid {
                break;
            }
            // TODO: shuffle the example order between dataset passes
            iterations += 1;
        }
        Ok(iterations)
    }

    /// Writes the persisted form: hidden-layer count, each layer's neuron
    /// records in forward order, then the initialization tag.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_i32(writer, self.hidden_layers().len() as i32)?;
        for layer in &self.layers {
            write_i32(writer, layer.len() as i32)?;
            for neuron in layer.neurons() {
                neuron.write_record(writer)?;
            }
        }
        write_i32(writer, self.initialization.tag())
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        File::create(path)?.write_all(&bytes)?;
        Ok(())
    }

    pub fn input_layer(&self) -> &NeuronLayer {
        &self.layers[0]
    }

    pub fn output_layer(&self) -> &NeuronLayer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn hidden_layers(&self) -> &[NeuronLayer] {
        &self.layers[1..self.layers.len() - 1]
    }

    pub fn layers(&self) -> &[NeuronLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [NeuronLayer] {
        &mut self.layers
    }

    pub fn initialization_method(&self) -> Initialization {
        self.initialization
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].len()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer().len()
    }
}
