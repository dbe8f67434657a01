use crate::prelude::*;

/// An ordered sequence of neurons plus index links to the adjacent layers.
///
/// Layers live in the network's layer array and address their neighbors by
/// index. Exactly one layer in a chain has no input link (the input layer)
/// and exactly one has no output link (the output layer); the network's
/// append path keeps the links mutually consistent.
#[derive(Debug, Clone)]
pub struct NeuronLayer {
    neurons: Vec<Neuron>,
    index: usize,
    input: Option<usize>,
    output: Option<usize>,
}

impl NeuronLayer {
    pub(crate) fn with_width<R: Rng>(
        index: usize,
        width: usize,
        input: Option<usize>,
        fan_in: usize,
        seed_source: &mut R,
        activation: Activation,
    ) -> Self {
        let neurons = (0..width)
            .map(|_| Neuron::new(fan_in, seed_source, activation))
            .collect();
        Self {
            neurons,
            index,
            input,
            output: None,
        }
    }

    pub(crate) fn from_neurons(index: usize, neurons: Vec<Neuron>, input: Option<usize>) -> Self {
        Self {
            neurons,
            index,
            input,
            output: None,
        }
    }

    pub(crate) fn set_output_link(&mut self, output: usize) {
        self.output = Some(output);
    }

    /// Computes the per-neuron outputs for `inputs`, in neuron order.
    ///
    /// Input-layer neurons each read the single element at their own index;
    /// neurons of every other layer read the entire vector from offset 0.
    pub fn output(&mut self, inputs: &Array1<f64>) -> Result<Array1<f64>> {
        let per_channel = self.input.is_none();
        let mut result = Array1::zeros(self.neurons.len());
        for (i, neuron) in self.neurons.iter_mut().enumerate() {
            result[i] = neuron.output(inputs, if per_channel { i } else { 0 })?;
        }
        Ok(result)
    }

    pub fn is_input_layer(&self) -> bool {
        self.input.is_none()
    }

    pub fn is_output_layer(&self) -> bool {
        self.output.is_none()
    }

    pub fn is_hidden_layer(&self) -> bool {
        self.input.is_some() && self.output.is_some()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn input_link(&self) -> Option<usize> {
        self.input
    }

    pub fn output_link(&self) -> Option<usize> {
        self.output
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neuron(&self, index: usize) -> &Neuron {
        &self.neurons[index]
    }

    pub fn neuron_mut(&mut self, index: usize) -> &mut Neuron {
        &mut self.neurons[index]
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub(crate) fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    // Snapshot of each neuron's cached activated sum, in neuron order.
    pub(crate) fn cached_activations(&self) -> Result<Array1<f64>> {
        self.neurons
            .iter()
            .map(Neuron::cached_normalized_sum)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_source() -> StdRng {
        StdRng::seed_from_u64(9)
    }

    #[test]
    fn input_layer_routes_one_channel_per_neuron() {
        let mut rng = seed_source();
        let mut layer = NeuronLayer::with_width(0, 3, None, 1, &mut rng, Activation::Linear);
        for neuron in layer.neurons_mut() {
            neuron.initialize_weights(1.0);
        }
        let out = layer.output(&array![3.0, -1.0, 7.0]).unwrap();
        assert_eq!(out, array![3.0, -1.0, 7.0]);
    }

    #[test]
    fn non_input_layer_reads_the_whole_vector() {
        let mut rng = seed_source();
        let mut layer = NeuronLayer::with_width(1, 2, Some(0), 2, &mut rng, Activation::Linear);
        layer.neuron_mut(0).set_weight(0, 1.0);
        layer.neuron_mut(0).set_weight(1, 1.0);
        layer.neuron_mut(1).set_weight(0, 1.0);
        layer.neuron_mut(1).set_weight(1, -1.0);
        let out = layer.output(&array![0.5, -0.5]).unwrap();
        assert_eq!(out, array![0.0, 1.0]);
    }

    #[test]
    fn role_queries_follow_link_nullity() {
        let mut rng = seed_source();
        let mut input = NeuronLayer::with_width(0, 1, None, 1, &mut rng, Activation::Linear);
        let mut hidden = NeuronLayer::with_width(1, 1, Some(0), 1, &mut rng, Activation::Tanh);
        let output = NeuronLayer::with_width(2, 1, Some(1), 1, &mut rng, Activation::Tanh);
        input.set_output_link(1);
        hidden.set_output_link(2);

        assert!(input.is_input_layer() && !input.is_hidden_layer());
        assert!(hidden.is_hidden_layer() && !hidden.is_input_layer());
        assert!(output.is_output_layer() && !output.is_hidden_layer());
        assert_eq!(hidden.input_link(), Some(0));
        assert_eq!(hidden.output_link(), Some(2));
    }
}
