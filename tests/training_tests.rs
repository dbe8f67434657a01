use approx::assert_abs_diff_eq;
use ffnet::prelude::*;

fn seeded() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn bare_line(rng: &mut StdRng) -> NeuralNetwork {
    NeuralNetwork::new(
        1,
        &[],
        1,
        rng,
        Activation::Linear,
        Initialization::Random,
    )
}

#[test]
fn backprop_fits_a_single_linear_example() {
    let mut rng = seeded();
    let mut net = bare_line(&mut rng);
    net.enable_state_caches();
    let dataset = vec![(array![1.0], array![1.0])];
    // Pass one drives the weight and bias onto the target, pass two observes
    // the fit.
    let iterations = net
        .back_propagation_train(&dataset, 0.5, &[0.05], 1000)
        .unwrap();
    assert_eq!(iterations, 1);
    let answer = net.output(&array![1.0]).unwrap();
    assert_abs_diff_eq!(answer[0], 1.0, epsilon = 1e-9);
}

#[test]
fn backprop_fits_a_two_point_line() {
    let mut rng = seeded();
    let mut net = bare_line(&mut rng);
    net.enable_state_caches();
    let dataset = vec![(array![1.0], array![1.0]), (array![-1.0], array![-1.0])];
    let iterations = net
        .back_propagation_train(&dataset, 0.25, &[0.01], 1000)
        .unwrap();
    assert!(iterations < 1000);
    let answer = net.output(&array![1.0]).unwrap();
    assert_abs_diff_eq!(answer[0], 1.0, epsilon = 0.05);
}

#[test]
fn backprop_generalizes_past_the_training_points() {
    let mut rng = seeded();
    let mut net = bare_line(&mut rng);
    net.enable_state_caches();
    let dataset = vec![
        (array![1.0], array![1.0]),
        (array![2.0], array![2.0]),
        (array![-1.0], array![-1.0]),
    ];
    let iterations = net
        .back_propagation_train(&dataset, 0.1, &[0.001], 10_000)
        .unwrap();
    assert!(iterations < 10_000);
    // The fitted line is the identity, so an input outside the dataset lands
    // on itself.
    let answer = net.output(&array![3.0]).unwrap();
    assert_abs_diff_eq!(answer[0], 3.0, epsilon = 0.01);
}

#[test]
fn backprop_reaches_through_a_hidden_layer() {
    let mut rng = seeded();
    let mut net = NeuralNetwork::new(
        1,
        &[1],
        1,
        &mut rng,
        Activation::Linear,
        Initialization::Random,
    );
    net.enable_state_caches();
    net.layers_mut()[1].neuron_mut(0).set_weight(0, 1.0);
    net.layers_mut()[2].neuron_mut(0).set_weight(0, 1.0);
    let dataset = vec![(array![1.0], array![2.0])];
    let iterations = net
        .back_propagation_train(&dataset, 0.05, &[0.01], 5000)
        .unwrap();
    assert!(iterations < 5000);
    assert_abs_diff_eq!(net.output(&array![1.0]).unwrap()[0], 2.0, epsilon = 0.02);
    // The hidden neuron moved, so the error signal reached it.
    assert!(net.layers()[1].neuron(0).weights()[0] > 1.0);
}

#[test]
fn backprop_returns_zero_when_already_converged() {
    let mut rng = seeded();
    let mut net = bare_line(&mut rng);
    net.enable_state_caches();
    net.layers_mut()[1].neuron_mut(0).set_weight(0, 1.0);
    let dataset = vec![(array![0.5], array![0.5])];
    let iterations = net
        .back_propagation_train(&dataset, 0.1, &[0.1], 50)
        .unwrap();
    assert_eq!(iterations, 0);
}

#[test]
fn backprop_requires_caches_and_matching_thresholds() {
    let mut rng = seeded();
    let mut net = NeuralNetwork::new(
        1,
        &[2],
        1,
        &mut rng,
        Activation::Tanh,
        Initialization::Random,
    );
    let dataset = vec![(array![0.1], array![0.2])];
    assert!(matches!(
        net.back_propagation_train(&dataset, 0.1, &[0.1], 10),
        Err(NNError::PreconditionViolation(_))
    ));
    net.enable_state_caches();
    assert!(matches!(
        net.back_propagation_train(&dataset, 0.1, &[0.1, 0.1], 10),
        Err(NNError::DimensionMismatch(_))
    ));
}

#[test]
fn training_rejects_mismatched_example_dimensions() {
    let mut rng = seeded();
    let mut net = NeuralNetwork::new(
        2,
        &[],
        1,
        &mut rng,
        Activation::Tanh,
        Initialization::Random,
    );
    net.enable_state_caches().randomise();
    let wide_target = vec![(array![0.1, 0.2], array![0.3, 0.4])];
    assert!(matches!(
        net.back_propagation_train(&wide_target, 0.1, &[0.5], 10),
        Err(NNError::DimensionMismatch(_))
    ));
    let short_input = vec![(array![0.1], array![0.3])];
    assert!(matches!(
        net.mutation_train(&short_input, 0.5, 0.5, 10),
        Err(NNError::DimensionMismatch(_))
    ));
}

#[test]
fn mutation_returns_one_when_already_converged() {
    let mut rng = seeded();
    let mut net = bare_line(&mut rng);
    let dataset = vec![(array![0.7], array![0.0])];
    let iterations = net.mutation_train(&dataset, 1.0, 0.5, 100).unwrap();
    assert_eq!(iterations, 1);
    // Convergence at the first check means no mutation ever ran.
    assert_eq!(net.output_layer().neuron(0).weights()[0], 0.0);
}

#[test]
fn mutation_exhausts_the_cap_on_an_impossible_target() {
    let mut rng = seeded();
    let mut net = bare_line(&mut rng);
    let dataset = vec![(array![1.0], array![5.0])];
    let iterations = net.mutation_train(&dataset, 1.0, 0.1, 200).unwrap();
    assert_eq!(iterations, 200);
    // Clamping keeps the walk inside the unit box, which is why the target
    // stays out of reach.
    let neuron = net.output_layer().neuron(0);
    assert!(neuron.weights()[0].abs() <= 1.0);
    assert!(neuron.bias().abs() <= 1.0);
}

#[test]
fn mutation_walks_a_line_fit_into_tolerance() {
    let mut rng = seeded();
    let mut net = bare_line(&mut rng);
    net.randomise();
    let dataset = vec![
        (array![-1.0], array![-0.5]),
        (array![0.0], array![0.0]),
        (array![1.0], array![0.5]),
    ];
    let iterations = net.mutation_train(&dataset, 1.0, 0.3, 500_000).unwrap();
    assert!(iterations < 500_000);
    for (input, target) in &dataset {
        let answer = net.output(input).unwrap();
        assert!((target[0] - answer[0]).abs() <= 0.3);
    }
}

#[test]
fn trainers_delegate_to_the_network_methods() {
    let mut rng = seeded();
    let mut net = bare_line(&mut rng);
    net.enable_state_caches();
    let dataset = vec![(array![1.0], array![1.0])];
    let trainer = BackPropagationTraining {
        learning_speed: 0.5,
        min_allowed_error: vec![0.05],
        max_iterations: 1000,
    };
    assert_eq!(trainer.train(&mut net, &dataset).unwrap(), 1);

    let mut walker = bare_line(&mut rng);
    let near_zero = vec![(array![0.3], array![0.0])];
    let trainer = MutationTraining {
        mutate_chance: 1.0,
        min_error: 0.5,
        max_iterations: 10,
    };
    assert_eq!(trainer.train(&mut walker, &near_zero).unwrap(), 1);
}
