use ffnet::dataset;
use ffnet::prelude::*;

use rand::thread_rng;

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = thread_rng();

    // XOR by backpropagation, targets pushed toward the tanh rails.
    let examples: Vec<Example> = vec![
        (array![0.0, 0.0], array![-0.9]),
        (array![0.0, 1.0], array![0.9]),
        (array![1.0, 0.0], array![0.9]),
        (array![1.0, 1.0], array![-0.9]),
    ];
    let mut network = NeuralNetwork::new(
        2,
        &[3],
        1,
        &mut rng,
        Activation::Tanh,
        Initialization::NguyenWidrow,
    );
    network.enable_state_caches().randomise();
    let trainer = BackPropagationTraining {
        learning_speed: 0.1,
        min_allowed_error: vec![0.3],
        max_iterations: 20_000,
    };
    let iterations = trainer.train(&mut network, &examples)?;
    if iterations < trainer.max_iterations {
        println!("xor converged after {} iterations", iterations);
    } else {
        println!("xor stopped at the {} iteration cap", trainer.max_iterations);
    }
    for (input, target) in &examples {
        println!("{} -> {} | {}", input, network.output(input)?, target);
    }

    // A line fit by random mutation, the gradient-free strategy.
    let inputs = vec![array![-1.0], array![0.0], array![1.0]];
    let examples = dataset::examples_from_fn(&inputs, |input| input * 0.5);
    let mut line = NeuralNetwork::new(
        1,
        &[],
        1,
        &mut rng,
        Activation::Linear,
        Initialization::Random,
    );
    line.randomise();
    let trainer = MutationTraining {
        mutate_chance: 0.5,
        min_error: 0.2,
        max_iterations: 100_000,
    };
    let iterations = trainer.train(&mut line, &examples)?;
    if iterations < trainer.max_iterations {
        println!("line fit converged after {} iterations", iterations);
    } else {
        println!("line fit stopped at the {} iteration cap", trainer.max_iterations);
    }
    for (input, target) in &examples {
        println!("{} -> {} | {}", input, line.output(input)?, target);
    }

    Ok(())
}
