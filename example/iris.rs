use ffnet::dataset;
use ffnet::plot::plot_predictions;
use ffnet::prelude::*;

use rand::thread_rng;

#[derive(Debug, Deserialize)]
struct IrisRecord {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
    species: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = thread_rng();
    let records: Vec<IrisRecord> = dataset::read_records("data/iris.csv")?;
    let (training_records, test_records) = dataset::split_in_random(records, 0.7, &mut rng);

    let input_builder = |r: &IrisRecord| {
        array![r.sepal_length, r.sepal_width, r.petal_length, r.petal_width]
    };
    let output_builder = |r: &IrisRecord| match r.species.as_str() {
        "Iris-setosa" => array![1.0],
        "Iris-versicolor" => array![0.0],
        "Iris-virginica" => array![-1.0],
        other => panic!("unknown species {}", other),
    };
    let training = dataset::build_examples(&training_records, input_builder, output_builder);
    let test = dataset::build_examples(&test_records, input_builder, output_builder);

    let mut network = NeuralNetwork::new(
        4,
        &[8, 4, 8],
        1,
        &mut rng,
        Activation::Tanh,
        Initialization::NguyenWidrow,
    );
    network.enable_state_caches().randomise();

    let max_iterations = 30_000;
    let iterations = network.back_propagation_train(&training, 0.005, &[0.01], max_iterations)?;
    if iterations < max_iterations {
        println!("Converged after {} iterations", iterations);
    } else {
        println!("Stopped at the {} iteration cap", max_iterations);
    }

    let mut targets = Vec::with_capacity(test.len());
    let mut predictions = Vec::with_capacity(test.len());
    for (input, target) in &test {
        let answer = network.output(input)?;
        println!("{} -> {} | {}", input, answer, target);
        targets.push(target[0]);
        predictions.push(answer[0]);
    }

    // Call the plotting function
    plot_predictions::plot_comparison(&targets, &predictions, "iris_comparison.png").unwrap();

    network.save_to("./iris.model")?;

    Ok(())
}
