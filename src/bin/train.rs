extern crate birdbrain;
extern crate rand;

use birdbrain::dataset::{LabeledDataset, TrainSet};
use birdbrain::network::Network;
use birdbrain::trainer::{LearningMode, Logging, StopCondition, Trainable, Trainer};
use rand::Rng;
use rand::distributions::{IndependentSample, Normal, Range};

/// The shape the game's capture tooling writes out for its 5-feature,
/// 1-label telemetry.
const DESCRIPTOR: &'static str = r#"{"widths":[5,4,1]}"#;

/// Synthesizes telemetry-shaped frames: bird height, vertical speed, pipe
/// gap size, gap height and horizontal distance, scaled the way the
/// capture code scales them, labelled with the jump/no-jump decision.
fn generate_data<R: Rng>(num_samples: usize, rng: &mut R) -> TrainSet {
    let heights = Range::new(0.5, 4.5);
    let speeds = Range::new(-2.0, 2.0);
    let gaps = Range::new(1.2, 1.8);
    let gap_heights = Range::new(1.0, 4.0);
    let distances = Range::new(0.0, 3.0);
    let noise = Normal::new(0.0, 0.05);

    let mut set = TrainSet::new(5, 1);
    for _ in 0..num_samples {
        let height = heights.ind_sample(rng);
        let speed = speeds.ind_sample(rng);
        let gap = gaps.ind_sample(rng);
        let gap_height = gap_heights.ind_sample(rng);
        let distance = distances.ind_sample(rng);

        // Jump whenever the bird is about to fall past the lower lip of
        // the upcoming gap.
        let jump = height + 0.5 * speed > gap_height + 0.5 * gap;

        let input = vec![height + noise.ind_sample(rng),
                         speed + noise.ind_sample(rng),
                         gap + noise.ind_sample(rng),
                         gap_height + noise.ind_sample(rng),
                         distance + noise.ind_sample(rng)];
        set.push(input, vec![if jump { 1.0 } else { 0.0 }])
            .expect("generated samples have the declared widths");
    }
    set
}

fn score<T: Trainable>(set_name: &str, model: &mut T, set: &TrainSet) {
    let mut num_correct = 0;
    for index in 0..set.len() {
        let (input, target) = set.sample(index);
        let output = model.infer(input).expect("scoring data matches the model");
        if (output[0] >= 0.5) == (target[0] >= 0.5) {
            num_correct += 1;
        }
    }
    println!("{} set results: {} of {} correct",
             set_name,
             num_correct,
             set.len());
}

fn main() {
    let mut rng = rand::thread_rng();

    let training_data = generate_data(10_000, &mut rng);
    let network = Network::from_descriptor(DESCRIPTOR, &mut rng)
        .expect("the built-in descriptor is well formed");

    let mut network = Trainer::new(network)
        .learning_rate(0.3)
        .learning_mode(LearningMode::Batch(50))
        .logging(Logging::Iterations(500))
        .stop_condition(StopCondition::Iterations(5_000))
        .train(&training_data, &mut rng)
        .expect("the training data matches the network shape");

    println!();
    score("Training", &mut network, &training_data);
    score("Test", &mut network, &generate_data(1_000, &mut rng));
}
