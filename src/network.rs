//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) trained by
//! error backpropagation.
//!
//! # Example
//!
//! Let's train a small network to compute the XOR function:
//!
//! ```
//! # extern crate rand;
//! # extern crate birdbrain;
//! # fn main() {
//! use birdbrain::network::Network;
//!
//! // Create examples of the XOR function
//! let examples = [([0.0, 0.0], [0.0]),
//!                 ([0.0, 1.0], [1.0]),
//!                 ([1.0, 0.0], [1.0]),
//!                 ([1.0, 1.0], [0.0])];
//!
//! // Train a network using those examples
//! let mut rng = rand::thread_rng();
//! let mut network = Network::from_widths(&[2, 8, 1], &mut rng).unwrap();
//! for _ in 0..10_000 {
//!     for &(ref input, ref target) in &examples {
//!         network.train_sample(input, target, 0.5, 1).unwrap();
//!     }
//! }
//!
//! // And verify the network correctly computes XOR!
//! for &(ref input, ref target) in &examples {
//!     let output = network.feed_forward(input).unwrap();
//!     assert_eq!(output[0] > 0.5, target[0] > 0.5);
//! }
//! # }
//! ```

use itertools::multizip;
use rand::Rng;

use dataset::LabeledDataset;
use error::{Error, Result};
use layer::Layer;
use topology::Topology;
use trainer::Trainable;
use utils::Back;

/// A feedforward neural network.
///
/// The network owns its parameters and the per-call scratch state the
/// training passes share: one activation vector per layer (layer 0 holds a
/// copy of the raw input), one sigmoid-derivative vector per layer, and one
/// error vector per layer. The scratch buffers are sized once at
/// construction and overwritten by every pass.
#[derive(Clone, Debug)]
pub struct Network {
    topology: Topology,
    layers: Vec<Layer>,
    outputs: Vec<Vec<f64>>,
    derivatives: Vec<Vec<f64>>, // slot 0 stays empty: the input layer has no activation
    errors: Vec<Vec<f64>>,      // slot 0 stays empty
}

impl Network {
    /// Creates a new, untrained network with uniform-random parameters
    /// drawn from `rng`: weights in [-1, 1], biases in [-0.7, 0.7].
    pub fn new<R: Rng>(topology: Topology, rng: &mut R) -> Self {
        let depth = topology.depth();
        let mut layers = Vec::with_capacity(depth - 1);
        for layer in 1..depth {
            layers.push(Layer::random(topology.width(layer - 1), topology.width(layer), rng));
        }

        let mut outputs = Vec::with_capacity(depth);
        let mut derivatives = Vec::with_capacity(depth);
        let mut errors = Vec::with_capacity(depth);
        outputs.push(vec![0.0; topology.input_len()]);
        derivatives.push(Vec::new());
        errors.push(Vec::new());
        for layer in 1..depth {
            outputs.push(vec![0.0; topology.width(layer)]);
            derivatives.push(vec![0.0; topology.width(layer)]);
            errors.push(vec![0.0; topology.width(layer)]);
        }

        Network {
            topology: topology,
            layers: layers,
            outputs: outputs,
            derivatives: derivatives,
            errors: errors,
        }
    }

    /// Creates a network directly from a layer-width sequence.
    pub fn from_widths<R: Rng>(widths: &[usize], rng: &mut R) -> Result<Self> {
        Topology::new(widths.to_vec()).map(|topology| Network::new(topology, rng))
    }

    /// Creates a network from a JSON topology descriptor such as
    /// `{"widths":[5,4,1]}`.
    pub fn from_descriptor<R: Rng>(descriptor: &str, rng: &mut R) -> Result<Self> {
        Topology::from_json(descriptor).map(|topology| Network::new(topology, rng))
    }

    /// Returns the shape this network was built from.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.topology.input_len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.topology.output_len()
    }

    /// Feeds the provided `input` through the network, returning the
    /// output layer's activations.
    ///
    /// Overwrites the per-layer activation and derivative state that a
    /// following backward pass reads. Inference alone never touches the
    /// weights.
    pub fn feed_forward(&mut self, input: &[f64]) -> Result<&[f64]> {
        if input.len() != self.input_len() {
            return Err(Error::DimensionMismatch {
                what: "input",
                got: input.len(),
                expected: self.input_len(),
            });
        }
        self.outputs[0].copy_from_slice(input);
        for (index, layer) in self.layers.iter().enumerate() {
            let (inputs, outputs) = adjacent_mut(&mut self.outputs, index);
            layer.forward(inputs, outputs, &mut self.derivatives[index + 1]);
        }
        Ok(self.outputs.back().as_slice())
    }

    /// Trains repeatedly on a single labelled sample: `iterations`
    /// forward/backward/update triples against the same pair at the given
    /// learning `rate`.
    pub fn train_sample(&mut self,
                        input: &[f64],
                        target: &[f64],
                        rate: f64,
                        iterations: usize)
                        -> Result<()> {
        check_rate(rate)?;
        if iterations == 0 {
            return Err(Error::InvalidHyperparameter("iterations"));
        }
        for _ in 0..iterations {
            self.step(input, target, rate)?;
        }
        Ok(())
    }

    /// Trains against batches drawn from `set`.
    ///
    /// Each of the `epochs` iterations extracts one fresh batch of
    /// `batch_size` samples from the dataset, then runs one
    /// forward/backward/update triple per sample, in batch order. Updates
    /// apply immediately per sample rather than as an averaged batch
    /// gradient.
    pub fn train_set<D, R>(&mut self,
                           set: &D,
                           epochs: usize,
                           batch_size: usize,
                           rate: f64,
                           rng: &mut R)
                           -> Result<()>
        where D: LabeledDataset,
              R: Rng
    {
        check_rate(rate)?;
        if epochs == 0 {
            return Err(Error::InvalidHyperparameter("epochs"));
        }
        if batch_size == 0 {
            return Err(Error::InvalidHyperparameter("batch size"));
        }
        if set.input_len() != self.input_len() {
            return Err(Error::DatasetShapeMismatch {
                what: "input",
                got: set.input_len(),
                expected: self.input_len(),
            });
        }
        if set.target_len() != self.output_len() {
            return Err(Error::DatasetShapeMismatch {
                what: "target",
                got: set.target_len(),
                expected: self.output_len(),
            });
        }
        if set.is_empty() {
            return Err(Error::EmptyDataset);
        }

        for _ in 0..epochs {
            let batch = set.batch(batch_size, rng);
            for &(input, target) in batch.iter() {
                self.step(input, target, rate)?;
            }
        }
        Ok(())
    }

    /// Returns the mean squared error between the network's prediction for
    /// `input` and `target`, normalized by twice the output width.
    ///
    /// Runs a forward pass, so scratch state is overwritten; the
    /// parameters are untouched.
    pub fn mse(&mut self, input: &[f64], target: &[f64]) -> Result<f64> {
        self.check_target(target)?;
        self.feed_forward(input)?;
        Ok(mean_squared_error(self.outputs.back(), target))
    }

    /// Runs one forward/backward/update triple, returning the sample's
    /// pre-update mean squared error.
    fn step(&mut self, input: &[f64], target: &[f64], rate: f64) -> Result<f64> {
        self.check_target(target)?;
        self.feed_forward(input)?;
        let error = mean_squared_error(self.outputs.back(), target);
        self.feed_backward(target);
        self.apply_updates(rate);
        Ok(error)
    }

    /// Propagates the error between the last forward pass and `target`
    /// backwards, layer by layer in reverse topological order.
    fn feed_backward(&mut self, target: &[f64]) {
        {
            let errors = self.errors.mut_back();
            let outputs = self.outputs.back();
            let derivatives = self.derivatives.back();
            for (error, &output, &derivative, &expected) in multizip((errors.iter_mut(),
                                                                      outputs.iter(),
                                                                      derivatives.iter(),
                                                                      target.iter())) {
                *error = (output - expected) * derivative;
            }
        }

        let last = self.topology.depth() - 1;
        for index in (1..last).rev() {
            let (own_errors, next_errors) = self.errors[index..].split_at_mut(1);
            self.layers[index].backward(&next_errors[0],
                                        &self.derivatives[index],
                                        &mut own_errors[0]);
        }
    }

    /// Applies the most recent backward pass's deltas to every layer.
    fn apply_updates(&mut self, rate: f64) {
        for (index, layer) in self.layers.iter_mut().enumerate() {
            layer.apply_update(rate, &self.errors[index + 1], &self.outputs[index]);
        }
    }

    fn check_target(&self, target: &[f64]) -> Result<()> {
        if target.len() != self.output_len() {
            return Err(Error::DimensionMismatch {
                what: "target",
                got: target.len(),
                expected: self.output_len(),
            });
        }
        Ok(())
    }
}

impl Trainable for Network {
    fn input_len(&self) -> usize {
        Network::input_len(self)
    }

    fn output_len(&self) -> usize {
        Network::output_len(self)
    }

    fn infer(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.feed_forward(input).map(|output| output.to_vec())
    }

    fn learn_one(&mut self, input: &[f64], target: &[f64], rate: f64) -> Result<f64> {
        self.step(input, target, rate)
    }
}

/// Splits the layer-indexed buffers around `index`, yielding layer
/// `index`'s slice immutably and layer `index + 1`'s mutably.
fn adjacent_mut(buffers: &mut [Vec<f64>], index: usize) -> (&[f64], &mut [f64]) {
    let (front, back) = buffers[index..].split_at_mut(1);
    (&front[0], &mut back[0])
}

fn check_rate(rate: f64) -> Result<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidHyperparameter("learning rate"))
    }
}

/// Computes the squared error between `actual` and `expected`, summed over
/// the output neurons and normalized by twice the output width.
fn mean_squared_error(actual: &[f64], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    let mut error = 0.0;
    for (&a, &e) in actual.iter().zip(expected.iter()) {
        error += (e - a) * (e - a);
    }
    error / (2.0 * actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use activator;
    use dataset::TrainSet;
    use error::Error;
    use rand::{SeedableRng, XorShiftRng};

    fn rng(seed: u32) -> XorShiftRng {
        XorShiftRng::from_seed([seed, 7, 29, 113])
    }

    fn xor_samples() -> [([f64; 2], [f64; 1]); 4] {
        [([0.0, 0.0], [0.0]),
         ([0.0, 1.0], [1.0]),
         ([1.0, 0.0], [1.0]),
         ([1.0, 1.0], [0.0])]
    }

    #[test]
    fn inference_is_deterministic_and_read_only() {
        let mut network = Network::from_widths(&[3, 4, 2], &mut rng(1)).unwrap();
        let snapshot = network.layers.clone();
        let input = [0.25, -0.5, 0.75];

        let first = network.feed_forward(&input).unwrap().to_vec();
        let second = network.feed_forward(&input).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(network.layers, snapshot);
    }

    #[test]
    fn rejects_misshapen_input() {
        let mut network = Network::from_widths(&[2, 3, 1], &mut rng(2)).unwrap();
        match network.feed_forward(&[1.0, 2.0, 3.0]) {
            Err(Error::DimensionMismatch { what: "input", got: 3, expected: 2 }) => {}
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn rejects_misshapen_target() {
        let mut network = Network::from_widths(&[2, 3, 1], &mut rng(3)).unwrap();
        match network.train_sample(&[0.0, 1.0], &[1.0, 0.0], 0.3, 1) {
            Err(Error::DimensionMismatch { what: "target", got: 2, expected: 1 }) => {}
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn rejects_degenerate_hyperparameters() {
        let mut network = Network::from_widths(&[2, 2], &mut rng(4)).unwrap();
        assert!(network.train_sample(&[0.0, 1.0], &[1.0, 0.0], 0.3, 0).is_err());
        assert!(network.train_sample(&[0.0, 1.0], &[1.0, 0.0], 0.0, 1).is_err());
        assert!(network.train_sample(&[0.0, 1.0], &[1.0, 0.0], -0.5, 1).is_err());
    }

    #[test]
    fn outputs_stay_inside_the_unit_interval() {
        let mut network = Network::from_widths(&[2, 3, 2], &mut rng(5)).unwrap();
        for input in &[[0.0, 0.0], [5.0, -5.0], [-3.5, 2.25], [1.0, 1.0]] {
            for &output in network.feed_forward(input).unwrap() {
                assert!(output > 0.0 && output < 1.0);
            }
        }
    }

    #[test]
    fn single_sample_error_decreases_under_training() {
        let mut network = Network::from_widths(&[2, 3, 1], &mut rng(6)).unwrap();
        let input = [0.6, -0.4];
        let target = [0.25];

        let mut previous = network.mse(&input, &target).unwrap();
        for _ in 0..10 {
            network.train_sample(&input, &target, 0.3, 100).unwrap();
            let current = network.mse(&input, &target).unwrap();
            assert!(current < previous,
                    "error went from {} to {}",
                    previous,
                    current);
            previous = current;
        }
    }

    #[test]
    fn one_step_matches_the_closed_form_update() {
        let mut network = Network::from_widths(&[2, 2], &mut rng(7)).unwrap();
        let input = [0.5, -0.25];
        let target = [1.0, 0.0];
        let rate = 0.7;

        let weights = network.layers[0].weights().clone();
        let biases = network.layers[0].biases().to_vec();

        network.train_sample(&input, &target, rate, 1).unwrap();

        for neuron in 0..2 {
            let mut sum = biases[neuron];
            for previous in 0..2 {
                sum += weights[(neuron, previous)] * input[previous];
            }
            let output = activator::sigmoid(sum);
            let error = (output - target[neuron]) * activator::derivative(output);
            let delta = -rate * error;

            assert_close(network.layers[0].biases()[neuron], biases[neuron] + delta);
            for previous in 0..2 {
                assert_close(network.layers[0].weights()[(neuron, previous)],
                             weights[(neuron, previous)] + delta * input[previous]);
            }
        }
    }

    #[test]
    fn dataset_shape_mismatch_leaves_parameters_untouched() {
        let mut network = Network::from_widths(&[5, 4, 1], &mut rng(8)).unwrap();
        let snapshot = network.layers.clone();

        let mut set = TrainSet::new(3, 1);
        set.push(vec![0.1, 0.2, 0.3], vec![1.0]).unwrap();
        match network.train_set(&set, 10, 2, 0.3, &mut rng(9)) {
            Err(Error::DatasetShapeMismatch { what: "input", got: 3, expected: 5 }) => {}
            other => panic!("expected DatasetShapeMismatch, got {:?}", other),
        }
        assert_eq!(network.layers, snapshot);
    }

    #[test]
    fn rejects_an_empty_dataset() {
        let mut network = Network::from_widths(&[2, 1], &mut rng(10)).unwrap();
        let set = TrainSet::new(2, 1);
        match network.train_set(&set, 1, 1, 0.3, &mut rng(11)) {
            Err(Error::EmptyDataset) => {}
            other => panic!("expected EmptyDataset, got {:?}", other),
        }
    }

    #[test]
    fn mse_matches_the_halved_formula() {
        let mut network = Network::from_widths(&[2, 3, 2], &mut rng(12)).unwrap();
        let snapshot = network.layers.clone();
        let input = [0.3, 0.9];
        let target = [1.0, 0.0];

        let output = network.feed_forward(&input).unwrap().to_vec();
        let expected = output.iter()
            .zip(target.iter())
            .map(|(&o, &t)| (t - o) * (t - o))
            .sum::<f64>() / (2.0 * output.len() as f64);

        assert_close(network.mse(&input, &target).unwrap(), expected);
        assert_eq!(network.layers, snapshot);
    }

    #[test]
    fn builds_from_a_descriptor() {
        let mut network = Network::from_descriptor(r#"{"widths":[5,4,1]}"#, &mut rng(13))
            .unwrap();
        assert_eq!(network.input_len(), 5);
        assert_eq!(network.output_len(), 1);
        assert_eq!(network.feed_forward(&[0.1, 0.2, 0.3, 0.4, 0.5]).unwrap().len(), 1);
    }

    #[test]
    fn learns_xor() {
        let samples = xor_samples();
        // A rare unlucky initialization stalls in a symmetric local
        // minimum, so a handful of seeds are allowed.
        for seed in &[3, 17, 59] {
            let mut rng = rng(*seed);
            let mut network = Network::from_widths(&[2, 4, 1], &mut rng).unwrap();
            let mut set = TrainSet::new(2, 1);
            for &(ref input, ref target) in &samples {
                set.push(input.to_vec(), target.to_vec()).unwrap();
            }

            network.train_set(&set, 8_000, 4, 0.5, &mut rng).unwrap();

            let close_enough = samples.iter().all(|&(ref input, ref target)| {
                let output = network.feed_forward(input).unwrap()[0];
                (output - target[0]).abs() < 0.1
            });
            let low_error = samples.iter().all(|&(ref input, ref target)| {
                network.mse(input, target).unwrap() < 0.02
            });
            if close_enough && low_error {
                return;
            }
        }
        panic!("failed to learn XOR with any seed");
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-12,
                "{} != {}",
                actual,
                expected);
    }
}
