use itertools::multizip;
use rand::Rng;
use rand::distributions::{IndependentSample, Range};

use activator;
use matrix::Mat;

// Initialization ranges for untrained parameters.
const WEIGHT_LOW: f64 = -1.0;
const WEIGHT_HIGH: f64 = 1.0;
const BIAS_LOW: f64 = -0.7;
const BIAS_HIGH: f64 = 0.7;

/// A single fully connected layer of the network.
///
/// This stores the incoming weights for every neuron as one matrix row,
/// plus one bias per neuron.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// The network weights; entry `(n, p)` connects previous-layer neuron
    /// `p` to neuron `n`.
    weights: Mat,
    /// One bias per neuron.
    biases: Vec<f64>,
}

impl Layer {
    /// Initializes a new, untrained layer with uniform-random parameters.
    ///
    /// Arguments:
    ///
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of neurons in this layer.
    ///  * `rng` - the random source the parameters are drawn from.
    pub fn random<R: Rng>(inputs: usize, outputs: usize, rng: &mut R) -> Self {
        let bias_range = Range::new(BIAS_LOW, BIAS_HIGH);
        Layer {
            weights: Mat::random(Range::new(WEIGHT_LOW, WEIGHT_HIGH),
                                 outputs,
                                 inputs,
                                 rng),
            biases: (0..outputs).map(|_| bias_range.ind_sample(rng)).collect(),
        }
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.weights.cols()
    }

    /// Returns the number of neurons in this layer.
    pub fn output_len(&self) -> usize {
        self.weights.rows()
    }

    /// Feeds the provided `inputs` forward through the layer, recording
    /// each neuron's activation in `outputs` and its pointwise sigmoid
    /// derivative in `derivatives`.
    pub fn forward(&self, inputs: &[f64], outputs: &mut [f64], derivatives: &mut [f64]) {
        assert_eq!(inputs.len(), self.input_len());
        assert_eq!(outputs.len(), self.output_len());
        assert_eq!(derivatives.len(), self.output_len());
        for (output, derivative, &bias, row) in multizip((outputs.iter_mut(),
                                                          derivatives.iter_mut(),
                                                          self.biases.iter(),
                                                          self.weights.row_iter())) {
            let mut sum = bias;
            for (&weight, &input) in row.iter().zip(inputs.iter()) {
                sum += weight * input;
            }
            *output = activator::sigmoid(sum);
            *derivative = activator::derivative(*output);
        }
    }

    /// Feeds the provided `errors` backwards through the layer's weights,
    /// writing each previous-layer neuron's error - already scaled by its
    /// activation derivative - into `input_errors`.
    pub fn backward(&self, errors: &[f64], input_derivatives: &[f64], input_errors: &mut [f64]) {
        assert_eq!(errors.len(), self.output_len());
        assert_eq!(input_derivatives.len(), self.input_len());
        assert_eq!(input_errors.len(), self.input_len());
        for (neuron, (input_error, &derivative)) in
            input_errors.iter_mut().zip(input_derivatives.iter()).enumerate() {
            let mut sum = 0.0;
            for (next, &error) in errors.iter().enumerate() {
                sum += self.weights[(next, neuron)] * error;
            }
            *input_error = sum * derivative;
        }
    }

    /// Applies one gradient-descent step: `-rate * error` moves each
    /// neuron's bias, and the same delta scaled by the incoming activation
    /// moves each weight.
    pub fn apply_update(&mut self, rate: f64, errors: &[f64], inputs: &[f64]) {
        assert_eq!(errors.len(), self.output_len());
        assert_eq!(inputs.len(), self.input_len());
        for (&error, bias, row) in multizip((errors.iter(),
                                             self.biases.iter_mut(),
                                             self.weights.row_iter_mut())) {
            let delta = -rate * error;
            *bias += delta;
            for (weight, &input) in row.iter_mut().zip(inputs.iter()) {
                *weight += delta * input;
            }
        }
    }
}

#[cfg(test)]
impl Layer {
    /// Builds a layer from explicit parameters, for tests.
    pub fn from_parts(weights: Mat, biases: Vec<f64>) -> Self {
        assert_eq!(weights.rows(), biases.len());
        Layer {
            weights: weights,
            biases: biases,
        }
    }

    pub fn weights(&self) -> &Mat {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }
}
