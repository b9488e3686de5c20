//! Utilities for training models against captured datasets.

use rand::Rng;
use std::time::{Duration, Instant};

use dataset::LabeledDataset;
use error::{Error, Result};

/// The capabilities a model needs in order to be driven by the `Trainer`:
/// forward inference and per-sample gradient-descent learning.
///
/// The game historically shipped two interchangeable network flavors;
/// everything downstream selects through this interface rather than a
/// concrete type.
pub trait Trainable {
    /// Returns the input width the model accepts.
    fn input_len(&self) -> usize;

    /// Returns the output width the model produces.
    fn output_len(&self) -> usize;

    /// Runs forward inference on `input`.
    fn infer(&mut self, input: &[f64]) -> Result<Vec<f64>>;

    /// Performs one gradient-descent step on a single labelled sample,
    /// returning the sample's pre-update mean squared error.
    fn learn_one(&mut self, input: &[f64], target: &[f64], rate: f64) -> Result<f64>;
}

/// A builder for training models.
#[derive(Debug)]
pub struct Trainer<T: Trainable> {
    model: T,
    learning_mode: LearningMode,
    learning_rate: f64,
    logging: Logging,
    stop_condition: StopCondition,
}

impl<T: Trainable> Trainer<T> {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A stochastic learning mode.
    /// * A learning rate of 0.1.
    /// * Stops after 1000 training iterations.
    /// * Logs on training completion.
    pub fn new(model: T) -> Self {
        Trainer {
            model: model,
            learning_mode: LearningMode::Stochastic,
            learning_rate: 0.1,
            logging: Logging::Completion,
            stop_condition: StopCondition::Iterations(1000),
        }
    }

    /// Sets the `LearningMode` to use for training.
    pub fn learning_mode(mut self, mode: LearningMode) -> Self {
        self.learning_mode = mode;
        self
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
        where C: Into<StopCondition>
    {
        self.stop_condition = condition.into();
        self
    }

    /// Trains the model against batches drawn from `set`.
    ///
    /// Each iteration extracts one batch from the dataset, feeds every
    /// sample in it through the model at the configured learning rate, and
    /// reports the batch's mean sample error to the logging and
    /// stop-condition hooks.
    ///
    /// Returns:
    ///   The trained model, or an error if the dataset does not match the
    ///   model's shape.
    pub fn train<D, R>(mut self, set: &D, rng: &mut R) -> Result<T>
        where D: LabeledDataset,
              R: Rng
    {
        self.validate(set)?;

        let batch_size = match self.learning_mode {
            LearningMode::Stochastic => 1,
            LearningMode::Batch(size) => size,
        };
        let start_time = Instant::now();
        let mut iteration = 0;
        let mut training_error;
        loop {
            let batch = set.batch(batch_size, rng);
            training_error = 0.0;
            for &(input, target) in batch.iter() {
                training_error += self.model.learn_one(input, target, self.learning_rate)?;
            }
            training_error /= batch.len() as f64;
            iteration += 1;

            self.logging.iteration(iteration, training_error);
            if self.stop_condition.should_stop(iteration, training_error, start_time) {
                break;
            }
        }
        self.logging.completion(iteration, training_error, start_time);
        Ok(self.model)
    }

    /// Verifies that the dataset and hyperparameters fit the model before
    /// any training step runs.
    fn validate<D: LabeledDataset>(&self, set: &D) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidHyperparameter("learning rate"));
        }
        if let LearningMode::Batch(0) = self.learning_mode {
            return Err(Error::InvalidHyperparameter("batch size"));
        }
        if set.input_len() != self.model.input_len() {
            return Err(Error::DatasetShapeMismatch {
                what: "input",
                got: set.input_len(),
                expected: self.model.input_len(),
            });
        }
        if set.target_len() != self.model.output_len() {
            return Err(Error::DatasetShapeMismatch {
                what: "target",
                got: set.target_len(),
                expected: self.model.output_len(),
            });
        }
        if set.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(())
    }
}

/// The learning mode to use for training
#[derive(Copy, Clone, Debug)]
pub enum LearningMode {
    /// Draw a single sample per training iteration
    Stochastic,
    /// Draw a batch of the provided size per training iteration
    Batch(usize),
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be printed
    Silent,
    /// A summary will be printed at completion
    Completion,
    /// A summary will be printed after every `n` training iterations
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the current `iteration` of training.
    fn iteration(&self, iteration: usize, training_error: f64) {
        use self::Logging::*;
        if let &Iterations(freq) = self {
            if freq > 0 && iteration % freq == 0 {
                println!("Iteration {}:\tMSE={}", iteration, training_error);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, iterations: usize, training_error: f64, start_time: Instant) {
        if let &Logging::Silent = self {
            return;
        }
        println!("Ran {} iterations in {} seconds.",
                 iterations,
                 start_time.elapsed().as_secs());
        println!("Final MSE: {}", training_error);
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug)]
pub enum StopCondition {
    /// Stops after the provided number of training iterations
    Iterations(usize),
    /// Stops when the training error drops below the provided threshold
    ErrorThreshold(f64),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true of training is complete.
    fn should_stop(&self, iteration: usize, training_error: f64, start_time: Instant) -> bool {
        use self::StopCondition::*;
        match self {
            &Iterations(iterations) => iteration >= iterations,
            &ErrorThreshold(threshold) => training_error < threshold,
            &Duration(duration) => start_time.elapsed() > duration,
        }
    }
}
