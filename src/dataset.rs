//! Labelled training data and batch extraction.

use rand;
use rand::Rng;
use std::slice;

use error::{Error, Result};

/// A source of labelled `(input, target)` training pairs.
///
/// The sampling policy behind `batch` belongs to the dataset; the engine
/// only validates widths against this interface and never mutates it.
pub trait LabeledDataset {
    /// Returns the width of every stored input vector.
    fn input_len(&self) -> usize;

    /// Returns the width of every stored target vector.
    fn target_len(&self) -> usize;

    /// Returns the number of stored samples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `index`-th stored `(input, target)` pair.
    fn sample(&self, index: usize) -> (&[f64], &[f64]);

    /// Extracts a batch of up to `size` samples.
    ///
    /// Samples are drawn uniformly and without replacement within the
    /// batch. Successive calls are independent, so batches may overlap
    /// across epochs. Asking for at least `len` samples yields the whole
    /// set.
    fn batch<R: Rng>(&self, size: usize, rng: &mut R) -> Batch
        where Self: Sized
    {
        let indices = rand::sample(rng, 0..self.len(), size);
        Batch { samples: indices.into_iter().map(|index| self.sample(index)).collect() }
    }
}

/// A sub-collection of `(input, target)` pairs borrowed from a dataset.
#[derive(Debug)]
pub struct Batch<'a> {
    samples: Vec<(&'a [f64], &'a [f64])>,
}

impl<'a> Batch<'a> {
    /// Wraps an explicit list of pairs; custom `LabeledDataset`
    /// implementations build their batches through this.
    pub fn from_samples(samples: Vec<(&'a [f64], &'a [f64])>) -> Self {
        Batch { samples: samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates the batch in its fixed extraction order.
    pub fn iter(&self) -> slice::Iter<(&'a [f64], &'a [f64])> {
        self.samples.iter()
    }
}

/// An in-memory store of captured `(input, target)` pairs.
///
/// This is the buffer the game's telemetry capture fills: every recorded
/// frame contributes one input vector (the observed state) and one target
/// vector (the action taken).
#[derive(Clone, Debug)]
pub struct TrainSet {
    input_len: usize,
    target_len: usize,
    samples: Vec<(Vec<f64>, Vec<f64>)>,
}

impl TrainSet {
    /// Creates an empty set holding `input_len`-wide inputs and
    /// `target_len`-wide targets.
    pub fn new(input_len: usize, target_len: usize) -> Self {
        TrainSet {
            input_len: input_len,
            target_len: target_len,
            samples: Vec::new(),
        }
    }

    /// Appends a captured pair.
    ///
    /// Fails with `DimensionMismatch` when either vector disagrees with
    /// the widths declared at construction.
    pub fn push(&mut self, input: Vec<f64>, target: Vec<f64>) -> Result<()> {
        if input.len() != self.input_len {
            return Err(Error::DimensionMismatch {
                what: "input",
                got: input.len(),
                expected: self.input_len,
            });
        }
        if target.len() != self.target_len {
            return Err(Error::DimensionMismatch {
                what: "target",
                got: target.len(),
                expected: self.target_len,
            });
        }
        self.samples.push((input, target));
        Ok(())
    }
}

impl LabeledDataset for TrainSet {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn target_len(&self) -> usize {
        self.target_len
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn sample(&self, index: usize) -> (&[f64], &[f64]) {
        let sample = &self.samples[index];
        (&sample.0, &sample.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::Error;
    use rand::{SeedableRng, XorShiftRng};

    fn rng() -> XorShiftRng {
        XorShiftRng::from_seed([5, 10, 15, 20])
    }

    fn indexed_set(samples: usize) -> TrainSet {
        let mut set = TrainSet::new(2, 1);
        for index in 0..samples {
            set.push(vec![index as f64, -(index as f64)], vec![index as f64])
                .unwrap();
        }
        set
    }

    #[test]
    fn push_validates_widths() {
        let mut set = TrainSet::new(2, 1);
        match set.push(vec![1.0], vec![0.0]) {
            Err(Error::DimensionMismatch { what: "input", got: 1, expected: 2 }) => {}
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
        match set.push(vec![1.0, 2.0], vec![0.0, 1.0]) {
            Err(Error::DimensionMismatch { what: "target", got: 2, expected: 1 }) => {}
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
        assert!(set.is_empty());
    }

    #[test]
    fn sample_returns_the_stored_pair() {
        let set = indexed_set(4);
        let (input, target) = set.sample(2);
        assert_eq!(input, &[2.0, -2.0]);
        assert_eq!(target, &[2.0]);
    }

    #[test]
    fn batches_clamp_to_the_available_samples() {
        let set = indexed_set(4);
        assert_eq!(set.batch(10, &mut rng()).len(), 4);
        assert_eq!(set.batch(4, &mut rng()).len(), 4);
        assert_eq!(set.batch(2, &mut rng()).len(), 2);
    }

    #[test]
    fn batches_draw_without_replacement() {
        let set = indexed_set(10);
        let mut rng = rng();
        for _ in 0..20 {
            let batch = set.batch(5, &mut rng);
            let mut seen: Vec<f64> = batch.iter().map(|&(input, _)| input[0]).collect();
            seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
            seen.dedup();
            assert_eq!(seen.len(), 5);
        }
    }
}
