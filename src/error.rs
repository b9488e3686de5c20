use serde_json;
use std::error;
use std::fmt;

/// The result type used throughout the crate.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Everything that can go wrong while building or training a network.
///
/// All variants are deterministic functions of the shapes handed in by the
/// caller; none of them leaves the network partially mutated.
#[derive(Debug)]
pub enum Error {
    /// The layer-width sequence is malformed: fewer than two layers, or a
    /// layer of width zero.
    InvalidTopology(String),
    /// An input or target vector disagrees with the declared layer width.
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A dataset's declared sample widths disagree with the network's
    /// topology.
    DatasetShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A training hyperparameter is zero, negative, or not finite.
    InvalidHyperparameter(&'static str),
    /// Dataset-driven training was asked to run over zero samples.
    EmptyDataset,
    /// A topology descriptor failed to parse.
    MalformedDescriptor(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Error::InvalidTopology(ref reason) => {
                write!(f, "invalid topology: {}", reason)
            }
            &Error::DimensionMismatch { what, got, expected } => {
                write!(f,
                       "dimension mismatch: {} has length {}, expected {}",
                       what,
                       got,
                       expected)
            }
            &Error::DatasetShapeMismatch { what, got, expected } => {
                write!(f,
                       "dataset shape mismatch: {} width is {}, the network \
                        expects {}",
                       what,
                       got,
                       expected)
            }
            &Error::InvalidHyperparameter(what) => {
                write!(f, "{} must be positive", what)
            }
            &Error::EmptyDataset => {
                write!(f, "cannot train on an empty dataset")
            }
            &Error::MalformedDescriptor(ref err) => {
                write!(f, "malformed topology descriptor: {}", err)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            &Error::MalformedDescriptor(ref err) => Some(err),
            _ => None,
        }
    }
}
