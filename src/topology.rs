//! Network shape descriptions.

use serde_json;

use error::{Error, Result};
use utils::{Back, Front};

/// An ordered list of per-layer neuron counts defining the shape of a
/// feedforward network.
///
/// The first width is the input layer, the last is the output layer, and
/// everything in between is hidden. A topology is validated once at
/// construction and never changes afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    widths: Vec<usize>,
}

/// The on-disk form of a topology, as written by the data-capture tooling.
#[derive(Serialize, Deserialize)]
struct Descriptor {
    widths: Vec<usize>,
}

impl Topology {
    /// Validates a layer-width sequence.
    ///
    /// Fails with `InvalidTopology` if fewer than two widths are given, or
    /// if any layer is empty.
    pub fn new(widths: Vec<usize>) -> Result<Self> {
        if widths.len() < 2 {
            return Err(Error::InvalidTopology(format!(
                "expected at least 2 layer widths, got {}",
                widths.len()
            )));
        }
        for (layer, &width) in widths.iter().enumerate() {
            if width == 0 {
                return Err(Error::InvalidTopology(
                    format!("layer {} has width 0", layer),
                ));
            }
        }
        Ok(Topology { widths: widths })
    }

    /// Parses a topology from its JSON descriptor, e.g. `{"widths":[5,4,1]}`.
    pub fn from_json(descriptor: &str) -> Result<Self> {
        let parsed: Descriptor =
            serde_json::from_str(descriptor).map_err(Error::MalformedDescriptor)?;
        Topology::new(parsed.widths)
    }

    /// Renders the JSON descriptor this topology round-trips through.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&Descriptor { widths: self.widths.clone() })
            .expect("a width list always serializes")
    }

    /// Returns the number of layers, input and output included.
    pub fn depth(&self) -> usize {
        self.widths.len()
    }

    /// Returns the width of the input layer.
    pub fn input_len(&self) -> usize {
        *self.widths.front()
    }

    /// Returns the width of the output layer.
    pub fn output_len(&self) -> usize {
        *self.widths.back()
    }

    /// Returns the width of layer `layer`.
    pub fn width(&self, layer: usize) -> usize {
        self.widths[layer]
    }

    /// Returns all layer widths in order.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }
}
