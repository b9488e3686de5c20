extern crate itertools;
extern crate rand;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

pub mod dataset;
pub mod error;
pub mod network;
pub mod topology;
pub mod trainer;

mod activator;
mod layer;
mod matrix;
mod utils;
