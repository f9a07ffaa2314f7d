mod generator;
mod registry;

pub use generator::*;
pub use registry::*;
