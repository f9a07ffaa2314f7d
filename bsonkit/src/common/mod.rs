mod constants;
mod type_key;
mod type_utils;

pub use constants::*;
pub use type_key::*;
pub use type_utils::*;
