//! SQL rendering: identifiers from entity definitions, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
