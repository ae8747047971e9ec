//! Domain models for the orchard engine

mod breakdown;
mod season;
mod tree;
mod zone;

pub use breakdown::*;
pub use season::*;
pub use tree::*;
pub use zone::*;
