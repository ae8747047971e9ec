//! HTTP handlers for the orchard engine service

pub mod geo;
pub mod health;
pub mod season;

pub use geo::*;
pub use health::*;
pub use season::*;
