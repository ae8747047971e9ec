//! Shared types and engine functions for the Orchard Season & Spatial Integrity Engine
//!
//! This crate contains the pure domain logic used by the backend service and by
//! the browser (via WASM): season phase classification, legacy yield-record
//! normalization, relocation validation and boundary area estimation.

pub mod geo;
pub mod models;
pub mod settings;
pub mod types;
pub mod validation;

pub use geo::*;
pub use models::*;
pub use settings::*;
pub use types::*;
pub use validation::*;
