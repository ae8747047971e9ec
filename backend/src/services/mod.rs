//! Business logic services for the orchard engine service

pub mod geo;
pub mod season;

pub use geo::GeoService;
pub use season::SeasonService;
