//! HTTP API handlers for pronunciation-relay

pub mod assess;
pub mod health;
pub mod languages;

pub use assess::assess_routes;
pub use health::health_routes;
pub use languages::language_routes;
