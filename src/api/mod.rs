//! HTTP API handlers for stemserve

pub mod health;
pub mod separate;

pub use health::health_check;
pub use separate::{separate_preflight, separate_upload};
