//! Operational endpoints and the OpenAPI document.

pub mod doc;
mod health;

pub use health::*;
