//! Domain layer types.

pub mod entities;
pub mod types;
