//! Infrastructure layer: wire formats and concrete stores.

pub mod dto;
pub mod repository;
