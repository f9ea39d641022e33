//! Infrastructure layer: DTOs, repository implementations and the topic catalog.

pub mod dto;
pub mod repository;
pub mod topic;
