mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
