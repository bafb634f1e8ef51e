// Infrastructure layer - External dependencies and adapters
pub mod chart_mapper;
pub mod config;
pub mod http_response;
pub mod memory_repository;
pub mod mongo_repository;
