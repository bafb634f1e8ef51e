// Application layer - Use cases over the trip repository
pub mod dashboard_service;
pub mod kpi_service;
pub mod trip_repository;
pub mod view_service;
