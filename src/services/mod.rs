pub mod chart_service;
pub mod directory_service;
pub mod history_service;
