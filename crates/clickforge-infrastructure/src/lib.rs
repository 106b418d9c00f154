//! Infrastructure layer for ClickForge: files, paths, configuration and secrets.

pub mod config_service;
pub mod export;
pub mod json_history_repository;
pub mod paths;
pub mod reference_image;
pub mod secret_service;
pub mod storage;

pub use config_service::ConfigService;
pub use export::export_thumbnail;
pub use json_history_repository::JsonHistoryRepository;
pub use paths::ClickforgePaths;
pub use reference_image::load_reference_image;
pub use secret_service::SecretServiceImpl;
