mod look_service;

pub use look_service::LookService;
