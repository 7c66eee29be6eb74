mod cloth_service;

pub use cloth_service::ClothService;
