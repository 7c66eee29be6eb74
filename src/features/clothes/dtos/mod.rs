mod cloth_dto;

pub use cloth_dto::{ClothResponseDto, SeedResponseDto, UploadClothDto};
