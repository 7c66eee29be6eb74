mod removal_dto;

pub use removal_dto::RemoveBackgroundDto;
