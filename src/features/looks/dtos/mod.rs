mod look_dto;

pub use look_dto::{parse_cloth_ids, CreateLookDto, LookResponseDto, UpdateLookDto};
