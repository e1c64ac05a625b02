pub mod alumni_dto;
pub mod auth_dto;
pub mod job_record_dto;
pub mod lifecycle_dto;
pub mod response;
