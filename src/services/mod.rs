pub mod alumni_service;
pub mod job_record_service;
pub mod lifecycle_service;
pub mod user_service;
