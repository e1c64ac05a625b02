pub mod alumni;
pub mod job_record;
pub mod trash_entry;
pub mod user;
