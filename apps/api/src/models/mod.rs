pub mod job_description;
pub mod match_result;
pub mod resume;
pub mod template;
pub mod user;
