use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAlumniPayload {
    #[validate(length(min = 1))]
    pub nim: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub major: String,
    #[validate(range(min = 1900, max = 2200))]
    pub cohort_year: i32,
    #[validate(range(min = 1900, max = 2200))]
    pub graduation_year: i32,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAlumniPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub major: String,
    #[validate(range(min = 1900, max = 2200))]
    pub cohort_year: i32,
    #[validate(range(min = 1900, max = 2200))]
    pub graduation_year: i32,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}
