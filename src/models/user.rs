use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Capability attached to an account. Persisted as `users.role_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn id(&self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::User => 2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role id: {0}")]
pub struct UnknownRole(pub i32);

impl TryFrom<i32> for Role {
    type Error = UnknownRole;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::Admin),
            2 => Ok(Role::User),
            other => Err(UnknownRole(other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub alumni_id: Option<i64>,
    #[sqlx(rename = "role_id", try_from = "i32")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_round_trip_through_storage_form() {
        assert_eq!(Role::try_from(Role::Admin.id()).unwrap(), Role::Admin);
        assert_eq!(Role::try_from(Role::User.id()).unwrap(), Role::User);
        assert!(Role::try_from(7).is_err());
    }
}
