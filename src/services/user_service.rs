use sqlx::PgPool;
use tracing::{info, instrument};

use crate::config::BootstrapAdmin;
use crate::dto::auth_dto::{LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::JwtKeys;
use crate::models::user::{Role, User};
use crate::utils::crypto::{hash_password, verify_password};

const USER_COLUMNS: &str = "id, username, email, password_hash, alumni_id, role_id, created_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        if let Some(alumni_id) = payload.alumni_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM alumni WHERE id = $1)")
                    .bind(alumni_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !exists {
                return Err(Error::BadRequest(format!(
                    "Alumni {} does not exist",
                    alumni_id
                )));
            }
        }

        let password_hash = hash_password(&payload.password)?;
        let user = self
            .insert(
                &payload.username,
                &payload.email,
                &password_hash,
                payload.alumni_id,
                Role::User,
            )
            .await?;
        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    pub async fn login(&self, payload: LoginPayload, keys: &JwtKeys) -> Result<(String, User)> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&payload.email)
            .fetch_optional(&self.pool)
            .await?;

        let user = match user {
            Some(user) if verify_password(&payload.password, &user.password_hash)? => user,
            _ => return Err(invalid_credentials()),
        };

        let token = keys.issue(user.id, &user.email, user.role)?;
        Ok((token, user))
    }

    /// Creates the configured admin account unless that email is already taken.
    pub async fn ensure_bootstrap_admin(&self, admin: &BootstrapAdmin) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&admin.email)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            return Ok(());
        }

        let username = admin
            .email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or("admin");
        let password_hash = hash_password(&admin.password)?;
        let user = self
            .insert(username, &admin.email, &password_hash, None, Role::Admin)
            .await?;
        info!(user_id = user.id, "bootstrap admin created");
        Ok(())
    }

    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        alumni_id: Option<i64>,
        role: Role,
    ) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, alumni_id, role_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .bind(alumni_id)
            .bind(role.id())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    Error::Conflict("Username or email already registered".to_string())
                }
                other => other.into(),
            })
    }
}

fn invalid_credentials() -> Error {
    Error::Unauthorized("Invalid email or password".to_string())
}
