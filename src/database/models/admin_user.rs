use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Repository, Table};

/// Seed-managed admin account. Never serialized: the hash stays server-side.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

impl Table for AdminUser {
    const TABLE: &'static str = "admin_users";
    const LABEL: &'static str = "Admin";
}

impl Repository<AdminUser> {
    /// Exact, case-sensitive username match.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, DatabaseError> {
        let row = sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    /// Create the admin or reset its password and profile.
    pub async fn upsert(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        full_name: Option<&str>,
    ) -> Result<AdminUser, DatabaseError> {
        let row = sqlx::query_as::<_, AdminUser>(
            r#"
            INSERT INTO admin_users (username, password_hash, email, full_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                email = COALESCE(EXCLUDED.email, admin_users.email),
                full_name = COALESCE(EXCLUDED.full_name, admin_users.full_name)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .bind(full_name)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }
}
