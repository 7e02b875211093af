use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: i64,
    pub featured_projects: i64,
    pub total_views: i64,
    pub total_messages: i64,
}

impl DashboardStats {
    pub async fn fetch(pool: &PgPool) -> Result<Self, DatabaseError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM projects) AS total_projects,
                (SELECT COUNT(*) FROM projects WHERE featured) AS featured_projects,
                (SELECT COALESCE(SUM(views), 0)::BIGINT FROM projects) AS total_views,
                (SELECT COUNT(*) FROM contact_messages) AS total_messages
            "#,
        )
        .fetch_one(pool)
        .await?;
        Ok(stats)
    }
}
