use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::database::manager::DatabaseError;
use crate::database::repository::{not_found, Repository, Table};
use crate::filter::{FilterOrder, FilterWhere, SortDirection};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<String>,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Table for Project {
    const TABLE: &'static str = "projects";
    const LABEL: &'static str = "Project";
}

/// Every writable column. Create and update both write all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
    pub technologies: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
}

pub const FEATURED_LIMIT: i64 = 6;

impl Repository<Project> {
    fn newest_first() -> FilterOrder {
        FilterOrder::new("created_at", SortDirection::Desc)
    }

    pub async fn list_all(&self) -> Result<Vec<Project>, DatabaseError> {
        let filter = self.filter().order(Self::newest_first());
        self.select_any(&filter).await
    }

    pub async fn list_featured(&self) -> Result<Vec<Project>, DatabaseError> {
        let filter = self
            .filter()
            .where_clause(FilterWhere::new().eq("featured", true))
            .order(Self::newest_first())
            .limit(FEATURED_LIMIT);
        self.select_any(&filter).await
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Project>, DatabaseError> {
        let filter = self
            .filter()
            .where_clause(FilterWhere::new().eq("category", category))
            .order(Self::newest_first());
        self.select_any(&filter).await
    }

    pub async fn insert(&self, fields: &ProjectFields) -> Result<Project, DatabaseError> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects
                (title, description, technologies, image_url, project_url, github_url, category, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.technologies)
        .bind(&fields.image_url)
        .bind(&fields.project_url)
        .bind(&fields.github_url)
        .bind(&fields.category)
        .bind(fields.featured)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    /// Overwrite every writable column.
    pub async fn replace(&self, id: i64, fields: &ProjectFields) -> Result<Project, DatabaseError> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = $2,
                description = $3,
                technologies = $4,
                image_url = $5,
                project_url = $6,
                github_url = $7,
                category = $8,
                featured = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.technologies)
        .bind(&fields.image_url)
        .bind(&fields.project_url)
        .bind(&fields.github_url)
        .bind(&fields.category)
        .bind(fields.featured)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(not_found::<Project>)
    }

    /// Count one view and return the project with the new total.
    pub async fn view(&self, id: i64) -> Result<Project, DatabaseError> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET views = views + 1 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(not_found::<Project>)
    }

    pub async fn increment_views(&self, id: i64) -> Result<i32, DatabaseError> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE projects SET views = views + 1 WHERE id = $1 RETURNING views",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(not_found::<Project>)
    }
}
