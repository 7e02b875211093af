use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::Filter;

/// A row type stored in a fixed table.
pub trait Table {
    const TABLE: &'static str;
    /// Used in not-found messages, e.g. "Project".
    const LABEL: &'static str;
}

/// Typed access to one table. Model modules add their own statements in
/// `impl Repository<Model>` blocks.
pub struct Repository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Table + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn filter(&self) -> Filter {
        Filter::new(T::TABLE)
    }

    pub async fn select_any(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError> {
        QueryBuilder::<T>::new(filter).select_all(&self.pool).await
    }

    pub async fn count(&self, filter: &Filter) -> Result<i64, DatabaseError> {
        QueryBuilder::<T>::new(filter).count(&self.pool).await
    }

    pub async fn select_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let query = format!("SELECT * FROM \"{}\" WHERE id = $1", T::TABLE);
        let row = sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i64) -> Result<T, DatabaseError> {
        self.select_id(id).await?.ok_or_else(|| not_found::<T>())
    }

    /// Hard delete, returning the removed row.
    pub async fn delete_404(&self, id: i64) -> Result<T, DatabaseError> {
        let query = format!("DELETE FROM \"{}\" WHERE id = $1 RETURNING *", T::TABLE);
        sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found::<T>())
    }
}

pub fn not_found<T: Table>() -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", T::LABEL))
}
