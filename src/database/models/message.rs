use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::database::repository::{not_found, Repository, Table};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Unread,
    Read,
    Replied,
    Archived,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Unread => "unread",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
            MessageStatus::Archived => "archived",
        }
    }
}

impl FromStr for MessageStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(MessageStatus::Unread),
            "read" => Ok(MessageStatus::Read),
            "replied" => Ok(MessageStatus::Replied),
            "archived" => Ok(MessageStatus::Archived),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MessageStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    ContactForm,
    DirectEmail,
    Phone,
    Other,
}

impl MessageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSource::ContactForm => "contact_form",
            MessageSource::DirectEmail => "direct_email",
            MessageSource::Phone => "phone",
            MessageSource::Other => "other",
        }
    }
}

impl FromStr for MessageSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contact_form" => Ok(MessageSource::ContactForm),
            "direct_email" => Ok(MessageSource::DirectEmail),
            "phone" => Ok(MessageSource::Phone),
            "other" => Ok(MessageSource::Other),
            other => Err(UnknownVariant {
                kind: "source",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MessageSource {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: String,
    #[sqlx(try_from = "String")]
    pub status: MessageStatus,
    #[sqlx(try_from = "String")]
    pub source: MessageSource,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Table for ContactMessage {
    const TABLE: &'static str = "contact_messages";
    const LABEL: &'static str = "Message";
}

/// A validated public submission.
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Partial admin update. `admin_notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageUpdate {
    pub status: Option<MessageStatus>,
    pub admin_notes: Option<Option<String>>,
}

impl MessageUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.admin_notes.is_none()
    }
}

impl Repository<ContactMessage> {
    pub async fn insert(&self, new: &NewContactMessage) -> Result<ContactMessage, DatabaseError> {
        let row = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages
                (name, email, message, subject, status, source, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.message)
        .bind(&new.subject)
        .bind(MessageStatus::Unread.as_str())
        .bind(MessageSource::ContactForm.as_str())
        .bind(&new.ip_address)
        .bind(&new.user_agent)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    /// Move an unread message to read. Returns `None` when the message is
    /// gone or no longer unread, so `read_at` is only ever stamped once.
    pub async fn mark_read(&self, id: i64) -> Result<Option<ContactMessage>, DatabaseError> {
        let row = sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages
            SET status = 'read',
                read_at = COALESCE(read_at, NOW()),
                updated_at = NOW()
            WHERE id = $1 AND status = 'unread'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Fetch for display, upgrading unread to read first.
    ///
    /// Two concurrent viewers can both see `unread` on the first read; only
    /// one of them wins the conditional update and the other re-reads.
    pub async fn view(&self, id: i64) -> Result<ContactMessage, DatabaseError> {
        let current = self.select_404(id).await?;
        if current.status != MessageStatus::Unread {
            return Ok(current);
        }

        match self.mark_read(id).await? {
            Some(updated) => Ok(updated),
            None => self.select_404(id).await,
        }
    }

    pub async fn update_admin(
        &self,
        id: i64,
        update: &MessageUpdate,
    ) -> Result<ContactMessage, DatabaseError> {
        let (notes_given, notes) = match &update.admin_notes {
            Some(notes) => (true, notes.clone()),
            None => (false, None),
        };

        sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages
            SET status = COALESCE($2::text, status),
                read_at = CASE
                    WHEN $2::text IS NOT NULL AND $2::text <> 'unread'
                        THEN COALESCE(read_at, NOW())
                    ELSE read_at
                END,
                replied_at = CASE
                    WHEN $2::text = 'replied' THEN COALESCE(replied_at, NOW())
                    ELSE replied_at
                END,
                admin_notes = CASE WHEN $3::boolean THEN $4::text ELSE admin_notes END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.status.map(|s| s.as_str()))
        .bind(notes_given)
        .bind(notes)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(not_found::<ContactMessage>)
    }

    pub async fn unread_count(&self) -> Result<i64, DatabaseError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE status = 'unread'")
                .fetch_one(self.pool())
                .await?;
        Ok(count)
    }
}
