use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::DatabaseError;

/// Day boundaries for the message counters, computed in the server's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindows {
    pub today_start: DateTime<Utc>,
    pub tomorrow_start: DateTime<Utc>,
    pub yesterday_start: DateTime<Utc>,
    pub last_7_days_start: DateTime<Utc>,
    pub last_30_days_start: DateTime<Utc>,
}

impl StatsWindows {
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    pub fn at<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        Self {
            today_start: local_midnight(&tz, today),
            tomorrow_start: local_midnight(&tz, today + Duration::days(1)),
            yesterday_start: local_midnight(&tz, today - Duration::days(1)),
            last_7_days_start: local_midnight(&tz, today - Duration::days(7)),
            last_30_days_start: local_midnight(&tz, today - Duration::days(30)),
        }
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Midnight skipped by a DST jump: the day starts an hour later.
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
pub struct MessageStats {
    pub total: i64,
    pub unread: i64,
    pub replied: i64,
    pub today: i64,
    pub yesterday: i64,
    #[serde(rename = "last7Days")]
    pub last_7_days: i64,
    #[serde(rename = "last30Days")]
    pub last_30_days: i64,
}

/// Counters shown next to the message listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingStats {
    pub total: i64,
    pub unread: i64,
    pub replied: i64,
    pub today: i64,
}

impl From<MessageStats> for ListingStats {
    fn from(stats: MessageStats) -> Self {
        Self {
            total: stats.total,
            unread: stats.unread,
            replied: stats.replied,
            today: stats.today,
        }
    }
}

impl MessageStats {
    /// All counters in one pass over the whole table.
    pub async fn fetch(pool: &PgPool, windows: &StatsWindows) -> Result<Self, DatabaseError> {
        let stats = sqlx::query_as::<_, MessageStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'unread') AS unread,
                COUNT(*) FILTER (WHERE status = 'replied') AS replied,
                COUNT(*) FILTER (WHERE created_at >= $1 AND created_at < $2) AS today,
                COUNT(*) FILTER (WHERE created_at >= $3 AND created_at < $1) AS yesterday,
                COUNT(*) FILTER (WHERE created_at >= $4) AS last_7_days,
                COUNT(*) FILTER (WHERE created_at >= $5) AS last_30_days
            FROM contact_messages
            "#,
        )
        .bind(windows.today_start)
        .bind(windows.tomorrow_start)
        .bind(windows.yesterday_start)
        .bind(windows.last_7_days_start)
        .bind(windows.last_30_days_start)
        .fetch_one(pool)
        .await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn windows_follow_local_midnight() {
        let tz = FixedOffset::east_opt(7 * 3600).unwrap();
        // 2026-03-15 01:30 at UTC+7 is 2026-03-14 18:30 UTC.
        let now = tz.with_ymd_and_hms(2026, 3, 15, 1, 30, 0).unwrap();
        let windows = StatsWindows::at(now);

        assert_eq!(windows.today_start, Utc.with_ymd_and_hms(2026, 3, 14, 17, 0, 0).unwrap());
        assert_eq!(windows.tomorrow_start, Utc.with_ymd_and_hms(2026, 3, 15, 17, 0, 0).unwrap());
        assert_eq!(windows.yesterday_start, Utc.with_ymd_and_hms(2026, 3, 13, 17, 0, 0).unwrap());
        assert_eq!(windows.last_7_days_start, Utc.with_ymd_and_hms(2026, 3, 7, 17, 0, 0).unwrap());
        assert_eq!(windows.last_30_days_start, Utc.with_ymd_and_hms(2026, 2, 12, 17, 0, 0).unwrap());
    }

    #[test]
    fn windows_are_ordered() {
        let w = StatsWindows::now();
        assert!(w.last_30_days_start < w.last_7_days_start);
        assert!(w.last_7_days_start < w.yesterday_start);
        assert!(w.yesterday_start < w.today_start);
        assert!(w.today_start < w.tomorrow_start);
    }

    #[test]
    fn stats_use_camel_case_window_names() {
        let stats = MessageStats {
            total: 9,
            unread: 2,
            replied: 1,
            today: 1,
            yesterday: 0,
            last_7_days: 3,
            last_30_days: 9,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["last7Days"], 3);
        assert_eq!(json["last30Days"], 9);

        let subset = serde_json::to_value(ListingStats::from(stats)).unwrap();
        assert_eq!(subset, serde_json::json!({"total": 9, "unread": 2, "replied": 1, "today": 1}));
    }
}
