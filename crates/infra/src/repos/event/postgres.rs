use super::IEventRepo;
use anyhow::anyhow;
use huddle_domain::{AnnouncementRef, Event, NewEvent, ID};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_id: i64,
    title: String,
    start_ts: i64,
    end_ts: Option<i64>,
    address: String,
    description: String,
    chat_id: Option<i64>,
    message_id: Option<i64>,
    created: i64,
}

impl From<EventRaw> for Event {
    fn from(e: EventRaw) -> Self {
        let announcement = match (e.chat_id, e.message_id) {
            (Some(chat_id), Some(message_id)) => Some(AnnouncementRef {
                chat_id,
                message_id,
            }),
            _ => None,
        };
        Self {
            id: e.event_id.into(),
            title: e.title,
            start_ts: e.start_ts,
            end_ts: e.end_ts,
            address: e.address,
            description: e.description,
            announcement,
            created: e.created,
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &NewEvent, created: i64) -> anyhow::Result<Event> {
        let raw: EventRaw = sqlx::query_as(
            r#"
            INSERT INTO events(title, start_ts, end_ts, address, description, created)
            VALUES($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&e.title)
        .bind(e.start_ts)
        .bind(e.end_ts)
        .bind(&e.address)
        .bind(&e.description)
        .bind(created)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            error!(
                "Unable to insert event: {:?}. DB returned error: {:?}",
                e, err
            );
            err
        })?;

        Ok(raw.into())
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        let raw: Option<EventRaw> = sqlx::query_as(
            r#"
            SELECT * FROM events AS e
            WHERE e.event_id = $1
            "#,
        )
        .bind(event_id.inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find event with id: {:?} failed. DB returned error: {:?}",
                event_id, e
            );
            e
        })?;

        Ok(raw.map(|e| e.into()))
    }

    async fn find_upcoming(&self, now: i64) -> anyhow::Result<Vec<Event>> {
        let raws: Vec<EventRaw> = sqlx::query_as(
            r#"
            SELECT * FROM events AS e
            WHERE e.start_ts > $1
            ORDER BY e.start_ts, e.event_id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find events starting after: {} failed. DB returned error: {:?}",
                now, e
            );
            e
        })?;

        Ok(raws.into_iter().map(|e| e.into()).collect())
    }

    async fn set_announcement(
        &self,
        event_id: &ID,
        announcement: &AnnouncementRef,
    ) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE events SET
                chat_id = $2,
                message_id = $3
            WHERE event_id = $1
            "#,
        )
        .bind(event_id.inner())
        .bind(announcement.chat_id)
        .bind(announcement.message_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to set announcement: {:?} of event with id: {:?}. DB returned error: {:?}",
                announcement, event_id, e
            );
            e
        })?;

        if res.rows_affected() == 0 {
            return Err(anyhow!("Event with id: {} was not found", event_id));
        }
        Ok(())
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        let raw: Option<EventRaw> = sqlx::query_as(
            r#"
            DELETE FROM events AS e
            WHERE e.event_id = $1
            RETURNING *
            "#,
        )
        .bind(event_id.inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete event with id: {:?} failed. DB returned error: {:?}",
                event_id, e
            );
            e
        })?;

        Ok(raw.map(|e| e.into()))
    }

    async fn delete_all_before(&self, now: i64) -> anyhow::Result<Vec<Event>> {
        let raws: Vec<EventRaw> = sqlx::query_as(
            r#"
            DELETE FROM events AS e
            WHERE e.start_ts < $1
            RETURNING *
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete events starting before: {} failed. DB returned error: {:?}",
                now, e
            );
            e
        })?;

        Ok(raws.into_iter().map(|e| e.into()).collect())
    }
}
