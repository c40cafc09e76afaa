use super::IParticipantRepo;
use crate::repos::shared::repo::DeleteResult;
use huddle_domain::{InvalidStatusError, Participant, RsvpStatus, ID};
use sqlx::{FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresParticipantRepo {
    pool: PgPool,
}

impl PostgresParticipantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ParticipantRaw {
    event_id: i64,
    user_id: i64,
    username: Option<String>,
    fullname: String,
    status: String,
    updated: i64,
}

impl TryFrom<ParticipantRaw> for Participant {
    type Error = InvalidStatusError;

    fn try_from(p: ParticipantRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            event_id: p.event_id.into(),
            user_id: p.user_id,
            username: p.username,
            fullname: p.fullname,
            status: p.status.parse()?,
            updated: p.updated,
        })
    }
}

fn to_participants(raws: Vec<ParticipantRaw>) -> anyhow::Result<Vec<Participant>> {
    raws.into_iter()
        .map(|p| Participant::try_from(p).map_err(anyhow::Error::new))
        .collect()
}

#[async_trait::async_trait]
impl IParticipantRepo for PostgresParticipantRepo {
    async fn upsert(&self, participant: &Participant) -> anyhow::Result<Participant> {
        let raw: ParticipantRaw = sqlx::query_as(
            r#"
            INSERT INTO participants(event_id, user_id, username, fullname, status, updated)
            VALUES($1, $2, $3, $4, $5, $6)
            ON CONFLICT (event_id, user_id) DO UPDATE SET
                status = EXCLUDED.status,
                updated = EXCLUDED.updated
            RETURNING *
            "#,
        )
        .bind(participant.event_id.inner())
        .bind(participant.user_id)
        .bind(&participant.username)
        .bind(&participant.fullname)
        .bind(participant.status.as_str())
        .bind(participant.updated)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to upsert participant: {:?}. DB returned error: {:?}",
                participant, e
            );
            e
        })?;

        Ok(Participant::try_from(raw)?)
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Participant>> {
        let raws: Vec<ParticipantRaw> = sqlx::query_as(
            r#"
            SELECT * FROM participants AS p
            WHERE p.event_id = $1
            ORDER BY p.updated
            "#,
        )
        .bind(event_id.inner())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find participants of event with id: {:?} failed. DB returned error: {:?}",
                event_id, e
            );
            e
        })?;

        to_participants(raws)
    }

    async fn find_by_event_and_status(
        &self,
        event_id: &ID,
        statuses: &[RsvpStatus],
    ) -> anyhow::Result<Vec<Participant>> {
        let statuses = statuses
            .iter()
            .map(|status| status.as_str().to_string())
            .collect::<Vec<_>>();
        let raws: Vec<ParticipantRaw> = sqlx::query_as(
            r#"
            SELECT * FROM participants AS p
            WHERE p.event_id = $1 AND p.status = ANY($2)
            ORDER BY p.updated
            "#,
        )
        .bind(event_id.inner())
        .bind(&statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find participants of event with id: {:?} and statuses: {:?} failed. DB returned error: {:?}",
                event_id, statuses, e
            );
            e
        })?;

        to_participants(raws)
    }

    async fn delete_by_events(&self, event_ids: &[ID]) -> anyhow::Result<DeleteResult> {
        let ids = event_ids.iter().map(|id| id.inner()).collect::<Vec<_>>();
        let res = sqlx::query(
            r#"
            DELETE FROM participants AS p
            WHERE p.event_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete participants of events: {:?} failed. DB returned error: {:?}",
                ids, e
            );
            e
        })?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
