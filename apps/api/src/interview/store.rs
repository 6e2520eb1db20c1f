//! Persistence for interview sessions.
//!
//! Transcript rows are append-only: messages are INSERTed with a per-session `seq`
//! and never updated. Writes are guarded on the session's status so a completed
//! session cannot gain messages or be completed twice, even under concurrent requests.

use anyhow::{anyhow, Context, Result};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{
    InterviewSession, Message, SessionSetup, SessionStatus, SessionSummary,
};
use crate::models::session::{MessageRow, SessionRow};

pub const HISTORY_LIMIT: i64 = 20;

/// Two exchanges raced for the same transcript position; the later one is rejected.
const CONCURRENT_APPEND: &str = "Session was updated by another request, please retry";

const SESSION_COLUMNS: &str = "id, user_id, interview_type, topic, difficulty, status, feedback, \
     started_at, completed_at, duration, created_at, updated_at";

/// Inserts a new session together with its opening transcript.
pub async fn insert_session(pool: &PgPool, session: &InterviewSession) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO interview_sessions
            (id, user_id, interview_type, topic, difficulty, status,
             started_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(session.setup.interview_type.as_str())
    .bind(&session.setup.topic)
    .bind(session.setup.difficulty.as_str())
    .bind(session.status.as_str())
    .bind(session.started_at)
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(&mut *tx)
    .await?;

    insert_messages(&mut tx, session.id, 0, &session.messages).await?;

    tx.commit().await?;

    info!(
        "Created {} interview session {} for user {}",
        session.setup.interview_type, session.id, session.user_id
    );
    Ok(())
}

/// Loads a session and its full transcript.
pub async fn fetch_session(pool: &PgPool, id: Uuid) -> Result<Option<InterviewSession>, AppError> {
    let row: Option<SessionRow> = sqlx::query_as(&format!(
        "SELECT {SESSION_COLUMNS} FROM interview_sessions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let message_rows: Vec<MessageRow> = sqlx::query_as(
        "SELECT seq, role, content, timestamp FROM session_messages WHERE session_id = $1 ORDER BY seq",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let messages = message_rows
        .into_iter()
        .map(message_from_row)
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(session_from_row(row, messages)?))
}

/// Appends `messages` starting at transcript position `first_seq`.
/// Fails with `Validation` if the session is no longer ongoing, and with `Conflict`
/// if another request already wrote to those positions.
pub async fn append_messages(
    pool: &PgPool,
    session_id: Uuid,
    first_seq: usize,
    messages: &[Message],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let touched = sqlx::query(
        "UPDATE interview_sessions SET updated_at = NOW() WHERE id = $1 AND status = 'ongoing'",
    )
    .bind(session_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if touched == 0 {
        return Err(AppError::Validation("Session is not active".to_string()));
    }

    insert_messages(&mut tx, session_id, first_seq, messages).await?;
    tx.commit().await?;
    Ok(())
}

/// Persists the completion fields of a session. Completion happens at most once.
pub async fn save_completion(pool: &PgPool, session: &InterviewSession) -> Result<(), AppError> {
    let feedback = session
        .feedback
        .as_ref()
        .ok_or_else(|| AppError::Internal(anyhow!("Completed session {} has no feedback", session.id)))?;

    let touched = sqlx::query(
        r#"
        UPDATE interview_sessions
        SET status = 'completed', feedback = $2, completed_at = $3, duration = $4, updated_at = $5
        WHERE id = $1 AND status <> 'completed'
        "#,
    )
    .bind(session.id)
    .bind(Json(feedback))
    .bind(session.completed_at)
    .bind(session.duration)
    .bind(session.updated_at)
    .execute(pool)
    .await?
    .rows_affected();

    if touched == 0 {
        return Err(AppError::Conflict(
            "Session is already completed".to_string(),
        ));
    }
    Ok(())
}

/// Most recent sessions of a user, newest first, without transcripts.
pub async fn list_summaries(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<SessionSummary>, AppError> {
    let rows: Vec<SessionRow> = sqlx::query_as(&format!(
        "SELECT {SESSION_COLUMNS} FROM interview_sessions \
         WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let summaries = rows
        .into_iter()
        .map(summary_from_row)
        .collect::<Result<Vec<_>>>()?;
    Ok(summaries)
}

async fn insert_messages(
    tx: &mut Transaction<'_, Postgres>,
    session_id: Uuid,
    first_seq: usize,
    messages: &[Message],
) -> Result<(), AppError> {
    for (offset, message) in messages.iter().enumerate() {
        let seq = i32::try_from(first_seq + offset)
            .map_err(|_| AppError::Validation("Transcript is too long".to_string()))?;
        sqlx::query(
            "INSERT INTO session_messages (session_id, seq, role, content, timestamp) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(session_id)
        .bind(seq)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.timestamp)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, CONCURRENT_APPEND))?;
    }
    Ok(())
}

fn setup_from_row(row: &SessionRow) -> Result<SessionSetup> {
    Ok(SessionSetup {
        interview_type: row
            .interview_type
            .parse()
            .with_context(|| format!("session {}", row.id))?,
        topic: row.topic.clone(),
        difficulty: row
            .difficulty
            .parse()
            .with_context(|| format!("session {}", row.id))?,
    })
}

fn status_from_row(row: &SessionRow) -> Result<SessionStatus> {
    row.status
        .parse()
        .with_context(|| format!("session {}", row.id))
}

fn session_from_row(row: SessionRow, messages: Vec<Message>) -> Result<InterviewSession> {
    let setup = setup_from_row(&row)?;
    let status = status_from_row(&row)?;
    Ok(InterviewSession {
        id: row.id,
        user_id: row.user_id,
        setup,
        status,
        messages,
        feedback: row.feedback.map(|Json(f)| f),
        started_at: row.started_at,
        completed_at: row.completed_at,
        duration: row.duration,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn summary_from_row(row: SessionRow) -> Result<SessionSummary> {
    let setup = setup_from_row(&row)?;
    let status = status_from_row(&row)?;
    Ok(SessionSummary {
        id: row.id,
        user_id: row.user_id,
        setup,
        status,
        feedback: row.feedback.map(|Json(f)| f),
        started_at: row.started_at,
        completed_at: row.completed_at,
        duration: row.duration,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn message_from_row(row: MessageRow) -> Result<Message> {
    Ok(Message {
        role: row
            .role
            .parse()
            .with_context(|| format!("message seq {}", row.seq))?,
        content: row.content,
        timestamp: row.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::{Difficulty, InterviewType, MessageRole};
    use chrono::Utc;

    fn row(status: &str) -> SessionRow {
        let now = Utc::now();
        SessionRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            interview_type: "viva".to_string(),
            topic: "networks".to_string(),
            difficulty: "advanced".to_string(),
            status: status.to_string(),
            feedback: None,
            started_at: now,
            completed_at: None,
            duration: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_session_from_row() {
        let r = row("paused");
        let id = r.id;
        let messages = vec![Message {
            role: MessageRole::Ai,
            content: "Welcome!".to_string(),
            timestamp: Utc::now(),
        }];
        let session = session_from_row(r, messages).unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.status, SessionStatus::Paused);
        assert_eq!(session.setup.interview_type, InterviewType::Viva);
        assert_eq!(session.setup.difficulty, Difficulty::Advanced);
        assert_eq!(session.messages.len(), 1);
    }

    #[test]
    fn test_summary_from_row_rejects_unknown_status() {
        let err = summary_from_row(row("archived")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown session status 'archived'"));
    }

    #[test]
    fn test_message_from_row_rejects_unknown_role() {
        let r = MessageRow {
            seq: 3,
            role: "system".to_string(),
            content: "x".to_string(),
            timestamp: Utc::now(),
        };
        let err = message_from_row(r).unwrap_err();
        assert!(format!("{err:#}").contains("message seq 3"));
    }
}
