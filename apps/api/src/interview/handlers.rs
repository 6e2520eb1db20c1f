//! Axum route handlers for the Session API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::interview::interviewer::{conclude, conduct_exchange};
use crate::interview::models::{Feedback, InterviewSession, SessionSetup, SessionSummary};
use crate::interview::store::{
    append_messages, fetch_session, insert_session, list_summaries, save_completion,
    HISTORY_LIMIT,
};
use crate::state::AppState;
use crate::topics::catalog::check_selection;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub interview_type: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub session_id: Option<String>,
    pub user_response: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondResponse {
    pub session_id: Uuid,
    pub ai_response: String,
    pub message_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionResponse {
    pub message: String,
    pub session_id: Uuid,
    pub feedback: Option<Feedback>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/session/start
///
/// Asks the interviewer for an opening question and stores the new session.
pub async fn handle_start(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<InterviewSession>), AppError> {
    let setup = parse_setup(request)?;
    check_selection(&setup)?;

    let opening = state.interviewer.opening_question(&setup).await?;
    let session = InterviewSession::begin(user_id, setup, &opening, Utc::now());
    insert_session(&state.db, &session).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/session/respond
///
/// Records the candidate's answer and the interviewer's next turn.
pub async fn handle_respond(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<RespondRequest>,
) -> Result<Json<RespondResponse>, AppError> {
    let (session_id, user_response) = match (non_blank(request.session_id), non_blank(request.user_response)) {
        (Some(id), Some(response)) => (id, response),
        _ => {
            return Err(AppError::Validation(
                "Session ID and response are required".to_string(),
            ))
        }
    };
    let session_id = parse_session_id(&session_id)?;

    let mut session = load_owned_session(&state, session_id, user_id).await?;
    let exchange =
        conduct_exchange(state.interviewer.as_ref(), &mut session, &user_response).await?;

    append_messages(
        &state.db,
        session.id,
        exchange.first_new_index,
        &session.messages[exchange.first_new_index..],
    )
    .await?;

    Ok(Json(RespondResponse {
        session_id: session.id,
        ai_response: exchange.ai_response,
        message_count: session.messages.len(),
    }))
}

/// POST /api/session/end/:id
///
/// Evaluates the transcript and completes the session.
pub async fn handle_end(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<EndSessionResponse>, AppError> {
    let session_id = parse_session_id(&id)?;
    let mut session = load_owned_session(&state, session_id, user_id).await?;

    conclude(state.interviewer.as_ref(), &mut session).await?;
    save_completion(&state.db, &session).await?;

    Ok(Json(EndSessionResponse {
        message: "Session completed successfully".to_string(),
        session_id: session.id,
        feedback: session.feedback,
    }))
}

/// GET /api/session/result/:id
///
/// Full session including transcript and feedback.
pub async fn handle_result(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<InterviewSession>, AppError> {
    let session_id = parse_session_id(&id)?;
    let session = load_owned_session(&state, session_id, user_id).await?;
    Ok(Json(session))
}

/// GET /api/session/history
///
/// The caller's most recent sessions, without transcripts.
pub async fn handle_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    let sessions = list_summaries(&state.db, user_id, HISTORY_LIMIT).await?;
    Ok(Json(sessions))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_owned_session(
    state: &AppState,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<InterviewSession, AppError> {
    let session = fetch_session(&state.db, session_id)
        .await?
        .ok_or_else(session_not_found)?;
    session.ensure_owned_by(user_id)?;
    Ok(session)
}

fn parse_setup(request: StartSessionRequest) -> Result<SessionSetup, AppError> {
    let (Some(interview_type), Some(topic), Some(difficulty)) = (
        non_blank(request.interview_type),
        non_blank(request.topic),
        non_blank(request.difficulty),
    ) else {
        return Err(AppError::Validation(
            "Please provide all required fields".to_string(),
        ));
    };

    Ok(SessionSetup {
        interview_type: interview_type
            .parse()
            .map_err(|e| AppError::Validation(format!("{e}")))?,
        topic,
        difficulty: difficulty
            .parse()
            .map_err(|e| AppError::Validation(format!("{e}")))?,
    })
}

/// Malformed ids cannot name a session, so they read as "not found".
fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| session_not_found())
}

fn session_not_found() -> AppError {
    AppError::NotFound("Session not found".to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
