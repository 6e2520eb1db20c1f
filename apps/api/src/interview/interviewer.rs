//! The conversational side of a session.
//!
//! `AppState` holds an `Arc<dyn Interviewer>`. The default backend is `LlmInterviewer`;
//! tests swap in scripted implementations.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::interview::feedback::parse_feedback;
use crate::interview::models::{Feedback, InterviewSession, MessageRole, SessionSetup};
use crate::interview::prompts::{
    feedback_messages, opening_messages, reply_messages, FEEDBACK_PARAMS, OPENING_PARAMS,
    REPLY_PARAMS,
};
use crate::llm_client::LlmClient;

#[async_trait]
pub trait Interviewer: Send + Sync {
    /// First question of a new session.
    async fn opening_question(&self, setup: &SessionSetup) -> Result<String, AppError>;

    /// Next interviewer turn given the transcript so far (ending with the candidate's turn).
    async fn reply(&self, session: &InterviewSession) -> Result<String, AppError>;

    /// Scored evaluation of the whole transcript.
    async fn evaluate(&self, session: &InterviewSession) -> Result<Feedback, AppError>;
}

pub struct LlmInterviewer(pub LlmClient);

#[async_trait]
impl Interviewer for LlmInterviewer {
    async fn opening_question(&self, setup: &SessionSetup) -> Result<String, AppError> {
        self.0
            .chat_text(&opening_messages(setup), OPENING_PARAMS)
            .await
            .map_err(|e| AppError::Llm(format!("Failed to generate opening question: {e}")))
    }

    async fn reply(&self, session: &InterviewSession) -> Result<String, AppError> {
        self.0
            .chat_text(
                &reply_messages(&session.setup, &session.messages),
                REPLY_PARAMS,
            )
            .await
            .map_err(|e| AppError::Llm(format!("Failed to generate AI response: {e}")))
    }

    async fn evaluate(&self, session: &InterviewSession) -> Result<Feedback, AppError> {
        let text = self
            .0
            .chat_text(
                &feedback_messages(&session.setup, &session.messages),
                FEEDBACK_PARAMS,
            )
            .await
            .map_err(|e| AppError::Llm(format!("Failed to generate feedback: {e}")))?;

        parse_feedback(&text).map_err(|e| AppError::Llm(format!("Failed to parse feedback: {e}")))
    }
}

/// Result of one candidate/interviewer exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub ai_response: String,
    /// Transcript index of the candidate's turn; the AI turn follows it.
    pub first_new_index: usize,
}

/// Records the candidate's answer and the interviewer's follow-up on the session.
/// The session is left untouched when the interviewer fails.
pub async fn conduct_exchange(
    interviewer: &dyn Interviewer,
    session: &mut InterviewSession,
    user_response: &str,
) -> Result<Exchange, AppError> {
    let first_new_index = session.messages.len();
    session.push_message(MessageRole::User, user_response, Utc::now())?;

    let ai_response = match interviewer.reply(session).await {
        Ok(text) => text,
        Err(e) => {
            session.messages.truncate(first_new_index);
            return Err(e);
        }
    };

    session.push_message(MessageRole::Ai, ai_response.clone(), Utc::now())?;

    Ok(Exchange {
        ai_response,
        first_new_index,
    })
}

/// Evaluates the transcript and completes the session.
pub async fn conclude(
    interviewer: &dyn Interviewer,
    session: &mut InterviewSession,
) -> Result<(), AppError> {
    if session.is_completed() {
        return Err(AppError::Conflict(
            "Session is already completed".to_string(),
        ));
    }

    let feedback = interviewer.evaluate(session).await?;
    session.complete(feedback, Utc::now())?;

    info!(
        session_id = %session.id,
        duration = session.duration.unwrap_or_default(),
        messages = session.messages.len(),
        "Interview session completed"
    );
    Ok(())
}
