//! Session state machine: `ongoing` sessions accept transcript turns;
//! completion happens once and freezes the transcript.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{
    Feedback, InterviewSession, Message, MessageRole, SessionSetup, SessionStatus,
};
use crate::interview::prompts::welcome_message;

impl InterviewSession {
    /// Builds a fresh session whose transcript opens with the AI welcome turn.
    pub fn begin(
        user_id: Uuid,
        setup: SessionSetup,
        opening_question: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let welcome = Message {
            role: MessageRole::Ai,
            content: welcome_message(&setup, opening_question),
            timestamp: now,
        };

        Self {
            id: Uuid::new_v4(),
            user_id,
            setup,
            status: SessionStatus::Ongoing,
            messages: vec![welcome],
            feedback: None,
            started_at: now,
            completed_at: None,
            duration: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ensure_owned_by(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Appends a transcript turn. Only `ongoing` sessions accept messages.
    pub fn push_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if self.status != SessionStatus::Ongoing {
            return Err(AppError::Validation("Session is not active".to_string()));
        }
        self.messages.push(Message {
            role,
            content: content.into(),
            timestamp: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Marks the session completed, attaching feedback and the elapsed minutes.
    pub fn complete(&mut self, feedback: Feedback, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.is_completed() {
            return Err(AppError::Conflict(
                "Session is already completed".to_string(),
            ));
        }
        self.status = SessionStatus::Completed;
        self.completed_at = Some(now);
        self.duration = Some(duration_minutes(self.started_at, now));
        self.feedback = Some(feedback);
        self.updated_at = now;
        Ok(())
    }
}

/// Whole minutes between two instants, rounded to nearest; never negative.
pub fn duration_minutes(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i32 {
    let millis = (ended_at - started_at).num_milliseconds().max(0);
    (millis as f64 / 60_000.0).round() as i32
}
