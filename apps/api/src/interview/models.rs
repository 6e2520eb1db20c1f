//! Interview domain types. Wire format is camelCase with `_id` identifiers,
//! matching what the browser client reads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Technical,
    Hr,
    Viva,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Hr => "hr",
            InterviewType::Viva => "viva",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Ongoing,
    Completed,
    Paused,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Ongoing => "ongoing",
            SessionStatus::Completed => "completed",
            SessionStatus::Paused => "paused",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Ai,
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::Ai => "ai",
            MessageRole::User => "user",
        }
    }
}

/// Error for a label that names no variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

fn unknown(kind: &'static str, value: &str) -> UnknownVariant {
    UnknownVariant {
        kind,
        value: value.to_string(),
    }
}

impl FromStr for InterviewType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(InterviewType::Technical),
            "hr" => Ok(InterviewType::Hr),
            "viva" => Ok(InterviewType::Viva),
            _ => Err(unknown("interview type", s)),
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(unknown("difficulty", s)),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(SessionStatus::Ongoing),
            "completed" => Ok(SessionStatus::Completed),
            "paused" => Ok(SessionStatus::Paused),
            _ => Err(unknown("session status", s)),
        }
    }
}

impl FromStr for MessageRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai" => Ok(MessageRole::Ai),
            "user" => Ok(MessageRole::User),
            _ => Err(unknown("message role", s)),
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// What the candidate asked to be interviewed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSetup {
    pub interview_type: InterviewType,
    pub topic: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLevelAssessment {
    pub clarity: u8,
    pub confidence: u8,
    pub technical_accuracy: u8,
    pub communication: u8,
}

/// Fixed-schema evaluation attached to a completed session. Scores are 1..=10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub overall_score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub areas_of_improvement: Vec<String>,
    pub suggested_topics: Vec<String>,
    pub detailed_analysis: String,
    pub skill_level_assessment: SkillLevelAssessment,
}

/// A full interview session with its transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub setup: SessionSetup,
    pub status: SessionStatus,
    pub messages: Vec<Message>,
    pub feedback: Option<Feedback>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Whole minutes between start and completion.
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session listed without its transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub setup: SessionSetup,
    pub status: SessionStatus,
    pub feedback: Option<Feedback>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interview_type_from_str_is_case_insensitive() {
        assert_eq!("HR".parse::<InterviewType>().unwrap(), InterviewType::Hr);
        assert_eq!(" viva ".parse::<InterviewType>().unwrap(), InterviewType::Viva);
        let err = "panel".parse::<InterviewType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown interview type 'panel'");
    }

    #[test]
    fn test_difficulty_round_trips_through_as_str() {
        for d in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced] {
            assert_eq!(d.as_str().parse::<Difficulty>().unwrap(), d);
        }
    }

    #[test]
    fn test_status_default_is_ongoing() {
        assert_eq!(SessionStatus::default(), SessionStatus::Ongoing);
        assert!("archived".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_session_serializes_with_client_field_names() {
        let now = Utc::now();
        let session = InterviewSession {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            setup: SessionSetup {
                interview_type: InterviewType::Technical,
                topic: "react".to_string(),
                difficulty: Difficulty::Intermediate,
            },
            status: SessionStatus::Ongoing,
            messages: vec![Message {
                role: MessageRole::Ai,
                content: "Welcome!".to_string(),
                timestamp: now,
            }],
            feedback: None,
            started_at: now,
            completed_at: None,
            duration: None,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&session).unwrap();
        assert!(value.get("_id").is_some());
        assert_eq!(value["interviewType"], "technical");
        assert_eq!(value["difficulty"], "intermediate");
        assert_eq!(value["status"], "ongoing");
        assert_eq!(value["messages"][0]["role"], "ai");
        assert!(value["feedback"].is_null());
    }

    #[test]
    fn test_feedback_uses_camel_case() {
        let feedback = Feedback {
            overall_score: 7,
            strengths: vec!["clear examples".into()],
            weaknesses: vec![],
            areas_of_improvement: vec!["depth on hooks".into()],
            suggested_topics: vec![],
            detailed_analysis: "Solid.".into(),
            skill_level_assessment: SkillLevelAssessment {
                clarity: 8,
                confidence: 6,
                technical_accuracy: 7,
                communication: 8,
            },
        };
        let value = serde_json::to_value(&feedback).unwrap();
        assert_eq!(value["overallScore"], 7);
        assert_eq!(value["areasOfImprovement"][0], "depth on hooks");
        assert_eq!(value["skillLevelAssessment"]["technicalAccuracy"], 7);
    }
}
