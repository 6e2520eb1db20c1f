// Interview LLM prompt templates and message assembly.

use serde_json::json;

use crate::interview::models::{InterviewType, Message, MessageRole, SessionSetup};
use crate::llm_client::{ChatMessage, CompletionParams};

pub const OPENING_INSTRUCTION: &str = "Start the interview with an appropriate opening question.";

pub const OPENING_PARAMS: CompletionParams = CompletionParams {
    max_tokens: 200,
    temperature: 0.7,
};

pub const REPLY_PARAMS: CompletionParams = CompletionParams {
    max_tokens: 300,
    temperature: 0.7,
};

pub const FEEDBACK_PARAMS: CompletionParams = CompletionParams {
    max_tokens: 1000,
    temperature: 0.5,
};

const TECHNICAL_SYSTEM: &str = "\
You are an expert technical interviewer conducting a {difficulty} level interview for {topic}. \
Ask relevant technical questions, dive deeper based on responses, and maintain a professional yet friendly tone. \
Ask one question at a time and build upon the candidate's answers.";

const HR_SYSTEM: &str = "\
You are an experienced HR interviewer conducting a {difficulty} level behavioral interview. \
Ask questions about work experience, teamwork, conflict resolution, and career goals. \
Be empathetic and professional. Ask one question at a time.";

const VIVA_SYSTEM: &str = "\
You are an academic examiner conducting a {difficulty} level viva on {topic}. \
Ask conceptual and theoretical questions, probe understanding, and test depth of knowledge. \
Maintain an academic yet supportive tone. Ask one question at a time.";

const FEEDBACK_PROMPT: &str = r#"Based on the following {interview_type} interview conversation for {topic} at {difficulty} level,
provide a comprehensive evaluation in JSON format with the following structure:
{
  "overallScore": (1-10),
  "strengths": [list of strengths],
  "weaknesses": [list of weaknesses],
  "areasOfImprovement": [specific areas to improve],
  "suggestedTopics": [topics to study further],
  "detailedAnalysis": "detailed paragraph analysis",
  "skillLevelAssessment": {
    "clarity": (1-10),
    "confidence": (1-10),
    "technicalAccuracy": (1-10),
    "communication": (1-10)
  }
}

Conversation:
{conversation}"#;

pub fn system_prompt(setup: &SessionSetup) -> String {
    let template = match setup.interview_type {
        InterviewType::Technical => TECHNICAL_SYSTEM,
        InterviewType::Hr => HR_SYSTEM,
        InterviewType::Viva => VIVA_SYSTEM,
    };
    render(
        template,
        &[
            ("difficulty", setup.difficulty.as_str()),
            ("topic", &setup.topic),
        ],
    )
}

/// The first AI message of every session.
pub fn welcome_message(setup: &SessionSetup, opening_question: &str) -> String {
    format!(
        "Welcome! Let's begin your {} interview for {}. {}",
        setup.interview_type,
        setup.topic,
        opening_question.trim()
    )
}

pub fn opening_messages(setup: &SessionSetup) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(setup)),
        ChatMessage::user(OPENING_INSTRUCTION),
    ]
}

/// System prompt followed by the transcript, with AI turns sent as `assistant`.
pub fn reply_messages(setup: &SessionSetup, transcript: &[Message]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    messages.push(ChatMessage::system(system_prompt(setup)));
    messages.extend(transcript.iter().map(|m| match m.role {
        MessageRole::Ai => ChatMessage::assistant(m.content.clone()),
        MessageRole::User => ChatMessage::user(m.content.clone()),
    }));
    messages
}

pub fn feedback_messages(setup: &SessionSetup, transcript: &[Message]) -> Vec<ChatMessage> {
    let conversation: Vec<_> = transcript
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect();

    let conversation = serde_json::Value::Array(conversation).to_string();
    let prompt = render(
        FEEDBACK_PROMPT,
        &[
            ("interview_type", setup.interview_type.as_str()),
            ("topic", &setup.topic),
            ("difficulty", setup.difficulty.as_str()),
            ("conversation", &conversation),
        ],
    );

    vec![ChatMessage::user(prompt)]
}

/// Fills `{name}` placeholders in one left-to-right pass. Substituted text is never
/// rescanned, so a topic or answer containing `{conversation}` stays literal.
/// Braces that do not name a variable are copied as-is.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let hit = vars.iter().find_map(|(name, value)| {
            after
                .strip_prefix(*name)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (*value, tail))
        });

        match hit {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::Difficulty;
    use crate::llm_client::ChatRole;
    use chrono::Utc;

    fn setup(interview_type: InterviewType) -> SessionSetup {
        SessionSetup {
            interview_type,
            topic: "Database Management".to_string(),
            difficulty: Difficulty::Advanced,
        }
    }

    fn msg(role: MessageRole, content: &str) -> Message {
        Message {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_system_prompt_per_type() {
        let technical = system_prompt(&setup(InterviewType::Technical));
        assert!(technical.starts_with("You are an expert technical interviewer"));
        assert!(technical.contains("advanced level interview for Database Management"));

        let hr = system_prompt(&setup(InterviewType::Hr));
        assert!(hr.contains("advanced level behavioral interview"));
        assert!(!hr.contains("{topic}"));

        let viva = system_prompt(&setup(InterviewType::Viva));
        assert!(viva.contains("viva on Database Management"));
    }

    #[test]
    fn test_welcome_message() {
        let text = welcome_message(&setup(InterviewType::Viva), "  What is 3NF?\n");
        assert_eq!(
            text,
            "Welcome! Let's begin your viva interview for Database Management. What is 3NF?"
        );
    }

    #[test]
    fn test_opening_messages() {
        let messages = opening_messages(&setup(InterviewType::Technical));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1], ChatMessage::user(OPENING_INSTRUCTION));
    }

    #[test]
    fn test_reply_messages_map_ai_to_assistant() {
        let transcript = vec![
            msg(MessageRole::Ai, "Welcome! What is an index?"),
            msg(MessageRole::User, "A lookup structure."),
        ];
        let messages = reply_messages(&setup(InterviewType::Technical), &transcript);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, "Welcome! What is an index?");
        assert_eq!(messages[2].role, ChatRole::User);
    }

    #[test]
    fn test_feedback_messages_embed_transcript_as_json() {
        let transcript = vec![
            msg(MessageRole::Ai, "Explain \"ACID\"."),
            msg(MessageRole::User, "Atomicity, consistency..."),
        ];
        let messages = feedback_messages(&setup(InterviewType::Viva), &transcript);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::User);

        let prompt = &messages[0].content;
        assert!(prompt.starts_with("Based on the following viva interview conversation"));
        assert!(prompt.contains(r#""content":"Explain \"ACID\".""#));
        assert!(prompt.contains(r#""role":"ai""#));
        assert!(prompt.contains("\"technicalAccuracy\": (1-10)"));
    }

    #[test]
    fn test_free_form_topic_with_placeholder_text_stays_literal() {
        let mut custom = setup(InterviewType::Technical);
        custom.topic = "Writing {conversation} parsers in {difficulty} mode".to_string();
        let transcript = vec![msg(MessageRole::User, "I'd use {topic} recursion.")];

        let prompt = &feedback_messages(&custom, &transcript)[0].content;
        assert!(prompt.contains(
            "for Writing {conversation} parsers in {difficulty} mode at advanced level"
        ));
        assert!(prompt.contains("I'd use {topic} recursion."));

        let system = system_prompt(&custom);
        assert!(system.contains("interview for Writing {conversation} parsers in {difficulty} mode."));
    }

    #[test]
    fn test_render_keeps_unknown_braces() {
        let out = render("{\n  \"a\": {x}, {y}\n}", &[("x", "1")]);
        assert_eq!(out, "{\n  \"a\": 1, {y}\n}");
        assert_eq!(render("tail {", &[("x", "1")]), "tail {");
    }
}
