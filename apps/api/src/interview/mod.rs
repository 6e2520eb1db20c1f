// Interview sessions: state machine, transcript, LLM-driven turns and feedback.
// All model calls go through the `Interviewer` trait; handlers never touch llm_client.

pub mod feedback;
pub mod handlers;
pub mod interviewer;
pub mod lifecycle;
pub mod models;
pub mod prompts;
pub mod store;
