//! Static catalog of interview topics, grouped by interview type.

use serde::Serialize;

use crate::errors::AppError;
use crate::interview::models::{Difficulty, InterviewType, SessionSetup};

use crate::interview::models::Difficulty::{Advanced, Beginner, Intermediate};

const ALL_LEVELS: &[Difficulty] = &[Beginner, Intermediate, Advanced];
const SENIOR_LEVELS: &[Difficulty] = &[Intermediate, Advanced];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: &'static [Difficulty],
}

const fn topic(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    difficulty: &'static [Difficulty],
) -> Topic {
    Topic {
        id,
        name,
        description,
        difficulty,
    }
}

pub const TECHNICAL_TOPICS: &[Topic] = &[
    topic("react", "React Developer", "Frontend development with React, hooks, state management", ALL_LEVELS),
    topic("nodejs", "Node.js Developer", "Backend development with Node.js, Express, APIs", ALL_LEVELS),
    topic("python", "Python Developer", "Python programming, Django, Flask, data structures", ALL_LEVELS),
    topic("javascript", "JavaScript Developer", "Core JavaScript, ES6+, async programming", ALL_LEVELS),
    topic("fullstack", "Full Stack Developer", "Frontend and backend development, databases, deployment", SENIOR_LEVELS),
    topic("devops", "DevOps Engineer", "CI/CD, Docker, Kubernetes, cloud platforms", SENIOR_LEVELS),
    topic("data-science", "Data Science", "Machine learning, statistics, data analysis", ALL_LEVELS),
];

pub const HR_TOPICS: &[Topic] = &[
    topic("behavioral", "Behavioral Interview", "Work experience, teamwork, conflict resolution", ALL_LEVELS),
    topic("leadership", "Leadership & Management", "Team leadership, decision making, project management", SENIOR_LEVELS),
    topic("entry-level", "Entry Level Position", "Career goals, motivation, cultural fit", &[Beginner]),
];

pub const VIVA_TOPICS: &[Topic] = &[
    topic("computer-science", "Computer Science", "Algorithms, data structures, operating systems", ALL_LEVELS),
    topic("dbms", "Database Management", "SQL, normalization, transactions, indexing", ALL_LEVELS),
    topic("networks", "Computer Networks", "TCP/IP, protocols, network security", ALL_LEVELS),
    topic("software-engineering", "Software Engineering", "SDLC, design patterns, testing, architecture", SENIOR_LEVELS),
];

/// The whole catalog as served by `GET /api/topics`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopicCatalog {
    pub technical: &'static [Topic],
    pub hr: &'static [Topic],
    pub viva: &'static [Topic],
}

pub const CATALOG: TopicCatalog = TopicCatalog {
    technical: TECHNICAL_TOPICS,
    hr: HR_TOPICS,
    viva: VIVA_TOPICS,
};

pub fn topics_for(interview_type: InterviewType) -> &'static [Topic] {
    match interview_type {
        InterviewType::Technical => CATALOG.technical,
        InterviewType::Hr => CATALOG.hr,
        InterviewType::Viva => CATALOG.viva,
    }
}

pub fn find_topic(interview_type: InterviewType, id: &str) -> Option<&'static Topic> {
    topics_for(interview_type).iter().find(|t| t.id == id)
}

/// Catalog topics only run at the levels they offer. Topics outside the
/// catalog are free-form and accepted at any level.
pub fn check_selection(setup: &SessionSetup) -> Result<(), AppError> {
    match find_topic(setup.interview_type, &setup.topic) {
        Some(topic) if !topic.difficulty.contains(&setup.difficulty) => {
            Err(AppError::Validation(format!(
                "{} is not offered at {} level",
                topic.name, setup.difficulty
            )))
        }
        _ => Ok(()),
    }
}
