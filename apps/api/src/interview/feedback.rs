//! Feedback extraction. Turns the evaluator's loosely-structured reply into `Feedback`.
//!
//! The model is asked for JSON but routinely wraps it in prose or code fences,
//! returns scores as strings, or drops fields. The rules:
//! - the outermost `{ ... }` span is parsed
//! - list and text fields default to empty
//! - scores are rounded and clamped into 1..=10
//! - a missing overall score is an error; a missing skill score takes the overall score

use serde::Deserialize;

use crate::interview::models::{Feedback, SkillLevelAssessment};
use crate::llm_client::{parse_embedded_json, LlmError};

const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Text(String),
}

impl RawScore {
    fn value(&self) -> Option<f64> {
        match self {
            RawScore::Number(n) => Some(*n),
            RawScore::Text(s) => s.trim().split('/').next()?.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSkillLevels {
    clarity: Option<RawScore>,
    confidence: Option<RawScore>,
    technical_accuracy: Option<RawScore>,
    communication: Option<RawScore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeedback {
    overall_score: Option<RawScore>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    areas_of_improvement: Vec<String>,
    #[serde(default)]
    suggested_topics: Vec<String>,
    #[serde(default)]
    detailed_analysis: String,
    #[serde(default)]
    skill_level_assessment: Option<RawSkillLevels>,
}

/// Parses model output into a normalized `Feedback`.
pub fn parse_feedback(text: &str) -> Result<Feedback, LlmError> {
    let raw: RawFeedback = parse_embedded_json(text)?;

    let overall = raw
        .overall_score
        .as_ref()
        .and_then(RawScore::value)
        .filter(|v| v.is_finite())
        .ok_or_else(|| LlmError::Schema("overallScore is missing or not a number".to_string()))?;
    let overall_score = clamp_score(overall);

    let skill = |s: &Option<RawScore>| {
        s.as_ref()
            .and_then(RawScore::value)
            .filter(|v| v.is_finite())
            .map(clamp_score)
            .unwrap_or(overall_score)
    };
    let levels = raw.skill_level_assessment.unwrap_or_default();

    Ok(Feedback {
        overall_score,
        strengths: clean_list(raw.strengths),
        weaknesses: clean_list(raw.weaknesses),
        areas_of_improvement: clean_list(raw.areas_of_improvement),
        suggested_topics: clean_list(raw.suggested_topics),
        detailed_analysis: raw.detailed_analysis.trim().to_string(),
        skill_level_assessment: SkillLevelAssessment {
            clarity: skill(&levels.clarity),
            confidence: skill(&levels.confidence),
            technical_accuracy: skill(&levels.technical_accuracy),
            communication: skill(&levels.communication),
        },
    })
}

fn clamp_score(value: f64) -> u8 {
    value.round().clamp(MIN_SCORE, MAX_SCORE) as u8
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "overallScore": 7,
        "strengths": ["Clear explanation of closures", "Good use of examples"],
        "weaknesses": ["Shallow on event loop"],
        "areasOfImprovement": ["Study microtask queue"],
        "suggestedTopics": ["Promises", "Event loop"],
        "detailedAnalysis": "The candidate showed a good grasp of fundamentals.",
        "skillLevelAssessment": {
            "clarity": 8,
            "confidence": 6,
            "technicalAccuracy": 7,
            "communication": 8
        }
    }"#;

    #[test]
    fn test_parses_well_formed_feedback() {
        let feedback = parse_feedback(WELL_FORMED).unwrap();
        assert_eq!(feedback.overall_score, 7);
        assert_eq!(feedback.strengths.len(), 2);
        assert_eq!(feedback.suggested_topics, vec!["Promises", "Event loop"]);
        assert_eq!(feedback.skill_level_assessment.confidence, 6);
        assert_eq!(feedback.skill_level_assessment.technical_accuracy, 7);
    }

    #[test]
    fn test_parses_feedback_wrapped_in_prose_and_fences() {
        let text = format!("Here is my evaluation:\n```json\n{WELL_FORMED}\n```\nBest of luck!");
        let feedback = parse_feedback(&text).unwrap();
        assert_eq!(feedback.overall_score, 7);
    }

    #[test]
    fn test_scores_are_clamped_and_rounded() {
        let text = r#"{"overallScore": 14, "skillLevelAssessment": {
            "clarity": 0, "confidence": 6.6, "technicalAccuracy": -3, "communication": 10}}"#;
        let feedback = parse_feedback(text).unwrap();
        assert_eq!(feedback.overall_score, 10);
        assert_eq!(feedback.skill_level_assessment.clarity, 1);
        assert_eq!(feedback.skill_level_assessment.confidence, 7);
        assert_eq!(feedback.skill_level_assessment.technical_accuracy, 1);
        assert_eq!(feedback.skill_level_assessment.communication, 10);
    }

    #[test]
    fn test_string_scores_are_accepted() {
        let text = r#"{"overallScore": "6/10", "skillLevelAssessment": {"clarity": " 9 "}}"#;
        let feedback = parse_feedback(text).unwrap();
        assert_eq!(feedback.overall_score, 6);
        assert_eq!(feedback.skill_level_assessment.clarity, 9);
    }

    #[test]
    fn test_missing_fields_default() {
        let feedback = parse_feedback(r#"{"overallScore": 5}"#).unwrap();
        assert!(feedback.strengths.is_empty());
        assert!(feedback.areas_of_improvement.is_empty());
        assert_eq!(feedback.detailed_analysis, "");
        assert_eq!(feedback.skill_level_assessment.clarity, 5);
        assert_eq!(feedback.skill_level_assessment.communication, 5);
    }

    #[test]
    fn test_blank_list_items_dropped() {
        let feedback =
            parse_feedback(r#"{"overallScore": 5, "strengths": ["  ", "Calm under pressure "]}"#)
                .unwrap();
        assert_eq!(feedback.strengths, vec!["Calm under pressure"]);
    }

    #[test]
    fn test_null_skill_assessment_defaults() {
        let feedback =
            parse_feedback(r#"{"overallScore": 4, "skillLevelAssessment": null}"#).unwrap();
        assert_eq!(feedback.skill_level_assessment.confidence, 4);
    }

    #[test]
    fn test_missing_overall_score_is_error() {
        let err = parse_feedback(r#"{"strengths": ["x"]}"#).unwrap_err();
        assert!(matches!(err, LlmError::Schema(_)));
        assert!(parse_feedback(r#"{"overallScore": "excellent"}"#).is_err());
    }

    #[test]
    fn test_no_json_is_error() {
        let err = parse_feedback("I'm sorry, I can't evaluate an empty conversation.").unwrap_err();
        assert!(matches!(err, LlmError::MissingJson));
    }
}
