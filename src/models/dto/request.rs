use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MAX_QUESTION_CHARS: usize = 1000;
pub const MAX_CONCEPT_CHARS: usize = 500;
pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Focus {
    #[default]
    ConceptOriented,
    ExamOriented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizDifficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Mixed,
}

impl Level {
    /// Unknown or missing levels fall back to intermediate.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("beginner") => Level::Beginner,
            Some("advanced") => Level::Advanced,
            _ => Level::Intermediate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl Focus {
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("exam-oriented") => Focus::ExamOriented,
            _ => Focus::ConceptOriented,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::ConceptOriented => "concept-oriented",
            Focus::ExamOriented => "exam-oriented",
        }
    }
}

impl QuizDifficulty {
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("easy") => QuizDifficulty::Easy,
            Some("medium") => QuizDifficulty::Medium,
            Some("hard") => QuizDifficulty::Hard,
            _ => QuizDifficulty::Mixed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizDifficulty::Easy => "easy",
            QuizDifficulty::Medium => "medium",
            QuizDifficulty::Hard => "hard",
            QuizDifficulty::Mixed => "mixed",
        }
    }

    /// How many easy, medium and hard questions to ask for out of `count`.
    pub fn distribution(&self, count: u32) -> DifficultyDistribution {
        match self {
            QuizDifficulty::Easy => DifficultyDistribution { easy: count, medium: 0, hard: 0 },
            QuizDifficulty::Medium => DifficultyDistribution { easy: 0, medium: count, hard: 0 },
            QuizDifficulty::Hard => DifficultyDistribution { easy: 0, medium: 0, hard: count },
            QuizDifficulty::Mixed => DifficultyDistribution {
                easy: count / 3 + u32::from(count % 3 > 0),
                medium: count / 3 + u32::from(count % 3 > 1),
                hard: count / 3,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyDistribution {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

/// Out-of-range counts are replaced rather than rejected: below one asks for
/// the default, above the cap asks for the cap.
pub fn normalize_question_count(requested: Option<i64>) -> u32 {
    match requested {
        None => DEFAULT_QUESTION_COUNT,
        Some(n) if n < 1 => DEFAULT_QUESTION_COUNT,
        Some(n) if n > MAX_QUESTION_COUNT as i64 => MAX_QUESTION_COUNT,
        Some(n) => n as u32,
    }
}

/// Trims and caps free text; `None` when nothing is left.
pub fn sanitize_text(text: &str, max_chars: usize) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NotesRequest {
    #[validate(length(min = 1, message = "Please select a material first"))]
    pub material_id: String,
    pub subject: Option<String>,
    pub level: Option<String>,
    pub focus: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: String,
    pub material_id: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SimplerRequest {
    #[validate(length(min = 1, message = "Original explanation cannot be empty"))]
    pub original_explanation: String,
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuizRequest {
    #[validate(length(min = 1, message = "Please select a material first"))]
    pub material_id: String,
    pub num_questions: Option<i64>,
    pub difficulty: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MultipleApproachesRequest {
    #[validate(length(min = 1, message = "Concept cannot be empty"))]
    pub concept: String,
}
