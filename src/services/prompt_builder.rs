//! Prompt composition for every tutoring task.
//!
//! Everything here is pure: a [`PromptTask`] goes in and a [`BuiltPrompt`]
//! with its system message and sampling settings comes out.

use once_cell::sync::Lazy;
use schemars::schema_for;

use crate::{
    constants::prompts::{
        ANSWER_INSTRUCTIONS, EXPLAINER_SYSTEM_PROMPT, MULTIPLE_APPROACHES_INSTRUCTIONS,
        NOTES_INSTRUCTIONS, NOTES_SYSTEM_PROMPT, QUIZ_EXAMPLE, QUIZ_INSTRUCTIONS,
        QUIZ_SYSTEM_PROMPT, SIMPLER_INSTRUCTIONS,
    },
    models::{
        domain::GeneratedQuiz,
        dto::request::{Focus, Level, QuizDifficulty},
    },
};

pub const QUESTION_CONTEXT_CHARS: usize = 2000;
pub const SIMPLER_EXPLANATION_CHARS: usize = 1500;
pub const QUIZ_MATERIAL_CHARS: usize = 3000;

const NOTES_MAX_TOKENS: u32 = 4000;
const EXPLANATION_MAX_TOKENS: u32 = 3000;
const QUIZ_MAX_TOKENS: u32 = 3000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const QUIZ_TEMPERATURE: f32 = 0.8;

static QUIZ_SCHEMA: Lazy<String> = Lazy::new(|| {
    serde_json::to_string_pretty(&schema_for!(GeneratedQuiz)).unwrap_or_default()
});

#[derive(Debug, Clone, PartialEq)]
pub enum PromptTask<'a> {
    Notes {
        text: &'a str,
        subject: Option<&'a str>,
        level: Level,
        focus: Focus,
    },
    Question {
        question: &'a str,
        context: Option<&'a str>,
        level: Level,
    },
    Simpler {
        original_explanation: &'a str,
        question: &'a str,
    },
    Quiz {
        text: &'a str,
        subject: Option<&'a str>,
        count: u32,
        difficulty: QuizDifficulty,
    },
    MultipleApproaches {
        concept: &'a str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPrompt {
    pub system: &'static str,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

pub fn build(task: &PromptTask<'_>) -> BuiltPrompt {
    match task {
        PromptTask::Notes {
            text,
            subject,
            level,
            focus,
        } => BuiltPrompt {
            system: NOTES_SYSTEM_PROMPT,
            user: format!(
                "Turn the following study material into clear, complete study notes.\n\n\
                 **Study material:**\n{}\n\n\
                 **Student level:** {}\n\
                 **Subject:** {}\n\
                 **Focus:** {}\n\n{}",
                text,
                level.as_str(),
                subject_or_general(*subject),
                focus.as_str(),
                NOTES_INSTRUCTIONS
            ),
            max_tokens: NOTES_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        },
        PromptTask::Question {
            question,
            context,
            level,
        } => {
            let context_section = context
                .map(|context| {
                    format!(
                        "**Relevant study material:**\n{}\n\n",
                        truncate_chars(context, QUESTION_CONTEXT_CHARS)
                    )
                })
                .unwrap_or_default();

            BuiltPrompt {
                system: EXPLAINER_SYSTEM_PROMPT,
                user: format!(
                    "A student needs help understanding something.\n\n\
                     **Student's question:**\n{}\n\n\
                     **Student level:** {}\n\n{}{}",
                    question,
                    level.as_str(),
                    context_section,
                    ANSWER_INSTRUCTIONS
                ),
                max_tokens: EXPLANATION_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
            }
        }
        PromptTask::Simpler {
            original_explanation,
            question,
        } => BuiltPrompt {
            system: EXPLAINER_SYSTEM_PROMPT,
            user: format!(
                "A student asked: \"{}\"\n\n\
                 You gave this explanation:\n{}\n\n{}",
                question,
                truncate_chars(original_explanation, SIMPLER_EXPLANATION_CHARS),
                SIMPLER_INSTRUCTIONS
            ),
            max_tokens: EXPLANATION_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        },
        PromptTask::Quiz {
            text,
            subject,
            count,
            difficulty,
        } => {
            let distribution = difficulty.distribution(*count);

            BuiltPrompt {
                system: QUIZ_SYSTEM_PROMPT,
                user: format!(
                    "Create {} practice questions from this study material.\n\n\
                     **Study material:**\n{}\n\n\
                     **Subject:** {}\n\
                     **Difficulty distribution:**\n\
                     - Easy questions: {}\n\
                     - Medium questions: {}\n\
                     - Hard questions: {}\n\n{}\n\n\
                     Respond with a single JSON object like this example:\n{}\n\n\
                     The object must validate against this JSON Schema:\n{}\n\n\
                     Return ONLY valid JSON, no other text.",
                    count,
                    truncate_chars(text, QUIZ_MATERIAL_CHARS),
                    subject_or_general(*subject),
                    distribution.easy,
                    distribution.medium,
                    distribution.hard,
                    QUIZ_INSTRUCTIONS,
                    QUIZ_EXAMPLE,
                    QUIZ_SCHEMA.as_str()
                ),
                max_tokens: QUIZ_MAX_TOKENS,
                temperature: QUIZ_TEMPERATURE,
            }
        }
        PromptTask::MultipleApproaches { concept } => BuiltPrompt {
            system: EXPLAINER_SYSTEM_PROMPT,
            user: format!(
                "**Concept:** {}\n\n{}\n\nStudents learn differently, so make the three perspectives genuinely different.",
                concept, MULTIPLE_APPROACHES_INSTRUCTIONS
            ),
            max_tokens: EXPLANATION_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        },
    }
}

fn subject_or_general(subject: Option<&str>) -> &str {
    subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("General")
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
