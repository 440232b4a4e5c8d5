//! Recovers quiz questions from model output.
//!
//! Models are asked for bare JSON but often wrap it in a code fence or add a
//! sentence before or after it. The parser tolerates that, keeps the valid
//! entries in their original order, and fails instead of inventing
//! questions when nothing usable is left.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Difficulty, QuestionType, QuizQuestion},
};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("CODE_FENCE is a valid regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuiz {
    pub questions: Vec<QuizQuestion>,
    /// Entries dropped for missing a question or an answer.
    pub skipped: usize,
}

pub fn parse_quiz_response(raw: &str) -> AppResult<ParsedQuiz> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::ParseError(
            "The AI service returned an empty quiz".to_string(),
        ));
    }

    let candidate = CODE_FENCE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str().trim())
        .filter(|body| !body.is_empty())
        .unwrap_or(raw);

    let value = parse_json(candidate)
        .or_else(|| (candidate != raw).then(|| parse_json(raw)).flatten())
        .ok_or_else(|| {
            AppError::ParseError("Failed to parse questions: no JSON found in response".to_string())
        })?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("questions") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(AppError::ParseError(
                    "Failed to parse questions: response has no \"questions\" list".to_string(),
                ))
            }
        },
        _ => {
            return Err(AppError::ParseError(
                "Failed to parse questions: unexpected JSON shape".to_string(),
            ))
        }
    };

    let total = entries.len();
    let questions: Vec<QuizQuestion> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let question = to_question(index, entry);
            if question.is_none() {
                log::warn!("Skipping malformed quiz entry at position {}", index + 1);
            }
            question
        })
        .collect();

    if questions.is_empty() {
        return Err(AppError::ParseError(format!(
            "Failed to parse questions: none of the {} entries had a question and an answer",
            total
        )));
    }

    Ok(ParsedQuiz {
        skipped: total - questions.len(),
        questions,
    })
}

/// Parses `text` directly, falling back to the first balanced JSON block
/// shaped like a quiz. Earlier blocks such as "[2]" in prose are passed over.
fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text)
        .ok()
        .filter(is_quiz_shaped)
        .or_else(|| {
            text.char_indices()
                .filter(|(_, c)| *c == '{' || *c == '[')
                .filter_map(|(start, _)| balanced_block_at(text, start))
                .filter_map(|block| serde_json::from_str::<Value>(block).ok())
                .find(is_quiz_shaped)
        })
}

/// `{"questions": [...]}` or an array holding at least one object.
fn is_quiz_shaped(value: &Value) -> bool {
    match value {
        Value::Object(object) => matches!(object.get("questions"), Some(Value::Array(_))),
        Value::Array(entries) => entries.iter().any(Value::is_object),
        _ => false,
    }
}

/// The `{...}` or `[...]` span opening at `start` whose brackets balance,
/// ignoring brackets inside string literals.
fn balanced_block_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

fn to_question(index: usize, entry: &Value) -> Option<QuizQuestion> {
    let object = entry.as_object()?;

    let question = object
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())?;
    let correct_answer = object.get("correct_answer").and_then(scalar_text)?;

    Some(QuizQuestion {
        id: object
            .get("id")
            .and_then(scalar_text)
            .unwrap_or_else(|| (index + 1).to_string()),
        question: question.to_string(),
        difficulty: object
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(Difficulty::parse)
            .unwrap_or(Difficulty::Medium),
        question_type: object
            .get("type")
            .and_then(Value::as_str)
            .and_then(QuestionType::parse),
        options: string_list(object.get("options")),
        correct_answer,
        explanation: object
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
        hints: string_list(object.get("hints")),
        key_concept: object
            .get("key_concept")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string),
    })
}

/// Strings, numbers and booleans as text; anything else is absent.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<String> = value?.as_array()?.iter().filter_map(scalar_text).collect();
    (!items.is_empty()).then_some(items)
}
