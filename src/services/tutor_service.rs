use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Material,
        dto::{
            request::{
                normalize_question_count, sanitize_text, AskRequest, Focus, Level,
                MultipleApproachesRequest, NotesRequest, QuizDifficulty, QuizRequest,
                SimplerRequest, MAX_CONCEPT_CHARS, MAX_QUESTION_CHARS,
            },
            response::{
                ApproachesMetadata, ApproachesResponse, ExplanationMetadata, ExplanationResponse,
                NotesMetadata, NotesResponse, QuizMetadata, QuizResponse,
            },
        },
    },
    repositories::MaterialRepository,
    services::{
        formatter::{format_notes, word_count},
        model_service::{CompletionGateway, CompletionRequest},
        prompt_builder::{build, PromptTask},
        quiz_parser::parse_quiz_response,
    },
};

const APPROACH_COUNT: u8 = 3;

/// Generation features: notes, answers, simpler re-explanations, multiple
/// approaches and practice quizzes.
pub struct TutorService {
    repository: Arc<dyn MaterialRepository>,
    gateway: Arc<dyn CompletionGateway>,
}

impl TutorService {
    pub fn new(
        repository: Arc<dyn MaterialRepository>,
        gateway: Arc<dyn CompletionGateway>,
    ) -> Self {
        Self {
            repository,
            gateway,
        }
    }

    pub async fn generate_notes(&self, request: NotesRequest) -> AppResult<NotesResponse> {
        request.validate()?;
        let material = self.material(&request.material_id).await?;

        let level = Level::parse_or_default(request.level.as_deref());
        let focus = Focus::parse_or_default(request.focus.as_deref());
        let subject = non_blank(request.subject).or_else(|| material.subject.clone());

        log::info!(
            "Generating {} {} notes for material {}",
            level.as_str(),
            focus.as_str(),
            material.id
        );

        let prompt = build(&PromptTask::Notes {
            text: &material.text,
            subject: subject.as_deref(),
            level,
            focus,
        });
        let notes = format_notes(&self.gateway.complete(prompt.into()).await?);

        Ok(NotesResponse {
            success: true,
            metadata: NotesMetadata {
                subject,
                level: level.as_str(),
                focus: focus.as_str(),
                word_count: word_count(&notes),
            },
            notes,
        })
    }

    /// Answers a question, grounded in a material when one is given. An
    /// unknown material id is an error rather than a context-free answer.
    pub async fn ask(&self, request: AskRequest) -> AppResult<ExplanationResponse> {
        request.validate()?;
        let question = required_text(&request.question, MAX_QUESTION_CHARS, "Question")?;
        let level = Level::parse_or_default(request.level.as_deref());

        let material = match non_blank(request.material_id) {
            Some(id) => Some(self.material(&id).await?),
            None => None,
        };

        log::info!(
            "Answering {} question (context: {})",
            level.as_str(),
            material.as_ref().map(|m| m.id.as_str()).unwrap_or("none")
        );

        let prompt = build(&PromptTask::Question {
            question: &question,
            context: material.as_ref().map(|m| m.text.as_str()),
            level,
        });
        let explanation = self.gateway.complete(prompt.into()).await?;

        Ok(ExplanationResponse {
            success: true,
            metadata: ExplanationMetadata {
                level: Some(level.as_str()),
                has_context: Some(material.is_some()),
                simplified: None,
                word_count: word_count(&explanation),
            },
            explanation,
        })
    }

    pub async fn explain_simpler(&self, request: SimplerRequest) -> AppResult<ExplanationResponse> {
        request.validate()?;
        let question = required_text(&request.question, MAX_QUESTION_CHARS, "Question")?;
        let original = request.original_explanation.trim();
        if original.is_empty() {
            return Err(AppError::ValidationError(
                "Original explanation cannot be empty".to_string(),
            ));
        }

        log::info!("Simplifying an earlier explanation");

        let prompt = build(&PromptTask::Simpler {
            original_explanation: original,
            question: &question,
        });
        let explanation = self.gateway.complete(prompt.into()).await?;

        Ok(ExplanationResponse {
            success: true,
            metadata: ExplanationMetadata {
                level: None,
                has_context: None,
                simplified: Some(true),
                word_count: word_count(&explanation),
            },
            explanation,
        })
    }

    pub async fn explain_multiple_ways(
        &self,
        request: MultipleApproachesRequest,
    ) -> AppResult<ApproachesResponse> {
        request.validate()?;
        let concept = required_text(&request.concept, MAX_CONCEPT_CHARS, "Concept")?;

        log::info!("Explaining a concept {} ways", APPROACH_COUNT);

        let prompt = build(&PromptTask::MultipleApproaches { concept: &concept });
        let approaches = self.gateway.complete(prompt.into()).await?;

        Ok(ApproachesResponse {
            success: true,
            metadata: ApproachesMetadata {
                num_approaches: APPROACH_COUNT,
                word_count: word_count(&approaches),
            },
            approaches,
        })
    }

    pub async fn generate_quiz(&self, request: QuizRequest) -> AppResult<QuizResponse> {
        request.validate()?;
        let material = self.material(&request.material_id).await?;

        let count = normalize_question_count(request.num_questions);
        let difficulty = QuizDifficulty::parse_or_default(request.difficulty.as_deref());
        let subject = non_blank(request.subject).or_else(|| material.subject.clone());

        log::info!(
            "Generating {} {} quiz questions for material {}",
            count,
            difficulty.as_str(),
            material.id
        );

        let prompt = build(&PromptTask::Quiz {
            text: &material.text,
            subject: subject.as_deref(),
            count,
            difficulty,
        });
        let raw = self.gateway.complete(CompletionRequest::from(prompt)).await?;
        let parsed = parse_quiz_response(&raw).map_err(|err| {
            log::error!("Quiz response for material {} was unusable: {}", material.id, err);
            err
        })?;

        if parsed.skipped > 0 {
            log::warn!(
                "Dropped {} malformed quiz entries for material {}",
                parsed.skipped,
                material.id
            );
        }

        Ok(QuizResponse {
            success: true,
            metadata: QuizMetadata {
                total_questions: parsed.questions.len(),
                skipped: parsed.skipped,
                subject,
                difficulty: difficulty.as_str(),
            },
            questions: parsed.questions,
        })
    }

    async fn material(&self, id: &str) -> AppResult<Material> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::ValidationError(
                "Please select a material first".to_string(),
            ));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Material '{}' not found", id)))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_text(value: &str, max_chars: usize, field: &str) -> AppResult<String> {
    sanitize_text(value, max_chars)
        .ok_or_else(|| AppError::ValidationError(format!("{} cannot be empty", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repositories::JsonMaterialRepository,
        services::model_service::MockCompletionGateway,
        test_utils::fixtures::sample_material,
    };

    async fn repository_with(material: &Material) -> Arc<JsonMaterialRepository> {
        let repository = Arc::new(JsonMaterialRepository::in_memory());
        repository.insert(material.clone()).await.expect("insert");
        repository
    }

    fn notes_request(material_id: &str) -> NotesRequest {
        NotesRequest {
            material_id: material_id.to_string(),
            subject: None,
            level: Some("beginner".to_string()),
            focus: None,
        }
    }

    #[tokio::test]
    async fn test_generate_notes_sends_material_text() {
        let material = sample_material("physics.pdf", "Momentum is mass times velocity.");
        let repository = repository_with(&material).await;

        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_complete()
            .withf(|request| {
                request.prompt.contains("Momentum is mass times velocity.")
                    && request.prompt.contains("beginner")
                    && request.max_tokens == Some(4000)
            })
            .times(1)
            .returning(|_| Ok("# Momentum\np = mv".to_string()));

        let service = TutorService::new(repository, Arc::new(gateway));
        let response = service
            .generate_notes(notes_request(&material.id))
            .await
            .expect("notes");

        assert!(response.success);
        assert_eq!(response.notes, "# Momentum\n\np = mv");
        assert_eq!(response.metadata.level, "beginner");
        assert_eq!(response.metadata.focus, "concept-oriented");
        assert_eq!(response.metadata.word_count, 5);
    }

    #[tokio::test]
    async fn test_generate_notes_unknown_material() {
        let mut gateway = MockCompletionGateway::new();
        gateway.expect_complete().times(0);

        let service = TutorService::new(
            Arc::new(JsonMaterialRepository::in_memory()),
            Arc::new(gateway),
        );
        let result = service.generate_notes(notes_request("missing")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_generate_notes_requires_material_id() {
        let service = TutorService::new(
            Arc::new(JsonMaterialRepository::in_memory()),
            Arc::new(MockCompletionGateway::new()),
        );
        let result = service.generate_notes(notes_request("")).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_ask_without_material_has_no_context() {
        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_complete()
            .withf(|request| !request.prompt.contains("Relevant study material"))
            .returning(|_| Ok("Because of Rayleigh scattering.".to_string()));

        let service = TutorService::new(
            Arc::new(JsonMaterialRepository::in_memory()),
            Arc::new(gateway),
        );
        let response = service
            .ask(AskRequest {
                question: "Why is the sky blue?".to_string(),
                material_id: Some("   ".to_string()),
                level: None,
            })
            .await
            .expect("ask");

        assert_eq!(response.metadata.has_context, Some(false));
        assert_eq!(response.metadata.level, Some("intermediate"));
        assert_eq!(response.metadata.word_count, 4);
    }

    #[tokio::test]
    async fn test_ask_with_unknown_material_is_not_found() {
        let service = TutorService::new(
            Arc::new(JsonMaterialRepository::in_memory()),
            Arc::new(MockCompletionGateway::new()),
        );
        let result = service
            .ask(AskRequest {
                question: "What is this?".to_string(),
                material_id: Some("ghost".to_string()),
                level: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_question() {
        let service = TutorService::new(
            Arc::new(JsonMaterialRepository::in_memory()),
            Arc::new(MockCompletionGateway::new()),
        );
        let result = service
            .ask(AskRequest {
                question: "   ".to_string(),
                material_id: None,
                level: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_explain_simpler_marks_simplified() {
        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_complete()
            .withf(|request| request.prompt.contains("cells split in two"))
            .returning(|_| Ok("Imagine a cookie breaking in half.".to_string()));

        let service = TutorService::new(
            Arc::new(JsonMaterialRepository::in_memory()),
            Arc::new(gateway),
        );
        let response = service
            .explain_simpler(SimplerRequest {
                original_explanation: "Mitosis: cells split in two.".to_string(),
                question: "What is mitosis?".to_string(),
            })
            .await
            .expect("simpler");

        assert_eq!(response.metadata.simplified, Some(true));
        assert_eq!(response.metadata.level, None);
    }

    #[tokio::test]
    async fn test_explain_multiple_ways() {
        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_complete()
            .returning(|_| Ok("Approach 1 ... Approach 2 ... Approach 3 ...".to_string()));

        let service = TutorService::new(
            Arc::new(JsonMaterialRepository::in_memory()),
            Arc::new(gateway),
        );
        let response = service
            .explain_multiple_ways(MultipleApproachesRequest {
                concept: "derivatives".to_string(),
            })
            .await
            .expect("approaches");

        assert_eq!(response.metadata.num_approaches, 3);
    }

    #[tokio::test]
    async fn test_generate_quiz_parses_questions() {
        let material = sample_material("chem.pdf", "Water is H2O.");
        let repository = repository_with(&material).await;

        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_complete()
            .withf(|request| request.prompt.contains("Create 20 practice questions"))
            .returning(|_| {
                Ok(r#"```json
{"questions": [
  {"id": 1, "difficulty": "easy", "question": "Formula of water?", "correct_answer": "H2O", "explanation": "Two H, one O."},
  {"id": 2, "difficulty": "hard", "question": "Broken entry"}
]}
```"#
                .to_string())
            });

        let service = TutorService::new(repository, Arc::new(gateway));
        let response = service
            .generate_quiz(QuizRequest {
                material_id: material.id.clone(),
                num_questions: Some(99),
                difficulty: Some("unknown".to_string()),
                subject: Some("Chemistry".to_string()),
            })
            .await
            .expect("quiz");

        assert_eq!(response.questions.len(), 1);
        assert_eq!(response.metadata.total_questions, 1);
        assert_eq!(response.metadata.skipped, 1);
        assert_eq!(response.metadata.difficulty, "mixed");
        assert_eq!(response.metadata.subject.as_deref(), Some("Chemistry"));
    }

    #[tokio::test]
    async fn test_generate_quiz_unparseable_response() {
        let material = sample_material("chem.pdf", "Water is H2O.");
        let repository = repository_with(&material).await;

        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_complete()
            .returning(|_| Ok("I cannot help with that.".to_string()));

        let service = TutorService::new(repository, Arc::new(gateway));
        let result = service
            .generate_quiz(QuizRequest {
                material_id: material.id.clone(),
                num_questions: None,
                difficulty: None,
                subject: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_gateway_failure_is_propagated() {
        let material = sample_material("chem.pdf", "Water is H2O.");
        let repository = repository_with(&material).await;

        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_complete()
            .returning(|_| Err(AppError::GatewayError("rate limited".to_string())));

        let service = TutorService::new(repository, Arc::new(gateway));
        let result = service.generate_notes(notes_request(&material.id)).await;

        assert!(matches!(result, Err(AppError::GatewayError(_))));
    }
}
