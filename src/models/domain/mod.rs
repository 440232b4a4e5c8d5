pub mod material;
pub mod quiz_question;
pub use material::{ExtractionMetadata, Material, MaterialFormat};
pub use quiz_question::{Difficulty, GeneratedQuiz, QuestionType, QuizQuestion};
