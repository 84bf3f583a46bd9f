mod answer;
mod catalog;
mod config;
mod ids;
mod question;
mod quiz;

pub use answer::{Answer, AnswerRecord};
pub use catalog::QuestionCatalog;
pub use config::{DEFAULT_QUESTION_COUNT, QuizConfiguration};
pub use ids::SourceKey;
pub use question::{AnswerKey, Modality, Question, QuestionError};
pub use quiz::ActiveQuiz;
