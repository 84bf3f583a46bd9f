use thiserror::Error;

use crate::model::QuestionError;
use crate::tracker::AnswerError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
}
