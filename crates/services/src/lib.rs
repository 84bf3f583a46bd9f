#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod sessions;

pub use app_services::AppServices;
pub use error::{AppServicesError, SessionError};
pub use sessions::{
    AnswerMark, QuizBuilder, QuizProgress, QuizSession, RestoredSession, ReviewItem,
    SessionStore, ShuffleSource,
};
