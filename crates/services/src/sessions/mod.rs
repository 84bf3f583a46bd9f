mod plan;
mod progress;
mod service;
mod store;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{QuizBuilder, ShuffleSource};
pub use progress::QuizProgress;
pub use service::QuizSession;
pub use store::{RestoredSession, SessionStore};
pub use view::{AnswerMark, ReviewItem};
