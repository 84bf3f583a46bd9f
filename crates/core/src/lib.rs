#![forbid(unsafe_code)]

pub mod error;
pub mod grader;
pub mod model;
pub mod tracker;

pub use error::Error;
pub use grader::{GradeReport, grade};
