//! The crate's error type (C10).
//!
//! Grounded on the teacher's use of `thiserror` for its own error enum
//! (`modus::error`/`modus::build` derive `#[derive(Error)]` variants rather
//! than hand-rolling `Display`/`std::error::Error`); the four variants here
//! are the ones the reasoning surfaces actually produce, not a speculative
//! catch-all.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
