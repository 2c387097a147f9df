//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// The schema could not be compiled
    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
