//! Error types for fea2d-script

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScriptError>;

/// A script line that could not be tokenized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Failure while running a script; execution stops at the failing line
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("line {line}: invalid number of arguments for {command}: expected {expected}, got {got}")]
    ArgumentCount {
        line: usize,
        command: String,
        expected: String,
        got: usize,
    },

    #[error("line {line}: invalid argument '{value}' for {command}: expected {expected}")]
    InvalidArgument {
        line: usize,
        command: String,
        value: String,
        expected: &'static str,
    },

    #[error("line {line}: invalid command: {command}")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: {source}")]
    Model {
        line: usize,
        #[source]
        source: fea2d_solver::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScriptError {
    /// Script line the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ScriptError::Parse(e) => Some(e.line),
            ScriptError::ArgumentCount { line, .. }
            | ScriptError::InvalidArgument { line, .. }
            | ScriptError::UnknownCommand { line, .. }
            | ScriptError::Model { line, .. } => Some(*line),
            ScriptError::Io(_) => None,
        }
    }
}
