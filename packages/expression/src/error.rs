use crate::ast::Span;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of expression at {pos}")]
    UnexpectedEof { pos: usize },

    #[error("Invalid syntax at {pos}: {message}")]
    InvalidSyntax { pos: usize, message: String },

    #[error("Unrecognized character at {pos}")]
    LexerError { pos: usize },

    #[error("Expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

impl ParseError {
    pub fn unexpected_token(
        pos: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize) -> Self {
        Self::UnexpectedEof { pos }
    }

    pub fn invalid_syntax(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            pos,
            message: message.into(),
        }
    }

    pub fn lexer_error(pos: usize) -> Self {
        Self::LexerError { pos }
    }

    /// Byte offset into the source where the error was detected
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnexpectedToken { pos, .. }
            | Self::UnexpectedEof { pos }
            | Self::InvalidSyntax { pos, .. }
            | Self::LexerError { pos } => Some(*pos),
            Self::TooDeep { .. } => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("'{name}' is not defined at {span:?}")]
    VariableNotFound { name: String, span: Span },

    #[error("Cannot read property '{property}' of {target} at {span:?}")]
    PropertyOfNothing {
        property: String,
        target: &'static str,
        span: Span,
    },

    #[error("'{name}' is not a function at {span:?}")]
    UnknownFunction { name: String, span: Span },

    #[error("'{name}' is not a constructor at {span:?}")]
    UnknownConstructor { name: String, span: Span },

    #[error("Type error at {span:?}: {message}")]
    TypeError { message: String, span: Span },
}
