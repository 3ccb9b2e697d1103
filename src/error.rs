//! Error types for the frond type checker and evaluator.

use crate::lexer::Span;
use thiserror::Error;

/// Result type for frond operations.
pub type Result<T> = std::result::Result<T, FrondError>;

/// Main error type for frond.
#[derive(Debug, Error)]
pub enum FrondError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),

    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    #[error("Runtime error: {0}")]
    Eval(#[from] EvalError),
}

impl FrondError {
    pub fn span(&self) -> Span {
        match self {
            FrondError::Lex(e) => e.span(),
            FrondError::Parse(e) => e.span(),
            FrondError::Type(e) => e.span(),
            FrondError::Eval(e) => e.span(),
        }
    }
}

/// Lexer errors.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, span: Span },

    #[error("Unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("Invalid number literal")]
    InvalidNumber { span: Span },

    #[error("Invalid escape sequence")]
    InvalidEscapeSequence { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::InvalidNumber { span } => *span,
            LexError::InvalidEscapeSequence { span } => *span,
        }
    }
}

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unexpected token '{found}', expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    #[error("Unexpected end of input")]
    UnexpectedEof { span: Span },

    #[error("Duplicate key '{name}' in record")]
    DuplicateKey { name: String, span: Span },

    #[error("Tag '{name}' takes at most one payload")]
    TagPayloadArity { name: String, span: Span },

    #[error("Match case must start with a tag pattern")]
    CaseNotATag { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span } => *span,
            ParseError::DuplicateKey { span, .. } => *span,
            ParseError::TagPayloadArity { span, .. } => *span,
            ParseError::CaseNotATag { span } => *span,
        }
    }
}

/// Which side of a row unification is missing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSide {
    Left,
    Right,
}

impl std::fmt::Display for RowSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowSide::Left => write!(f, "left"),
            RowSide::Right => write!(f, "right"),
        }
    }
}

/// Type checking errors. All are fatal to the current inference run.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("Unbound variable '{name}'")]
    UnboundVariable { name: String, span: Span },

    #[error("Infinite type: {var} occurs in {ty}")]
    InfiniteType { var: String, ty: String, span: Span },

    #[error("Kind mismatch: cannot unify {left} with {right}")]
    KindMismatch {
        left: String,
        right: String,
        span: Span,
    },

    #[error("Constructor mismatch: {left} is not {right}")]
    ConstructorMismatch {
        left: String,
        right: String,
        span: Span,
    },

    #[error("Arity mismatch: cannot unify {left} with {right}")]
    ArityMismatch {
        left: String,
        right: String,
        span: Span,
    },

    #[error("Cannot unify a record with a variant")]
    RowKindMismatch {
        left: String,
        right: String,
        span: Span,
    },

    #[error("Row mismatch: {side} side is missing {}", .keys.join(", "))]
    RowMismatch {
        keys: Vec<String>,
        side: RowSide,
        span: Span,
    },
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::UnboundVariable { span, .. } => *span,
            TypeError::InfiniteType { span, .. } => *span,
            TypeError::KindMismatch { span, .. } => *span,
            TypeError::ConstructorMismatch { span, .. } => *span,
            TypeError::ArityMismatch { span, .. } => *span,
            TypeError::RowKindMismatch { span, .. } => *span,
            TypeError::RowMismatch { span, .. } => *span,
        }
    }
}

/// Runtime errors from the evaluator. Unreachable for programs that pass
/// inference, but the evaluator must not panic on ill-typed input.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Unbound name '{name}'")]
    UnboundName { name: String, span: Span },

    #[error("Value is not a function")]
    NotAFunction { span: Span },

    #[error("Function expected {expected} arguments, got {found}")]
    WrongArgumentCount {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("No field '{name}' on value")]
    MissingField { name: String, span: Span },

    #[error("No case matched the scrutinee")]
    UnhandledCase { span: Span },

    #[error("Builtin '{name}' applied to an unsupported value")]
    BadBuiltinArgument { name: String, span: Span },
}

impl EvalError {
    pub fn span(&self) -> Span {
        match self {
            EvalError::UnboundName { span, .. } => *span,
            EvalError::NotAFunction { span } => *span,
            EvalError::WrongArgumentCount { span, .. } => *span,
            EvalError::MissingField { span, .. } => *span,
            EvalError::UnhandledCase { span } => *span,
            EvalError::BadBuiltinArgument { span, .. } => *span,
        }
    }
}
