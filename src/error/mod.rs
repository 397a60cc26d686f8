//! Error types for all phases of the engine.

use crate::span::Span;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Error)]
pub enum LexerError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("Unterminated string at {0}")]
    UnterminatedString(Span),

    #[error("Invalid escape sequence '\\{0}' at {1}")]
    InvalidEscape(char, Span),

    #[error("Invalid number '{0}' at {1}")]
    InvalidNumber(String, Span),
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar(_, span) => *span,
            Self::UnterminatedString(span) => *span,
            Self::InvalidEscape(_, span) => *span,
            Self::InvalidNumber(_, span) => *span,
        }
    }
}

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Unexpected token '{found}', expected {expected} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input at {0}")]
    UnexpectedEof(Span),

    #[error("Invalid assignment target at {0}")]
    InvalidAssignmentTarget(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl ParserError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::UnexpectedEof(span) => *span,
            Self::InvalidAssignmentTarget(span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

impl From<LexerError> for ParserError {
    fn from(err: LexerError) -> Self {
        Self::General {
            message: err.to_string(),
            span: err.span(),
        }
    }
}

/// Bytecode compilation errors.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unsupported node '{what}' at {span}")]
    UnsupportedNode { what: String, span: Span },

    #[error("Unsupported operator '{op}' for {kinds} at {span}")]
    UnsupportedOperator {
        op: String,
        kinds: String,
        span: Span,
    },

    #[error("No cast path from {from} to {to} at {span}")]
    NoCastPath {
        from: String,
        to: String,
        span: Span,
    },

    #[error("Undefined identifier '{0}' at {1}")]
    UndefinedIdentifier(String, Span),

    #[error("Operand out of range for {mnemonic} at {span}")]
    OperandRange { mnemonic: String, span: Span },
}

impl CompileError {
    pub fn unsupported_node(what: impl Into<String>, span: Span) -> Self {
        Self::UnsupportedNode {
            what: what.into(),
            span,
        }
    }

    pub fn unsupported_operator(
        op: impl Into<String>,
        kinds: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnsupportedOperator {
            op: op.into(),
            kinds: kinds.into(),
            span,
        }
    }

    pub fn no_cast_path(from: impl Into<String>, to: impl Into<String>, span: Span) -> Self {
        Self::NoCastPath {
            from: from.into(),
            to: to.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnsupportedNode { span, .. } => *span,
            Self::UnsupportedOperator { span, .. } => *span,
            Self::NoCastPath { span, .. } => *span,
            Self::UndefinedIdentifier(_, span) => *span,
            Self::OperandRange { span, .. } => *span,
        }
    }
}

/// Runtime errors. These carry the byte offset of the faulting
/// instruction rather than a source span; the chunk keeps no line info.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Unknown opcode {opcode:#04X} at offset {offset:04}")]
    UnknownOpcode { opcode: u8, offset: usize },

    #[error("Truncated instruction at offset {offset:04}")]
    TruncatedInstruction { offset: usize },

    #[error("Division by zero at offset {offset:04}")]
    DivisionByZero { offset: usize },

    #[error("Read of unset slot {slot} at offset {offset:04}")]
    UnsetSlot { slot: u16, offset: usize },
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum JoltError {
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
