//! Diagnostic printing for frond errors.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::error::{EvalError, FrondError, LexError, ParseError, TypeError};

/// Print a frond error with colored, source-anchored diagnostics.
pub fn print_error(filename: &str, source: &str, error: &FrondError) {
    let (message, note) = describe(error);
    let span = error.span();

    let mut report = Report::build(ReportKind::Error, filename, span.start)
        .with_message(&message)
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_message(&message)
                .with_color(Color::Red),
        );

    if let Some(note_text) = note {
        report = report.with_help(note_text);
    }

    report
        .finish()
        .eprint((filename, Source::from(source)))
        .ok();
}

/// The user-visible message and optional help note for an error.
fn describe(error: &FrondError) -> (String, Option<String>) {
    match error {
        FrondError::Lex(e) => match e {
            LexError::UnexpectedCharacter { ch, .. } => {
                (format!("Unexpected character: '{}'", ch), None)
            }
            LexError::UnterminatedString { .. } => ("Unterminated string literal".to_string(), None),
            LexError::InvalidNumber { .. } => ("Invalid number literal".to_string(), None),
            LexError::InvalidEscapeSequence { .. } => {
                ("Invalid escape sequence".to_string(), None)
            }
        },

        FrondError::Parse(e) => match e {
            ParseError::UnexpectedToken {
                found, expected, ..
            } => (
                format!("Unexpected token: found '{}', expected {}", found, expected),
                None,
            ),
            ParseError::UnexpectedEof { .. } => ("Unexpected end of input".to_string(), None),
            ParseError::DuplicateKey { name, .. } => {
                (format!("Duplicate key: '{}'", name), None)
            }
            ParseError::TagPayloadArity { name, .. } => (
                format!("Tag '{}' takes at most one payload", name),
                Some("Wrap multiple values in a record or a list".to_string()),
            ),
            ParseError::CaseNotATag { .. } => (
                "Match case must start with a tag pattern".to_string(),
                Some("Use an else branch to catch everything else".to_string()),
            ),
        },

        FrondError::Type(e) => match e {
            TypeError::UnboundVariable { name, .. } => {
                (format!("Unbound variable: '{}'", name), None)
            }
            TypeError::InfiniteType { var, ty, .. } => (
                format!("Infinite type: {} occurs in {}", var, ty),
                Some("This binding would create a type that contains itself".to_string()),
            ),
            TypeError::KindMismatch { left, right, .. } => {
                (format!("Cannot unify {} with {}", left, right), None)
            }
            TypeError::ConstructorMismatch { left, right, .. } => {
                (format!("Cannot unify {} with {}", left, right), None)
            }
            TypeError::ArityMismatch { left, right, .. } => (
                format!("Cannot unify {} with {}", left, right),
                Some("The two function types take different numbers of arguments".to_string()),
            ),
            TypeError::RowKindMismatch { left, right, .. } => (
                format!("Cannot unify the record/variant {} with {}", left, right),
                None,
            ),
            TypeError::RowMismatch { keys, side, .. } => (
                format!("The {} side is missing: {}", side, keys.join(", ")),
                None,
            ),
        },

        FrondError::Eval(e) => match e {
            EvalError::UnboundName { name, .. } => (format!("Unbound name: '{}'", name), None),
            EvalError::NotAFunction { .. } => ("Value is not a function".to_string(), None),
            EvalError::WrongArgumentCount {
                expected, found, ..
            } => (
                format!("Function expected {} arguments, got {}", expected, found),
                None,
            ),
            EvalError::MissingField { name, .. } => {
                (format!("No field '{}' on value", name), None)
            }
            EvalError::UnhandledCase { .. } => ("No case matched the scrutinee".to_string(), None),
            EvalError::BadBuiltinArgument { name, .. } => (
                format!("Builtin '{}' applied to an unsupported value", name),
                None,
            ),
        },
    }
}
