//! Error types for directive extraction

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Which kind of delimited directive block was left open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Section,
    Push,
}

impl BlockKind {
    /// The opening directive keyword
    pub fn open(&self) -> &'static str {
        match self {
            BlockKind::Section => "@section",
            BlockKind::Push => "@push",
        }
    }

    /// The end marker that was expected
    pub fn close(&self) -> &'static str {
        match self {
            BlockKind::Section => "@endsection",
            BlockKind::Push => "@endpush",
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unterminated {} block '{name}': missing {}", .kind.open(), .kind.close())]
    UnterminatedBlock {
        kind: BlockKind,
        name: String,
        /// Span of the opening directive
        span: Span,
    },
}

impl ParseError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::UnterminatedBlock { kind, name, span } => {
                Report::build(ReportKind::Error, filename, span.start)
                    .with_message(format!("unterminated {} block '{}'", kind.open(), name))
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!(
                                "this block is never closed with {}",
                                kind.close()
                            ))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf)
                    .unwrap();
            }
        }
        String::from_utf8(buf).unwrap()
    }
}
