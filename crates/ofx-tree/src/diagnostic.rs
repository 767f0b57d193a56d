//! Parse errors and diagnostic rendering.

use ariadne::{Color, Label, Report, ReportKind, Source};
use ofx_parse::{ParseErrorKind, Span};

use crate::CoerceError;

/// Error from parsing an OFX document into a tree.
///
/// Spans refer to the normalized (line-break stripped) source text; render
/// reports against that text, not the raw input. See
/// [`normalize`](ofx_parse::normalize).
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Structural error reported by the scanner.
    Syntax {
        /// The kind of error.
        kind: ParseErrorKind,
        /// Source location.
        span: Span,
    },
    /// A leaf value rejected by its bound coercer.
    Coerce {
        /// Tag of the offending leaf.
        tag: String,
        /// Location of the leaf's opening tag.
        span: Span,
        /// The underlying coercion failure.
        source: CoerceError,
    },
    /// The event stream ended in an inconsistent state.
    UnexpectedEvent(String),
}

impl ParseError {
    pub(crate) fn unexpected(msg: &str) -> Self {
        ParseError::UnexpectedEvent(msg.to_string())
    }

    /// Source location of this error, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Syntax { span, .. } | ParseError::Coerce { span, .. } => Some(*span),
            ParseError::UnexpectedEvent(_) => None,
        }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source
    /// context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, mut writer: W) {
        match self.build_report(filename) {
            Some(report) => {
                let _ = report
                    .finish()
                    .write((filename, Source::from(source)), writer);
            }
            None => {
                let _ = writeln!(writer, "error: {}", self);
            }
        }
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> Option<ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)>> {
        let span = self.span()?;
        let range = span.start as usize..span.end as usize;

        let report = match self {
            ParseError::Syntax {
                kind: ParseErrorKind::UnclosedTag { tag },
                ..
            } => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("unclosed tag <{}>", tag))
                .with_label(
                    Label::new((filename, range))
                        .with_message("opened here and never closed")
                        .with_color(Color::Red),
                )
                .with_help(format!("add a closing </{}>", tag)),

            ParseError::Coerce { tag, source, .. } => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(format!("invalid value for <{}>", tag))
                    .with_label(
                        Label::new((filename, range))
                            .with_message(source.to_string())
                            .with_color(Color::Red),
                    )
                    .with_help(
                        "OFX dates use the fixed-width YYYYMMDDhhmmss layout, \
                         optionally followed by a bracketed offset like [-03:EST]",
                    )
            }

            ParseError::UnexpectedEvent(_) => return None,
        };
        Some(report)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Syntax {
                kind: ParseErrorKind::UnclosedTag { tag },
                span,
            } => {
                write!(f, "unclosed tag <{}> at offset {}", tag, span.start)
            }
            ParseError::Coerce { tag, span, source } => {
                write!(
                    f,
                    "invalid value for <{}> at offset {}: {}",
                    tag, span.start, source
                )
            }
            ParseError::UnexpectedEvent(msg) => write!(f, "unexpected event: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Coerce { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_stripped(error: &ParseError, source: &str) -> String {
        let rendered = error.render("test.ofx", source);
        String::from_utf8(strip_ansi_escapes::strip(&rendered)).unwrap()
    }

    #[test]
    fn test_unclosed_tag_diagnostic() {
        let source = "<OFX><SONRS><CODE>0</CODE>";
        let error = crate::parse(source).unwrap_err();

        let report = render_stripped(&error, source);
        assert!(report.contains("unclosed tag <SONRS>"), "{report}");
        assert!(report.contains("add a closing </SONRS>"), "{report}");
    }

    #[test]
    fn test_invalid_date_diagnostic() {
        let source = "<OFX><DTSTART>yesterday</DTSTART></OFX>";
        let error = crate::parse(source).unwrap_err();

        let report = render_stripped(&error, source);
        assert!(report.contains("invalid value for <DTSTART>"), "{report}");
        assert!(report.contains("YYYYMMDDhhmmss"), "{report}");
    }

    #[test]
    fn test_display_includes_offset() {
        let source = "<OFX><SONRS>";
        let error = crate::parse(source).unwrap_err();
        assert_eq!(error.to_string(), "unclosed tag <SONRS> at offset 5");
    }
}
