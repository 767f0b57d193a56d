//! Event types for the OFX pull parser.

use crate::Span;

/// Events emitted by the parser.
///
/// A document is framed by `DocumentStart`/`DocumentEnd`; everything in
/// between describes containers and leaves in document order. Leaf values
/// are raw text — typed coercion is a consumer concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'src> {
    /// Start of the document (the root `<OFX>` opening tag).
    ///
    /// Never emitted when the input contains no root tag; an input without
    /// `<OFX>` produces no events at all.
    DocumentStart {
        /// Span of the root opening tag.
        span: Span,
    },
    /// End of the document (the root's own closing tag).
    ///
    /// Input past this point is ignored.
    DocumentEnd {
        /// Span of the root closing tag.
        span: Span,
    },

    /// Start of a container entry: an opening tag followed by no value text.
    ContainerStart {
        /// Tag name, case-preserving.
        tag: &'src str,
        /// Span of the opening tag.
        span: Span,
    },
    /// End of a container entry: a closing tag matching the innermost open
    /// container. Mismatched closers emit nothing.
    ContainerEnd {
        /// Tag name of the closed container.
        tag: &'src str,
        /// Span of the closing tag.
        span: Span,
    },

    /// A leaf entry: an opening tag followed by value text.
    ///
    /// The parser does not descend into leaves; a leaf's "closing" tag is
    /// just another mismatched closer and is ignored.
    Leaf {
        /// Tag name, case-preserving.
        tag: &'src str,
        /// Value text, trimmed of surrounding whitespace.
        value: &'src str,
        /// Span of the opening tag.
        span: Span,
    },

    /// Parse error. The parser stops after emitting this.
    Error {
        /// Kind of error.
        kind: ParseErrorKind,
        /// Span where the error occurred.
        span: Span,
    },
}

/// Parse error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended while container tags were still open. Carries the
    /// innermost unclosed tag; its opening location is the event span.
    UnclosedTag {
        /// Name of the innermost unclosed tag.
        tag: String,
    },
}
