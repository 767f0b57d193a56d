//! Pull-based scanner for OFX markup.

use std::borrow::Cow;

use tracing::trace;

use crate::{Event, ParseErrorKind, Span};

/// Tag name of the synthetic document root.
pub const ROOT_TAG: &str = "OFX";

const ROOT_OPEN: &str = "<OFX>";

/// Strip all line breaks from a document.
///
/// OFX is whitespace-insensitive between tags; stripping `\r` and `\n` up
/// front means tag names and leaf values never span lines. [`Parser`]
/// expects input normalized this way — borrow is returned when the input
/// contains no line breaks.
pub fn normalize(source: &str) -> Cow<'_, str> {
    if source.contains(['\r', '\n']) {
        Cow::Owned(
            source
                .chars()
                .filter(|&c| c != '\r' && c != '\n')
                .collect(),
        )
    } else {
        Cow::Borrowed(source)
    }
}

/// Pull-based event parser for OFX documents.
///
/// Scans forward through the input once, maintaining a pending-closure
/// stack of open container tags. Matching semantics are deliberately
/// lenient: a closing tag that does not match the innermost open container
/// is ignored outright, as are self-closing tags. The only structural
/// error is running out of input with containers still open.
pub struct Parser<'src> {
    input: &'src str,
    pos: usize,
    /// Pending-closure stack; innermost open container last. Non-empty for
    /// the whole of `State::InDocument`.
    stack: Vec<OpenTag<'src>>,
    state: State,
}

struct OpenTag<'src> {
    tag: &'src str,
    span: Span,
}

#[derive(Clone, Copy)]
enum State {
    /// Root opening tag not located yet.
    BeforeDocument,
    /// Scanning tags inside the root.
    InDocument,
    /// Document closed, errored, or root never found.
    Done,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    ///
    /// The source should already be line-break free; see [`normalize`].
    pub fn new(source: &'src str) -> Self {
        Self {
            input: source,
            pos: 0,
            stack: Vec::new(),
            state: State::BeforeDocument,
        }
    }

    /// Get the next event from the parser.
    pub fn next_event(&mut self) -> Option<Event<'src>> {
        match self.state {
            State::BeforeDocument => self.find_root(),
            State::InDocument => self.scan(),
            State::Done => None,
        }
    }

    /// Parse all events into a vector.
    pub fn parse_to_vec(mut self) -> Vec<Event<'src>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event() {
            events.push(event);
        }
        events
    }

    /// Locate the literal root opening tag.
    ///
    /// Absence of the root tag is a defined "not found" outcome, not an
    /// error: the parser emits nothing at all.
    fn find_root(&mut self) -> Option<Event<'src>> {
        match self.input.find(ROOT_OPEN) {
            Some(start) => {
                let span = Span::new(start as u32, (start + ROOT_OPEN.len()) as u32);
                self.pos = start + ROOT_OPEN.len();
                self.stack.push(OpenTag {
                    tag: ROOT_TAG,
                    span,
                });
                self.state = State::InDocument;
                Some(Event::DocumentStart { span })
            }
            None => {
                trace!("no root <OFX> tag in input");
                self.state = State::Done;
                None
            }
        }
    }

    fn scan(&mut self) -> Option<Event<'src>> {
        let input = self.input;
        loop {
            let Some(lt) = self.find_from(self.pos, '<') else {
                return self.unclosed();
            };
            let Some(gt) = self.find_from(lt + 1, '>') else {
                return self.unclosed();
            };
            let text = &input[lt + 1..gt];
            let tag_span = Span::new(lt as u32, (gt + 1) as u32);
            self.pos = gt + 1;

            if let Some(tag) = text.strip_prefix('/') {
                // Closing tag: only honored when it matches the innermost
                // open container. Anything else is a no-op.
                if self.stack.last().is_some_and(|top| top.tag == tag) {
                    self.stack.pop();
                    if self.stack.is_empty() {
                        // The root's own close; trailing input is ignored.
                        self.state = State::Done;
                        return Some(Event::DocumentEnd { span: tag_span });
                    }
                    return Some(Event::ContainerEnd {
                        tag,
                        span: tag_span,
                    });
                }
                trace!(tag, "ignoring mismatched closing tag");
            } else if text.ends_with('/') {
                trace!(tag = text, "ignoring self-closing tag");
            } else {
                // Opening tag: everything up to the next '<' is candidate
                // value text. Non-empty after trimming means a leaf (no
                // descent); empty means a container.
                let Some(next_lt) = self.find_from(self.pos, '<') else {
                    return self.unclosed();
                };
                let value = input[self.pos..next_lt].trim();
                self.pos = next_lt;

                if value.is_empty() {
                    self.stack.push(OpenTag {
                        tag: text,
                        span: tag_span,
                    });
                    return Some(Event::ContainerStart {
                        tag: text,
                        span: tag_span,
                    });
                }
                return Some(Event::Leaf {
                    tag: text,
                    value,
                    span: tag_span,
                });
            }
        }
    }

    /// Input exhausted with containers still open.
    fn unclosed(&mut self) -> Option<Event<'src>> {
        self.state = State::Done;
        // Stack is non-empty in-document; report the innermost open tag.
        let open = self.stack.pop()?;
        Some(Event::Error {
            kind: ParseErrorKind::UnclosedTag {
                tag: open.tag.to_string(),
            },
            span: open.span,
        })
    }

    fn find_from(&self, from: usize, needle: char) -> Option<usize> {
        self.input[from..].find(needle).map(|i| from + i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(source: &str) -> Vec<Event<'_>> {
        Parser::new(source).parse_to_vec()
    }

    #[test]
    fn test_simple_document() {
        let evts = events("<OFX><STATUS><CODE>0</CODE></STATUS></OFX>");
        assert_eq!(
            evts,
            vec![
                Event::DocumentStart {
                    span: Span::new(0, 5)
                },
                Event::ContainerStart {
                    tag: "STATUS",
                    span: Span::new(5, 13)
                },
                Event::Leaf {
                    tag: "CODE",
                    value: "0",
                    span: Span::new(13, 19)
                },
                Event::ContainerEnd {
                    tag: "STATUS",
                    span: Span::new(27, 36)
                },
                Event::DocumentEnd {
                    span: Span::new(36, 42)
                },
            ]
        );
    }

    #[test]
    fn test_no_root_tag_emits_nothing() {
        assert!(events("<SONRS><CODE>0</CODE></SONRS>").is_empty());
        assert!(events("").is_empty());
    }

    #[test]
    fn test_text_before_root_is_ignored() {
        let evts = events("OFXHEADER:100 junk <OFX></OFX>");
        assert!(matches!(evts[0], Event::DocumentStart { .. }));
        assert!(matches!(evts[1], Event::DocumentEnd { .. }));
    }

    #[test]
    fn test_leaf_value_is_trimmed() {
        let evts = events("<OFX><NAME>  John Doe  </NAME></OFX>");
        assert!(evts.contains(&Event::Leaf {
            tag: "NAME",
            value: "John Doe",
            span: Span::new(5, 11)
        }));
    }

    #[test]
    fn test_leaf_closing_tag_is_ignored() {
        // `</NAME>` does not match the open `OFX` container, so it is
        // skipped; only the leaf and the root close come through.
        let evts = events("<OFX><NAME>x</NAME></OFX>");
        assert_eq!(evts.len(), 3);
        assert!(matches!(evts[1], Event::Leaf { tag: "NAME", .. }));
        assert!(matches!(evts[2], Event::DocumentEnd { .. }));
    }

    #[test]
    fn test_mismatched_closer_is_a_noop() {
        // `</SONRS>` closes nothing; STATUS stays open and closes later.
        let evts = events("<OFX><STATUS></SONRS><CODE>0</CODE></STATUS></OFX>");
        assert!(!evts.iter().any(|e| matches!(e, Event::Error { .. })));
        assert!(
            evts.contains(&Event::ContainerEnd {
                tag: "STATUS",
                span: Span::new(35, 44)
            })
        );
    }

    #[test]
    fn test_self_closing_tag_is_ignored() {
        let evts = events("<OFX><EMPTY/><CODE>0</CODE></OFX>");
        assert_eq!(evts.len(), 3);
        assert!(matches!(evts[1], Event::Leaf { tag: "CODE", .. }));
    }

    #[test]
    fn test_unclosed_container_is_an_error() {
        let evts = events("<OFX><SONRS><CODE>0</CODE>");
        let last = evts.last().unwrap();
        match last {
            Event::Error {
                kind: ParseErrorKind::UnclosedTag { tag },
                span,
            } => {
                assert_eq!(tag, "SONRS");
                assert_eq!(*span, Span::new(5, 12));
            }
            other => panic!("expected unclosed-tag error, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_root_is_an_error() {
        let evts = events("<OFX><A></A>");
        assert!(matches!(
            evts.last(),
            Some(Event::Error {
                kind: ParseErrorKind::UnclosedTag { tag },
                ..
            }) if tag == "OFX"
        ));
    }

    #[test]
    fn test_leaf_at_end_of_input_is_unclosed() {
        // No '<' follows the value, so the tag contributes nothing and the
        // root is left open.
        let evts = events("<OFX><NAME>John");
        assert!(matches!(
            evts.last(),
            Some(Event::Error {
                kind: ParseErrorKind::UnclosedTag { tag },
                ..
            }) if tag == "OFX"
        ));
    }

    #[test]
    fn test_trailing_input_after_root_close_is_ignored() {
        let evts = events("<OFX><A>1</A></OFX><B>2</B>");
        assert!(matches!(evts.last(), Some(Event::DocumentEnd { .. })));
        assert_eq!(evts.len(), 3);
    }

    #[test]
    fn test_repeated_sibling_tags_stay_distinct() {
        let evts = events("<OFX><TRNAMT>1.00</TRNAMT><TRNAMT>2.00</TRNAMT></OFX>");
        let leaves: Vec<_> = evts
            .iter()
            .filter(|e| matches!(e, Event::Leaf { tag: "TRNAMT", .. }))
            .collect();
        assert_eq!(leaves.len(), 2);
    }

    #[test]
    fn test_normalize_strips_line_breaks() {
        assert_eq!(normalize("<OFX>\r\n<A>1</A>\n</OFX>"), "<OFX><A>1</A></OFX>");
        assert!(matches!(normalize("<OFX></OFX>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_stray_text_between_tags_is_skipped() {
        // Text after a closing tag is not attached to anything.
        let evts = events("<OFX><A>1</A>stray<B></B></OFX>");
        assert!(evts.contains(&Event::ContainerStart {
            tag: "B",
            span: Span::new(18, 21)
        }));
    }
}
