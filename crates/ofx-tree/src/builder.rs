//! Tree builder from parse events.

use ofx_parse::{Event, ROOT_TAG};

use crate::diagnostic::ParseError;
use crate::{CoercerRegistry, Entry};

/// Builder that constructs an [`Entry`] tree from parse events.
///
/// The stack of open containers doubles as the parent chain: descending
/// into a container pushes a frame, a matched close pops it back into its
/// parent's children. The finished tree is a plain ownership tree.
pub struct TreeBuilder<'reg> {
    registry: &'reg CoercerRegistry,
    /// Open containers, root first.
    stack: Vec<Entry>,
    root: Option<Entry>,
    started: bool,
}

impl<'reg> TreeBuilder<'reg> {
    /// Create a builder coercing leaf values through the given registry.
    pub fn new(registry: &'reg CoercerRegistry) -> Self {
        Self {
            registry,
            stack: Vec::new(),
            root: None,
            started: false,
        }
    }

    /// Feed one event into the builder.
    pub fn event(&mut self, event: Event<'_>) -> Result<(), ParseError> {
        match event {
            Event::DocumentStart { span } => {
                self.started = true;
                self.stack.push(Entry::container_at(ROOT_TAG, span));
            }

            Event::ContainerStart { tag, span } => {
                self.stack.push(Entry::container_at(tag, span));
            }

            Event::Leaf { tag, value, span } => {
                let scalar =
                    self.registry
                        .coerce(tag, value)
                        .map_err(|source| ParseError::Coerce {
                            tag: tag.to_string(),
                            span,
                            source,
                        })?;
                let parent = self.open_frame("leaf outside document")?;
                parent.children.push(Entry::leaf_at(tag, scalar, span));
            }

            Event::ContainerEnd { tag, .. } => {
                let entry = self
                    .stack
                    .pop()
                    .ok_or_else(|| ParseError::unexpected("close without open container"))?;
                debug_assert_eq!(entry.tag, tag);
                let parent = self.open_frame("container closed above the root")?;
                parent.children.push(entry);
            }

            Event::DocumentEnd { .. } => {
                let root = self
                    .stack
                    .pop()
                    .ok_or_else(|| ParseError::unexpected("document end without root"))?;
                if !self.stack.is_empty() {
                    return Err(ParseError::unexpected("document end with open containers"));
                }
                self.root = Some(root);
            }

            Event::Error { kind, span } => {
                return Err(ParseError::Syntax { kind, span });
            }
        }
        Ok(())
    }

    /// Finish building.
    ///
    /// `Ok(None)` when no document was started (no root tag in the input).
    pub fn finish(self) -> Result<Option<Entry>, ParseError> {
        if let Some(root) = self.root {
            Ok(Some(root))
        } else if !self.started {
            Ok(None)
        } else {
            // The scanner ends every started document with DocumentEnd or
            // an Error event, so this is unreachable through `parse`.
            Err(ParseError::unexpected("document never finished"))
        }
    }

    fn open_frame(&mut self, context: &str) -> Result<&mut Entry, ParseError> {
        self.stack
            .last_mut()
            .ok_or_else(|| ParseError::unexpected(context))
    }
}
