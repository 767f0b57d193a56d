#![doc = include_str!("../README.md")]

mod span;
pub use span::Span;

mod event;
pub use event::{Event, ParseErrorKind};

mod parser;
pub use parser::{Parser, ROOT_TAG, normalize};
