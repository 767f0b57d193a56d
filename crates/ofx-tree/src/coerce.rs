//! Per-tag typed value coercion.
//!
//! OFX leaf values are plain text; which type a value has is determined by
//! the tag that carries it. The [`CoercerRegistry`] maps tag names to
//! [`ValueCoercer`] strategies; unbound tags fall back to the identity
//! string coercer, so lookup never fails.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::Scalar;

/// Tags bound to [`DateCoercer`] by default.
const DATE_TAGS: [&str; 5] = ["DTSTART", "DTEND", "DTPOSTED", "DTSERVER", "DTASOF"];

/// Tags bound to [`AmountCoercer`] by default.
const AMOUNT_TAGS: [&str; 2] = ["TRNAMT", "BALAMT"];

/// Fixed width of the OFX timestamp, `YYYYMMDDhhmmss`.
const TIMESTAMP_LEN: usize = 14;

/// A strategy converting a tag's raw text into a typed value.
pub trait ValueCoercer {
    /// Coerce raw leaf text into a [`Scalar`].
    fn coerce(&self, raw: &str) -> Result<Scalar, CoerceError>;
}

/// Error from a coercer rejecting its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// Date text whose timestamp portion is not `YYYYMMDDhhmmss`.
    InvalidDate {
        /// The offending raw text.
        input: String,
    },
}

impl std::fmt::Display for CoerceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoerceError::InvalidDate { input } => {
                write!(f, "invalid OFX date '{}': expected YYYYMMDDhhmmss", input)
            }
        }
    }
}

impl std::error::Error for CoerceError {}

/// Error registering a coercer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The tag name was empty.
    EmptyTagName,
    /// A coercer is already bound to this tag name.
    AlreadyRegistered(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::EmptyTagName => write!(f, "coercer tag name cannot be empty"),
            RegistryError::AlreadyRegistered(tag) => {
                write!(f, "a coercer for tag '{}' is already registered", tag)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Coercer for OFX date values.
///
/// Input is a fixed-width `YYYYMMDDhhmmss` timestamp, optionally followed
/// by a bracketed offset suffix such as `[-03:EST]`. The suffix is
/// truncated off and never interpreted; the time of day is discarded, so
/// the result is always the calendar date at midnight in a naive calendar.
pub struct DateCoercer;

impl ValueCoercer for DateCoercer {
    fn coerce(&self, raw: &str) -> Result<Scalar, CoerceError> {
        let stamp = match raw.find('[') {
            Some(idx) => &raw[..idx],
            None => raw,
        };

        if stamp.len() != TIMESTAMP_LEN || !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoerceError::InvalidDate {
                input: raw.to_string(),
            });
        }

        let datetime =
            NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").map_err(|_| {
                CoerceError::InvalidDate {
                    input: raw.to_string(),
                }
            })?;
        Ok(Scalar::Date(datetime.date()))
    }
}

/// Coercer for OFX amount values.
///
/// Parses a locale-invariant decimal (`.` as the decimal separator).
/// Unparseable text is an explicit "no value" ([`Scalar::Empty`]), not an
/// error.
pub struct AmountCoercer;

impl ValueCoercer for AmountCoercer {
    fn coerce(&self, raw: &str) -> Result<Scalar, CoerceError> {
        Ok(Decimal::from_str(raw)
            .map(Scalar::Amount)
            .unwrap_or(Scalar::Empty))
    }
}

/// Identity coercer: returns the raw text unchanged.
pub struct StringCoercer;

impl ValueCoercer for StringCoercer {
    fn coerce(&self, raw: &str) -> Result<Scalar, CoerceError> {
        Ok(Scalar::Text(raw.to_string()))
    }
}

/// Registry mapping tag names to value coercers.
pub struct CoercerRegistry {
    coercers: HashMap<String, Box<dyn ValueCoercer>>,
}

impl CoercerRegistry {
    /// Create an empty registry. Every tag falls back to [`StringCoercer`].
    pub fn new() -> Self {
        Self {
            coercers: HashMap::new(),
        }
    }

    /// Create a registry with the standard OFX bindings: the `DT*` date
    /// tags and the `TRNAMT`/`BALAMT` amount tags.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for tag in DATE_TAGS {
            registry.coercers.insert(tag.to_string(), Box::new(DateCoercer));
        }
        for tag in AMOUNT_TAGS {
            registry
                .coercers
                .insert(tag.to_string(), Box::new(AmountCoercer));
        }
        registry
    }

    /// Bind a coercer to a tag name.
    ///
    /// Fails if the tag name is empty or already bound; existing bindings
    /// are never silently overwritten.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        coercer: impl ValueCoercer + 'static,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(RegistryError::EmptyTagName);
        }
        if self.coercers.contains_key(&tag) {
            return Err(RegistryError::AlreadyRegistered(tag));
        }
        self.coercers.insert(tag, Box::new(coercer));
        Ok(())
    }

    /// Coerce a tag's raw text into a typed value.
    ///
    /// Tags without a binding go through [`StringCoercer`]; only bound
    /// coercers can reject input.
    pub fn coerce(&self, tag: &str, raw: &str) -> Result<Scalar, CoerceError> {
        match self.coercers.get(tag) {
            Some(coercer) => coercer.coerce(raw),
            None => StringCoercer.coerce(raw),
        }
    }
}

impl Default for CoercerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
