#![doc = include_str!("../README.md")]

mod builder;
mod coerce;
mod diagnostic;
mod value;

pub use builder::TreeBuilder;
pub use coerce::{
    AmountCoercer, CoerceError, CoercerRegistry, DateCoercer, RegistryError, StringCoercer,
    ValueCoercer,
};
pub use diagnostic::ParseError;
pub use ofx_parse::{Event, ParseErrorKind, ROOT_TAG, Span, normalize};
pub use value::{Entry, Scalar};

/// Parse an OFX document into a tree, using the default coercer bindings.
///
/// Returns `Ok(None)` when the input contains no `<OFX>` root tag — a
/// defined "not found" outcome, not an error. A parse never yields a
/// partial tree: it is the complete document or an error.
pub fn parse(source: &str) -> Result<Option<Entry>, ParseError> {
    parse_with(source, &CoercerRegistry::with_defaults())
}

/// Parse an OFX document with a caller-supplied coercer registry.
pub fn parse_with(
    source: &str,
    registry: &CoercerRegistry,
) -> Result<Option<Entry>, ParseError> {
    let source = normalize(source);
    let mut parser = ofx_parse::Parser::new(&source);
    let mut builder = TreeBuilder::new(registry);
    while let Some(event) = parser.next_event() {
        builder.event(event)?;
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_parse_well_formed_document() {
        let root = parse("<OFX><SIGNONMSGSRSV1><SONRS><STATUS><CODE>0</CODE></STATUS></SONRS></SIGNONMSGSRSV1></OFX>")
            .unwrap()
            .unwrap();
        assert_eq!(root.tag, "OFX");
        assert!(root.is_container());

        let code = root
            .get("SIGNONMSGSRSV1")
            .and_then(|e| e.get("SONRS"))
            .and_then(|e| e.get("STATUS"))
            .and_then(|e| e.get("CODE"))
            .unwrap();
        assert_eq!(code.as_text(), Some("0"));
    }

    #[test]
    fn test_missing_root_is_not_an_error() {
        let result = parse("<SIGNONMSGSRSV1><SONRS></SONRS></SIGNONMSGSRSV1>").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unclosed_tag_fails_structurally() {
        // Missing </STATUS> and </OFX>.
        let err = parse("<OFX><SIGNONMSGSRSV1><SONRS><STATUS><CODE>0</CODE></SONRS></SIGNONMSGSRSV1>")
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::Syntax {
                kind: ParseErrorKind::UnclosedTag { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_line_breaks_are_insignificant() {
        let root = parse("<OFX>\r\n  <STATUS>\n    <CODE>0</CODE>\n  </STATUS>\r\n</OFX>")
            .unwrap()
            .unwrap();
        let code = root.get("STATUS").and_then(|s| s.get("CODE")).unwrap();
        assert_eq!(code.as_text(), Some("0"));
    }

    #[test]
    fn test_default_registry_types_leaves() {
        let root = parse("<OFX><DTSTART>20240408100000[-03:EST]</DTSTART><TRNAMT>100.50</TRNAMT></OFX>")
            .unwrap()
            .unwrap();
        assert_eq!(
            root.get("DTSTART").and_then(|e| e.as_date()),
            Some(NaiveDate::from_ymd_opt(2024, 4, 8).unwrap())
        );
        assert_eq!(
            root.get("TRNAMT").and_then(|e| e.as_amount()),
            Some(Decimal::new(10050, 2))
        );
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = CoercerRegistry::new();
        registry.register("POSTED", DateCoercer).unwrap();

        let root = parse_with("<OFX><POSTED>20200229120000</POSTED></OFX>", &registry)
            .unwrap()
            .unwrap();
        assert_eq!(
            root.get("POSTED").and_then(|e| e.as_date()),
            Some(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap())
        );

        // Without a binding the same value is just text.
        let root = parse_with("<OFX><POSTED>20200229120000</POSTED></OFX>", &CoercerRegistry::new())
            .unwrap()
            .unwrap();
        assert_eq!(
            root.get("POSTED").and_then(|e| e.as_text()),
            Some("20200229120000")
        );
    }

    #[test]
    fn test_repeated_siblings_are_kept_distinct() {
        let root = parse("<OFX><STMTTRN><TRNAMT>1.00</TRNAMT></STMTTRN><STMTTRN><TRNAMT>2.00</TRNAMT></STMTTRN></OFX>")
            .unwrap()
            .unwrap();
        let amounts: Vec<_> = root
            .get_all("STMTTRN")
            .filter_map(|t| t.get("TRNAMT").and_then(|a| a.as_amount()))
            .collect();
        assert_eq!(amounts, [Decimal::new(100, 2), Decimal::new(200, 2)]);
    }
}
