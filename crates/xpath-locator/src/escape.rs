//! Value escaping for double-quoted XPath literals

/// Entity substituted for every literal double quote.
pub const QUOTE_ENTITY: &str = "&quot;";

/// Escape a value before it is embedded in a `"..."` XPath literal.
///
/// Every `"` becomes the literal text `&quot;`. Plain XPath 1.0 engines do not
/// decode entities, so hosts that evaluate these expressions decode `&quot;`
/// in string literals themselves.
pub fn escape_xpath_value(value: &str) -> String {
    value.replace('"', QUOTE_ENTITY)
}

/// Build a `"..."` literal from an unescaped value.
pub fn quoted(value: &str) -> String {
    format!("\"{}\"", escape_xpath_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_replaces_every_quote() {
        assert_eq!(escape_xpath_value(r#"Say "hi""#), "Say &quot;hi&quot;");
        assert_eq!(escape_xpath_value(r#""""#), "&quot;&quot;");
    }

    #[test]
    fn test_escape_leaves_other_text_alone() {
        assert_eq!(escape_xpath_value("submit-btn"), "submit-btn");
        assert_eq!(escape_xpath_value("it's"), "it's");
        assert_eq!(escape_xpath_value(""), "");
    }

    #[test]
    fn test_quoted_wraps_escaped_value() {
        assert_eq!(quoted(r#"a"b"#), "\"a&quot;b\"");
    }
}
