//! Helpers shared between backends.

use std::borrow::Cow;

use refit_ast::Attr;

use crate::backend::BackendError;

/// Escape HTML special characters in text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Copy of `attr` without the extra named `key`.
pub(crate) fn without_extra(attr: &Attr, key: &str) -> Attr {
    Attr {
        identifier: attr.identifier.clone(),
        classes: attr.classes.clone(),
        extras: attr
            .extras
            .iter()
            .filter(|(k, _)| k != key)
            .cloned()
            .collect(),
    }
}

/// Reject header levels outside 1-6.
pub(crate) fn check_header_level(format: &str, level: u8) -> Result<(), BackendError> {
    if (1..=6).contains(&level) {
        Ok(())
    } else {
        Err(BackendError::unsupported(
            format,
            format!("header level {level} is outside 1-6"),
        ))
    }
}

/// Prefix every line of `text` with `first` on the first line and `rest` after.
///
/// Blank lines stay blank apart from trailing whitespace being trimmed.
pub(crate) fn indent(text: &str, first: &str, rest: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let prefix = if i == 0 { first } else { rest };
        if line.is_empty() {
            out.push_str(prefix.trim_end());
        } else {
            out.push_str(prefix);
            out.push_str(line);
        }
    }
    out
}

/// Lowercase roman numeral for `n` (1-3999).
pub(crate) fn roman(mut n: u64) -> String {
    const TABLE: [(u64, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

/// Lowercase alphabetic label for `n` (1 = a, 27 = aa).
pub(crate) fn alpha(mut n: u64) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        #[allow(clippy::cast_possible_truncation)]
        out.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    out.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\n\nb", "- ", "  "), "- a\n\n  b");
        assert_eq!(indent("x\ny", "> ", "> "), "> x\n> y");
    }

    #[test]
    fn test_roman() {
        assert_eq!(roman(4), "iv");
        assert_eq!(roman(1994), "mcmxciv");
    }

    #[test]
    fn test_alpha() {
        assert_eq!(alpha(1), "a");
        assert_eq!(alpha(26), "z");
        assert_eq!(alpha(27), "aa");
    }

    #[test]
    fn test_check_header_level() {
        assert!(check_header_level("html", 6).is_ok());
        assert!(check_header_level("html", 0).is_err());
        assert!(check_header_level("html", 7).is_err());
    }
}
