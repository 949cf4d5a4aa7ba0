use std::mem;

use crate::error::{Error, Result};

/// A single element of a parsed LIKE pattern.
///
/// A pattern is an ordered sequence of these elements. After
/// optimization, no two `Any` elements are adjacent and every literal
/// is nonempty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Pattern {
    /// A run of characters matched exactly, byte for byte.
    Literal(String),
    /// A wildcard run matching at least `min` codepoints, and any
    /// number more when `unbounded` is set.
    Any { min: u32, unbounded: bool },
}

/// Parse LIKE pattern text into a sequence of literal and wildcard
/// elements.
///
/// When an escape character is configured, it must be followed by `%`,
/// `_` or the escape character itself, which is then taken literally.
/// The escape test fires before the wildcard test, so an escape
/// character of `%` or `_` disables that wildcard.
pub(crate) fn parse(
    pattern: &str,
    escape: Option<char>,
) -> Result<Vec<Pattern>> {
    let mut parsed = vec![];
    let mut literal = String::new();
    let mut in_escape = false;
    for c in pattern.chars() {
        if in_escape {
            if c != '%' && c != '_' && Some(c) != escape {
                return Err(Error::invalid_escape());
            }
            literal.push(c);
            in_escape = false;
        } else if escape == Some(c) {
            in_escape = true;
        } else if c == '%' || c == '_' {
            if !literal.is_empty() {
                parsed.push(Pattern::Literal(mem::take(&mut literal)));
            }
            if c == '%' {
                parsed.push(Pattern::Any { min: 0, unbounded: true });
            } else {
                parsed.push(Pattern::Any { min: 1, unbounded: false });
            }
        } else {
            literal.push(c);
        }
    }
    if in_escape {
        return Err(Error::invalid_escape());
    }
    if !literal.is_empty() {
        parsed.push(Pattern::Literal(literal));
    }
    Ok(parsed)
}

/// Collapse every maximal run of consecutive `Any` elements into a
/// single `Any` whose minimum is the sum of the minimums and whose
/// unbounded flag is the OR of the flags. Literals pass through
/// unchanged and order is preserved. Idempotent.
pub(crate) fn optimize(pattern: Vec<Pattern>) -> Vec<Pattern> {
    let mut optimized: Vec<Pattern> = Vec::with_capacity(pattern.len());
    for elem in pattern {
        match elem {
            Pattern::Any { min: m, unbounded: u } => {
                if let Some(Pattern::Any { min, unbounded }) =
                    optimized.last_mut()
                {
                    *min += m;
                    *unbounded = *unbounded || u;
                } else {
                    optimized.push(Pattern::Any { min: m, unbounded: u });
                }
            }
            elem => optimized.push(elem),
        }
    }
    optimized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Pattern {
        Pattern::Literal(s.to_string())
    }

    fn any(min: u32, unbounded: bool) -> Pattern {
        Pattern::Any { min, unbounded }
    }

    #[test]
    fn parse_basic() {
        assert_eq!(parse("abc", None).unwrap(), vec![lit("abc")]);
        assert_eq!(
            parse("a%b_c", None).unwrap(),
            vec![lit("a"), any(0, true), lit("b"), any(1, false), lit("c")],
        );
        assert_eq!(parse("", None).unwrap(), vec![]);
        assert_eq!(parse("%_", None).unwrap(), vec![any(0, true), any(1, false)]);
    }

    #[test]
    fn parse_escapes() {
        assert_eq!(parse(r"a\%b", Some('\\')).unwrap(), vec![lit("a%b")]);
        assert_eq!(parse(r"a\_b", Some('\\')).unwrap(), vec![lit("a_b")]);
        assert_eq!(parse(r"a\\b", Some('\\')).unwrap(), vec![lit(r"a\b")]);
        assert!(parse(r"a\xb", Some('\\')).is_err());
        assert!(parse(r"ab\", Some('\\')).is_err());
        // Without an escape configured, a backslash is an ordinary
        // literal character.
        assert_eq!(parse(r"a\b", None).unwrap(), vec![lit(r"a\b")]);
    }

    #[test]
    fn escape_equal_to_wildcard() {
        // The escape test fires before the wildcard test, so '%' as the
        // escape character makes "%%" a literal percent sign and a bare
        // "%" a dangling escape.
        assert_eq!(parse("%%", Some('%')).unwrap(), vec![lit("%")]);
        assert!(parse("%", Some('%')).is_err());
        assert_eq!(parse("%_", Some('%')).unwrap(), vec![lit("_")]);
    }

    #[test]
    fn optimize_collapses_any_runs() {
        assert_eq!(
            optimize(parse("a%%_%b", None).unwrap()),
            vec![lit("a"), any(1, true), lit("b")],
        );
        assert_eq!(optimize(parse("__", None).unwrap()), vec![any(2, false)]);
        assert_eq!(optimize(parse("%%%", None).unwrap()), vec![any(0, true)]);
        assert_eq!(optimize(vec![]), vec![]);
    }

    #[test]
    fn optimize_is_idempotent() {
        for pattern in ["", "%", "a%_%b", "%%%", "_a_", "ab%"] {
            let once = optimize(parse(pattern, None).unwrap());
            assert_eq!(optimize(once.clone()), once);
        }
    }
}
