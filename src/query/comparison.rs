//! Typed comparison predicates built from operator-prefixed literals.
//!
//! Field providers that expose numeric or temporal fields accept literals
//! like `5`, `>=5`, `!=3`, or `<2020-01-01`. [`comparison`] turns such a
//! literal plus a typed field accessor into a per-entity predicate. A
//! literal whose remainder fails the typed parse yields a predicate that is
//! always false, so a malformed comparison silently excludes all rows
//! instead of failing the query.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::query::provider::Predicate;

/// Fallible parse from query-literal text.
///
/// The trait is open: downstream crates implement it for their own value
/// types (monetary decimals, ordinals) to make them comparable in queries.
pub trait TryParse: Sized {
    /// Parse `text`, returning `None` on failure.
    fn try_parse(text: &str) -> Option<Self>;
}

macro_rules! impl_try_parse_via_from_str {
    ($($ty:ty),* $(,)?) => {$(
        impl TryParse for $ty {
            fn try_parse(text: &str) -> Option<Self> {
                text.parse().ok()
            }
        }
    )*};
}

impl_try_parse_via_from_str!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64);

impl TryParse for NaiveDate {
    fn try_parse(text: &str) -> Option<Self> {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    }
}

impl TryParse for NaiveDateTime {
    fn try_parse(text: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
            .ok()
    }
}

impl TryParse for DateTime<Utc> {
    fn try_parse(text: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

/// Relational operator parsed from the head of a comparison literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `=` (the default when no marker is present).
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl ComparisonOp {
    /// Evaluate `lhs OP rhs`.
    pub fn evaluate<T: PartialOrd>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Ne => lhs != rhs,
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
        }
    }
}

/// Split a literal into its relational marker and the remaining text.
///
/// Markers are only recognized when enough characters follow them to leave
/// a non-empty remainder: a bare `"<="` is read as `<` applied to `"="`,
/// and a bare `"!="` has no marker at all. Both then fail the typed parse
/// downstream, which is the intended fail-closed path.
fn split_operator(literal: &str) -> (ComparisonOp, &str) {
    let bytes = literal.as_bytes();
    if bytes.len() > 1 {
        match bytes[0] {
            b'<' => {
                if bytes.len() > 2 && bytes[1] == b'=' {
                    return (ComparisonOp::Le, &literal[2..]);
                }
                return (ComparisonOp::Lt, &literal[1..]);
            }
            b'>' => {
                if bytes.len() > 2 && bytes[1] == b'=' {
                    return (ComparisonOp::Ge, &literal[2..]);
                }
                return (ComparisonOp::Gt, &literal[1..]);
            }
            b'!' if bytes.len() > 2 && bytes[1] == b'=' => {
                return (ComparisonOp::Ne, &literal[2..]);
            }
            _ => {}
        }
    }
    (ComparisonOp::Eq, literal)
}

/// Try to build a comparison predicate from a typed accessor and a literal.
///
/// Returns `None` when the literal is empty or its remainder does not parse
/// as `T`. Callers that cannot report failure should use [`comparison`],
/// which substitutes an always-false predicate.
pub fn try_comparison<E, T, A>(accessor: A, literal: &str) -> Option<Predicate<E>>
where
    T: TryParse + PartialOrd + 'static,
    A: Fn(&E) -> T + 'static,
{
    if literal.is_empty() {
        return None;
    }
    let (op, rest) = split_operator(literal);
    let target = T::try_parse(rest)?;
    Some(Box::new(move |entity| op.evaluate(&accessor(entity), &target)))
}

/// Build a comparison predicate, falling back to an always-false predicate
/// when the literal cannot be parsed.
pub fn comparison<E, T, A>(accessor: A, literal: &str) -> Predicate<E>
where
    T: TryParse + PartialOrd + 'static,
    A: Fn(&E) -> T + 'static,
{
    try_comparison(accessor, literal).unwrap_or_else(|| Box::new(|_| false))
}

/// [`comparison`] for optional fields. An absent field value never matches.
pub fn comparison_opt<E, T, A>(accessor: A, literal: &str) -> Predicate<E>
where
    T: TryParse + PartialOrd + 'static,
    A: Fn(&E) -> Option<T> + 'static,
{
    if literal.is_empty() {
        return Box::new(|_| false);
    }
    let (op, rest) = split_operator(literal);
    match T::try_parse(rest) {
        Some(target) => Box::new(move |entity| {
            accessor(entity).is_some_and(|value| op.evaluate(&value, &target))
        }),
        None => Box::new(|_| false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        count: i32,
        score: Option<f64>,
        opened: NaiveDate,
    }

    fn row(count: i32) -> Row {
        Row {
            count,
            score: None,
            opened: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_equality_is_default() {
        let predicate = comparison(|r: &Row| r.count, "5");
        assert!(predicate(&row(5)));
        assert!(!predicate(&row(4)));
        assert!(!predicate(&row(6)));
    }

    #[test]
    fn test_relational_markers() {
        let ge = comparison(|r: &Row| r.count, ">=5");
        assert!(ge(&row(5)));
        assert!(ge(&row(6)));
        assert!(!ge(&row(4)));

        let gt = comparison(|r: &Row| r.count, ">5");
        assert!(!gt(&row(5)));
        assert!(gt(&row(6)));

        let le = comparison(|r: &Row| r.count, "<=5");
        assert!(le(&row(5)));
        assert!(!le(&row(6)));

        let lt = comparison(|r: &Row| r.count, "<5");
        assert!(lt(&row(4)));
        assert!(!lt(&row(5)));

        let ne = comparison(|r: &Row| r.count, "!=3");
        assert!(ne(&row(4)));
        assert!(!ne(&row(3)));
    }

    #[test]
    fn test_unparseable_literal_matches_nothing() {
        let predicate = comparison(|r: &Row| r.count, "abc");
        assert!(!predicate(&row(0)));
        assert!(!predicate(&row(5)));

        assert!(try_comparison::<Row, i32, _>(|r| r.count, "abc").is_none());
        assert!(try_comparison::<Row, i32, _>(|r| r.count, "").is_none());
    }

    #[test]
    fn test_degenerate_marker_literals_match_nothing() {
        // "<=" is read as `<` over "=", "!=" carries no marker at all;
        // both fail the integer parse.
        for literal in ["<=", "!=", "<", ">", ">="] {
            let predicate = comparison(|r: &Row| r.count, literal);
            assert!(!predicate(&row(0)), "literal {literal:?}");
        }
    }

    #[test]
    fn test_single_char_literal_is_equality() {
        // A one-character literal is never a marker, even "<".
        let predicate = comparison(|r: &Row| r.count, "7");
        assert!(predicate(&row(7)));
    }

    #[test]
    fn test_date_comparison() {
        let before_2021 = comparison(|r: &Row| r.opened, "<2021-01-01");
        assert!(before_2021(&row(0)));

        let after_opened = comparison(|r: &Row| r.opened, ">2020-06-01");
        assert!(!after_opened(&row(0)));

        let exact = comparison(|r: &Row| r.opened, "2020-06-01");
        assert!(exact(&row(0)));
    }

    #[test]
    fn test_datetime_try_parse() {
        assert!(NaiveDateTime::try_parse("2020-06-01T12:30:00").is_some());
        assert!(NaiveDateTime::try_parse("2020-06-01 12:30:00").is_some());
        assert!(NaiveDateTime::try_parse("2020-06-01").is_none());
        assert!(DateTime::<Utc>::try_parse("2020-06-01T12:30:00Z").is_some());
        assert!(DateTime::<Utc>::try_parse("not a date").is_none());
    }

    #[test]
    fn test_optional_field_absent_never_matches() {
        let predicate = comparison_opt(|r: &Row| r.score, ">=1.5");
        assert!(!predicate(&row(0)));

        let present = Row {
            count: 0,
            score: Some(2.0),
            opened: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
        };
        assert!(predicate(&present));
    }

    #[test]
    fn test_unsigned_negative_literal_matches_nothing() {
        let predicate = comparison(|r: &Row| r.count as u32, "-1");
        assert!(!predicate(&row(0)));
    }
}
