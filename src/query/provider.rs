//! Provider capabilities consumed by the query compilers.
//!
//! A provider is a pluggable unit that knows how to narrow a collection for
//! one or more field prefixes. The compilers only require ordered iteration
//! over candidate providers and a boolean [`QueryProvider::is_supported`]
//! call per candidate; everything else about matching is the provider's
//! business. [`RankingProvider`] extends the capability with per-entity
//! match-quality functions used for relevance scoring.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{QuarryError, Result};

/// A boxed per-entity boolean predicate.
pub type Predicate<E> = Box<dyn Fn(&E) -> bool>;

/// A boxed per-entity match-quality function.
pub type MatchRankFn<E> = Box<dyn Fn(&E) -> MatchRank>;

/// A boxed per-entity relevance score function.
pub type RankFn<E> = Box<dyn Fn(&E) -> i64>;

/// An opaque, narrowable collection of entities.
///
/// The compilers never enumerate a collection; they only hand it to
/// providers and, for criteria nobody can evaluate, discard all rows via
/// [`Collection::none`]. Deferred-execution sources implement this trait
/// over their own query handle; `Vec<T>` is provided for eager, in-memory
/// use.
pub trait Collection: Sized {
    /// The entity type predicates and rank functions are evaluated against.
    type Item;

    /// Keep only the rows satisfying `predicate`.
    fn retain_rows<P>(self, predicate: P) -> Self
    where
        P: Fn(&Self::Item) -> bool;

    /// Discard all rows.
    fn none(self) -> Self;
}

impl<T> Collection for Vec<T> {
    type Item = T;

    fn retain_rows<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool,
    {
        self.retain(|item| predicate(item));
        self
    }

    fn none(mut self) -> Self {
        self.clear();
        self
    }
}

/// A pluggable per-field filter unit.
///
/// `C` is an opaque caller context threaded through every call (a database
/// handle, a locale, a user session); `S` is the collection type being
/// narrowed. Provider failures propagate to the caller unchanged — the
/// compilers never swallow them.
pub trait QueryProvider<C, S: Collection> {
    /// Whether this provider recognizes the given field prefix.
    fn is_supported(&self, prefix: &str) -> bool;

    /// Narrow `source` to rows matching at least one of `values`.
    fn filter(&self, context: &C, source: S, values: &[String]) -> Result<S>;

    /// Narrow `source` to rows matching none of `values`.
    fn exclude(&self, context: &C, source: S, values: &[String]) -> Result<S>;
}

/// A provider that can additionally grade how well one entity matches a
/// value, for relevance scoring.
pub trait RankingProvider<C, S: Collection>: QueryProvider<C, S> {
    /// Produce a per-entity match-quality function for one raw value.
    fn match_rank(&self, context: &C, value: &str) -> Result<MatchRankFn<S::Item>>;
}

/// Ordinal match quality, used only for relevance scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchRank {
    /// The value does not match at all.
    NoMatch,
    /// The value occurs somewhere inside the field.
    Contains,
    /// The field starts with the value.
    StartsWith,
    /// The field equals the value.
    ExactMatch,
}

impl MatchRank {
    /// Numeric score contributed to a summed relevance function.
    pub fn score(self) -> i64 {
        self as i64
    }

    /// Grade how well `haystack` matches `needle`, case-insensitively.
    pub fn grade(haystack: &str, needle: &str) -> MatchRank {
        let haystack = haystack.to_lowercase();
        let needle = needle.to_lowercase();
        if haystack == needle {
            MatchRank::ExactMatch
        } else if haystack.starts_with(&needle) {
            MatchRank::StartsWith
        } else if haystack.contains(&needle) {
            MatchRank::Contains
        } else {
            MatchRank::NoMatch
        }
    }
}

/// The set of field prefixes a provider recognizes.
///
/// Matching is case-insensitive and anchored, so a provider for `author`
/// accepts `Author:` but not `authors:`.
#[derive(Debug, Clone)]
pub struct PrefixSet {
    prefixes: Vec<String>,
    pattern: Regex,
}

impl PrefixSet {
    /// Build a prefix set from one or more prefixes.
    pub fn new<I, S>(prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        if prefixes.is_empty() {
            return Err(QuarryError::query("prefix set requires at least one prefix"));
        }

        let alternation = prefixes
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!("(?i)^(?:{alternation})$"))
            .map_err(|e| QuarryError::query(format!("invalid prefix set: {e}")))?;

        Ok(PrefixSet { prefixes, pattern })
    }

    /// Whether `prefix` is one of the recognized prefixes.
    pub fn matches(&self, prefix: &str) -> bool {
        self.pattern.is_match(prefix)
    }

    /// The recognized prefixes, in declaration order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

/// Narrow `source` to rows matching at least one value.
///
/// Folds the per-value predicates produced by `predicate_for` with logical
/// OR and applies the combined predicate in a single pass. An empty value
/// set matches nothing. This is the standard way for a provider to
/// implement [`QueryProvider::filter`].
pub fn filter_any<S, F>(source: S, values: &[String], predicate_for: F) -> S
where
    S: Collection,
    S::Item: 'static,
    F: Fn(&str) -> Predicate<S::Item>,
{
    let mut combined: Option<Predicate<S::Item>> = None;
    for value in values {
        let next = predicate_for(value);
        combined = Some(match combined {
            None => next,
            Some(acc) => Box::new(move |item| acc(item) || next(item)),
        });
    }
    match combined {
        Some(predicate) => source.retain_rows(|item| predicate(item)),
        None => source.none(),
    }
}

/// Narrow `source` to rows matching none of the values.
///
/// Folds the negated per-value predicates with logical AND and applies the
/// combined predicate in a single pass. An empty value set keeps every row.
/// This is the standard way for a provider to implement
/// [`QueryProvider::exclude`].
pub fn exclude_all<S, F>(source: S, values: &[String], predicate_for: F) -> S
where
    S: Collection,
    S::Item: 'static,
    F: Fn(&str) -> Predicate<S::Item>,
{
    let mut combined: Option<Predicate<S::Item>> = None;
    for value in values {
        let next = predicate_for(value);
        combined = Some(match combined {
            None => Box::new(move |item| !next(item)),
            Some(acc) => Box::new(move |item| acc(item) && !next(item)),
        });
    }
    match combined {
        Some(predicate) => source.retain_rows(|item| predicate(item)),
        None => source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_match_rank_ordering() {
        assert!(MatchRank::ExactMatch > MatchRank::StartsWith);
        assert!(MatchRank::StartsWith > MatchRank::Contains);
        assert!(MatchRank::Contains > MatchRank::NoMatch);
    }

    #[test]
    fn test_match_rank_scores() {
        assert_eq!(MatchRank::NoMatch.score(), 0);
        assert_eq!(MatchRank::Contains.score(), 1);
        assert_eq!(MatchRank::StartsWith.score(), 2);
        assert_eq!(MatchRank::ExactMatch.score(), 3);
    }

    #[test]
    fn test_match_rank_grade() {
        assert_eq!(MatchRank::grade("rust", "Rust"), MatchRank::ExactMatch);
        assert_eq!(MatchRank::grade("rustic", "rust"), MatchRank::StartsWith);
        assert_eq!(MatchRank::grade("trust", "rust"), MatchRank::Contains);
        assert_eq!(MatchRank::grade("go", "rust"), MatchRank::NoMatch);
    }

    #[test]
    fn test_prefix_set_matching() {
        let set = PrefixSet::new(["author", "by"]).unwrap();
        assert!(set.matches("author"));
        assert!(set.matches("Author"));
        assert!(set.matches("BY"));
        assert!(!set.matches("authors"));
        assert!(!set.matches(""));
        assert_eq!(set.prefixes(), ["author", "by"]);
    }

    #[test]
    fn test_prefix_set_escapes_metacharacters() {
        let set = PrefixSet::new(["a.b"]).unwrap();
        assert!(set.matches("a.b"));
        assert!(!set.matches("axb"));
    }

    #[test]
    fn test_prefix_set_rejects_empty() {
        let prefixes: [&str; 0] = [];
        assert!(PrefixSet::new(prefixes).is_err());
    }

    #[test]
    fn test_filter_any_is_logical_or() {
        let source = vec![1, 2, 3, 4, 5];
        let narrowed = filter_any(source, &values(&["1", "4"]), |value| {
            let target: i32 = value.parse().unwrap();
            Box::new(move |item: &i32| *item == target)
        });
        assert_eq!(narrowed, vec![1, 4]);
    }

    #[test]
    fn test_filter_any_empty_values_matches_nothing() {
        let narrowed = filter_any(vec![1, 2, 3], &[], |_| Box::new(|_: &i32| true));
        assert!(narrowed.is_empty());
    }

    #[test]
    fn test_exclude_all_is_negated_and() {
        let source = vec![1, 2, 3, 4, 5];
        let narrowed = exclude_all(source, &values(&["2", "5"]), |value| {
            let target: i32 = value.parse().unwrap();
            Box::new(move |item: &i32| *item == target)
        });
        assert_eq!(narrowed, vec![1, 3, 4]);
    }

    #[test]
    fn test_exclude_all_empty_values_keeps_everything() {
        let narrowed = exclude_all(vec![1, 2, 3], &[], |_| Box::new(|_: &i32| true));
        assert_eq!(narrowed, vec![1, 2, 3]);
    }

    #[test]
    fn test_vec_collection_none() {
        let source: Vec<i32> = vec![1, 2, 3];
        assert!(source.none().is_empty());
    }
}
