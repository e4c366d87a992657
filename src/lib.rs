//! # Quarry
//!
//! A search-query tokenizer and filter/rank compiler for Rust.
//!
//! Quarry turns a free-text search string like
//! `-author:"jane doe" +status:open bug` into a structured component
//! sequence, then compiles that sequence into an executable filter and an
//! optional relevance score over a collection of entities. Field-level
//! matching is delegated to pluggable per-field providers; Quarry itself
//! owns only the query grammar, the grouping and composition rules, and the
//! fail-open/fail-closed policy for criteria no provider can evaluate.
//!
//! ## Features
//!
//! - Span-tracking tokenizer with `+`/`-` operators, `field:` prefixes, and
//!   quoted values
//! - Provider-based filtering with OR-within-group, AND-across-required
//!   semantics
//! - Typed comparison predicates (`>=5`, `!=3`, `<2020-01-01`) over any
//!   [`TryParse`](query::TryParse) type
//! - Summed match-quality ranking for relevance ordering

pub mod error;
pub mod query;

pub mod prelude {
    //! Convenient single-import surface for provider authors.

    pub use crate::error::{QuarryError, Result};
    pub use crate::query::{
        Collection, ComponentOperator, MatchRank, PrefixSet, QueryComponent, QueryProvider,
        RankingProvider, comparison, exclude_all, filter, filter_any, match_rank_selector,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
