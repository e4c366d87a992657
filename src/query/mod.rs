//! Query tokenization and compilation.
//!
//! The pipeline has two stages with one shared intermediate form. Raw query
//! text is tokenized into an ordered [`QueryComponent`] sequence, and the
//! sequence is then compiled by two independent consumers: the predicate
//! compiler ([`filter`]) narrows a collection through pluggable field
//! providers, and the rank compiler ([`match_rank_selector`]) builds an
//! optional per-entity relevance score. Either compiler may run without the
//! other.

pub mod comparison;
pub mod compiler;
pub mod component;
pub mod provider;
pub mod rank;

pub use self::comparison::{ComparisonOp, TryParse, comparison, comparison_opt, try_comparison};
pub use self::compiler::filter;
pub use self::component::{ComponentOperator, QueryComponent};
pub use self::provider::{
    Collection, MatchRank, MatchRankFn, Predicate, PrefixSet, QueryProvider, RankFn,
    RankingProvider, exclude_all, filter_any,
};
pub use self::rank::match_rank_selector;
