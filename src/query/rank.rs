//! Compilation of a component sequence into a relevance score function.
//!
//! Each component that resolves to a ranking-capable provider contributes
//! that provider's per-entity match quality, converted to its numeric
//! score; the contributions are summed into one closure. Ranking never
//! filters: the score function is evaluated over whatever collection the
//! caller already narrowed.

use crate::error::Result;
use crate::query::component::QueryComponent;
use crate::query::provider::{Collection, RankFn, RankingProvider};

/// Build a summed relevance score function for a tokenized query.
///
/// `providers` is the ranking-capable subset of the caller's providers,
/// consulted in slice order for prefixed components; `default_provider`
/// handles components without a prefix. Components that resolve to no
/// ranking provider contribute nothing. Returns `Ok(None)` when no
/// component contributed, in which case the caller falls back to its
/// default ordering.
pub fn match_rank_selector<C, S>(
    context: &C,
    components: &[QueryComponent],
    providers: &[&dyn RankingProvider<C, S>],
    default_provider: Option<&dyn RankingProvider<C, S>>,
) -> Result<Option<RankFn<S::Item>>>
where
    S: Collection,
    S::Item: 'static,
{
    let mut sum: Option<RankFn<S::Item>> = None;

    for component in components {
        let provider = if component.prefix().is_empty() {
            default_provider
        } else {
            providers
                .iter()
                .copied()
                .find(|p| p.is_supported(component.prefix()))
        };
        let Some(provider) = provider else {
            continue;
        };

        let rank_fn = provider.match_rank(context, component.value())?;
        sum = Some(match sum {
            None => Box::new(move |entity| rank_fn(entity).score()),
            Some(acc) => Box::new(move |entity| acc(entity) + rank_fn(entity).score()),
        });
    }

    Ok(sum)
}
