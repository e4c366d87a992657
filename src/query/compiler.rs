//! Compilation of a component sequence into a narrowed collection.
//!
//! Components are grouped by (operator, resolved provider) and each group is
//! applied to the running collection in turn. The fail-open/fail-closed
//! policy for criteria no provider can evaluate is deliberate and part of
//! the observable contract: an exclusion nobody understands excludes
//! nothing, while a plain or required criterion nobody understands matches
//! nothing.

use ahash::{AHashMap, AHashSet};

use crate::error::Result;
use crate::query::component::{ComponentOperator, QueryComponent};
use crate::query::provider::{Collection, QueryProvider};

/// One (operator, resolved provider) group of components.
struct Group {
    operator: ComponentOperator,
    /// Index into the caller's provider slice, or `None` when no provider
    /// recognized the group's prefix.
    provider: Option<usize>,
    /// Distinct values in first-appearance order.
    values: Vec<String>,
    seen: AHashSet<String>,
    /// Whether every component in the group carries an empty prefix.
    all_unprefixed: bool,
}

/// Narrow `source` according to a tokenized query.
///
/// Providers are consulted in slice order; the first whose
/// [`is_supported`](QueryProvider::is_supported) accepts a component's
/// prefix wins. `default_provider` stands in for a providerless group only
/// when every component in that group has an empty prefix. Groups are
/// applied in first-appearance order of their earliest component.
pub fn filter<C, S>(
    context: &C,
    source: S,
    components: &[QueryComponent],
    providers: &[&dyn QueryProvider<C, S>],
    default_provider: Option<&dyn QueryProvider<C, S>>,
) -> Result<S>
where
    S: Collection,
{
    let mut groups: Vec<Group> = Vec::new();
    let mut group_index: AHashMap<(ComponentOperator, Option<usize>), usize> = AHashMap::new();

    for component in components {
        let resolved = providers
            .iter()
            .position(|p| p.is_supported(component.prefix()));
        let key = (component.operator(), resolved);
        let slot = *group_index.entry(key).or_insert_with(|| {
            groups.push(Group {
                operator: component.operator(),
                provider: resolved,
                values: Vec::new(),
                seen: AHashSet::new(),
                all_unprefixed: true,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.all_unprefixed &= component.prefix().is_empty();
        if group.seen.insert(component.value().to_string()) {
            group.values.push(component.value().to_string());
        }
    }

    let mut result = source;
    for group in &groups {
        let provider = group
            .provider
            .map(|i| providers[i])
            .or(if group.all_unprefixed {
                default_provider
            } else {
                None
            });
        result = apply_group(context, result, provider, group.operator, &group.values)?;
    }

    Ok(result)
}

fn apply_group<C, S>(
    context: &C,
    source: S,
    provider: Option<&dyn QueryProvider<C, S>>,
    operator: ComponentOperator,
    values: &[String],
) -> Result<S>
where
    S: Collection,
{
    let Some(provider) = provider else {
        // Fail open for exclusions, fail closed for everything else.
        return Ok(match operator {
            ComponentOperator::Excluded => source,
            _ => source.none(),
        });
    };

    match operator {
        ComponentOperator::Required => {
            // Every required value must match independently: one filter
            // call per value, each narrowing the previous result.
            let mut narrowed = source;
            for value in values {
                narrowed = provider.filter(context, narrowed, std::slice::from_ref(value))?;
            }
            Ok(narrowed)
        }
        ComponentOperator::Excluded => provider.exclude(context, source, values),
        ComponentOperator::None => provider.filter(context, source, values),
    }
}
