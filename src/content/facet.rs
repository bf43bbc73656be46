//! Facet extraction: the distinct categories and tags of the active set.
//!
//! Facets drive per-category feeds and the sitemap's category/tag pages.
//! They are derived data, recomputed from the snapshot on every pass;
//! nothing is cached between passes, so correctness follows from the
//! recomputation rather than from invalidation logic.

use super::PostRecord;

/// Distinct, non-empty category and tag values of the active post set.
///
/// Values are kept in first-encounter order over the input; callers that
/// iterate facets therefore produce identical output for identical input.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FacetSet {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

/// Scan the active post set for its facet values.
///
/// Membership is exact string equality; empty and absent labels are
/// dropped. Idempotent over the same input.
pub fn extract_facets<'a, I>(posts: I) -> FacetSet
where
    I: IntoIterator<Item = &'a PostRecord>,
{
    let mut facets = FacetSet::default();

    for post in posts {
        if let Some(category) = &post.category {
            push_distinct(&mut facets.categories, category);
        }
        for tag in &post.tags {
            push_distinct(&mut facets.tags, tag);
        }
    }

    facets
}

/// Append a label unless it is empty or already present.
fn push_distinct(values: &mut Vec<String>, label: &str) {
    if !label.is_empty() && !values.iter().any(|v| v == label) {
        values.push(label.to_string());
    }
}
