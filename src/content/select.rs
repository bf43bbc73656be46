//! Post selection and ordering.
//!
//! Every generated document starts here: drafts are excluded, an
//! optional category filter narrows the set, and the result is ordered
//! by publish date, most recent first.

use super::{PostRecord, Posts};

/// Select the active posts for one output document.
///
/// - Drafts never survive selection.
/// - The category filter is an exact, case-sensitive string match.
/// - Ordering is publish date descending. The sort must stay stable:
///   posts sharing a publish date keep their encounter order, so the
///   same snapshot always serializes to the same bytes. Posts without a
///   publish date sort after all dated posts.
///
/// Pure function of the snapshot and filter; no post is mutated.
pub fn select_posts<'a>(posts: &'a Posts, category: Option<&str>) -> Vec<&'a PostRecord> {
    let mut selected: Vec<&PostRecord> = posts
        .iter()
        .filter(|post| !post.draft)
        .filter(|post| match category {
            Some(wanted) => post.category.as_deref() == Some(wanted),
            None => true,
        })
        .collect();

    // slice::sort_by is stable; switching to sort_unstable_by here would
    // be an observable bug, not an optimization.
    selected.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));

    selected
}
