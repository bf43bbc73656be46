//! Output document generation.
//!
//! Each document (JSON Feed, site RSS, per-category RSS set, sitemap) is
//! a pure projection of the same immutable post snapshot, so they are
//! generated in parallel with no ordering between them. The only
//! sequencing lives inside each generator: select, then project, then
//! assemble.

pub mod json;
pub mod rss;
pub mod sitemap;

use crate::{
    config::SiteConfig,
    content::{Posts, facet::extract_facets, select::select_posts},
    render::HtmlRenderer,
};
use anyhow::{Result, bail};

/// Generate every enabled output document from one post snapshot.
///
/// Category feeds are enumerated from the facet set computed once here;
/// nothing generated downstream feeds back into that computation. A
/// failed category document is logged by the rss generator and does not
/// block its siblings, but the build as a whole reports the failure.
pub fn build_outputs(
    config: &SiteConfig,
    posts: &Posts,
    renderer: &dyn HtmlRenderer,
) -> Result<()> {
    let facets = extract_facets(select_posts(posts, None));

    let ((json_result, rss_result), (category_failures, sitemap_result)) = rayon::join(
        || {
            rayon::join(
                || json::build_json_feed(config, posts, renderer),
                || rss::build_rss(config, posts),
            )
        },
        || {
            rayon::join(
                || rss::build_category_feeds(config, posts, &facets),
                || sitemap::build_sitemap(config, posts),
            )
        },
    );

    json_result?;
    rss_result?;
    sitemap_result?;
    if category_failures > 0 {
        bail!("{category_failures} category feeds failed to generate");
    }
    Ok(())
}
