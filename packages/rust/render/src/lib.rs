//! YAML → page rendering for frameworkgen.
//!
//! Loads a dataset's data file, groups records into categories, and renders
//! the three page tiers (section index, category pages, item pages) in
//! memory. Writing the pages to disk is left to the caller.

pub mod category;
pub mod cleanup;
pub mod frontmatter;
pub mod icons;
pub mod load;
pub mod record;
pub mod section;
pub mod templates;

use frameworkgen_shared::{ProjectLayout, RenderConfig, Result};

pub use cleanup::{Tidy, preview};
pub use frontmatter::FrontMatter;
pub use icons::IconResolver;
pub use load::{Loaded, load_records};
pub use record::{Field, SiteRecord};
pub use section::{CategorySummary, RenderedPage, RenderedSection, render_dataset};
pub use templates::{PageAssets, PageTier, Templates};

/// Everything a render pass needs besides the data file itself.
pub struct RenderContext {
    pub icons: IconResolver,
    pub templates: Templates,
    /// Front matter date, already validated as `YYYY-MM-DD`.
    pub date: String,
    pub draft: bool,
    pub tidy: Tidy,
}

impl RenderContext {
    /// Build from the resolved project layout and the `[render]` config.
    pub fn new(layout: &ProjectLayout, config: &RenderConfig) -> Result<Self> {
        let date = config.parsed_date()?;
        Ok(Self {
            icons: IconResolver::new(&layout.icons_dir),
            templates: Templates::load(layout.template_dir.as_deref())?,
            date: date.format("%Y-%m-%d").to_string(),
            draft: config.draft,
            tidy: Tidy::new(&config.replacements),
        })
    }
}
