//! Page templates: embedded defaults with optional per-file overrides.

use std::path::{Path, PathBuf};

use frameworkgen_shared::{Dataset, FrameworkError, Result};
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

pub const INDEX_TEMPLATE: &str = "index.md";
pub const CATEGORY_TEMPLATE: &str = "category.md";
pub const ITEM_TEMPLATE: &str = "item.md";

const EMBEDDED: [(&str, &str); 3] = [
    (INDEX_TEMPLATE, include_str!("../templates/index.md.tera")),
    (CATEGORY_TEMPLATE, include_str!("../templates/category.md.tera")),
    (ITEM_TEMPLATE, include_str!("../templates/item.md.tera")),
];

/// Loaded page templates plus the directory they may have come from.
pub struct Templates {
    tera: Tera,
    dir: Option<PathBuf>,
}

impl Templates {
    /// Load templates, letting files in `dir` replace the embedded ones by name.
    ///
    /// A configured directory that does not exist is an error.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = dir {
            if !dir.is_dir() {
                return Err(FrameworkError::Template(format!(
                    "template directory {} does not exist",
                    dir.display()
                )));
            }
        }

        let mut tera = Tera::default();
        for (name, embedded) in EMBEDDED {
            let source = match dir.map(|d| d.join(name)).filter(|p| p.is_file()) {
                Some(path) => {
                    debug!(template = name, path = %path.display(), "using template override");
                    std::fs::read_to_string(&path).map_err(|e| FrameworkError::io(&path, e))?
                }
                None => embedded.to_string(),
            };
            tera.add_raw_template(name, &source)
                .map_err(|e| template_error(&format!("failed to parse {name}"), &e))?;
        }

        Ok(Self {
            tera,
            dir: dir.map(Path::to_path_buf),
        })
    }

    /// Render one template against a serializable view.
    pub fn render<V: Serialize>(&self, name: &str, view: &V) -> Result<String> {
        let context = Context::from_serialize(view)
            .map_err(|e| template_error("failed to build template context", &e))?;
        self.tera
            .render(name, &context)
            .map_err(|e| template_error(&format!("failed to render {name}"), &e))
    }

    /// Optional stylesheet and script for one page tier, read from the
    /// template directory: `<section>.css` for the index,
    /// `<section>-category.css` and `<section>-item.css` below it (same for
    /// `.js`).
    pub fn page_assets(&self, dataset: Dataset, tier: PageTier) -> Result<PageAssets> {
        let Some(dir) = &self.dir else {
            return Ok(PageAssets::default());
        };
        let stem = match tier {
            PageTier::Index => dataset.section().to_string(),
            PageTier::Category => format!("{}-category", dataset.section()),
            PageTier::Item => format!("{}-item", dataset.section()),
        };
        let read = |ext: &str| -> Result<Option<String>> {
            let path = dir.join(format!("{stem}.{ext}"));
            if !path.is_file() {
                return Ok(None);
            }
            debug!(path = %path.display(), "injecting page asset");
            std::fs::read_to_string(&path)
                .map(|s| Some(s.trim_end().to_string()))
                .map_err(|e| FrameworkError::io(&path, e))
        };
        Ok(PageAssets {
            css: read("css")?,
            js: read("js")?,
        })
    }
}

/// The three kinds of page in a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTier {
    Index,
    Category,
    Item,
}

/// Inline CSS and JS injected into a page's raw HTML block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageAssets {
    pub css: Option<String>,
    pub js: Option<String>,
}

/// Flatten a Tera error and its causes into one message.
fn template_error(context: &str, err: &tera::Error) -> FrameworkError {
    let mut message = format!("{context}: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    FrameworkError::Template(message)
}
