//! Rendering one dataset into its section pages.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use frameworkgen_shared::{Asset, Control, Dataset, GovernanceItem, Result, slugify};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::RenderContext;
use crate::category;
use crate::cleanup::{self, preview};
use crate::frontmatter::{FrontMatter, weight_for};
use crate::load::load_records;
use crate::record::{Field, SiteRecord};
use crate::templates::{CATEGORY_TEMPLATE, INDEX_TEMPLATE, ITEM_TEMPLATE, PageAssets, PageTier};

/// Maximum characters of item text shown in previews and descriptions.
pub const PREVIEW_LIMIT: usize = 200;

/// Page file name for section and category indexes.
const INDEX_FILE: &str = "_index.md";

/// One generated page, addressed relative to the section directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub key: String,
    pub items: usize,
}

/// All pages for one dataset, in a fixed order: index, then each category
/// page followed by its items.
#[derive(Debug, Clone)]
pub struct RenderedSection {
    pub dataset: Dataset,
    pub pages: Vec<RenderedPage>,
    pub categories: Vec<CategorySummary>,
    /// Records rendered as item pages.
    pub items: usize,
    /// Records dropped while loading.
    pub skipped: usize,
}

impl RenderedSection {
    pub fn page(&self, path: impl AsRef<Path>) -> Option<&RenderedPage> {
        self.pages.iter().find(|p| p.path == path.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Template views
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ItemView {
    title: String,
    slug: String,
    url: String,
    identifier: Option<String>,
    summary: String,
    preview: String,
    icon: String,
    tags: Vec<String>,
    fields: Vec<Field>,
}

/// A category page. `key` is also the directory name, so categories whose
/// raw keys slug alike share one page.
#[derive(Debug, Serialize)]
struct CategoryView {
    key: String,
    display: String,
    description: String,
    icon: String,
    url: String,
    count: usize,
    items: Vec<ItemView>,
}

#[derive(Serialize)]
struct IndexPage<'a> {
    section: &'a str,
    title: &'a str,
    description: &'a str,
    plural: &'a str,
    count: usize,
    category_count: usize,
    hero_icon: String,
    assets: &'a PageAssets,
    /// Emit the category filter buttons and item cards.
    filter: bool,
    categories: &'a [CategoryView],
}

#[derive(Serialize)]
struct CategoryPage<'a> {
    section: &'a str,
    section_url: &'a str,
    plural: &'a str,
    total: usize,
    assets: &'a PageAssets,
    category: &'a CategoryView,
}

#[derive(Serialize)]
struct ItemPage<'a> {
    section: &'a str,
    section_url: &'a str,
    assets: &'a PageAssets,
    category: &'a CategoryView,
    item: &'a ItemView,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render every page for `dataset` from its YAML data file.
pub fn render_dataset(
    dataset: Dataset,
    yaml_path: &Path,
    ctx: &RenderContext,
) -> Result<RenderedSection> {
    match dataset {
        Dataset::Assets => render_records::<Asset>(yaml_path, ctx),
        Dataset::Controls => render_records::<Control>(yaml_path, ctx),
        Dataset::Governance => render_records::<GovernanceItem>(yaml_path, ctx),
    }
}

#[instrument(skip_all, fields(dataset = %T::DATASET, path = %yaml_path.display()))]
fn render_records<T: SiteRecord>(yaml_path: &Path, ctx: &RenderContext) -> Result<RenderedSection> {
    let dataset = T::DATASET;
    let section = dataset.section();
    let section_url = format!("/{section}/");
    let (_, plural) = dataset.nouns();

    let loaded = load_records::<T>(yaml_path)?;
    let total = loaded.records.len();

    let mut grouped: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for record in loaded.records {
        grouped.entry(category_dir(&record.category())).or_default().push(record);
    }

    let categories: Vec<CategoryView> = grouped
        .into_iter()
        .map(|(key, mut records)| {
            records.sort_by_key(|r| r.sort_name());
            build_category(dataset, &section_url, key, &records, ctx)
        })
        .collect();

    let mut pages = Vec::with_capacity(1 + categories.len() + total);

    let index_assets = ctx.templates.page_assets(dataset, PageTier::Index)?;
    let category_assets = ctx.templates.page_assets(dataset, PageTier::Category)?;
    let item_assets = ctx.templates.page_assets(dataset, PageTier::Item)?;

    let index = IndexPage {
        section,
        title: &loaded.meta.title,
        description: &loaded.meta.description,
        plural,
        count: total,
        category_count: categories.len(),
        hero_icon: ctx.icons.hero_icon(dataset),
        assets: &index_assets,
        filter: dataset == Dataset::Assets,
        categories: &categories,
    };
    let front = front_matter(ctx, &loaded.meta.title, &loaded.meta.description, 10)
        .param("count", total.to_string());
    pages.push(RenderedPage {
        path: PathBuf::from(INDEX_FILE),
        content: page(&front, &ctx.templates.render(INDEX_TEMPLATE, &index)?),
    });

    for (cat_pos, category) in categories.iter().enumerate() {
        let view = CategoryPage {
            section,
            section_url: &section_url,
            plural,
            total,
            assets: &category_assets,
            category,
        };
        let front = front_matter(
            ctx,
            &category.display,
            &category.description,
            weight_for(cat_pos),
        );
        pages.push(RenderedPage {
            path: Path::new(&category.key).join(INDEX_FILE),
            content: page(&front, &ctx.templates.render(CATEGORY_TEMPLATE, &view)?),
        });

        for (item_pos, item) in category.items.iter().enumerate() {
            let view = ItemPage {
                section,
                section_url: &section_url,
                assets: &item_assets,
                category,
                item,
            };
            let prefix = param_prefix(dataset);
            let mut front = front_matter(ctx, &item.title, &item.preview, weight_for(item_pos))
                .param(format!("{prefix}_category"), category.key.as_str());
            if let Some(id) = &item.identifier {
                front = front.param(format!("{prefix}_id"), id.as_str());
            }
            let path = Path::new(&category.key).join(format!("{}.md", item.slug));
            debug!(page = %path.display(), "rendered item page");
            pages.push(RenderedPage {
                path,
                content: page(&front, &ctx.templates.render(ITEM_TEMPLATE, &view)?),
            });
        }
    }

    info!(
        %dataset,
        categories = categories.len(),
        items = total,
        skipped = loaded.skipped,
        pages = pages.len(),
        "section rendered"
    );

    Ok(RenderedSection {
        dataset,
        categories: categories
            .iter()
            .map(|c| CategorySummary {
                key: c.key.clone(),
                items: c.count,
            })
            .collect(),
        pages,
        items: total,
        skipped: loaded.skipped,
    })
}

fn build_category<T: SiteRecord>(
    dataset: Dataset,
    section_url: &str,
    key: String,
    records: &[T],
    ctx: &RenderContext,
) -> CategoryView {
    let url = format!("{section_url}{key}/");

    let mut used: HashSet<String> = HashSet::new();
    let items = records
        .iter()
        .map(|record| {
            let slug = unique_slug(record.slug(), &mut used);
            if slug != record.slug() {
                warn!(%dataset, category = %key, slug = %slug, "duplicate slug in category, suffixed");
            }
            build_item(record, &url, slug, ctx)
        })
        .collect::<Vec<_>>();

    CategoryView {
        display: category::display_name(dataset, &key),
        description: category::description(dataset, &key),
        icon: ctx.icons.category_icon(dataset, &key),
        count: items.len(),
        items,
        url,
        key,
    }
}

/// Directory a raw category key renders into: its slug, or `unknown`.
fn category_dir(raw: &str) -> String {
    match slugify(raw) {
        dir if dir.is_empty() => "unknown".to_string(),
        dir => dir,
    }
}

fn build_item<T: SiteRecord>(record: &T, category_url: &str, slug: String, ctx: &RenderContext) -> ItemView {
    let tidy = &ctx.tidy;
    let summary = tidy.apply(record.summary().trim());
    ItemView {
        title: tidy.apply(record.title().trim()),
        url: format!("{category_url}{slug}/"),
        slug,
        identifier: record.identifier(),
        preview: preview(&summary, PREVIEW_LIMIT),
        summary,
        icon: record.icon(&ctx.icons),
        tags: record.tags().iter().map(|t| tidy.apply(t.trim())).collect(),
        fields: record.fields(tidy),
    }
}

/// `base`, or `base-2`, `base-3`, ... when already taken in this category.
fn unique_slug(base: String, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { "item".to_string() } else { base };
    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

fn param_prefix(dataset: Dataset) -> &'static str {
    match dataset {
        Dataset::Assets => "asset",
        Dataset::Controls => "control",
        Dataset::Governance => "governance",
    }
}

fn front_matter(ctx: &RenderContext, title: &str, description: &str, weight: usize) -> FrontMatter {
    FrontMatter {
        title: title.to_string(),
        description: description.split_whitespace().collect::<Vec<_>>().join(" "),
        date: ctx.date.clone(),
        draft: ctx.draft,
        weight,
        params: BTreeMap::new(),
    }
}

fn page(front: &FrontMatter, body: &str) -> String {
    format!("{}\n{}", front.render(), cleanup::run_pipeline(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::Tidy;
    use crate::icons::IconResolver;
    use crate::templates::Templates;
    use frameworkgen_shared::RenderConfig;

    fn fixtures() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
    }

    fn context(template_dir: Option<&Path>) -> RenderContext {
        let config = RenderConfig::default();
        RenderContext {
            icons: IconResolver::new(fixtures().join("icons")),
            templates: Templates::load(template_dir).unwrap(),
            date: config.date.clone(),
            draft: config.draft,
            tidy: Tidy::new(&config.replacements),
        }
    }

    fn render(dataset: Dataset, ctx: &RenderContext) -> RenderedSection {
        let path = fixtures().join("yaml").join(dataset.yaml_filename());
        render_dataset(dataset, &path, ctx).unwrap()
    }

    fn content<'a>(section: &'a RenderedSection, path: &str) -> &'a str {
        match section.page(path) {
            Some(page) => &page.content,
            None => panic!("no page at {path}"),
        }
    }

    #[test]
    fn control_pages_cover_every_tier() {
        let section = render(Dataset::Controls, &context(None));

        assert_eq!(section.items, 6);
        assert_eq!(section.pages.len(), 1 + section.categories.len() + 6);
        for path in [
            "_index.md",
            "account/_index.md",
            "account/inactive-disable-delete.md",
            "account/mfa-enforcement.md",
            "backup/daily-snapshots.md",
            "zeta/custom.md",
        ] {
            assert!(section.page(path).is_some(), "missing {path}");
        }

        let mfa = content(&section, "account/mfa-enforcement.md");
        assert!(mfa.starts_with("---\ntitle: \"MFA is enforced\"\n"));
        assert!(mfa.contains("control_category: \"account\"\n"));
        assert!(mfa.contains("control_id: \"C.Account.MFAEnforcement\"\n"));
        assert!(mfa.contains("- SOC 2\n- PCI DSS\n"));
        assert!(mfa.ends_with('\n') && !mfa.ends_with("\n\n"));

        let backup = content(&section, "backup/daily-snapshots.md");
        assert!(backup.contains("## Tested on Asset Inventory\n\ntrue\n"));
    }

    #[test]
    fn category_counts_sum_to_total() {
        let section = render(Dataset::Controls, &context(None));
        let sum: usize = section.categories.iter().map(|c| c.items).sum();
        assert_eq!(sum, section.items);

        let keys: Vec<_> = section.categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["account", "backup", "logs", "zeta"]);

        let account = content(&section, "account/_index.md");
        assert!(account.contains("(/controls/account/inactive-disable-delete/)"));
        assert!(account.contains("(/controls/account/mfa-enforcement/)"));
        assert!(!account.contains("daily-snapshots"));
    }

    #[test]
    fn duplicate_slugs_get_suffixes() {
        let section = render(Dataset::Controls, &context(None));
        // Sorted by name, "Log archive retention" claims the bare slug first.
        let first = content(&section, "logs/retention.md");
        let second = content(&section, "logs/retention-2.md");
        assert!(first.contains("control_id: \"C.Logs.RetentionArchive\""));
        assert!(second.contains("control_id: \"C.Logs.Retention90Days\""));
        assert!(second.contains("weight: 20\n"));
    }

    #[test]
    fn output_is_byte_stable() {
        let ctx = context(None);
        for dataset in Dataset::ALL {
            assert_eq!(render(dataset, &ctx).pages, render(dataset, &ctx).pages);
        }
    }

    #[test]
    fn missing_icon_files_fall_back() {
        let section = render(Dataset::Controls, &context(None));
        assert!(content(&section, "account/_index.md").contains(r#"data-icon="control-account""#));
        assert!(content(&section, "backup/_index.md").contains(r#"<path d="M12 15l2 2 4-4"/>"#));

        let index = content(&section, "_index.md");
        assert!(index.contains(r#"width="80" height="80""#));
        assert!(index.contains("title: \"Secure Product Model Controls\"\n"));
        assert!(index.contains("count: \"6\"\n"));
    }

    #[test]
    fn governance_previews_are_truncated() {
        let section = render(Dataset::Governance, &context(None));
        assert_eq!(section.items, 5);

        let policy = content(&section, "policy/_index.md");
        assert!(policy.contains("stay current and traceable acr...\n"));
        assert!(!policy.contains("across the organization"));

        let security = content(&section, "policy/security.md");
        assert!(security.contains("governance_id: \"G.Policy.Security\""));
        assert!(security.contains("traceable across the organization."));

        let systems = content(&section, "scope/systems.md");
        assert!(systems.starts_with("---\ntitle: \"Systems\"\n"));
    }

    #[test]
    fn asset_pages_tidy_text() {
        let section = render(Dataset::Assets, &context(None));
        assert_eq!(section.skipped, 2);

        let vendor = content(&section, "access/vendor-portal.md");
        assert!(vendor.contains("(read only)"));
        assert!(vendor.contains("**Tags:** Vendors, SSO"));
        assert!(vendor.contains("asset_category: \"access\"\n"));
        assert!(!vendor.contains("asset_id"));

        let users = content(&section, "access/users.md");
        assert!(users.contains("- Break-glass accounts\n"));
    }

    #[test]
    fn template_dir_overrides_and_injects_assets() {
        let dir = fixtures().join("templates");
        let section = render(Dataset::Controls, &context(Some(&dir)));

        let index = content(&section, "_index.md");
        assert!(index.contains("<style>\n.controls-hero { text-align: center; }\n</style>"));

        let backup = content(&section, "backup/daily-snapshots.md");
        assert!(backup.ends_with("---\n\nOVERRIDE Daily snapshots\n"));
    }

    #[test]
    fn category_keys_that_slug_alike_share_a_directory() {
        let yaml = "controls:\n\
- id: C.Data_Store.A\n  name: Alpha\n  slug: shared\n\
- id: C.data-store.B\n  name: Beta\n  slug: shared\n\
- id: C.!!!.C\n  name: Gamma\n  slug: gamma\n\
- id: Orphan\n  name: Orphan\n  slug: orphan\n";
        let path = std::env::temp_dir().join(format!("fwgen-section-test-{}.yml", uuid::Uuid::now_v7()));
        std::fs::write(&path, yaml).unwrap();

        let section = render_dataset(Dataset::Controls, &path, &context(None)).unwrap();
        let _ = std::fs::remove_file(&path);

        let keys: Vec<_> = section.categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["data-store", "unknown"]);

        let paths: HashSet<_> = section.pages.iter().map(|p| p.path.clone()).collect();
        assert_eq!(section.pages.len(), 7);
        assert_eq!(paths.len(), 7);

        assert!(content(&section, "data-store/shared.md").contains("control_id: \"C.Data_Store.A\""));
        assert!(content(&section, "data-store/shared-2.md").contains("control_id: \"C.data-store.B\""));
        let unknown = content(&section, "unknown/_index.md");
        assert!(unknown.contains("(/controls/unknown/gamma/)"));
        assert!(unknown.contains("(/controls/unknown/orphan/)"));
        assert!(content(&section, "unknown/orphan.md").contains("control_category: \"unknown\"\n"));
    }

    #[test]
    fn tier_assets_reach_category_and_item_pages() {
        let dir = fixtures().join("tier-templates");
        let section = render(Dataset::Controls, &context(Some(&dir)));

        let account = content(&section, "account/_index.md");
        assert!(account.contains("<style>\n.category-hero { border: 1px solid; }\n</style>\n<div class=\"category-hero\">"));
        assert!(!account.contains("<script>"));

        let backup = content(&section, "backup/daily-snapshots.md");
        assert!(backup.contains("<script>\nconsole.log(\"control item\");\n</script>"));
        assert!(!backup.contains("<style>"));

        let index = content(&section, "_index.md");
        assert!(!index.contains("<style>") && !index.contains("<script>"));
    }

    #[test]
    fn asset_index_has_category_filter() {
        let section = render(Dataset::Assets, &context(None));
        let index = content(&section, "_index.md");

        assert!(index.contains(r#"<button class="filter-btn active" data-category="all">All Assets</button>"#));
        assert!(index.contains(r#"<button class="filter-btn" data-category="access">Access & Identity</button>"#));
        assert!(index.contains(r#"data-category="data" href="/assets/data/databases/""#));
        assert!(index.contains("card.dataset.category === category"));

        let controls = render(Dataset::Controls, &context(None));
        assert!(!content(&controls, "_index.md").contains("filter-btn"));
    }

    #[test]
    fn unique_slug_counts_up() {
        let mut used = HashSet::new();
        assert_eq!(unique_slug("a".into(), &mut used), "a");
        assert_eq!(unique_slug("a".into(), &mut used), "a-2");
        assert_eq!(unique_slug("a".into(), &mut used), "a-3");
        assert_eq!(unique_slug(String::new(), &mut used), "item");
    }
}
