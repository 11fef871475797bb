//! Icon lookup with layered fallbacks. Resolution never fails.

use std::path::{Path, PathBuf};

use frameworkgen_shared::Dataset;
use tracing::{debug, warn};

use crate::category;

const SVG_OPEN: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" xmlns="http://www.w3.org/2000/svg">"#;

const FALLBACK_CONTROL_ICON: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" xmlns="http://www.w3.org/2000/svg">
<path d="M12 15l2 2 4-4"/>
<path d="M21 12c.552 0 1-.448 1-1s-.448-1-1-1h-1V8a4 4 0 0 0-4-4H7a4 4 0 0 0-4 4v2H2c-.552 0-1 .448-1 1s.448 1 1 1h1v2a4 4 0 0 0 4 4h9a4 4 0 0 0 4-4v-2h1z"/>
</svg>"#;

const FALLBACK_GOVERNANCE_ICON: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" xmlns="http://www.w3.org/2000/svg">
<path d="M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z"/>
<polyline points="14,2 14,8 20,8"/>
<line x1="16" y1="13" x2="8" y2="13"/>
<line x1="16" y1="17" x2="8" y2="17"/>
<polyline points="10,9 9,9 8,9"/>
</svg>"#;

const HERO_SHIELD: &str = r#"<svg viewBox="0 0 24 24" width="80" height="80" fill="none" stroke="currentColor" stroke-width="1.5" xmlns="http://www.w3.org/2000/svg">
<path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"/>
</svg>"#;

const HERO_STAR: &str = r#"<svg viewBox="0 0 24 24" width="80" height="80" fill="none" stroke="currentColor" stroke-width="1.5" xmlns="http://www.w3.org/2000/svg">
<path d="M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z"/>
</svg>"#;

const HERO_BOX: &str = r#"<svg viewBox="0 0 24 24" width="80" height="80" fill="none" stroke="currentColor" stroke-width="1.5" xmlns="http://www.w3.org/2000/svg">
<path d="M4 7v10c0 2.21 0 3.21.59 3.8.59.59 1.59.59 3.8.59h8.22c2.21 0 3.21 0 3.8-.59.59-.59.59-1.59.59-3.8V7M4 7l8-4 8 4M4 7l8 4 8-4"/>
</svg>"#;

/// Inline path data for well-known assets.
fn asset_path(name: &str) -> Option<&'static str> {
    let path = match name {
        "Backups" => "M20 6L9 17l-5-5",
        "Changes" => "M11 4H4a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2v-7 m0 0l-7-7 m0 0l-3 3.5M11 4l3.5 3",
        "Cloud environment" => "M18 10h-1.26A8 8 0 1 0 9 20h9a5 5 0 0 0 0-10z",
        "Compute" | "Systems" => "M4 4v5h.582m15.356 2A8.001 8.001 0 0 0 4.582 9m0 0H9m11 11v-5h-.581m0 0a8.003 8.003 0 0 1-15.357-2m15.357 2H15",
        "Customer" | "Users" => "M20 21v-2a4 4 0 0 0-3-3.87 M16 3.13a4 4 0 0 1 0 7.75 M12 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2 m8-10a4 4 0 1 1-8 0 4 4 0 0 1 8 0z",
        "Databases" => "M12 2c4.97 0 9 1.34 9 3v14c0 1.66-4.03 3-9 3s-9-1.34-9-3V5c0-1.66 4.03-3 9-3z M12 8c4.97 0 9-1.34 9-3 M12 14c4.97 0 9-1.34 9-3",
        "Endpoint devices" => "M9 17H7l-4-4 4-4h2 M15 17h2l4-4-4-4h-2 M12 3l-2 18",
        "Facilities" => "M3 21h18 M5 21V7l8-4v18 M19 21V11l-6-4",
        "File storage" => "M22 19a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h5l2 3h9a2 2 0 0 1 2 2z",
        "Logs" => "M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z M14 2v6h6 M16 13H8 M16 17H8 M10 9H8",
        "Network" => "M16 3a2 2 0 0 1 2 2v4a2 2 0 0 1-2 2 M8 3a2 2 0 0 0-2 2v4a2 2 0 0 0 2 2 M12 11v10 M12 3v8",
        "Object storage" => "M21 16V8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16z",
        "Outsourced controls" => "M16 21v-2a4 4 0 0 0-4-4H5a4 4 0 0 0-4 4v2 M12.5 7a4 4 0 1 1-8 0 4 4 0 0 1 8 0 M16 3.13a4 4 0 0 1 0 7.75",
        "Payment pages" => "M21 12V7H5a2 2 0 0 1 0-4h14v4 M3 5v14a2 2 0 0 0 2 2h16v-5 M7 15h.01 M11 15h4",
        "PCI sensitive" => "M9 12l2 2 4-4 M21 12c0 4.97-4.03 9-9 9s-9-4.03-9-9 4.03-9 9-9 9 4.03 9 9z",
        "Physical media" => "M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z",
        "Policies" => "M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z M14 2v6h6 M16 13H8 M16 17H8",
        "POS devices" => "M21 4H3v16h18V4z M7 8h10 M7 12h4",
        "Process workflows" => "M21 16V8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16z M7.5 4.21l4.5 2.6 4.5-2.6 M12 6.81V17.5",
        "RBAC" => "M9 12l2 2 4-4 M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2 M12.5 7a4 4 0 1 1-8 0 4 4 0 0 1 8 0z",
        "Secrets and certificates" => "M21 2l-2 2m-7.61 7.61a5.5 5.5 0 1 1-7.778 7.778 5.5 5.5 0 0 1 7.777-7.777zm0 0L15.5 7.5m0 0l3 3L22 7l-3-3m-3.5 3.5L19 4",
        "Suppliers" => "M17 21v-2a4 4 0 0 0-4-4H5a4 4 0 0 0-4 4v2 M23 21v-2a4 4 0 0 0-3-3.87 M16 3.13a4 4 0 0 1 0 7.75 M13 7a4 4 0 1 1-8 0 4 4 0 0 1 8 0z",
        "Version control" => "M9 19c-5 1.5-5-2.5-7-3m14 6v-3.87a3.37 3.37 0 0 0-.94-2.61c3.14-.35 6.44-1.54 6.44-7A5.44 5.44 0 0 0 20 4.77 5.07 5.07 0 0 0 19.91 1S18.73.65 16 2.48a13.38 13.38 0 0 0-7 0C6.27.65 5.09 1 5.09 1A5.07 5.07 0 0 0 5 4.77a5.44 5.44 0 0 0-1.5 3.78c0 5.42 3.3 6.61 6.44 7A3.37 3.37 0 0 0 9 18.13V22",
        _ => return None,
    };
    Some(path)
}

/// Inline path data for asset categories; `process` doubles as the generic icon.
fn asset_category_path(key: &str) -> &'static str {
    match key {
        "infrastructure" => "M20 16V7a2 2 0 0 0-2-2H6a2 2 0 0 0-2 2v9m16 0H4m16 0 1.28 2.55a1 1 0 0 1-.9 1.45H3.62a1 1 0 0 1-.9-1.45L4 16",
        "data" => "M12 5c4.97 0 9 1.34 9 3v7c0 1.66-4.03 3-9 3s-9-1.34-9-3V8c0-1.66 4.03-3 9-3z M3 12c0 1.66 4.03 3 9 3s9-1.34 9-3",
        "access" => "M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2 M9 7a4 4 0 1 1 0 8a4 4 0 0 1 0-8z",
        _ => "M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z",
    }
}

fn inline_svg(path: &str) -> String {
    format!("{SVG_OPEN}<path d=\"{path}\"/></svg>")
}

/// Resolves icons from an icons directory, falling back to embedded SVG.
#[derive(Debug, Clone)]
pub struct IconResolver {
    dir: PathBuf,
}

impl IconResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Icon for one asset: its own path, else its category's.
    pub fn asset_icon(&self, name: &str, category: &str) -> String {
        inline_svg(asset_path(name).unwrap_or_else(|| asset_category_path(category)))
    }

    /// Icon for a category heading.
    pub fn category_icon(&self, dataset: Dataset, key: &str) -> String {
        if dataset == Dataset::Assets {
            return inline_svg(asset_category_path(key));
        }

        let candidates = [
            category::icon_file(dataset, key),
            category::default_icon_file(dataset).map(str::to_string),
        ];
        for file in candidates.into_iter().flatten() {
            if let Some(svg) = self.read(&file) {
                return svg;
            }
        }

        debug!(%dataset, category = key, "no icon file found, using embedded icon");
        match dataset {
            Dataset::Governance => FALLBACK_GOVERNANCE_ICON.to_string(),
            _ => FALLBACK_CONTROL_ICON.to_string(),
        }
    }

    /// Large icon for the section index hero, sized to 80×80.
    pub fn hero_icon(&self, dataset: Dataset) -> String {
        if let Some(svg) = dataset.hero_icon_file().and_then(|f| self.read(f)) {
            return svg.replace(
                r#"viewBox="0 0 24 24""#,
                r#"viewBox="0 0 24 24" width="80" height="80""#,
            );
        }

        match dataset {
            Dataset::Assets => HERO_BOX,
            Dataset::Controls => HERO_SHIELD,
            Dataset::Governance => HERO_STAR,
        }
        .to_string()
    }

    fn read(&self, file: &str) -> Option<String> {
        let path = self.dir.join(file);
        if !path.is_file() {
            return None;
        }
        read_icon(&path)
    }
}

fn read_icon(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(svg) => Some(svg.trim_end().to_string()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable icon file, using fallback");
            None
        }
    }
}
