//! How each record type presents itself on a page.

use frameworkgen_shared::{Asset, Control, Dataset, GovernanceItem, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::category;
use crate::cleanup::Tidy;
use crate::icons::IconResolver;

/// A labelled block on an item page: either a paragraph or a bullet list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
    pub items: Vec<String>,
}

impl Field {
    fn text(label: &str, value: &str, tidy: &Tidy) -> Option<Self> {
        let value = tidy.apply(value.trim());
        (!value.is_empty()).then(|| Self {
            label: label.to_string(),
            value,
            items: Vec::new(),
        })
    }

    fn list(label: &str, items: &[String], tidy: &Tidy) -> Option<Self> {
        let items: Vec<String> = items
            .iter()
            .map(|i| tidy.apply(i.trim()))
            .filter(|i| !i.is_empty())
            .collect();
        (!items.is_empty()).then(|| Self {
            label: label.to_string(),
            value: String::new(),
            items,
        })
    }
}

/// A record that can be grouped into categories and rendered as a page.
pub trait SiteRecord: DeserializeOwned {
    const DATASET: Dataset;

    fn validate(&self) -> Result<()>;

    /// Category key used for the page directory.
    fn category(&self) -> String;

    /// Key items are sorted by within a category.
    fn sort_name(&self) -> String;

    fn title(&self) -> String;

    fn slug(&self) -> String;

    /// Dotted identifier, when the dataset has one.
    fn identifier(&self) -> Option<String> {
        None
    }

    /// Lead paragraph for the item page and source of previews.
    fn summary(&self) -> String;

    fn fields(&self, tidy: &Tidy) -> Vec<Field>;

    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn icon(&self, icons: &IconResolver) -> String {
        icons.category_icon(Self::DATASET, &self.category())
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Keyword found in notes → tag it produces.
const TAG_KEYWORDS: &[(&str, &str)] = &[
    ("AWS", "AWS"),
    ("GCP", "GCP"),
    ("SQL", "SQL"),
    ("NoSQL", "NoSQL"),
    ("VM", "VMs"),
    ("K8S", "K8s"),
    ("VPC", "VPC"),
    ("S3", "S3"),
    ("SSO", "SSO"),
    ("MFA", "MFA"),
];

impl SiteRecord for Asset {
    const DATASET: Dataset = Dataset::Assets;

    fn validate(&self) -> Result<()> {
        Asset::validate(self)
    }

    fn category(&self) -> String {
        category::asset_category(self).to_string()
    }

    fn sort_name(&self) -> String {
        self.name.clone()
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn slug(&self) -> String {
        self.resolved_slug()
    }

    fn summary(&self) -> String {
        self.description.clone()
    }

    fn fields(&self, tidy: &Tidy) -> Vec<Field> {
        Field::list("Key Components", &self.notes, tidy)
            .into_iter()
            .collect()
    }

    /// Explicit tags, or tags inferred from keywords in the notes.
    fn tags(&self) -> Vec<String> {
        if !self.tags.is_empty() {
            return self.tags.clone();
        }

        let mut tags: Vec<String> = Vec::new();
        for note in &self.notes {
            for (keyword, tag) in TAG_KEYWORDS {
                if note.contains(keyword) && !tags.iter().any(|t| t == tag) {
                    tags.push(tag.to_string());
                }
            }
        }
        tags
    }

    fn icon(&self, icons: &IconResolver) -> String {
        icons.asset_icon(&self.name, &SiteRecord::category(self))
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

impl SiteRecord for Control {
    const DATASET: Dataset = Dataset::Controls;

    fn validate(&self) -> Result<()> {
        Control::validate(self)
    }

    fn category(&self) -> String {
        Control::category(self)
    }

    fn sort_name(&self) -> String {
        self.name.clone()
    }

    fn title(&self) -> String {
        Control::title(self)
    }

    fn slug(&self) -> String {
        self.resolved_slug()
    }

    fn identifier(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn summary(&self) -> String {
        self.details.clone()
    }

    fn fields(&self, tidy: &Tidy) -> Vec<Field> {
        [
            Field::text("Parameters", &self.parameters, tidy),
            Field::text("Inventory", &self.inventory, tidy),
            Field::text("Control Type", &self.control_type, tidy),
            Field::text("Tested on Asset Inventory", &self.tested_on_asset_inventory, tidy),
            Field::list("Compliance Frameworks", &self.compliance_frameworks, tidy),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Governance
// ---------------------------------------------------------------------------

impl SiteRecord for GovernanceItem {
    const DATASET: Dataset = Dataset::Governance;

    fn validate(&self) -> Result<()> {
        GovernanceItem::validate(self)
    }

    fn category(&self) -> String {
        GovernanceItem::category(self)
    }

    fn sort_name(&self) -> String {
        self.name()
    }

    fn title(&self) -> String {
        GovernanceItem::title(self)
    }

    fn slug(&self) -> String {
        self.resolved_slug()
    }

    fn identifier(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn summary(&self) -> String {
        self.details.clone()
    }

    fn fields(&self, tidy: &Tidy) -> Vec<Field> {
        let name = self.name();
        if GovernanceItem::title(self) == name {
            return Vec::new();
        }
        Field::text("Name", &name, tidy).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_tags_from_notes() {
        let asset = Asset {
            notes: vec![
                "EC2 VMs on AWS".into(),
                "K8S clusters".into(),
                "Managed NoSQL and AWS RDS".into(),
            ],
            ..Asset::new("Compute", "")
        };
        assert_eq!(asset.tags(), vec!["AWS", "VMs", "K8s", "SQL", "NoSQL"]);
    }

    #[test]
    fn explicit_asset_tags_win() {
        let asset = Asset {
            tags: vec!["Vendors".into()],
            notes: vec!["AWS".into()],
            ..Asset::new("Vendor portal", "")
        };
        assert_eq!(SiteRecord::tags(&asset), vec!["Vendors"]);
    }

    #[test]
    fn control_fields_skip_blanks() {
        let control = Control {
            id: "C.Backup.DailySnapshots".into(),
            parameters: "Daily".into(),
            compliance_frameworks: vec!["SOC 2".into()],
            ..Control::default()
        };
        let fields = control.fields(&Tidy::default());
        let labels: Vec<_> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Parameters", "Compliance Frameworks"]);
        assert_eq!(fields[1].items, vec!["SOC 2"]);
    }

    #[test]
    fn governance_sorts_by_id_name() {
        let item = GovernanceItem {
            id: "G.Policy.AcceptableUse".into(),
            expectation: "Staff accept a policy".into(),
            ..GovernanceItem::default()
        };
        assert_eq!(item.sort_name(), "AcceptableUse");
        assert_eq!(item.fields(&Tidy::default())[0].value, "AcceptableUse");
    }
}
