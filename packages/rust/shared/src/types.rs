//! Core domain types: datasets and the records each one carries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FrameworkError, Result};
use crate::lenient;
use crate::text::{category_from_identifier, identifier_segment, slug_from_identifier, slugify};

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// One of the three compliance-framework data sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Assets,
    Controls,
    Governance,
}

impl Dataset {
    /// Every dataset, in pipeline order.
    pub const ALL: [Dataset; 3] = [Dataset::Assets, Dataset::Controls, Dataset::Governance];

    /// CLI / config name (`assets`, `controls`, `governance`).
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Assets => "assets",
            Dataset::Controls => "controls",
            Dataset::Governance => "governance",
        }
    }

    /// Spreadsheet tab title.
    pub fn title(self) -> &'static str {
        match self {
            Dataset::Assets => "Assets",
            Dataset::Controls => "Controls",
            Dataset::Governance => "Governance",
        }
    }

    /// Top-level YAML key holding the record list.
    pub fn records_key(self) -> &'static str {
        self.name()
    }

    /// Content section directory name.
    pub fn section(self) -> &'static str {
        self.name()
    }

    /// CSV export file name, e.g. `Control Framework - Assets.csv`.
    pub fn csv_filename(self) -> String {
        format!("Control Framework - {}.csv", self.title())
    }

    /// YAML data file name, e.g. `assets.yml`.
    pub fn yaml_filename(self) -> String {
        format!("{}.yml", self.name())
    }

    /// Singular and plural nouns used in page text.
    pub fn nouns(self) -> (&'static str, &'static str) {
        match self {
            Dataset::Assets => ("asset", "assets"),
            Dataset::Controls => ("control", "controls"),
            Dataset::Governance => ("governance item", "governance items"),
        }
    }

    /// Hero icon shown on the section index, looked up in the icons directory.
    pub fn hero_icon_file(self) -> Option<&'static str> {
        match self {
            Dataset::Assets => None,
            Dataset::Controls => Some("shield.svg"),
            Dataset::Governance => Some("star.svg"),
        }
    }

    /// Spreadsheet tab id (gid) of the published framework sheet.
    pub fn default_gid(self) -> &'static str {
        match self {
            Dataset::Assets => "1448922229",
            Dataset::Controls => "2012626515",
            Dataset::Governance => "627966053",
        }
    }

    /// Header columns a downloaded CSV must carry.
    pub fn expected_headers(self) -> &'static [&'static str] {
        match self {
            Dataset::Assets => &["Resources", "Description", "Notes"],
            Dataset::Controls => &[
                "ID",
                "Name",
                "Details",
                "Parameters",
                "Inventory",
                "Control type",
                "Tested on asset inventory",
            ],
            Dataset::Governance => &["ID", "Expectation", "Details"],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = FrameworkError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Dataset::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Dataset::ALL.iter().map(|d| d.name()).collect();
                FrameworkError::validation(format!(
                    "unknown dataset '{s}' (expected one of: {})",
                    names.join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// SheetSpec
// ---------------------------------------------------------------------------

/// Where a dataset lives in the spreadsheet and what its export must look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSpec {
    pub dataset: Dataset,
    /// Tab title, used in messages.
    pub title: String,
    /// Tab identifier for the CSV export URL.
    pub gid: String,
    /// File name written under the source directory.
    pub filename: String,
    /// Header names that must appear in the first row.
    pub expected_headers: Vec<String>,
}

impl SheetSpec {
    /// Spec with the dataset's default gid.
    pub fn for_dataset(dataset: Dataset) -> Self {
        Self {
            dataset,
            title: dataset.title().to_string(),
            gid: dataset.default_gid().to_string(),
            filename: dataset.csv_filename(),
            expected_headers: dataset
                .expected_headers()
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }

    /// Replace the tab id, keeping everything else.
    pub fn with_gid(mut self, gid: impl Into<String>) -> Self {
        self.gid = gid.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A foundational element subject to control and oversight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub notes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: String,
}

impl Asset {
    /// Build an asset with its slug derived from the name.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            name,
            description: description.into(),
            slug,
            ..Self::default()
        }
    }

    /// Explicit slug when present, otherwise derived from the name.
    pub fn resolved_slug(&self) -> String {
        if self.slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            slugify(&self.slug)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FrameworkError::validation("asset has an empty name"));
        }
        if self.resolved_slug().is_empty() {
            return Err(FrameworkError::validation(format!(
                "asset '{}' does not produce a usable slug",
                self.name
            )));
        }
        Ok(())
    }
}

/// A security control, identified by a dotted id such as `C.Account.InactiveDisableDelete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub details: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub parameters: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub inventory: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub control_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub tested_on_asset_inventory: String,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub compliance_frameworks: Vec<String>,
}

impl Control {
    /// Category key from the id (`C.Account.X` → `account`).
    pub fn category(&self) -> String {
        category_from_identifier(&self.id)
    }

    /// Display title: the name, falling back to the id.
    pub fn title(&self) -> String {
        if self.name.trim().is_empty() {
            self.id.clone()
        } else {
            self.name.clone()
        }
    }

    pub fn resolved_slug(&self) -> String {
        if self.slug.trim().is_empty() {
            slug_from_identifier(&self.id)
        } else {
            slugify(&self.slug)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(FrameworkError::validation("control has an empty id"));
        }
        if self.resolved_slug().is_empty() {
            return Err(FrameworkError::validation(format!(
                "control '{}' does not produce a usable slug",
                self.id
            )));
        }
        Ok(())
    }
}

/// A governance expectation, identified by a dotted id such as `G.Policy.Security`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceItem {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub expectation: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub slug: String,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub details: String,
}

impl GovernanceItem {
    pub fn category(&self) -> String {
        category_from_identifier(&self.id)
    }

    /// Third id segment (`G.Policy.Security` → `Security`), or the whole id.
    pub fn name(&self) -> String {
        identifier_segment(&self.id, 2)
            .map(str::to_string)
            .unwrap_or_else(|| self.id.clone())
    }

    /// Display title: the expectation, falling back to the name.
    pub fn title(&self) -> String {
        if self.expectation.trim().is_empty() {
            self.name()
        } else {
            self.expectation.clone()
        }
    }

    pub fn resolved_slug(&self) -> String {
        if self.slug.trim().is_empty() {
            slug_from_identifier(&self.id)
        } else {
            slugify(&self.slug)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(FrameworkError::validation("governance item has an empty id"));
        }
        if self.resolved_slug().is_empty() {
            return Err(FrameworkError::validation(format!(
                "governance item '{}' does not produce a usable slug",
                self.id
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DatasetMeta
// ---------------------------------------------------------------------------

/// The `meta:` block written next to the records of every data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub title: String,
    pub description: String,
    pub count: usize,
    pub source: String,
    pub generated_by: String,
}

impl DatasetMeta {
    /// Fallback metadata used when a data file carries none (or an invalid block).
    pub fn defaults(dataset: Dataset, count: usize) -> Self {
        let (title, description) = match dataset {
            Dataset::Assets => (
                "Secure Product Model Assets",
                "Foundational elements subject to control and oversight",
            ),
            Dataset::Controls => (
                "Secure Product Model Controls",
                "Security controls and measures for the product framework",
            ),
            Dataset::Governance => (
                "Secure Product Model Governance",
                "Governance policies and expectations for the product framework",
            ),
        };

        Self {
            title: title.to_string(),
            description: description.to_string(),
            count,
            source: dataset.yaml_filename(),
            generated_by: "frameworkgen render".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_parses_case_insensitively() {
        assert_eq!("Controls".parse::<Dataset>().unwrap(), Dataset::Controls);
        assert_eq!(" governance ".parse::<Dataset>().unwrap(), Dataset::Governance);

        let err = "policies".parse::<Dataset>().unwrap_err();
        assert!(err.to_string().contains("assets, controls, governance"));
    }

    #[test]
    fn dataset_file_names() {
        assert_eq!(Dataset::Assets.csv_filename(), "Control Framework - Assets.csv");
        assert_eq!(Dataset::Governance.yaml_filename(), "governance.yml");
        assert_eq!(Dataset::Controls.records_key(), "controls");
    }

    #[test]
    fn sheet_spec_gid_override() {
        let spec = SheetSpec::for_dataset(Dataset::Controls).with_gid("42");
        assert_eq!(spec.gid, "42");
        assert_eq!(spec.filename, "Control Framework - Controls.csv");
        assert!(spec.expected_headers.iter().any(|h| h == "Control type"));
    }

    #[test]
    fn asset_slug_is_derived_from_name() {
        let asset = Asset::new("PCI Sensitive (SAD, PAN)", "Card data");
        assert_eq!(asset.slug, "pci-sensitive-sad-pan");
        assert_eq!(asset.resolved_slug(), "pci-sensitive-sad-pan");
    }

    #[test]
    fn control_derivations() {
        let control = Control {
            id: "C.Account.InactiveDisableDelete".into(),
            ..Control::default()
        };
        assert_eq!(control.category(), "account");
        assert_eq!(control.title(), "C.Account.InactiveDisableDelete");
        assert_eq!(control.resolved_slug(), "inactive-disable-delete");
    }

    #[test]
    fn governance_derivations() {
        let item = GovernanceItem {
            id: "G.Policy.Security".into(),
            ..GovernanceItem::default()
        };
        assert_eq!(item.category(), "policy");
        assert_eq!(item.name(), "Security");
        assert_eq!(item.title(), "Security");

        let short = GovernanceItem {
            id: "G.Policy".into(),
            expectation: "Policies exist".into(),
            ..GovernanceItem::default()
        };
        assert_eq!(short.name(), "G.Policy");
        assert_eq!(short.title(), "Policies exist");
    }

    #[test]
    fn lenient_fields_coerce_scalars() {
        let yaml = "id: C.Backup.Daily\nname: 42\ndetails: ~\ncompliance_frameworks: SOC2\n";
        let control: Control = serde_yaml::from_str(yaml).expect("lenient parse");
        assert_eq!(control.name, "42");
        assert_eq!(control.details, "");
        assert_eq!(control.compliance_frameworks, vec!["SOC2".to_string()]);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let yaml = "expectation: Something\n";
        assert!(serde_yaml::from_str::<GovernanceItem>(yaml).is_err());
    }

    #[test]
    fn asset_serialization_skips_empty_optionals() {
        let asset = Asset::new("Users", "People with access");
        let yaml = serde_yaml::to_string(&asset).expect("serialize");
        assert!(!yaml.contains("category"));
        assert!(!yaml.contains("notes"));
        assert!(yaml.contains("slug: users"));
    }

    #[test]
    fn validation_rejects_blank_identifiers() {
        assert!(Asset::default().validate().is_err());
        assert!(Control::default().validate().is_err());
        let punct = GovernanceItem {
            id: "G.Policy.---".into(),
            ..GovernanceItem::default()
        };
        assert!(punct.validate().is_err());
    }
}
