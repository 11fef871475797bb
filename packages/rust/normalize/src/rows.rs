//! Row readers that turn CSV exports into typed records.

use std::io::Read;

use csv::StringRecord;
use frameworkgen_shared::{
    Asset, Control, FrameworkError, GovernanceItem, Result, slug_from_identifier, slugify,
};
use tracing::warn;

use crate::text::{clean_text, parse_notes, split_tags};

/// Records read from one CSV, plus what was dropped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RowsRead<T> {
    pub records: Vec<T>,
    /// Rows whose required field was blank after cleaning.
    pub skipped_empty: usize,
    /// Rows the CSV reader could not decode.
    pub skipped_invalid: usize,
}

/// Header positions, looked up by trimmed, case-insensitive name.
struct Columns {
    headers: Vec<String>,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        Self {
            headers: headers.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.headers.iter().position(|h| *h == wanted)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.find(name).ok_or_else(|| {
            FrameworkError::validation(format!("required column '{name}' not found in CSV header"))
        })
    }
}

fn cell<'r>(row: &'r StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| row.get(i)).unwrap_or_default()
}

/// Drive a CSV reader: `resolve` maps the header row to column positions,
/// `build` turns each decoded row into a record or `None` for a blank row.
fn read_rows<R, C, T>(
    input: R,
    resolve: impl FnOnce(&Columns) -> Result<C>,
    build: impl Fn(&C, &StringRecord) -> Option<T>,
) -> Result<RowsRead<T>>
where
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new().from_reader(input);
    let headers = reader
        .headers()
        .map_err(|e| FrameworkError::parse(format!("CSV header: {e}")))?
        .clone();
    let columns = resolve(&Columns::new(&headers))?;

    let mut out = RowsRead {
        records: Vec::new(),
        skipped_empty: 0,
        skipped_invalid: 0,
    };

    for (idx, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(row = idx + 2, error = %e, "skipping undecodable CSV row");
                out.skipped_invalid += 1;
                continue;
            }
        };

        match build(&columns, &row) {
            Some(record) => out.records.push(record),
            None => out.skipped_empty += 1,
        }
    }

    Ok(out)
}

struct AssetColumns {
    name: usize,
    description: Option<usize>,
    notes: Option<usize>,
    category: Option<usize>,
    tags: Option<usize>,
}

/// Assets: `Resources` (required), `Description`, `Notes`, `Category`, `Tags`.
pub fn read_assets<R: Read>(input: R) -> Result<RowsRead<Asset>> {
    read_rows(
        input,
        |cols| {
            Ok(AssetColumns {
                name: cols.require("Resources")?,
                description: cols.find("Description"),
                notes: cols.find("Notes"),
                category: cols.find("Category"),
                tags: cols.find("Tags"),
            })
        },
        |c, row| {
            let name = clean_text(cell(row, Some(c.name)));
            if name.is_empty() {
                return None;
            }
            let category = clean_text(cell(row, c.category));

            Some(Asset {
                slug: slugify(&name),
                description: clean_text(cell(row, c.description)),
                category: (!category.is_empty()).then_some(category),
                tags: split_tags(cell(row, c.tags)),
                notes: parse_notes(&clean_text(cell(row, c.notes))),
                name,
            })
        },
    )
}

struct ControlColumns {
    id: usize,
    name: Option<usize>,
    details: Option<usize>,
    parameters: Option<usize>,
    inventory: Option<usize>,
    control_type: Option<usize>,
    tested: Option<usize>,
    frameworks: Option<usize>,
}

/// Controls: `ID` (required) plus the descriptive columns.
pub fn read_controls<R: Read>(input: R) -> Result<RowsRead<Control>> {
    read_rows(
        input,
        |cols| {
            Ok(ControlColumns {
                id: cols.require("ID")?,
                name: cols.find("Name"),
                details: cols.find("Details"),
                parameters: cols.find("Parameters"),
                inventory: cols.find("Inventory"),
                control_type: cols.find("Control type"),
                tested: cols.find("Tested on asset inventory"),
                frameworks: cols.find("Compliance frameworks"),
            })
        },
        |c, row| {
            let id = clean_text(cell(row, Some(c.id)));
            if id.is_empty() {
                return None;
            }

            Some(Control {
                slug: slug_from_identifier(&id),
                name: clean_text(cell(row, c.name)),
                details: clean_text(cell(row, c.details)),
                parameters: clean_text(cell(row, c.parameters)),
                inventory: clean_text(cell(row, c.inventory)),
                control_type: clean_text(cell(row, c.control_type)),
                tested_on_asset_inventory: clean_text(cell(row, c.tested)),
                compliance_frameworks: split_tags(cell(row, c.frameworks)),
                id,
            })
        },
    )
}

/// Governance: `ID` (required), `Expectation`, `Details`.
pub fn read_governance<R: Read>(input: R) -> Result<RowsRead<GovernanceItem>> {
    read_rows(
        input,
        |cols| Ok((cols.require("ID")?, cols.find("Expectation"), cols.find("Details"))),
        |&(id, expectation, details), row| {
            let id = clean_text(cell(row, Some(id)));
            if id.is_empty() {
                return None;
            }

            Some(GovernanceItem {
                slug: slug_from_identifier(&id),
                expectation: clean_text(cell(row, expectation)),
                details: clean_text(cell(row, details)),
                id,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_from_inline_csv() {
        let csv = "Resources,Description,Notes\n\
                   Cloud environment,\"Accounts,\n projects\",\"- AWS accounts\n- GCP projects\"\n\
                   ,,\n\
                   Users,People,\n";
        let read = read_assets(csv.as_bytes()).unwrap();

        assert_eq!(read.records.len(), 2);
        assert_eq!(read.skipped_empty, 1);
        assert_eq!(read.skipped_invalid, 0);

        let cloud = &read.records[0];
        assert_eq!(cloud.slug, "cloud-environment");
        assert_eq!(cloud.description, "Accounts, projects");
        assert_eq!(cloud.notes, vec!["AWS accounts", "GCP projects"]);
        assert!(cloud.category.is_none());
        assert!(read.records[1].notes.is_empty());
    }

    #[test]
    fn optional_asset_columns() {
        let csv = "Resources,Description,Notes,Category,Tags\nDatabases,SQL,,Data & Storage,\"SQL, NoSQL\"\n";
        let read = read_assets(csv.as_bytes()).unwrap();
        let db = &read.records[0];
        assert_eq!(db.category.as_deref(), Some("Data & Storage"));
        assert_eq!(db.tags, vec!["SQL", "NoSQL"]);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = read_governance("Expectation,Details\nx,y\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("'ID'"));
    }

    #[test]
    fn ragged_rows_are_counted_invalid() {
        let csv = "ID,Expectation,Details\n\
                   G.Policy.Security,Have a policy,Written down\n\
                   G.Review.Annual,Review yearly\n\
                   G.Scope.Systems,Define scope,Systems list\n";
        let read = read_governance(csv.as_bytes()).unwrap();
        assert_eq!(read.records.len(), 2);
        assert_eq!(read.skipped_invalid, 1);
        assert_eq!(read.records[1].slug, "systems");
    }

    #[test]
    fn headers_match_loosely() {
        let csv = " id ,NAME,Control Type\nC.Backup.DailySnapshots,Daily snapshots,Preventive\n";
        let read = read_controls(csv.as_bytes()).unwrap();
        let control = &read.records[0];
        assert_eq!(control.slug, "daily-snapshots");
        assert_eq!(control.name, "Daily snapshots");
        assert_eq!(control.control_type, "Preventive");
        assert_eq!(control.details, "");
    }

    #[test]
    fn trailing_dot_ids_keep_a_slug() {
        let csv = "ID,Name
C.Account.,Account baseline
C.Account.MFA,MFA
";
        let read = read_controls(csv.as_bytes()).unwrap();
        assert_eq!(read.records.len(), 2);
        assert_eq!(read.records[0].slug, "account");
        assert!(read.records[0].validate().is_ok());

        let read = read_governance("ID,Expectation
G.Policy.,Have one
".as_bytes()).unwrap();
        assert_eq!(read.records[0].slug, "policy");
        assert_eq!(read.records[0].category(), "policy");
    }
}
