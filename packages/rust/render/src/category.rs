//! Category keys and their display text, for every dataset.
//!
//! Page text, icon file names, and asset grouping all come from the tables
//! here so the three sections cannot drift apart.

use frameworkgen_shared::{Asset, Dataset, title_case};

// ---------------------------------------------------------------------------
// Asset grouping
// ---------------------------------------------------------------------------

const INFRASTRUCTURE_ASSETS: &[&str] = &["Cloud environment", "Compute", "Network", "Facilities"];
const DATA_ASSETS: &[&str] = &["Databases", "File storage", "Object storage", "Backups", "Logs"];
const ACCESS_ASSETS: &[&str] = &["Users", "RBAC", "Secrets and certificates", "Customer"];

/// Category key for an asset.
///
/// An explicit category is mapped through a fixed table (unknown labels land
/// in `process`); otherwise well-known asset names pick their group.
pub fn asset_category(asset: &Asset) -> &'static str {
    if let Some(label) = asset.category.as_deref() {
        return match label.trim().to_lowercase().as_str() {
            "infrastructure" | "physical" => "infrastructure",
            "data & storage" => "data",
            "access & identity" => "access",
            _ => "process",
        };
    }

    let name = asset.name.as_str();
    if INFRASTRUCTURE_ASSETS.contains(&name) {
        "infrastructure"
    } else if DATA_ASSETS.contains(&name) {
        "data"
    } else if ACCESS_ASSETS.contains(&name) {
        "access"
    } else {
        "process"
    }
}

// ---------------------------------------------------------------------------
// Display text
// ---------------------------------------------------------------------------

/// Heading shown for a category.
pub fn display_name(dataset: Dataset, key: &str) -> String {
    let known = match dataset {
        Dataset::Assets => match key {
            "infrastructure" => Some("Infrastructure"),
            "data" => Some("Data & Storage"),
            "access" => Some("Access & Identity"),
            "process" => Some("Process & Governance"),
            _ => None,
        },
        Dataset::Controls => match key {
            "account" => Some("Account Management"),
            "auth" => Some("Authentication & Access"),
            "availability" => Some("High Availability"),
            "awareness" => Some("Security Awareness"),
            "backup" => Some("Backup & Recovery"),
            "code" => Some("Code Security"),
            "data" => Some("Data Protection"),
            "encryption" => Some("Encryption & Cryptography"),
            "endpoint" => Some("Endpoint Security"),
            "facility" => Some("Physical Security"),
            "host" => Some("Host Security"),
            "ident" => Some("Identity Management"),
            "incident" => Some("Incident Response"),
            "logs" => Some("Logging & Monitoring"),
            "mail" => Some("Email Security"),
            "network" => Some("Network Security"),
            "pci" => Some("PCI Compliance"),
            "securecoding" => Some("Secure Development"),
            "thirdparty" => Some("Third-Party Risk"),
            _ => None,
        },
        Dataset::Governance => match key {
            "policy" => Some("Policies"),
            "review" => Some("Reviews"),
            "scope" => Some("Scope"),
            "scopedefinition" => Some("Scope Definition"),
            "standard" => Some("Standards"),
            "protocol" => Some("Protocols"),
            _ => None,
        },
    };

    match (known, dataset) {
        (Some(name), _) => name.to_string(),
        (None, Dataset::Controls) => format!("{} Controls", title_case(key)),
        (None, _) => title_case(key),
    }
}

/// One-sentence summary shown under a category heading.
pub fn description(dataset: Dataset, key: &str) -> String {
    let known = match dataset {
        Dataset::Assets => match key {
            "infrastructure" => Some("Cloud platforms, compute, networks, and facilities that run the product."),
            "data" => Some("Databases, storage, backups, and logs that hold product and customer data."),
            "access" => Some("People, roles, secrets, and customer identities that grant access to systems."),
            "process" => Some("Workflows, policies, suppliers, and other operational assets that need oversight."),
            _ => None,
        },
        Dataset::Controls => match key {
            "account" => Some("Controls related to user account management, access provisioning, and account lifecycle processes."),
            "auth" => Some("Controls for authentication mechanisms, password policies, and access verification processes."),
            "availability" => Some("Controls ensuring system uptime, redundancy, and disaster recovery capabilities."),
            "awareness" => Some("Controls for security training, education, and awareness programs for users and staff."),
            "backup" => Some("Controls for data backup strategies, recovery procedures, and backup integrity verification."),
            "code" => Some("Controls for secure software development, code review processes, and development lifecycle security."),
            "data" => Some("Controls for data protection, classification, retention, and secure data handling practices."),
            "encryption" => Some("Controls for cryptographic implementations, key management, and data encryption standards."),
            "endpoint" => Some("Controls for securing endpoint devices, workstations, and mobile device management."),
            "facility" => Some("Controls for physical security, facility access, environmental protections, and premises security."),
            "host" => Some("Controls for server and host system security, hardening, and system integrity monitoring."),
            "ident" => Some("Controls for identity verification, user onboarding processes, and identity lifecycle management."),
            "incident" => Some("Controls for incident response procedures, detection capabilities, and security event handling."),
            "logs" => Some("Controls for logging systems, log monitoring, alerting, and audit trail management."),
            "mail" => Some("Controls for email security, anti-phishing measures, and email authentication protocols."),
            "network" => Some("Controls for network security, segmentation, monitoring, and infrastructure protection."),
            "pci" => Some("Controls specifically designed to meet PCI-DSS compliance requirements and card data protection."),
            "securecoding" => Some("Controls for secure coding practices, vulnerability management, and application security testing."),
            "thirdparty" => Some("Controls for third-party risk management, vendor assessments, and supply chain security."),
            _ => None,
        },
        Dataset::Governance => match key {
            "policy" => Some("Foundational governance documents that establish organizational security standards, procedures, and requirements."),
            "review" => Some("Regular assessment and evaluation processes to ensure ongoing compliance and security effectiveness."),
            "scope" | "scopedefinition" => Some("Definitions and boundaries that establish what systems, processes, and areas are covered by the security program."),
            "standard" => Some("Detailed technical specifications and procedures that implement governance policies in practice."),
            "protocol" => Some("Step-by-step operational procedures and methodologies for implementing security practices."),
            _ => None,
        },
    };

    match (known, dataset) {
        (Some(text), _) => text.to_string(),
        (None, Dataset::Controls) => format!("Security controls in the {key} category."),
        (None, Dataset::Governance) => format!("Governance items in the {key} category."),
        (None, Dataset::Assets) => format!("Assets in the {key} category."),
    }
}

// ---------------------------------------------------------------------------
// Icon files
// ---------------------------------------------------------------------------

const CONTROL_CATEGORIES: &[&str] = &[
    "account", "auth", "availability", "awareness", "backup", "code", "data", "encryption",
    "endpoint", "facility", "host", "ident", "incident", "logs", "mail", "network", "pci",
    "securecoding", "thirdparty",
];

const GOVERNANCE_CATEGORIES: &[&str] =
    &["policy", "review", "scopedefinition", "standard", "protocol"];

/// Icon file for a category, or `None` when the dataset uses inline icons.
pub fn icon_file(dataset: Dataset, key: &str) -> Option<String> {
    match dataset {
        Dataset::Assets => None,
        Dataset::Controls if CONTROL_CATEGORIES.contains(&key) => Some(format!("control-{key}.svg")),
        Dataset::Governance if key == "scope" => Some("governance-scopedefinition.svg".into()),
        Dataset::Governance if GOVERNANCE_CATEGORIES.contains(&key) => {
            Some(format!("governance-{key}.svg"))
        }
        _ => default_icon_file(dataset).map(str::to_string),
    }
}

/// Icon file used when a category has none of its own.
pub fn default_icon_file(dataset: Dataset) -> Option<&'static str> {
    match dataset {
        Dataset::Assets => None,
        Dataset::Controls => Some("assets.svg"),
        Dataset::Governance => Some("governance-policy.svg"),
    }
}
