//! Slug and identifier helpers shared by the normalize and render stages.

use std::sync::LazyLock;

use regex::Regex;

/// Convert text to a URL-safe slug.
///
/// Lowercases, turns every run of characters outside `[a-z0-9]` into a single
/// `-`, and trims leading/trailing dashes. Applying it twice is a no-op.
pub fn slugify(text: &str) -> String {
    static NON_ALNUM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

    let lower = text.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Derive a slug from the last segment of a dotted identifier.
///
/// `C.Account.InactiveDisableDelete` → `inactive-disable-delete`,
/// `G.Policy.MFAEnforcement` → `mfa-enforcement`. Segments that slug to
/// nothing are passed over, so `C.Account.` → `account`.
pub fn slug_from_identifier(id: &str) -> String {
    static LOWER_UPPER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));
    static ACRONYM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid regex"));

    id.trim()
        .rsplit('.')
        .map(|segment| {
            let split = ACRONYM_RE.replace_all(segment, "$1-$2");
            let split = LOWER_UPPER_RE.replace_all(&split, "$1-$2");
            slugify(&split)
        })
        .find(|slug| !slug.is_empty())
        .unwrap_or_default()
}

/// The `n`th dot-delimited segment of an identifier, if present and non-empty.
pub fn identifier_segment(id: &str, n: usize) -> Option<&str> {
    id.split('.').nth(n).map(str::trim).filter(|s| !s.is_empty())
}

/// Category key encoded in an identifier's second segment, lowercased.
///
/// Identifiers with fewer than two segments fall into `unknown`.
pub fn category_from_identifier(id: &str) -> String {
    identifier_segment(id, 1)
        .map(str::to_lowercase)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Capitalize the first letter of every whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str().to_lowercase())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_handles_punctuation() {
        assert_eq!(slugify("Cloud Environment"), "cloud-environment");
        assert_eq!(slugify("PCI Sensitive (SAD, PAN)"), "pci-sensitive-sad-pan");
        assert_eq!(slugify("Self-developed services"), "self-developed-services");
        assert_eq!(slugify("Third-Party reports"), "third-party-reports");
        assert_eq!(slugify("Ingress/Egress"), "ingress-egress");
        assert_eq!(slugify("RBAC"), "rbac");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("  --  "), "");
    }

    #[test]
    fn slugify_is_idempotent() {
        for input in [
            "Secrets and Certificates",
            "PCI Sensitive (SAD, PAN)",
            "  leading and trailing  ",
            "Ünïcode Naïve café",
            "a--b__c",
            "already-a-slug",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn slug_from_identifier_splits_camel_case() {
        assert_eq!(
            slug_from_identifier("C.Account.InactiveDisableDelete"),
            "inactive-disable-delete"
        );
        assert_eq!(slug_from_identifier("G.Policy.Security"), "security");
        assert_eq!(slug_from_identifier("G.Policy.MFAEnforcement"), "mfa-enforcement");
        assert_eq!(slug_from_identifier("C.Logs.Retention90Days"), "retention90-days");
        assert_eq!(slug_from_identifier("Standalone"), "standalone");
    }

    #[test]
    fn slug_from_identifier_skips_empty_trailing_segments() {
        assert_eq!(slug_from_identifier("C.Account."), "account");
        assert_eq!(slug_from_identifier("C.Account.!!!"), "account");
        assert_eq!(slug_from_identifier("G.Policy. "), "policy");
        assert_eq!(slug_from_identifier("..."), "");
    }

    #[test]
    fn slug_from_identifier_is_idempotent_on_slugs() {
        let slug = slug_from_identifier("C.Network.IngressEgressFiltering");
        assert_eq!(slug_from_identifier(&slug), slug);
    }

    #[test]
    fn category_from_identifier_uses_second_segment() {
        assert_eq!(category_from_identifier("C.Account.InactiveDisableDelete"), "account");
        assert_eq!(category_from_identifier("G.ScopeDefinition.Systems"), "scopedefinition");
        assert_eq!(category_from_identifier("Orphan"), "unknown");
        assert_eq!(category_from_identifier("C..Empty"), "unknown");
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("thirdparty"), "Thirdparty");
        assert_eq!(title_case("secure coding"), "Secure Coding");
        assert_eq!(title_case(""), "");
    }
}
