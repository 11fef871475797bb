//! Fixed-schema YAML front matter for generated pages.

use std::collections::BTreeMap;

/// Front matter in emission order: `title`, `description`, `date`, `draft`,
/// `weight`, then any extra string params sorted by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub date: String,
    pub draft: bool,
    pub weight: usize,
    pub params: BTreeMap<String, String>,
}

impl FrontMatter {
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn render(&self) -> String {
        let mut fm = String::from("---\n");
        fm.push_str(&format!("title: \"{}\"\n", escape_yaml_string(&self.title)));
        fm.push_str(&format!(
            "description: \"{}\"\n",
            escape_yaml_string(&self.description)
        ));
        fm.push_str(&format!("date: {}\n", self.date));
        fm.push_str(&format!("draft: {}\n", self.draft));
        fm.push_str(&format!("weight: {}\n", self.weight));
        for (key, value) in &self.params {
            fm.push_str(&format!("{key}: \"{}\"\n", escape_yaml_string(value)));
        }
        fm.push_str("---\n");
        fm
    }
}

/// Escape special characters in a double-quoted YAML string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Weight for the item at zero-based `position`: 10, 20, 30, ...
pub fn weight_for(position: usize) -> usize {
    (position + 1) * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrontMatter {
        FrontMatter {
            title: r#"Say "hi" \ bye"#.into(),
            description: "Plain".into(),
            date: "2024-01-01".into(),
            draft: false,
            weight: 20,
            params: BTreeMap::new(),
        }
    }

    #[test]
    fn renders_fixed_order_and_escapes() {
        let fm = sample()
            .param("governance_id", "G.Policy.Security")
            .param("governance_category", "policy")
            .render();

        assert_eq!(
            fm,
            "---\n\
             title: \"Say \\\"hi\\\" \\\\ bye\"\n\
             description: \"Plain\"\n\
             date: 2024-01-01\n\
             draft: false\n\
             weight: 20\n\
             governance_category: \"policy\"\n\
             governance_id: \"G.Policy.Security\"\n\
             ---\n"
        );
    }

    #[test]
    fn rendered_front_matter_is_valid_yaml() {
        let fm = sample().param("count", "12").render();
        let body = fm.trim_start_matches("---\n").trim_end_matches("---\n");
        let parsed: serde_yaml::Value = serde_yaml::from_str(body).expect("valid yaml");
        assert_eq!(parsed["title"].as_str(), Some(r#"Say "hi" \ bye"#));
        assert_eq!(parsed["weight"].as_u64(), Some(20));
        assert_eq!(parsed["count"].as_str(), Some("12"));
    }

    #[test]
    fn weights_step_by_ten() {
        assert_eq!(weight_for(0), 10);
        assert_eq!(weight_for(4), 50);
    }
}
