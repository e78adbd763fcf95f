//! Render configuration
//!
//! Every key has a default. Tables given in a configuration file are merged
//! over the built-in ones, so a file naming one scope or role keeps the rest.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Title of the checklist template when none is configured
pub const DEFAULT_TITLE: &str = "SPARK Process Checklist";

const DEFAULT_SCOPES: [(&str, &str); 4] = [
    ("All", "Up to and including SPARK Platinum"),
    ("Not_Platinum", "Up to and including SPARK Gold"),
    ("Ada", "Interfaces and units containing Ada"),
    ("Automated", "N/A - Fully automated"),
];

const DEFAULT_ROLES: [(&str, &str, &str); 3] = [
    (
        "gt",
        "https://support.adacore.com/csm?id=case&case={}",
        "AdaCore Ticket ({})",
    ),
    (
        "lrm",
        "http://www.ada-auth.org/standards/22rm/html/RM-{}.html",
        "Ada 2022 LRM ({})",
    ),
    (
        "gnatattr",
        "https://docs.adacore.com/R/docs/gnat-25.1/gnat_rm/html/gnat_rm/gnat_rm/implementation_defined_attributes.html#attribute-{}",
        "GNAT Attribute Extension ({})",
    ),
];

/// Expansion of a standard-reference role such as `:lrm:`
///
/// `{}` in either template is replaced by the role argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleTemplate {
    /// Link destination
    pub url: String,
    /// Visible label
    pub label: String,
}

impl RoleTemplate {
    /// Create template
    #[must_use]
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }

    /// Label and URL for one argument
    #[must_use]
    pub fn expand(&self, argument: &str) -> (String, String) {
        (
            self.label.replace("{}", argument),
            self.url.replace("{}", argument),
        )
    }
}

/// Settings shared by every document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Checklist template title
    pub title: String,
    /// Base URL of the published handbook, used by Markdown step links
    pub pages_base_url: Option<String>,
    /// Scope literal to description
    #[serde(deserialize_with = "scopes_over_defaults")]
    pub scopes: IndexMap<String, String>,
    /// Standard-reference roles
    #[serde(deserialize_with = "roles_over_defaults")]
    pub roles: IndexMap<String, RoleTemplate>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            pages_base_url: None,
            scopes: default_scopes(),
            roles: default_roles(),
        }
    }
}

impl RenderConfig {
    /// Description of a scope literal, the literal itself when unknown
    #[must_use]
    pub fn scope_description<'a>(&'a self, literal: &'a str) -> &'a str {
        self.scopes.get(literal).map_or(literal, String::as_str)
    }
}

fn default_scopes() -> IndexMap<String, String> {
    DEFAULT_SCOPES
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn default_roles() -> IndexMap<String, RoleTemplate> {
    DEFAULT_ROLES
        .iter()
        .map(|(name, url, label)| ((*name).to_string(), RoleTemplate::new(*url, *label)))
        .collect()
}

fn scopes_over_defaults<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut scopes = default_scopes();
    scopes.extend(IndexMap::<String, String>::deserialize(deserializer)?);
    Ok(scopes)
}

fn roles_over_defaults<'de, D>(deserializer: D) -> Result<IndexMap<String, RoleTemplate>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut roles = default_roles();
    roles.extend(IndexMap::<String, RoleTemplate>::deserialize(deserializer)?);
    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_cover_builtin_tables() {
        let config = RenderConfig::default();
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.scope_description("Automated"), "N/A - Fully automated");
        assert_eq!(config.scope_description("Unknown"), "Unknown");
        assert_eq!(
            config.roles.get("lrm").map(|r| r.expand("3.10")),
            Some((
                "Ada 2022 LRM (3.10)".to_string(),
                "http://www.ada-auth.org/standards/22rm/html/RM-3.10.html".to_string()
            ))
        );
    }

    #[test]
    fn file_tables_merge_over_defaults() {
        let config: RenderConfig = toml::from_str(
            r#"
title = "Handbook"

[scopes]
Ada = "Ada units"

[roles.cwe]
url = "https://cwe.mitre.org/data/definitions/{}.html"
label = "CWE-{}"
"#,
        )
        .unwrap();

        assert_eq!(config.title, "Handbook");
        assert_eq!(config.scope_description("Ada"), "Ada units");
        assert_eq!(config.scope_description("All"), "Up to and including SPARK Platinum");
        assert_eq!(config.roles.len(), 4);
        assert_eq!(config.roles.get("cwe").map(|r| r.label.as_str()), Some("CWE-{}"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<RenderConfig>("colour = \"blue\"").is_err());
        assert!(toml::from_str::<RenderConfig>("[roles.x]\nurl = \"u\"\nlabel = \"l\"\nicon = \"i\"").is_err());
    }
}
