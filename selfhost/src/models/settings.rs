//! Baseline site settings seeded on install

use serde_json::{json, Value};

/// A row in the `settings` table
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SettingRow {
    pub key: String,
    pub value: Value,
}

impl SettingRow {
    pub fn new(key: &str, value: Value) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

/// Default homepage section order
pub const HOMEPAGE_SECTIONS: [&str; 6] =
    ["hero", "about", "services", "events", "testimonials", "contact"];

pub const DEFAULT_SITE_NAME: &str = "My Site";

/// Rows written on every install, in order
pub fn baseline_settings() -> Vec<SettingRow> {
    vec![
        SettingRow::new("maintenance_mode", json!(false)),
        SettingRow::new("homepage_sections", json!(HOMEPAGE_SECTIONS)),
        SettingRow::new("site_name", json!(DEFAULT_SITE_NAME)),
        SettingRow::new("offers", json!([])),
    ]
}
