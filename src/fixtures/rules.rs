//! Rule Fixtures

use serde::Deserialize;

use crate::gifts::rules::free_bottle::FreeBottleConfig;

/// Gifting rule configuration in YAML
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RulesFixture {
    /// Free bottle rule settings
    pub free_bottle: FreeBottleConfig,
}
