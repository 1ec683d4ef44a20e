use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::LatheConfig;

/// JSON schema for `lathe.toml`, for editor TOML integrations and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(LatheConfig)
}

/// [`json_schema`] rendered as pretty JSON.
pub fn json_schema_string() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json_schema())
}
