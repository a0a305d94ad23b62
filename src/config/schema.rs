//! JSON Schema validation for laravel-init profiles

use anyhow::{Result, anyhow};
use jsonschema::Validator;
use serde_json::Value;

/// Compile the embedded JSON schema for profiles
pub fn get_schema() -> Result<Validator> {
    let schema_str = include_str!("../../docs/profile.schema.json");
    let schema: Value = serde_json::from_str(schema_str)
        .map_err(|e| anyhow!("Failed to parse embedded JSON schema: {e}"))?;

    jsonschema::draft7::new(&schema).map_err(|e| anyhow!("Failed to compile JSON schema: {e}"))
}

/// Validate a profile document against the schema
pub fn validate_against_schema(profile: &Value) -> Result<()> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(profile)
        .map(|e| format!("  - {e}"))
        .collect();

    if !error_messages.is_empty() {
        return Err(anyhow!(
            "Profile validation failed:\n{}",
            error_messages.join("\n")
        ));
    }

    Ok(())
}
