use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::CanonConfig;

/// JSON schema for `canon.toml`, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(CanonConfig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_both_sections() {
        let schema = serde_json::to_value(json_schema()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("analysis").is_some(), "{schema:#}");
        assert!(properties.get("logging").is_some(), "{schema:#}");
        assert!(
            schema["definitions"]["AnalysisConfig"]["properties"]
                .get("fold_bridge_methods")
                .is_some(),
            "{schema:#}"
        );
    }
}
