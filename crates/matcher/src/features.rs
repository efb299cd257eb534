use serde::Deserialize;

use crate::normalize::normalize;

/// Why a raw feature payload could not be read
#[derive(Debug, thiserror::Error)]
pub enum FeatureParseError {
    /// Not valid JSON, or JSON of the wrong shape
    #[error("feature payload does not match [{{\"features\": [{{\"description\": ...}}]}}]: {0}")]
    InvalidShape(#[from] serde_json::Error),
}

impl From<FeatureParseError> for vendormatch_common::VendorMatchError {
    fn from(err: FeatureParseError) -> Self {
        Self::malformed_feature_data(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCategory {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    description: String,
}

/// Parse a vendor's raw feature payload into normalized descriptions
///
/// The payload is a JSON array of categories, each holding a `features`
/// array of objects with a `description`. Descriptions are trimmed, blank
/// ones skipped, the rest normalized. Order is preserved, duplicates kept.
pub fn parse_features(raw: &str) -> Result<Vec<String>, FeatureParseError> {
    let categories: Vec<FeatureCategory> = serde_json::from_str(raw)?;

    Ok(categories
        .iter()
        .flat_map(|category| category.features.iter())
        .map(|feature| feature.description.trim())
        .filter(|description| !description.is_empty())
        .map(normalize)
        .collect())
}

/// Like [`parse_features`], with unreadable payloads meaning "no features"
pub fn extract_features(raw: &str) -> Vec<String> {
    parse_features(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_traversal_order() {
        let raw = r#"[
            {"name": "Sales", "features": [
                {"name": "a", "description": "Lead <b>Scoring</b>"},
                {"name": "b", "description": "Pipeline view."}
            ]},
            {"name": "Billing", "features": [
                {"description": "  Invoicing  "}
            ]}
        ]"#;

        assert_eq!(
            parse_features(raw).unwrap(),
            vec!["lead scoring", "pipeline view", "invoicing"]
        );
    }

    #[test]
    fn test_skips_blank_and_missing_descriptions() {
        let raw = r#"[{"features": [{"description": "   "}, {"name": "no description"}, {"description": "Reports"}]}]"#;
        assert_eq!(extract_features(raw), vec!["reports"]);
    }

    #[test]
    fn test_category_without_features_key() {
        let raw = r#"[{"name": "Empty"}, {"features": [{"description": "Dashboards"}]}]"#;
        assert_eq!(extract_features(raw), vec!["dashboards"]);
    }

    #[test]
    fn test_keeps_duplicates() {
        let raw = r#"[{"features": [{"description": "Export"}]}, {"features": [{"description": "export!"}]}]"#;
        assert_eq!(extract_features(raw), vec!["export", "export"]);
    }

    #[test]
    fn test_description_normalizing_to_empty_is_kept() {
        // blankness is checked before normalization
        let raw = r#"[{"features": [{"description": "<br/>"}]}]"#;
        assert_eq!(extract_features(raw), vec![""]);
    }

    #[test]
    fn test_malformed_payloads_yield_no_features() {
        let payloads = [
            "",
            "not json",
            "[",
            "{}",
            "null",
            "42",
            "\"text\"",
            "[1, 2]",
            "[{\"features\": null}]",
            "[{\"features\": {\"description\": \"x\"}}]",
            "[{\"features\": [{\"description\": 5}]}]",
            "[{\"features\": [{\"description\": null}]}]",
            "[{\"features\": [\"plain string\"]}]",
        ];

        for raw in payloads {
            assert!(parse_features(raw).is_err(), "expected parse error for {:?}", raw);
            assert!(extract_features(raw).is_empty(), "expected no features for {:?}", raw);
        }
    }

    #[test]
    fn test_empty_structures_parse_to_nothing() {
        assert!(parse_features("[]").unwrap().is_empty());
        assert!(parse_features("[{\"features\": []}]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_converts_to_malformed_feature_data() {
        let err: vendormatch_common::VendorMatchError = parse_features("oops").unwrap_err().into();
        assert_eq!(err.kind(), "MalformedFeatureData");
    }
}
