//! Vendor dataset loading
//!
//! Rows come from a CSV export (header row required), a JSON array of
//! objects, or JSON Lines. Fields are kept raw here; defaults and trimming
//! are applied by the catalog builder.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::info;
use vendormatch_common::{Result, VendorMatchError};

/// One raw dataset row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: Option<f64>,

    #[serde(default)]
    pub main_category: Option<String>,

    /// Serialized feature structure (`Features` column in CSV exports)
    #[serde(default, alias = "Features", deserialize_with = "deserialize_raw_features")]
    pub raw_features: Option<String>,

    #[serde(default)]
    pub product_url: Option<String>,

    #[serde(default)]
    pub seller: Option<String>,

    #[serde(default)]
    pub full_pricing_page: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingField {
    Number(f64),
    Text(String),
}

/// Numbers and numeric strings are ratings; anything else counts as missing
fn deserialize_rating<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = Option::<RatingField>::deserialize(deserializer)
        .ok()
        .flatten()
        .and_then(|field| match field {
            RatingField::Number(n) => Some(n),
            RatingField::Text(s) => s.trim().parse::<f64>().ok(),
        })
        .filter(|n| n.is_finite());
    Ok(rating)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFeaturesField {
    Text(String),
    Structured(serde_json::Value),
}

/// JSON datasets may inline the feature structure instead of a string
fn deserialize_raw_features<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawFeaturesField>::deserialize(deserializer)?.map(|field| match field {
            RawFeaturesField::Text(s) => s,
            RawFeaturesField::Structured(value) => value.to_string(),
        }),
    )
}

/// Load all rows from a dataset file, picking the format from its extension
pub fn load_records(path: &Path) -> Result<Vec<VendorRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let file = File::open(path).map_err(|e| {
        VendorMatchError::dataset(format!("Failed to open dataset {}: {}", path.display(), e))
    })?;

    let records = match extension.as_deref() {
        Some("csv") => read_csv(file)?,
        Some("json") => read_json(BufReader::new(file))?,
        Some("jsonl") | Some("ndjson") => read_jsonl(BufReader::new(file))?,
        _ => {
            return Err(VendorMatchError::dataset(format!(
                "Unsupported dataset format: {} (expected .csv, .json or .jsonl)",
                path.display()
            )))
        }
    };

    info!("Loaded {} vendor records from {}", records.len(), path.display());
    Ok(records)
}

/// Read CSV rows; columns are matched by header name
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<VendorRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    reader
        .deserialize::<VendorRecord>()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(|e| {
                VendorMatchError::dataset(format!("Invalid CSV row {}: {}", index + 1, e))
            })
        })
        .collect()
}

/// Read a JSON array of row objects
pub fn read_json<R: Read>(reader: R) -> Result<Vec<VendorRecord>> {
    serde_json::from_reader(reader)
        .map_err(|e| VendorMatchError::dataset(format!("Invalid JSON dataset: {}", e)))
}

/// Read one JSON row object per line, skipping blank lines
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<VendorRecord>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            VendorMatchError::dataset(format!("Invalid JSON on line {}: {}", index + 1, e))
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_with_features_column() {
        let data = "product_name,rating,main_category,product_url,seller,full_pricing_page,Features,extra\n\
                    Acme CRM,4.5,CRM Software,https://acme.test,Acme,https://acme.test/pricing,\"[{\"\"features\"\": [{\"\"description\"\": \"\"Leads\"\"}]}]\",ignored\n\
                    ,,,,,,,\n";

        let records = read_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let acme = &records[0];
        assert_eq!(acme.product_name.as_deref(), Some("Acme CRM"));
        assert_eq!(acme.rating, Some(4.5));
        assert_eq!(acme.main_category.as_deref(), Some("CRM Software"));
        assert_eq!(
            acme.raw_features.as_deref(),
            Some(r#"[{"features": [{"description": "Leads"}]}]"#)
        );

        assert_eq!(records[1], VendorRecord::default());
    }

    #[test]
    fn test_undecodable_csv_row_is_dataset_error() {
        let data: &[u8] = b"product_name,rating\nLedger,4.5\n\xff\xfe,3\n";
        let err = read_csv(data).unwrap_err();
        assert_eq!(err.kind(), "Dataset");
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_read_json_accepts_inline_features_and_string_ratings() {
        let data = r#"[
            {"product_name": "Ledger", "rating": "4.1", "main_category": "Accounting",
             "raw_features": [{"features": [{"description": "Invoicing"}]}]},
            {"product_name": "Nameless", "rating": "n/a", "raw_features": null}
        ]"#;

        let records = read_json(data.as_bytes()).unwrap();
        assert_eq!(records[0].rating, Some(4.1));
        assert_eq!(
            records[0].raw_features.as_deref(),
            Some(r#"[{"features":[{"description":"Invoicing"}]}]"#)
        );
        assert_eq!(records[1].rating, None);
        assert_eq!(records[1].raw_features, None);
        assert_eq!(records[1].main_category, None);
    }

    #[test]
    fn test_non_finite_rating_is_missing() {
        let records = read_json(r#"[{"rating": "NaN"}, {"rating": "inf"}]"#.as_bytes()).unwrap();
        assert!(records.iter().all(|r| r.rating.is_none()));
    }

    #[test]
    fn test_read_jsonl_skips_blank_lines() {
        let data = "{\"product_name\": \"A\"}\n\n{\"product_name\": \"B\", \"rating\": 3}\n";
        let records = read_jsonl(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].rating, Some(3.0));
    }

    #[test]
    fn test_read_jsonl_reports_line_number() {
        let err = read_jsonl("{}\n{broken\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_records(Path::new("Cargo.toml")).unwrap_err();
        assert_eq!(err.kind(), "Dataset");
    }
}
