use futures::{StreamExt, TryStreamExt};
use std::time::Instant;
use tracing::{debug, error, info};
use vendormatch_common::{Result, VendorMatchError};
use vendormatch_embedding::EmbeddingProvider;

use crate::dataset::VendorRecord;
use crate::features::{parse_features, FeatureParseError};
use crate::types::{CatalogStats, QualifiedVendor, VendorCatalog, VendorProfile};

pub const DEFAULT_PRODUCT_NAME: &str = "Unnamed Software";
pub const DEFAULT_MAIN_CATEGORY: &str = "Unknown Category";
pub const DEFAULT_RAW_FEATURES: &str = "[]";

/// Result of preparing one dataset row
#[derive(Debug)]
pub enum Preparation {
    /// Row qualifies; descriptions still need embedding
    Ready {
        profile: VendorProfile,
        descriptions: Vec<String>,
    },
    /// Feature payload unreadable; row excluded
    Malformed(FeatureParseError),
    /// Payload readable but without descriptions; row excluded
    NoFeatures,
}

fn clean_field(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).trim().to_string()
}

/// Apply defaults, strip whitespace and extract features for one row
pub fn prepare_record(record: &VendorRecord) -> Preparation {
    let raw_features = clean_field(record.raw_features.as_deref(), DEFAULT_RAW_FEATURES);

    let descriptions = match parse_features(&raw_features) {
        Ok(descriptions) if descriptions.is_empty() => return Preparation::NoFeatures,
        Ok(descriptions) => descriptions,
        Err(e) => return Preparation::Malformed(e),
    };

    // main_category is always present once its default is applied
    let profile = VendorProfile {
        product_name: clean_field(record.product_name.as_deref(), DEFAULT_PRODUCT_NAME),
        rating: record.rating.unwrap_or(0.0),
        main_category: clean_field(record.main_category.as_deref(), DEFAULT_MAIN_CATEGORY),
        product_url: clean_field(record.product_url.as_deref(), ""),
        seller: clean_field(record.seller.as_deref(), ""),
        full_pricing_page: clean_field(record.full_pricing_page.as_deref(), ""),
    };

    Preparation::Ready {
        profile,
        descriptions,
    }
}

/// Build the vendor catalog from raw dataset rows
///
/// Rows without usable features are dropped. Every remaining description is
/// embedded once, with at most `concurrency` calls in flight; results keep
/// dataset order and description order. Any embedding failure aborts the
/// build.
pub async fn build_catalog(
    provider: &dyn EmbeddingProvider,
    records: &[VendorRecord],
    concurrency: usize,
) -> Result<VendorCatalog> {
    let started = Instant::now();
    info!("Building vendor catalog from {} records", records.len());

    let mut malformed = 0;
    let mut without_features = 0;
    let mut prepared = Vec::new();

    for record in records {
        match prepare_record(record) {
            Preparation::Ready {
                profile,
                descriptions,
            } => prepared.push((profile, descriptions)),
            Preparation::Malformed(e) => {
                malformed += 1;
                debug!(
                    "Skipping vendor {:?}: {}",
                    record.product_name.as_deref().unwrap_or(DEFAULT_PRODUCT_NAME),
                    e
                );
            }
            Preparation::NoFeatures => without_features += 1,
        }
    }

    let texts: Vec<&str> = prepared
        .iter()
        .flat_map(|(_, descriptions)| descriptions.iter().map(String::as_str))
        .collect();
    let total_features = texts.len();

    info!(
        "Embedding {} feature descriptions for {} vendors (concurrency={})",
        total_features,
        prepared.len(),
        concurrency
    );

    let embeddings: Vec<Vec<f32>> = futures::stream::iter(texts)
        .map(|text| provider.embed(text))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
        .map_err(|e| {
            error!("Catalog build aborted: {}", e);
            e
        })?;

    let mut embeddings = embeddings.into_iter();
    let mut vendors = Vec::with_capacity(prepared.len());
    for (profile, descriptions) in prepared {
        let vendor_embeddings: Vec<Vec<f32>> = embeddings.by_ref().take(descriptions.len()).collect();
        let name = profile.product_name.clone();
        let vendor = QualifiedVendor::new(profile, descriptions, vendor_embeddings).ok_or_else(|| {
            VendorMatchError::internal(format!("Embeddings misaligned for vendor {}", name))
        })?;
        vendors.push(vendor);
    }

    let stats = CatalogStats {
        total_records: records.len(),
        qualified_vendors: vendors.len(),
        malformed_feature_payloads: malformed,
        vendors_without_features: without_features,
        total_features,
        embedding_model: provider.model_name().to_string(),
        built_at: chrono::Utc::now(),
        build_duration_ms: started.elapsed().as_millis(),
    };

    info!(
        "Vendor catalog ready - {} qualified, {} malformed, {} without features, {} features in {} ms",
        stats.qualified_vendors,
        stats.malformed_feature_payloads,
        stats.vendors_without_features,
        stats.total_features,
        stats.build_duration_ms
    );

    Ok(VendorCatalog::new(vendors, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingEmbedder, StaticEmbedder};

    fn record(name: &str, raw_features: Option<&str>) -> VendorRecord {
        VendorRecord {
            product_name: Some(name.to_string()),
            rating: Some(4.0),
            main_category: Some("CRM Software".to_string()),
            raw_features: raw_features.map(str::to_string),
            product_url: Some(format!("https://{}.test", name)),
            seller: Some(name.to_string()),
            full_pricing_page: None,
        }
    }

    fn features(descriptions: &[&str]) -> String {
        let items: Vec<_> = descriptions
            .iter()
            .map(|d| serde_json::json!({ "description": d }))
            .collect();
        serde_json::json!([{ "features": items }]).to_string()
    }

    #[test]
    fn test_prepare_applies_defaults_and_strips() {
        let raw = VendorRecord {
            product_name: None,
            rating: None,
            main_category: None,
            raw_features: Some(format!("  {}  ", features(&["Leads"]))),
            product_url: Some("  https://x.test ".into()),
            seller: None,
            full_pricing_page: Some("\thttps://x.test/pricing\n".into()),
        };

        match prepare_record(&raw) {
            Preparation::Ready {
                profile,
                descriptions,
            } => {
                assert_eq!(profile.product_name, "Unnamed Software");
                assert_eq!(profile.rating, 0.0);
                assert_eq!(profile.main_category, "Unknown Category");
                assert_eq!(profile.product_url, "https://x.test");
                assert_eq!(profile.seller, "");
                assert_eq!(profile.full_pricing_page, "https://x.test/pricing");
                assert_eq!(descriptions, vec!["leads"]);
            }
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_blank_category_is_still_present() {
        let mut raw = record("a", Some(&features(&["Leads"])));
        raw.main_category = Some("   ".into());
        match prepare_record(&raw) {
            Preparation::Ready { profile, .. } => assert_eq!(profile.main_category, ""),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_exclusions() {
        assert!(matches!(prepare_record(&record("a", None)), Preparation::NoFeatures));
        assert!(matches!(prepare_record(&record("a", Some("[]"))), Preparation::NoFeatures));
        assert!(matches!(
            prepare_record(&record("a", Some("{broken"))),
            Preparation::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_build_catalog_filters_and_preserves_order() {
        let provider = StaticEmbedder::new()
            .with("leads", vec![1.0, 0.0])
            .with("pipeline", vec![0.0, 1.0])
            .with("invoicing", vec![0.5, 0.5]);

        let records = vec![
            record("alpha", Some(&features(&["Leads", "Pipeline"]))),
            record("broken", Some("not json")),
            record("empty", Some(&features(&["   "]))),
            record("missing", None),
            record("beta", Some(&features(&["Invoicing"]))),
        ];

        let catalog = build_catalog(&provider, &records, 2).await.unwrap();

        let names: Vec<_> = catalog
            .vendors()
            .iter()
            .map(|v| v.profile().product_name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert!(catalog.vendors().iter().all(|v| !v.feature_descriptions().is_empty()));

        let stats = catalog.stats();
        assert_eq!(stats.total_records, 5);
        assert_eq!(stats.qualified_vendors, 2);
        assert_eq!(stats.malformed_feature_payloads, 1);
        assert_eq!(stats.vendors_without_features, 2);
        assert_eq!(stats.total_features, 3);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_build_catalog_aligns_embeddings() {
        let provider = StaticEmbedder::new()
            .with("a", vec![1.0, 0.0, 0.0])
            .with("b", vec![0.0, 1.0, 0.0])
            .with("c", vec![0.0, 0.0, 1.0]);

        let records = vec![
            record("one", Some(&features(&["C", "A"]))),
            record("two", Some(&features(&["B", "C", "A"]))),
        ];

        // concurrency 1 and many both keep alignment
        for concurrency in [1, 8] {
            let catalog = build_catalog(&provider, &records, concurrency).await.unwrap();
            for vendor in catalog.vendors() {
                for (description, embedding) in vendor
                    .feature_descriptions()
                    .iter()
                    .zip(vendor.feature_embeddings())
                {
                    assert_eq!(Some(embedding), provider.vector(description).as_ref());
                }
            }
        }
    }

    #[tokio::test]
    async fn test_build_catalog_never_keeps_featureless_vendors() {
        let provider = StaticEmbedder::new().with_fallback(vec![1.0]);
        let payloads = [
            None,
            Some(""),
            Some("[]"),
            Some("[{}]"),
            Some("[{\"features\": []}]"),
            Some("[{\"features\": [{}]}]"),
            Some("[{\"features\": [{\"description\": \"\"}]}]"),
            Some("{\"features\": [{\"description\": \"x\"}]}"),
        ];
        let records: Vec<_> = payloads.iter().map(|p| record("v", *p)).collect();

        let catalog = build_catalog(&provider, &records, 4).await.unwrap();
        assert!(catalog.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_build_catalog_embedding_failure_is_fatal() {
        let records = vec![record("alpha", Some(&features(&["Leads"])))];
        let err = build_catalog(&FailingEmbedder, &records, 4).await.unwrap_err();
        assert_eq!(err.kind(), "EmbeddingProviderFailure");
    }

    #[tokio::test]
    async fn test_build_catalog_empty_dataset() {
        let provider = StaticEmbedder::new();
        let catalog = build_catalog(&provider, &[], 4).await.unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.stats().total_records, 0);
    }
}
