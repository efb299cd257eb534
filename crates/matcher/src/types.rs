use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use vendormatch_common::{AppConfig, Result, VendorMatchError};

/// Returned instead of an empty vendor list
pub const NO_MATCHES_MESSAGE: &str = "No vendors found with semantic relevance to the query.";

/// Descriptive vendor fields, defaults applied and whitespace stripped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorProfile {
    pub product_name: String,
    pub rating: f64,
    pub main_category: String,
    pub product_url: String,
    pub seller: String,
    pub full_pricing_page: String,
}

/// A vendor eligible for matching
///
/// Always holds at least one feature, with exactly one embedding per
/// feature description at the same index.
#[derive(Debug, Clone)]
pub struct QualifiedVendor {
    profile: VendorProfile,
    feature_descriptions: Vec<String>,
    feature_embeddings: Vec<Vec<f32>>,
}

impl QualifiedVendor {
    /// Returns `None` when there are no features or the embeddings are not aligned
    pub fn new(
        profile: VendorProfile,
        feature_descriptions: Vec<String>,
        feature_embeddings: Vec<Vec<f32>>,
    ) -> Option<Self> {
        if feature_descriptions.is_empty() || feature_descriptions.len() != feature_embeddings.len() {
            return None;
        }
        Some(Self {
            profile,
            feature_descriptions,
            feature_embeddings,
        })
    }

    pub fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    pub fn feature_descriptions(&self) -> &[String] {
        &self.feature_descriptions
    }

    pub fn feature_embeddings(&self) -> &[Vec<f32>] {
        &self.feature_embeddings
    }
}

/// Catalog build statistics
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    /// Rows read from the dataset
    pub total_records: usize,

    /// Vendors kept in the catalog
    pub qualified_vendors: usize,

    /// Rows whose feature payload could not be parsed
    pub malformed_feature_payloads: usize,

    /// Rows whose payload parsed but held no usable description
    pub vendors_without_features: usize,

    /// Feature embeddings held by the catalog
    pub total_features: usize,

    /// Embedding model used for the catalog
    pub embedding_model: String,

    /// When the build finished
    pub built_at: DateTime<Utc>,

    /// Build wall time
    pub build_duration_ms: u128,
}

/// Immutable set of vendors, built once and shared by all requests
#[derive(Debug, Clone)]
pub struct VendorCatalog {
    vendors: Vec<QualifiedVendor>,
    stats: CatalogStats,
}

impl VendorCatalog {
    pub fn new(vendors: Vec<QualifiedVendor>, stats: CatalogStats) -> Self {
        Self { vendors, stats }
    }

    pub fn vendors(&self) -> &[QualifiedVendor] {
        &self.vendors
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }
}

/// Vendor qualification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationRequest {
    /// Target software category (e.g. "CRM Software")
    pub software_category: String,

    /// Desired capabilities, in priority order
    pub capabilities: Vec<String>,
}

impl QualificationRequest {
    pub fn new(software_category: impl Into<String>, capabilities: Vec<String>) -> Self {
        Self {
            software_category: software_category.into(),
            capabilities,
        }
    }

    /// Reject requests that cannot be matched
    pub fn validate(&self) -> Result<()> {
        if self.capabilities.is_empty() {
            return Err(VendorMatchError::invalid_request("Capabilities list is empty."));
        }
        if self.software_category.trim().is_empty() {
            return Err(VendorMatchError::invalid_request("Software category is empty."));
        }
        Ok(())
    }
}

/// One ranked vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationResult {
    pub product_name: String,
    /// Combined score, rounded to 4 decimals
    pub average_similarity: f64,
    pub rating: f64,
    pub category: String,
    pub product_url: String,
    pub seller: String,
    pub full_pricing_page: String,
}

/// Outcome of a valid request
#[derive(Debug, Clone, PartialEq)]
pub enum QualificationOutcome {
    /// At least one vendor cleared the threshold
    Matches(Vec<QualificationResult>),

    /// Nobody cleared the threshold (not an error)
    NoMatches,
}

impl From<Vec<QualificationResult>> for QualificationOutcome {
    fn from(results: Vec<QualificationResult>) -> Self {
        if results.is_empty() {
            Self::NoMatches
        } else {
            Self::Matches(results)
        }
    }
}

/// Wire shape of a qualification response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualificationResponse {
    Matches { top_vendors: Vec<QualificationResult> },
    NoMatches { message: String },
}

impl From<QualificationOutcome> for QualificationResponse {
    fn from(outcome: QualificationOutcome) -> Self {
        match outcome {
            QualificationOutcome::Matches(top_vendors) => Self::Matches { top_vendors },
            QualificationOutcome::NoMatches => Self::NoMatches {
                message: NO_MATCHES_MESSAGE.to_string(),
            },
        }
    }
}

/// How per-feature similarities collapse into one vendor score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturePooling {
    /// Best single feature (rewards specialization)
    Max,
    /// Average over all features (rewards breadth)
    Mean,
}

impl FromStr for FeaturePooling {
    type Err = VendorMatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "max" => Ok(Self::Max),
            "mean" => Ok(Self::Mean),
            other => Err(VendorMatchError::config(format!("Unknown feature pooling: {}", other))),
        }
    }
}

/// Scoring constants, fixed for the lifetime of the process
#[derive(Debug, Clone, Serialize)]
pub struct MatchParams {
    pub threshold: f64,
    pub capability_weight: f64,
    pub category_weight: f64,
    pub top_k: usize,
    pub feature_pooling: FeaturePooling,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            capability_weight: 0.7,
            category_weight: 0.3,
            top_k: 10,
            feature_pooling: FeaturePooling::Max,
        }
    }
}

impl MatchParams {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            threshold: config.match_threshold,
            capability_weight: config.capability_weight,
            category_weight: config.category_weight,
            top_k: config.top_k,
            feature_pooling: config.feature_pooling.parse()?,
        })
    }
}
