//! VendorMatch capability matching
//!
//! Feature text normalization and extraction, vendor catalog construction,
//! query embedding, and semantic ranking of vendors.

mod catalog;
mod dataset;
mod engine;
mod features;
mod normalize;
mod query;
mod ranker;
mod types;

#[cfg(test)]
mod testing;

pub use catalog::{
    build_catalog, prepare_record, Preparation, DEFAULT_MAIN_CATEGORY, DEFAULT_PRODUCT_NAME,
    DEFAULT_RAW_FEATURES,
};
pub use dataset::{load_records, read_csv, read_json, read_jsonl, VendorRecord};
pub use engine::MatchEngine;
pub use features::{extract_features, parse_features, FeatureParseError};
pub use normalize::normalize;
pub use query::{build_queries, enrich_capability, CapabilityQuery, QuerySet};
pub use ranker::{rank, round4, score_vendor, VendorScore};
pub use types::{
    CatalogStats, FeaturePooling, MatchParams, QualificationOutcome, QualificationRequest,
    QualificationResponse, QualificationResult, QualifiedVendor, VendorCatalog, VendorProfile,
    NO_MATCHES_MESSAGE,
};
