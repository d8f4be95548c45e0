//! Payload CMS REST API client and migration runners.
//!
//! This crate provides a typed client for the Payload CMS REST API with
//! API key or email/password authentication, plus the batch runners built on
//! it: content migration, pricing import, index sync and layered validation.
//! Runners are generic over [`DocumentStore`] and [`IndexManager`] so they can
//! be exercised against the in-memory store in [`testing`].

mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod index_sync;
pub mod migrate;
pub mod models;
pub mod pricing;
pub mod store;
pub mod validation;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{AuthStrategy, SessionManager};
pub use client::PayloadClient;
pub use client::builder::PayloadClientBuilder;
pub use endpoints::{Filter, FindQuery};
pub use error::{ClientError, Result, UnitFailure};
pub use index_sync::{IndexPlan, SyncReport, sync_indexes};
pub use migrate::{
    MigrationOptions, MigrationReport, build_document, migrate_content, migrate_records,
};
pub use models::{Document, DocumentPage, IndexInfo, IndexKey, IndexSpec};
pub use pricing::{
    ImportReport, PricingClient, PricingRecord, PricingRecords, extract_records, import_records,
};
pub use store::{DocumentStore, IndexManager};
pub use validation::{
    Layer, RelationshipRule, ValidationConfig, ValidationReport, ValidationResult,
    ValidationRunner,
};
