//! Data models for Payload CMS REST API responses.

mod document;
mod index;

pub use document::{CountResponse, DocResponse, Document, DocumentPage, PayloadErrors};
pub use index::{IndexInfo, IndexKey, IndexListResponse, IndexSpec};
