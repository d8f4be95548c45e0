//! REST API endpoint implementations.
//!
//! Each function performs one HTTP call against the Payload REST API and
//! takes the fully formed `Authorization` header value from the caller.

mod auth;
mod documents;
mod indexes;
mod query;
mod request;

pub use auth::{LoginResponse, login};
pub use documents::{
    count_documents, create_document, delete_document, find_document_by_id, find_documents,
    update_document,
};
pub use indexes::{create_index, list_indexes};
pub use query::{Condition, Filter, FindQuery, Operator};
pub use request::send_request_with_retry;

/// Percent-encode a single path segment (collection slug or document id).
pub(crate) fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
