//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod error_detail;
mod http_itsm_client;
mod in_memory_itsm_store;

pub use error_detail::extract_error_detail;
pub use http_itsm_client::HttpItsmClient;
pub use in_memory_itsm_store::InMemoryItsmStore;
