//! stress-client: Minimal lakeFS API client for the load commands
//!
//! Covers only the calls the `abuse` commands make:
//!
//! - Repository lookup
//! - Object stat and stage
//! - Branch list, create and delete
//!
//! plus `lakefs://` URI parsing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod uri;

pub use client::LakeFsClient;
pub use config::{ClientConfig, ConfigValidationError, API_BASE_PATH};
pub use error::{ClientError, Result};
pub use types::*;
pub use uri::RefUri;
