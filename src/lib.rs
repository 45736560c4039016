//! Gateway to Research API client library.
//!
//! A read-only Rust client for the GtR REST API. Resources are fetched in
//! one of two wire serialisations (XML documents or JSON records) and
//! exposed as format-agnostic facades with field accessors, relationship
//! traversal and page navigation.
//!
//! # Quick Start
//!
//! ```no_run
//! use gtrclient::{GtrClient, IterOptions};
//!
//! #[tokio::main]
//! async fn main() -> gtrclient::Result<()> {
//!     // Create client from environment variables
//!     let client = GtrClient::from_env()?;
//!
//!     // Get a project by id
//!     let project = client.project("0D2C6B1C-6D1A-4A0B-9C3E-1F2A3B4C5D6E").await?;
//!     println!("Project: {:?}", project.title());
//!     if let Some(lead) = project.lead_organisation()? {
//!         println!("Led by: {:?}", lead.name());
//!     }
//!
//!     // Walk every project, page by page
//!     let mut projects = client.projects(Some(1), Some(100)).await?;
//!     let mut iter = projects.iter(IterOptions::default());
//!     while let Some(project) = iter.next().await? {
//!         println!("{:?}", project.id());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`GtrClient`] performs authenticated GETs, negotiates the
//!   serialisation and extracts paging headers.
//! - A [`DecoderFactory`] maps (serialisation, resource kind) to a
//!   [`ResourceDecoder`] that reads fields and cuts out related
//!   sub-documents.
//! - Facades such as [`Project`] and [`ResourceList`] delegate to their
//!   decoder and never look at the wire format themselves.
//! - [`Get`] and [`List`] fetch resources by id or page.
//! - [`CerifClient`] serves the CERIF view with its own decoders and a
//!   class cache.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GTR_API_URL` (optional) - API root (defaults to `https://gtr.ukri.org/gtr/api`)
//! - `GTR_SERIALISATION` (optional) - `xml` (default) or `json`
//! - `GTR_PAGE_SIZE` (optional) - default page size, clamped to 25..=100
//! - `GTR_USERNAME` / `GTR_PASSWORD` (optional) - basic-auth credentials

mod cerif;
pub mod cli;
mod client;
pub mod decoder;
mod error;
mod format;
pub mod output;
pub mod paging;
pub mod resources;
mod traits;
pub mod xml;

// Re-export core types
pub use client::{ClientOptions, Credentials, GtrClient, DEFAULT_API_URL};
pub use error::{GtrError, Result};
pub use format::{Body, Serialisation};
pub use paging::{PaginationParams, Paging};

// Re-export traits
pub use decoder::{DecoderFactory, ResourceDecoder, ResourceKind};
pub use traits::{Get, List};

// Re-export facades
pub use resources::{
    IterOptions, ListIter, Organisation, Organisations, People, Person, Project, Projects,
    Publication, Publications, Resource, ResourceList,
};

// Re-export CERIF types
pub use cerif::{CerifClass, CerifClient, CerifEndpoint, CerifProject, CerifRelation};
