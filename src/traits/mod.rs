//! Trait definitions for GtR retrieval operations.
//!
//! Every native resource type implements both traits through its
//! [`Resource`](crate::resources::Resource) description.

mod get;
mod list;

pub use get::Get;
pub use list::List;
