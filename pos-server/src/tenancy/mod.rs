//! Multi-tenant scoping
//!
//! - [`scope`] - actor, tenant scope and record ownership
//! - [`directory`] - tenant lifecycle and per-request tenant resolution

pub mod directory;
pub mod scope;

pub use directory::TenantDirectory;
pub use scope::{AccessScope, Actor, TenantOwned, TenantScope};
