//! Shared plumbing for the Access 360 workspace.
//!
//! Everything here is dependency-light so that `models`, `access-core` and the
//! application shell can all use it without pulling in HTTP or async crates.

pub mod error;
pub mod http_status;

pub use error::error_location::ErrorLocation;
pub use http_status::HttpStatusCode;

#[cfg(test)]
mod tests;
