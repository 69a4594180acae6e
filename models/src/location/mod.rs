mod builder;

pub use builder::LocationBuilder;

use serde::{Deserialize, Serialize};

/// A restaurant chosen from the search box.
///
/// Immutable once chosen; a new search produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
}
