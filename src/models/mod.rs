pub mod organization;
pub mod project;
pub mod issue;
pub mod record;

pub use organization::*;
pub use project::*;
pub use issue::*;
pub use record::*;

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
