//! Address details derived from reverse geocoding

use serde::{Deserialize, Serialize};

/// Structured address fields for one coordinate.
///
/// Fields the provider omits are empty strings, never errors.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AddressDetail {
    pub district: String,
    pub state: String,
    pub country: String,
}

impl AddressDetail {
    #[must_use]
    pub fn new(district: impl Into<String>, state: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            state: state.into(),
            country: country.into(),
        }
    }

    /// True when the provider supplied none of the fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.district.is_empty() && self.state.is_empty() && self.country.is_empty()
    }
}
