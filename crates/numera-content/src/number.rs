use std::fmt;

use serde::{Deserialize, Serialize};

pub use numera_common_config::DEFAULT_ALLOWED_NUMBERS;

/// Numbers with amplified significance, as opposed to the single digits.
pub const MASTER_NUMBERS: [u32; 4] = [11, 22, 33, 44];

/// A numerology number that passed the allowed-set check.
///
/// Deserialization is transparent and does not re-check membership; records
/// coming from untrusted JSON go through the validator first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumerologyNumber(u32);

impl NumerologyNumber {
    /// Accept `value` if it is in `allowed`.
    pub fn new(value: u32, allowed: &[u32]) -> Option<Self> {
        allowed.contains(&value).then_some(Self(value))
    }

    /// Accept `value` if it is 1-9 or a master number.
    pub fn standard(value: u32) -> Option<Self> {
        Self::new(value, &DEFAULT_ALLOWED_NUMBERS)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_master(self) -> bool {
        MASTER_NUMBERS.contains(&self.0)
    }
}

impl fmt::Display for NumerologyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NumerologyNumber> for u32 {
    fn from(n: NumerologyNumber) -> Self {
        n.0
    }
}
