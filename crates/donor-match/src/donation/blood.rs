//! ABO/Rh compatibility reference data.
//!
//! The donor-to-recipient table is the single rule source for matching; the
//! recipient-to-donor direction is always derived by inverting it, never
//! stated separately.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight ABO/Rh blood types, in the table's canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "AB+")]
    AbPositive,
}

impl BloodType {
    pub const ALL: [Self; 8] = [
        Self::ONegative,
        Self::OPositive,
        Self::ANegative,
        Self::APositive,
        Self::BNegative,
        Self::BPositive,
        Self::AbNegative,
        Self::AbPositive,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::ONegative => "O-",
            Self::OPositive => "O+",
            Self::ANegative => "A-",
            Self::APositive => "A+",
            Self::BNegative => "B-",
            Self::BPositive => "B+",
            Self::AbNegative => "AB-",
            Self::AbPositive => "AB+",
        }
    }

    /// Recipient types this donor type can supply.
    pub const fn recipients(self) -> &'static [BloodType] {
        use BloodType::*;
        match self {
            ONegative => &[
                ONegative, OPositive, ANegative, APositive, BNegative, BPositive, AbNegative,
                AbPositive,
            ],
            OPositive => &[OPositive, APositive, BPositive, AbPositive],
            ANegative => &[ANegative, APositive, AbNegative, AbPositive],
            APositive => &[APositive, AbPositive],
            BNegative => &[BNegative, BPositive, AbNegative, AbPositive],
            BPositive => &[BPositive, AbPositive],
            AbNegative => &[AbNegative, AbPositive],
            AbPositive => &[AbPositive],
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::ONegative => "Universal donor - can give to every type",
            Self::OPositive => "Can give to the positive types",
            Self::ANegative => "Can give to A and AB",
            Self::APositive => "Can give to A+ and AB+",
            Self::BNegative => "Can give to B and AB",
            Self::BPositive => "Can give to B+ and AB+",
            Self::AbNegative => "Can give to AB",
            Self::AbPositive => "Universal recipient - can receive from every type",
        }
    }
}

/// Direct table lookup: can `donor` supply `patient`?
pub fn can_donate(donor: BloodType, patient: BloodType) -> bool {
    donor.recipients().contains(&patient)
}

/// Every donor type whose compatibility set includes `patient`.
///
/// Derived by a linear scan over the eight table entries; with reference
/// data this small an index would be noise.
pub fn compatible_donors(patient: BloodType) -> Vec<BloodType> {
    BloodType::ALL
        .into_iter()
        .filter(|donor| can_donate(*donor, patient))
        .collect()
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Raised when a wire value does not name one of the eight blood types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized blood type '{0}'")]
pub struct ParseBloodTypeError(pub String);

impl FromStr for BloodType {
    type Err = ParseBloodTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BloodType::ALL
            .into_iter()
            .find(|candidate| candidate.symbol().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseBloodTypeError(value.to_string()))
    }
}
