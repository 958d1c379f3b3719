//! Core type definitions used throughout the codebase

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Prefix shared by province localisation keys (`PROV123`)
pub const PROVINCE_PREFIX: &str = "PROV";

/// Hierarchy tier of a title, read from its identifier prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tier {
    /// Province pseudo-tier (`PROV<n>`), never part of the title tree
    Province = 0,
    Barony = 1,
    County = 2,
    Duchy = 3,
    Kingdom = 4,
    Empire = 5,
}

impl Tier {
    /// Infer the tier from an entity identifier.
    ///
    /// Titles use a one-letter marker followed by `_` (`k_france`).
    /// Anything else is not a tiered entity.
    pub fn from_id(id: &str) -> Option<Tier> {
        let bytes = id.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b'_' {
            return match bytes[0] {
                b'b' => Some(Tier::Barony),
                b'c' => Some(Tier::County),
                b'd' => Some(Tier::Duchy),
                b'k' => Some(Tier::Kingdom),
                b'e' => Some(Tier::Empire),
                _ => None,
            };
        }
        province_id(id).map(|_| Tier::Province)
    }

    /// Returns true if this tier outranks the other
    pub fn outranks(&self, other: &Tier) -> bool {
        (*self as u8) > (*other as u8)
    }

    /// Kingdoms and empires settle their region by vassal vote
    pub fn is_top_tier(&self) -> bool {
        matches!(self, Tier::Kingdom | Tier::Empire)
    }
}

/// True for landed title identifiers (`b_`, `c_`, `d_`, `k_`, `e_`)
pub fn is_codename(id: &str) -> bool {
    matches!(Tier::from_id(id), Some(tier) if tier != Tier::Province)
}

/// True for a non-empty run of ASCII digits
pub fn is_province_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Digits of a `PROV<n>` key, as written. Ids of any length are accepted.
pub fn province_id(key: &str) -> Option<&str> {
    key.strip_prefix(PROVINCE_PREFIX)
        .filter(|digits| is_province_id(digits))
}

/// Compare two province ids by numeric value without parsing them
pub fn compare_province_ids(a: &str, b: &str) -> Ordering {
    let a_value = a.trim_start_matches('0');
    let b_value = b.trim_start_matches('0');
    a_value
        .len()
        .cmp(&b_value.len())
        .then_with(|| a_value.cmp(b_value))
}

/// Localisation key for a province id, keeping its digits as written
pub fn province_key(id: &str) -> String {
    format!("{}{}", PROVINCE_PREFIX, id)
}
