use serde::{Deserialize, Serialize};

use gfc_core::DomainError;

/// Product category.
///
/// Closed enumeration: the nine appliance lines the catalog carries.
/// Keeping this a real enum (rather than an open string column) gives
/// compile-time exhaustiveness to the grouped-by-category views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CeilingFan,
    PedestalFan,
    BracketFan,
    ExhaustFan,
    AirCooler,
    WashingMachine,
    Dryer,
    AirPurifier,
    Geyser,
}

impl Category {
    /// All categories, in catalog display order.
    pub const ALL: [Category; 9] = [
        Category::CeilingFan,
        Category::PedestalFan,
        Category::BracketFan,
        Category::ExhaustFan,
        Category::AirCooler,
        Category::WashingMachine,
        Category::Dryer,
        Category::AirPurifier,
        Category::Geyser,
    ];

    /// Stable wire/storage code (matches the serde representation).
    pub fn code(&self) -> &'static str {
        match self {
            Category::CeilingFan => "ceiling_fan",
            Category::PedestalFan => "pedestal_fan",
            Category::BracketFan => "bracket_fan",
            Category::ExhaustFan => "exhaust_fan",
            Category::AirCooler => "air_cooler",
            Category::WashingMachine => "washing_machine",
            Category::Dryer => "dryer",
            Category::AirPurifier => "air_purifier",
            Category::Geyser => "geyser",
        }
    }

    /// Human-readable name for category listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::CeilingFan => "Ceiling Fan",
            Category::PedestalFan => "Pedestal Fan",
            Category::BracketFan => "Bracket Fan",
            Category::ExhaustFan => "Exhaust Fan",
            Category::AirCooler => "Air Cooler",
            Category::WashingMachine => "Washing Machine",
            Category::Dryer => "Dryer",
            Category::AirPurifier => "Air Purifier",
            Category::Geyser => "Geyser",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl core::str::FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown category '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_str() {
        for cat in Category::ALL {
            assert_eq!(cat.code().parse::<Category>().unwrap(), cat);
        }
    }

    #[test]
    fn serde_representation_matches_code() {
        for cat in Category::ALL {
            let json = serde_json::to_value(cat).unwrap();
            assert_eq!(json, serde_json::Value::String(cat.code().to_string()));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!("table_fan".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
        // Display names are not codes.
        assert!("Ceiling Fan".parse::<Category>().is_err());
    }
}
