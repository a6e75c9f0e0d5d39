//! Weight units and canonical weight conversion.
//!
//! All weights are stored in milligrams. Units only matter at the edges:
//! when an author enters a value and when totals are displayed.

use serde::{Deserialize, Serialize};

const MG_PER_GRAM: f64 = 1_000.0;
const MG_PER_KILOGRAM: f64 = 1_000_000.0;
const MG_PER_OUNCE: f64 = 28_349.523_125;
const MG_PER_POUND: f64 = 453_592.37;

/// Unit a weight was entered or is displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Oz,
    Lb,
    G,
    Kg,
}

impl WeightUnit {
    /// Parse a unit label. Accepts the short forms and a few spelled-out aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "oz" | "ounce" | "ounces" => Some(Self::Oz),
            "lb" | "lbs" | "pound" | "pounds" => Some(Self::Lb),
            "g" | "gram" | "grams" => Some(Self::G),
            "kg" | "kilogram" | "kilograms" => Some(Self::Kg),
            _ => None,
        }
    }

    /// Stable short label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oz => "oz",
            Self::Lb => "lb",
            Self::G => "g",
            Self::Kg => "kg",
        }
    }

    fn milligrams(&self) -> f64 {
        match self {
            Self::Oz => MG_PER_OUNCE,
            Self::Lb => MG_PER_POUND,
            Self::G => MG_PER_GRAM,
            Self::Kg => MG_PER_KILOGRAM,
        }
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a value in `unit` to canonical milligrams.
pub fn to_canonical(value: f64, unit: WeightUnit) -> f64 {
    value * unit.milligrams()
}

/// Convert canonical milligrams to `unit`.
pub fn from_canonical(milligrams: f64, unit: WeightUnit) -> f64 {
    milligrams / unit.milligrams()
}
