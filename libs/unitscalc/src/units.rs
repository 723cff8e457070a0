//! Supported length units and the conversion ratio table
//!
//! The set of units is closed. Every ordered pair of units has a ratio, built
//! once from four base constants.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Millimeters in one inch.
pub const MM_PER_INCH: Decimal = Decimal::from_parts(254, 0, 0, false, 1);
/// Millimeters in one centimeter.
pub const MM_PER_CM: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
/// Typographic points in one inch.
pub const POINTS_PER_INCH: Decimal = Decimal::from_parts(72, 0, 0, false, 0);
/// Device pixels in one inch.
pub const PIXELS_PER_INCH: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

/// Significant digits kept in every ratio entry.
pub const RATIO_SIGNIFICANT_DIGITS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Unit {
    Mm,
    Cm,
    In,
    Px,
    Pt,
}

impl Unit {
    pub const ALL: [Unit; 5] = [Unit::Mm, Unit::Cm, Unit::In, Unit::Px, Unit::Pt];

    /// Lowercase code used in expressions, e.g. `mm`.
    pub fn code(self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Px => "px",
            Unit::Pt => "pt",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Mm => "millimeter",
            Unit::Cm => "centimeter",
            Unit::In => "inch",
            Unit::Px => "pixel",
            Unit::Pt => "point",
        }
    }

    /// How many of this unit make up one inch.
    fn per_inch(self) -> Decimal {
        match self {
            Unit::Mm => MM_PER_INCH,
            Unit::Cm => MM_PER_INCH / MM_PER_CM,
            Unit::In => Decimal::ONE,
            Unit::Px => PIXELS_PER_INCH,
            Unit::Pt => POINTS_PER_INCH,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Unit {
    type Err = Error;

    /// Case-insensitive match against the unit codes.
    fn from_str(s: &str) -> Result<Self> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::Conversion(format!(
                    "unknown unit '{}', expected one of mm, cm, in, px, pt",
                    s
                ))
            })
    }
}

/// Multipliers converting an amount in one unit into another.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioTable {
    entries: [[Decimal; 5]; 5],
}

impl RatioTable {
    /// Build the full 5x5 table from the base constants.
    pub fn new() -> Self {
        let mut entries = [[Decimal::ONE; 5]; 5];
        for from in Unit::ALL {
            for to in Unit::ALL {
                if from != to {
                    entries[from.index()][to.index()] = compute_ratio(from, to);
                }
            }
        }
        Self { entries }
    }

    /// Multiplier turning an amount in `from` into an amount in `to`.
    pub fn get(&self, from: Unit, to: Unit) -> Decimal {
        self.entries[from.index()][to.index()]
    }

    /// All entries as `(from, to, ratio)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Unit, Unit, Decimal)> + '_ {
        Unit::ALL.into_iter().flat_map(move |from| {
            Unit::ALL
                .into_iter()
                .map(move |to| (from, to, self.get(from, to)))
        })
    }
}

impl Default for RatioTable {
    fn default() -> Self {
        Self::new()
    }
}

// One exact division of the per-inch counts, then rounding.
fn compute_ratio(from: Unit, to: Unit) -> Decimal {
    let exact = to.per_inch() / from.per_inch();
    exact
        .round_sf_with_strategy(
            RATIO_SIGNIFICANT_DIGITS,
            RoundingStrategy::MidpointAwayFromZero,
        )
        .unwrap_or(exact)
        .normalize()
}

static RATIOS: Lazy<RatioTable> = Lazy::new(RatioTable::new);

/// Process-wide ratio table.
pub fn ratios() -> &'static RatioTable {
    &RATIOS
}

/// Shorthand for `ratios().get(from, to)`.
pub fn ratio(from: Unit, to: Unit) -> Decimal {
    RATIOS.get(from, to)
}
