// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Length units
//!
//! Figure sizes are stored in inches. Everything drawn inside a figure
//! (line widths, tick lengths, spine offsets, font sizes) is measured in
//! points, where 1 *point* = 1/72 inch.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// A physical length unit accepted for figure sizes
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "inch")]
    Inch,
}

impl Unit {
    /// The name used in configuration documents
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Centimeter => "cm",
            Unit::Inch => "inch",
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cm" => Ok(Unit::Centimeter),
            "inch" => Ok(Unit::Inch),
            other => Err(Error::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a length to inches, the unit used for figure sizes
#[inline]
pub fn to_engine_units(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Centimeter => value / CM_PER_INCH,
        Unit::Inch => value,
    }
}

/// Convert inches to points
#[inline]
pub fn inches_to_points(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn centimeters_divide() {
        assert_eq!(to_engine_units(2.54, Unit::Centimeter), 1.0);
        assert_eq!(to_engine_units(10.0, Unit::Centimeter), 10.0 / 2.54);
    }

    #[test]
    fn inches_pass_through() {
        assert_eq!(to_engine_units(3.5, Unit::Inch), 3.5);
    }

    #[test]
    fn monotonic() {
        for unit in [Unit::Centimeter, Unit::Inch] {
            let mut last = 0.0;
            for i in 1..50 {
                let v = to_engine_units(i as f64 * 0.7, unit);
                assert!(v > last);
                last = v;
            }
        }
    }

    #[test]
    fn parse() {
        assert_eq!("cm".parse::<Unit>().unwrap(), Unit::Centimeter);
        assert_eq!("inch".parse::<Unit>().unwrap(), Unit::Inch);
        assert!(matches!("mm".parse::<Unit>(), Err(Error::InvalidUnit(u)) if u == "mm"));
    }
}
