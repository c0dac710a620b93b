use std::{collections::HashMap, fmt};

use super::FunctionError;

/// The physical dimension a unit measures.
///
/// Conversion is only defined between units of the same dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Mass,
    Time,
    Force,
    Pressure,
    Energy,
    Power,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Time => "time",
            Self::Force => "force",
            Self::Pressure => "pressure",
            Self::Energy => "energy",
            Self::Power => "power",
        };
        f.write_str(name)
    }
}

/// A unit: its dimension and the factor that converts it to SI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub dimension: Dimension,
    pub to_si: f64,
}

impl Unit {
    #[must_use]
    pub fn new(dimension: Dimension, to_si: f64) -> Self {
        Self { dimension, to_si }
    }
}

/// Unit name to [`Unit`] lookup used by the `convert` function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitTable {
    units: HashMap<String, Unit>,
}

impl UnitTable {
    /// Returns an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table of common SI and US customary units.
    #[must_use]
    pub fn standard() -> Self {
        use Dimension::{Energy, Force, Length, Mass, Power, Pressure, Time};

        const UNITS: &[(&str, Dimension, f64)] = &[
            ("m", Length, 1.0),
            ("cm", Length, 0.01),
            ("mm", Length, 0.001),
            ("km", Length, 1000.0),
            ("in", Length, 0.0254),
            ("ft", Length, 0.3048),
            ("yd", Length, 0.9144),
            ("mi", Length, 1609.344),
            ("kg", Mass, 1.0),
            ("g", Mass, 0.001),
            ("lb", Mass, 0.453_592_37),
            ("slug", Mass, 14.593_902_94),
            ("s", Time, 1.0),
            ("min", Time, 60.0),
            ("hr", Time, 3600.0),
            ("day", Time, 86_400.0),
            ("N", Force, 1.0),
            ("kN", Force, 1000.0),
            ("lbf", Force, 4.448_221_615_260_5),
            ("Pa", Pressure, 1.0),
            ("kPa", Pressure, 1.0e3),
            ("MPa", Pressure, 1.0e6),
            ("bar", Pressure, 1.0e5),
            ("atm", Pressure, 101_325.0),
            ("psi", Pressure, 6_894.757_293_168),
            ("J", Energy, 1.0),
            ("kJ", Energy, 1000.0),
            ("cal", Energy, 4.184),
            ("BTU", Energy, 1_055.055_852_62),
            ("kWh", Energy, 3.6e6),
            ("W", Power, 1.0),
            ("kW", Power, 1000.0),
            ("hp", Power, 745.699_871_582_27),
        ];

        UNITS
            .iter()
            .fold(Self::new(), |table, &(name, dimension, to_si)| {
                table.with(name, Unit::new(dimension, to_si))
            })
    }

    /// Adds or replaces a unit, returning the updated table.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, unit: Unit) -> Self {
        self.insert(name, unit);
        self
    }

    /// Adds or replaces a unit.
    pub fn insert(&mut self, name: impl Into<String>, unit: Unit) {
        self.units.insert(name.into(), unit);
    }

    /// Looks up a unit by name. Names are case-sensitive (`mm` is not `Mm`).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Unit> {
        self.units.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Converts `value` from one unit to another of the same dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if either unit is unknown or the dimensions differ.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, FunctionError> {
        let source = self
            .get(from)
            .ok_or_else(|| FunctionError::UnknownUnit(from.to_string()))?;
        let target = self
            .get(to)
            .ok_or_else(|| FunctionError::UnknownUnit(to.to_string()))?;

        if source.dimension != target.dimension {
            return Err(FunctionError::IncompatibleUnits {
                from: from.to_string(),
                from_dimension: source.dimension,
                to: to.to_string(),
                to_dimension: target.dimension,
            });
        }

        Ok(value * source.to_si / target.to_si)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn converts_within_a_dimension() {
        let table = UnitTable::standard();

        assert_relative_eq!(table.convert(1.0, "mi", "ft").unwrap(), 5280.0, epsilon = 1e-9);
        assert_relative_eq!(table.convert(1.0, "atm", "psi").unwrap(), 14.695_95, epsilon = 1e-5);
        assert_relative_eq!(table.convert(2.0, "hr", "s").unwrap(), 7200.0);
    }

    #[test]
    fn rejects_mixed_dimensions() {
        let err = UnitTable::standard().convert(1.0, "m", "kg").unwrap_err();
        assert!(matches!(
            err,
            FunctionError::IncompatibleUnits {
                from_dimension: Dimension::Length,
                to_dimension: Dimension::Mass,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_units() {
        let err = UnitTable::standard().convert(1.0, "furlong", "m").unwrap_err();
        assert_eq!(err, FunctionError::UnknownUnit("furlong".to_string()));
    }

    #[test]
    fn custom_units_extend_the_table() {
        let table = UnitTable::standard().with("furlong", Unit::new(Dimension::Length, 201.168));
        assert_relative_eq!(table.convert(1.0, "furlong", "yd").unwrap(), 220.0, epsilon = 1e-9);
    }
}
