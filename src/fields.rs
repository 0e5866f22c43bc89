//! Field selection and cycle selection for the SILO conversion step.

use std::fmt;
use std::str::FromStr;

use crate::errors::CustodyError;

/// Physical fields the converter can export, in mask order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// p
    Pressure,
    /// n
    Density,
    /// B
    MagneticField,
    /// v
    Velocity,
    /// J
    CurrentDensity,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Pressure,
        Field::Density,
        Field::MagneticField,
        Field::Velocity,
        Field::CurrentDensity,
    ];

    /// Raw HYM output file that must exist to export this field.
    pub fn data_file(self) -> &'static str {
        match self {
            Field::Pressure => "h3ds.d",
            Field::Density => "h3ds_ff.d",
            Field::MagneticField => "h3db.d",
            Field::Velocity => "h3dv.d",
            Field::CurrentDensity => "h3dj.d",
        }
    }
}

/// Five on/off flags, written as a string such as `10110`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldMask([bool; 5]);

impl FieldMask {
    pub fn is_selected(&self, field: Field) -> bool {
        let idx = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
        self.0[idx]
    }

    pub fn selected(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| self.is_selected(*f))
    }
}

impl FromStr for FieldMask {
    type Err = CustodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || CustodyError::InvalidFieldMask(s.to_string());
        if s.len() != 5 {
            return Err(bad());
        }
        let mut flags = [false; 5];
        for (slot, c) in flags.iter_mut().zip(s.chars()) {
            *slot = match c {
                '1' => true,
                '0' => false,
                _ => return Err(bad()),
            };
        }
        Ok(Self(flags))
    }
}

impl fmt::Display for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for on in self.0 {
            f.write_str(if on { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Which output cycles to convert. `0` on the command line means all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleSelector {
    #[default]
    All,
    Single(u32),
}

impl CycleSelector {
    pub fn from_arg(n: u32) -> Self {
        if n == 0 { CycleSelector::All } else { CycleSelector::Single(n) }
    }

    /// Positional value passed to the collaborators.
    pub fn as_arg(self) -> u32 {
        match self {
            CycleSelector::All => 0,
            CycleSelector::Single(n) => n,
        }
    }

    /// A single cycle must lie in `[1, ncyc]`.
    pub fn check(self, ncyc: u32) -> Result<(), CustodyError> {
        match self {
            CycleSelector::Single(n) if n > ncyc => Err(CustodyError::CycleOutOfRange { cycle: n, ncyc }),
            _ => Ok(()),
        }
    }
}
