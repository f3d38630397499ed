//! DICOM age strings (`AS` value representation).
//!
//! Format: `nnnX` where `nnn` is the magnitude and `X` the unit
//! (`D` days, `W` weeks, `M` months, `Y` years). The unit is required: a
//! value without one is rejected instead of being read as years.

use scandemo_model::AgeUnit;

/// Reasons an age string is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeStringError {
    Empty,
    MissingUnit,
    UnknownUnit(char),
    InvalidMagnitude,
}

impl std::fmt::Display for AgeStringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "age string is empty"),
            Self::MissingUnit => write!(f, "age string has no D/W/M/Y unit"),
            Self::UnknownUnit(unit) => write!(f, "unknown age unit '{unit}'"),
            Self::InvalidMagnitude => write!(f, "age magnitude is not a whole number"),
        }
    }
}

impl std::error::Error for AgeStringError {}

/// Parses a DICOM age string into a magnitude and unit.
///
/// # Examples
/// ```
/// use scandemo_model::AgeUnit;
/// use scandemo_resolve::age_string::parse_age_string;
///
/// assert_eq!(parse_age_string("032Y"), Ok((32, AgeUnit::Years)));
/// assert_eq!(parse_age_string("007D"), Ok((7, AgeUnit::Days)));
/// ```
pub fn parse_age_string(value: &str) -> Result<(u32, AgeUnit), AgeStringError> {
    let trimmed = value.trim();
    let Some(unit_char) = trimmed.chars().last() else {
        return Err(AgeStringError::Empty);
    };
    if unit_char.is_ascii_digit() {
        return Err(AgeStringError::MissingUnit);
    }
    let unit = unit_char
        .to_string()
        .parse::<AgeUnit>()
        .map_err(|_| AgeStringError::UnknownUnit(unit_char))?;

    let magnitude = trimmed[..trimmed.len() - unit_char.len_utf8()].trim_end();
    if magnitude.is_empty() || !magnitude.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(AgeStringError::InvalidMagnitude);
    }
    let magnitude = magnitude
        .parse::<u32>()
        .map_err(|_| AgeStringError::InvalidMagnitude)?;
    Ok((magnitude, unit))
}
