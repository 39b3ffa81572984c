//! Field validation for dog create/update payloads.
//!
//! On create, energy level, sex and size are mandatory and the name must be
//! non-empty. On update every field is optional, but each supplied field is
//! held to the same rule as on create.

use thiserror::Error;

use crate::model::{DogChanges, DogInput, NewDog, Sex, Size};

/// Inclusive bounds for `energyLevel`.
pub const ENERGY_LEVEL_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// A field-level validation failure. The message names the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("energyLevel, sex, and size are required fields")]
    MissingRequired,

    #[error("name is required")]
    NameRequired,

    #[error("energyLevel must be between 1 and 5")]
    EnergyLevelRange,

    #[error("sex must be either \"male\" or \"female\"")]
    Sex,

    #[error("size must be either \"small\", \"medium\", or \"large\"")]
    Size,
}

/// Check an energy level and narrow it to the stored width.
pub fn energy_level(level: i64) -> Result<u8, ValidationError> {
    if !ENERGY_LEVEL_RANGE.contains(&level) {
        return Err(ValidationError::EnergyLevelRange);
    }
    u8::try_from(level).map_err(|_| ValidationError::EnergyLevelRange)
}

/// Validate a create payload.
pub fn validate_new(input: DogInput) -> Result<NewDog, ValidationError> {
    let (Some(level), Some(sex), Some(size)) = (input.energy_level, input.sex, input.size) else {
        return Err(ValidationError::MissingRequired);
    };

    let name = input
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or(ValidationError::NameRequired)?;

    Ok(NewDog {
        name,
        breed: input.breed,
        date_of_birth: input.date_of_birth,
        energy_level: energy_level(level)?,
        is_neutered: input.is_neutered,
        sex: sex.parse::<Sex>()?,
        size: size.parse::<Size>()?,
        socialization: input.socialization,
        special_instructions: input.special_instructions,
    })
}

/// Validate an update payload. Absent fields stay absent.
pub fn validate_changes(input: DogInput) -> Result<DogChanges, ValidationError> {
    let energy_level = input.energy_level.map(energy_level).transpose()?;
    let sex = input.sex.as_deref().map(str::parse::<Sex>).transpose()?;
    let size = input.size.as_deref().map(str::parse::<Size>).transpose()?;

    if input.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ValidationError::NameRequired);
    }

    Ok(DogChanges {
        name: input.name,
        breed: input.breed,
        date_of_birth: input.date_of_birth,
        energy_level,
        is_neutered: input.is_neutered,
        sex,
        size,
        socialization: input.socialization,
        special_instructions: input.special_instructions,
    })
}
