//! Create / edit form for a dog profile.

use thiserror::Error;

use dogwalk_core::validation::{self, ValidationError};
use dogwalk_core::{Dog, DogChanges, NewDog, Sex, Size, Socialization};

use crate::client::DogApi;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

/// Editable field values. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub breed: String,
    pub date_of_birth: String,
    pub energy_level: i64,
    pub is_neutered: bool,
    pub sex: Sex,
    pub size: Size,
    pub socialization: Socialization,
    pub special_instructions: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            breed: String::new(),
            date_of_birth: String::new(),
            energy_level: 3,
            is_neutered: false,
            sex: Sex::Male,
            size: Size::Medium,
            socialization: Socialization::default(),
            special_instructions: String::new(),
        }
    }
}

impl FormValues {
    /// Prefill from a stored dog; unset fields keep their defaults.
    pub fn from_dog(dog: &Dog) -> Self {
        let defaults = Self::default();
        Self {
            name: dog.name.clone(),
            breed: dog.breed.clone().unwrap_or_default(),
            date_of_birth: dog.date_of_birth.clone().unwrap_or_default(),
            energy_level: dog.energy_level.map_or(defaults.energy_level, i64::from),
            is_neutered: dog.is_neutered.unwrap_or(defaults.is_neutered),
            sex: dog.sex.unwrap_or(defaults.sex),
            size: dog.size.unwrap_or(defaults.size),
            socialization: dog.socialization.unwrap_or_default(),
            special_instructions: dog.special_instructions.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Name, energy level, sex, and size are required fields")]
    Required,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        Self::new(400, err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DogForm {
    pub mode: FormMode,
    pub values: FormValues,
}

impl DogForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            values: FormValues::default(),
        }
    }

    /// Load an existing dog for editing.
    pub async fn edit(api: &dyn DogApi, id: &str) -> Result<Self, ApiError> {
        let dog = api.get_dog(id).await?;
        Ok(Self {
            mode: FormMode::Edit(dog.id.clone()),
            values: FormValues::from_dog(&dog),
        })
    }

    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// Check the values and produce the payload to send.
    pub fn validate(&self) -> Result<NewDog, FormError> {
        let v = &self.values;
        if v.name.trim().is_empty() {
            return Err(FormError::Required);
        }
        let optional = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());

        Ok(NewDog {
            name: v.name.trim().to_string(),
            breed: optional(&v.breed),
            date_of_birth: optional(&v.date_of_birth),
            energy_level: validation::energy_level(v.energy_level)?,
            is_neutered: Some(v.is_neutered),
            sex: v.sex,
            size: v.size,
            socialization: Some(v.socialization),
            special_instructions: optional(&v.special_instructions),
        })
    }

    /// Validate, then create or update depending on the mode.
    pub async fn submit(&self, api: &dyn DogApi) -> Result<Dog, ApiError> {
        let dog = self.validate()?;
        match &self.mode {
            FormMode::Create => api.create_dog(&dog).await,
            FormMode::Edit(id) => api.update_dog(id, &DogChanges::from(dog)).await,
        }
    }
}
