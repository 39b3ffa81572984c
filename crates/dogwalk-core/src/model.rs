//! Dog profile data model.
//!
//! Field names follow the camelCase JSON of the REST surface. Optional fields
//! are omitted from the wire when unset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

/// Moderation state of an uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoStatus {
    Pending,
    Approved,
    Rejected,
}

impl Sex {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl Size {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl PhotoStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(ValidationError::Sex),
        }
    }
}

impl FromStr for Size {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(ValidationError::Size),
        }
    }
}

/// How a dog gets along with others. Missing flags read as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Socialization {
    pub good_with_children: bool,
    pub good_with_large_dogs: bool,
    pub good_with_puppies: bool,
    pub good_with_small_dogs: bool,
}

/// A dog profile as stored and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dog {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_neutered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socialization: Option<Socialization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_status: Option<PhotoStatus>,
}

impl Dog {
    /// A bare record with only the identity fields set.
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            breed: None,
            date_of_birth: None,
            energy_level: None,
            is_neutered: None,
            sex: None,
            size: None,
            socialization: None,
            special_instructions: None,
            photo_url: None,
            photo_hash: None,
            photo_status: None,
        }
    }

    pub const fn has_photo(&self) -> bool {
        self.photo_url.is_some()
    }

    pub fn photo_pending(&self) -> bool {
        self.photo_status == Some(PhotoStatus::Pending)
    }
}

/// One page of the dog collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogList {
    pub dogs: Vec<Dog>,
    /// Id of the last dog on this page when more remain; `null` otherwise.
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Result of the breed-detection sub-resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedBreed {
    pub id: String,
    pub breed: String,
    pub confidence: u8,
}

/// Untyped create/update payload as it arrives on the wire.
///
/// Enum-like fields stay strings so that an unknown value becomes a field
/// validation error instead of a body parse failure. Photo fields are absent
/// on purpose: they are silently dropped if a client sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DogInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_neutered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socialization: Option<Socialization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// A validated create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDog {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    pub energy_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_neutered: Option<bool>,
    pub sex: Sex,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socialization: Option<Socialization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl NewDog {
    /// Materialise the record under a freshly assigned id.
    pub fn into_dog(self, id: String) -> Dog {
        Dog {
            id,
            name: self.name,
            breed: self.breed,
            date_of_birth: self.date_of_birth,
            energy_level: Some(self.energy_level),
            is_neutered: self.is_neutered,
            sex: Some(self.sex),
            size: Some(self.size),
            socialization: self.socialization,
            special_instructions: self.special_instructions,
            photo_url: None,
            photo_hash: None,
            photo_status: None,
        }
    }
}

/// A validated partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DogChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_neutered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socialization: Option<Socialization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl DogChanges {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.breed.is_none()
            && self.date_of_birth.is_none()
            && self.energy_level.is_none()
            && self.is_neutered.is_none()
            && self.sex.is_none()
            && self.size.is_none()
            && self.socialization.is_none()
            && self.special_instructions.is_none()
    }

    /// Copy every supplied field onto `dog`. Photo fields are never touched.
    pub fn apply_to(self, dog: &mut Dog) {
        if let Some(name) = self.name {
            dog.name = name;
        }
        if let Some(breed) = self.breed {
            dog.breed = Some(breed);
        }
        if let Some(dob) = self.date_of_birth {
            dog.date_of_birth = Some(dob);
        }
        if let Some(level) = self.energy_level {
            dog.energy_level = Some(level);
        }
        if let Some(neutered) = self.is_neutered {
            dog.is_neutered = Some(neutered);
        }
        if let Some(sex) = self.sex {
            dog.sex = Some(sex);
        }
        if let Some(size) = self.size {
            dog.size = Some(size);
        }
        if let Some(social) = self.socialization {
            dog.socialization = Some(social);
        }
        if let Some(instructions) = self.special_instructions {
            dog.special_instructions = Some(instructions);
        }
    }
}

/// A full form submission expressed as an update touching every editable field.
impl From<NewDog> for DogChanges {
    fn from(dog: NewDog) -> Self {
        Self {
            name: Some(dog.name),
            breed: dog.breed,
            date_of_birth: dog.date_of_birth,
            energy_level: Some(dog.energy_level),
            is_neutered: dog.is_neutered,
            sex: Some(dog.sex),
            size: Some(dog.size),
            socialization: dog.socialization,
            special_instructions: dog.special_instructions,
        }
    }
}
