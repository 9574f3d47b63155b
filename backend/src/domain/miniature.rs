//! Catalogue items: die-cast miniatures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum length of the `name` and `brand` fields.
pub const NAME_MAX: usize = 150;
/// Maximum length of the `scale` field.
pub const SCALE_MAX: usize = 50;
/// Maximum length of the `year` field.
pub const YEAR_MAX: usize = 4;

/// Store-assigned miniature identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct MiniatureId(i64);

impl MiniatureId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MiniatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for miniature details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiniatureValidationError {
    /// A required field was blank once trimmed.
    EmptyField { field: &'static str },
    /// A field exceeded its storage width.
    FieldTooLong { field: &'static str, max: usize },
}

impl MiniatureValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } | Self::FieldTooLong { field, .. } => field,
        }
    }
}

impl fmt::Display for MiniatureValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for MiniatureValidationError {}

/// Validated, user-editable miniature attributes.
///
/// ## Invariants
/// - every field is trimmed and non-empty;
/// - `name`/`brand` fit 150 characters, `scale` 50, `year` 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniatureDetails {
    name: String,
    brand: String,
    scale: String,
    year: String,
}

fn validated(raw: &str, field: &'static str, max: usize) -> Result<String, MiniatureValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MiniatureValidationError::EmptyField { field });
    }
    if trimmed.chars().count() > max {
        return Err(MiniatureValidationError::FieldTooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

impl MiniatureDetails {
    /// Validate raw inputs.
    ///
    /// # Examples
    /// ```
    /// use minipedia::domain::MiniatureDetails;
    ///
    /// let details = MiniatureDetails::try_from_parts(" Skyline GT-R ", "Tomica", "1:64", "1999")
    ///     .expect("valid details");
    /// assert_eq!(details.name(), "Skyline GT-R");
    /// ```
    pub fn try_from_parts(
        name: &str,
        brand: &str,
        scale: &str,
        year: &str,
    ) -> Result<Self, MiniatureValidationError> {
        Ok(Self {
            name: validated(name, "name", NAME_MAX)?,
            brand: validated(brand, "brand", NAME_MAX)?,
            scale: validated(scale, "scale", SCALE_MAX)?,
            year: validated(year, "year", YEAR_MAX)?,
        })
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Manufacturer.
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Scale, e.g. `1:64`.
    pub fn scale(&self) -> &str {
        &self.scale
    }

    /// Release year as free text.
    pub fn year(&self) -> &str {
        &self.year
    }
}

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Miniature {
    #[schema(value_type = i64, example = 7)]
    id: MiniatureId,
    #[schema(example = "Skyline GT-R")]
    name: String,
    #[schema(example = "Tomica")]
    brand: String,
    #[schema(example = "1:64")]
    scale: String,
    #[schema(example = "1999")]
    year: String,
    #[schema(value_type = Option<String>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<UserId>,
    created_at: DateTime<Utc>,
}

impl Miniature {
    /// Assemble a stored miniature.
    pub fn new(
        id: MiniatureId,
        details: MiniatureDetails,
        created_by: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let MiniatureDetails {
            name,
            brand,
            scale,
            year,
        } = details;
        Self {
            id,
            name,
            brand,
            scale,
            year,
            created_by,
            created_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> MiniatureId {
        self.id
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Manufacturer.
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Scale.
    pub fn scale(&self) -> &str {
        &self.scale
    }

    /// Release year.
    pub fn year(&self) -> &str {
        &self.year
    }

    /// User recorded as the creator, if any.
    pub fn created_by(&self) -> Option<&UserId> {
        self.created_by.as_ref()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the editable attributes, keeping identity and provenance.
    #[must_use]
    pub fn with_details(self, details: MiniatureDetails) -> Self {
        Self::new(self.id, details, self.created_by, self.created_at)
    }
}
