use crate::error::{ConfigError, Result};

/// Cross-section swept along the fitted path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSectionProfile {
    /// Distance between the two rails.
    pub width: f64,
    /// Height of the skirt walls hanging below the rails.
    pub side_height: f64,
    /// Lift of the ribbon surface above the fitted centerline.
    pub offset_height: f64,
    /// Target number of path samples per world unit.
    pub samples_per_unit: f64,
}

impl Default for CrossSectionProfile {
    fn default() -> Self {
        Self {
            width: 1.0,
            side_height: 0.25,
            offset_height: 0.0,
            samples_per_unit: 1.0,
        }
    }
}

impl CrossSectionProfile {
    /// Creates a profile with the default sampling density.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any dimension is out of range.
    pub fn new(width: f64, side_height: f64, offset_height: f64) -> Result<Self> {
        let profile = Self {
            width,
            side_height,
            offset_height,
            ..Self::default()
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Returns half the width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Checks every dimension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] if `width`, `side_height` or
    /// `samples_per_unit` is not positive and finite, or
    /// [`ConfigError::Negative`] if `offset_height` is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("width", self.width),
            ("side height", self.side_height),
            ("samples per unit", self.samples_per_unit),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { parameter, value }.into());
            }
        }
        if !(self.offset_height >= 0.0 && self.offset_height.is_finite()) {
            return Err(ConfigError::Negative {
                parameter: "offset height",
                value: self.offset_height,
            }
            .into());
        }
        Ok(())
    }
}
