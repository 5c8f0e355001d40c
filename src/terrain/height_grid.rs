use crate::error::{ConfigError, Result};

use super::HeightSurface;

/// Regular grid of terrain heights over the XZ plane, sampled bilinearly.
///
/// Sample `(col, row)` sits at `(origin_x + col * spacing, origin_z + row * spacing)`.
/// Queries outside the grid return `None`.
#[derive(Debug, Clone)]
pub struct HeightGrid {
    origin_x: f64,
    origin_z: f64,
    spacing: f64,
    cols: usize,
    rows: usize,
    heights: Vec<f64>,
}

impl HeightGrid {
    /// Creates a grid from row-major `heights` (`rows * cols` values).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] if `spacing` is not positive, or if
    /// the grid is smaller than 2x2 or `heights` does not match its size.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        origin_x: f64,
        origin_z: f64,
        spacing: f64,
        cols: usize,
        heights: Vec<f64>,
    ) -> Result<Self> {
        if !(spacing > 0.0 && spacing.is_finite()) {
            return Err(ConfigError::NonPositive {
                parameter: "grid spacing",
                value: spacing,
            }
            .into());
        }
        let rows = if cols == 0 { 0 } else { heights.len() / cols };
        if cols < 2 || rows < 2 || rows * cols != heights.len() {
            return Err(ConfigError::NonPositive {
                parameter: "grid size",
                value: heights.len() as f64,
            }
            .into());
        }
        Ok(Self {
            origin_x,
            origin_z,
            spacing,
            cols,
            rows,
            heights,
        })
    }

    /// Builds a grid by sampling `height(x, z)` at every grid node.
    ///
    /// # Errors
    ///
    /// Same conditions as [`HeightGrid::new`].
    #[allow(clippy::cast_precision_loss)]
    pub fn from_fn(
        origin_x: f64,
        origin_z: f64,
        spacing: f64,
        cols: usize,
        rows: usize,
        height: impl Fn(f64, f64) -> f64,
    ) -> Result<Self> {
        let mut heights = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                heights.push(height(
                    origin_x + col as f64 * spacing,
                    origin_z + row as f64 * spacing,
                ));
            }
        }
        Self::new(origin_x, origin_z, spacing, cols, heights)
    }

    fn node(&self, col: usize, row: usize) -> f64 {
        self.heights[row * self.cols + col]
    }
}

impl HeightSurface for HeightGrid {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn height_at(&self, x: f64, z: f64) -> Option<f64> {
        let gx = (x - self.origin_x) / self.spacing;
        let gz = (z - self.origin_z) / self.spacing;
        let max_x = (self.cols - 1) as f64;
        let max_z = (self.rows - 1) as f64;
        if !(0.0..=max_x).contains(&gx) || !(0.0..=max_z).contains(&gz) {
            return None;
        }

        // Cell whose lower corner is (c, r); the last row/column maps onto the cell before it.
        let c = (gx.floor() as usize).min(self.cols - 2);
        let r = (gz.floor() as usize).min(self.rows - 2);
        let fx = gx - c as f64;
        let fz = gz - r as f64;

        let h00 = self.node(c, r);
        let h10 = self.node(c + 1, r);
        let h01 = self.node(c, r + 1);
        let h11 = self.node(c + 1, r + 1);
        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        Some(near + (far - near) * fz)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_bad_sizes() {
        assert!(HeightGrid::new(0.0, 0.0, 1.0, 2, vec![0.0; 3]).is_err());
        assert!(HeightGrid::new(0.0, 0.0, 1.0, 1, vec![0.0; 2]).is_err());
        assert!(HeightGrid::new(0.0, 0.0, 0.0, 2, vec![0.0; 4]).is_err());
    }

    #[test]
    fn bilinear_interpolation() {
        let grid = HeightGrid::new(0.0, 0.0, 2.0, 2, vec![0.0, 2.0, 4.0, 6.0]).unwrap();
        assert_relative_eq!(grid.height_at(0.0, 0.0).unwrap(), 0.0);
        assert_relative_eq!(grid.height_at(1.0, 0.0).unwrap(), 1.0);
        assert_relative_eq!(grid.height_at(1.0, 1.0).unwrap(), 3.0);
        assert_relative_eq!(grid.height_at(2.0, 2.0).unwrap(), 6.0);
    }

    #[test]
    fn outside_is_none() {
        let grid = HeightGrid::from_fn(-1.0, -1.0, 0.5, 5, 5, |x, z| x + z).unwrap();
        assert!(grid.height_at(1.01, 0.0).is_none());
        assert!(grid.height_at(0.0, -1.5).is_none());
        assert_relative_eq!(grid.height_at(0.25, 0.5).unwrap(), 0.75, epsilon = 1e-12);
    }
}
