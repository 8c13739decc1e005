// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

use nalgebra::DMatrix;
use num::complex::{c64, Complex64};

use crate::error::{FractalError, Result};

/// Complex sample points stored as (row, column) = (y-index, x-index).
pub type Mesh = DMatrix<Complex64>;

// {{{ Region / Resolution

/// Rectangle $[x_{min}, x_{max}] \times [y_{min}, y_{max}]$ of the complex plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Region {
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Region {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_interval("x", self.x_min, self.x_max)?;
        check_interval("y", self.y_min, self.y_max)
    }
}

fn check_interval(axis: &str, min: f64, max: f64) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(FractalError::invalid(format!(
            "{axis} interval [{min}, {max}] is not finite"
        )));
    }

    if min >= max {
        return Err(FractalError::invalid(format!(
            "{axis} interval [{min}, {max}] is empty or inverted"
        )));
    }

    Ok(())
}

/// Number of samples along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub const fn new(width: usize, height: usize) -> Self {
        Resolution { width, height }
    }

    pub const fn square(n: usize) -> Self {
        Resolution::new(n, n)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(FractalError::invalid(format!(
                "resolution must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }

    pub fn npoints(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// }}}

// {{{ sample grid

/// *n* evenly spaced values over $[start, end]$, both endpoints included.
///
/// Samples are interpolated as $start (1 - t) + end \, t$, which stays finite
/// for any finite endpoints (the width $end - start$ itself may overflow) and
/// hits both endpoints exactly. A single sample sits at *start*.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    let t = (i as f64) / last;
                    start * (1.0 - t) + end * t
                })
                .collect()
        }
    }
}

/// Intervals only a few ULPs wide cannot hold *n* distinct doubles.
fn check_spacing(axis: &str, values: &[f64]) -> Result<()> {
    if values.windows(2).all(|p| p[0] < p[1]) {
        return Ok(());
    }

    Err(FractalError::invalid(format!(
        "{axis} interval [{}, {}] is too narrow for {} distinct samples",
        values[0],
        values[values.len() - 1],
        values.len()
    )))
}

#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
}

impl SampleGrid {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.x_values.len(), self.y_values.len())
    }

    /// Point for pixel (*column*, *row*) = (x-index, y-index).
    pub fn point(&self, column: usize, row: usize) -> Complex64 {
        c64(self.x_values[column], self.y_values[row])
    }

    /// Cartesian product of the two axes, shaped (height, width).
    pub fn mesh(&self) -> Mesh {
        DMatrix::from_fn(self.y_values.len(), self.x_values.len(), |row, column| {
            self.point(column, row)
        })
    }
}

/// Sample *region* uniformly with *resolution* points per axis.
pub fn generate(region: &Region, resolution: Resolution) -> Result<SampleGrid> {
    resolution.validate()?;
    region.validate()?;

    let x_values = linspace(region.x_min, region.x_max, resolution.width);
    let y_values = linspace(region.y_min, region.y_max, resolution.height);
    check_spacing("x", &x_values)?;
    check_spacing("y", &y_values)?;

    Ok(SampleGrid { x_values, y_values })
}

// }}}

// {{{ tests

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1.0e-12;

    fn region() -> Region {
        Region::new(-2.0, 1.0, -1.5, 1.5)
    }

    #[test]
    fn test_axes_cover_region() {
        for &(w, h) in &[(2, 2), (3, 7), (100, 100), (1024, 17)] {
            let grid = generate(&region(), Resolution::new(w, h)).unwrap();
            assert_eq!(grid.x_values.len(), w);
            assert_eq!(grid.y_values.len(), h);

            assert!((grid.x_values[0] + 2.0).abs() < EPS);
            assert!((grid.x_values[w - 1] - 1.0).abs() < EPS);
            assert!((grid.y_values[0] + 1.5).abs() < EPS);
            assert!((grid.y_values[h - 1] - 1.5).abs() < EPS);

            assert!(grid.x_values.windows(2).all(|p| p[0] < p[1]));
            assert!(grid.y_values.windows(2).all(|p| p[0] < p[1]));
        }
    }

    #[test]
    fn test_uniform_spacing() {
        let values = linspace(0.0, 1.0, 5);
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_single_sample() {
        let grid = generate(&region(), Resolution::new(1, 1)).unwrap();
        assert_eq!(grid.x_values, vec![-2.0]);
        assert_eq!(grid.y_values, vec![-1.5]);
    }

    #[test]
    fn test_reproducible() {
        let a = generate(&region(), Resolution::new(33, 65)).unwrap();
        let b = generate(&region(), Resolution::new(33, 65)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_resolution() {
        for res in [Resolution::new(0, 10), Resolution::new(10, 0)] {
            assert!(matches!(
                generate(&region(), res),
                Err(FractalError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_invalid_region() {
        let bad = [
            Region::new(1.0, -2.0, -1.5, 1.5),
            Region::new(-2.0, 1.0, 0.5, 0.5),
            Region::new(f64::NAN, 1.0, -1.5, 1.5),
            Region::new(-2.0, f64::INFINITY, -1.5, 1.5),
        ];

        for region in bad {
            assert!(matches!(
                generate(&region, Resolution::square(8)),
                Err(FractalError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_wide_region() {
        let grid = generate(
            &Region::new(-1.0e308, 1.0e308, -f64::MAX, f64::MAX),
            Resolution::square(3),
        )
        .unwrap();

        assert_eq!(grid.x_values, vec![-1.0e308, 0.0, 1.0e308]);
        assert_eq!(grid.y_values, vec![-f64::MAX, 0.0, f64::MAX]);
        assert!(grid.x_values.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_too_narrow_region() {
        let narrow = Region::new(0.0, 5.0e-324, -1.5, 1.5);

        assert!(matches!(
            generate(&narrow, Resolution::new(3, 3)),
            Err(FractalError::InvalidArgument(_))
        ));
        // two samples only need the two endpoints
        let grid = generate(&narrow, Resolution::new(2, 3)).unwrap();
        assert_eq!(grid.x_values, vec![0.0, 5.0e-324]);
    }

    #[test]
    fn test_mesh_layout() {
        let grid = generate(&region(), Resolution::new(4, 3)).unwrap();
        let mesh = grid.mesh();

        assert_eq!(mesh.shape(), (3, 4));
        for row in 0..3 {
            for column in 0..4 {
                let z = mesh[(row, column)];
                assert_eq!(z.re, grid.x_values[column]);
                assert_eq!(z.im, grid.y_values[row]);
            }
        }
    }
}

// }}}
