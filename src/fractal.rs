// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

use std::fmt;

use clap::ValueEnum;
use nalgebra::DMatrix;
use num::complex::{c64, Complex64};
use rayon::prelude::*;
use tracing::debug;

use crate::batched::{BatchState, Operand};
use crate::error::Result;
use crate::escape::{check_maxit, escape_time};
use crate::grid::{generate, Mesh, Region, Resolution, SampleGrid};

// {{{ Family / Strategy

/// How the sample point enters the map $z \gets z^2 + c$.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Family {
    /// $z_0 = 0$ and $c$ is the sample point.
    Mandelbrot,
    /// $z_0$ is the sample point and $c$ is fixed.
    Julia(Complex64),
}

impl Family {
    /// Split a sample point into $(z_0, c)$.
    #[inline]
    pub fn orbit_start(&self, point: Complex64) -> (Complex64, Complex64) {
        match *self {
            Family::Mandelbrot => (c64(0.0, 0.0), point),
            Family::Julia(c) => (point, c),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Mandelbrot => write!(f, "mandelbrot"),
            Family::Julia(c) => write!(f, "julia({})", c),
        }
    }
}

/// Evaluator used to fill the escape-count grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// One point at a time, row by row.
    Scalar,
    /// One point at a time, rows spread over the rayon pool.
    ScalarParallel,
    /// Whole mesh at once with masked steps.
    Batched,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Scalar => "scalar",
            Strategy::ScalarParallel => "scalar-parallel",
            Strategy::Batched => "batched",
        };
        f.write_str(name)
    }
}

// }}}

// {{{ FractalSet

/// Escape counts together with the axes they were sampled on.
///
/// `counts[(row, column)]` belongs to the point
/// `x_values[column] + i y_values[row]`, so the grid has shape
/// (height, width).
#[derive(Clone, Debug, PartialEq)]
pub struct FractalSet {
    pub counts: DMatrix<u32>,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub maxit: u32,
}

impl FractalSet {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.x_values.len(), self.y_values.len())
    }

    /// Count at pixel (*column*, *row*).
    pub fn at(&self, column: usize, row: usize) -> u32 {
        self.counts[(row, column)]
    }

    /// Number of cells where exactly one of the two sets exhausted its budget.
    ///
    /// Zero between scalar and batched sets whenever every start point lies in
    /// the escape disk (always for Mandelbrot). Julia sets with $|c| > 2$ can
    /// disagree on start points outside the disk.
    pub fn bounded_mismatches(&self, other: &FractalSet) -> usize {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .filter(|(&a, &b)| (a == self.maxit) != (b == other.maxit))
            .count()
    }
}

// }}}

// {{{ FractalJob

/// Inputs of one evaluation, built ahead of time so that repeated runs only
/// pay for the iteration itself.
#[derive(Clone, Debug)]
pub struct FractalJob {
    pub family: Family,
    pub strategy: Strategy,
    pub maxit: u32,
    grid: SampleGrid,
    batch: Option<BatchInputs>,
}

/// Meshes handed to the batched evaluator.
#[derive(Clone, Debug)]
enum BatchInputs {
    Mandelbrot { z0: Mesh, c: Mesh },
    Julia { z0: Mesh, c: Complex64 },
}

impl FractalJob {
    pub fn prepare(
        family: Family,
        region: &Region,
        resolution: Resolution,
        maxit: u32,
        strategy: Strategy,
    ) -> Result<Self> {
        check_maxit(maxit)?;
        let grid = generate(region, resolution)?;

        let batch = match strategy {
            Strategy::Batched => {
                let mesh = grid.mesh();
                Some(match family {
                    Family::Mandelbrot => BatchInputs::Mandelbrot {
                        z0: Mesh::zeros(mesh.nrows(), mesh.ncols()),
                        c: mesh,
                    },
                    Family::Julia(c) => BatchInputs::Julia { z0: mesh, c },
                })
            }
            _ => None,
        };

        Ok(FractalJob {
            family,
            strategy,
            maxit,
            grid,
            batch,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.grid.resolution()
    }

    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    /// Evaluate the whole grid. Every call allocates its own output and
    /// working buffers.
    pub fn run(&self) -> DMatrix<u32> {
        match &self.batch {
            Some(BatchInputs::Mandelbrot { z0, c }) => {
                BatchState::new(z0.clone()).run(&Operand::Mesh(c), self.maxit)
            }
            Some(BatchInputs::Julia { z0, c }) => {
                BatchState::new(z0.clone()).run(&Operand::Uniform(*c), self.maxit)
            }
            None => self.run_scalar(self.strategy == Strategy::ScalarParallel),
        }
    }

    fn run_scalar(&self, parallel: bool) -> DMatrix<u32> {
        let Resolution { width, height } = self.grid.resolution();
        let mut pixels = vec![0u32; width * height];

        let render_band = |(row, band): (usize, &mut [u32])| {
            for (column, pixel) in band.iter_mut().enumerate() {
                let (z0, c) = self.family.orbit_start(self.grid.point(column, row));
                *pixel = escape_time(z0, c, self.maxit);
            }
        };

        if parallel {
            pixels.par_chunks_mut(width).enumerate().for_each(render_band);
        } else {
            pixels.chunks_mut(width).enumerate().for_each(render_band);
        }

        DMatrix::from_row_slice(height, width, &pixels)
    }

    pub fn into_set(self, counts: DMatrix<u32>) -> FractalSet {
        FractalSet {
            counts,
            x_values: self.grid.x_values,
            y_values: self.grid.y_values,
            maxit: self.maxit,
        }
    }
}

// }}}

/// Sample *region* at *resolution* and compute the escape counts of *family*
/// with the evaluator selected by *strategy*.
///
/// Invalid arguments are reported before any iteration happens.
#[tracing::instrument(skip_all, fields(%family, %strategy, %resolution, maxit))]
pub fn compute_set(
    family: Family,
    region: &Region,
    resolution: Resolution,
    maxit: u32,
    strategy: Strategy,
) -> Result<FractalSet> {
    let job = FractalJob::prepare(family, region, resolution, maxit, strategy)?;
    let counts = job.run();
    debug!(npoints = resolution.npoints(), "escape counts ready");

    Ok(job.into_set(counts))
}

// {{{ tests


// }}}
