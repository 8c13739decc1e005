// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

//! Whole-mesh escape-time evaluation.
//!
//! All points advance together, one masked step at a time: first every element
//! is tested against the escape radius, then only the elements that passed are
//! updated. An element that fails the test is never touched again, so its
//! state and count stay frozen at the step where it left the disk.
//!
//! The count of an element is the number of steps that *started* inside the
//! disk $|z| \le 2$. For $|z_0| \le 2$ this matches [`crate::escape::escape_time`]
//! exactly, including whether the budget was exhausted.
//!
//! A start point already outside the disk gets 0 here. The scalar evaluator
//! does not test $z_0$ and follows the orbit from $z_1 = z_0^2 + c$ instead:
//! that gives 1 whenever $|c| \le 2$, but for $|c| > 2$ the point $z_1$ can
//! land back inside the disk and the scalar count can be anything up to
//! *maxit*.

use nalgebra::DMatrix;
use num::complex::Complex64;
use tracing::debug;

use crate::escape::{check_maxit, ESCAPE_RADIUS};
use crate::error::{FractalError, Result};
use crate::grid::Mesh;

/// Right-hand side $c$ of the map: one value per mesh element, or a single
/// value broadcast to all of them.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    Uniform(Complex64),
    Mesh(&'a Mesh),
}

impl Operand<'_> {
    /// Value at linear (storage) index *k*.
    #[inline]
    fn at(&self, k: usize) -> Complex64 {
        match self {
            Operand::Uniform(c) => *c,
            Operand::Mesh(m) => m.as_slice()[k],
        }
    }

    fn check_shape(&self, shape: (usize, usize)) -> Result<()> {
        match self {
            Operand::Mesh(m) if m.shape() != shape => Err(FractalError::invalid(format!(
                "mesh shape {:?} does not match start mesh shape {:?}",
                m.shape(),
                shape
            ))),
            _ => Ok(()),
        }
    }
}

// {{{ BatchState

/// Working arrays of the batched evaluator.
///
/// The state owns its buffers; [`BatchState::step`] updates them in place
/// through an exclusive borrow and nothing else can observe them mid-step.
#[derive(Clone, Debug)]
pub struct BatchState {
    /// Current iterate of every element.
    z: Mesh,
    /// Steps each element has been active for.
    counts: DMatrix<u32>,
    /// Scratch mask, recomputed at the start of every step.
    mask: Vec<bool>,
}

impl BatchState {
    pub fn new(z0: Mesh) -> Self {
        let (nrows, ncols) = z0.shape();
        BatchState {
            counts: DMatrix::zeros(nrows, ncols),
            mask: vec![false; nrows * ncols],
            z: z0,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.z.shape()
    }

    pub fn z(&self) -> &Mesh {
        &self.z
    }

    pub fn counts(&self) -> &DMatrix<u32> {
        &self.counts
    }

    pub fn into_counts(self) -> DMatrix<u32> {
        self.counts
    }

    /// Advance all active elements by one step and return how many were
    /// active.
    pub fn step(&mut self, c: &Operand<'_>) -> usize {
        let z = self.z.as_mut_slice();
        let counts = self.counts.as_mut_slice();

        for (m, zk) in self.mask.iter_mut().zip(z.iter()) {
            *m = zk.norm() <= ESCAPE_RADIUS;
        }

        let mut nactive = 0;
        for (k, &active) in self.mask.iter().enumerate() {
            if active {
                z[k] = z[k] * z[k] + c.at(k);
                counts[k] += 1;
                nactive += 1;
            }
        }

        nactive
    }

    /// Run up to *maxit* steps. Stops as soon as a step finds no active
    /// element, since nothing can change after that.
    pub fn run(mut self, c: &Operand<'_>, maxit: u32) -> DMatrix<u32> {
        for i in 0..maxit {
            if self.step(c) == 0 {
                debug!(step = i + 1, "all points escaped");
                break;
            }
        }

        self.counts
    }
}

// }}}

/// Evaluate the escape counts of the whole *z0* mesh against *c*.
///
/// Works on a private copy of *z0*: the caller's mesh is not modified and
/// every call returns a freshly allocated count matrix with the shape of *z0*.
pub fn evaluate_mesh(z0: &Mesh, c: Operand<'_>, maxit: u32) -> Result<DMatrix<u32>> {
    check_maxit(maxit)?;
    c.check_shape(z0.shape())?;

    Ok(BatchState::new(z0.clone()).run(&c, maxit))
}

// {{{ tests

#[cfg(test)]
mod tests {
    use super::*;

    use num::complex::c64;

    use crate::escape::escape_time;
    use crate::grid::{generate, Region, Resolution};

    fn mandelbrot_mesh(res: Resolution) -> Mesh {
        generate(&Region::new(-2.0, 1.0, -1.5, 1.5), res)
            .unwrap()
            .mesh()
    }

    #[test]
    fn test_mandelbrot_matches_scalar() {
        let c = mandelbrot_mesh(Resolution::new(64, 48));
        let z0 = Mesh::zeros(48, 64);
        let maxit = 50;

        let counts = evaluate_mesh(&z0, Operand::Mesh(&c), maxit).unwrap();
        assert_eq!(counts.shape(), (48, 64));

        for row in 0..48 {
            for column in 0..64 {
                let expected = escape_time(c64(0.0, 0.0), c[(row, column)], maxit);
                assert_eq!(counts[(row, column)], expected, "at ({}, {})", row, column);
            }
        }
    }

    #[test]
    fn test_julia_start_outside_radius() {
        let z0 = Mesh::from_element(1, 1, c64(3.0, 0.0));
        let counts = evaluate_mesh(&z0, Operand::Uniform(c64(0.0, 0.0)), 10).unwrap();

        assert_eq!(counts[(0, 0)], 0);
        assert_eq!(escape_time(c64(3.0, 0.0), c64(0.0, 0.0), 10), 1);
    }

    #[test]
    fn test_julia_start_outside_radius_large_c() {
        // z1 = z0^2 - 4 is tiny, z2 is close to -4
        let c = c64(-4.0, 0.0);
        let z0 = Mesh::from_element(1, 1, c64(2.0000001, 0.0));
        assert!(z0[(0, 0)].norm() > ESCAPE_RADIUS);

        let counts = evaluate_mesh(&z0, Operand::Uniform(c), 10).unwrap();
        assert_eq!(counts[(0, 0)], 0);
        assert_eq!(escape_time(z0[(0, 0)], c, 10), 2);

        // with a budget of one step only the scalar count reaches maxit
        let counts = evaluate_mesh(&z0, Operand::Uniform(c), 1).unwrap();
        assert_eq!(counts[(0, 0)], 0);
        assert_eq!(escape_time(z0[(0, 0)], c, 1), 1);
    }

    #[test]
    fn test_frozen_after_escape() {
        // first element escapes after one step, second never does
        let c = Mesh::from_row_slice(1, 2, &[c64(3.0, 0.0), c64(0.0, 0.0)]);
        let mut state = BatchState::new(Mesh::zeros(1, 2));

        assert_eq!(state.step(&Operand::Mesh(&c)), 2);
        assert_eq!(state.z()[(0, 0)], c64(3.0, 0.0));

        for _ in 0..5 {
            assert_eq!(state.step(&Operand::Mesh(&c)), 1);
        }

        assert_eq!(state.z()[(0, 0)], c64(3.0, 0.0));
        assert_eq!(state.counts()[(0, 0)], 1);
        assert_eq!(state.counts()[(0, 1)], 6);
    }

    #[test]
    fn test_input_untouched() {
        let z0 = mandelbrot_mesh(Resolution::new(8, 8));
        let before = z0.clone();

        let first = evaluate_mesh(&z0, Operand::Uniform(c64(-0.5125, 0.5213)), 20).unwrap();
        let second = evaluate_mesh(&z0, Operand::Uniform(c64(-0.5125, 0.5213)), 20).unwrap();

        assert_eq!(z0, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_counts_bounded_by_maxit() {
        let c = mandelbrot_mesh(Resolution::new(30, 30));
        let counts = evaluate_mesh(&Mesh::zeros(30, 30), Operand::Mesh(&c), 25).unwrap();

        assert!(counts.iter().all(|&n| n <= 25));
        assert!(counts.iter().any(|&n| n == 25));
    }

    #[test]
    fn test_invalid_arguments() {
        let z0 = Mesh::zeros(3, 4);
        let c = Mesh::zeros(4, 3);

        assert!(matches!(
            evaluate_mesh(&z0, Operand::Mesh(&c), 10),
            Err(FractalError::InvalidArgument(_))
        ));
        assert!(matches!(
            evaluate_mesh(&z0, Operand::Uniform(c64(0.0, 0.0)), 0),
            Err(FractalError::InvalidArgument(_))
        ));
    }
}

// }}}
