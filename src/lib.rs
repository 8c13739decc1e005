// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

//! Escape-time Mandelbrot and Julia sets.
//!
//! A [`grid::SampleGrid`] is evaluated either one point at a time with
//! [`escape::escape_time`] or as a whole mesh with [`batched::evaluate_mesh`].
//! [`fractal::compute_set`] ties the two together and [`benchmark`] times them
//! across resolutions.

#![warn(rust_2018_idioms)]

pub mod batched;
pub mod benchmark;
pub mod colorschemes;
pub mod error;
pub mod escape;
pub mod fractal;
pub mod gallery;
pub mod grid;
pub mod render;

pub use error::{FractalError, Result};
pub use fractal::{compute_set, Family, FractalSet, Strategy};
pub use grid::{Region, Resolution};
