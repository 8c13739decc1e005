// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

use num::complex::Complex64;

use crate::error::{FractalError, Result};

/// Magnitude past which an orbit is considered divergent.
pub const ESCAPE_RADIUS: f64 = 2.0;

pub fn check_maxit(maxit: u32) -> Result<()> {
    if maxit < 1 {
        return Err(FractalError::invalid("iteration budget must be at least 1"));
    }

    Ok(())
}

/// Compute the escape time for the quadratic map
///
/// $$
///     f(z) = z^2 + c
/// $$
///
/// starting at *z0*. Returns the 1-based index of the first update with
/// $|z| > 2$, or *maxit* if the orbit stays bounded for the whole budget.
/// Mandelbrot points use $z_0 = 0$, Julia points a fixed *c*.
#[inline]
pub fn escape_time(z0: Complex64, c: Complex64, maxit: u32) -> u32 {
    let mut z = z0;

    for i in 1..=maxit {
        z = z * z + c;
        if z.norm() > ESCAPE_RADIUS {
            return i;
        }
    }

    maxit
}

// {{{ tests


// }}}
