// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

use clap::ValueEnum;
use num::complex::Complex64;

use crate::fractal::Family;
use crate::grid::Region;

pub struct Exhibit {
    pub family: Family,
    /// Bounding box for the points.
    pub region: Region,
}

pub const EXHIBIT_MANDELBROT_FULL: Exhibit = Exhibit {
    family: Family::Mandelbrot,
    region: Region::new(-2.0, 1.0, -1.5, 1.5),
};

pub const EXHIBIT_MANDELBROT_SEAHORSE: Exhibit = Exhibit {
    family: Family::Mandelbrot,
    region: Region::new(-0.8, -0.7, 0.05, 0.15),
};

pub const EXHIBIT_JULIA_DENDRITE: Exhibit = Exhibit {
    family: Family::Julia(Complex64 {
        re: -0.5125,
        im: 0.5213,
    }),
    region: Region::new(-1.5, 1.5, -1.5, 1.5),
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Mandelbrot,
    Seahorse,
    Julia,
}

impl Preset {
    pub fn exhibit(&self) -> &'static Exhibit {
        match self {
            Preset::Mandelbrot => &EXHIBIT_MANDELBROT_FULL,
            Preset::Seahorse => &EXHIBIT_MANDELBROT_SEAHORSE,
            Preset::Julia => &EXHIBIT_JULIA_DENDRITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_valid() {
        for preset in [Preset::Mandelbrot, Preset::Seahorse, Preset::Julia] {
            assert!(preset.exhibit().region.validate().is_ok());
        }
    }
}
