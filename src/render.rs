// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

use std::path::Path;

use image::RgbImage;
use rayon::prelude::*;
use tracing::info;

use crate::colorschemes::get_count_color;
use crate::error::Result;
use crate::fractal::FractalSet;

/// Color the escape counts of *set*.
///
/// Grid row 0 holds the lowest imaginary part, so it becomes the bottom row
/// of the image.
pub fn render_counts(set: &FractalSet) -> RgbImage {
    let (height, width) = set.counts.shape();
    let mut pixels = RgbImage::new(width as u32, height as u32);

    pixels
        .par_chunks_mut(3 * width)
        .enumerate()
        .for_each(|(top, band)| {
            let row = height - 1 - top;
            for column in 0..width {
                let color = get_count_color(set.counts[(row, column)], set.maxit);

                let index = 3 * column;
                band[index] = color[0];
                band[index + 1] = color[1];
                band[index + 2] = color[2];
            }
        });

    pixels
}

pub fn save_png(set: &FractalSet, filename: &Path) -> Result<()> {
    let pixels = render_counts(set);
    pixels.save(filename)?;
    info!("saved {}", filename.display());

    Ok(())
}
