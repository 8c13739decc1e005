// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

use colors_transform::{Color, Hsl};
use image::Rgb;

pub const INTERIOR_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Determine the color for a normalized iteration count *c*.
///
/// This function takes a value *c* in [0, 1]. Only *c* = 1 comes out black;
/// [`get_count_color`] sends budget-exhausting points to [`INTERIOR_COLOR`]
/// directly so they never depend on the ratio rounding to exactly 1.
pub fn get_orbit_color(c: f64) -> Rgb<u8> {
    let n = c.clamp(0.0, 1.0);

    // NOTE: in HSL, we have that H in [0, 360], S in [0, 100] and L in [0, 100]
    let hue = (n * 360.0).round() as f32;
    let saturation = 100.0;
    let lightness = if n < 1.0 { 50.0 } else { 0.0 };

    let (r, g, b) = Hsl::from(hue, saturation, lightness).to_rgb().as_tuple();
    Rgb([r.round() as u8, g.round() as u8, b.round() as u8])
}

/// Determine the color for an escape count *count* out of *maxit*.
///
/// Points that used up the whole budget are drawn with [`INTERIOR_COLOR`].
pub fn get_count_color(count: u32, maxit: u32) -> Rgb<u8> {
    if count >= maxit {
        INTERIOR_COLOR
    } else {
        get_orbit_color((count as f64) / (maxit as f64))
    }
}
