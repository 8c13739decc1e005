// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FractalError {
    /// Bad resolution, region, iteration budget or run count. Raised before
    /// any work is done.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Writing the rendered image failed.
    #[error("failed to export image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FractalError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        FractalError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FractalError>;
