// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

#![warn(rust_2018_idioms)]

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use num::complex::c64;
use tracing::{error, info, warn};

use escapebrot::benchmark::{benchmark, sweep, write_csv};
use escapebrot::fractal::{compute_set, Family, FractalJob, Strategy};
use escapebrot::gallery::Preset;
use escapebrot::grid::{Region, Resolution};
use escapebrot::render::save_png;
use escapebrot::Result;

#[derive(Parser, Debug)]
#[command(name = "escapebrot", version, about = "Escape-time fractals and their cost")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a set and write it as a PNG image
    Render {
        #[command(flatten)]
        set: SetArgs,
        #[arg(long, value_enum, default_value_t = Strategy::ScalarParallel)]
        strategy: Strategy,
        #[arg(short, long, default_value = "escapebrot.png")]
        output: PathBuf,
    },
    /// Time the evaluators at a single resolution
    Bench {
        #[command(flatten)]
        set: SetArgs,
        #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Strategy::Scalar, Strategy::Batched])]
        strategy: Vec<Strategy>,
        #[arg(long, default_value_t = 3)]
        runs: usize,
    },
    /// Time the evaluators over square resolutions and print a CSV curve
    Scaling {
        #[command(flatten)]
        set: SetArgs,
        #[arg(long, value_delimiter = ',', default_values_t = [256, 512, 1024, 2048])]
        sizes: Vec<usize>,
        #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Strategy::Batched])]
        strategy: Vec<Strategy>,
        #[arg(long, default_value_t = 3)]
        runs: usize,
    },
    /// Check that the scalar and batched evaluators agree on bounded points
    Compare {
        #[command(flatten)]
        set: SetArgs,
    },
}

#[derive(Args, Debug)]
struct SetArgs {
    /// Named family and region to start from
    #[arg(long, value_enum, default_value_t = Preset::Mandelbrot)]
    preset: Preset,
    #[arg(long, allow_hyphen_values = true)]
    x_min: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    x_max: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y_min: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y_max: Option<f64>,
    /// Real part of the Julia constant (switches to the Julia family)
    #[arg(long, allow_hyphen_values = true)]
    julia_re: Option<f64>,
    /// Imaginary part of the Julia constant (switches to the Julia family)
    #[arg(long, allow_hyphen_values = true)]
    julia_im: Option<f64>,
    #[arg(long, default_value_t = 1024)]
    width: usize,
    #[arg(long, default_value_t = 1024)]
    height: usize,
    /// Iteration budget per point
    #[arg(long, default_value_t = 100)]
    maxit: u32,
}

impl SetArgs {
    fn family(&self) -> Family {
        let family = self.preset.exhibit().family;
        if self.julia_re.is_none() && self.julia_im.is_none() {
            return family;
        }

        let base = match family {
            Family::Julia(c) => c,
            Family::Mandelbrot => c64(0.0, 0.0),
        };
        Family::Julia(c64(
            self.julia_re.unwrap_or(base.re),
            self.julia_im.unwrap_or(base.im),
        ))
    }

    fn region(&self) -> Region {
        let region = self.preset.exhibit().region;
        Region::new(
            self.x_min.unwrap_or(region.x_min),
            self.x_max.unwrap_or(region.x_max),
            self.y_min.unwrap_or(region.y_min),
            self.y_max.unwrap_or(region.y_max),
        )
    }

    fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render {
            set,
            strategy,
            output,
        } => {
            let fractal = compute_set(
                set.family(),
                &set.region(),
                set.resolution(),
                set.maxit,
                strategy,
            )?;
            save_png(&fractal, &output)?;
        }
        Command::Bench {
            set,
            strategy,
            runs,
        } => {
            let (family, region) = (set.family(), set.region());
            for strategy in strategy {
                let job =
                    FractalJob::prepare(family, &region, set.resolution(), set.maxit, strategy)?;
                let label = format!("{} {} {}", family, strategy, set.resolution());
                benchmark(&label, runs, || Ok(job.run()))?;
            }
        }
        Command::Scaling {
            set,
            sizes,
            strategy,
            runs,
        } => {
            let (family, region) = (set.family(), set.region());
            let resolutions: Vec<Resolution> =
                sizes.iter().map(|&n| Resolution::square(n)).collect();

            let mut curves = Vec::with_capacity(strategy.len());
            for strategy in strategy {
                let curve = sweep(&strategy.to_string(), &resolutions, runs, |resolution| {
                    let job =
                        FractalJob::prepare(family, &region, resolution, set.maxit, strategy)?;
                    Ok(move || Ok(job.run()))
                })?;
                curves.push((strategy.to_string(), curve));
            }

            write_csv(&mut io::stdout().lock(), &curves)?;
        }
        Command::Compare { set } => {
            let (family, region) = (set.family(), set.region());
            let scalar = compute_set(family, &region, set.resolution(), set.maxit, Strategy::Scalar)?;
            let batched =
                compute_set(family, &region, set.resolution(), set.maxit, Strategy::Batched)?;

            let differing = scalar
                .counts
                .iter()
                .zip(batched.counts.iter())
                .filter(|(a, b)| a != b)
                .count();
            let mismatches = scalar.bounded_mismatches(&batched);

            info!(
                "{} {}: {} cells with different counts, {} disagree on boundedness",
                family,
                set.resolution(),
                differing,
                mismatches
            );
            if mismatches > 0 {
                warn!("scalar and batched evaluators disagree on bounded points (start points outside |z| <= 2)");
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(Cli::parse()) {
        error!("{}", err);
        process::exit(1);
    }
}
