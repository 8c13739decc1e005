// SPDX-FileCopyrightText: 2024 Alexandru Fikl <alexfikl@gmail.com>
// SPDX-License-Identifier: MIT

//! Wall-clock timing of repeated runs and resolution sweeps.

use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use tracing::info;

use crate::error::{FractalError, Result};
use crate::grid::Resolution;

// {{{ Timings

#[derive(Clone, Debug, PartialEq)]
pub struct Timings {
    /// Duration of every run, in the order they happened.
    pub runs: Vec<Duration>,
    pub median: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl Timings {
    pub fn from_runs(runs: Vec<Duration>) -> Result<Self> {
        if runs.is_empty() {
            return Err(FractalError::invalid("cannot summarize zero runs"));
        }

        let mut sorted = runs.clone();
        sorted.sort();

        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2
        };

        Ok(Timings {
            median,
            min: sorted[0],
            max: sorted[n - 1],
            runs,
        })
    }
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "median {:.4}s (min = {:.4}s, max = {:.4}s)",
            self.median.as_secs_f64(),
            self.min.as_secs_f64(),
            self.max.as_secs_f64()
        )
    }
}

// }}}

// {{{ benchmark

#[derive(Clone, Debug)]
pub struct Benchmark<T> {
    pub label: String,
    pub timings: Timings,
    /// Output of the last run. Earlier outputs are dropped.
    pub result: T,
}

fn timed<T, F>(operation: &mut F, runs: &mut Vec<Duration>) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let now = Instant::now();
    let result = operation()?;
    runs.push(now.elapsed());

    Ok(result)
}

/// Run *operation* *nruns* times back to back and time each run.
///
/// The operation has to produce the same work on every call: nothing is
/// reset between runs. The first error stops the benchmark and is returned
/// as is.
pub fn benchmark<T, F>(label: &str, nruns: usize, mut operation: F) -> Result<Benchmark<T>>
where
    F: FnMut() -> Result<T>,
{
    if nruns < 1 {
        return Err(FractalError::invalid("benchmark needs at least one run"));
    }

    let mut runs = Vec::with_capacity(nruns);
    let mut result = timed(&mut operation, &mut runs)?;
    for _ in 1..nruns {
        result = timed(&mut operation, &mut runs)?;
    }

    let timings = Timings::from_runs(runs)?;
    info!("{}: {}", label, timings);

    Ok(Benchmark {
        label: label.to_string(),
        timings,
        result,
    })
}

// }}}

// {{{ sweep

#[derive(Clone, Debug, PartialEq)]
pub struct ScalingPoint {
    pub resolution: Resolution,
    pub timings: Timings,
}

/// Benchmark one operation per resolution.
///
/// *prepare* builds fresh inputs for a resolution and returns the operation
/// to time; only the operation itself is measured. Any error aborts the
/// whole sweep.
pub fn sweep<T, P, F>(
    label: &str,
    resolutions: &[Resolution],
    nruns: usize,
    mut prepare: P,
) -> Result<Vec<ScalingPoint>>
where
    P: FnMut(Resolution) -> Result<F>,
    F: FnMut() -> Result<T>,
{
    if resolutions.is_empty() {
        return Err(FractalError::invalid("sweep needs at least one resolution"));
    }

    let mut curve = Vec::with_capacity(resolutions.len());
    for &resolution in resolutions {
        let operation = prepare(resolution)?;
        let bench = benchmark(&format!("{} {}", label, resolution), nruns, operation)?;

        curve.push(ScalingPoint {
            resolution,
            timings: bench.timings,
        });
    }

    Ok(curve)
}

/// Write labelled sweeps as `label,width,height,median_s,min_s,max_s` rows.
pub fn write_csv<W: Write>(out: &mut W, curves: &[(String, Vec<ScalingPoint>)]) -> Result<()> {
    writeln!(out, "label,width,height,median_s,min_s,max_s")?;
    for (label, curve) in curves {
        for point in curve {
            writeln!(
                out,
                "{},{},{},{:.6},{:.6},{:.6}",
                label,
                point.resolution.width,
                point.resolution.height,
                point.timings.median.as_secs_f64(),
                point.timings.min.as_secs_f64(),
                point.timings.max.as_secs_f64()
            )?;
        }
    }

    Ok(())
}

// }}}

// {{{ tests


// }}}
