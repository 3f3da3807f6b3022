//! Embedded Runge-Kutta-Fehlberg 4(5) stepper with adaptive step control.
//!
//! [`Rkf45`] advances any [`OdeSystem`] to a target time. The fifth-order
//! solution is propagated; its difference to the fourth-order solution is
//! the local error estimate that drives step acceptance and resizing.
//!
//! All stage buffers are allocated in [`Rkf45::new`] and reused for every
//! step, so a stepper sized for one run performs no allocation while
//! integrating.

use std::error::Error;
use std::fmt;

use crate::metrics::RunMetrics;

// ── OdeSystem ──────────────────────────────────────────────────────

/// A first-order system `dy/dt = f(t, y)`.
pub trait OdeSystem {
    /// Number of state components.
    fn dimension(&self) -> usize;

    /// Write `f(t, y)` into `dydt`. Both slices have length
    /// [`dimension()`](Self::dimension).
    fn derivatives(&mut self, t: f64, y: &[f64], dydt: &mut [f64]);
}

// ── SolverStatus ───────────────────────────────────────────────────

/// Why the stepper gave up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    /// The step shrank below the resolution of the current time.
    StepUnderflow,
    /// The derivatives or the error estimate were NaN or infinite.
    NonFinite,
}

impl SolverStatus {
    /// Stable numeric code for logs and bindings.
    pub fn code(self) -> i32 {
        match self {
            Self::StepUnderflow => 1,
            Self::NonFinite => 2,
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepUnderflow => write!(f, "step size underflow"),
            Self::NonFinite => write!(f, "non-finite state or error estimate"),
        }
    }
}

impl Error for SolverStatus {}

// ── Fehlberg tableau ───────────────────────────────────────────────

const C2: f64 = 1.0 / 4.0;
const C3: f64 = 3.0 / 8.0;
const C4: f64 = 12.0 / 13.0;
const C5: f64 = 1.0;
const C6: f64 = 1.0 / 2.0;

const A21: f64 = 1.0 / 4.0;
const A31: f64 = 3.0 / 32.0;
const A32: f64 = 9.0 / 32.0;
const A41: f64 = 1932.0 / 2197.0;
const A42: f64 = -7200.0 / 2197.0;
const A43: f64 = 7296.0 / 2197.0;
const A51: f64 = 439.0 / 216.0;
const A52: f64 = -8.0;
const A53: f64 = 3680.0 / 513.0;
const A54: f64 = -845.0 / 4104.0;
const A61: f64 = -8.0 / 27.0;
const A62: f64 = 2.0;
const A63: f64 = -3544.0 / 2565.0;
const A64: f64 = 1859.0 / 4104.0;
const A65: f64 = -11.0 / 40.0;

// Fifth-order weights (b2 = 0).
const B1: f64 = 16.0 / 135.0;
const B3: f64 = 6656.0 / 12825.0;
const B4: f64 = 28561.0 / 56430.0;
const B5: f64 = -9.0 / 50.0;
const B6: f64 = 2.0 / 55.0;

// Fifth minus fourth order (e2 = 0).
const E1: f64 = 1.0 / 360.0;
const E3: f64 = -128.0 / 4275.0;
const E4: f64 = -2197.0 / 75240.0;
const E5: f64 = 1.0 / 50.0;
const E6: f64 = 2.0 / 55.0;

// ── Step control ───────────────────────────────────────────────────

const REJECT_RATIO: f64 = 1.1;
const GROW_RATIO: f64 = 0.5;
const SAFETY: f64 = 0.9;
const MIN_SHRINK: f64 = 0.2;
const MAX_GROW: f64 = 5.0;

/// Adaptive RKF45 stepper.
#[derive(Clone, Debug)]
pub struct Rkf45 {
    delta: f64,
    relative: f64,
    k: [Vec<f64>; 6],
    ytmp: Vec<f64>,
    ynew: Vec<f64>,
    yerr: Vec<f64>,
}

impl Rkf45 {
    /// A stepper for `dimension` components with absolute tolerance
    /// `delta` and relative tolerance `relative`.
    pub fn new(dimension: usize, delta: f64, relative: f64) -> Self {
        Self {
            delta,
            relative,
            k: std::array::from_fn(|_| vec![0.0; dimension]),
            ytmp: vec![0.0; dimension],
            ynew: vec![0.0; dimension],
            yerr: vec![0.0; dimension],
        }
    }

    /// Advance `y` from `*t` to exactly `t1`, starting with trial step `*h`.
    ///
    /// On success `*t == t1` and `*h` holds the suggested next step. On
    /// failure `y` and `*t` hold the last accepted state. Step counts are
    /// added to `metrics`.
    ///
    /// # Errors
    ///
    /// [`SolverStatus::StepUnderflow`] when the step can no longer move
    /// time forward, [`SolverStatus::NonFinite`] on NaN or infinity.
    pub fn evolve<S>(
        &mut self,
        system: &mut S,
        t: &mut f64,
        t1: f64,
        h: &mut f64,
        y: &mut [f64],
        metrics: &mut RunMetrics,
    ) -> Result<(), SolverStatus>
    where
        S: OdeSystem + ?Sized,
    {
        while *t < t1 {
            let remaining = t1 - *t;
            let clipped = *h >= remaining;
            let h_try = if clipped { remaining } else { *h };
            if *t + h_try == *t {
                return Err(SolverStatus::StepUnderflow);
            }

            self.attempt(system, *t, h_try, y);
            metrics.rhs_evaluations += 6;
            let ratio = self.error_ratio(y);
            if !ratio.is_finite() || self.ynew.iter().any(|v| !v.is_finite()) {
                return Err(SolverStatus::NonFinite);
            }

            if ratio > REJECT_RATIO {
                metrics.rejected_steps += 1;
                let factor = (SAFETY * ratio.powf(-1.0 / 5.0)).max(MIN_SHRINK);
                *h = h_try * factor;
                if *t + *h == *t {
                    return Err(SolverStatus::StepUnderflow);
                }
                continue;
            }

            y.copy_from_slice(&self.ynew);
            *t = if clipped { t1 } else { *t + h_try };
            metrics.record_accept(h_try, clipped);

            *h = if ratio < GROW_RATIO {
                let factor = if ratio == 0.0 {
                    MAX_GROW
                } else {
                    (SAFETY * ratio.powf(-1.0 / 6.0)).min(MAX_GROW)
                };
                h_try * factor
            } else {
                h_try
            };
        }
        Ok(())
    }

    /// One trial step of size `h`; fills `ynew` and `yerr`.
    fn attempt<S>(&mut self, system: &mut S, t: f64, h: f64, y: &[f64])
    where
        S: OdeSystem + ?Sized,
    {
        let [k1, k2, k3, k4, k5, k6] = &mut self.k;
        let ytmp = &mut self.ytmp;

        system.derivatives(t, y, k1);

        for i in 0..y.len() {
            ytmp[i] = y[i] + h * A21 * k1[i];
        }
        system.derivatives(t + C2 * h, ytmp, k2);

        for i in 0..y.len() {
            ytmp[i] = y[i] + h * (A31 * k1[i] + A32 * k2[i]);
        }
        system.derivatives(t + C3 * h, ytmp, k3);

        for i in 0..y.len() {
            ytmp[i] = y[i] + h * (A41 * k1[i] + A42 * k2[i] + A43 * k3[i]);
        }
        system.derivatives(t + C4 * h, ytmp, k4);

        for i in 0..y.len() {
            ytmp[i] = y[i] + h * (A51 * k1[i] + A52 * k2[i] + A53 * k3[i] + A54 * k4[i]);
        }
        system.derivatives(t + C5 * h, ytmp, k5);

        for i in 0..y.len() {
            ytmp[i] = y[i]
                + h * (A61 * k1[i] + A62 * k2[i] + A63 * k3[i] + A64 * k4[i] + A65 * k5[i]);
        }
        system.derivatives(t + C6 * h, ytmp, k6);

        for i in 0..y.len() {
            self.ynew[i] =
                y[i] + h * (B1 * k1[i] + B3 * k3[i] + B4 * k4[i] + B5 * k5[i] + B6 * k6[i]);
            self.yerr[i] = h * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i]);
        }
    }

    /// `max_i |err_i| / (delta + relative * |y_i|)`.
    fn error_ratio(&self, y: &[f64]) -> f64 {
        let mut ratio: f64 = 0.0;
        for (err, yi) in self.yerr.iter().zip(y) {
            let scale = self.delta + self.relative * yi.abs();
            let r = err.abs() / scale;
            if r.is_nan() {
                return f64::NAN;
            }
            ratio = ratio.max(r);
        }
        ratio
    }
}
