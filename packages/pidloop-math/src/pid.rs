//! PID controllers.
//!
//! PID controllers are first created with [`PidController::new`]
//! and then can be utilized by calling [`PidController::update`] once per sample period.
//!
//! The controller is generic over its numeric backend (see [`pidloop_core::num`]), so the same
//! algorithm runs on hardware floats or on fixed-point integers.
//!
//! ```
//! use pidloop_math::pid::PidController;
//!
//! let mut pid = PidController::<f32>::new(2.0, 0.5, 0.1, -10.0, 10.0);
//! pid.set_setpoint(1.0);
//!
//! let output = pid.update(0.25, 0.01);
//! assert!(output > 0.0);
//! ```

use pidloop_core::{
    error::{InvalidArgumentSnafu, InvalidTimestepSnafu, OverflowSnafu},
    PidError, PidNumber, PidValue,
};
use snafu::{ensure, OptionExt};

/// A proportional–integral–derivative controller.
///
/// Each call to [`update`](Self::update) takes the latest measurement and the time elapsed since
/// the previous call, and returns a control output bounded to `[out_min, out_max]`.
///
/// The integral term is kept in the wider accumulator type of `T` and grows for as long as the
/// error stays nonzero, including while the output is pinned at one of its limits. Callers who
/// need anti-windup must provide it themselves, for example by calling [`reset`](Self::reset).
///
/// The controller does no synchronization. If it is shared between threads, every `update` and
/// `set_setpoint` call must be serialized by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidController<T: PidValue> {
    /// Proportional constant. This is multiplied by the error to get the
    /// proportional component of the output.
    pub kp: T,
    /// Integral constant. This accounts for the past values of the error.
    pub ki: T,
    /// Derivative constant. This allows you to change the output based on
    /// the rate of change of the error (predicting future values).
    pub kd: T,

    setpoint: T,
    last_error: T,
    integral: T::Accum,

    out_min: T,
    out_max: T,
}

impl<T: PidValue> PidController<T> {
    /// Creates a new PID controller with the given constants and output limits.
    ///
    /// The setpoint, the remembered error and the integral all start at zero.
    ///
    /// `out_min <= out_max` is not checked; keeping the limits ordered is up to the caller.
    #[must_use]
    pub fn new(kp: T, ki: T, kd: T, out_min: T, out_max: T) -> Self {
        #[cfg(feature = "log")]
        log::debug!(
            "PID controller created: kp={kp:?} ki={ki:?} kd={kd:?} limits=[{out_min:?}, {out_max:?}]"
        );

        Self {
            kp,
            ki,
            kd,
            setpoint: T::zero(),
            last_error: T::zero(),
            integral: T::zero().widen(),
            out_min,
            out_max,
        }
    }

    /// Initializes a controller in caller-provided storage.
    ///
    /// Any previous state in `target` is discarded, exactly as if it had been replaced by
    /// [`PidController::new`].
    ///
    /// # Errors
    ///
    /// - A [`PidError::InvalidArgument`] error is returned if `target` is `None`.
    ///
    /// ```
    /// use pidloop_core::{error::status_code, PidError};
    /// use pidloop_math::pid::PidController;
    ///
    /// let mut pid = PidController::<f64>::new(0.0, 0.0, 0.0, 0.0, 0.0);
    /// assert!(PidController::init(Some(&mut pid), 1.0, 0.0, 0.0, -5.0, 5.0).is_ok());
    /// assert_eq!(pid.output_limits(), (-5.0, 5.0));
    ///
    /// let result = PidController::<f64>::init(None, 1.0, 0.0, 0.0, -5.0, 5.0);
    /// assert_eq!(result, Err(PidError::InvalidArgument));
    /// assert_eq!(status_code(&result), -1);
    /// ```
    pub fn init(
        target: Option<&mut Self>,
        kp: T,
        ki: T,
        kd: T,
        out_min: T,
        out_max: T,
    ) -> Result<(), PidError> {
        let pid = target.context(InvalidArgumentSnafu)?;
        *pid = Self::new(kp, ki, kd, out_min, out_max);
        Ok(())
    }

    /// Runs one step of the controller and returns the clamped output.
    ///
    /// `dt` is the time elapsed since the previous update and should be strictly positive. This
    /// method never fails: arithmetic that leaves the representable range saturates on
    /// fixed-point backends and follows IEEE-754 on floating-point backends. In particular a
    /// zero `dt` makes the derivative term saturate (fixed-point) or become infinite or NaN
    /// (floating-point). A NaN output is returned unclamped. Use
    /// [`try_update`](Self::try_update) to have these cases reported instead.
    ///
    /// The `error * dt` contribution to the integral is multiplied in the accumulator type, not
    /// in `T`. For `f32` this keeps more precision than rounding the product to `f32` first, so
    /// integrals are not bit-identical to an implementation that multiplies in single precision.
    pub fn update(&mut self, input: T, dt: T) -> T {
        let error = self.setpoint.saturating_sub(input);

        self.integral = self
            .integral
            .saturating_add(error.widen().saturating_mul(dt.widen()));

        let derivative = self
            .kd
            .saturating_mul(error.saturating_sub(self.last_error).saturating_div(dt));

        let output = self
            .kp
            .saturating_mul(error)
            .widen()
            .saturating_add(self.ki.widen().saturating_mul(self.integral))
            .saturating_add(derivative.widen());

        // The unclamped error feeds the next derivative.
        self.last_error = error;

        self.clamp(output)
    }

    /// Runs one step of the controller with checked arithmetic.
    ///
    /// On success this returns exactly what [`update`](Self::update) would have returned. On
    /// failure the controller is left untouched.
    ///
    /// # Errors
    ///
    /// - A [`PidError::InvalidTimestep`] error is returned if `dt` is not strictly positive.
    /// - A [`PidError::Overflow`] error is returned if any intermediate value is not
    ///   representable by the backend.
    pub fn try_update(&mut self, input: T, dt: T) -> Result<T, PidError> {
        let step = self.checked_step(input, dt);
        #[cfg(feature = "log")]
        let step = step.inspect_err(|err| {
            log::warn!("PID update rejected (input={input:?}, dt={dt:?}): {err}");
        });

        let (error, integral, output) = step?;
        self.last_error = error;
        self.integral = integral;

        Ok(self.clamp(output))
    }

    fn checked_step(&self, input: T, dt: T) -> Result<(T, T::Accum, T::Accum), PidError> {
        ensure!(dt > T::zero(), InvalidTimestepSnafu);

        let error = self.setpoint.checked_sub(input).context(OverflowSnafu)?;

        let integral = error
            .widen()
            .checked_mul(dt.widen())
            .and_then(|step| self.integral.checked_add(step))
            .context(OverflowSnafu)?;

        let derivative = error
            .checked_sub(self.last_error)
            .and_then(|delta| delta.checked_div(dt))
            .and_then(|rate| self.kd.checked_mul(rate))
            .context(OverflowSnafu)?;

        let output = self
            .kp
            .checked_mul(error)
            .map(PidValue::widen)
            .zip(self.ki.widen().checked_mul(integral))
            .and_then(|(p, i)| p.checked_add(i))
            .and_then(|pi| pi.checked_add(derivative.widen()))
            .context(OverflowSnafu)?;

        Ok((error, integral, output))
    }

    // Clamping in the accumulator domain keeps the final narrowing in range.
    fn clamp(&self, output: T::Accum) -> T {
        if output < self.out_min.widen() {
            self.out_min
        } else if output > self.out_max.widen() {
            self.out_max
        } else {
            T::narrow(output)
        }
    }

    /// Sets the value the controller drives the process toward.
    ///
    /// The new setpoint is used from the next call to [`update`](Self::update) onward.
    pub fn set_setpoint(&mut self, setpoint: T) {
        self.setpoint = setpoint;
    }

    /// Returns the current setpoint.
    #[must_use]
    pub const fn setpoint(&self) -> T {
        self.setpoint
    }

    /// Replaces all three gains at once.
    ///
    /// The accumulated integral is kept, so a change to `ki` rescales the whole history.
    pub fn set_gains(&mut self, kp: T, ki: T, kd: T) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// Returns the error computed by the most recent update, or zero before the first one.
    #[must_use]
    pub const fn last_error(&self) -> T {
        self.last_error
    }

    /// Returns the accumulated integral of the error over time.
    #[must_use]
    pub const fn integral(&self) -> T::Accum {
        self.integral
    }

    /// Returns the `(out_min, out_max)` output limits.
    #[must_use]
    pub const fn output_limits(&self) -> (T, T) {
        (self.out_min, self.out_max)
    }

    /// Clears the remembered error and the accumulated integral.
    ///
    /// Gains, setpoint and output limits are kept.
    pub fn reset(&mut self) {
        self.last_error = T::zero();
        self.integral = T::zero().widen();
    }
}

#[cfg(feature = "defmt")]
impl<T> defmt::Format for PidController<T>
where
    T: PidValue + defmt::Format,
    T::Accum: defmt::Format,
{
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "PidController(kp={}, ki={}, kd={}, setpoint={}, last_error={}, integral={}, out_min={}, out_max={})",
            self.kp,
            self.ki,
            self.kd,
            self.setpoint,
            self.last_error,
            self.integral,
            self.out_min,
            self.out_max,
        );
    }
}
