//! # pidloop
//!
//! Single-axis PID control loops for embedded targets, with a build-wide choice between
//! fixed-point and floating-point arithmetic.
//!
//! # Usage
//!
//! Construct a [`Controller`] once, then call [`update`](pid::PidController::update) once per
//! sample period with the latest measurement and the time elapsed since the previous call.
//!
//! ```
//! use pidloop::prelude::*;
//!
//! # #[cfg(feature = "fixed-point")]
//! let v = |x: f64| -> Value { Value::from_num(x) };
//! # #[cfg(not(feature = "fixed-point"))]
//! # let v = |x: f64| -> Value { x as Value };
//!
//! let mut pid = Controller::new(v(2.0), v(0.5), v(0.0), v(-10.0), v(10.0));
//! pid.set_setpoint(v(1.0));
//!
//! let output = pid.update(v(0.5), v(0.25));
//! assert_eq!(output, v(1.0625));
//! ```
//!
//! # Numeric representation
//!
//! The representation is selected with cargo features and applies to every [`Controller`] in
//! the build:
//!
//! | Feature                   | [`Value`]                 | [`Accum`]                 |
//! |---------------------------|---------------------------|---------------------------|
//! | `fixed-point` (default)   | `fixed::types::I16F16`    | `fixed::types::I32F32`    |
//! | `floating-point`          | `f32`                     | `f64`                     |
//!
//! Fixed-point arithmetic is bit-exact and suits processors without a floating-point unit, but
//! saturates when gains or the integral outgrow its range. Floating-point arithmetic has a far
//! wider range and rounds instead.
//!
//! [`pid::PidController`] itself stays generic, so other backends can still be used directly.
//!
//! # Optional features
//!
//! - `defmt`: implements `defmt::Format` for the controller and [`PidError`](error::PidError).
//! - `log`: reports controller construction and rejected checked updates through `log`.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(feature = "fixed-point", feature = "floating-point"))]
compile_error!("the `fixed-point` and `floating-point` features are mutually exclusive");

#[cfg(not(any(feature = "fixed-point", feature = "floating-point")))]
compile_error!("one of the `fixed-point` or `floating-point` features must be enabled");

#[doc(inline)]
pub use pidloop_core::{error, num};
#[doc(inline)]
pub use pidloop_math::pid;

#[doc(inline)]
#[cfg(feature = "fixed-point")]
pub use fixed;

/// The value type used for gains, setpoints, measurements, time steps and outputs.
#[cfg(feature = "fixed-point")]
pub type Value = fixed::types::I16F16;

/// The value type used for gains, setpoints, measurements, time steps and outputs.
#[cfg(all(feature = "floating-point", not(feature = "fixed-point")))]
pub type Value = f32;

/// The wider type used to accumulate the integral term.
pub type Accum = <Value as num::PidValue>::Accum;

/// A PID controller using this build's numeric representation.
pub type Controller = pid::PidController<Value>;

/// Commonly used features of pidloop.
///
/// This module is meant to be glob imported.
pub mod prelude {
    pub use crate::{
        error::PidError,
        num::{PidNumber, PidValue},
        pid::PidController,
        Accum, Controller, Value,
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[cfg(feature = "fixed-point")]
    fn v(x: f64) -> Value {
        Value::from_num(x)
    }

    #[cfg(all(feature = "floating-point", not(feature = "fixed-point")))]
    fn v(x: f64) -> Value {
        x as Value
    }

    #[test]
    fn controller_uses_build_representation() {
        let mut pid = Controller::new(v(0.0), v(1.0), v(0.0), v(-100.0), v(100.0));
        pid.set_setpoint(v(3.0));
        assert_eq!(pid.update(v(1.0), v(0.5)), v(1.0));

        let integral: Accum = pid.integral();
        assert_eq!(integral, num::PidValue::widen(v(1.0)));
    }

    #[test]
    fn init_reports_legacy_status_codes() {
        let mut pid = Controller::new(v(0.0), v(0.0), v(0.0), v(0.0), v(0.0));
        let ok = Controller::init(Some(&mut pid), v(1.0), v(0.0), v(0.0), v(-1.0), v(1.0));
        assert_eq!(error::status_code(&ok), error::STATUS_OK);

        let missing = Controller::init(None, v(1.0), v(0.0), v(0.0), v(-1.0), v(1.0));
        assert_eq!(error::status_code(&missing), -1);
    }
}
