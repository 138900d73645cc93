//! Controller errors and status codes.
//!
//! Only construction into caller-provided storage and the checked update path can fail.
//! The plain per-sample update never reports an error; numeric edge cases there follow the
//! saturation policy of the active backend (see [`crate::num`]).
//!
//! Every error maps onto a negative integer status code, with [`STATUS_OK`] for success, so
//! results can be handed across a C-style boundary unchanged.

use snafu::Snafu;

/// Status code reported for a successful operation.
pub const STATUS_OK: i32 = 0;

/// Errors that can occur when constructing or stepping a PID controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Snafu)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[snafu(visibility(pub))]
pub enum PidError {
    /// No controller storage was provided to initialize into.
    #[snafu(display("No controller was provided to initialize"))]
    InvalidArgument,

    /// The elapsed time passed to a checked update was zero or negative.
    #[snafu(display("The elapsed time since the last update must be strictly positive"))]
    InvalidTimestep,

    /// An intermediate or final value left the representable range of the numeric backend.
    #[snafu(display("Controller arithmetic overflowed the representable range"))]
    Overflow,
}

impl PidError {
    /// Returns the integer status code for this error.
    ///
    /// `InvalidArgument` keeps the historical value of `-1`.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::InvalidArgument => -1,
            Self::InvalidTimestep => -2,
            Self::Overflow => -3,
        }
    }
}

/// Folds the result of an operation into its integer status code.
#[must_use]
pub const fn status_code(result: &Result<(), PidError>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(err) => err.code(),
    }
}
