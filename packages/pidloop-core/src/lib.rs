//! Low level building blocks for [`pidloop`](https://crates.io/crates/pidloop).
//! The core crate is used by every other crate in the pidloop workspace.
//!
//! Included in this crate:
//! - Numeric backends for controller arithmetic: [`num`]
//! - The error taxonomy and status codes: [`error`]
//!
//! Nothing in here allocates, and nothing in here panics on arithmetic.

#![no_std]

pub mod error;
pub mod num;

pub use self::error::PidError;
pub use self::num::{PidNumber, PidValue};
