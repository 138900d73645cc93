//! Control algorithms implemented for [`pidloop`](https://crates.io/crates/pidloop).
//!

#![no_std]

pub mod pid;
