//! Shared helpers for AlgoeDB benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
