//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `topicseat` application.
//!
//! This module centralizes reusable components, such as the error types shared
//! by the store and service layers and the logging bootstrap.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests;
