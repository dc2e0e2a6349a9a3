//! Integration test crate for Trimline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every trimline crate to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod interaction;

#[cfg(test)]
mod playback;
