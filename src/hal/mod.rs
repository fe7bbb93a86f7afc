//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `std`: Thread-sleeping blocking delay (requires `std` feature)

pub mod mock;

#[cfg(feature = "std")]
pub mod std;

pub use mock::*;

#[cfg(feature = "std")]
pub use self::std::*;
