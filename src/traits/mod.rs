//! Trait definitions for hardware abstraction and the shared drive surface.
//!
//! # Submodules
//!
//! - `hardware`: single-motor driver contract, stop actions, polarity, delays
//! - `drive`: stop/wait/position capabilities common to every drive layer
//!
//! # Hardware Abstraction
//!
//! - [`Motor`]: one rotary hub motor, commanded in native units
//! - [`Delay`]: async delay for cooperative waits
//!
//! Blocking waits use [`embedded_hal::delay::DelayNs`].

pub mod drive;
pub mod hardware;

pub use drive::*;
pub use hardware::*;
