//! `arena_shared`
//!
//! Shared libraries used by the client engine and its tests.
//!
//! Design goals:
//! - Deterministic, frame-rate independent simulation inputs.
//! - Clear separation of concerns (math, net, config, tuning).
//! - Wire types are plain serde data; no game logic lives here.
//! - No `unsafe`.

pub mod color;
pub mod config;
pub mod math;
pub mod net;
pub mod tuning;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::math::*;
    pub use crate::net::*;
    pub use crate::tuning::*;
}
