//! Formation geometry for VOLLEY.
//!
//! Given a unit count, anchor, facing and shape, produces one target slot
//! per unit. Pure functions; the RNG is injected for the jittered
//! skirmish shape so slot lists stay reproducible under a seeded run.

pub use volley_core as core;

pub mod geometry;

pub use geometry::positions;
