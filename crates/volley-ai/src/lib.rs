//! Battle AI for VOLLEY.
//!
//! Implements the phased controller that drives the computer side:
//! deploy, advance, engage, and a one-time cavalry flanking charge.
//! Pure decision functions: a battlefield view goes in, a list of
//! orders comes out. No ECS dependency beyond entity handles.

pub use volley_core as core;

pub mod controller;
pub mod targeting;

pub use controller::{think, AiOrder, AiState, Battlefield, UnitInfo};

#[cfg(test)]
mod tests;
