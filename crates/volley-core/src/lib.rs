//! Core types and definitions for the VOLLEY battle simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, stat tables, state snapshots, events, and
//! constants. It has no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod stats;
pub mod types;

#[cfg(test)]
mod tests;
