//! Player commands sent from an input adapter (or network layer) to the
//! simulation.
//!
//! Commands are queued and applied at the next tick boundary. Every
//! command carries the acting side; in a single-player battle the AI
//! controller mutates unit orders directly and never goes through this
//! queue.

use serde::{Deserialize, Serialize};

use crate::enums::{FormationType, Side, UnitKind};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Replace the selection with live, non-routing units inside a rect
    /// (a sub-click-threshold rect is treated as a point pick).
    SelectRect {
        side: Side,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    /// Select every live unit of one kind.
    SelectKind { side: Side, kind: UnitKind },
    /// Select every live unit of the side.
    SelectAll { side: Side },
    /// Select all units of the same kind as the clicked unit within a
    /// radius (double-click style selection).
    SelectNearby {
        side: Side,
        x: f64,
        y: f64,
        radius: f64,
    },
    /// Drop the current selection.
    ClearSelection,
    /// Interpret a pointer drag as an order for the current selection:
    /// a short drag is an attack (if it lands on an enemy) or a
    /// formation-preserving translate; a long drag means "move to start,
    /// face toward end" with full formation regeneration.
    Order {
        side: Side,
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        formation: FormationType,
    },
}
