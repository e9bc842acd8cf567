//! Commands sent from the frontend (or debug hooks) to the session.
//!
//! Commands are queued and applied at the next tick boundary.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// All externally triggered session actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    // --- Building ---
    /// Place a tower; `orientation` sets its turret's initial facing.
    SpawnTower { position: Vec3, orientation: Quat },
    /// Show or hide every tower's range ring.
    SetBuildMode { on: bool },

    // --- Player ---
    /// Move the player (clamped to the world bounds).
    MovePlayer { position: Vec3 },

    // --- Session control ---
    Pause,
    Resume,
    /// End the session; it resets on the following tick.
    EndSession,
    /// Force a state by numeric code. Unknown codes are reported and ignored.
    SetStateCode { code: u8 },

    // --- Debug hooks ---
    /// Spawn one robot immediately (still subject to the population cap).
    SpawnRobot,
    /// Emit a batch of currency drops.
    SpawnZBucks { count: u16, position: Vec3, value: u32 },
}
