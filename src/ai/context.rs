//! Read-only per-decision snapshot handed to goal scoring.
//!
//! Visibility comes from the line-of-sight collaborator; the decision engine
//! only consumes the boolean and the Chebyshev distance.

use crate::path::Cell;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiContext {
    /// Roster index of the acting entity.
    pub actor: usize,
    pub position: Cell,
    /// Current health over max health, in [0, 1].
    pub health_fraction: f64,
    /// Whether the actor has any attack capability at all. Goals that need
    /// one score zero without it.
    pub has_attack: bool,
    /// Longest reach among the actor's attacks; 0 without attacks.
    pub attack_range: i32,
    pub target_visible: bool,
    /// Chebyshev distance to the target; `i32::MAX` when there is none.
    pub target_distance: i32,
    pub target_position: Option<Cell>,
    /// Where the target was last seen or heard, if ever.
    pub last_known_target: Option<Cell>,
    /// Decision points since the target was last seen.
    pub turns_since_seen: u32,
}

impl AiContext {
    /// True when some attack can reach the target from where the actor stands.
    pub fn target_in_reach(&self) -> bool {
        self.has_attack && self.target_visible && self.target_distance <= self.attack_range
    }
}
