//! Goal-driven behavior selection. Every decision point scores the actor's
//! goals against a read-only context snapshot and executes the winner; goals
//! return explicit [Action] values that the encounter applies, rather than
//! mutating world state through a signal bus.

pub mod context;
pub mod goals;

pub use context::AiContext;
pub use goals::{standard_goals, BoxedGoal, Goal, GoalDriver};

use crate::path::Cell;

/// What the selected goal wants the actor to do this turn. The encounter
/// validates and applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Attack the context's target with whichever attack reaches it.
    Attack,
    /// Step onto an adjacent cell.
    Step(Cell),
    Wait,
}

/// Movement queries goals may ask of the encounter. Implementations wrap the
/// pathfinding service plus the live occupancy picture (and the trial RNG,
/// for wandering).
pub trait Navigator {
    /// Next cell of a shortest path toward `to`, or `None` when unreachable
    /// or the only step is onto the target itself.
    fn step_toward(&mut self, from: Cell, to: Cell) -> Option<Cell>;

    /// A neighboring cell strictly farther (by walking distance) from every
    /// visible threat, or `None` when cornered.
    fn step_away_from_threats(&mut self, from: Cell) -> Option<Cell>;

    /// A random open neighbor, or `None` when boxed in.
    fn wander_step(&mut self, from: Cell) -> Option<Cell>;
}

/// Outcome of one decision, including which goal won and its score (for
/// tracing).
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub goal: String,
    pub score: f64,
}
