//! Scenario simulation: the arena, the per-trial encounter loop, and the
//! Monte Carlo harness that folds many seeded trials into statistics.

pub mod arena;
pub mod encounter;
pub mod monte_carlo;

pub use arena::Arena;
pub use encounter::{
    run_encounter, EncounterConfig, TrialOutcome, Winner, BASE_DELAY, DEFAULT_TURN_CAP,
};
pub use monte_carlo::{
    confidence_interval_95, run_duel, run_group_battle, run_trials, run_trials_sequential,
    traced_trial, AggregateResult, ScenarioConfig, Summary,
};
