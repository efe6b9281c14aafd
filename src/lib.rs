//! Turn-based combat simulation core and Monte Carlo balance harness.
//!
//! The library half is the simulation core shared by the interactive game and
//! the offline harness: an energy-based turn scheduler, an opposed-roll combat
//! resolver, goal-driven AI, and grid search. The binary half repeats full
//! encounters over seeded trials and reports win rates with confidence
//! intervals.

pub mod ai;
pub mod cli;
pub mod combat;
pub mod data;
pub mod parallel;
pub mod path;
pub mod report;
pub mod scheduler;
pub mod sim;
