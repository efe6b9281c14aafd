//! Structured combat trace. The encounter emits events instead of printing or
//! broadcasting signals; callers pick a [TraceMode] and render or export the
//! collected events afterwards. Statistics runs keep tracing off so the hot
//! loop allocates nothing.

use serde::Serialize;

use crate::path::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    Off,
    Events,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    RoundStart {
        round: u64,
    },
    GoalSelected {
        actor: String,
        goal: String,
        score: f64,
    },
    Moved {
        actor: String,
        from: Cell,
        to: Cell,
    },
    AttackResolved {
        attacker: String,
        defender: String,
        attack: String,
        attack_roll: i32,
        defense_roll: i32,
        hit: bool,
        raw_damage: i32,
        final_damage: i32,
    },
    Regenerated {
        actor: String,
        amount: i32,
    },
    Died {
        name: String,
    },
    SchedulerStalled {
        iterations: u32,
    },
    TrialEnded {
        winner: String,
        rounds: u64,
    },
}

#[derive(Debug)]
pub struct TraceCollector {
    mode: TraceMode,
    events: Vec<CombatEvent>,
}

impl TraceCollector {
    pub fn new(mode: TraceMode) -> Self {
        Self {
            mode,
            events: Vec::new(),
        }
    }

    /// Record an event. The closure only runs when tracing is on.
    #[inline]
    pub fn push(&mut self, event: impl FnOnce() -> CombatEvent) {
        if self.mode == TraceMode::Events {
            self.events.push(event());
        }
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<CombatEvent> {
        self.events
    }
}

pub fn serialize_events_json(events: &[CombatEvent]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(events)
}

/// One human-readable line per event, for the verbose CLI mode.
pub fn narrate(event: &CombatEvent) -> String {
    match event {
        CombatEvent::RoundStart { round } => format!("-- round {round} --"),
        CombatEvent::GoalSelected { actor, goal, score } => {
            format!("{actor} chooses to {goal} (score {score:.2})")
        }
        CombatEvent::Moved { actor, from, to } => {
            format!("{actor} moves ({},{}) -> ({},{})", from.x, from.y, to.x, to.y)
        }
        CombatEvent::AttackResolved {
            attacker,
            defender,
            attack,
            attack_roll,
            defense_roll,
            hit,
            final_damage,
            ..
        } => {
            if !hit {
                format!("{attacker} misses {defender} with {attack} ({attack_roll} vs {defense_roll})")
            } else if *final_damage == 0 {
                format!("{attacker} hits {defender} with {attack} but the blow is blocked ({attack_roll} vs {defense_roll})")
            } else {
                format!("{attacker} hits {defender} with {attack} for {final_damage} ({attack_roll} vs {defense_roll})")
            }
        }
        CombatEvent::Regenerated { actor, amount } => {
            format!("{actor} regenerates {amount}")
        }
        CombatEvent::Died { name } => format!("{name} dies"),
        CombatEvent::SchedulerStalled { iterations } => {
            format!("warning: scheduler stopped the round after {iterations} actions")
        }
        CombatEvent::TrialEnded { winner, rounds } => {
            format!("== {winner} after {rounds} rounds ==")
        }
    }
}
