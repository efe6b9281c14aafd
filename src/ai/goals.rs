//! Built-in goal archetypes and the per-actor driver that selects among them.
//!
//! Scores are utilities in [0, 1]. The driver picks the highest score;
//! declaration order breaks ties, and the activation hooks fire whenever the
//! winner changes so stateful goals can reset their counters. Every actor's
//! goal list ends with a fallback that always scores above zero, so selection
//! can never come up empty.

use crate::ai::{Action, AiContext, Navigator};

pub trait Goal {
    fn name(&self) -> &str;

    /// Utility of this goal under `ctx`; 0.0 means "not applicable".
    fn score(&self, ctx: &AiContext) -> f64;

    fn execute(&mut self, ctx: &AiContext, nav: &mut dyn Navigator) -> Action;

    fn on_activated(&mut self) {}

    fn on_deactivated(&mut self) {}
}

pub type BoxedGoal = Box<dyn Goal + Send>;

/// Attack when a visible hostile is within reach of some attack.
#[derive(Debug, Default)]
pub struct EngageGoal;

impl Goal for EngageGoal {
    fn name(&self) -> &str {
        "engage"
    }

    fn score(&self, ctx: &AiContext) -> f64 {
        if ctx.target_in_reach() {
            0.9
        } else {
            0.0
        }
    }

    fn execute(&mut self, _ctx: &AiContext, _nav: &mut dyn Navigator) -> Action {
        Action::Attack
    }
}

/// Close the distance to a visible hostile that is out of reach.
#[derive(Debug, Default)]
pub struct PursueGoal;

impl Goal for PursueGoal {
    fn name(&self) -> &str {
        "pursue"
    }

    fn score(&self, ctx: &AiContext) -> f64 {
        if ctx.has_attack && ctx.target_visible && ctx.target_distance > ctx.attack_range {
            0.7
        } else {
            0.0
        }
    }

    fn execute(&mut self, ctx: &AiContext, nav: &mut dyn Navigator) -> Action {
        let Some(target) = ctx.target_position else {
            return Action::Wait;
        };
        match nav.step_toward(ctx.position, target) {
            Some(cell) => Action::Step(cell),
            None => Action::Wait,
        }
    }
}

/// Run from visible threats when badly hurt. Outranks engaging.
#[derive(Debug)]
pub struct FleeGoal {
    pub health_threshold: f64,
}

impl Default for FleeGoal {
    fn default() -> Self {
        Self {
            health_threshold: 0.25,
        }
    }
}

impl Goal for FleeGoal {
    fn name(&self) -> &str {
        "flee"
    }

    fn score(&self, ctx: &AiContext) -> f64 {
        if ctx.target_visible && ctx.health_fraction < self.health_threshold {
            0.95
        } else {
            0.0
        }
    }

    fn execute(&mut self, ctx: &AiContext, nav: &mut dyn Navigator) -> Action {
        match nav.step_away_from_threats(ctx.position) {
            Some(cell) => Action::Step(cell),
            None => Action::Wait,
        }
    }
}

/// Head for the target's last known position for a while after losing sight.
#[derive(Debug)]
pub struct SearchGoal {
    /// Decision points to keep searching after the last sighting.
    pub patience: u32,
    steps_taken: u32,
}

impl SearchGoal {
    pub fn new(patience: u32) -> Self {
        Self {
            patience,
            steps_taken: 0,
        }
    }
}

impl Default for SearchGoal {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Goal for SearchGoal {
    fn name(&self) -> &str {
        "search"
    }

    fn score(&self, ctx: &AiContext) -> f64 {
        let worth_searching = !ctx.target_visible
            && ctx.last_known_target.is_some()
            && ctx.turns_since_seen > 0
            && ctx.turns_since_seen <= self.patience
            && self.steps_taken < self.patience;
        if worth_searching {
            0.5
        } else {
            0.0
        }
    }

    fn execute(&mut self, ctx: &AiContext, nav: &mut dyn Navigator) -> Action {
        self.steps_taken += 1;
        let Some(last_known) = ctx.last_known_target else {
            return Action::Wait;
        };
        if ctx.position == last_known {
            return Action::Wait;
        }
        match nav.step_toward(ctx.position, last_known) {
            Some(cell) => Action::Step(cell),
            None => Action::Wait,
        }
    }

    fn on_activated(&mut self) {
        self.steps_taken = 0;
    }

    fn on_deactivated(&mut self) {
        self.steps_taken = 0;
    }
}

/// Universal fallback: drift around. Always applicable.
#[derive(Debug, Default)]
pub struct WanderGoal;

impl Goal for WanderGoal {
    fn name(&self) -> &str {
        "wander"
    }

    fn score(&self, _ctx: &AiContext) -> f64 {
        0.1
    }

    fn execute(&mut self, ctx: &AiContext, nav: &mut dyn Navigator) -> Action {
        match nav.wander_step(ctx.position) {
            Some(cell) => Action::Step(cell),
            None => Action::Wait,
        }
    }
}

/// The default goal loadout every simulated combatant runs with.
pub fn standard_goals() -> Vec<BoxedGoal> {
    vec![
        Box::<FleeGoal>::default(),
        Box::<EngageGoal>::default(),
        Box::<PursueGoal>::default(),
        Box::<SearchGoal>::default(),
        Box::<WanderGoal>::default(),
    ]
}

/// Per-actor goal state machine: remembers the current goal across decisions
/// and fires the activation hook pair when the winner changes.
pub struct GoalDriver {
    goals: Vec<BoxedGoal>,
    current: Option<usize>,
}

impl GoalDriver {
    pub fn new(goals: Vec<BoxedGoal>) -> Self {
        Self {
            goals,
            current: None,
        }
    }

    pub fn standard() -> Self {
        Self::new(standard_goals())
    }

    pub fn current_goal(&self) -> Option<&str> {
        self.current.map(|i| self.goals[i].name())
    }

    /// Score every goal, switch if a strictly better one won, then execute.
    /// Declaration order breaks ties because only a strictly greater score
    /// displaces the front-runner.
    pub fn decide(&mut self, ctx: &AiContext, nav: &mut dyn Navigator) -> super::Decision {
        debug_assert!(!self.goals.is_empty(), "actors must carry a fallback goal");
        let mut winner = 0;
        let mut best = f64::MIN;
        for (i, goal) in self.goals.iter().enumerate() {
            let score = goal.score(ctx);
            if score > best {
                best = score;
                winner = i;
            }
        }
        if self.current != Some(winner) {
            if let Some(previous) = self.current {
                self.goals[previous].on_deactivated();
            }
            self.goals[winner].on_activated();
            self.current = Some(winner);
        }
        let action = self.goals[winner].execute(ctx, nav);
        super::Decision {
            action,
            goal: self.goals[winner].name().to_string(),
            score: best,
        }
    }
}
