//! Monte Carlo harness: run a scenario for many seeded trials and fold the
//! outcomes into win rates with a 95% confidence interval.
//!
//! Trial `i` always runs with seed `base_seed + i`, and partial tallies merge
//! commutatively, so the aggregate is byte-for-byte identical no matter how
//! many workers the batches land on.

use rayon::prelude::*;
use serde::Serialize;

use crate::combat::{CombatEvent, Combatant, TraceMode};
use crate::parallel::{batch_ranges, WorkerPool};
use crate::sim::arena::Arena;
use crate::sim::encounter::{run_encounter, EncounterConfig, TrialOutcome, Winner, DEFAULT_TURN_CAP};

#[derive(Debug, Clone, Copy)]
pub struct ScenarioConfig {
    pub iterations: usize,
    pub seed: u64,
    pub turn_cap: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: 7,
            turn_cap: DEFAULT_TURN_CAP,
        }
    }
}

/// Running tally over trials. `merge` is commutative and associative so
/// partial tallies from parallel batches fold in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    pub trials: u64,
    pub team_a_wins: u64,
    pub team_b_wins: u64,
    pub draws: u64,
    pub rounds_total: u64,
    pub team_a_damage_total: i64,
    pub team_b_damage_total: i64,
    pub team_a_survivors_total: u64,
    pub team_b_survivors_total: u64,
    pub team_a_survivor_health_total: i64,
    pub team_b_survivor_health_total: i64,
}

impl AggregateResult {
    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        match outcome.winner {
            Winner::TeamA => self.team_a_wins += 1,
            Winner::TeamB => self.team_b_wins += 1,
            Winner::Draw => self.draws += 1,
        }
        self.rounds_total += outcome.rounds;
        self.team_a_damage_total += outcome.team_a_damage;
        self.team_b_damage_total += outcome.team_b_damage;
        self.team_a_survivors_total += u64::from(outcome.team_a_survivors);
        self.team_b_survivors_total += u64::from(outcome.team_b_survivors);
        self.team_a_survivor_health_total += outcome.team_a_survivor_health;
        self.team_b_survivor_health_total += outcome.team_b_survivor_health;
    }

    pub fn merge(&mut self, other: &AggregateResult) {
        self.trials += other.trials;
        self.team_a_wins += other.team_a_wins;
        self.team_b_wins += other.team_b_wins;
        self.draws += other.draws;
        self.rounds_total += other.rounds_total;
        self.team_a_damage_total += other.team_a_damage_total;
        self.team_b_damage_total += other.team_b_damage_total;
        self.team_a_survivors_total += other.team_a_survivors_total;
        self.team_b_survivors_total += other.team_b_survivors_total;
        self.team_a_survivor_health_total += other.team_a_survivor_health_total;
        self.team_b_survivor_health_total += other.team_b_survivor_health_total;
    }

    pub fn summarize(&self) -> Summary {
        let n = self.trials as f64;
        let avg = |total: f64| if self.trials == 0 { 0.0 } else { total / n };
        let team_a_win_rate = avg(self.team_a_wins as f64);
        Summary {
            iterations: self.trials,
            team_a_wins: self.team_a_wins,
            team_b_wins: self.team_b_wins,
            draws: self.draws,
            team_a_win_rate,
            team_b_win_rate: avg(self.team_b_wins as f64),
            confidence_interval95: confidence_interval_95(team_a_win_rate, self.trials),
            avg_turns: avg(self.rounds_total as f64),
            avg_team_a_damage: avg(self.team_a_damage_total as f64),
            avg_team_b_damage: avg(self.team_b_damage_total as f64),
            avg_team_a_survivors: avg(self.team_a_survivors_total as f64),
            avg_team_b_survivors: avg(self.team_b_survivors_total as f64),
            avg_team_a_survivor_health: avg(self.team_a_survivor_health_total as f64),
            avg_team_b_survivor_health: avg(self.team_b_survivor_health_total as f64),
        }
    }
}

/// Per-scenario statistics as they appear in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub iterations: u64,
    pub team_a_wins: u64,
    pub team_b_wins: u64,
    pub draws: u64,
    pub team_a_win_rate: f64,
    pub team_b_win_rate: f64,
    pub confidence_interval95: f64,
    pub avg_turns: f64,
    pub avg_team_a_damage: f64,
    pub avg_team_b_damage: f64,
    pub avg_team_a_survivors: f64,
    pub avg_team_b_survivors: f64,
    pub avg_team_a_survivor_health: f64,
    pub avg_team_b_survivor_health: f64,
}

/// Normal-approximation half-width of the 95% interval around a win rate.
/// Draws stay in `n`: they are evidence about the rate like any other trial.
pub fn confidence_interval_95(p: f64, n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    1.96 * (p * (1.0 - p) / n as f64).sqrt()
}

/// Run every trial of a scenario across the worker pool and fold the tallies.
pub fn run_trials(roster: &[Combatant], config: &ScenarioConfig, pool: &WorkerPool) -> AggregateResult {
    let arena = Arena::standard();
    pool.install(|| {
        let batches = batch_ranges(
            config.iterations,
            rayon::current_num_threads().max(1) * 4,
        );
        batches
            .par_iter()
            .map(|&(start, end)| {
                let mut partial = AggregateResult::default();
                for trial in start..end {
                    let (outcome, _) = run_trial(roster, &arena, config, trial);
                    partial.record(&outcome);
                }
                partial
            })
            .reduce(AggregateResult::default, |mut merged, partial| {
                merged.merge(&partial);
                merged
            })
    })
}

/// Single-threaded reference runner; same results as [run_trials].
pub fn run_trials_sequential(roster: &[Combatant], config: &ScenarioConfig) -> AggregateResult {
    let arena = Arena::standard();
    let mut tally = AggregateResult::default();
    for trial in 0..config.iterations {
        let (outcome, _) = run_trial(roster, &arena, config, trial);
        tally.record(&outcome);
    }
    tally
}

/// Replay one trial with event tracing, for `--verbose` narration.
pub fn traced_trial(
    roster: &[Combatant],
    config: &ScenarioConfig,
    trial: usize,
) -> (TrialOutcome, Vec<CombatEvent>) {
    let arena = Arena::standard();
    let trial_config = EncounterConfig {
        seed: config.seed.wrapping_add(trial as u64),
        turn_cap: config.turn_cap,
        trace_mode: TraceMode::Events,
    };
    run_encounter(roster, &arena, trial_config)
}

fn run_trial(
    roster: &[Combatant],
    arena: &Arena,
    config: &ScenarioConfig,
    trial: usize,
) -> (TrialOutcome, Vec<CombatEvent>) {
    let trial_config = EncounterConfig {
        seed: config.seed.wrapping_add(trial as u64),
        turn_cap: config.turn_cap,
        trace_mode: TraceMode::Off,
    };
    run_encounter(roster, arena, trial_config)
}

/// One-on-one scenario: the two combatants must already carry opposing teams.
pub fn run_duel(
    a: &Combatant,
    b: &Combatant,
    config: &ScenarioConfig,
    pool: &WorkerPool,
) -> AggregateResult {
    let roster = vec![a.clone(), b.clone()];
    run_trials(&roster, config, pool)
}

/// Team scenario over two already-teamed rosters.
pub fn run_group_battle(
    team_a: &[Combatant],
    team_b: &[Combatant],
    config: &ScenarioConfig,
    pool: &WorkerPool,
) -> AggregateResult {
    let mut roster = Vec::with_capacity(team_a.len() + team_b.len());
    roster.extend_from_slice(team_a);
    roster.extend_from_slice(team_b);
    run_trials(&roster, config, pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Team;

    fn outcome(winner: Winner) -> TrialOutcome {
        TrialOutcome {
            winner,
            rounds: 10,
            team_a_damage: 20,
            team_b_damage: 15,
            team_a_survivors: u32::from(winner == Winner::TeamA),
            team_b_survivors: u32::from(winner == Winner::TeamB),
            team_a_survivor_health: 8,
            team_b_survivor_health: 0,
        }
    }

    #[test]
    fn confidence_interval_matches_the_textbook_value() {
        // 600 wins in 1000 trials: 1.96 * sqrt(0.6 * 0.4 / 1000).
        let half_width = confidence_interval_95(0.6, 1000);
        assert!((half_width - 0.030365).abs() < 1e-4);
    }

    #[test]
    fn confidence_interval_of_zero_trials_is_zero() {
        assert_eq!(confidence_interval_95(0.5, 0), 0.0);
    }

    #[test]
    fn draws_count_toward_the_trial_total() {
        let mut tally = AggregateResult::default();
        for _ in 0..600 {
            tally.record(&outcome(Winner::TeamA));
        }
        for _ in 0..390 {
            tally.record(&outcome(Winner::TeamB));
        }
        for _ in 0..10 {
            tally.record(&outcome(Winner::Draw));
        }
        let summary = tally.summarize();
        assert_eq!(summary.iterations, 1000);
        assert!((summary.team_a_win_rate - 0.6).abs() < 1e-12);
        assert!((summary.confidence_interval95 - 0.030365).abs() < 1e-4);
    }

    #[test]
    fn merge_is_order_independent() {
        let mut left = AggregateResult::default();
        let mut right = AggregateResult::default();
        for i in 0..50 {
            let winner = if i % 3 == 0 { Winner::TeamB } else { Winner::TeamA };
            if i % 2 == 0 {
                left.record(&outcome(winner));
            } else {
                right.record(&outcome(winner));
            }
        }
        let mut forward = left.clone();
        forward.merge(&right);
        let mut backward = right.clone();
        backward.merge(&left);
        assert_eq!(forward, backward);
        assert_eq!(forward.trials, 50);
    }

    fn fighter(id: &str, team: Team) -> Combatant {
        use crate::combat::{AttackDefinition, AttackKind, Attributes, DamageType, DiceExpr};
        use crate::path::Cell;
        use std::collections::BTreeSet;

        Combatant {
            id: id.to_string(),
            name: id.to_string(),
            team,
            attributes: Attributes::new(12, 10, 10, 10),
            max_health: 12,
            max_willpower: 10,
            armor: 0,
            evasion: 0,
            speed: 10,
            health: 12,
            willpower: 10,
            position: Cell::new(0, 0),
            attacks: vec![AttackDefinition {
                name: "club".to_string(),
                damage: DiceExpr::new(1, 6, 0),
                damage_type: DamageType::Physical,
                kind: AttackKind::Melee,
                range: 1,
            }],
            skills: Vec::new(),
            immunities: BTreeSet::new(),
            resistances: BTreeSet::new(),
            vulnerabilities: BTreeSet::new(),
        }
    }

    #[test]
    fn parallel_and_sequential_runs_agree_exactly() {
        let a = fighter("a", Team::A);
        let b = fighter("b", Team::B);
        let config = ScenarioConfig {
            iterations: 40,
            seed: 11,
            turn_cap: 200,
        };
        let parallel = run_duel(&a, &b, &config, &WorkerPool::default_workers());
        let pinned = run_duel(&a, &b, &config, &WorkerPool::with_workers(2));
        let sequential = run_trials_sequential(&[a, b], &config);
        assert_eq!(parallel, sequential);
        assert_eq!(pinned, sequential);
    }
}
