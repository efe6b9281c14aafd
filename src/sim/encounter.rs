//! One full simulated encounter: the scheduler hands out turns, each actor's
//! goal driver decides, and the resolver applies attacks, until a team is
//! wiped out or the round cap converts a stalemate into a draw.

use crate::ai::{Action, AiContext, GoalDriver, Navigator};
use crate::combat::{
    resolve, AttackDefinition, CombatEvent, Combatant, Rng, Team, TraceCollector, TraceMode,
};
use crate::path::{build_distance_field, find_path, within_earshot, Cell};
use crate::scheduler::{TurnScheduler, ADVANCE_ITERATION_CAP};
use crate::sim::arena::Arena;

/// Energy granted per clock advancement; also the base delay an average-speed
/// actor pays per action.
pub const BASE_DELAY: i64 = 10;

pub const DEFAULT_TURN_CAP: u64 = 500;

/// How far (in tiles) an unseen enemy can be heard; the walking-distance rule
/// in [within_earshot] then decides whether the sound actually carries.
pub const HEARING_RANGE: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    TeamA,
    TeamB,
    Draw,
}

impl Winner {
    pub fn label(self) -> &'static str {
        match self {
            Winner::TeamA => "team A wins",
            Winner::TeamB => "team B wins",
            Winner::Draw => "draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    pub winner: Winner,
    pub rounds: u64,
    /// Damage dealt *by* each team over the whole trial.
    pub team_a_damage: i64,
    pub team_b_damage: i64,
    pub team_a_survivors: u32,
    pub team_b_survivors: u32,
    pub team_a_survivor_health: i64,
    pub team_b_survivor_health: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct EncounterConfig {
    pub seed: u64,
    pub turn_cap: u64,
    pub trace_mode: TraceMode,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            turn_cap: DEFAULT_TURN_CAP,
            trace_mode: TraceMode::Off,
        }
    }
}

/// Run one trial. Spawn positions are assigned here (team A on the west wall,
/// team B on the east), so roster positions on entry are ignored. Everything
/// downstream of `config.seed` is deterministic.
pub fn run_encounter(
    roster: &[Combatant],
    arena: &Arena,
    config: EncounterConfig,
) -> (TrialOutcome, Vec<CombatEvent>) {
    let mut combatants: Vec<Combatant> = roster.to_vec();
    place_teams(arena, &mut combatants);

    let mut scheduler = TurnScheduler::new();
    for (index, combatant) in combatants.iter().enumerate() {
        scheduler.register(index, combatant.effective_speed());
    }

    let drivers = combatants.iter().map(|_| GoalDriver::standard()).collect();
    let memory = combatants.iter().map(|_| ActorMemory::default()).collect();

    let mut encounter = Encounter {
        arena,
        combatants,
        drivers,
        memory,
        scheduler,
        rng: Rng::new(config.seed),
        trace: TraceCollector::new(config.trace_mode),
        team_damage: [0, 0],
    };
    let outcome = encounter.run(config.turn_cap);
    (outcome, encounter.trace.into_events())
}

#[derive(Debug, Default, Clone)]
struct ActorMemory {
    last_known: Option<Cell>,
    turns_since_seen: u32,
}

#[derive(Debug, Clone, Copy)]
struct Occupant {
    cell: Cell,
    alive: bool,
    team: Team,
}

struct Encounter<'a> {
    arena: &'a Arena,
    combatants: Vec<Combatant>,
    drivers: Vec<GoalDriver>,
    memory: Vec<ActorMemory>,
    scheduler: TurnScheduler,
    rng: Rng,
    trace: TraceCollector,
    team_damage: [i64; 2],
}

impl Encounter<'_> {
    fn run(&mut self, turn_cap: u64) -> TrialOutcome {
        let mut rounds = 0u64;
        while rounds < turn_cap && self.both_teams_alive() {
            rounds += 1;
            self.trace.push(|| CombatEvent::RoundStart { round: rounds });
            self.scheduler.advance(BASE_DELAY, None);

            let mut drained = 0u32;
            while let Some(index) = self.scheduler.next_ready(BASE_DELAY) {
                let Some(delay) = self.scheduler.delay_cost(index, BASE_DELAY) else {
                    break;
                };
                self.take_turn(index);
                self.scheduler.deduct(index, delay);
                drained += 1;
                if drained >= ADVANCE_ITERATION_CAP {
                    // Degrade gracefully: the rest of this round waits for the
                    // next advancement instead of hanging the trial.
                    self.trace
                        .push(|| CombatEvent::SchedulerStalled { iterations: drained });
                    break;
                }
                if !self.both_teams_alive() {
                    break;
                }
            }
        }
        let outcome = self.outcome(rounds);
        self.trace.push(|| CombatEvent::TrialEnded {
            winner: outcome.winner.label().to_string(),
            rounds,
        });
        outcome
    }

    fn both_teams_alive(&self) -> bool {
        let mut a = false;
        let mut b = false;
        for combatant in &self.combatants {
            if combatant.is_alive() {
                match combatant.team {
                    Team::A => a = true,
                    Team::B => b = true,
                }
            }
        }
        a && b
    }

    fn take_turn(&mut self, index: usize) {
        if !self.combatants[index].is_alive() {
            return;
        }
        self.tick_regeneration(index);

        let (ctx, target) = self.build_context(index);
        let occupants: Vec<Occupant> = self
            .combatants
            .iter()
            .map(|c| Occupant {
                cell: c.position,
                alive: c.is_alive(),
                team: c.team,
            })
            .collect();

        let decision = {
            let mut nav = NavAdapter {
                arena: self.arena,
                occupants: &occupants,
                actor: index,
                team: self.combatants[index].team,
                rng: &mut self.rng,
            };
            self.drivers[index].decide(&ctx, &mut nav)
        };
        self.trace.push(|| CombatEvent::GoalSelected {
            actor: self.combatants[index].name.clone(),
            goal: decision.goal.clone(),
            score: decision.score,
        });

        match decision.action {
            Action::Attack => {
                if let Some(defender) = target {
                    let distance = self.combatants[index]
                        .position
                        .chebyshev(self.combatants[defender].position);
                    let attack = self.combatants[index].attack_in_range(distance).cloned();
                    if let Some(attack) = attack {
                        self.perform_attack(index, defender, &attack);
                    }
                }
            }
            Action::Step(cell) => self.apply_step(index, cell),
            Action::Wait => {}
        }
    }

    fn tick_regeneration(&mut self, index: usize) {
        let combatant = &mut self.combatants[index];
        let regen = combatant.regeneration();
        if regen <= 0 || combatant.health >= combatant.max_health {
            return;
        }
        let healed = regen.min(combatant.max_health - combatant.health);
        combatant.heal(healed);
        let name = combatant.name.clone();
        self.trace.push(|| CombatEvent::Regenerated {
            actor: name,
            amount: healed,
        });
    }

    /// Snapshot the actor's view of the world: nearest hostile (visible ones
    /// preferred), sighting memory, and hearing through walls.
    fn build_context(&mut self, index: usize) -> (AiContext, Option<usize>) {
        let me = &self.combatants[index];
        let mut nearest: Option<(i32, usize)> = None;
        let mut nearest_visible: Option<(i32, usize)> = None;
        for (i, other) in self.combatants.iter().enumerate() {
            if i == index || !other.is_alive() || other.team == me.team {
                continue;
            }
            let distance = me.position.chebyshev(other.position);
            if nearest.map_or(true, |(d, _)| distance < d) {
                nearest = Some((distance, i));
            }
            if self.arena.line_of_sight(me.position, other.position)
                && nearest_visible.map_or(true, |(d, _)| distance < d)
            {
                nearest_visible = Some((distance, i));
            }
        }
        let (visible, chosen) = match (nearest_visible, nearest) {
            (Some((_, i)), _) => (true, Some(i)),
            (None, Some((_, i))) => (false, Some(i)),
            (None, None) => (false, None),
        };

        let position = me.position;
        let target_position = chosen.map(|i| self.combatants[i].position);
        let target_distance = target_position.map_or(i32::MAX, |p| position.chebyshev(p));

        let memory = &mut self.memory[index];
        if visible {
            memory.last_known = target_position;
            memory.turns_since_seen = 0;
        } else {
            memory.turns_since_seen = memory.turns_since_seen.saturating_add(1);
            // Sound carries around thin cover: an unseen but nearby enemy
            // still refreshes the last known position.
            if let Some(target_cell) = target_position {
                if target_distance <= HEARING_RANGE {
                    let walkable = |c: Cell| self.arena.is_walkable(c);
                    let field = build_distance_field(&[target_cell], &walkable);
                    if within_earshot(&field, target_cell, position) {
                        memory.last_known = Some(target_cell);
                    }
                }
            }
        }

        let me = &self.combatants[index];
        let ctx = AiContext {
            actor: index,
            position,
            health_fraction: me.health_fraction(),
            has_attack: !me.attacks.is_empty(),
            attack_range: me.best_attack_range(),
            target_visible: visible,
            target_distance,
            target_position,
            last_known_target: self.memory[index].last_known,
            turns_since_seen: self.memory[index].turns_since_seen,
        };
        (ctx, chosen)
    }

    fn perform_attack(&mut self, attacker: usize, defender: usize, attack: &AttackDefinition) {
        let attacker_name = self.combatants[attacker].name.clone();
        let defender_name = self.combatants[defender].name.clone();
        let attacker_team = self.combatants[attacker].team;

        let (att, def) = pair_mut(&mut self.combatants, attacker, defender);
        let outcome = resolve(&*att, def, attack, &mut self.rng);

        let team_index = match attacker_team {
            Team::A => 0,
            Team::B => 1,
        };
        self.team_damage[team_index] += i64::from(outcome.final_damage);

        self.trace.push(|| CombatEvent::AttackResolved {
            attacker: attacker_name,
            defender: defender_name.clone(),
            attack: attack.name.clone(),
            attack_roll: outcome.attack_roll,
            defense_roll: outcome.defense_roll,
            hit: outcome.hit,
            raw_damage: outcome.raw_damage,
            final_damage: outcome.final_damage,
        });
        if outcome.lethal {
            self.trace.push(|| CombatEvent::Died {
                name: defender_name,
            });
            self.scheduler.remove(defender);
        }
    }

    fn apply_step(&mut self, index: usize, cell: Cell) {
        let from = self.combatants[index].position;
        let occupied = self
            .combatants
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && c.is_alive() && c.position == cell);
        if from.chebyshev(cell) != 1 || !self.arena.is_walkable(cell) || occupied {
            return;
        }
        self.combatants[index].position = cell;
        let name = self.combatants[index].name.clone();
        self.trace.push(|| CombatEvent::Moved {
            actor: name,
            from,
            to: cell,
        });
    }

    fn outcome(&self, rounds: u64) -> TrialOutcome {
        let mut survivors = [0u32; 2];
        let mut survivor_health = [0i64; 2];
        for combatant in &self.combatants {
            if combatant.is_alive() {
                let i = match combatant.team {
                    Team::A => 0,
                    Team::B => 1,
                };
                survivors[i] += 1;
                survivor_health[i] += i64::from(combatant.health);
            }
        }
        let winner = match (survivors[0] > 0, survivors[1] > 0) {
            (true, false) => Winner::TeamA,
            (false, true) => Winner::TeamB,
            _ => Winner::Draw,
        };
        TrialOutcome {
            winner,
            rounds,
            team_a_damage: self.team_damage[0],
            team_b_damage: self.team_damage[1],
            team_a_survivors: survivors[0],
            team_b_survivors: survivors[1],
            team_a_survivor_health: survivor_health[0],
            team_b_survivor_health: survivor_health[1],
        }
    }
}

/// Team A spawns along the west wall, team B along the east, fanning out from
/// the vertical center.
fn place_teams(arena: &Arena, combatants: &mut [Combatant]) {
    let mut slots = [0i32, 0];
    for combatant in combatants {
        let (x, slot) = match combatant.team {
            Team::A => (1, &mut slots[0]),
            Team::B => (arena.width - 2, &mut slots[1]),
        };
        combatant.position = Cell::new(x, spawn_y(arena.height, *slot));
        *slot += 1;
    }
}

/// 0, -1, +1, -2, +2, ... around the center row, clamped to bounds.
fn spawn_y(height: i32, slot: i32) -> i32 {
    let center = height / 2;
    let magnitude = (slot + 1) / 2;
    let offset = if slot % 2 == 1 { -magnitude } else { magnitude };
    (center + offset).clamp(0, height - 1)
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert!(a != b);
    if a < b {
        let (low, high) = items.split_at_mut(b);
        (&mut low[a], &mut high[0])
    } else {
        let (low, high) = items.split_at_mut(a);
        (&mut high[0], &mut low[b])
    }
}

struct NavAdapter<'a> {
    arena: &'a Arena,
    occupants: &'a [Occupant],
    actor: usize,
    team: Team,
    rng: &'a mut Rng,
}

impl NavAdapter<'_> {
    fn occupied(&self, cell: Cell) -> bool {
        self.occupants
            .iter()
            .enumerate()
            .any(|(i, o)| i != self.actor && o.alive && o.cell == cell)
    }
}

impl Navigator for NavAdapter<'_> {
    fn step_toward(&mut self, from: Cell, to: Cell) -> Option<Cell> {
        let arena = self.arena;
        let occupants = self.occupants;
        let actor = self.actor;
        let walkable = move |c: Cell| arena.is_walkable(c);
        let blocked = move |c: Cell| {
            occupants
                .iter()
                .enumerate()
                .any(|(i, o)| i != actor && o.alive && o.cell == c)
        };
        let path = find_path(from, to, &walkable, &blocked)?;
        let step = *path.cells.first()?;
        if blocked(step) {
            // Only step was onto the occupied goal tile itself.
            return None;
        }
        Some(step)
    }

    fn step_away_from_threats(&mut self, from: Cell) -> Option<Cell> {
        let threats: Vec<Cell> = self
            .occupants
            .iter()
            .filter(|o| o.alive && o.team != self.team)
            .map(|o| o.cell)
            .collect();
        if threats.is_empty() {
            return None;
        }
        let arena = self.arena;
        let walkable = move |c: Cell| arena.is_walkable(c);
        let field = build_distance_field(&threats, &walkable);
        let current = field.distance(from);
        let mut best: Option<(f64, Cell)> = None;
        for neighbor in from.neighbors() {
            if !walkable(neighbor) || self.occupied(neighbor) {
                continue;
            }
            let distance = field.distance(neighbor);
            if distance > current && best.map_or(true, |(d, _)| distance > d) {
                best = Some((distance, neighbor));
            }
        }
        best.map(|(_, cell)| cell)
    }

    fn wander_step(&mut self, from: Cell) -> Option<Cell> {
        let open: Vec<Cell> = from
            .neighbors()
            .into_iter()
            .filter(|&c| self.arena.is_walkable(c) && !self.occupied(c))
            .collect();
        if open.is_empty() {
            None
        } else {
            Some(open[self.rng.pick_index(open.len())])
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::combat::{AttackKind, Attributes, DamageType, DiceExpr, SkillDefinition};

    fn brawler(id: &str, team: Team, speed: i32) -> Combatant {
        Combatant {
            id: id.to_string(),
            name: id.to_string(),
            team,
            attributes: Attributes::new(14, 10, 12, 10),
            max_health: 16,
            max_willpower: 10,
            armor: 0,
            evasion: 0,
            speed,
            health: 16,
            willpower: 10,
            position: Cell::new(0, 0),
            attacks: vec![AttackDefinition {
                name: "fist".to_string(),
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
    fn duel_produces_a_single_surviving_team() {
        let roster = vec![brawler("a", Team::A, 10), brawler("b", Team::B, 10)];
        let arena = Arena::standard();
        let (outcome, _) = run_encounter(&roster, &arena, EncounterConfig::default());
        assert_ne!(outcome.winner, Winner::Draw);
        assert!(outcome.rounds > 0);
        let survivors = outcome.team_a_survivors + outcome.team_b_survivors;
        assert_eq!(survivors, 1);
    }

    #[test]
    fn same_seed_replays_identically() {
        let roster = vec![brawler("a", Team::A, 10), brawler("b", Team::B, 12)];
        let arena = Arena::standard();
        let config = EncounterConfig {
            seed: 99,
            ..EncounterConfig::default()
        };
        let (first, events_a) = run_encounter(&roster, &arena, config);
        let (second, events_b) = run_encounter(&roster, &arena, config);
        assert_eq!(first, second);
        assert_eq!(events_a, events_b);
    }

    #[test]
    fn impenetrable_armor_stalemate_is_a_draw_at_the_cap() {
        let mut a = brawler("a", Team::A, 10);
        let mut b = brawler("b", Team::B, 10);
        a.armor = 50;
        b.armor = 50;
        a.skills.push(SkillDefinition::Regeneration(3));
        b.skills.push(SkillDefinition::Regeneration(3));
        let arena = Arena::standard();
        let config = EncounterConfig {
            seed: 5,
            turn_cap: 40,
            trace_mode: TraceMode::Off,
        };
        let (outcome, _) = run_encounter(&vec![a, b], &arena, config);
        assert_eq!(outcome.winner, Winner::Draw);
        assert_eq!(outcome.rounds, 40);
        assert_eq!(outcome.team_a_survivors, 1);
        assert_eq!(outcome.team_b_survivors, 1);
    }

    #[test]
    fn traced_trial_narrates_rounds_and_the_ending() {
        let roster = vec![brawler("a", Team::A, 10), brawler("b", Team::B, 10)];
        let arena = Arena::standard();
        let config = EncounterConfig {
            seed: 3,
            turn_cap: DEFAULT_TURN_CAP,
            trace_mode: TraceMode::Events,
        };
        let (_, events) = run_encounter(&roster, &arena, config);
        assert!(matches!(events.first(), Some(CombatEvent::RoundStart { round: 1 })));
        assert!(matches!(events.last(), Some(CombatEvent::TrialEnded { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::AttackResolved { .. })));
    }

    #[test]
    fn overloaded_round_stalls_with_a_warning_instead_of_hanging() {
        // Speed 1000 floors the delay cost at 1, so each actor can drain ten
        // turns per advancement; 120 of them exceed the iteration cap inside
        // round one. Armor 50 keeps everyone alive so no team wipe cuts the
        // round short.
        let mut roster = Vec::new();
        for i in 0..60 {
            let mut a = brawler(&format!("a{i}"), Team::A, 1000);
            a.armor = 50;
            roster.push(a);
            let mut b = brawler(&format!("b{i}"), Team::B, 1000);
            b.armor = 50;
            roster.push(b);
        }
        let arena = Arena::standard();
        let config = EncounterConfig {
            seed: 1,
            turn_cap: 1,
            trace_mode: TraceMode::Events,
        };
        let (outcome, events) = run_encounter(&roster, &arena, config);
        assert!(events.iter().any(|e| matches!(
            e,
            CombatEvent::SchedulerStalled {
                iterations: crate::scheduler::ADVANCE_ITERATION_CAP
            }
        )));
        assert!(matches!(events.last(), Some(CombatEvent::TrialEnded { .. })));
        assert_eq!(outcome.winner, Winner::Draw);
        assert_eq!(outcome.rounds, 1);
    }

    #[test]
    fn spawn_rows_fan_out_from_the_center() {
        assert_eq!(spawn_y(12, 0), 6);
        assert_eq!(spawn_y(12, 1), 5);
        assert_eq!(spawn_y(12, 2), 7);
        assert_eq!(spawn_y(12, 3), 4);
    }
}
