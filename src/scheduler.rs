//! Energy-based turn scheduling.
//!
//! Advancing the clock grants every registered actor energy; an actor may act
//! once its energy covers its delay cost, and acting spends exactly that cost.
//! Energy carries over between rounds and is never reset, so a fast actor can
//! bank enough to act twice before a slow one moves. Faster actors are read
//! first; that is the central fairness invariant.

/// Delay formula reference point: an actor at this speed pays exactly
/// `base_delay` per action.
pub const DEFAULT_REFERENCE_SPEED: i32 = 10;

/// Per-advancement ceiling on dequeued actions. A mis-configured actor cannot
/// hang the loop; callers report hitting the cap as a warning and move on to
/// the next advancement.
pub const ADVANCE_ITERATION_CAP: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledActor {
    /// Caller-side identity, usually an index into the encounter roster.
    pub index: usize,
    pub speed: i32,
    pub energy: i64,
}

#[derive(Debug, Clone)]
pub struct TurnScheduler {
    actors: Vec<ScheduledActor>,
    reference_speed: i32,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::with_reference_speed(DEFAULT_REFERENCE_SPEED)
    }

    /// The speed-to-delay mapping is tuning-sensitive, so the reference speed
    /// stays configurable.
    pub fn with_reference_speed(reference_speed: i32) -> Self {
        Self {
            actors: Vec::new(),
            reference_speed: reference_speed.max(1),
        }
    }

    /// Registration order is significant: it breaks ready-actor ties.
    pub fn register(&mut self, index: usize, speed: i32) {
        self.actors.push(ScheduledActor {
            index,
            speed: speed.max(1),
            energy: 0,
        });
    }

    pub fn remove(&mut self, index: usize) {
        self.actors.retain(|actor| actor.index != index);
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn energy_of(&self, index: usize) -> Option<i64> {
        self.actors
            .iter()
            .find(|actor| actor.index == index)
            .map(|actor| actor.energy)
    }

    /// `delay = base_delay * reference_speed / speed`, floored, minimum 1.
    /// Faster actors pay less per action and therefore act more often.
    pub fn delay_cost(&self, index: usize, base_delay: i64) -> Option<i64> {
        self.actors
            .iter()
            .find(|actor| actor.index == index)
            .map(|actor| self.cost_for(actor, base_delay))
    }

    fn cost_for(&self, actor: &ScheduledActor, base_delay: i64) -> i64 {
        (base_delay * i64::from(self.reference_speed) / i64::from(actor.speed)).max(1)
    }

    /// Grant `amount` energy to every actor except `except` (the actor that
    /// just acted, when the clock is driven by an external actor such as a
    /// player). `None` advances everyone uniformly.
    pub fn advance(&mut self, amount: i64, except: Option<usize>) {
        for actor in &mut self.actors {
            if Some(actor.index) != except {
                actor.energy += amount;
            }
        }
    }

    /// The single ready actor with the highest speed; registration order
    /// breaks ties. `None` when nobody has banked enough energy.
    pub fn next_ready(&self, base_delay: i64) -> Option<usize> {
        let mut best: Option<&ScheduledActor> = None;
        for actor in &self.actors {
            if actor.energy < self.cost_for(actor, base_delay) {
                continue;
            }
            match best {
                Some(current) if actor.speed <= current.speed => {}
                _ => best = Some(actor),
            }
        }
        best.map(|actor| actor.index)
    }

    /// Spend exactly `delay`. Never clamps to zero: leftover energy lets an
    /// actor take a second action in the same round.
    pub fn deduct(&mut self, index: usize, delay: i64) {
        if let Some(actor) = self.actors.iter_mut().find(|actor| actor.index == index) {
            actor.energy -= delay;
        }
    }
}
