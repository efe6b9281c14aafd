//! Combatant stat model: base attributes, derived block, attacks, skills and
//! damage affinities. Combatants are constructed from static definitions at
//! encounter start and discarded when the encounter ends.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::combat::dice::DiceExpr;
use crate::path::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DamageType {
    Physical,
    Fire,
    Cold,
    Poison,
    Arcane,
}

/// How a defender's affinities modify raw damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageAffinity {
    Normal,
    Immune,
    Resistant,
    Vulnerable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttackKind {
    Melee,
    Ranged,
}

/// One attack option. `range` is in Chebyshev tiles; melee attacks use 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackDefinition {
    pub name: String,
    pub damage: DiceExpr,
    pub damage_type: DamageType,
    pub kind: AttackKind,
    pub range: i32,
}

/// Passive skills. Regeneration ticks at the owner's turn start; Vigilance
/// raises the defense modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkillDefinition {
    Regeneration(i32),
    Vigilance(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attributes {
    pub strength: i32,
    pub agility: i32,
    pub endurance: i32,
    pub will: i32,
}

/// Classic modifier table: 10 is average, every 2 points shift one step.
/// Floor division so 8 maps to -1, not 0.
pub fn attribute_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

impl Attributes {
    pub const fn new(strength: i32, agility: i32, endurance: i32, will: i32) -> Self {
        Self {
            strength,
            agility,
            endurance,
            will,
        }
    }

    pub fn strength_mod(&self) -> i32 {
        attribute_modifier(self.strength)
    }

    pub fn agility_mod(&self) -> i32 {
        attribute_modifier(self.agility)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub team: Team,
    pub attributes: Attributes,
    pub max_health: i32,
    pub max_willpower: i32,
    pub armor: i32,
    pub evasion: i32,
    pub speed: i32,
    pub health: i32,
    pub willpower: i32,
    pub position: Cell,
    pub attacks: Vec<AttackDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub immunities: BTreeSet<DamageType>,
    pub resistances: BTreeSet<DamageType>,
    pub vulnerabilities: BTreeSet<DamageType>,
}

impl Combatant {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        f64::from(self.health) / f64::from(self.max_health)
    }

    /// Immunity wins over resistance, resistance over vulnerability.
    pub fn affinity(&self, damage_type: DamageType) -> DamageAffinity {
        if self.immunities.contains(&damage_type) {
            DamageAffinity::Immune
        } else if self.resistances.contains(&damage_type) {
            DamageAffinity::Resistant
        } else if self.vulnerabilities.contains(&damage_type) {
            DamageAffinity::Vulnerable
        } else {
            DamageAffinity::Normal
        }
    }

    /// Attack-roll modifier: melee from Strength, ranged from Agility.
    pub fn attack_modifier(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Melee => self.attributes.strength_mod(),
            AttackKind::Ranged => self.attributes.agility_mod(),
        }
    }

    /// Flat damage bonus: Strength-derived, melee only.
    pub fn damage_bonus(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Melee => self.attributes.strength_mod(),
            AttackKind::Ranged => 0,
        }
    }

    /// Defense-roll modifier: Agility plus evasion plus Vigilance skills.
    pub fn defense_modifier(&self) -> i32 {
        let vigilance: i32 = self
            .skills
            .iter()
            .map(|skill| match skill {
                SkillDefinition::Vigilance(bonus) => *bonus,
                _ => 0,
            })
            .sum();
        self.attributes.agility_mod() + self.evasion + vigilance
    }

    /// Health regained at the start of the actor's turn (Regeneration skills).
    pub fn regeneration(&self) -> i32 {
        self.skills
            .iter()
            .map(|skill| match skill {
                SkillDefinition::Regeneration(amount) => *amount,
                _ => 0,
            })
            .sum()
    }

    pub fn effective_speed(&self) -> i32 {
        self.speed.max(1)
    }

    /// Longest reach among this combatant's attacks; 0 when it has none.
    pub fn best_attack_range(&self) -> i32 {
        self.attacks.iter().map(|a| a.range).max().unwrap_or(0)
    }

    /// First attack (in definition order, which is preference order) that can
    /// reach a target `distance` tiles away.
    pub fn attack_in_range(&self, distance: i32) -> Option<&AttackDefinition> {
        self.attacks.iter().find(|a| a.range >= distance)
    }

    /// Lower health by `amount`, flooring at zero. Zero health is death.
    pub fn apply_damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    /// Raise health by `amount`, capped at max. Dead combatants stay dead.
    pub fn heal(&mut self, amount: i32) {
        if self.is_alive() {
            self.health = (self.health + amount.max(0)).min(self.max_health);
        }
    }
}
