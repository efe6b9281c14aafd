//! The built-in bestiary. Each entry is a template; [CreatureDefinition::spawn]
//! stamps out a live combatant for one team.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::combat::{
    AttackDefinition, AttackKind, Attributes, Combatant, DamageType, DiceExpr, SkillDefinition,
    Team,
};
use crate::data::{normalize_lookup, LookupError};
use crate::path::Cell;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureDefinition {
    pub id: String,
    pub name: String,
    /// Rough difficulty rank for catalog listings and matchup sanity checks.
    pub threat: u32,
    pub attributes: Attributes,
    pub max_health: i32,
    pub max_willpower: i32,
    pub armor: i32,
    pub evasion: i32,
    pub speed: i32,
    pub attacks: Vec<AttackDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub immunities: BTreeSet<DamageType>,
    pub resistances: BTreeSet<DamageType>,
    pub vulnerabilities: BTreeSet<DamageType>,
}

impl CreatureDefinition {
    pub fn spawn(&self, team: Team) -> Combatant {
        Combatant {
            id: self.id.clone(),
            name: self.name.clone(),
            team,
            attributes: self.attributes,
            max_health: self.max_health,
            max_willpower: self.max_willpower,
            armor: self.armor,
            evasion: self.evasion,
            speed: self.speed,
            health: self.max_health,
            willpower: self.max_willpower,
            position: Cell::new(0, 0),
            attacks: self.attacks.clone(),
            skills: self.skills.clone(),
            immunities: self.immunities.clone(),
            resistances: self.resistances.clone(),
            vulnerabilities: self.vulnerabilities.clone(),
        }
    }
}

struct CreatureSpec {
    id: &'static str,
    name: &'static str,
    threat: u32,
    attributes: (i32, i32, i32, i32),
    max_health: i32,
    max_willpower: i32,
    armor: i32,
    evasion: i32,
    speed: i32,
    attacks: &'static [(&'static str, (u32, u32, i32), DamageType, AttackKind, i32)],
    skills: &'static [SkillDefinition],
    immunities: &'static [DamageType],
    resistances: &'static [DamageType],
    vulnerabilities: &'static [DamageType],
}

const CREATURES: &[CreatureSpec] = &[
    CreatureSpec {
        id: "giant_rat",
        name: "giant rat",
        threat: 1,
        attributes: (6, 12, 8, 4),
        max_health: 6,
        max_willpower: 4,
        armor: 0,
        evasion: 1,
        speed: 14,
        attacks: &[("bite", (1, 4, 0), DamageType::Physical, AttackKind::Melee, 1)],
        skills: &[],
        immunities: &[],
        resistances: &[],
        vulnerabilities: &[],
    },
    CreatureSpec {
        id: "goblin",
        name: "goblin",
        threat: 2,
        attributes: (8, 12, 8, 6),
        max_health: 8,
        max_willpower: 6,
        armor: 1,
        evasion: 1,
        speed: 12,
        attacks: &[("rusty blade", (1, 6, 0), DamageType::Physical, AttackKind::Melee, 1)],
        skills: &[],
        immunities: &[],
        resistances: &[],
        vulnerabilities: &[],
    },
    CreatureSpec {
        id: "goblin_archer",
        name: "goblin archer",
        threat: 2,
        attributes: (6, 14, 8, 6),
        max_health: 7,
        max_willpower: 6,
        armor: 0,
        evasion: 1,
        speed: 12,
        attacks: &[
            ("shortbow", (1, 6, 0), DamageType::Physical, AttackKind::Ranged, 6),
            ("knife", (1, 4, 0), DamageType::Physical, AttackKind::Melee, 1),
        ],
        skills: &[],
        immunities: &[],
        resistances: &[],
        vulnerabilities: &[],
    },
    CreatureSpec {
        id: "wolf",
        name: "wolf",
        threat: 3,
        attributes: (12, 14, 10, 6),
        max_health: 12,
        max_willpower: 6,
        armor: 0,
        evasion: 2,
        speed: 16,
        attacks: &[("bite", (1, 6, 1), DamageType::Physical, AttackKind::Melee, 1)],
        skills: &[],
        immunities: &[],
        resistances: &[],
        vulnerabilities: &[],
    },
    CreatureSpec {
        id: "skeleton",
        name: "skeleton",
        threat: 3,
        attributes: (10, 8, 10, 4),
        max_health: 13,
        max_willpower: 4,
        armor: 2,
        evasion: 0,
        speed: 8,
        attacks: &[("claw", (1, 6, 0), DamageType::Physical, AttackKind::Melee, 1)],
        skills: &[],
        immunities: &[DamageType::Poison],
        resistances: &[DamageType::Cold],
        vulnerabilities: &[],
    },
    CreatureSpec {
        id: "acolyte",
        name: "acolyte",
        threat: 3,
        attributes: (8, 10, 8, 14),
        max_health: 10,
        max_willpower: 14,
        armor: 0,
        evasion: 0,
        speed: 10,
        attacks: &[
            ("arcane bolt", (1, 8, 0), DamageType::Arcane, AttackKind::Ranged, 5),
            ("staff", (1, 4, 0), DamageType::Physical, AttackKind::Melee, 1),
        ],
        skills: &[],
        immunities: &[],
        resistances: &[DamageType::Arcane],
        vulnerabilities: &[],
    },
    CreatureSpec {
        id: "orc",
        name: "orc",
        threat: 4,
        attributes: (14, 10, 12, 8),
        max_health: 16,
        max_willpower: 8,
        armor: 2,
        evasion: 0,
        speed: 10,
        attacks: &[("war axe", (1, 8, 1), DamageType::Physical, AttackKind::Melee, 1)],
        skills: &[],
        immunities: &[],
        resistances: &[],
        vulnerabilities: &[],
    },
    CreatureSpec {
        id: "fire_imp",
        name: "fire imp",
        threat: 4,
        attributes: (6, 14, 8, 10),
        max_health: 9,
        max_willpower: 10,
        armor: 0,
        evasion: 2,
        speed: 14,
        attacks: &[
            ("firebolt", (1, 6, 1), DamageType::Fire, AttackKind::Ranged, 4),
            ("scratch", (1, 3, 0), DamageType::Physical, AttackKind::Melee, 1),
        ],
        skills: &[],
        immunities: &[DamageType::Fire],
        resistances: &[],
        vulnerabilities: &[DamageType::Cold],
    },
    CreatureSpec {
        id: "troll",
        name: "troll",
        threat: 6,
        attributes: (16, 8, 16, 6),
        max_health: 30,
        max_willpower: 6,
        armor: 1,
        evasion: 0,
        speed: 8,
        attacks: &[("claw", (1, 8, 2), DamageType::Physical, AttackKind::Melee, 1)],
        skills: &[SkillDefinition::Regeneration(3)],
        immunities: &[],
        resistances: &[],
        vulnerabilities: &[DamageType::Fire],
    },
    CreatureSpec {
        id: "orc_warlord",
        name: "orc warlord",
        threat: 7,
        attributes: (16, 10, 14, 12),
        max_health: 26,
        max_willpower: 12,
        armor: 4,
        evasion: 0,
        speed: 9,
        attacks: &[("greataxe", (1, 12, 2), DamageType::Physical, AttackKind::Melee, 1)],
        skills: &[SkillDefinition::Vigilance(1)],
        immunities: &[],
        resistances: &[],
        vulnerabilities: &[],
    },
];

fn build(spec: &CreatureSpec) -> CreatureDefinition {
    let (strength, agility, endurance, will) = spec.attributes;
    CreatureDefinition {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        threat: spec.threat,
        attributes: Attributes::new(strength, agility, endurance, will),
        max_health: spec.max_health,
        max_willpower: spec.max_willpower,
        armor: spec.armor,
        evasion: spec.evasion,
        speed: spec.speed,
        attacks: spec
            .attacks
            .iter()
            .map(|&(name, (count, sides, modifier), damage_type, kind, range)| AttackDefinition {
                name: name.to_string(),
                damage: DiceExpr::new(count, sides, modifier),
                damage_type,
                kind,
                range,
            })
            .collect(),
        skills: spec.skills.to_vec(),
        immunities: spec.immunities.iter().copied().collect(),
        resistances: spec.resistances.iter().copied().collect(),
        vulnerabilities: spec.vulnerabilities.iter().copied().collect(),
    }
}

/// Every built-in creature, ordered by threat then id.
pub fn bestiary() -> Vec<CreatureDefinition> {
    let mut all: Vec<CreatureDefinition> = CREATURES.iter().map(build).collect();
    all.sort_by(|a, b| a.threat.cmp(&b.threat).then_with(|| a.id.cmp(&b.id)));
    all
}

/// Resolve a creature by id or display name, tolerant of case and separators.
pub fn resolve_creature(name_or_id: &str) -> Result<CreatureDefinition, LookupError> {
    let normalized = normalize_lookup(name_or_id);
    CREATURES
        .iter()
        .find(|spec| {
            normalize_lookup(spec.id) == normalized || normalize_lookup(spec.name) == normalized
        })
        .map(build)
        .ok_or_else(|| LookupError::CreatureNotFound(name_or_id.to_string()))
}
