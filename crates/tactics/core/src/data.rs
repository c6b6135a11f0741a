//! Designer-authored data consumed by the simulation.
//!
//! Everything here is a read-only input: stat caps, tile classes, attack and
//! ability definitions, AI profiles. Collaborators construct these values
//! (however they persist them) and hand them to [`crate::sim::Simulation`]
//! at init time; the core never mutates them.

use crate::targeting::TargetingShape;

/// Index into the tile set owned by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileTypeId(pub u16);

impl TileTypeId {
    /// The tile every cell starts with; the tile set must define it.
    pub const DEFAULT: Self = Self(0);
}

bitflags::bitflags! {
    /// What a static object blocks while it stands on a cell.
    ///
    /// Serde support comes from the `bitflags/serde` feature, enabled by
    /// this crate's `serde` feature.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BlockMask: u8 {
        const MOVEMENT = 1 << 0;
        const PROJECTILES = 1 << 1;
    }
}

impl Default for BlockMask {
    fn default() -> Self {
        BlockMask::MOVEMENT | BlockMask::PROJECTILES
    }
}

/// Terrain class for a cell: movement rules, hazard damage, combat modifiers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileType {
    pub name: String,
    /// Movement cost multiplier. 1.0 = normal, 2.0 = double cost.
    pub movement_cost_multiplier: f32,
    /// Blocks movement entirely, regardless of the cell's walkable flag.
    pub blocks_movement: bool,
    /// Damage dealt to a unit when it enters this tile.
    pub damage_on_enter: u32,
    /// Damage dealt at the start of each turn a unit spends standing here.
    pub damage_per_turn: u32,
    pub dodge_bonus: i32,
    pub defense_bonus: i32,
    pub attack_bonus: i32,
    pub provides_cover: bool,
    /// Percentage damage reduction granted by cover.
    pub cover_damage_reduction: u32,
}

impl TileType {
    /// Plain walkable floor with no modifiers.
    pub fn normal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            movement_cost_multiplier: 1.0,
            blocks_movement: false,
            damage_on_enter: 0,
            damage_per_turn: 0,
            dodge_bonus: 0,
            defense_bonus: 0,
            attack_bonus: 0,
            provides_cover: false,
            cover_damage_reduction: 50,
        }
    }

    /// Impassable terrain (walls, chasms).
    pub fn blocking(name: impl Into<String>) -> Self {
        Self {
            blocks_movement: true,
            ..Self::normal(name)
        }
    }

    pub fn with_movement_cost(mut self, multiplier: f32) -> Self {
        self.movement_cost_multiplier = multiplier;
        self
    }

    pub fn with_enter_damage(mut self, damage: u32) -> Self {
        self.damage_on_enter = damage;
        self
    }

    pub fn with_standing_damage(mut self, damage: u32) -> Self {
        self.damage_per_turn = damage;
        self
    }
}

/// Combat modifiers a unit gains from the tile it stands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileCombatModifiers {
    pub dodge_bonus: i32,
    pub defense_bonus: i32,
    pub attack_bonus: i32,
    pub has_cover: bool,
    pub cover_damage_reduction: u32,
}

impl From<&TileType> for TileCombatModifiers {
    fn from(tile: &TileType) -> Self {
        Self {
            dodge_bonus: tile.dodge_bonus,
            defense_bonus: tile.defense_bonus,
            attack_bonus: tile.attack_bonus,
            has_cover: tile.provides_cover,
            cover_damage_reduction: tile.cover_damage_reduction,
        }
    }
}

/// Definition of one attack a unit can perform.
///
/// Attacks either consume an attack charge or, when `costs_attack_charge`
/// is false, spend mana like an ability while keeping attack targeting.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackSpec {
    pub name: String,
    pub shape: TargetingShape,
    pub range: u32,
    pub min_range: u32,
    pub aoe_radius: u32,
    pub base_damage: u32,
    /// When true, the attacker's own damage stat replaces `base_damage`.
    pub use_unit_attack_damage: bool,
    pub costs_attack_charge: bool,
    pub mana_cost: u32,
}

impl AttackSpec {
    /// Single-target melee strike using the unit's damage stat.
    pub fn basic(name: impl Into<String>, range: u32) -> Self {
        Self {
            name: name.into(),
            shape: TargetingShape::SingleTarget,
            range,
            min_range: 0,
            aoe_radius: 0,
            base_damage: 1,
            use_unit_attack_damage: true,
            costs_attack_charge: true,
            mana_cost: 0,
        }
    }

    pub fn with_shape(mut self, shape: TargetingShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_min_range(mut self, min_range: u32) -> Self {
        self.min_range = min_range;
        self
    }

    pub fn with_aoe_radius(mut self, aoe_radius: u32) -> Self {
        self.aoe_radius = aoe_radius;
        self
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.base_damage = damage;
        self.use_unit_attack_damage = false;
        self
    }

    /// Converts the attack into a mana-costed one (no attack charge).
    pub fn with_mana_cost(mut self, mana_cost: u32) -> Self {
        self.costs_attack_charge = false;
        self.mana_cost = mana_cost;
        self
    }
}

/// Definition of one castable ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySpec {
    pub name: String,
    pub mana_cost: u32,
    pub range: u32,
    pub damage: u32,
    pub shape: TargetingShape,
    pub aoe_radius: u32,
}

impl AbilitySpec {
    pub fn new(name: impl Into<String>, mana_cost: u32, range: u32, damage: u32) -> Self {
        Self {
            name: name.into(),
            mana_cost,
            range,
            damage,
            shape: TargetingShape::SingleTarget,
            aoe_radius: 0,
        }
    }

    pub fn with_shape(mut self, shape: TargetingShape, aoe_radius: u32) -> Self {
        self.shape = shape;
        self.aoe_radius = aoe_radius;
        self
    }
}

/// How an AI unit ranks enemy candidates when picking a target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetPriority {
    #[default]
    Closest,
    HighestDamage,
    LowestHp,
    StatusCondition,
    Random,
}

/// AI tuning for a unit template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiProfile {
    pub priority: TargetPriority,
}

impl AiProfile {
    pub fn new(priority: TargetPriority) -> Self {
        Self { priority }
    }
}

/// Stat caps and action lists for a class of unit.
///
/// Cloned into each spawned unit; the simulation treats the copy as
/// immutable designer data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub name: String,
    pub max_hp: u32,
    pub max_mana: u32,
    pub speed: u32,
    pub move_range: u32,
    pub attack_damage: u32,
    pub attack_range: u32,
    pub turns_per_round: u32,
    pub attacks_per_turn: u32,
    pub moves_per_turn: u32,
    /// Ghosts can possess enemy bodies instead of fighting.
    pub is_ghost: bool,
    pub possess_range: u32,
    pub attacks: Vec<AttackSpec>,
    pub abilities: Vec<AbilitySpec>,
    pub ai: Option<AiProfile>,
}

impl UnitTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_hp: 10,
            max_mana: 5,
            speed: 10,
            move_range: 4,
            attack_damage: 2,
            attack_range: 1,
            turns_per_round: 1,
            attacks_per_turn: 1,
            moves_per_turn: 1,
            is_ghost: false,
            possess_range: 2,
            attacks: Vec::new(),
            abilities: Vec::new(),
            ai: None,
        }
    }

    pub fn with_stats(mut self, max_hp: u32, max_mana: u32, speed: u32) -> Self {
        self.max_hp = max_hp;
        self.max_mana = max_mana;
        self.speed = speed;
        self
    }

    pub fn with_combat(mut self, attack_damage: u32, attack_range: u32) -> Self {
        self.attack_damage = attack_damage;
        self.attack_range = attack_range;
        self
    }

    pub fn with_move_range(mut self, move_range: u32) -> Self {
        self.move_range = move_range;
        self
    }

    pub fn with_turns(
        mut self,
        turns_per_round: u32,
        moves_per_turn: u32,
        attacks_per_turn: u32,
    ) -> Self {
        self.turns_per_round = turns_per_round;
        self.moves_per_turn = moves_per_turn;
        self.attacks_per_turn = attacks_per_turn;
        self
    }

    pub fn with_attack(mut self, attack: AttackSpec) -> Self {
        self.attacks.push(attack);
        self
    }

    pub fn with_ability(mut self, ability: AbilitySpec) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn with_ai(mut self, profile: AiProfile) -> Self {
        self.ai = Some(profile);
        self
    }

    pub fn ghost(mut self) -> Self {
        self.is_ghost = true;
        self
    }
}

/// Definition of a static object placed at level load.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticObjectSpec {
    pub name: String,
    /// Objects without HP are indestructible.
    pub max_hp: Option<u32>,
    pub pushable: bool,
    pub blocks: BlockMask,
}

impl StaticObjectSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_hp: None,
            pushable: false,
            blocks: BlockMask::default(),
        }
    }

    pub fn with_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = Some(max_hp);
        self
    }

    pub fn pushable(mut self) -> Self {
        self.pushable = true;
        self
    }

    pub fn with_blocks(mut self, blocks: BlockMask) -> Self {
        self.blocks = blocks;
        self
    }
}
