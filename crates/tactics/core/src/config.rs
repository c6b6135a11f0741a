/// Simulation configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Hard cap on actions an AI unit may take in one turn. Guards against
    /// state that never reads as exhausted.
    pub max_ai_actions_per_turn: u32,

    /// Fixed damage dealt to a unit that another body is pushed into.
    pub push_collision_damage: u32,

    /// Seed for the deterministic RNG (AI random target priority).
    pub game_seed: u64,
}

impl SimConfig {
    // ===== compile-time constants =====
    /// A* cost of one straight step before terrain multipliers.
    pub const MOVE_STRAIGHT_COST: u32 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_AI_ACTIONS_PER_TURN: u32 = 10;
    pub const DEFAULT_PUSH_COLLISION_DAMAGE: u32 = 1;

    pub fn new() -> Self {
        Self {
            max_ai_actions_per_turn: Self::DEFAULT_MAX_AI_ACTIONS_PER_TURN,
            push_collision_damage: Self::DEFAULT_PUSH_COLLISION_DAMAGE,
            game_seed: 0,
        }
    }

    pub fn with_seed(game_seed: u64) -> Self {
        Self {
            game_seed,
            ..Self::new()
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
