//! Tunable game parameters
//!
//! The simulation core consumes these read-only. A host resolves one
//! `Config` per run (device scaling, JSON overrides, A/B tuning) and
//! hands it in at construction; nothing in `sim` mutates it.

use serde::{Deserialize, Serialize};

/// Immutable bundle of every tunable numeric parameter.
///
/// Deserializes with per-field defaults, so a host config file only
/// needs to name the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Movement ===
    /// Initial horizontal speed (units/s)
    pub base_speed: f32,
    /// Continuous speed increase per second survived
    pub speed_ramp_per_second: f32,
    /// Horizontal speed cap
    pub max_speed: f32,
    /// Gravity strength (units/s², y points down)
    pub gravity_y: f32,

    // === Grapple ===
    /// Max straight-line distance at which a hook can be grabbed
    pub max_grapple_distance: f32,
    /// A hook must be at least this far ahead of the actor
    pub min_forward_distance: f32,
    pub min_rope_length: f32,
    pub max_rope_length: f32,
    /// Per-tick swing damping (closer to 1 = less energy loss)
    pub rope_damping: f32,
    /// Velocity multiplier applied when the rope is released
    pub swing_boost_on_release: f32,

    // === Level generation ===
    /// Spawn segments this far ahead of the reference position
    pub spawn_ahead_distance: f32,
    /// Retire segments this far behind the reference position
    pub despawn_behind_distance: f32,
    pub platform_min_length: f32,
    pub platform_max_length: f32,
    /// Gap range between consecutive segments, before difficulty scaling
    pub gap_min: f32,
    pub gap_max: f32,
    /// Hook height range above the segment surface
    pub hook_height_min: f32,
    pub hook_height_max: f32,
    pub hooks_per_platform_min: u32,
    pub hooks_per_platform_max: u32,

    // === Difficulty ramp ===
    /// Game-time ms between difficulty increases
    pub difficulty_ramp_interval_ms: f32,
    /// Gap widening per difficulty level
    pub gap_increase_per_ramp: f32,
    /// One-off speed bump per difficulty level
    pub speed_increase_per_ramp: f32,
    pub spike_chance_start: f32,
    pub spike_chance_max: f32,
    pub spike_chance_increase_per_ramp: f32,

    // === Collectibles & scoring ===
    /// Points per scroll
    pub scroll_value: f32,
    /// Points per unit of distance traveled
    pub distance_score_multiplier: f32,
    /// Chance to spawn a scroll per segment
    pub scroll_spawn_chance: f32,

    // === Bounds ===
    /// Falling below this y ends the run
    pub kill_y: f32,
    /// Base level the platform random walk is anchored to
    pub ground_y: f32,
    /// Vertical drift bound of the platform random walk
    pub platform_y_variation: f32,

    // === Actor ===
    pub player_radius: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_speed: 140.0,
            speed_ramp_per_second: 1.5,
            max_speed: 380.0,
            gravity_y: 1000.0,

            max_grapple_distance: 380.0,
            min_forward_distance: 25.0,
            min_rope_length: 50.0,
            max_rope_length: 300.0,
            rope_damping: 0.997,
            swing_boost_on_release: 1.2,

            spawn_ahead_distance: 1100.0,
            despawn_behind_distance: 600.0,
            platform_min_length: 180.0,
            platform_max_length: 350.0,
            gap_min: 140.0,
            gap_max: 260.0,
            hook_height_min: 110.0,
            hook_height_max: 220.0,
            hooks_per_platform_min: 2,
            hooks_per_platform_max: 3,

            difficulty_ramp_interval_ms: 15_000.0,
            gap_increase_per_ramp: 20.0,
            speed_increase_per_ramp: 12.0,
            spike_chance_start: 0.1,
            spike_chance_max: 0.4,
            spike_chance_increase_per_ramp: 0.04,

            scroll_value: 100.0,
            distance_score_multiplier: 0.1,
            scroll_spawn_chance: 0.7,

            kill_y: 800.0,
            ground_y: 480.0,
            platform_y_variation: 50.0,

            player_radius: 18.0,
        }
    }
}

impl Config {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
