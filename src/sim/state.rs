//! Run state machine and scoring
//!
//! Two phases: `Playing` and `GameOver`. Score is recomputed from
//! distance and scroll count every tick rather than accumulated, so it
//! stays a pure function of those two inputs.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::persistence::ScoreStore;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Playing,
    /// Run ended; only `reset` leaves this phase
    GameOver,
}

/// Per-run progress plus the process-wide best score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub score: u64,
    /// Survives resets; persisted through the score store on game over
    pub best_score: u64,
    pub scrolls_collected: u32,
    pub distance_traveled: f32,
    /// Ramped horizontal baseline; never decreases within a run
    pub current_speed: f32,
    /// Survival-time tier; modulates gap size and spike chance
    pub difficulty_level: u32,
    pub game_time_ms: f32,
}

impl RunState {
    pub fn new(cfg: &Config, best_score: u64) -> Self {
        Self {
            phase: RunPhase::Playing,
            score: 0,
            best_score,
            scrolls_collected: 0,
            distance_traveled: 0.0,
            current_speed: cfg.base_speed,
            difficulty_level: 0,
            game_time_ms: 0.0,
        }
    }

    /// Begin a fresh run. The best score carries over.
    pub fn reset(&mut self, cfg: &Config) {
        let best_score = self.best_score;
        *self = Self::new(cfg, best_score);
    }

    /// Advance scoring, speed and difficulty. No-op unless `Playing`.
    pub fn update(&mut self, delta_ms: f32, actor_x: f32, start_x: f32, cfg: &Config) {
        if self.phase != RunPhase::Playing {
            return;
        }

        self.game_time_ms += delta_ms;
        self.distance_traveled = (actor_x - start_x).max(0.0);

        self.score = (self.distance_traveled * cfg.distance_score_multiplier
            + self.scrolls_collected as f32 * cfg.scroll_value)
            .floor() as u64;

        // Continuous ramp toward the cap
        self.current_speed = (self.current_speed
            + delta_ms / 1000.0 * cfg.speed_ramp_per_second)
            .min(cfg.max_speed);

        // Stepped ramp: one extra speed bump per difficulty interval
        let new_level = (self.game_time_ms / cfg.difficulty_ramp_interval_ms) as u32;
        if new_level > self.difficulty_level {
            self.difficulty_level = new_level;
            self.current_speed =
                (self.current_speed + cfg.speed_increase_per_ramp).min(cfg.max_speed);
            log::info!(
                "Difficulty level {} (speed {:.0})",
                self.difficulty_level,
                self.current_speed
            );
        }
    }

    pub fn collect_scroll(&mut self) {
        self.scrolls_collected += 1;
    }

    /// End the run. Persists the best score only on a strict improvement.
    pub fn trigger_game_over(&mut self, store: &mut dyn ScoreStore) {
        if self.phase == RunPhase::GameOver {
            return;
        }
        self.phase = RunPhase::GameOver;
        if self.score > self.best_score {
            self.best_score = self.score;
            store.save(self.best_score);
        }
    }

    /// Display condition for the "new best" banner. Deliberately `>=`
    /// while the persisted update above is strict `>`: a tie shows as a
    /// new best but does not trigger a save.
    pub fn is_new_best(&self) -> bool {
        self.score >= self.best_score
    }

    /// Spike probability at the current difficulty level.
    pub fn spike_chance(&self, cfg: &Config) -> f32 {
        (cfg.spike_chance_start
            + self.difficulty_level as f32 * cfg.spike_chance_increase_per_ramp)
            .min(cfg.spike_chance_max)
    }

    /// Inter-segment gap range at the current difficulty level.
    pub fn gap_range(&self, cfg: &Config) -> (f32, f32) {
        let increase = self.difficulty_level as f32 * cfg.gap_increase_per_ramp;
        (cfg.gap_min + increase * 0.5, cfg.gap_max + increase)
    }
}
