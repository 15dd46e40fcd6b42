//! Per-tick orchestration
//!
//! `tick` advances one fixed timestep, wiring the subsystems in a fixed
//! order: run-state update, free-fall forces, attach attempt, rope
//! step, integration, platform/scroll/spike resolution, then the level
//! streaming update. The order is part of the contract — collisions
//! run after integration, death after pickups, the difficulty update
//! before any spawn-chance read in the same tick.

use glam::Vec2;

use super::level::LevelGen;
use super::rope::RopePhysics;
use super::state::{RunPhase, RunState};
use crate::config::Config;
use crate::persistence::ScoreStore;

/// Where the actor starts a run.
pub const START_X: f32 = 200.0;
/// Spawn height above the ground line.
const SPAWN_HEIGHT: f32 = 50.0;

/// Input sample for a single tick. Pointer events are edge signals
/// sampled at tick boundaries; "hold" is a plain boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer is currently down
    pub held: bool,
    /// Pointer was released since the last tick
    pub released: bool,
}

/// The swinging actor.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Player {
    fn spawn(cfg: &Config) -> Self {
        Self {
            pos: Vec2::new(START_X, cfg.ground_y - SPAWN_HEIGHT),
            vel: Vec2::new(cfg.base_speed, 0.0),
        }
    }
}

/// One complete run: explicitly constructed state, no globals. The
/// score store is an injected port so tests run without storage stubs.
pub struct Game {
    pub config: Config,
    pub run: RunState,
    pub rope: RopePhysics,
    pub level: LevelGen,
    pub player: Player,
    store: Box<dyn ScoreStore>,
    start_x: f32,
}

impl Game {
    pub fn new(config: Config, seed: u64, mut store: Box<dyn ScoreStore>) -> Self {
        let best = store.load();
        let run = RunState::new(&config, best);
        let mut rope = RopePhysics::new();
        let mut level = LevelGen::new(&config, seed);
        let player = Player::spawn(&config);
        level.spawn_initial(START_X, &config, &run, &mut rope);

        Self {
            config,
            run,
            rope,
            level,
            player,
            store,
            start_x: START_X,
        }
    }

    /// Begin a fresh run. The best score carries over; terrain, rope
    /// and actor are rebuilt from the new seed.
    pub fn reset(&mut self, seed: u64) {
        self.run.reset(&self.config);
        self.rope = RopePhysics::new();
        self.level = LevelGen::new(&self.config, seed);
        self.player = Player::spawn(&self.config);
        self.level
            .spawn_initial(self.start_x, &self.config, &self.run, &mut self.rope);
    }

    pub fn start_x(&self) -> f32 {
        self.start_x
    }
}

/// Advance the game by one tick of `dt` seconds.
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    let Game {
        config: cfg,
        run,
        rope,
        level,
        player,
        store,
        start_x,
    } = game;

    // Release is an edge: boost the swing, then let go
    if run.phase == RunPhase::Playing && input.released && rope.is_attached() {
        player.vel *= cfg.swing_boost_on_release;
        rope.detach();
    }

    run.update(dt * 1000.0, player.pos.x, *start_x, cfg);
    if run.phase != RunPhase::Playing {
        return;
    }

    // Free fall: gravity plus the ramped forward-speed floor. While
    // attached the rope applies its own, tangential-only gravity.
    if !rope.is_attached() {
        player.vel.y += cfg.gravity_y * dt;
        player.vel.x = player.vel.x.max(run.current_speed);
    }

    if input.held && !rope.is_attached() {
        rope.try_attach(player.pos, cfg);
    }

    let step = rope.update(player.pos, player.vel, dt, cfg);
    player.vel = step.velocity;
    player.pos += step.correction;

    player.pos += player.vel * dt;

    // Land only while falling
    if player.vel.y > 0.0 {
        if let Some(top) = level.check_platform_collision(player.pos.x, player.pos.y, cfg.player_radius)
        {
            player.pos.y = top - cfg.player_radius;
            player.vel.y = 0.0;
        }
    }

    for _ in 0..level.check_scroll_collisions(player.pos) {
        run.collect_scroll();
    }

    if level.check_spike_collisions(player.pos) || player.pos.y > cfg.kill_y {
        log::info!(
            "Run over: distance {:.0}, score {}, {} scrolls",
            run.distance_traveled,
            run.score,
            run.scrolls_collected
        );
        run.trigger_game_over(store.as_mut());
        rope.detach();
        player.vel = Vec2::ZERO;
        return;
    }

    level.update(player.pos.x, cfg, run, rope);
}
