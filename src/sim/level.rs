//! Streaming level generation
//!
//! Segments spawn ahead of the play position and retire behind it, so
//! live memory stays bounded no matter how far a run goes. Generation
//! is seeded: a given seed always produces the same terrain.
//!
//! Crossability invariant: every gap wider than `GAP_HOOK_THRESHOLD`
//! gets a hook over its midpoint, above the tallest normal hook, so the
//! level is always traversable by grapple alone.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rope::{Hook, RopePhysics};
use super::state::RunState;
use crate::config::Config;

/// Pickup radius around a scroll
const SCROLL_PICKUP_RADIUS: f32 = 35.0;
/// Kill radius around a spike's tip
const SPIKE_KILL_RADIUS: f32 = 25.0;
/// The spike anchor sits just above the surface; the tip is higher still
const SPIKE_TIP_OFFSET: f32 = 12.0;
/// Spikes keep this much clearance from segment edges
const SPIKE_EDGE_MARGIN: f32 = 30.0;
/// Thin landing band below a segment top
const LANDING_BAND: f32 = 20.0;
/// Gaps wider than this get a guaranteed crossing hook
const GAP_HOOK_THRESHOLD: f32 = 80.0;
/// Extra height of a gap hook above the tallest normal hook
const GAP_HOOK_RAISE: f32 = 30.0;
/// Scroll offset range around its reference hook
const SCROLL_X_SPREAD: f32 = 50.0;
const SCROLL_Y_MIN: f32 = 30.0;
const SCROLL_Y_MAX: f32 = 80.0;
/// Width of the safe starting segment
const STARTING_SEGMENT_WIDTH: f32 = 300.0;
/// Normal segments spawned after the starting one
const INITIAL_SEGMENTS: usize = 5;

/// A collectible placed near a hook's swing arc.
#[derive(Debug, Clone)]
pub struct Scroll {
    pub pos: Vec2,
    pub collected: bool,
}

/// A surface hazard. Touching it ends the run.
#[derive(Debug, Clone, Copy)]
pub struct Spike {
    pub pos: Vec2,
}

impl Spike {
    /// The dangerous point, above the anchor.
    pub fn tip(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, SPIKE_TIP_OFFSET)
    }
}

/// A contiguous platform span the actor can stand on.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Leading edge
    pub x: f32,
    pub width: f32,
    /// Surface height (y points down; smaller is higher)
    pub top: f32,
    pub hooks: Vec<Hook>,
    pub scrolls: Vec<Scroll>,
    pub spikes: Vec<Spike>,
}

impl Segment {
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }
}

/// Streaming procedural generator. Owns the live segment window and all
/// entities embedded in it; hooks are mirrored into the rope registry
/// for the lifetime of their segment.
pub struct LevelGen {
    segments: VecDeque<Segment>,
    rightmost_edge: f32,
    /// Random-walk state for segment surface height
    platform_y: f32,
    next_id: u32,
    rng: Pcg32,
}

impl LevelGen {
    pub fn new(cfg: &Config, seed: u64) -> Self {
        Self {
            segments: VecDeque::new(),
            rightmost_edge: 0.0,
            platform_y: cfg.ground_y,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// One long safe starting segment under the actor (no gap before
    /// it, forced width), then a handful of normal ones.
    pub fn spawn_initial(
        &mut self,
        start_x: f32,
        cfg: &Config,
        run: &RunState,
        rope: &mut RopePhysics,
    ) {
        self.rightmost_edge = start_x - 100.0;
        self.spawn_segment(Some(STARTING_SEGMENT_WIDTH), false, cfg, run, rope);
        for _ in 0..INITIAL_SEGMENTS {
            self.spawn_segment(None, true, cfg, run, rope);
        }
    }

    /// Keep the streaming window filled around `reference_x`: spawn
    /// ahead until covered, retire segments that fell behind.
    pub fn update(
        &mut self,
        reference_x: f32,
        cfg: &Config,
        run: &RunState,
        rope: &mut RopePhysics,
    ) {
        while self.rightmost_edge < reference_x + cfg.spawn_ahead_distance {
            self.spawn_segment(None, true, cfg, run, rope);
        }

        let cutoff = reference_x - cfg.despawn_behind_distance;
        while self
            .segments
            .front()
            .is_some_and(|s| s.trailing_edge() < cutoff)
        {
            if let Some(retired) = self.segments.pop_front() {
                for hook in &retired.hooks {
                    rope.unregister_hook(hook.id);
                }
            }
        }
    }

    /// Core procedural step. Difficulty (gap range, spike chance) is
    /// read from the run state at spawn time, so a segment generated
    /// right after a ramp already uses the new values.
    pub fn spawn_segment(
        &mut self,
        forced_width: Option<f32>,
        add_gap: bool,
        cfg: &Config,
        run: &RunState,
        rope: &mut RopePhysics,
    ) {
        let mut gap = 0.0;
        if add_gap && !self.segments.is_empty() {
            let (gap_min, gap_max) = run.gap_range(cfg);
            gap = self.rng.random_range(gap_min..=gap_max);
        }

        let width = forced_width.unwrap_or_else(|| {
            self.rng
                .random_range(cfg.platform_min_length..=cfg.platform_max_length)
        });
        let x = self.rightmost_edge + gap;

        // Bounded random walk: gentle undulation, no unbounded drift.
        // The perturbation is biased downward-heavy (variation vs
        // variation/2) to match the clamp window around ground level.
        let drift = self
            .rng
            .random_range(-cfg.platform_y_variation..=cfg.platform_y_variation / 2.0);
        self.platform_y = (self.platform_y + drift).clamp(
            cfg.ground_y - cfg.platform_y_variation,
            cfg.ground_y + cfg.platform_y_variation / 2.0,
        );
        let top = self.platform_y;

        // Evenly spaced hooks at random heights above the surface
        let mut hooks = Vec::new();
        let hook_count = self
            .rng
            .random_range(cfg.hooks_per_platform_min..=cfg.hooks_per_platform_max);
        for i in 0..hook_count {
            let hook_x = x + width / (hook_count + 1) as f32 * (i + 1) as f32;
            let hook_y = top
                - self
                    .rng
                    .random_range(cfg.hook_height_min..=cfg.hook_height_max);
            let hook = Hook {
                id: self.next_hook_id(),
                pos: Vec2::new(hook_x, hook_y),
            };
            rope.register_hook(hook);
            hooks.push(hook);
        }

        // Wide gaps always get a crossing anchor over the midpoint
        if gap > GAP_HOOK_THRESHOLD && !self.segments.is_empty() {
            let hook = Hook {
                id: self.next_hook_id(),
                pos: Vec2::new(x - gap / 2.0, top - cfg.hook_height_max - GAP_HOOK_RAISE),
            };
            rope.register_hook(hook);
            hooks.push(hook);
        }

        // Maybe a scroll, dropped into a hook's swing arc
        let mut scrolls = Vec::new();
        if self.rng.random::<f32>() < cfg.scroll_spawn_chance && !hooks.is_empty() {
            let anchor = hooks[self.rng.random_range(0..hooks.len())].pos;
            let offset = Vec2::new(
                self.rng.random_range(-SCROLL_X_SPREAD..=SCROLL_X_SPREAD),
                self.rng.random_range(SCROLL_Y_MIN..=SCROLL_Y_MAX),
            );
            scrolls.push(Scroll {
                pos: anchor + offset,
                collected: false,
            });
        }

        // Maybe a spike, only once at least two segments exist
        let mut spikes = Vec::new();
        if self.segments.len() > 1
            && width > SPIKE_EDGE_MARGIN * 2.0
            && self.rng.random::<f32>() < run.spike_chance(cfg)
        {
            let spike_x = x
                + self
                    .rng
                    .random_range(SPIKE_EDGE_MARGIN..=(width - SPIKE_EDGE_MARGIN));
            spikes.push(Spike {
                pos: Vec2::new(spike_x, top - SPIKE_TIP_OFFSET),
            });
        }

        self.rightmost_edge = x + width;
        self.segments.push_back(Segment {
            x,
            width,
            top,
            hooks,
            scrolls,
            spikes,
        });
    }

    /// Landing query: the actor is over a segment (with `radius` of
    /// x slack) and its underside falls inside the thin band below the
    /// surface. The caller only applies the landing while falling.
    /// Returns the surface height on a hit.
    pub fn check_platform_collision(&self, x: f32, y: f32, radius: f32) -> Option<f32> {
        for seg in &self.segments {
            if x >= seg.x - radius && x <= seg.trailing_edge() + radius {
                let underside = y + radius;
                if underside >= seg.top && underside <= seg.top + LANDING_BAND {
                    return Some(seg.top);
                }
            }
        }
        None
    }

    /// Mark every uncollected scroll within pickup range as collected.
    /// Returns how many were picked up this call.
    pub fn check_scroll_collisions(&mut self, pos: Vec2) -> u32 {
        let mut collected = 0;
        for seg in &mut self.segments {
            for scroll in &mut seg.scrolls {
                if !scroll.collected && scroll.pos.distance(pos) < SCROLL_PICKUP_RADIUS {
                    scroll.collected = true;
                    collected += 1;
                }
            }
        }
        collected
    }

    /// Instant death on any spike tip within kill range.
    pub fn check_spike_collisions(&self, pos: Vec2) -> bool {
        self.segments
            .iter()
            .flat_map(|s| &s.spikes)
            .any(|spike| spike.tip().distance(pos) < SPIKE_KILL_RADIUS)
    }

    /// Live segments, oldest (leftmost) first.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn rightmost_edge(&self) -> f32 {
        self.rightmost_edge
    }

    fn next_hook_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[cfg(test)]
    pub(crate) fn segments_mut(&mut self) -> &mut VecDeque<Segment> {
        &mut self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup(seed: u64) -> (Config, RunState, RopePhysics, LevelGen) {
        let cfg = Config::default();
        let run = RunState::new(&cfg, 0);
        let rope = RopePhysics::new();
        let level = LevelGen::new(&cfg, seed);
        (cfg, run, rope, level)
    }

    #[test]
    fn test_initial_spawn_layout() {
        let (cfg, run, mut rope, mut level) = setup(42);
        level.spawn_initial(200.0, &cfg, &run, &mut rope);

        assert_eq!(level.segment_count(), 1 + INITIAL_SEGMENTS);

        let first = level.segments().next().unwrap();
        // Safe start: forced width, no gap, directly under the actor
        assert_eq!(first.width, STARTING_SEGMENT_WIDTH);
        assert_eq!(first.x, 100.0);
        assert!(first.spikes.is_empty());

        // Every segment's hooks are registered with the rope
        let total_hooks: usize = level.segments().map(|s| s.hooks.len()).sum();
        assert_eq!(rope.hooks().len(), total_hooks);
        assert!(total_hooks >= (1 + INITIAL_SEGMENTS) * cfg.hooks_per_platform_min as usize);
    }

    #[test]
    fn test_segments_are_ordered_and_gapped() {
        let (cfg, run, mut rope, mut level) = setup(7);
        level.spawn_initial(200.0, &cfg, &run, &mut rope);

        let segs: Vec<_> = level.segments().cloned().collect();
        for pair in segs.windows(2) {
            let gap = pair[1].x - pair[0].trailing_edge();
            assert!(gap >= cfg.gap_min && gap <= cfg.gap_max);
            // Surface stays inside the random-walk clamp window
            assert!(pair[1].top >= cfg.ground_y - cfg.platform_y_variation);
            assert!(pair[1].top <= cfg.ground_y + cfg.platform_y_variation / 2.0);
        }
    }

    #[test]
    fn test_wide_gaps_have_crossing_hooks() {
        // Many seeds, many segments: every gap wider than the threshold
        // must carry a hook strictly inside its horizontal span.
        for seed in 0..20u64 {
            let (cfg, mut run, mut rope, mut level) = setup(seed);
            run.difficulty_level = 4; // widen gaps well past the threshold
            level.spawn_initial(200.0, &cfg, &run, &mut rope);
            for _ in 0..50 {
                level.spawn_segment(None, true, &cfg, &run, &mut rope);
            }

            let segs: Vec<_> = level.segments().cloned().collect();
            for pair in segs.windows(2) {
                let gap_start = pair[0].trailing_edge();
                let gap_end = pair[1].x;
                if gap_end - gap_start > GAP_HOOK_THRESHOLD {
                    assert!(
                        pair[1]
                            .hooks
                            .iter()
                            .any(|h| h.pos.x > gap_start && h.pos.x < gap_end),
                        "seed {}: gap [{}, {}] has no crossing hook",
                        seed,
                        gap_start,
                        gap_end
                    );
                }
            }
        }
    }

    #[test]
    fn test_gap_hook_sits_above_normal_hooks() {
        let (cfg, run, mut rope, mut level) = setup(3);
        level.spawn_initial(200.0, &cfg, &run, &mut rope);

        for seg in level.segments().skip(1) {
            let gap_hook_y = seg.top - cfg.hook_height_max - GAP_HOOK_RAISE;
            for hook in &seg.hooks {
                assert!(hook.pos.y >= gap_hook_y);
            }
        }
    }

    #[test]
    fn test_streaming_window_stays_bounded() {
        let (cfg, run, mut rope, mut level) = setup(11);
        level.spawn_initial(200.0, &cfg, &run, &mut rope);

        let mut reference = 200.0;
        for _ in 0..2000 {
            reference += 120.0;
            level.update(reference, &cfg, &run, &mut rope);

            // Window ≈ despawn_behind + spawn_ahead; min pitch ≈
            // gap_min + platform_min_length. Generous slack on top.
            assert!(level.segment_count() <= 16);
            assert!(rope.hooks().len() <= 16 * (cfg.hooks_per_platform_max as usize + 1));

            // Everything retired is really gone
            if let Some(front) = level.segments().next() {
                assert!(front.trailing_edge() >= reference - cfg.despawn_behind_distance);
            }
            // And the window is filled ahead
            assert!(level.rightmost_edge() >= reference + cfg.spawn_ahead_distance);
        }
    }

    #[test]
    fn test_retiring_unregisters_hooks() {
        let (cfg, run, mut rope, mut level) = setup(5);
        level.spawn_initial(200.0, &cfg, &run, &mut rope);
        let doomed: Vec<u32> = level
            .segments()
            .next()
            .unwrap()
            .hooks
            .iter()
            .map(|h| h.id)
            .collect();

        // Jump the window far ahead; the starting segment retires
        level.update(5000.0, &cfg, &run, &mut rope);
        for id in doomed {
            assert!(!rope.hooks().iter().any(|h| h.id == id));
        }
    }

    #[test]
    fn test_determinism_per_seed() {
        let (cfg, run, mut rope_a, mut a) = setup(99);
        let (_, _, mut rope_b, mut b) = setup(99);
        a.spawn_initial(200.0, &cfg, &run, &mut rope_a);
        b.spawn_initial(200.0, &cfg, &run, &mut rope_b);

        for (sa, sb) in a.segments().zip(b.segments()) {
            assert_eq!(sa.x, sb.x);
            assert_eq!(sa.width, sb.width);
            assert_eq!(sa.top, sb.top);
            assert_eq!(sa.hooks.len(), sb.hooks.len());
            for (ha, hb) in sa.hooks.iter().zip(&sb.hooks) {
                assert_eq!(ha.pos, hb.pos);
            }
        }
    }

    #[test]
    fn test_platform_collision_band() {
        let (cfg, run, mut rope, mut level) = setup(1);
        level.spawn_initial(200.0, &cfg, &run, &mut rope);
        let (x, top) = {
            let first = level.segments().next().unwrap();
            (first.x + first.width / 2.0, first.top)
        };
        let r = cfg.player_radius;

        // Underside inside the band: hit, returns the surface height
        assert_eq!(level.check_platform_collision(x, top - r + 5.0, r), Some(top));
        // Well above the band: miss
        assert_eq!(level.check_platform_collision(x, top - r - 50.0, r), None);
        // Fallen through, below the band: miss
        assert_eq!(
            level.check_platform_collision(x, top - r + LANDING_BAND + 1.0, r),
            None
        );
        // Horizontal slack of one radius past the edge still hits
        let first_x = level.segments().next().unwrap().x;
        assert_eq!(
            level.check_platform_collision(first_x - r + 1.0, top - r + 5.0, r),
            Some(top)
        );
    }

    #[test]
    fn test_scroll_pickup_marks_and_counts() {
        let (cfg, run, mut rope, mut level) = setup(1);
        level.spawn_initial(200.0, &cfg, &run, &mut rope);

        // Plant two scrolls within one pickup radius of a point
        let at = Vec2::new(400.0, 250.0);
        if let Some(seg) = level.segments.front_mut() {
            seg.scrolls.clear();
            seg.scrolls.push(Scroll {
                pos: at + Vec2::new(10.0, 0.0),
                collected: false,
            });
            seg.scrolls.push(Scroll {
                pos: at - Vec2::new(0.0, 20.0),
                collected: false,
            });
        }

        assert_eq!(level.check_scroll_collisions(at), 2);
        // Already collected: no double pickup
        assert_eq!(level.check_scroll_collisions(at), 0);
    }

    #[test]
    fn test_spike_kill_radius() {
        let (cfg, run, mut rope, mut level) = setup(1);
        level.spawn_initial(200.0, &cfg, &run, &mut rope);

        let spike = Spike {
            pos: Vec2::new(500.0, 468.0),
        };
        if let Some(seg) = level.segments.front_mut() {
            seg.spikes.clear();
            seg.spikes.push(spike);
        }

        // Within the kill radius of the tip
        assert!(level.check_spike_collisions(spike.tip() + Vec2::new(0.0, -20.0)));
        // Outside it
        assert!(!level.check_spike_collisions(spike.tip() + Vec2::new(0.0, -30.0)));
    }

    #[test]
    fn test_spikes_respect_spawn_rules() {
        for seed in 0..10u64 {
            let (cfg, mut run, mut rope, mut level) = setup(seed);
            run.difficulty_level = 100; // spike chance pinned at its cap
            level.spawn_initial(200.0, &cfg, &run, &mut rope);
            for _ in 0..30 {
                level.spawn_segment(None, true, &cfg, &run, &mut rope);
            }

            for (i, seg) in level.segments().enumerate() {
                // Never on the first two segments
                if i < 2 {
                    assert!(seg.spikes.is_empty());
                }
                for spike in &seg.spikes {
                    assert!(spike.pos.x >= seg.x + SPIKE_EDGE_MARGIN);
                    assert!(spike.pos.x <= seg.trailing_edge() - SPIKE_EDGE_MARGIN);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_window_bounded_for_any_seed(seed in 0u64..1000, step in 40.0f32..400.0) {
            let (cfg, run, mut rope, mut level) = setup(seed);
            level.spawn_initial(200.0, &cfg, &run, &mut rope);
            let mut reference = 200.0;
            for _ in 0..200 {
                reference += step;
                level.update(reference, &cfg, &run, &mut rope);
                prop_assert!(level.segment_count() <= 24);
            }
        }
    }
}
