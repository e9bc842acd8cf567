//! Robot population accounting and timed spawning.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use zteam_core::types::SpawnZone;

use crate::config::SimConfig;

/// Tracks live robots against the population cap and decides when and where
/// the next one appears. Zones are used round-robin.
#[derive(Debug, Clone)]
pub struct RobotSpawner {
    zones: Vec<SpawnZone>,
    max_robots: usize,
    interval: f32,
    live: usize,
    timer: f32,
    next_zone: usize,
}

impl RobotSpawner {
    pub fn new(zones: Vec<SpawnZone>, max_robots: usize, interval: f32) -> Self {
        Self {
            zones,
            max_robots,
            interval,
            live: 0,
            timer: 0.0,
            next_zone: 0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.spawn_zones.clone(),
            config.max_robots,
            config.spawn_interval_secs,
        )
    }

    /// Reset for a new session.
    pub fn start(&mut self) {
        self.live = 0;
        self.timer = 0.0;
        self.next_zone = 0;
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn max_robots(&self) -> usize {
        self.max_robots
    }

    pub fn is_full(&self) -> bool {
        self.live >= self.max_robots
    }

    /// Advance the spawn clock. Returns a spawn point when a robot is due and
    /// there is room under the cap.
    pub fn update(&mut self, dt: f32, rng: &mut ChaCha8Rng) -> Option<Vec3> {
        self.timer += dt;
        if self.timer < self.interval {
            return None;
        }
        self.timer -= self.interval;
        self.reserve(rng)
    }

    /// Claim a population slot and pick a point for it, or `None` at the cap.
    pub fn reserve(&mut self, rng: &mut ChaCha8Rng) -> Option<Vec3> {
        if self.is_full() || self.zones.is_empty() {
            return None;
        }
        let zone = self.zones[self.next_zone % self.zones.len()];
        self.next_zone = (self.next_zone + 1) % self.zones.len();

        let fx: f32 = rng.gen_range(-1.0..=1.0);
        let fz: f32 = rng.gen_range(-1.0..=1.0);
        self.live += 1;
        Some(zone.point_at(fx, fz))
    }

    /// A robot died.
    pub fn release(&mut self) {
        self.live = self.live.saturating_sub(1);
    }
}
