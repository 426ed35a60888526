//! Game state and core simulation types
//!
//! Arena coordinates are pixels with the origin top-left and y down, the
//! same space the renderer's UV coordinates are scaled into.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::body_corners;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Boxes idle, waiting for start input
    Title,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Collected { value: u32 },
    LifeLost { value: u32 },
    WaveStarted { wave: u32, avoid_thirteen: bool },
    GameOver { score: u32, time: f32 },
}

/// A numbered, glowing box drifting across the arena
#[derive(Debug, Clone, PartialEq)]
pub struct GlowBox {
    /// 1..=13
    pub value: u32,
    pub pos: Vec2,
    /// Pixels per second at wave speed 1.0
    pub vel: Vec2,
    pub size: f32,
    /// Set once the box is fully inside the arena
    pub collidable: bool,
    /// Emission strength, ramps 0..1 after becoming collidable
    pub glow: f32,
}

impl GlowBox {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: BOX_SIZE,
            collidable: false,
            glow: 0.0,
        }
    }

    pub fn is_thirteen(&self) -> bool {
        self.value == BOX_COUNT
    }

    pub fn speed(&self) -> f32 {
        if self.is_thirteen() {
            ENEMY_BOX_SPEED
        } else {
            BOX_SPEED
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let h = self.half_extent();
        [
            self.pos + Vec2::new(-h, -h),
            self.pos + Vec2::new(h, -h),
            self.pos + Vec2::new(h, h),
            self.pos + Vec2::new(-h, h),
        ]
    }
}

/// The player's body: a rotated rectangle pivoting near its bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Radians, clockwise on screen
    pub rotation: f32,
}

impl Player {
    pub fn corners(&self) -> [Vec2; 4] {
        body_corners(self.pos, self.rotation)
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Arena size in pixels
    pub arena: Vec2,
    pub phase: GamePhase,
    /// 1-based wave number
    pub wave: u32,
    /// Odd waves: box 13 is the one to avoid. Even waves: hunt 13, avoid the rest.
    pub avoid_thirteen: bool,
    pub lives: i32,
    pub score: u32,
    /// 0..=SUPER_METER_MAX
    pub super_meter: f32,
    pub super_available: bool,
    /// Seconds of collision immunity left
    pub invincibility: f32,
    /// Seconds into the current wave
    pub wave_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub boxes: Vec<GlowBox>,
    pub player: Player,
    /// Pending events (drained by the host)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, arena: Vec2) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            phase: GamePhase::Title,
            wave: 1,
            avoid_thirteen: true,
            lives: START_LIVES,
            score: 0,
            super_meter: 0.0,
            super_available: false,
            invincibility: INVINCIBILITY_SECONDS,
            wave_time: 0.0,
            time_ticks: 0,
            boxes: Vec::with_capacity(BOX_COUNT as usize),
            player: Player {
                pos: arena * Vec2::new(0.5, 0.75),
                rotation: 0.0,
            },
            events: Vec::new(),
        };
        state.init_boxes();
        state
    }

    /// Reset run counters and begin wave 1
    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.wave = 1;
        self.avoid_thirteen = true;
        self.lives = START_LIVES;
        self.score = 0;
        self.super_meter = 0.0;
        self.super_available = false;
        self.invincibility = INVINCIBILITY_SECONDS;
        self.wave_time = 0.0;
        self.init_boxes();
        self.events.push(GameEvent::WaveStarted {
            wave: self.wave,
            avoid_thirteen: self.avoid_thirteen,
        });
        log::info!("Game started (seed {})", self.seed);
    }

    /// Whether touching `b` scores rather than costs a life
    pub fn is_wanted(&self, b: &GlowBox) -> bool {
        b.is_thirteen() != self.avoid_thirteen
    }

    /// Box speed multiplier for the current wave
    pub fn speed_multiplier(&self) -> f32 {
        0.1 + self.wave as f32 / 10.0
    }

    /// Seconds survived across all waves
    pub fn elapsed_time(&self) -> f32 {
        (self.wave - 1) as f32 * WAVE_DURATION + self.wave_time
    }

    /// Replace all boxes with a fresh off-screen set
    pub fn init_boxes(&mut self) {
        self.boxes.clear();
        for value in 1..=BOX_COUNT {
            let mut b = GlowBox::new(value);
            respawn(&mut b, self.arena, &mut self.rng);
            self.boxes.push(b);
        }
    }

    /// Send box `index` back off-screen
    pub fn respawn_box(&mut self, index: usize) {
        if let Some(b) = self.boxes.get_mut(index) {
            respawn(b, self.arena, &mut self.rng);
        }
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Place a box just outside a random edge, aimed at the middle half of the arena
fn respawn(b: &mut GlowBox, arena: Vec2, rng: &mut Pcg32) {
    b.collidable = false;
    b.glow = 0.0;
    b.pos = match rng.random_range(0..4) {
        0 => Vec2::new(-b.size, rng.random::<f32>() * arena.y),
        1 => Vec2::new(arena.x + b.size, rng.random::<f32>() * arena.y),
        2 => Vec2::new(rng.random::<f32>() * arena.x, -b.size),
        _ => Vec2::new(rng.random::<f32>() * arena.x, arena.y + b.size),
    };
    let target = arena * (Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * 0.5 + 0.25);
    b.vel = (target - b.pos).normalize_or(Vec2::X) * b.speed();
}
