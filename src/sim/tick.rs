//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision::{boxes_overlap, quads_overlap, resolve_box_collision};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player pivot position (from mouse/touch), arena pixels
    pub target: Option<Vec2>,
    /// Body rotation in radians
    pub rotation: f32,
    /// Super mode held: every box counts as wanted while the meter lasts
    pub super_mode: bool,
    /// Start a run from the title or game-over screen
    pub start: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Title | GamePhase::GameOver => {
            if input.start || input.idle_mode {
                state.start();
            } else {
                return;
            }
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    state.invincibility = (state.invincibility - dt).max(0.0);

    let mut input = input.clone();
    if input.idle_mode {
        input.target = Some(idle_target(state, dt));
    }
    if let Some(target) = input.target {
        state.player.pos = target.clamp(Vec2::ZERO, state.arena);
    }
    state.player.rotation = input.rotation;

    state.wave_time += dt;
    update_boxes(state, &input, dt);
    update_super_meter(state, &input, dt);

    if state.lives < 0 {
        let time = state.elapsed_time();
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score,
            time,
        });
        log::info!("Game over: score {} after {:.2}s (wave {})", state.score, time, state.wave);
        state.init_boxes();
        return;
    }

    if state.wave_time >= WAVE_DURATION {
        state.wave += 1;
        state.avoid_thirteen = state.wave % 2 == 1;
        state.wave_time = 0.0;
        state.init_boxes();
        state.events.push(GameEvent::WaveStarted {
            wave: state.wave,
            avoid_thirteen: state.avoid_thirteen,
        });
        log::debug!("Wave {} (avoid 13: {})", state.wave, state.avoid_thirteen);
    }
}

fn update_boxes(state: &mut GameState, input: &TickInput, dt: f32) {
    let speed = state.speed_multiplier();
    let arena = state.arena;
    let body = state.player.corners();
    let super_active = input.super_mode && state.super_available;

    for i in 0..state.boxes.len() {
        let (head, tail) = state.boxes.split_at_mut(i + 1);
        let b = &mut head[i];
        b.pos += b.vel * speed * dt;

        if !b.collidable {
            // Only fully inside boxes (with a box-size margin) join in
            let inside = b.pos.x - b.size > 0.0
                && b.pos.x + b.size < arena.x
                && b.pos.y - b.size > 0.0
                && b.pos.y + b.size < arena.y;
            if !inside {
                continue;
            }
            b.collidable = true;
        } else {
            b.glow = (b.glow + dt / GLOW_RAMP_SECONDS).min(1.0);
        }

        let h = b.half_extent();
        if b.pos.x - h < 0.0 || b.pos.x + h > arena.x {
            b.vel.x = -b.vel.x;
        }
        if b.pos.y - h < 0.0 || b.pos.y + h > arena.y {
            b.vel.y = -b.vel.y;
        }

        for other in tail.iter_mut() {
            if boxes_overlap(b, other) {
                resolve_box_collision(b, other);
            }
        }

        if state.invincibility > INVINCIBILITY_GRACE || !quads_overlap(&body, &b.corners()) {
            continue;
        }

        let value = b.value;
        let wanted = b.is_thirteen() != state.avoid_thirteen;
        if wanted || super_active {
            state.score += value;
            state.super_meter = (state.super_meter + value as f32).min(SUPER_METER_MAX);
            if state.super_meter > 0.0 {
                state.super_available = true;
            }
            state.events.push(GameEvent::Collected { value });
        } else {
            state.lives -= 1;
            state.score = state.score.saturating_sub(value);
            state.invincibility = INVINCIBILITY_SECONDS;
            state.events.push(GameEvent::LifeLost { value });
        }
        state.respawn_box(i);
    }
}

fn update_super_meter(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.super_mode && state.super_available {
        state.super_meter = (state.super_meter - dt * SUPER_DRAIN_PER_SECOND).max(0.0);
        if state.super_meter == 0.0 {
            state.super_available = false;
        }
    }
    if !input.super_mode && state.super_meter <= 0.0 {
        state.super_available = false;
    }
}

/// Demo AI: drift toward the closest wanted box and away from nearby threats
fn idle_target(state: &GameState, dt: f32) -> Vec2 {
    let pos = state.player.pos;
    let mut steer = Vec2::ZERO;

    let nearest = |wanted: bool| {
        state
            .boxes
            .iter()
            .filter(|b| b.collidable && state.is_wanted(b) == wanted)
            .min_by(|a, b| a.pos.distance_squared(pos).total_cmp(&b.pos.distance_squared(pos)))
    };

    if let Some(food) = nearest(true) {
        steer += (food.pos - pos).normalize_or_zero();
    }
    if let Some(threat) = nearest(false) {
        let away = pos - threat.pos;
        if away.length() < AI_FLEE_RADIUS {
            steer += away.normalize_or_zero() * 2.0;
        }
    }
    // Drift back toward the middle so the AI doesn't pin itself to a wall
    steer += (state.arena / 2.0 - pos) / state.arena.max_element().max(1.0);

    pos + steer.normalize_or_zero() * AI_SPEED * dt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GlowBox;

    const ARENA: Vec2 = Vec2::new(800.0, 600.0);

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, ARENA);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        state.drain_events();
        state
    }

    /// Park every box far from the player, then put box `value` on top of it
    fn place_box_on_player(state: &mut GameState, value: u32) {
        state.invincibility = 0.0;
        for b in &mut state.boxes {
            b.pos = Vec2::new(100.0, 100.0);
            b.vel = Vec2::ZERO;
            b.collidable = false;
        }
        let pos = state.player.pos;
        let b: &mut GlowBox = &mut state.boxes[value as usize - 1];
        b.pos = pos - Vec2::new(0.0, 60.0);
        b.collidable = true;
    }

    #[test]
    fn test_tick_title_to_playing() {
        let mut state = GameState::new(12345, ARENA);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.time_ticks, 0);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::WaveStarted {
                wave: 1,
                avoid_thirteen: true
            }]
        );
    }

    #[test]
    fn test_collect_wanted_box() {
        let mut state = playing_state(1);
        place_box_on_player(&mut state, 5);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.score, 5);
        assert_eq!(state.super_meter, 5.0);
        assert!(state.super_available);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.drain_events(), vec![GameEvent::Collected { value: 5 }]);
        // Collected box goes back off-screen
        assert!(!state.boxes[4].collidable);
    }

    #[test]
    fn test_lose_life_on_thirteen() {
        let mut state = playing_state(2);
        state.score = 4;
        place_box_on_player(&mut state, 13);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.lives, START_LIVES - 1);
        assert_eq!(state.score, 0);
        assert!(state.invincibility > INVINCIBILITY_GRACE);
        assert_eq!(state.drain_events(), vec![GameEvent::LifeLost { value: 13 }]);
    }

    #[test]
    fn test_invincibility_blocks_hits() {
        let mut state = playing_state(3);
        place_box_on_player(&mut state, 13);
        state.invincibility = 0.5;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, START_LIVES);
    }

    #[test]
    fn test_super_mode_makes_thirteen_safe() {
        let mut state = playing_state(4);
        state.super_meter = 50.0;
        state.super_available = true;
        place_box_on_player(&mut state, 13);
        let input = TickInput {
            super_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.score, 13);
        // Gained 13, drained one tick's worth
        let expected = 63.0 - SIM_DT * SUPER_DRAIN_PER_SECOND;
        assert!((state.super_meter - expected).abs() < 1e-3);
    }

    #[test]
    fn test_super_meter_runs_out() {
        let mut state = playing_state(5);
        state.super_meter = 0.1;
        state.super_available = true;
        let input = TickInput {
            super_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.super_meter, 0.0);
        assert!(!state.super_available);
    }

    #[test]
    fn test_wave_flips_rule() {
        let mut state = playing_state(6);
        state.wave_time = WAVE_DURATION - SIM_DT / 2.0;
        for b in &mut state.boxes {
            b.vel = Vec2::ZERO;
        }
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.wave, 2);
        assert!(!state.avoid_thirteen);
        assert_eq!(state.wave_time, 0.0);
        assert!(state.is_wanted(&GlowBox::new(13)));
        assert!(state.drain_events().contains(&GameEvent::WaveStarted {
            wave: 2,
            avoid_thirteen: false
        }));
    }

    #[test]
    fn test_game_over_when_lives_run_out() {
        let mut state = playing_state(7);
        state.lives = 0;
        state.score = 20;
        place_box_on_player(&mut state, 13);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { score: 7, .. })));

        // Stays over until restarted
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_boxes_become_collidable_and_glow() {
        let mut state = playing_state(8);
        let b = &mut state.boxes[0];
        b.pos = ARENA / 2.0 + Vec2::new(200.0, 0.0);
        b.vel = Vec2::ZERO;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.boxes[0].collidable);
        assert_eq!(state.boxes[0].glow, 0.0);

        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let glow = state.boxes[0].glow;
        assert!(glow > 0.45 && glow < 0.55, "glow {glow}");
    }

    #[test]
    fn test_idle_mode_starts_and_moves() {
        let mut state = GameState::new(9, ARENA);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_ne!(state.phase, GamePhase::Title);
        let p = state.player.pos;
        assert!(p.x >= 0.0 && p.y >= 0.0 && p.x <= ARENA.x && p.y <= ARENA.y);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, ARENA);
        let mut state2 = GameState::new(99999, ARENA);

        let inputs = [
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                target: Some(Vec2::new(300.0, 400.0)),
                rotation: 0.3,
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.boxes, state2.boxes);
        assert_eq!(state1.player, state2.player);
    }
}
