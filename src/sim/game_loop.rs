//! Game loop orchestration
//!
//! One tick per display refresh while running. Each tick snapshots input,
//! runs the spawner and the physics step, accumulates score, and notifies
//! listeners. A collision ends the session; a hidden page pauses it.
//!
//! Ticks are driven by the host: the loop asks for the next one with a
//! `TickToken`, and any tick carrying an outdated token (previous session,
//! or issued before a stop) is ignored.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::physics::{self, InputIntents, StepOutcome};
use super::spawner;
use super::state::{GamePhase, Obstacle, Session, StopReason};
use crate::config::GameConfig;
use crate::consts::NOMINAL_FRAME_MS;
use crate::platform::{Host, InputState, TickToken};

/// Read-only view of a frame for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub player: Aabb,
    pub obstacles: Vec<Obstacle>,
    pub speed_multiplier: f32,
    pub spawn_interval: f32,
}

/// Sent once when a session ends in a collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameOverInfo {
    pub final_score: u64,
    pub seed: u64,
    pub elapsed_ms: f64,
}

/// What a call to `GameLoop::tick` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Stale token or loop not running
    Skipped,
    /// Page hidden; loop stopped
    Paused,
    Advanced(StepOutcome),
    GameOver(GameOverInfo),
}

/// Score earned for a tick of `delta` ms at the given speed multiplier
pub fn score_for_tick(delta: f32, speed_multiplier: f32, config: &GameConfig) -> u64 {
    let raw = (delta / NOMINAL_FRAME_MS) * (1.0 + speed_multiplier * config.score_multiplier_factor);
    raw.round().max(0.0) as u64
}

/// Advance a running session by `delta` ms: spawn, move, collide, score.
/// The score is left untouched on the colliding tick.
pub fn advance_session(
    session: &mut Session,
    config: &GameConfig,
    delta: f32,
    intents: &InputIntents,
) -> StepOutcome {
    spawner::maybe_spawn(session, config, delta);
    let outcome = physics::step(session, config, delta, intents);
    session.elapsed_ms += delta as f64;
    session.ticks += 1;
    if !outcome.collided {
        session.score += score_for_tick(delta, session.speed_multiplier, config);
    }
    outcome
}

type TickListener = Box<dyn FnMut(&FrameSnapshot)>;
type GameOverListener = Box<dyn FnMut(&GameOverInfo)>;

/// Owns the session and drives it through the host's tick scheduling
pub struct GameLoop<H: Host> {
    config: GameConfig,
    session: Session,
    input: InputState,
    host: H,
    /// Bumped on every start/stop so outstanding tokens go stale
    generation: u64,
    last_time: Option<f64>,
    tick_listeners: Vec<TickListener>,
    game_over_listeners: Vec<GameOverListener>,
}

impl<H: Host> GameLoop<H> {
    pub fn new(config: GameConfig, host: H) -> Self {
        let session = Session::new(&config, 0);
        Self {
            config,
            session,
            input: InputState::new(),
            host,
            generation: 0,
            last_time: None,
            tick_listeners: Vec::new(),
            game_over_listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for tests and tooling
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Event handlers feed input here between ticks
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn is_running(&self) -> bool {
        self.session.phase.is_running()
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    /// Called after every completed running tick
    pub fn on_tick(&mut self, listener: impl FnMut(&FrameSnapshot) + 'static) {
        self.tick_listeners.push(Box::new(listener));
    }

    /// Called once when a collision ends the session
    pub fn on_game_over(&mut self, listener: impl FnMut(&GameOverInfo) + 'static) {
        self.game_over_listeners.push(Box::new(listener));
    }

    fn token(&self) -> TickToken {
        TickToken(self.generation)
    }

    /// Begin a fresh session, discarding any previous one
    pub fn start(&mut self, seed: u64) {
        self.host.cancel_pending_tick();
        self.generation += 1;
        self.session = Session::new(&self.config, seed);
        self.session.phase = GamePhase::Running;
        self.last_time = None;
        self.input.reset();
        log::info!("Session started with seed: {}", seed);
        let token = self.token();
        self.host.schedule_next_tick(token);
    }

    /// Pause from outside (page hidden). Idempotent; the session can only be
    /// left by starting a new one.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.halt(StopReason::Paused);
        log::info!("Session paused at score {}", self.session.score);
    }

    /// Host visibility changed
    pub fn handle_visibility_change(&mut self, visible: bool) {
        if !visible {
            self.stop();
        }
    }

    fn halt(&mut self, reason: StopReason) {
        self.session.phase = GamePhase::Stopped(reason);
        self.generation += 1;
        self.host.cancel_pending_tick();
    }

    /// Run one scheduled tick
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if token != self.token() || !self.is_running() {
            log::trace!("Ignoring stale tick {:?}", token);
            return TickOutcome::Skipped;
        }
        if !self.host.is_visible() {
            self.stop();
            return TickOutcome::Paused;
        }

        let now = self.host.now();
        let delta = match self.last_time {
            Some(last) => self.config.clamp_delta((now - last) as f32),
            None => 0.0,
        };
        self.last_time = Some(now);

        let intents = self.input.snapshot();
        let outcome = advance_session(&mut self.session, &self.config, delta, &intents);

        if outcome.collided {
            self.halt(StopReason::GameOver);
            let info = GameOverInfo {
                final_score: self.session.score,
                seed: self.session.seed,
                elapsed_ms: self.session.elapsed_ms,
            };
            log::info!(
                "Game over: score {} after {:.1}s",
                info.final_score,
                info.elapsed_ms / 1000.0
            );
            self.notify_tick();
            for listener in self.game_over_listeners.iter_mut() {
                listener(&info);
            }
            return TickOutcome::GameOver(info);
        }

        self.notify_tick();
        let token = self.token();
        self.host.schedule_next_tick(token);
        TickOutcome::Advanced(outcome)
    }

    fn notify_tick(&mut self) {
        if self.tick_listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in self.tick_listeners.iter_mut() {
            listener(&snapshot);
        }
    }

    /// Current render data
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.session.phase,
            score: self.session.score,
            player: self.session.player.rect(),
            obstacles: self.session.obstacles.clone(),
            speed_multiplier: self.session.speed_multiplier,
            spawn_interval: self.session.spawn_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualHost;

    fn run_pending(game: &mut GameLoop<ManualHost>, ms: f64) -> TickOutcome {
        game.host_mut().advance(ms);
        match game.host_mut().take_pending() {
            Some(token) => game.tick(token),
            None => TickOutcome::Skipped,
        }
    }

    #[test]
    fn test_score_for_tick() {
        let config = GameConfig::default();
        assert_eq!(score_for_tick(16.0, 0.0, &config), 1);
        assert_eq!(score_for_tick(0.0, 5.0, &config), 0);
        assert_eq!(score_for_tick(50.0, 0.0, &config), 3);
        assert_eq!(score_for_tick(32.0, 10.0, &config), 3);
    }

    #[test]
    fn test_start_schedules_tick() {
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        assert_eq!(game.phase(), GamePhase::Stopped(StopReason::NotStarted));
        assert!(game.host().pending().is_none());
        game.start(1);
        assert!(game.is_running());
        assert!(game.host().pending().is_some());
    }

    #[test]
    fn test_first_tick_has_zero_delta() {
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        game.host_mut().advance(10_000.0);
        game.start(1);
        run_pending(&mut game, 0.0);
        assert_eq!(game.session().elapsed_ms, 0.0);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_delta_clamped_after_stall() {
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        game.start(1);
        run_pending(&mut game, 0.0);
        run_pending(&mut game, 5_000.0);
        assert_eq!(game.session().elapsed_ms, 50.0);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        game.start(1);
        let old = game.host().pending().unwrap();
        game.start(2);
        assert_eq!(game.tick(old), TickOutcome::Skipped);
        assert_eq!(game.session().ticks, 0);
    }

    #[test]
    fn test_stop_is_idempotent_and_cancels() {
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        game.start(1);
        let token = game.host().pending().unwrap();
        game.stop();
        game.stop();
        assert_eq!(game.phase(), GamePhase::Stopped(StopReason::Paused));
        assert!(game.host().pending().is_none());
        assert_eq!(game.tick(token), TickOutcome::Skipped);
        // Only the tick requested by start, nothing after the stop
        assert_eq!(game.host().scheduled, 1);
    }

    #[test]
    fn test_visibility_event_pauses_without_penalty() {
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        game.start(1);
        for _ in 0..5 {
            run_pending(&mut game, 16.0);
        }
        let score = game.score();

        game.handle_visibility_change(true);
        assert!(game.is_running());

        game.handle_visibility_change(false);
        assert_eq!(game.phase(), GamePhase::Stopped(StopReason::Paused));
        assert_eq!(game.score(), score);
        assert_eq!(run_pending(&mut game, 16.0), TickOutcome::Skipped);
        assert_eq!(game.score(), score);
    }

    #[test]
    fn test_hidden_page_pauses_without_penalty() {
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        game.start(1);
        for _ in 0..10 {
            run_pending(&mut game, 16.0);
        }
        let score = game.score();
        assert!(score > 0);

        game.host_mut().set_visible(false);
        assert_eq!(run_pending(&mut game, 16.0), TickOutcome::Paused);
        assert_eq!(game.phase(), GamePhase::Stopped(StopReason::Paused));
        assert_eq!(game.score(), score);
        assert!(game.phase().shows_score());
    }

    #[test]
    fn test_listeners_receive_snapshots() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        {
            let seen = seen.clone();
            game.on_tick(move |frame| seen.borrow_mut().push(frame.score));
        }
        game.start(1);
        run_pending(&mut game, 0.0);
        run_pending(&mut game, 16.0);
        run_pending(&mut game, 16.0);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }
}
