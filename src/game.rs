//! Session lifecycle
//!
//! [`Game`] wraps the pure simulation with everything a play session needs:
//! the player's name, the clock, the leaderboard and the input map. Game over
//! does not block. The game parks in [`Phase::AwaitingReplayDecision`] and
//! the presentation layer answers later with [`Game::replay`] or
//! [`Game::terminate`].

use crate::error::{GameError, GameResult};
use crate::input::{DirectionFlags, InputState};
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::persistence::KeyValueStore;
use crate::renderer::{Surface, draw_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, autopilot_input, tick};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session: waiting for a username and a start
    Idle,
    /// Frames are being simulated
    Running,
    /// Session over; waiting for the player to replay or quit
    AwaitingReplayDecision,
}

/// What the presentation layer is told when a session ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub username: String,
    pub level: u32,
    pub duration_secs: u64,
    /// Ended by clearing the final level rather than a crash
    pub cleared: bool,
    /// Leaderboard position, if the result could be recorded
    pub rank: Option<usize>,
}

/// Result of one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing is running; don't schedule another frame
    Idle,
    Continue,
    /// Level completed; `level` is the new level
    LevelUp { level: u32 },
    /// Session ended; stop scheduling and show the summary
    SessionOver(GameSummary),
}

impl FrameOutcome {
    /// Whether the driver should request another frame
    pub fn wants_next_frame(&self) -> bool {
        matches!(self, FrameOutcome::Continue | FrameOutcome::LevelUp { .. })
    }
}

/// One continuous play attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    /// Wall-clock start, ms since epoch
    pub started_at_ms: f64,
    pub running: bool,
}

impl Session {
    /// Whole seconds elapsed at `now_ms` (never negative)
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        ((now_ms - self.started_at_ms).max(0.0) / 1000.0).floor() as u64
    }
}

/// Game instance holding all state
pub struct Game<S> {
    settings: Settings,
    leaderboard: Leaderboard<S>,
    phase: Phase,
    state: Option<GameState>,
    session: Option<Session>,
    input: InputState,
    autopilot: bool,
    last_summary: Option<GameSummary>,
}

impl<S: KeyValueStore> Game<S> {
    /// Load the leaderboard from `store` and wait in [`Phase::Idle`]
    pub fn new(settings: Settings, store: S) -> Self {
        Self {
            settings,
            leaderboard: Leaderboard::load(store),
            phase: Phase::Idle,
            state: None,
            session: None,
            input: InputState::new(),
            autopilot: false,
            last_summary: None,
        }
    }

    /// Begin a session for `username`, seeding blocks from the clock
    pub fn start(&mut self, username: &str, now_ms: f64) -> GameResult<()> {
        self.start_with_seed(username, now_ms, now_ms as u64)
    }

    /// Begin a session with an explicit seed
    ///
    /// A blank name is refused and leaves the game untouched.
    pub fn start_with_seed(&mut self, username: &str, now_ms: f64, seed: u64) -> GameResult<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GameError::EmptyUsername);
        }
        if self.phase != Phase::Idle {
            return Err(GameError::InvalidPhase {
                action: "start",
                phase: self.phase,
            });
        }

        self.session = Some(Session {
            username: username.to_string(),
            started_at_ms: now_ms,
            running: true,
        });
        self.begin_run(seed);
        log::info!("Session started for {username} (seed {seed})");
        Ok(())
    }

    /// Answer a game over with "play again": back to level 1 with a fresh clock
    pub fn replay(&mut self, now_ms: f64) -> GameResult<()> {
        self.replay_with_seed(now_ms, now_ms as u64)
    }

    pub fn replay_with_seed(&mut self, now_ms: f64, seed: u64) -> GameResult<()> {
        if self.phase != Phase::AwaitingReplayDecision {
            return Err(GameError::InvalidPhase {
                action: "replay",
                phase: self.phase,
            });
        }
        let Some(session) = self.session.as_mut() else {
            return Err(GameError::InvalidPhase {
                action: "replay",
                phase: self.phase,
            });
        };
        session.started_at_ms = now_ms;
        session.running = true;
        self.begin_run(seed);
        log::info!("Replay started (seed {seed})");
        Ok(())
    }

    /// Drop the session and return to [`Phase::Idle`]
    pub fn terminate(&mut self) {
        if let Some(session) = &self.session {
            log::info!("Session for {} ended", session.username);
        }
        self.session = None;
        self.state = None;
        self.phase = Phase::Idle;
        self.input.set_enabled(false);
        self.autopilot = false;
    }

    /// Every run starts under manual control
    fn begin_run(&mut self, seed: u64) {
        self.state = Some(GameState::new(self.settings.clone(), seed));
        self.input.set_enabled(true);
        self.input.clear();
        self.autopilot = false;
        self.phase = Phase::Running;
    }

    /// Input for the coming frame: held keys, or the autopilot when enabled
    pub fn current_input(&self) -> DirectionFlags {
        match (&self.state, self.autopilot) {
            (Some(state), true) => autopilot_input(state),
            _ => self.input.directions(),
        }
    }

    /// Run one full frame: clear, simulate, redraw
    pub fn frame<Sf: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut Sf) -> FrameOutcome {
        if self.phase != Phase::Running {
            return FrameOutcome::Idle;
        }
        surface.clear(self.settings.canvas_width, self.settings.canvas_height);
        let input = self.current_input();
        let outcome = self.step(&input, now_ms);
        if let Some(state) = &self.state {
            draw_scene(state, surface);
        }
        outcome
    }

    /// Simulate one frame without drawing
    pub fn step(&mut self, input: &DirectionFlags, now_ms: f64) -> FrameOutcome {
        if self.phase != Phase::Running {
            return FrameOutcome::Idle;
        }
        let Some(state) = self.state.as_mut() else {
            return FrameOutcome::Idle;
        };

        match tick(state, input) {
            None => FrameOutcome::Continue,
            Some(GameEvent::LevelComplete { level }) => FrameOutcome::LevelUp { level },
            Some(GameEvent::Collision(_)) => FrameOutcome::SessionOver(self.finish(now_ms, false)),
            Some(GameEvent::Cleared { .. }) => FrameOutcome::SessionOver(self.finish(now_ms, true)),
        }
    }

    /// Redraw the current state without simulating
    pub fn draw<Sf: Surface + ?Sized>(&self, surface: &mut Sf) {
        surface.clear(self.settings.canvas_width, self.settings.canvas_height);
        if let Some(state) = &self.state {
            draw_scene(state, surface);
        }
    }

    /// Freeze the run, record the result and wait for a decision
    fn finish(&mut self, now_ms: f64, cleared: bool) -> GameSummary {
        let level = self.state.as_ref().map_or(1, |s| s.level.level);
        let (username, duration_secs) = match self.session.as_mut() {
            Some(session) => {
                session.running = false;
                (session.username.clone(), session.elapsed_secs(now_ms))
            }
            None => (String::new(), 0),
        };

        let rank = match self.leaderboard.record(LeaderboardEntry::new(
            username.clone(),
            level,
            duration_secs,
        )) {
            Ok(rank) => Some(rank),
            Err(e) => {
                log::warn!("Could not persist leaderboard: {e}");
                None
            }
        };

        log::info!(
            "Game over: {username} reached level {level} in {duration_secs}s (cleared: {cleared})"
        );
        self.phase = Phase::AwaitingReplayDecision;
        self.input.clear();

        let summary = GameSummary {
            username,
            level,
            duration_secs,
            cleared,
            rank,
        };
        self.last_summary = Some(summary.clone());
        summary
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Release held keys (e.g. when the window loses focus)
    pub fn release_keys(&mut self) {
        self.input.clear();
    }

    /// Toggle demo mode; returns the new setting
    pub fn toggle_autopilot(&mut self) -> bool {
        self.autopilot = !self.autopilot;
        log::info!("Autopilot: {}", self.autopilot);
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Mutable access to the running simulation (scripted setups, tests)
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    /// Summary of the most recent finished session
    pub fn last_summary(&self) -> Option<&GameSummary> {
        self.last_summary.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::renderer::{Color, RecordingSurface};
    use glam::Vec2;

    fn game() -> Game<MemoryStore> {
        Game::new(Settings::default(), MemoryStore::new())
    }

    /// Started game with no blocks, so only the enemy can end it
    fn started(now_ms: f64) -> Game<MemoryStore> {
        let mut game = game();
        game.start_with_seed("neo", now_ms, 1).unwrap();
        game.state_mut().unwrap().blocks.clear();
        game
    }

    fn crash_into_enemy(game: &mut Game<MemoryStore>) {
        let state = game.state_mut().unwrap();
        let pos = state.avatar.rect.pos() + Vec2::new(5.0, 0.0);
        state.enemy.rect.set_pos(pos);
    }

    #[test]
    fn test_empty_username_rejected_without_mutation() {
        let mut game = game();
        assert!(matches!(game.start("   ", 0.0), Err(GameError::EmptyUsername)));
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.state().is_none());
        assert!(game.session().is_none());
        assert!(!game.key_down("ArrowRight"));
    }

    #[test]
    fn test_start_trims_and_runs() {
        let mut game = game();
        game.start("  neo  ", 1000.0).unwrap();
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.session().unwrap().username, "neo");
        assert_eq!(game.state().unwrap().blocks.len(), 5);

        // Can't start twice
        assert!(matches!(
            game.start("trinity", 2000.0),
            Err(GameError::InvalidPhase { action: "start", .. })
        ));
    }

    #[test]
    fn test_keys_drive_the_avatar() {
        let mut game = started(0.0);
        assert!(game.key_down("ArrowRight"));
        let outcome = game.step(&game.current_input(), 16.0);
        assert_eq!(outcome, FrameOutcome::Continue);
        assert_eq!(game.state().unwrap().avatar.rect.x, 55.0);

        game.key_up("ArrowRight");
        game.step(&game.current_input(), 32.0);
        assert_eq!(game.state().unwrap().avatar.rect.x, 55.0);
    }

    #[test]
    fn test_game_over_records_and_waits() {
        let mut game = started(10_000.0);
        crash_into_enemy(&mut game);

        let outcome = game.step(&DirectionFlags::default(), 52_500.0);
        let FrameOutcome::SessionOver(summary) = outcome else {
            panic!("expected session over, got {outcome:?}");
        };
        assert_eq!(summary.level, 1);
        assert_eq!(summary.duration_secs, 42);
        assert_eq!(summary.rank, Some(1));
        assert!(!summary.cleared);
        assert!(!FrameOutcome::SessionOver(summary.clone()).wants_next_frame());

        assert_eq!(game.phase(), Phase::AwaitingReplayDecision);
        assert!(!game.session().unwrap().running);
        assert_eq!(game.leaderboard().len(), 1);
        assert_eq!(game.last_summary(), Some(&summary));
        assert!(game.leaderboard().store().get("leaderboard").is_some());

        // Further frames do nothing
        let mut surface = RecordingSurface::new();
        assert_eq!(game.frame(60_000.0, &mut surface), FrameOutcome::Idle);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_replay_resets_to_level_one() {
        let mut game = started(0.0);
        {
            let state = game.state_mut().unwrap();
            state.level.advance(&Settings::default());
            state.level.advance(&Settings::default());
        }
        crash_into_enemy(&mut game);
        game.step(&DirectionFlags::default(), 3000.0);
        assert_eq!(game.last_summary().unwrap().level, 3);

        game.replay_with_seed(9000.0, 2).unwrap();
        let state = game.state().unwrap();
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(state.level.level, 1);
        assert_eq!(state.level.block_speed, 2.0);
        assert_eq!(state.level.enemy_speed, 2.0);
        assert_eq!(state.avatar.rect.pos(), Vec2::new(50.0, 300.0));
        assert_eq!(state.enemy.rect.pos(), Vec2::new(750.0, 300.0));
        assert_eq!(state.blocks.len(), 5);
        let session = game.session().unwrap();
        assert_eq!(session.started_at_ms, 9000.0);
        assert!(session.running);
        assert_eq!(session.username, "neo");
    }

    #[test]
    fn test_replay_only_after_game_over() {
        let mut game = game();
        assert!(game.replay(0.0).is_err());
        game.start("neo", 0.0).unwrap();
        assert!(matches!(
            game.replay(0.0),
            Err(GameError::InvalidPhase { action: "replay", phase: Phase::Running })
        ));
    }

    #[test]
    fn test_terminate_returns_to_idle() {
        let mut game = started(0.0);
        crash_into_enemy(&mut game);
        game.step(&DirectionFlags::default(), 1000.0);

        game.terminate();
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.session().is_none());
        assert!(!game.key_down("ArrowUp"));
        // History survives; a new player can start
        assert_eq!(game.leaderboard().len(), 1);
        game.start("trinity", 5000.0).unwrap();
    }

    #[test]
    fn test_frame_clears_then_draws() {
        let mut game = started(0.0);
        let mut surface = RecordingSurface::new();
        let outcome = game.frame(16.0, &mut surface);
        assert_eq!(outcome, FrameOutcome::Continue);
        assert!(outcome.wants_next_frame());
        assert_eq!(surface.calls[0], crate::renderer::DrawCall::Clear);
        let rects = surface.frame_rects();
        assert_eq!(rects[0].1, Color::Avatar);
        assert_eq!(rects[1].1, Color::Enemy);
    }

    #[test]
    fn test_autopilot_overrides_keys() {
        let mut game = started(0.0);
        game.state_mut().unwrap().enemy.rect.set_pos(Vec2::new(780.0, 0.0));
        assert_eq!(game.current_input(), DirectionFlags::default());
        assert!(game.toggle_autopilot());
        assert_eq!(game.current_input(), DirectionFlags::RIGHT);
    }

    #[test]
    fn test_autopilot_does_not_outlive_its_run() {
        let mut game = started(0.0);
        game.set_autopilot(true);
        crash_into_enemy(&mut game);
        game.step(&DirectionFlags::default(), 1000.0);
        game.terminate();

        game.start_with_seed("bob", 2000.0, 3).unwrap();
        assert_eq!(game.current_input(), DirectionFlags::default());

        game.set_autopilot(true);
        crash_into_enemy(&mut game);
        game.step(&DirectionFlags::default(), 3000.0);
        game.replay_with_seed(4000.0, 4).unwrap();
        assert_eq!(game.current_input(), DirectionFlags::default());
    }

    /// Store whose writes always fail
    #[derive(Default)]
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn read(&self, _key: &str) -> GameResult<Option<String>> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _value: &str) -> GameResult<()> {
            Err(GameError::StorageUnavailable("read-only".into()))
        }
    }

    #[test]
    fn test_game_over_survives_failed_save() {
        let mut game = Game::new(Settings::default(), ReadOnlyStore);
        game.start_with_seed("neo", 0.0, 1).unwrap();
        {
            let state = game.state_mut().unwrap();
            state.blocks.clear();
            let pos = state.avatar.rect.pos();
            state.enemy.rect.set_pos(pos);
        }

        let outcome = game.step(&DirectionFlags::default(), 7_000.0);
        let FrameOutcome::SessionOver(summary) = outcome else {
            panic!("expected session over, got {outcome:?}");
        };
        assert_eq!(summary.rank, None);
        assert_eq!(summary.duration_secs, 7);
        assert_eq!(game.phase(), Phase::AwaitingReplayDecision);
        assert_eq!(game.leaderboard().len(), 1);
    }

    #[test]
    fn test_session_elapsed_floors() {
        let session = Session {
            username: "a".into(),
            started_at_ms: 1000.0,
            running: true,
        };
        assert_eq!(session.elapsed_secs(1999.0), 0);
        assert_eq!(session.elapsed_secs(43_999.0), 42);
        assert_eq!(session.elapsed_secs(0.0), 0);
    }
}
