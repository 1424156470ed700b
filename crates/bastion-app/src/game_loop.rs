//! Game loop thread: drives the frame loop against the wall clock.
//!
//! The simulation is created inside the thread so it never has to cross a
//! thread boundary. Commands arrive over an `mpsc` channel; the latest
//! rendered snapshot is stored in shared state for polling.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use bastion_core::config::{GameData, WaveConfig};
use bastion_core::error::LevelError;
use bastion_core::events::GameEvent;
use bastion_sim::{FrameLoop, SimConfig, Simulation};

use crate::state::{GameLoopCommand, SessionEnd, SessionSummary, SharedSnapshot};

/// Target interval between rendered frames (about 60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Source of wall-clock time for the loop.
pub trait WallClock {
    /// Seconds since an arbitrary fixed origin.
    fn now(&self) -> f64;
    /// Block until the next frame is due.
    fn wait(&mut self);
}

/// Real time from a monotonic clock.
pub struct SystemClock {
    origin: Instant,
    next_frame: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            next_frame: now,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn wait(&mut self) {
        self.next_frame += FRAME_INTERVAL;
        let now = Instant::now();
        if self.next_frame > now {
            std::thread::sleep(self.next_frame - now);
        } else if now - self.next_frame > FRAME_INTERVAL * 4 {
            // Too far behind; the frame clock clamps the delta anyway.
            self.next_frame = now;
        }
    }
}

/// Everything the loop thread needs to enter a level.
pub struct LoopSetup {
    pub data: GameData,
    pub level: u32,
    pub waves: Vec<WaveConfig>,
    pub config: SimConfig,
    pub time_scale: f64,
    pub max_seconds: f64,
}

/// Spawn the game loop thread. Returns the command sender and the handle
/// that yields the session summary.
pub fn spawn_game_loop(
    setup: LoopSetup,
    latest_snapshot: SharedSnapshot,
) -> std::io::Result<(
    mpsc::Sender<GameLoopCommand>,
    JoinHandle<Result<SessionSummary, LevelError>>,
)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("bastion-game-loop".into())
        .spawn(move || -> Result<SessionSummary, LevelError> {
            let LoopSetup {
                data,
                level,
                waves,
                config,
                time_scale,
                max_seconds,
            } = setup;
            let mut sim = Simulation::new(data, level, waves, config)?;
            let mut clock = SystemClock::new();
            Ok(run_game_loop(
                &mut sim,
                &cmd_rx,
                &latest_snapshot,
                &mut clock,
                time_scale,
                max_seconds,
            ))
        })?;

    Ok((cmd_tx, handle))
}

/// Run frames until the game ends, the time limit passes, or a shutdown
/// arrives.
pub fn run_game_loop<C: WallClock>(
    sim: &mut Simulation,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &SharedSnapshot,
    clock: &mut C,
    time_scale: f64,
    max_seconds: f64,
) -> SessionSummary {
    let mut frame_loop = FrameLoop::new();
    frame_loop.set_time_scale(time_scale);
    let started = clock.now();
    frame_loop.start(started, sim);

    let mut killed = 0;
    let mut leaked = 0;

    let end = loop {
        // 1. Drain pending commands
        let mut shutdown = false;
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => sim.queue_command(cmd),
                Ok(GameLoopCommand::SetTimeScale(scale)) => frame_loop.set_time_scale(scale),
                Ok(GameLoopCommand::Restart) => {
                    sim.restart();
                    killed = 0;
                    leaked = 0;
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    shutdown = true;
                    break;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }
        if shutdown {
            break SessionEnd::Shutdown;
        }

        // 2. Run one frame
        let now = clock.now();
        frame_loop.frame(now, sim);

        // 3. Publish the snapshot and report events
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(sim.latest_snapshot().clone());
        }
        for event in sim.drain_events() {
            match &event {
                GameEvent::EnemyKilled { .. } => killed += 1,
                GameEvent::EnemyLeaked { .. } => leaked += 1,
                _ => {}
            }
            log_event(&event);
        }

        if sim.progress().is_victory() {
            break SessionEnd::Victory;
        }
        if sim.progress().is_game_over() {
            break SessionEnd::GameOver;
        }
        if now - started >= max_seconds {
            warn!(max_seconds, "time limit reached");
            break SessionEnd::TimedOut;
        }

        // 4. Sleep until the next frame
        clock.wait();
    };

    frame_loop.stop();
    let summary = SessionSummary {
        level: sim.level_number(),
        end,
        ticks: sim.time().tick,
        progress: sim.progress().view(),
        enemies_killed: killed,
        enemies_leaked: leaked,
    };
    info!(end = ?summary.end, ticks = summary.ticks, "session finished");
    summary
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Damage(_) => {}
        GameEvent::EnemyKilled { entity, reward } => debug!(%entity, reward, "enemy killed"),
        GameEvent::EnemyLeaked { entity } => debug!(%entity, "enemy leaked"),
        GameEvent::WaveStarted { wave, enemies } => info!(wave, enemies, "wave started"),
        GameEvent::WaveCompleted { wave, reward } => info!(wave, reward, "wave completed"),
        GameEvent::Victory => info!("victory"),
        GameEvent::GameOver => info!("game over"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use bastion_core::commands::PlayerCommand;
    use bastion_core::config::parse_waves;

    const GAME_JSON: &str = include_str!("../../../data/game.json");
    const WAVES_JSON: &str = include_str!("../../../data/waves/level1.json");

    /// Advances a fixed 1/60 s per frame without sleeping.
    struct SteppedClock {
        now: f64,
    }

    impl WallClock for SteppedClock {
        fn now(&self) -> f64 {
            self.now
        }

        fn wait(&mut self) {
            self.now += 1.0 / 60.0;
        }
    }

    fn new_sim(auto_start: bool) -> Simulation {
        let data = GameData::from_json(GAME_JSON).unwrap();
        let waves = parse_waves(WAVES_JSON).unwrap();
        let config = SimConfig {
            auto_start,
            ..Default::default()
        };
        Simulation::new(data, 1, waves, config).unwrap()
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartNextWave))
            .unwrap();
        tx.send(GameLoopCommand::SetTimeScale(2.0)).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::StartNextWave)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_shutdown_stops_loop() {
        let mut sim = new_sim(false);
        let (tx, rx) = mpsc::channel();
        let latest: SharedSnapshot = Arc::new(Mutex::new(None));
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut clock = SteppedClock { now: 0.0 };
        let summary = run_game_loop(&mut sim, &rx, &latest, &mut clock, 1.0, 60.0);
        assert_eq!(summary.end, SessionEnd::Shutdown);
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn test_idle_level_times_out() {
        let mut sim = new_sim(false);
        let (_tx, rx) = mpsc::channel();
        let latest: SharedSnapshot = Arc::new(Mutex::new(None));

        let mut clock = SteppedClock { now: 0.0 };
        let summary = run_game_loop(&mut sim, &rx, &latest, &mut clock, 1.0, 2.0);
        assert_eq!(summary.end, SessionEnd::TimedOut);
        assert_eq!(summary.progress.wave, 0);
        assert!(latest.lock().unwrap().is_some());
    }

    #[test]
    fn test_undefended_run_ends_in_game_over() {
        let mut sim = new_sim(true);
        let (tx, rx) = mpsc::channel();
        let latest: SharedSnapshot = Arc::new(Mutex::new(None));
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartNextWave))
            .unwrap();
        tx.send(GameLoopCommand::SetTimeScale(4.0)).unwrap();

        let mut clock = SteppedClock { now: 0.0 };
        let summary = run_game_loop(&mut sim, &rx, &latest, &mut clock, 1.0, 900.0);
        assert_eq!(summary.end, SessionEnd::GameOver);
        assert_eq!(summary.progress.lives, 0);
        assert!(summary.enemies_leaked >= 20);

        let snapshot = latest.lock().unwrap().clone().unwrap();
        assert!(snapshot.progress.game_over);
    }
}
