//! Simulation engine: owns the level and runs the per-tick systems.
//!
//! `Simulation` holds the entity store, the level map, the progress state and
//! the wave director, applies queued player commands at tick boundaries and
//! produces `FrameSnapshot`s. Headless, so it runs the same under the app
//! host and under tests.

use std::collections::VecDeque;

use glam::Vec2;
use tracing::{debug, info};

use bastion_core::commands::PlayerCommand;
use bastion_core::config::{GameData, GridPoint, LevelConfig, WaveConfig};
use bastion_core::constants::{STARTING_GOLD, STARTING_LIVES};
use bastion_core::enums::WavePhase;
use bastion_core::error::{BuildError, LevelError};
use bastion_core::events::GameEvent;
use bastion_core::state::{FrameSnapshot, SimTime};

use crate::clock::LoopHost;
use crate::ecs::{EntityId, World};
use crate::map::GameMap;
use crate::progress::{GameProgress, ProgressObserver};
use crate::systems::{self, wave_director::WaveDirector};
use crate::world_setup;

/// Configuration for starting a level attempt.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    pub starting_gold: u32,
    pub starting_lives: u32,
    /// Start the next wave automatically after a cleared one.
    pub auto_start: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_gold: STARTING_GOLD,
            starting_lives: STARTING_LIVES,
            auto_start: false,
        }
    }
}

pub struct Simulation {
    data: GameData,
    level_number: u32,
    level: LevelConfig,
    map: GameMap,
    world: World,
    progress: GameProgress,
    director: WaveDirector,
    time: SimTime,
    /// Last wall-clock time seen by `poll_timers`.
    wall_clock: f64,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    latest_snapshot: FrameSnapshot,
}

impl Simulation {
    /// Enter level `level_number` (1-based, wrapping). Fails without side
    /// effects if the data or wave list does not validate.
    pub fn new(
        data: GameData,
        level_number: u32,
        waves: Vec<WaveConfig>,
        config: SimConfig,
    ) -> Result<Self, LevelError> {
        data.validate()?;
        data.validate_waves(&waves)?;
        let level = data.level(level_number).ok_or(LevelError::NoLevels)?.clone();

        let map = GameMap::new(&level)?;
        let mut director = WaveDirector::new(waves);
        director.set_auto_start(config.auto_start);

        info!(
            level = level_number,
            id = level.id,
            waves = director.waves().len(),
            "level loaded"
        );

        let mut sim = Self {
            data,
            level_number,
            level,
            map,
            world: World::new(),
            progress: GameProgress::new(config.starting_gold, config.starting_lives),
            director,
            time: SimTime::default(),
            wall_clock: 0.0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            latest_snapshot: FrameSnapshot::default(),
        };
        sim.latest_snapshot = sim.snapshot(0.0);
        Ok(sim)
    }

    /// Queue a player command for the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one fixed step. While paused or after the game has ended only
    /// commands and the store commit run.
    pub fn tick(&mut self) {
        self.process_commands();

        if !self.progress.is_paused() && !self.progress.is_finished() {
            self.run_systems();
            self.time.advance();
        }

        self.world.commit();
    }

    fn run_systems(&mut self) {
        let spawn_point = self.map.spawn_point().unwrap_or(Vec2::ZERO);

        self.director.run(
            &mut self.world,
            &self.data,
            spawn_point,
            &mut self.progress,
            &mut self.events,
            self.wall_clock,
        );

        if !self.progress.is_finished() {
            systems::movement::run(
                &mut self.world,
                self.map.waypoints(),
                &mut self.progress,
                &mut self.events,
            );
            if self.progress.is_game_over() {
                self.events.push(GameEvent::GameOver);
                info!(wave = self.progress.wave(), "game over");
                return;
            }
        }

        if !self.progress.is_finished() {
            systems::combat::run(&mut self.world);
            systems::projectile::run(&mut self.world, &mut self.progress, &mut self.events);
        }
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::BuildTower { tower, cell } => {
                if let Err(error) = self.build_tower(&tower, cell) {
                    debug!(%error, %tower, "build rejected");
                }
            }
            PlayerCommand::StartNextWave => {
                self.start_next_wave();
            }
            PlayerCommand::SetAutoStart { enabled } => self.set_auto_start(enabled),
            PlayerCommand::Pause => self.set_paused(true),
            PlayerCommand::Resume => self.set_paused(false),
        }
    }

    /// Build a tower on `cell`. A rejected build changes nothing. The tower
    /// joins the simulation at the next commit. No builds after game over
    /// or victory.
    pub fn build_tower(&mut self, kind: &str, cell: GridPoint) -> Result<EntityId, BuildError> {
        if self.progress.is_finished() {
            return Err(BuildError::GameEnded);
        }
        let config = self
            .data
            .tower(kind)
            .ok_or_else(|| BuildError::UnknownTower(kind.to_string()))?;

        if !self.map.contains(cell) {
            return Err(BuildError::OutOfBounds(cell));
        }
        if !self.map.is_buildable(cell) {
            return Err(BuildError::NotBuildable(cell));
        }
        if self.map.is_occupied(cell) {
            return Err(BuildError::Occupied(cell));
        }
        if !self.progress.spend_gold(config.cost) {
            return Err(BuildError::InsufficientGold {
                gold: self.progress.gold(),
                cost: config.cost,
            });
        }

        let at = self.map.cell_center(cell);
        let entity = world_setup::spawn_tower(&mut self.world, config, at);
        self.map.set_occupied(cell);
        debug!(%entity, kind, x = cell.x, y = cell.y, "tower built");
        Ok(entity)
    }

    /// Start the next wave. No-op while a wave runs, once waves are
    /// exhausted, or after the game has ended.
    pub fn start_next_wave(&mut self) -> bool {
        self.director
            .start_next_wave(&mut self.progress, &mut self.events)
    }

    pub fn set_auto_start(&mut self, enabled: bool) {
        self.director.set_auto_start(enabled);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.progress.set_paused(paused);
    }

    /// Feed the host wall clock (seconds) and fire due timers.
    pub fn poll_timers(&mut self, now: f64) {
        self.wall_clock = now;
        self.director
            .poll_auto_start(now, &mut self.progress, &mut self.events);
    }

    /// Restart the current level from scratch.
    pub fn restart(&mut self) {
        let auto_start = self.director.auto_start();
        self.director = WaveDirector::new(self.director.waves().to_vec());
        self.director.set_auto_start(auto_start);
        self.world.clear();
        self.map.clear_occupied();
        self.progress.reset();
        self.time = SimTime::default();
        self.command_queue.clear();
        self.events.clear();
        self.latest_snapshot = self.snapshot(0.0);
        info!(level = self.level_number, "level restarted");
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self, alpha: f64) -> FrameSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            self.time,
            alpha,
            self.progress.view(),
            self.director.phase(),
        )
    }

    /// Snapshot stored by the last `render`.
    pub fn latest_snapshot(&self) -> &FrameSnapshot {
        &self.latest_snapshot
    }

    pub fn subscribe_progress(&mut self, observer: ProgressObserver) {
        self.progress.subscribe(observer);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn wave_phase(&self) -> WavePhase {
        self.director.phase()
    }

    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }
}

impl LoopHost for Simulation {
    fn update(&mut self) {
        self.tick();
    }

    fn render(&mut self, alpha: f64) {
        self.latest_snapshot = self.snapshot(alpha);
    }

    fn poll(&mut self, now: f64) {
        self.poll_timers(now);
    }
}
