//! Wave director: sequences enemy spawning segment by segment, detects wave
//! completion, pays the completion reward and schedules auto-start.

use glam::Vec2;
use tracing::{debug, info, warn};

use bastion_core::components::ComponentKind;
use bastion_core::config::{GameData, WaveConfig};
use bastion_core::constants::{AUTO_START_DELAY_SECS, DT, WAVE_BASE_REWARD, WAVE_INTEREST_DIVISOR};
use bastion_core::enums::WavePhase;
use bastion_core::events::GameEvent;

use crate::ecs::World;
use crate::progress::GameProgress;
use crate::world_setup;

/// Gold paid for clearing a wave: a flat amount plus 10% interest.
pub fn completion_reward(gold: u32) -> u32 {
    WAVE_BASE_REWARD + gold / WAVE_INTEREST_DIVISOR
}

#[derive(Debug, Clone)]
pub struct WaveDirector {
    waves: Vec<WaveConfig>,
    /// Index of the wave that started last.
    current: Option<usize>,
    segment: usize,
    spawned_in_segment: u32,
    segment_timer: f32,
    spawning_done: bool,
    phase: WavePhase,
    auto_start: bool,
    /// Wall-clock time at which a scheduled auto-start fires.
    auto_start_at: Option<f64>,
}

impl WaveDirector {
    pub fn new(waves: Vec<WaveConfig>) -> Self {
        Self {
            waves,
            current: None,
            segment: 0,
            spawned_in_segment: 0,
            segment_timer: 0.0,
            spawning_done: false,
            phase: WavePhase::Idle,
            auto_start: false,
            auto_start_at: None,
        }
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == WavePhase::Spawning
    }

    pub fn waves(&self) -> &[WaveConfig] {
        &self.waves
    }

    /// Waves not started yet.
    pub fn remaining(&self) -> usize {
        self.waves.len() - self.current.map_or(0, |i| i + 1)
    }

    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    /// Disabling auto-start also drops a pending scheduled start.
    pub fn set_auto_start(&mut self, enabled: bool) {
        self.auto_start = enabled;
        if !enabled {
            self.auto_start_at = None;
        }
    }

    pub fn auto_start_at(&self) -> Option<f64> {
        self.auto_start_at
    }

    /// Begin the next configured wave. Returns `false` without changing
    /// anything if a wave is active, no wave is left, or the game has ended.
    pub fn start_next_wave(&mut self, progress: &mut GameProgress, events: &mut Vec<GameEvent>) -> bool {
        if self.is_active() || progress.is_finished() {
            return false;
        }
        let next = self.current.map_or(0, |i| i + 1);
        let Some(wave) = self.waves.get(next) else {
            debug!("no waves left to start");
            return false;
        };
        let enemies = wave.total_enemies();

        self.current = Some(next);
        self.segment = 0;
        self.spawned_in_segment = 0;
        self.segment_timer = 0.0;
        self.spawning_done = false;
        self.phase = WavePhase::Spawning;

        progress.advance_wave();
        let number = progress.wave();
        events.push(GameEvent::WaveStarted {
            wave: number,
            enemies,
        });
        info!(wave = number, enemies, "wave started");
        true
    }

    /// Fire a scheduled auto-start whose time has come. The start is
    /// re-checked here: it is dropped if a wave was started manually in the
    /// meantime or the game has ended.
    pub fn poll_auto_start(
        &mut self,
        now: f64,
        progress: &mut GameProgress,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        match self.auto_start_at {
            Some(at) if now >= at => {
                self.auto_start_at = None;
                if self.is_active() || progress.is_finished() {
                    debug!("scheduled wave start dropped");
                    return false;
                }
                self.start_next_wave(progress, events)
            }
            _ => false,
        }
    }

    /// One tick: spawn from the current segment, then check for completion.
    /// `now` is the host wall clock, used only to schedule auto-start.
    pub fn run(
        &mut self,
        world: &mut World,
        data: &GameData,
        spawn_point: Vec2,
        progress: &mut GameProgress,
        events: &mut Vec<GameEvent>,
        now: f64,
    ) {
        if !self.is_active() {
            return;
        }
        let Some(wave_index) = self.current else {
            return;
        };

        if !self.spawning_done {
            self.spawn_step(world, data, spawn_point, wave_index);
        }

        if self.spawning_done
            && world
                .query(&[ComponentKind::Stats, ComponentKind::PathFollower])
                .is_empty()
        {
            self.complete(wave_index, progress, events, now);
        }
    }

    fn spawn_step(&mut self, world: &mut World, data: &GameData, spawn_point: Vec2, wave_index: usize) {
        let segments = &self.waves[wave_index].segments;

        while self
            .segments_left(wave_index)
            .is_some_and(|s| segments[s].count == 0)
        {
            self.segment += 1;
        }
        let Some(s) = self.segments_left(wave_index) else {
            self.spawning_done = true;
            return;
        };
        let segment = &segments[s];

        self.segment_timer += DT;
        if self.segment_timer < segment.interval {
            return;
        }
        self.segment_timer = 0.0;

        match data.enemy(&segment.enemy_id) {
            Some(config) => {
                let entity = world_setup::spawn_enemy(world, config, spawn_point);
                debug!(%entity, kind = %segment.enemy_id, "enemy spawned");
            }
            None => warn!(kind = %segment.enemy_id, "unknown enemy kind, spawn skipped"),
        }

        self.spawned_in_segment += 1;
        if self.spawned_in_segment >= segment.count {
            self.segment += 1;
            self.spawned_in_segment = 0;
        }
    }

    fn segments_left(&self, wave_index: usize) -> Option<usize> {
        (self.segment < self.waves[wave_index].segments.len()).then_some(self.segment)
    }

    fn complete(
        &mut self,
        wave_index: usize,
        progress: &mut GameProgress,
        events: &mut Vec<GameEvent>,
        now: f64,
    ) {
        let reward = completion_reward(progress.gold());
        progress.add_gold(reward);
        let wave = progress.wave();
        events.push(GameEvent::WaveCompleted { wave, reward });
        info!(wave, reward, gold = progress.gold(), "wave complete");

        if wave_index + 1 >= self.waves.len() {
            self.phase = WavePhase::Complete;
            progress.set_victory();
            events.push(GameEvent::Victory);
            info!("all waves cleared, victory");
            return;
        }

        self.phase = WavePhase::BetweenWaves;
        if self.auto_start {
            self.auto_start_at = Some(now + AUTO_START_DELAY_SECS);
            debug!(at = now + AUTO_START_DELAY_SECS, "next wave scheduled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::config::{EnemyConfig, WaveSegment};

    fn data() -> GameData {
        let enemy = |id: &str, hp: f32| EnemyConfig {
            id: id.into(),
            name: id.into(),
            speed: 0.0,
            hp,
            reward: 1,
            color: "red".into(),
            radius: 8.0,
            texture: None,
        };
        GameData {
            towers: Vec::new(),
            enemies: vec![enemy("grunt", 10.0), enemy("brute", 50.0)],
            levels: Vec::new(),
        }
    }

    fn segment(enemy_id: &str, count: u32, interval: f32) -> WaveSegment {
        WaveSegment {
            enemy_id: enemy_id.into(),
            count,
            interval,
        }
    }

    fn wave(id: u32, segments: Vec<WaveSegment>) -> WaveConfig {
        WaveConfig {
            id,
            segments,
            delay_before: 0.0,
        }
    }

    struct Rig {
        world: World,
        data: GameData,
        progress: GameProgress,
        events: Vec<GameEvent>,
        director: WaveDirector,
    }

    impl Rig {
        fn new(waves: Vec<WaveConfig>) -> Self {
            Self {
                world: World::new(),
                data: data(),
                progress: GameProgress::default(),
                events: Vec::new(),
                director: WaveDirector::new(waves),
            }
        }

        fn start(&mut self) -> bool {
            self.director.start_next_wave(&mut self.progress, &mut self.events)
        }

        fn tick(&mut self, now: f64) {
            self.director.run(
                &mut self.world,
                &self.data,
                Vec2::ZERO,
                &mut self.progress,
                &mut self.events,
                now,
            );
            self.world.commit();
        }

        fn enemies(&self) -> Vec<f32> {
            self.world
                .query(&[ComponentKind::Stats])
                .iter()
                .map(|e| self.world.stats[e.slot()].unwrap().max_hp)
                .collect()
        }

        fn kill_all(&mut self) {
            for e in self.world.query(&[ComponentKind::Stats]) {
                self.world.remove_entity(e);
            }
            self.world.commit();
        }
    }

    #[test]
    fn spawns_segments_in_order() {
        let mut rig = Rig::new(vec![wave(
            1,
            vec![segment("grunt", 2, 0.0), segment("brute", 1, 0.0)],
        )]);
        assert!(rig.start());
        assert_eq!(rig.progress.wave(), 1);

        for _ in 0..10 {
            rig.tick(0.0);
        }
        assert_eq!(rig.enemies(), vec![10.0, 10.0, 50.0]);
        assert_eq!(rig.director.phase(), WavePhase::Spawning);
    }

    #[test]
    fn interval_paces_spawns() {
        let mut rig = Rig::new(vec![wave(1, vec![segment("grunt", 3, 0.5)])]);
        rig.start();
        for _ in 0..29 {
            rig.tick(0.0);
        }
        assert_eq!(rig.enemies().len(), 0);
        for _ in 0..3 {
            rig.tick(0.0);
        }
        assert_eq!(rig.enemies().len(), 1);
    }

    #[test]
    fn zero_count_segment_spawns_nothing() {
        let mut rig = Rig::new(vec![wave(
            1,
            vec![segment("brute", 0, 0.0), segment("grunt", 1, 0.0)],
        )]);
        rig.start();
        for _ in 0..5 {
            rig.tick(0.0);
        }
        assert_eq!(rig.enemies(), vec![10.0]);
    }

    #[test]
    fn completes_only_when_enemies_gone() {
        let mut rig = Rig::new(vec![
            wave(1, vec![segment("grunt", 1, 0.0)]),
            wave(2, vec![segment("grunt", 1, 0.0)]),
        ]);
        rig.start();
        for _ in 0..5 {
            rig.tick(0.0);
        }
        assert_eq!(rig.director.phase(), WavePhase::Spawning);

        rig.kill_all();
        rig.tick(0.0);
        assert_eq!(rig.director.phase(), WavePhase::BetweenWaves);
        // 100 + 100 / 10
        assert_eq!(rig.progress.gold(), 210);
        assert!(rig
            .events
            .contains(&GameEvent::WaveCompleted { wave: 1, reward: 110 }));
    }

    #[test]
    fn start_is_noop_while_active() {
        let mut rig = Rig::new(vec![
            wave(1, vec![segment("grunt", 1, 0.0)]),
            wave(2, vec![segment("grunt", 1, 0.0)]),
        ]);
        assert!(rig.start());
        assert!(!rig.start());
        assert_eq!(rig.progress.wave(), 1);
        assert_eq!(rig.director.remaining(), 1);
    }

    #[test]
    fn final_wave_grants_victory() {
        let mut rig = Rig::new(vec![wave(1, vec![segment("grunt", 1, 0.0)])]);
        rig.start();
        rig.tick(0.0);
        rig.kill_all();
        rig.tick(0.0);
        rig.tick(0.0);

        assert_eq!(rig.director.phase(), WavePhase::Complete);
        assert!(rig.progress.is_victory());
        assert!(!rig.start(), "no waves left");
        assert_eq!(
            rig.events
                .iter()
                .filter(|e| matches!(e, GameEvent::WaveCompleted { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn auto_start_fires_after_delay() {
        let mut rig = Rig::new(vec![
            wave(1, Vec::new()),
            wave(2, vec![segment("grunt", 1, 0.0)]),
        ]);
        rig.director.set_auto_start(true);
        rig.start();
        rig.tick(10.0);
        assert_eq!(rig.director.phase(), WavePhase::BetweenWaves);
        assert_eq!(rig.director.auto_start_at(), Some(13.0));

        assert!(!rig
            .director
            .poll_auto_start(12.9, &mut rig.progress, &mut rig.events));
        assert!(rig
            .director
            .poll_auto_start(13.0, &mut rig.progress, &mut rig.events));
        assert_eq!(rig.progress.wave(), 2);
        assert!(rig.director.is_active());
    }

    #[test]
    fn auto_start_dropped_after_manual_start() {
        let mut rig = Rig::new(vec![
            wave(1, Vec::new()),
            wave(2, vec![segment("grunt", 1, 0.0)]),
            wave(3, vec![segment("grunt", 1, 0.0)]),
        ]);
        rig.director.set_auto_start(true);
        rig.start();
        rig.tick(0.0);
        assert!(rig.start(), "manual start during the delay");

        assert!(!rig
            .director
            .poll_auto_start(5.0, &mut rig.progress, &mut rig.events));
        assert_eq!(rig.progress.wave(), 2);
        assert_eq!(rig.director.auto_start_at(), None);
    }

    #[test]
    fn auto_start_dropped_after_game_over() {
        let mut rig = Rig::new(vec![wave(1, Vec::new()), wave(2, Vec::new())]);
        rig.director.set_auto_start(true);
        rig.start();
        rig.tick(0.0);
        rig.progress.take_damage(20);

        assert!(!rig
            .director
            .poll_auto_start(3.0, &mut rig.progress, &mut rig.events));
        assert_eq!(rig.progress.wave(), 1);
    }

    #[test]
    fn completion_reward_floors_interest() {
        assert_eq!(completion_reward(0), 100);
        assert_eq!(completion_reward(9), 100);
        assert_eq!(completion_reward(155), 115);
    }
}
