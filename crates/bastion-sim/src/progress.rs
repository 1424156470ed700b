//! Global progress state: gold, lives, wave counter and the terminal flags.
//!
//! Mutated only by the simulation. Observers are a UI side channel and are
//! notified synchronously after every change; the simulation never reads
//! anything back from them.

use bastion_core::constants::{STARTING_GOLD, STARTING_LIVES};
use bastion_core::enums::ProgressEvent;
use bastion_core::state::ProgressView;

pub type ProgressObserver = Box<dyn FnMut(ProgressEvent, &ProgressView)>;

pub struct GameProgress {
    starting_gold: u32,
    starting_lives: u32,
    gold: u32,
    lives: u32,
    wave: u32,
    paused: bool,
    game_over: bool,
    victory: bool,
    observers: Vec<ProgressObserver>,
}

impl GameProgress {
    pub fn new(starting_gold: u32, starting_lives: u32) -> Self {
        Self {
            starting_gold,
            starting_lives,
            gold: starting_gold,
            lives: starting_lives,
            wave: 0,
            paused: false,
            game_over: false,
            victory: false,
            observers: Vec::new(),
        }
    }

    /// Restore starting gold and lives, zero the wave counter, clear flags.
    pub fn reset(&mut self) {
        self.gold = self.starting_gold;
        self.lives = self.starting_lives;
        self.wave = 0;
        self.paused = false;
        self.game_over = false;
        self.victory = false;
        self.notify(ProgressEvent::Reset);
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
        self.notify(ProgressEvent::GoldAdded(amount));
    }

    /// Deduct `amount` if affordable. On `false` nothing changed.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        self.notify(ProgressEvent::GoldSpent(amount));
        true
    }

    /// Lose lives, clamped at zero. Game over is set on reaching zero.
    pub fn take_damage(&mut self, amount: u32) {
        let lost = amount.min(self.lives);
        self.lives -= lost;
        self.notify(ProgressEvent::LivesLost(lost));
        if self.lives == 0 && !self.game_over {
            self.game_over = true;
            self.notify(ProgressEvent::GameOver);
        }
    }

    pub fn advance_wave(&mut self) {
        self.wave += 1;
        self.notify(ProgressEvent::WaveAdvanced(self.wave));
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            self.paused = paused;
            self.notify(ProgressEvent::PausedChanged(paused));
        }
    }

    /// Victory is permanent for the attempt.
    pub fn set_victory(&mut self) {
        if !self.victory {
            self.victory = true;
            self.notify(ProgressEvent::Victory);
        }
    }

    pub fn subscribe(&mut self, observer: ProgressObserver) {
        self.observers.push(observer);
    }

    pub fn view(&self) -> ProgressView {
        ProgressView {
            gold: self.gold,
            lives: self.lives,
            wave: self.wave,
            paused: self.paused,
            game_over: self.game_over,
            victory: self.victory,
        }
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_victory(&self) -> bool {
        self.victory
    }

    /// Game over or victory: gameplay state no longer changes.
    pub fn is_finished(&self) -> bool {
        self.game_over || self.victory
    }

    fn notify(&mut self, event: ProgressEvent) {
        let view = self.view();
        for observer in &mut self.observers {
            observer(event, &view);
        }
    }
}

impl Default for GameProgress {
    fn default() -> Self {
        Self::new(STARTING_GOLD, STARTING_LIVES)
    }
}

impl std::fmt::Debug for GameProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameProgress")
            .field("view", &self.view())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn defaults() {
        let progress = GameProgress::default();
        assert_eq!(progress.gold(), 100);
        assert_eq!(progress.lives(), 20);
        assert_eq!(progress.wave(), 0);
        assert!(!progress.is_finished());
    }

    #[test]
    fn spend_gold_rejects_when_short() {
        let mut progress = GameProgress::new(30, 20);
        assert!(!progress.spend_gold(31));
        assert_eq!(progress.gold(), 30);
        assert!(progress.spend_gold(30));
        assert_eq!(progress.gold(), 0);
        assert!(progress.spend_gold(0));
    }

    #[test]
    fn take_damage_clamps_and_sets_game_over() {
        let mut progress = GameProgress::new(0, 3);
        progress.take_damage(1);
        assert_eq!(progress.lives(), 2);
        assert!(!progress.is_game_over());

        progress.take_damage(5);
        assert_eq!(progress.lives(), 0);
        assert!(progress.is_game_over());
        assert!(progress.is_finished());
    }

    #[test]
    fn reset_restores_start() {
        let mut progress = GameProgress::new(50, 5);
        progress.add_gold(25);
        progress.take_damage(5);
        progress.advance_wave();
        progress.set_paused(true);
        progress.set_victory();

        progress.reset();
        assert_eq!(progress.view(), GameProgress::new(50, 5).view());
    }

    #[test]
    fn observers_see_every_change() {
        let seen: Rc<RefCell<Vec<(ProgressEvent, u32)>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut progress = GameProgress::new(10, 1);
        progress.subscribe(Box::new(move |event, view| {
            sink.borrow_mut().push((event, view.gold));
        }));

        progress.add_gold(5);
        assert!(!progress.spend_gold(100));
        progress.spend_gold(15);
        progress.take_damage(1);

        assert_eq!(
            *seen.borrow(),
            vec![
                (ProgressEvent::GoldAdded(5), 15),
                (ProgressEvent::GoldSpent(15), 0),
                (ProgressEvent::LivesLost(1), 0),
                (ProgressEvent::GameOver, 0),
            ]
        );
    }
}
