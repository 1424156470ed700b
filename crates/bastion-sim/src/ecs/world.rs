use glam::Vec2;

use bastion_core::components::*;

use super::entity::{EntityAllocator, EntityId};

/// Lifecycle of a storage slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum SlotState {
    #[default]
    Vacant,
    /// Created this tick, invisible until the next commit.
    Pending,
    Active,
    /// Removed this tick. Treated as absent, unlinked at the next commit.
    Removing,
}

/// What a commit changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub added: usize,
    pub removed: usize,
}

/// Columnar entity store.
///
/// Each component type has its own `Vec<Option<T>>` column indexed by slot.
/// Creations and removals are buffered and applied by [`World::commit`], so a
/// query never returns an entity created during the current tick.
pub struct World {
    allocator: EntityAllocator,
    states: Vec<SlotState>,
    /// Committed entities in insertion order. Queries walk this list.
    order: Vec<EntityId>,
    pending_add: Vec<EntityId>,
    pending_remove: Vec<EntityId>,

    pub transforms: Vec<Option<Transform>>,
    pub sprites: Vec<Option<Sprite>>,
    pub path_followers: Vec<Option<PathFollower>>,
    pub stats: Vec<Option<Stats>>,
    pub towers: Vec<Option<Tower>>,
    pub targetings: Vec<Option<Targeting>>,
    pub projectiles: Vec<Option<Projectile>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            states: Vec::new(),
            order: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            transforms: Vec::new(),
            sprites: Vec::new(),
            path_followers: Vec::new(),
            stats: Vec::new(),
            towers: Vec::new(),
            targetings: Vec::new(),
            projectiles: Vec::new(),
        }
    }

    /// Allocate an entity. Components may be attached right away; the entity
    /// becomes visible to queries at the next commit.
    pub fn create_entity(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        let idx = id.slot();

        while self.states.len() <= idx {
            self.states.push(SlotState::Vacant);
            self.transforms.push(None);
            self.sprites.push(None);
            self.path_followers.push(None);
            self.stats.push(None);
            self.towers.push(None);
            self.targetings.push(None);
            self.projectiles.push(None);
        }

        self.states[idx] = SlotState::Pending;
        self.pending_add.push(id);
        id
    }

    /// Queue an entity for removal. It reads as inactive from now on and is
    /// unlinked at the next commit. Unknown, stale or already-removed ids are
    /// ignored. Returns whether the call queued anything.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        if !self.allocator.is_current(id) {
            return false;
        }
        let state = &mut self.states[id.slot()];
        match *state {
            SlotState::Pending | SlotState::Active => {
                *state = SlotState::Removing;
                self.pending_remove.push(id);
                true
            }
            SlotState::Removing | SlotState::Vacant => false,
        }
    }

    /// Apply buffered creations, then buffered removals.
    pub fn commit(&mut self) -> CommitReport {
        let mut report = CommitReport::default();

        for id in std::mem::take(&mut self.pending_add) {
            let state = &mut self.states[id.slot()];
            if *state == SlotState::Pending {
                *state = SlotState::Active;
            }
            self.order.push(id);
            report.added += 1;
        }

        let removals = std::mem::take(&mut self.pending_remove);
        if !removals.is_empty() {
            for &id in &removals {
                self.unlink(id);
            }
            let states = &self.states;
            self.order.retain(|id| states[id.slot()] != SlotState::Vacant);
            report.removed = removals.len();
        }

        report
    }

    fn unlink(&mut self, id: EntityId) {
        let idx = id.slot();
        self.states[idx] = SlotState::Vacant;
        self.transforms[idx] = None;
        self.sprites[idx] = None;
        self.path_followers[idx] = None;
        self.stats[idx] = None;
        self.towers[idx] = None;
        self.targetings[idx] = None;
        self.projectiles[idx] = None;
        self.allocator.release(id);
    }

    /// Drop every entity, including buffered ones. Outstanding handles go stale.
    pub fn clear(&mut self) {
        for index in 0..self.states.len() {
            if self.states[index] == SlotState::Vacant {
                continue;
            }
            if let Some(id) = self.allocator.current(index as u32) {
                self.unlink(id);
            }
        }
        self.order.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
    }

    /// Whether `id` is committed and not queued for removal.
    pub fn is_active(&self, id: EntityId) -> bool {
        self.allocator.is_current(id) && self.states[id.slot()] == SlotState::Active
    }

    pub fn has(&self, id: EntityId, kind: ComponentKind) -> bool {
        let idx = id.slot();
        if idx >= self.states.len() {
            return false;
        }
        match kind {
            ComponentKind::Transform => self.transforms[idx].is_some(),
            ComponentKind::Sprite => self.sprites[idx].is_some(),
            ComponentKind::PathFollower => self.path_followers[idx].is_some(),
            ComponentKind::Stats => self.stats[idx].is_some(),
            ComponentKind::Tower => self.towers[idx].is_some(),
            ComponentKind::Targeting => self.targetings[idx].is_some(),
            ComponentKind::Projectile => self.projectiles[idx].is_some(),
        }
    }

    /// Active entities holding every listed component, in insertion order.
    pub fn query(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| self.is_active(id) && kinds.iter().all(|&k| self.has(id, k)))
            .collect()
    }

    /// Every active entity, in insertion order.
    pub fn all_entities(&self) -> Vec<EntityId> {
        self.query(&[])
    }

    /// Position of an active entity. The liveness check for weak references.
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        if !self.is_active(id) {
            return None;
        }
        self.transforms[id.slot()].map(|t| t.position)
    }

    pub fn entity_count(&self) -> usize {
        self.order.iter().filter(|&&id| self.is_active(id)).count()
    }

    /// Buffered creations plus buffered removals.
    pub fn pending_count(&self) -> usize {
        self.pending_add.len() + self.pending_remove.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
