pub use bastion_core::entity::EntityId;

/// Hands out generational slots. A released slot is recycled with its
/// generation bumped, so stale handles never match the new occupant.
pub struct EntityAllocator {
    generations: Vec<u32>,
    free_indices: Vec<u32>,
    next_index: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_indices: Vec::new(),
            next_index: 0,
        }
    }

    pub fn allocate(&mut self) -> EntityId {
        if let Some(index) = self.free_indices.pop() {
            let generation = self.generations[index as usize];
            EntityId::new(index, generation)
        } else {
            let index = self.next_index;
            self.next_index += 1;
            self.generations.push(0);
            EntityId::new(index, 0)
        }
    }

    /// Return a slot to the free list. Ignored for stale handles.
    pub fn release(&mut self, id: EntityId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.generations[id.slot()] += 1;
        self.free_indices.push(id.index);
        true
    }

    /// Whether `id` names the slot's current generation.
    pub fn is_current(&self, id: EntityId) -> bool {
        self.generations.get(id.slot()) == Some(&id.generation)
    }

    /// Current handle for a slot, if the slot was ever allocated.
    pub fn current(&self, index: u32) -> Option<EntityId> {
        self.generations
            .get(index as usize)
            .map(|&generation| EntityId::new(index, generation))
    }

    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
