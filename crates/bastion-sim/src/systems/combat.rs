//! Tower targeting and firing.
//!
//! Each tower holds a weak reference to its target. The reference is
//! revalidated every tick against the store and the tower's range; when it
//! is gone the tower acquires the nearest enemy in range. Only the nearest
//! policy is implemented: the strategy stored in `Targeting` is not consulted.

use glam::Vec2;
use tracing::debug;

use bastion_core::components::ComponentKind;
use bastion_core::constants::{COOLDOWN_EPSILON, DT};

use crate::ecs::{EntityId, World};
use crate::world_setup;

pub fn run(world: &mut World) {
    let candidates = world.query(&[ComponentKind::Stats, ComponentKind::Transform]);
    let towers = world.query(&[
        ComponentKind::Transform,
        ComponentKind::Tower,
        ComponentKind::Targeting,
    ]);

    for entity in towers {
        let idx = entity.slot();
        let (Some(transform), Some(mut tower), Some(mut targeting)) = (
            world.transforms[idx],
            world.towers[idx],
            world.targetings[idx],
        ) else {
            continue;
        };
        let origin = transform.position;

        if tower.cooldown > 0.0 {
            tower.cooldown -= DT;
        }

        targeting.target = targeting
            .target
            .filter(|&target| in_range(world, origin, tower.range, target));
        if targeting.target.is_none() {
            targeting.target = nearest_in_range(world, &candidates, origin, tower.range);
        }

        if let Some(target) = targeting.target {
            if tower.cooldown <= COOLDOWN_EPSILON {
                let projectile = world_setup::spawn_projectile(world, &tower, origin, target);
                tower.cooldown = 1.0 / tower.fire_rate;
                debug!(tower = %entity, %target, %projectile, "tower fired");
            }
        }

        world.towers[idx] = Some(tower);
        world.targetings[idx] = Some(targeting);
    }
}

fn in_range(world: &World, origin: Vec2, range: f32, target: EntityId) -> bool {
    world
        .position(target)
        .is_some_and(|pos| origin.distance(pos) <= range)
}

/// Strictly nearest candidate within `range`. Ties keep the earlier one.
pub fn nearest_in_range(
    world: &World,
    candidates: &[EntityId],
    origin: Vec2,
    range: f32,
) -> Option<EntityId> {
    let mut best: Option<(EntityId, f32)> = None;
    for &candidate in candidates {
        let Some(pos) = world.position(candidate) else {
            continue;
        };
        let distance = origin.distance(pos);
        if distance > range {
            continue;
        }
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(id, _)| id)
}
