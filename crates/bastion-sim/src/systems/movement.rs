//! Path following: moves enemies along the level's waypoints in order.

use glam::Vec2;
use tracing::debug;

use bastion_core::components::ComponentKind;
use bastion_core::constants::{DT, LEAK_DAMAGE};
use bastion_core::events::GameEvent;

use crate::ecs::World;
use crate::progress::GameProgress;

/// Advance every path follower by one tick. An enemy with no waypoint left
/// ahead of it is removed and costs the player a life.
pub fn run(
    world: &mut World,
    waypoints: &[Vec2],
    progress: &mut GameProgress,
    events: &mut Vec<GameEvent>,
) {
    for entity in world.query(&[ComponentKind::Transform, ComponentKind::PathFollower]) {
        let idx = entity.slot();
        let (Some(transform), Some(follower)) =
            (&mut world.transforms[idx], &mut world.path_followers[idx])
        else {
            continue;
        };
        if follower.reached_end {
            continue;
        }

        let Some(&next) = waypoints.get(follower.waypoint_index + 1) else {
            follower.reached_end = true;
            world.remove_entity(entity);
            progress.take_damage(LEAK_DAMAGE);
            events.push(GameEvent::EnemyLeaked { entity });
            debug!(%entity, lives = progress.lives(), "enemy leaked");
            continue;
        };

        let offset = next - transform.position;
        let distance = offset.length();
        let step = follower.speed * DT;

        if distance <= step {
            transform.position = next;
            follower.waypoint_index += 1;
        } else {
            transform.position += offset / distance * step;
            transform.rotation = offset.y.atan2(offset.x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::components::{PathFollower, Transform};

    fn path() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]
    }

    fn spawn(world: &mut World, speed: f32) -> crate::ecs::EntityId {
        let e = world.create_entity();
        world.transforms[e.slot()] = Some(Transform::at(Vec2::ZERO));
        world.path_followers[e.slot()] = Some(PathFollower::new(speed));
        world.commit();
        e
    }

    #[test]
    fn moves_toward_next_waypoint() {
        let mut world = World::new();
        let mut progress = GameProgress::default();
        let mut events = Vec::new();
        let e = spawn(&mut world, 60.0);

        run(&mut world, &path(), &mut progress, &mut events);
        let pos = world.transforms[e.slot()].unwrap().position;
        assert!((pos.x - 1.0).abs() < 1e-5);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn snaps_and_advances_waypoint() {
        let mut world = World::new();
        let mut progress = GameProgress::default();
        let mut events = Vec::new();
        let e = spawn(&mut world, 600.0);

        run(&mut world, &path(), &mut progress, &mut events);
        assert_eq!(world.transforms[e.slot()].unwrap().position, Vec2::new(10.0, 0.0));
        assert_eq!(world.path_followers[e.slot()].unwrap().waypoint_index, 1);
    }

    #[test]
    fn end_of_path_costs_one_life() {
        let mut world = World::new();
        let mut progress = GameProgress::default();
        let mut events = Vec::new();
        let e = spawn(&mut world, 6000.0);

        run(&mut world, &path(), &mut progress, &mut events);
        run(&mut world, &path(), &mut progress, &mut events);
        assert_eq!(progress.lives(), 20, "reaching the last waypoint is not yet a leak");

        run(&mut world, &path(), &mut progress, &mut events);
        assert_eq!(progress.lives(), 19);
        assert!(!world.is_active(e));
        assert_eq!(events, vec![GameEvent::EnemyLeaked { entity: e }]);

        // Removed this tick: a later pass must not charge again.
        run(&mut world, &path(), &mut progress, &mut events);
        world.commit();
        run(&mut world, &path(), &mut progress, &mut events);
        assert_eq!(progress.lives(), 19);
    }
}
