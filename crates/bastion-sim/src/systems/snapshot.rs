//! Snapshot system: builds the render-facing `FrameSnapshot`.
//!
//! Read-only. Only committed, active entities appear.

use bastion_core::components::ComponentKind;
use bastion_core::enums::{EntityRole, WavePhase};
use bastion_core::state::{EntityView, FrameSnapshot, ProgressView, SimTime, VisualView};

use crate::ecs::{EntityId, World};

pub fn build_snapshot(
    world: &World,
    time: SimTime,
    alpha: f64,
    progress: ProgressView,
    wave_phase: WavePhase,
) -> FrameSnapshot {
    let entities = world
        .query(&[ComponentKind::Transform])
        .into_iter()
        .filter_map(|id| build_entity(world, id))
        .collect();

    FrameSnapshot {
        time,
        alpha,
        progress,
        wave_phase,
        entities,
    }
}

fn role_of(world: &World, id: EntityId) -> Option<EntityRole> {
    if world.has(id, ComponentKind::Tower) {
        Some(EntityRole::Tower)
    } else if world.has(id, ComponentKind::Projectile) {
        Some(EntityRole::Projectile)
    } else if world.has(id, ComponentKind::PathFollower) {
        Some(EntityRole::Enemy)
    } else {
        None
    }
}

fn build_entity(world: &World, id: EntityId) -> Option<EntityView> {
    let idx = id.slot();
    let role = role_of(world, id)?;
    let transform = world.transforms[idx]?;

    let visual = match &world.sprites[idx] {
        Some(sprite) => VisualView {
            texture: sprite.texture.clone(),
            color: sprite.color.clone(),
            size: sprite.size,
        },
        None => VisualView {
            texture: None,
            color: "white".to_string(),
            size: 1.0,
        },
    };

    let hp_ratio = world.stats[idx].map(|s| {
        if s.max_hp > 0.0 {
            (s.hp / s.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    });

    Some(EntityView {
        id,
        role,
        position: transform.position,
        rotation: transform.rotation,
        scale: transform.scale,
        hp_ratio,
        visual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::components::{PathFollower, Sprite, Stats, Transform};
    use glam::Vec2;

    #[test]
    fn snapshot_lists_committed_entities_only() {
        let mut world = World::new();
        let e = world.create_entity();
        world.transforms[e.slot()] = Some(Transform::at(Vec2::new(3.0, 4.0)));
        world.path_followers[e.slot()] = Some(PathFollower::new(10.0));
        world.stats[e.slot()] = Some(Stats {
            hp: 5.0,
            max_hp: 20.0,
            reward: 1,
        });
        world.sprites[e.slot()] = Some(Sprite {
            color: "green".into(),
            size: 16.0,
            texture: Some("enemy.png".into()),
        });

        let before = build_snapshot(&world, SimTime::default(), 0.0, ProgressView::default(), WavePhase::Idle);
        assert!(before.entities.is_empty());

        world.commit();
        let snap = build_snapshot(&world, SimTime::default(), 0.25, ProgressView::default(), WavePhase::Spawning);
        assert_eq!(snap.entities.len(), 1);
        let view = &snap.entities[0];
        assert_eq!(view.role, EntityRole::Enemy);
        assert_eq!(view.position, Vec2::new(3.0, 4.0));
        assert_eq!(view.hp_ratio, Some(0.25));
        assert_eq!(view.visual.texture.as_deref(), Some("enemy.png"));
        assert_eq!(snap.alpha, 0.25);
        assert_eq!(snap.count_role(EntityRole::Enemy), 1);
    }
}
