//! Homing projectiles: chase the locked target, resolve impact, apply
//! direct or splash damage.

use glam::Vec2;
use tracing::debug;

use bastion_core::components::ComponentKind;
use bastion_core::constants::DT;
use bastion_core::events::{DamageNotification, GameEvent};

use crate::ecs::{EntityId, World};
use crate::progress::GameProgress;

pub fn run(world: &mut World, progress: &mut GameProgress, events: &mut Vec<GameEvent>) {
    let victims = world.query(&[ComponentKind::Transform, ComponentKind::Stats]);

    for entity in world.query(&[ComponentKind::Transform, ComponentKind::Projectile]) {
        let idx = entity.slot();
        let (Some(transform), Some(projectile)) = (world.transforms[idx], world.projectiles[idx])
        else {
            continue;
        };

        let Some(target_pos) = projectile.target.and_then(|t| world.position(t)) else {
            // Target gone: fizzle.
            world.remove_entity(entity);
            continue;
        };

        let offset = target_pos - transform.position;
        let distance = offset.length();
        let step = projectile.speed * DT;

        if distance <= step || distance < projectile.hit_radius {
            if let Some(t) = world.transforms[idx].as_mut() {
                t.position = target_pos;
            }
            if projectile.splash_radius > 0.0 {
                for &victim in &victims {
                    let in_splash = world
                        .position(victim)
                        .is_some_and(|pos| pos.distance(target_pos) <= projectile.splash_radius);
                    if in_splash {
                        apply_damage(world, victim, projectile.damage, progress, events);
                    }
                }
            } else if let Some(target) = projectile.target {
                apply_damage(world, target, projectile.damage, progress, events);
            }
            world.remove_entity(entity);
        } else if let Some(t) = world.transforms[idx].as_mut() {
            t.position += offset / distance * step;
            t.rotation = offset.y.atan2(offset.x);
        }
    }
}

/// Subtract `amount` hp from an active entity with stats. At or below zero
/// the entity is removed and its reward paid. Returns whether it died.
pub fn apply_damage(
    world: &mut World,
    target: EntityId,
    amount: f32,
    progress: &mut GameProgress,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(position) = world.position(target) else {
        return false;
    };
    let Some(stats) = world.stats[target.slot()].as_mut() else {
        return false;
    };

    stats.hp -= amount;
    let (hp, reward) = (stats.hp, stats.reward);
    events.push(GameEvent::Damage(notification(position, amount)));

    if hp > 0.0 {
        return false;
    }
    world.remove_entity(target);
    progress.add_gold(reward);
    events.push(GameEvent::EnemyKilled {
        entity: target,
        reward,
    });
    debug!(%target, reward, gold = progress.gold(), "enemy killed");
    true
}

fn notification(at: Vec2, amount: f32) -> DamageNotification {
    DamageNotification {
        x: at.x,
        y: at.y,
        amount,
    }
}
