//! Entity spawn factories.
//!
//! Each factory creates the entity and attaches its full component bundle.
//! The new entity joins queries at the next commit.

use glam::Vec2;

use bastion_core::components::*;
use bastion_core::config::{EnemyConfig, TowerConfig};
use bastion_core::constants::{PROJECTILE_COLOR, PROJECTILE_HIT_RADIUS, PROJECTILE_SIZE, TOWER_SIZE};

use crate::ecs::{EntityId, World};

/// Spawn an enemy at `at`, sized and statted from its configuration.
pub fn spawn_enemy(world: &mut World, config: &EnemyConfig, at: Vec2) -> EntityId {
    let id = world.create_entity();
    let idx = id.slot();
    world.transforms[idx] = Some(Transform::at(at));
    world.sprites[idx] = Some(Sprite {
        color: config.color.clone(),
        size: config.radius * 2.0,
        texture: config.texture.clone(),
    });
    world.path_followers[idx] = Some(PathFollower::new(config.speed));
    world.stats[idx] = Some(Stats {
        hp: config.hp,
        max_hp: config.hp,
        reward: config.reward,
    });
    id
}

/// Spawn a tower at `at` with a ready cooldown and nearest-first targeting.
pub fn spawn_tower(world: &mut World, config: &TowerConfig, at: Vec2) -> EntityId {
    let id = world.create_entity();
    let idx = id.slot();
    world.transforms[idx] = Some(Transform::at(at));
    world.sprites[idx] = Some(Sprite {
        color: config.color.clone(),
        size: TOWER_SIZE,
        texture: config.texture.clone(),
    });
    world.towers[idx] = Some(Tower {
        range: config.range,
        damage: config.damage,
        fire_rate: config.fire_rate,
        projectile_speed: config.projectile_speed,
        splash_radius: config.splash_radius,
        cooldown: 0.0,
    });
    world.targetings[idx] = Some(Targeting::default());
    id
}

/// Spawn a projectile fired by `tower` at `target`.
pub fn spawn_projectile(world: &mut World, tower: &Tower, at: Vec2, target: EntityId) -> EntityId {
    let id = world.create_entity();
    let idx = id.slot();
    world.transforms[idx] = Some(Transform::at(at));
    world.sprites[idx] = Some(Sprite {
        color: PROJECTILE_COLOR.to_string(),
        size: PROJECTILE_SIZE,
        texture: None,
    });
    world.projectiles[idx] = Some(Projectile {
        damage: tower.damage,
        target: Some(target),
        speed: tower.projectile_speed,
        hit_radius: PROJECTILE_HIT_RADIUS,
        splash_radius: tower.splash_radius,
    });
    id
}
