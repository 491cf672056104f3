//! Per-tick combat orchestration
//!
//! The order is load-bearing: move, aim, fire/plant, advance projectiles and
//! bombs, resolve collisions, evaluate win/loss. Firing before moving would
//! let a tank shoot from a position it never reached; colliding before
//! moving would use stale geometry.

use glam::Vec2;

use crate::consts::*;
use crate::sim::state::{GameState, Outcome, TickInput};
use crate::sim::tank::{Direction, Tank};
use crate::sim::variant::AimMode;

/// Pool slot address: `(owner, slot)` where owner 0 is the player and
/// `i + 1` is `enemies[i]`. Owners and slots are stable across a level.
type SlotKey = (usize, usize);

/// Advance the whole simulation by one tick. A terminal outcome freezes the
/// state; further calls are no-ops.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.outcome != Outcome::Playing {
        return;
    }
    state.time_ticks += 1;
    let now = state.time_ticks;
    let arena = state.arena();

    tick_cooldowns(state);
    move_player(state, input, arena);
    navigate_enemies(state, arena);
    aim_tanks(state, input);
    fire_and_plant(state, input, now, arena);
    advance_entities(state, now, arena);
    resolve_ammo_pairs(state);
    resolve_ammo_bombs(state);
    resolve_ammo_tank_hits(state);
    resolve_bomb_blasts(state);
    evaluate_outcome(state);
}

fn tick_cooldowns(state: &mut GameState) {
    for tank in std::iter::once(&mut state.player).chain(state.enemies.iter_mut()) {
        tank.fire_cooldown_left = tank.fire_cooldown_left.saturating_sub(1);
        tank.plant_cooldown_left = tank.plant_cooldown_left.saturating_sub(1);
    }
}

fn move_player(state: &mut GameState, input: &TickInput, arena: Vec2) {
    let dx = input.right as i32 - input.left as i32;
    let dy = input.down as i32 - input.up as i32;
    if let Some(dir) = Direction::from_steps(dx, dy) {
        state.player.move_in_direction(dir, &state.obstacles, arena);
    }
}

fn navigate_enemies(state: &mut GameState, arena: Vec2) {
    let GameState {
        player,
        enemies,
        grid,
        obstacles,
        rng,
        ..
    } = state;
    for enemy in enemies.iter_mut() {
        if enemy.is_destroyed {
            continue;
        }
        // The navigator lives inside the tank it drives; take it out for the
        // duration of the call.
        let mut navigator = std::mem::take(&mut enemy.navigator);
        navigator.advance(enemy, player, grid, obstacles, arena, rng);
        enemy.navigator = navigator;
    }
}

fn aim_tanks(state: &mut GameState, input: &TickInput) {
    state.player.aim_at(input.aim);
    let GameState {
        player,
        enemies,
        rng,
        ..
    } = state;
    let target = player.center();
    for enemy in enemies.iter_mut() {
        if enemy.is_destroyed {
            continue;
        }
        match enemy.kind.spec().aim {
            AimMode::AtTarget => enemy.aim_at(target),
            AimMode::RandomSweep => enemy.sweep_aim(rng),
            AimMode::Pointer => {}
        }
    }
}

fn fire_and_plant(state: &mut GameState, input: &TickInput, now: u64, arena: Vec2) {
    if input.fire {
        let GameState {
            player,
            obstacles,
            events,
            ..
        } = state;
        player.try_fire(obstacles, arena, None, events);
    }
    if input.plant_bomb {
        state.player.try_plant(None, now);
    }

    let GameState {
        player,
        enemies,
        obstacles,
        events,
        ..
    } = state;
    for enemy in enemies.iter_mut() {
        if enemy.is_destroyed {
            continue;
        }
        enemy.try_fire(obstacles, arena, Some(&*player), events);
        enemy.try_plant(Some(&*player), now);
    }
}

fn advance_entities(state: &mut GameState, now: u64, arena: Vec2) {
    let GameState {
        player,
        enemies,
        obstacles,
        rng,
        events,
        ..
    } = state;
    for tank in std::iter::once(player).chain(enemies.iter_mut()) {
        for ammo in &mut tank.ammo {
            ammo.update(obstacles, arena, rng, events);
        }
        for bomb in &mut tank.bombs {
            bomb.update(now, rng, events);
        }
        tank.update_wreck();
    }
}

fn tank_at(state: &GameState, owner: usize) -> &Tank {
    if owner == 0 {
        &state.player
    } else {
        &state.enemies[owner - 1]
    }
}

fn tank_count(state: &GameState) -> usize {
    state.enemies.len() + 1
}

fn live_ammo_keys(state: &GameState) -> Vec<(SlotKey, Vec2)> {
    let mut keys = Vec::new();
    for owner in 0..tank_count(state) {
        let tank = tank_at(state, owner);
        for (slot, ammo) in tank.ammo.iter().enumerate() {
            if ammo.is_live() {
                keys.push(((owner, slot), ammo.pos));
            }
        }
    }
    keys
}

fn armed_bomb_keys(state: &GameState) -> Vec<(SlotKey, Vec2)> {
    let mut keys = Vec::new();
    for owner in 0..tank_count(state) {
        let tank = tank_at(state, owner);
        for (slot, bomb) in tank.bombs.iter().enumerate() {
            if bomb.is_armed() {
                keys.push(((owner, slot), bomb.pos));
            }
        }
    }
    keys
}

fn explode_ammo(state: &mut GameState, key: SlotKey) {
    let GameState {
        player,
        enemies,
        rng,
        events,
        ..
    } = state;
    let tank = if key.0 == 0 {
        player
    } else {
        &mut enemies[key.0 - 1]
    };
    tank.ammo[key.1].explode(rng, events);
}

fn detonate_bomb(state: &mut GameState, key: SlotKey) {
    let GameState {
        player,
        enemies,
        rng,
        events,
        ..
    } = state;
    let tank = if key.0 == 0 {
        player
    } else {
        &mut enemies[key.0 - 1]
    };
    tank.bombs[key.1].detonate(rng, events);
}

fn destroy_tank(state: &mut GameState, owner: usize) {
    let GameState {
        player,
        enemies,
        rng,
        events,
        ..
    } = state;
    let tank = if owner == 0 {
        player
    } else {
        &mut enemies[owner - 1]
    };
    tank.destroy(rng, events);
}

/// Projectile vs projectile: circle test, mutual destruction. Each pair is
/// only acted on while both sides are still live, so a projectile consumed
/// by an earlier pair cannot destroy anything else this tick.
fn resolve_ammo_pairs(state: &mut GameState) {
    let keys = live_ammo_keys(state);
    for i in 0..keys.len() {
        for j in (i + 1)..keys.len() {
            let ((owner_a, slot_a), pos_a) = keys[i];
            let ((owner_b, slot_b), pos_b) = keys[j];
            if pos_a.distance(pos_b) >= AMMO_RADIUS * 2.0 {
                continue;
            }
            if !tank_at(state, owner_a).ammo[slot_a].is_live()
                || !tank_at(state, owner_b).ammo[slot_b].is_live()
            {
                continue;
            }
            explode_ammo(state, (owner_a, slot_a));
            explode_ammo(state, (owner_b, slot_b));
        }
    }
}

/// Projectile vs armed bomb: circle test; the projectile explodes and the
/// bomb detonates early.
fn resolve_ammo_bombs(state: &mut GameState) {
    let ammo_keys = live_ammo_keys(state);
    let bomb_keys = armed_bomb_keys(state);
    for &(ammo_key, ammo_pos) in &ammo_keys {
        for &(bomb_key, bomb_pos) in &bomb_keys {
            if ammo_pos.distance(bomb_pos) >= AMMO_RADIUS + BOMB_TRIGGER_RADIUS {
                continue;
            }
            if !tank_at(state, ammo_key.0).ammo[ammo_key.1].is_live() {
                break;
            }
            if !tank_at(state, bomb_key.0).bombs[bomb_key.1].is_armed() {
                continue;
            }
            explode_ammo(state, ammo_key);
            detonate_bomb(state, bomb_key);
        }
    }
}

/// Projectile vs tank AABB containment. Player shots can hit any tank,
/// itself included after a bounce; enemy shots only ever hit the player.
/// First containment wins and both sides are destroyed, so a projectile
/// never lands more than one hit per tick.
fn resolve_ammo_tank_hits(state: &mut GameState) {
    for slot in 0..state.player.ammo.len() {
        if !state.player.ammo[slot].is_live() {
            continue;
        }
        let pos = state.player.ammo[slot].pos;
        let mut victim = None;
        for (i, enemy) in state.enemies.iter().enumerate() {
            if !enemy.is_destroyed && enemy.contains_point(pos) {
                victim = Some(i + 1);
                break;
            }
        }
        if victim.is_none() && !state.player.is_destroyed && state.player.contains_point(pos) {
            victim = Some(0);
        }
        if let Some(owner) = victim {
            explode_ammo(state, (0, slot));
            destroy_tank(state, owner);
        }
    }

    for owner in 1..tank_count(state) {
        for slot in 0..tank_at(state, owner).ammo.len() {
            let ammo = &tank_at(state, owner).ammo[slot];
            if !ammo.is_live() {
                continue;
            }
            let pos = ammo.pos;
            if !state.player.is_destroyed && state.player.contains_point(pos) {
                explode_ammo(state, (owner, slot));
                destroy_tank(state, 0);
            }
        }
    }
}

/// Exploding bombs destroy every tank whose corners or center fall inside
/// the blast radius, regardless of who planted them.
fn resolve_bomb_blasts(state: &mut GameState) {
    let mut exploding = Vec::new();
    for owner in 0..tank_count(state) {
        for (slot, bomb) in tank_at(state, owner).bombs.iter().enumerate() {
            if bomb.is_exploding() {
                exploding.push((owner, slot));
            }
        }
    }
    for &(owner, slot) in &exploding {
        for victim in 0..tank_count(state) {
            let covered = {
                let bomb = &tank_at(state, owner).bombs[slot];
                let tank = tank_at(state, victim);
                !tank.is_destroyed && bomb.blast_covers_tank(tank)
            };
            if covered {
                destroy_tank(state, victim);
            }
        }
    }
}

fn evaluate_outcome(state: &mut GameState) {
    if state.player.is_destroyed {
        state.outcome = Outcome::EnemyWin;
        log::info!("enemy victory after {} ticks", state.time_ticks);
    } else if state.enemies.iter().all(|t| t.is_destroyed) {
        state.outcome = Outcome::PlayerWin;
        log::info!("player victory after {} ticks", state.time_ticks);
    }
}
