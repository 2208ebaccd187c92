/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `Arena` (plus the tunables and, where needed, an RNG handle) and returns
/// a brand-new `Arena`, along with any notifications the step raised.
/// Side effects are limited to the injected RNG.

use log::{debug, info};
use rand::Rng;

use crate::config::Tunables;
use crate::entities::{Arena, Bullet, Enemy, Notification, Point};

// ── Spawner ──────────────────────────────────────────────────────────────────

/// Introduce a batch of enemies above the visible field, unless the live
/// count already reached the cap.  All spawn parameters come from `rng`.
pub fn spawn_wave(arena: &Arena, tunables: &Tunables, rng: &mut impl Rng) -> Arena {
    if arena.live_enemy_count() >= tunables.max_live_enemies {
        return arena.clone();
    }

    let count = rng.gen_range(tunables.spawn_batch_min..=tunables.spawn_batch_max);
    let mut enemies = arena.enemies.clone();
    let mut next_id = arena.next_id;

    for _ in 0..count {
        let enemy = Enemy {
            id: next_id,
            x: rng.gen_range(tunables.spawn_x.clone()),
            y: rng.gen_range(tunables.spawn_y.clone()),
            health: tunables.enemy_max_health,
            max_health: tunables.enemy_max_health,
            speed: rng.gen_range(tunables.enemy_speed.clone()),
            dead: false,
            dead_ticks: 0,
        };
        debug!("spawned enemy {} at ({:.1}, {:.1})", enemy.id, enemy.x, enemy.y);
        enemies.push(enemy);
        next_id += 1;
    }

    Arena {
        enemies,
        next_id,
        ..arena.clone()
    }
}

// ── Enemy tick ───────────────────────────────────────────────────────────────

/// Advance every live enemy by its speed and resolve breaches of the
/// defended line.  Corpses stay put until they are past the purge line or
/// have lingered long enough.
pub fn enemy_tick(arena: &Arena, tunables: &Tunables) -> (Arena, Vec<Notification>) {
    let mut notices = Vec::new();
    let mut health = arena.health;

    let enemies: Vec<Enemy> = arena
        .enemies
        .iter()
        .map(|e| {
            if e.dead {
                return Enemy {
                    dead_ticks: e.dead_ticks + 1,
                    ..e.clone()
                };
            }
            let y = e.y + e.speed;
            if y > tunables.breach_line {
                health = health.saturating_sub(tunables.breach_penalty);
                info!("enemy {} breached the line, health now {}", e.id, health);
                notices.push(Notification::Breach { enemy_id: e.id });
                Enemy {
                    y,
                    dead: true,
                    ..e.clone()
                }
            } else {
                Enemy { y, ..e.clone() }
            }
        })
        .filter(|e| {
            !(e.dead && (e.y >= tunables.purge_line || e.dead_ticks > tunables.corpse_linger_ticks))
        })
        .collect();

    let next = Arena {
        enemies,
        health,
        ..arena.clone()
    };
    (next, notices)
}

// ── Bullet tick ──────────────────────────────────────────────────────────────

fn in_bounds(b: &Bullet, tunables: &Tunables) -> bool {
    let range = tunables.bullet_min..=tunables.bullet_max;
    range.contains(&b.x) && range.contains(&b.y)
}

fn overlaps(b: &Bullet, e: &Enemy, half_extent: f32) -> bool {
    (b.x - e.x).abs() < half_extent && (b.y - e.y).abs() < half_extent
}

/// Move every bullet, drop the ones that left the field, then apply
/// `damage` for every bullet/enemy overlap.  Each pair is resolved on its
/// own, so two bullets reaching the same enemy in one tick both land; an
/// enemy that died earlier in the tick is no longer a target.
pub fn bullet_tick(arena: &Arena, tunables: &Tunables, damage: u32) -> (Arena, Vec<Notification>) {
    let mut notices = Vec::new();

    let moved: Vec<Bullet> = arena
        .bullets
        .iter()
        .map(|b| Bullet {
            x: b.x + b.vx,
            y: b.y + b.vy,
            ..b.clone()
        })
        .filter(|b| in_bounds(b, tunables))
        .collect();

    let mut enemies = arena.enemies.clone();
    let mut score = arena.score;
    let mut kills = arena.kills;
    let mut spent: Vec<u64> = Vec::new();
    let damage = i32::try_from(damage).unwrap_or(i32::MAX);

    for bullet in &moved {
        for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
            if !overlaps(bullet, enemy, tunables.hit_half_extent) {
                continue;
            }
            if !spent.contains(&bullet.id) {
                spent.push(bullet.id);
            }
            enemy.health -= damage;
            if enemy.health <= 0 {
                enemy.health = 0;
                enemy.dead = true;
                score += tunables.kill_score;
                kills += 1;
                info!("enemy {} killed by bullet {}", enemy.id, bullet.id);
                notices.push(Notification::Kill { enemy_id: enemy.id });
            }
        }
    }

    let bullets = if tunables.piercing_bullets {
        moved
    } else {
        moved.into_iter().filter(|b| !spent.contains(&b.id)).collect()
    };

    let next = Arena {
        enemies,
        bullets,
        score,
        kills,
        ..arena.clone()
    };
    (next, notices)
}

// ── Firing ───────────────────────────────────────────────────────────────────

/// Velocity of a bullet fired from `origin` towards `target`: a unit
/// vector along the firing angle, scaled to `speed`.
pub fn bullet_velocity(origin: Point, target: Point, speed: f32) -> (f32, f32) {
    let angle = (target.y - origin.y).atan2(target.x - origin.x);
    (angle.cos() * speed, angle.sin() * speed)
}

/// Append a bullet leaving the fire origin towards `target`.
pub fn fire_bullet(arena: &Arena, tunables: &Tunables, target: Point) -> Arena {
    let origin = tunables.fire_origin();
    let (vx, vy) = bullet_velocity(origin, target, tunables.bullet_speed);

    let mut bullets = arena.bullets.clone();
    bullets.push(Bullet {
        id: arena.next_id,
        x: origin.x,
        y: origin.y,
        vx,
        vy,
    });

    Arena {
        bullets,
        next_id: arena.next_id + 1,
        ..arena.clone()
    }
}
