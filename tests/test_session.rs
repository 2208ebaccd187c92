use shooting_range::config::Tunables;
use shooting_range::entities::*;
use shooting_range::input::Input;
use shooting_range::session::Session;
use shooting_range::weapons::{WeaponKind, WeaponState};

use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

const UP: Point = Point::new(50.0, 0.0);

fn session_with(tunables: Tunables) -> Session<StdRng> {
    Session::new(tunables, StdRng::seed_from_u64(7))
}

fn make_session() -> Session<StdRng> {
    session_with(Tunables::default())
}

fn started(mode: GameMode) -> Session<StdRng> {
    let mut s = make_session();
    s.start_game(mode);
    s
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn new_session_waits_in_menu() {
    let s = make_session();
    assert_eq!(s.mode(), GameMode::Menu);
    assert_eq!(s.pending_tasks(), 0);
    assert_eq!(s.arena().health, 100);
}

#[test]
fn start_game_runs_three_loops() {
    let s = started(GameMode::Classic);
    assert_eq!(s.mode(), GameMode::Classic);
    assert_eq!(s.pending_tasks(), 3);
    assert_eq!(s.loadout().weapon.kind, WeaponKind::Pistol);
    assert_eq!(s.loadout().weapon.ammo, 12);
}

#[test]
fn start_game_resets_everything() {
    let mut s = started(GameMode::Classic);
    s.switch_weapon(WeaponKind::Rifle);
    s.shoot(UP);
    s.reload();
    s.advance(6000);
    assert!(!s.arena().enemies.is_empty());

    s.start_game(GameMode::Deathmatch);
    assert_eq!(s.mode(), GameMode::Deathmatch);
    assert_eq!(s.arena().health, 100);
    assert_eq!(s.arena().score, 0);
    assert_eq!(s.arena().kills, 0);
    assert!(s.arena().enemies.is_empty());
    assert!(s.arena().bullets.is_empty());
    assert_eq!(s.loadout().weapon.kind, WeaponKind::Pistol);
    assert_eq!(s.loadout().weapon.ammo, 12);
    assert_eq!(s.loadout().state, WeaponState::Ready);
    assert_eq!(s.pending_tasks(), 3);
}

#[test]
fn restart_cancels_pending_reload() {
    let mut s = started(GameMode::Classic);
    s.shoot(UP);
    assert!(s.reload());
    s.start_game(GameMode::Classic);
    s.advance(2000);
    let notices = s.drain_notifications();
    assert!(!notices
        .iter()
        .any(|n| matches!(n, Notification::ReloadComplete { .. })));
}

#[test]
fn returning_to_menu_halts_every_loop() {
    let mut s = started(GameMode::Defuse);
    s.advance(5000);
    s.shoot(UP);
    let before = s.arena().clone();
    assert!(!before.enemies.is_empty());

    s.return_to_menu();
    assert_eq!(s.mode(), GameMode::Menu);
    assert_eq!(s.pending_tasks(), 0);
    s.advance(60_000);
    assert_eq!(s.arena(), &before);
}

#[test]
fn starting_menu_mode_is_returning_to_menu() {
    let mut s = started(GameMode::Classic);
    s.start_game(GameMode::Menu);
    assert_eq!(s.mode(), GameMode::Menu);
    assert_eq!(s.pending_tasks(), 0);
}

#[test]
fn first_spawn_happens_after_the_interval() {
    let mut s = started(GameMode::Classic);
    s.advance(4999);
    assert!(s.arena().enemies.is_empty());
    s.advance(1);
    assert!((1..=2).contains(&s.arena().enemies.len()));
}

#[test]
fn zero_health_does_not_end_the_session() {
    let mut s = session_with(Tunables {
        enemy_speed: 40.0..41.0,
        breach_penalty: 100,
        ..Tunables::default()
    });
    s.start_game(GameMode::Classic);
    s.advance(5200);

    assert_eq!(s.arena().health, 0);
    assert!(s
        .drain_notifications()
        .iter()
        .any(|n| matches!(n, Notification::Breach { .. })));
    assert_eq!(s.mode(), GameMode::Classic);
    assert_eq!(s.pending_tasks(), 3);

    // Play goes on: the next wave still spawns and the gun still fires.
    s.advance(4800);
    assert!(s.arena().live_enemy_count() > 0);
    assert!(s.shoot(UP));
}

// ── Shooting ──────────────────────────────────────────────────────────────────

#[test]
fn shot_in_menu_is_ignored() {
    let mut s = make_session();
    assert!(!s.shoot(UP));
    assert!(s.arena().bullets.is_empty());
    assert_eq!(s.loadout().weapon.ammo, 12);
    assert_eq!(s.pending_tasks(), 0);
}

#[test]
fn accepted_shot_spends_ammo_and_fires_a_bullet() {
    let mut s = started(GameMode::Classic);
    assert!(s.shoot(UP));
    assert_eq!(s.loadout().weapon.ammo, 11);
    assert_eq!(s.arena().bullets.len(), 1);
    let b = &s.arena().bullets[0];
    assert_abs_diff_eq!(b.vy, -2.0, epsilon = 1e-5);
}

#[test]
fn cooldown_gates_the_next_shot() {
    let mut s = started(GameMode::Classic);
    assert!(s.shoot(UP));
    assert!(!s.shoot(UP));
    s.advance(299);
    assert!(!s.shoot(UP));
    assert_eq!(s.loadout().weapon.ammo, 11);
    s.advance(1);
    assert!(s.shoot(UP));
    assert_eq!(s.loadout().weapon.ammo, 10);
    assert_eq!(s.arena().bullets.len(), 2);
}

#[test]
fn bullets_advance_on_their_own_cadence() {
    let mut s = started(GameMode::Classic);
    s.shoot(UP);
    s.advance(300); // ten bullet ticks
    assert_abs_diff_eq!(s.arena().bullets[0].y, 75.0, epsilon = 1e-3);
}

#[test]
fn sniper_reloads_itself_after_the_last_round() {
    let mut s = started(GameMode::Classic);
    assert!(s.handle(Input::Key('3')));
    for shot in 1..=5 {
        assert!(s.shoot(UP), "shot {shot}");
        if shot < 5 {
            assert!(!s.loadout().is_reloading());
            s.advance(1000);
        }
    }
    assert_eq!(s.loadout().weapon.ammo, 0);
    assert!(s.loadout().is_reloading());
    assert!(s
        .drain_notifications()
        .contains(&Notification::ReloadStarted { weapon: "Sniper" }));

    s.advance(2999);
    assert!(s.loadout().is_reloading());
    assert!(!s.shoot(UP));
    s.advance(1);
    assert_eq!(s.loadout().weapon.ammo, 5);
    assert_eq!(s.loadout().state, WeaponState::Ready);
    assert!(s
        .drain_notifications()
        .contains(&Notification::ReloadComplete { weapon: "Sniper" }));
}

// ── Reloading ─────────────────────────────────────────────────────────────────

#[test]
fn reload_at_full_ammo_is_ignored() {
    let mut s = started(GameMode::Classic);
    assert!(!s.reload());
    assert!(!s.loadout().is_reloading());
    assert!(s.drain_notifications().is_empty());
}

#[test]
fn reload_completes_after_reload_duration() {
    let mut s = started(GameMode::Classic);
    s.shoot(UP);
    assert!(s.handle(Input::Key('r')));
    assert!(!s.reload());
    assert!(!s.shoot(UP));

    s.advance(1499);
    assert_eq!(s.loadout().weapon.ammo, 11);
    s.advance(1);
    assert_eq!(s.loadout().weapon.ammo, 12);
    assert_eq!(s.loadout().state, WeaponState::Ready);

    let reloads = s
        .drain_notifications()
        .into_iter()
        .filter(|n| matches!(n, Notification::ReloadComplete { .. }))
        .count();
    assert_eq!(reloads, 1);
}

#[test]
fn localized_reload_key_works() {
    let mut s = started(GameMode::Classic);
    s.shoot(UP);
    assert!(s.handle(Input::Key('к')));
    assert!(s.loadout().is_reloading());
}

#[test]
fn reload_ignored_in_menu() {
    let mut s = make_session();
    assert!(!s.reload());
}

// ── Switching ─────────────────────────────────────────────────────────────────

#[test]
fn switch_while_reloading_is_a_noop() {
    let mut s = started(GameMode::Classic);
    s.shoot(UP);
    s.reload();
    assert!(!s.handle(Input::Key('2')));
    assert_eq!(s.loadout().weapon.kind, WeaponKind::Pistol);
    assert!(s.loadout().is_reloading());
}

#[test]
fn switch_gives_a_full_ready_weapon() {
    let mut s = started(GameMode::Classic);
    s.shoot(UP);
    assert!(s.handle(Input::Key('2')));
    assert_eq!(s.loadout().weapon.kind, WeaponKind::Rifle);
    assert_eq!(s.loadout().weapon.ammo, 30);
    assert!(s.shoot(UP));
}

#[test]
fn old_cooldown_does_not_ready_new_weapon_early() {
    let mut s = started(GameMode::Classic);
    s.shoot(UP); // pistol cooldown due at 300
    s.advance(250);
    s.switch_weapon(WeaponKind::Rifle);
    assert!(s.shoot(UP)); // rifle cooldown due at 350
    s.advance(50);
    assert!(!s.shoot(UP));
    s.advance(50);
    assert!(s.shoot(UP));
}

#[test]
fn switch_ignored_in_menu() {
    let mut s = make_session();
    assert!(!s.switch_weapon(WeaponKind::Sniper));
    assert_eq!(s.loadout().weapon.kind, WeaponKind::Pistol);
}

// ── Combat through the session ───────────────────────────────────────────────

#[test]
fn sniper_shot_kills_a_spawned_enemy() {
    let mut s = session_with(Tunables {
        spawn_batch_max: 1,
        spawn_x: 50.0..50.001,
        spawn_y: -0.001..0.0,
        enemy_speed: 0.0001..0.0002,
        ..Tunables::default()
    });
    s.start_game(GameMode::Classic);
    s.switch_weapon(WeaponKind::Sniper);
    s.advance(5000);
    assert_eq!(s.arena().enemies.len(), 1);

    assert!(s.shoot(UP));
    s.advance(1500);
    assert_eq!(s.arena().kills, 1);
    assert_eq!(s.arena().score, 100);
    assert!(s.arena().enemies[0].dead);
    assert!(s
        .drain_notifications()
        .iter()
        .any(|n| matches!(n, Notification::Kill { .. })));
}

// ── Render boundary ──────────────────────────────────────────────────────────

#[test]
fn pointer_moves_the_crosshair_even_in_menu() {
    let mut s = make_session();
    assert!(!s.handle(Input::PointerMove(Point::new(12.0, 34.0))));
    assert_eq!(s.crosshair(), Point::new(12.0, 34.0));
}

#[test]
fn click_moves_the_crosshair() {
    let mut s = started(GameMode::Classic);
    s.handle(Input::Click(Point::new(70.0, 20.0)));
    assert_eq!(s.frame().crosshair, Point::new(70.0, 20.0));
}

#[test]
fn frame_reports_hud_scalars() {
    let mut s = started(GameMode::Deathmatch);
    s.switch_weapon(WeaponKind::Rifle);
    s.shoot(UP);
    let frame = s.frame();
    assert_eq!(frame.hud.health, 100);
    assert_eq!(frame.hud.score, 0);
    assert_eq!(frame.hud.kills, 0);
    assert_eq!(frame.hud.ammo, 29);
    assert_eq!(frame.hud.max_ammo, 30);
    assert_eq!(frame.hud.weapon_name, "Rifle");
    assert_eq!(frame.hud.mode, GameMode::Deathmatch);
    assert!(!frame.hud.reloading);
    assert_eq!(frame.bullets.len(), 1);
    assert_eq!(frame.origin, Point::new(50.0, 95.0));
}

#[test]
fn notifications_drain_once() {
    let mut s = started(GameMode::Classic);
    s.shoot(UP);
    s.reload();
    assert_eq!(s.drain_notifications().len(), 1);
    assert!(s.drain_notifications().is_empty());
}
