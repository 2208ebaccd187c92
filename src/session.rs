//! Session controller.
//!
//! One owned aggregate holds the mode, the entity stores, the weapon state
//! and the clock.  Every periodic loop and delayed completion is a task on
//! the session's scheduler, and every mode change tears all of them down
//! before anything new is scheduled.

use log::{debug, info};
use rand::Rng;

use crate::compute::{bullet_tick, enemy_tick, fire_bullet, spawn_wave};
use crate::config::Tunables;
use crate::entities::{Arena, GameMode, Notification, Point};
use crate::input::{command_for_key, Command, Input};
use crate::scheduler::{Scheduler, TaskId};
use crate::view::{BulletView, EnemyView, Frame, Hud};
use crate::weapons::{Loadout, WeaponKind};

/// Work items on the session clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    Spawn,
    EnemyTick,
    BulletTick,
    CooldownDone,
    ReloadDone,
}

pub struct Session<R: Rng> {
    mode: GameMode,
    arena: Arena,
    loadout: Loadout,
    crosshair: Point,
    scheduler: Scheduler<Job>,
    tunables: Tunables,
    rng: R,
    notices: Vec<Notification>,
}

impl<R: Rng> Session<R> {
    /// A session sitting in the menu.  `rng` drives every spawn decision.
    pub fn new(tunables: Tunables, rng: R) -> Self {
        Session {
            mode: GameMode::Menu,
            arena: Arena::new(tunables.player_max_health),
            loadout: Loadout::default(),
            crosshair: Point::new(50.0, 50.0),
            scheduler: Scheduler::new(),
            tunables,
            rng,
            notices: Vec::new(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Reset every store and start the loops in `mode`.  Starting `Menu`
    /// is the same as returning to the menu.
    pub fn start_game(&mut self, mode: GameMode) {
        if !mode.is_active() {
            self.return_to_menu();
            return;
        }

        self.scheduler.cancel_all();
        self.arena = Arena::new(self.tunables.player_max_health);
        self.loadout = Loadout::default();
        self.notices.clear();
        self.mode = mode;

        self.scheduler
            .schedule_every(self.tunables.spawn_interval_ms, Job::Spawn);
        self.scheduler
            .schedule_every(self.tunables.enemy_tick_ms, Job::EnemyTick);
        self.scheduler
            .schedule_every(self.tunables.bullet_tick_ms, Job::BulletTick);

        info!("started {} game", mode.label());
    }

    /// Halt every loop and pending completion.  The stores keep their last
    /// contents for display.
    pub fn return_to_menu(&mut self) {
        self.scheduler.cancel_all();
        if self.mode.is_active() {
            info!(
                "left {} game with score {} and {} kills",
                self.mode.label(),
                self.arena.score,
                self.arena.kills
            );
        }
        self.mode = GameMode::Menu;
    }

    /// Run every task that falls due within the next `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.scheduler.now() + elapsed_ms;
        while let Some((token, job)) = self.scheduler.next_due(until) {
            self.run(token, job);
        }
        self.scheduler.settle(until);
    }

    fn run(&mut self, token: TaskId, job: Job) {
        match job {
            Job::Spawn => {
                self.arena = spawn_wave(&self.arena, &self.tunables, &mut self.rng);
            }
            Job::EnemyTick => {
                let (arena, notices) = enemy_tick(&self.arena, &self.tunables);
                self.arena = arena;
                self.notices.extend(notices);
            }
            Job::BulletTick => {
                let damage = self.loadout.weapon.spec().damage;
                let (arena, notices) = bullet_tick(&self.arena, &self.tunables, damage);
                self.arena = arena;
                self.notices.extend(notices);
            }
            Job::CooldownDone => {
                if !self.loadout.finish_cooldown(token) {
                    debug!("stale cooldown {:?} ignored", token);
                }
            }
            Job::ReloadDone => {
                if self.loadout.finish_reload(token) {
                    let weapon = self.loadout.weapon.spec().name;
                    info!("{} reloaded", weapon);
                    self.notices.push(Notification::ReloadComplete { weapon });
                }
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Route one input event.  Returns whether it changed weapon or bullet
    /// state; pointer moves always return `false`.
    pub fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::Click(point) => self.shoot(point),
            Input::PointerMove(point) => {
                self.crosshair = point;
                false
            }
            Input::Key(key) => match command_for_key(key) {
                Some(Command::Reload) => self.reload(),
                Some(Command::Select(kind)) => self.switch_weapon(kind),
                None => false,
            },
        }
    }

    /// Fire towards `target`.  Rejected silently in the menu, while
    /// reloading, during cooldown or with an empty magazine.
    pub fn shoot(&mut self, target: Point) -> bool {
        self.crosshair = target;
        if !self.mode.is_active() {
            debug!("shot ignored in menu");
            return false;
        }
        if let Some(reason) = self.loadout.blocked() {
            debug!("shot rejected: {:?}", reason);
            return false;
        }

        let fire_rate = self.loadout.weapon.spec().fire_rate_ms;
        let token = self.scheduler.schedule_once(fire_rate, Job::CooldownDone);
        self.loadout.fire(token);
        self.arena = fire_bullet(&self.arena, &self.tunables, target);

        if self.loadout.weapon.ammo == 0 {
            self.begin_reload();
        }
        true
    }

    /// Explicit reload request.  Ignored while reloading or when full.
    pub fn reload(&mut self) -> bool {
        if !self.mode.is_active() || !self.loadout.can_reload() {
            debug!("reload request ignored");
            return false;
        }
        self.begin_reload()
    }

    pub fn switch_weapon(&mut self, kind: WeaponKind) -> bool {
        if !self.mode.is_active() || !self.loadout.switch_to(kind) {
            debug!("switch to {:?} ignored", kind);
            return false;
        }
        debug!("switched to {}", kind.spec().name);
        true
    }

    fn begin_reload(&mut self) -> bool {
        let spec = self.loadout.weapon.spec();
        let token = self.scheduler.schedule_once(spec.reload_ms, Job::ReloadDone);
        if !self.loadout.begin_reload(token) {
            self.scheduler.cancel(token);
            return false;
        }
        info!("reloading {}", spec.name);
        self.notices
            .push(Notification::ReloadStarted { weapon: spec.name });
        true
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn crosshair(&self) -> Point {
        self.crosshair
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Session clock in milliseconds.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Take every notification raised since the last call.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notices)
    }

    pub fn frame(&self) -> Frame {
        let weapon = &self.loadout.weapon;
        Frame {
            enemies: self
                .arena
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    x: e.x,
                    y: e.y,
                    health: e.health,
                    max_health: e.max_health,
                    dead: e.dead,
                })
                .collect(),
            bullets: self
                .arena
                .bullets
                .iter()
                .map(|b| BulletView { id: b.id, x: b.x, y: b.y })
                .collect(),
            crosshair: self.crosshair,
            origin: self.tunables.fire_origin(),
            hud: Hud {
                health: self.arena.health,
                score: self.arena.score,
                kills: self.arena.kills,
                ammo: weapon.ammo,
                max_ammo: weapon.spec().capacity,
                weapon_name: weapon.spec().name,
                mode: self.mode,
                reloading: self.loadout.is_reloading(),
            },
        }
    }
}
