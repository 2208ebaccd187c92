/// Shooter entities and the arena that owns them. Plain data only.
///
/// Positions use normalized surface coordinates: 0–100 percent of the play
/// field's width (x) and height (y), with y growing downwards.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    Menu,
    Classic,
    Defuse,
    Deathmatch,
}

impl GameMode {
    /// Every mode except the menu runs the simulation.
    pub fn is_active(self) -> bool {
        self != GameMode::Menu
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::Menu => "Menu",
            GameMode::Classic => "Classic",
            GameMode::Defuse => "Defuse",
            GameMode::Deathmatch => "Deathmatch",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    /// Displacement per bullet tick, fixed at creation.
    pub vx: f32,
    pub vy: f32,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub max_health: i32,
    /// Downward displacement per enemy tick.
    pub speed: f32,
    pub dead: bool,
    /// Enemy ticks elapsed since the enemy died.  Zero while alive.
    pub dead_ticks: u32,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        !self.dead
    }
}

// ── Notifications ─────────────────────────────────────────────────────────────

/// Point-in-time signals for the presentation layer.  They carry just enough
/// to word a toast; the authoritative state is always the session itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    Breach { enemy_id: u64 },
    Kill { enemy_id: u64 },
    ReloadStarted { weapon: &'static str },
    ReloadComplete { weapon: &'static str },
}

// ── Entity stores ─────────────────────────────────────────────────────────────

/// Entity stores plus the player scalars the engine mutates.  Cloneable so
/// the pure update functions can return a new copy without touching the
/// original.
#[derive(Clone, Debug, PartialEq)]
pub struct Arena {
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub health: u32,
    pub score: u32,
    pub kills: u32,
    /// Next id handed out to a spawned enemy or fired bullet.
    pub next_id: u64,
}

impl Arena {
    pub fn new(health: u32) -> Self {
        Arena {
            enemies: Vec::new(),
            bullets: Vec::new(),
            health,
            score: 0,
            kills: 0,
            next_id: 1,
        }
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }
}
