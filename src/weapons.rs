/// Weapon catalog and the per-session weapon state machine.
///
/// `Loadout` only tracks state; the session owns the clock and hands it the
/// `TaskId` of every cooldown or reload it schedules.  A completion callback
/// is honoured only when its token matches the current state, so callbacks
/// left over from a switched-away weapon are inert.
use crate::scheduler::TaskId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Pistol,
    Rifle,
    Sniper,
}

/// Immutable template for a weapon type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponSpec {
    pub name: &'static str,
    pub damage: u32,
    pub capacity: u32,
    pub reload_ms: u64,
    pub fire_rate_ms: u64,
}

// ── Catalog ──────────────────────────────────────────────────────────────────

const PISTOL: WeaponSpec = WeaponSpec {
    name: "Pistol",
    damage: 25,
    capacity: 12,
    reload_ms: 1500,
    fire_rate_ms: 300,
};

const RIFLE: WeaponSpec = WeaponSpec {
    name: "Rifle",
    damage: 50,
    capacity: 30,
    reload_ms: 2500,
    fire_rate_ms: 100,
};

const SNIPER: WeaponSpec = WeaponSpec {
    name: "Sniper",
    damage: 100,
    capacity: 5,
    reload_ms: 3000,
    fire_rate_ms: 1000,
};

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Pistol, WeaponKind::Rifle, WeaponKind::Sniper];

    pub fn spec(self) -> &'static WeaponSpec {
        match self {
            WeaponKind::Pistol => &PISTOL,
            WeaponKind::Rifle => &RIFLE,
            WeaponKind::Sniper => &SNIPER,
        }
    }

    /// Number-row selector: `1` pistol, `2` rifle, `3` sniper.
    pub fn from_slot(slot: char) -> Option<Self> {
        match slot {
            '1' => Some(WeaponKind::Pistol),
            '2' => Some(WeaponKind::Rifle),
            '3' => Some(WeaponKind::Sniper),
            _ => None,
        }
    }
}

// ── Instance ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Rounds left in the magazine, always within `0..=capacity`.
    pub ammo: u32,
}

impl Weapon {
    /// A fresh instance with a full magazine.
    pub fn new(kind: WeaponKind) -> Self {
        Weapon {
            kind,
            ammo: kind.spec().capacity,
        }
    }

    pub fn spec(&self) -> &'static WeaponSpec {
        self.kind.spec()
    }

    pub fn is_full(&self) -> bool {
        self.ammo >= self.spec().capacity
    }
}

// ── State machine ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponState {
    Ready,
    CoolingDown { token: TaskId },
    Reloading { token: TaskId },
}

/// Why a shot was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blocked {
    Reloading,
    CoolingDown,
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Loadout {
    pub weapon: Weapon,
    pub state: WeaponState,
}

impl Default for Loadout {
    fn default() -> Self {
        Loadout::new(WeaponKind::Pistol)
    }
}

impl Loadout {
    pub fn new(kind: WeaponKind) -> Self {
        Loadout {
            weapon: Weapon::new(kind),
            state: WeaponState::Ready,
        }
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.state, WeaponState::Reloading { .. })
    }

    /// `None` when a shot would be honoured.
    pub fn blocked(&self) -> Option<Blocked> {
        match self.state {
            WeaponState::Reloading { .. } => Some(Blocked::Reloading),
            WeaponState::CoolingDown { .. } => Some(Blocked::CoolingDown),
            WeaponState::Ready if self.weapon.ammo == 0 => Some(Blocked::Empty),
            WeaponState::Ready => None,
        }
    }

    /// Spend one round and enter cooldown under `token`.  Returns `false`
    /// without touching anything when the shot is blocked.
    pub fn fire(&mut self, token: TaskId) -> bool {
        if self.blocked().is_some() {
            return false;
        }
        self.weapon.ammo -= 1;
        self.state = WeaponState::CoolingDown { token };
        true
    }

    pub fn can_reload(&self) -> bool {
        !self.is_reloading() && !self.weapon.is_full()
    }

    /// Enter the reloading state under `token`.
    pub fn begin_reload(&mut self, token: TaskId) -> bool {
        if !self.can_reload() {
            return false;
        }
        self.state = WeaponState::Reloading { token };
        true
    }

    /// Cooldown elapsed.  Ignored unless `token` is the live cooldown.
    pub fn finish_cooldown(&mut self, token: TaskId) -> bool {
        if self.state != (WeaponState::CoolingDown { token }) {
            return false;
        }
        self.state = WeaponState::Ready;
        true
    }

    /// Reload elapsed: refill and return to ready.  Ignored unless `token`
    /// is the live reload.
    pub fn finish_reload(&mut self, token: TaskId) -> bool {
        if self.state != (WeaponState::Reloading { token }) {
            return false;
        }
        self.weapon.ammo = self.weapon.spec().capacity;
        self.state = WeaponState::Ready;
        true
    }

    /// Swap in a full-magazine `kind`.  Refused while reloading.  Any pending
    /// cooldown is forgotten rather than cancelled.
    pub fn switch_to(&mut self, kind: WeaponKind) -> bool {
        if self.is_reloading() {
            return false;
        }
        self.weapon = Weapon::new(kind);
        self.state = WeaponState::Ready;
        true
    }
}
