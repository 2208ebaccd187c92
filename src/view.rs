/// Read-only snapshot handed to the rendering boundary each frame.
use crate::entities::{GameMode, Point};

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub max_health: i32,
    pub dead: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BulletView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub health: u32,
    pub score: u32,
    pub kills: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub weapon_name: &'static str,
    pub mode: GameMode,
    pub reloading: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub crosshair: Point,
    /// Player base, where every bullet starts.
    pub origin: Point,
    pub hud: Hud,
}
