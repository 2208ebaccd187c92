/// Terminal rendering for the shooter and the clicker screens.
///
/// Each function receives a mutable writer and an immutable snapshot of the
/// game.  No game logic is performed; this module only translates the
/// `Frame` into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use shooting_range::clicker::ClickerState;
use shooting_range::entities::Point;
use shooting_range::input::normalize_cell;
use shooting_range::view::{EnemyView, Frame, Hud};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_AMMO: Color = Color::Cyan;
const C_BASE: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_ENEMY_HURT: Color = Color::Yellow;
const C_ENEMY_DEAD: Color = Color::DarkGrey;
const C_BULLET: Color = Color::Cyan;
const C_CROSSHAIR: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_TOAST: Color = Color::Magenta;

// ── Play field geometry ───────────────────────────────────────────────────────

/// The bordered play area inside a terminal of `width` x `height`: row 0 is
/// the HUD, row 1 and `height - 2` are borders, the last row is the hint.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub width: u16,
    pub height: u16,
}

impl Field {
    const LEFT: u16 = 1;
    const TOP: u16 = 2;

    pub fn new(term_width: u16, term_height: u16) -> Self {
        Field {
            width: term_width.saturating_sub(2).max(1),
            height: term_height.saturating_sub(4).max(1),
        }
    }

    /// Terminal cell for a normalized point, or `None` outside the surface.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !(0.0..=100.0).contains(&x) || !(0.0..=100.0).contains(&y) {
            return None;
        }
        let col = (x / 100.0 * f32::from(self.width - 1)).round() as u16;
        let row = (y / 100.0 * f32::from(self.height - 1)).round() as u16;
        Some((Self::LEFT + col, Self::TOP + row))
    }

    /// Normalized point for a terminal cell, if it lies inside the field.
    pub fn point(&self, column: u16, row: u16) -> Option<Point> {
        let col = column.checked_sub(Self::LEFT)?;
        let row = row.checked_sub(Self::TOP)?;
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(normalize_cell(col, row, self.width, self.height))
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete shooter frame.
pub fn render<W: Write>(
    out: &mut W,
    frame: &Frame,
    (width, height): (u16, u16),
    toast: Option<&str>,
) -> std::io::Result<()> {
    let field = Field::new(width, height);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, &frame.hud, width)?;

    for enemy in &frame.enemies {
        draw_enemy(out, &field, enemy)?;
    }
    for bullet in &frame.bullets {
        if let Some((col, row)) = field.cell(bullet.x, bullet.y) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(C_BULLET))?;
            out.queue(Print("•"))?;
        }
    }

    if let Some((col, row)) = field.cell(frame.origin.x, frame.origin.y) {
        out.queue(cursor::MoveTo(col.saturating_sub(1), row))?;
        out.queue(style::SetForegroundColor(C_BASE))?;
        out.queue(Print("/▲\\"))?;
    }

    if let Some((col, row)) = field.cell(frame.crosshair.x, frame.crosshair.y) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(C_CROSSHAIR))?;
        out.queue(Print("+"))?;
    }

    draw_footer(
        out,
        height,
        toast,
        "CLICK : Shoot   1 2 3 : Weapon   R : Reload   ESC : Menu   Q : Quit",
    )?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Render the click-counter screen.
pub fn render_clicker<W: Write>(
    out: &mut W,
    state: &ClickerState,
    (width, height): (u16, u16),
    toast: Option<&str>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, width, height)?;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Points: {:>7}   Clicks/sec: {:>2}   Total: {:>6}   Achievements: {}/{}",
        state.points,
        state.clicks_per_second,
        state.total_clicks,
        state.unlocked_count(),
        state.achievements.len()
    )))?;

    for (i, a) in state.achievements.iter().enumerate() {
        let row = 3 + i as u16;
        if row >= height.saturating_sub(2) {
            break;
        }
        let (mark, color) = if a.unlocked {
            ("✔", Color::Green)
        } else {
            ("·", C_HINT)
        };
        let progress = match state.progress(a.id) {
            Some((current, required)) if !a.unlocked => format!("{}/{}", current, required),
            _ => String::new(),
        };
        out.queue(cursor::MoveTo(3, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(format!(
            "{} {:<14} {:<28} +{:<4} {}",
            mark, a.title, a.description, a.reward, progress
        )))?;
    }

    draw_footer(out, height, toast, "CLICK / SPACE : Click   ESC : Menu   Q : Quit")?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &Hud, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}  Kills: {:>3}", hud.score, hud.kills)))?;

    let mode = format!("[ {} ]", hud.mode.label().to_uppercase());
    let mx = (width / 2).saturating_sub(mode.len() as u16 / 2);
    out.queue(cursor::MoveTo(mx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&mode))?;

    let ammo = if hud.reloading {
        format!("{} reloading…", hud.weapon_name)
    } else {
        format!("{} {}/{}", hud.weapon_name, hud.ammo, hud.max_ammo)
    };
    let health = format!("HP {:>3}", hud.health);
    let right = format!("{}  {}", ammo, health);
    let rx = width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_AMMO))?;
    out.queue(Print(&ammo))?;
    out.queue(Print("  "))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_enemy<W: Write>(out: &mut W, field: &Field, enemy: &EnemyView) -> std::io::Result<()> {
    let Some((col, row)) = field.cell(enemy.x, enemy.y) else {
        return Ok(());
    };
    let (sprite, color) = if enemy.dead {
        ("x_x", C_ENEMY_DEAD)
    } else if enemy.health < enemy.max_health {
        ("<▼>", C_ENEMY_HURT)
    } else {
        ("<▼>", C_ENEMY)
    };
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(sprite))?;
    Ok(())
}

// ── Footer (last row) ─────────────────────────────────────────────────────────

fn draw_footer<W: Write>(
    out: &mut W,
    height: u16,
    toast: Option<&str>,
    hint: &str,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    match toast {
        Some(message) => {
            out.queue(style::SetForegroundColor(C_TOAST))?;
            out.queue(Print(message))?;
        }
        None => {
            out.queue(style::SetForegroundColor(C_HINT))?;
            out.queue(Print(hint))?;
        }
    }
    Ok(())
}
