/// Normalized input events delivered by the frontend.
use crate::entities::Point;
use crate::weapons::WeaponKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Pointer click, already normalized to 0–100 of the play field.
    Click(Point),
    PointerMove(Point),
    Key(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Reload,
    Select(WeaponKind),
}

/// Map a key press to a weapon command.  `к`/`К` sit on the `r` key of a
/// Russian layout.
pub fn command_for_key(key: char) -> Option<Command> {
    match key {
        'r' | 'R' | 'к' | 'К' => Some(Command::Reload),
        other => WeaponKind::from_slot(other).map(Command::Select),
    }
}

/// Convert a terminal cell inside a `width` x `height` play field (origin
/// at its top-left cell) to normalized coordinates.
pub fn normalize_cell(column: u16, row: u16, width: u16, height: u16) -> Point {
    let scale = |v: u16, extent: u16| {
        if extent <= 1 {
            return 0.0;
        }
        f32::from(v.min(extent - 1)) * 100.0 / f32::from(extent - 1)
    };
    Point::new(scale(column, width), scale(row, height))
}
