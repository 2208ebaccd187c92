mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use shooting_range::clicker::ClickerState;
use shooting_range::config::Tunables;
use shooting_range::entities::{GameMode, Notification};
use shooting_range::input::Input;
use shooting_range::session::Session;

use display::Field;

const FRAME: Duration = Duration::from_millis(33); // ~30 frames per second

/// How long a notification stays on the footer line.
const TOAST_TTL: Duration = Duration::from_millis(1500);

// ── Command line ──────────────────────────────────────────────────────────────

/// Terminal shooting range: defend the line, or just click.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// JSON file overriding any subset of the gameplay tunables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Milliseconds between enemy spawn attempts.
    #[arg(long, value_name = "MILLISECONDS", value_parser = clap::value_parser!(u64).range(1..=60_000))]
    spawn_interval_ms: Option<u64>,
    /// Milliseconds between enemy movement steps.
    #[arg(long, value_name = "MILLISECONDS", value_parser = clap::value_parser!(u64).range(1..=60_000))]
    enemy_tick_ms: Option<u64>,
    /// Milliseconds between bullet movement and collision steps.
    #[arg(long, value_name = "MILLISECONDS", value_parser = clap::value_parser!(u64).range(1..=60_000))]
    bullet_tick_ms: Option<u64>,
    /// Seed for enemy spawns; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Write logs to this file (the terminal belongs to the game).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl CliArgs {
    fn tunables(&self) -> Result<Tunables> {
        let mut tunables = match &self.config {
            Some(path) => Tunables::from_json_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Tunables::default(),
        };
        if let Some(ms) = self.spawn_interval_ms {
            tunables.spawn_interval_ms = ms;
        }
        if let Some(ms) = self.enemy_tick_ms {
            tunables.enemy_tick_ms = ms;
        }
        if let Some(ms) = self.bullet_tick_ms {
            tunables.bullet_tick_ms = ms;
        }
        tunables.validate().context("invalid tunables")?;
        Ok(tunables)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn describe(notice: &Notification) -> String {
    match notice {
        Notification::Breach { .. } => "Enemy broke through!".to_string(),
        Notification::Kill { .. } => "Enemy down!".to_string(),
        Notification::ReloadStarted { weapon } => format!("Reloading {}…", weapon),
        Notification::ReloadComplete { weapon } => format!("{} reloaded", weapon),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(GameMode),
    Clicker,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  SHOOTING  RANGE  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select mode:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Classic   ", Color::Green, "Hold the line"),
        ("2", "Defuse    ", Color::Yellow, "Hold the line, quietly"),
        ("3", "Deathmatch", Color::Red, "Hold the line, loudly"),
        ("4", "Clicker   ", Color::Magenta, "Click for achievements"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<10}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 5))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Weapons: 1 Pistol  2 Rifle  3 Sniper   R : Reload   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Menu input is blocking; nothing animates here.
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) = rx.recv() {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(GameMode::Classic)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(GameMode::Defuse)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(GameMode::Deathmatch)),
                KeyCode::Char('4') => return Ok(MenuResult::Clicker),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Shared loop plumbing ──────────────────────────────────────────────────────

/// What a quit-type key asks for, if anything.
enum Exit {
    Menu,
    Program,
}

fn exit_request(code: KeyCode, modifiers: KeyModifiers) -> Option<Exit> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Exit::Program),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Exit::Program),
        KeyCode::Esc => Some(Exit::Menu),
        _ => None,
    }
}

fn expire(toast: &mut Option<(String, Instant)>) {
    if matches!(toast, Some((_, shown)) if shown.elapsed() > TOAST_TTL) {
        *toast = None;
    }
}

fn pace(frame_start: Instant) {
    let elapsed = frame_start.elapsed();
    if elapsed < FRAME {
        thread::sleep(FRAME - elapsed);
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// `Ok(true)` exits the program, `Ok(false)` goes back to the menu.
///
/// The session keeps its own clock; each frame advances it to match the
/// wall-clock time spent in this loop, so the three simulation loops keep
/// their cadence regardless of the render rate.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<StdRng>,
    mode: GameMode,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    session.start_game(mode);
    let started = Instant::now();
    let clock_base = session.now();
    let mut toast: Option<(String, Instant)> = None;

    loop {
        let frame_start = Instant::now();
        let size = terminal::size()?;
        let field = Field::new(size.0, size.1);

        // ── Input since the last frame ───────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) => {
                    match exit_request(code, modifiers) {
                        Some(exit) => {
                            session.return_to_menu();
                            return Ok(matches!(exit, Exit::Program));
                        }
                        None => {
                            if let KeyCode::Char(key) = code {
                                session.handle(Input::Key(key));
                            }
                        }
                    }
                }
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    let Some(point) = field.point(column, row) else {
                        continue;
                    };
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            session.handle(Input::Click(point));
                        }
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            session.handle(Input::PointerMove(point));
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let target = clock_base + u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        session.advance(target.saturating_sub(session.now()));

        if let Some(last) = session.drain_notifications().last() {
            toast = Some((describe(last), Instant::now()));
        }
        expire(&mut toast);

        display::render(
            out,
            &session.frame(),
            size,
            toast.as_ref().map(|(msg, _)| msg.as_str()),
        )?;

        pace(frame_start);
    }
}

/// `Ok(true)` exits the program, `Ok(false)` goes back to the menu.
fn clicker_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<bool> {
    let mut state = ClickerState::new();
    let started = Instant::now();
    let mut toast: Option<(String, Instant)> = None;

    loop {
        let frame_start = Instant::now();
        let mut clicks = 0;

        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) => {
                    match exit_request(code, modifiers) {
                        Some(exit) => return Ok(matches!(exit, Exit::Program)),
                        None if code == KeyCode::Char(' ') => clicks += 1,
                        None => {}
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    ..
                }) => clicks += 1,
                _ => {}
            }
        }

        for _ in 0..clicks {
            let now = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            for a in state.click(now) {
                toast = Some((format!("Achievement: {}  +{} points", a.title, a.reward), Instant::now()));
            }
        }
        expire(&mut toast);

        display::render_clicker(
            out,
            &state,
            terminal::size()?,
            toast.as_ref().map(|(msg, _)| msg.as_str()),
        )?;

        pace(frame_start);
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = CliArgs::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let tunables = args.tunables()?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(tunables, rng);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Key-release events let held keys stop cleanly where supported.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Event reads block, so they run on their own thread and the frame
    // loops only ever poll the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // main loop is gone
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &mut session, &rx);

    // Restore the terminal even if a loop failed.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    session: &mut Session<StdRng>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    loop {
        let quit = match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start(mode) => game_loop(out, session, mode, rx)?,
            MenuResult::Clicker => clicker_loop(out, rx)?,
        };
        if quit {
            break;
        }
    }
    Ok(())
}
