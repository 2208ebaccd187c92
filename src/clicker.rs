/// Click-counter mini-game: a points counter plus threshold-triggered
/// achievements.
use std::collections::VecDeque;

use log::info;

/// Width of the trailing window used for the clicks-per-second figure.
const RATE_WINDOW_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    Points(u64),
    ClicksPerSecond(u64),
    TotalClicks(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
    pub reward: u64,
    pub unlocked: bool,
}

const fn achievement(
    id: u8,
    title: &'static str,
    description: &'static str,
    requirement: Requirement,
    reward: u64,
) -> Achievement {
    Achievement {
        id,
        title,
        description,
        requirement,
        reward,
        unlocked: false,
    }
}

fn default_achievements() -> Vec<Achievement> {
    use Requirement::*;
    vec![
        achievement(1, "First Click", "Make your first click", Points(1), 10),
        achievement(2, "Novice", "Reach 50 points", Points(50), 25),
        achievement(3, "Enthusiast", "Reach 200 points", Points(200), 50),
        achievement(4, "Professional", "Reach 500 points", Points(500), 100),
        achievement(5, "Click Master", "Reach 1000 points", Points(1000), 250),
        achievement(6, "Legend", "Reach 2500 points", Points(2500), 500),
        achievement(7, "Quick Fingers", "Reach 5 clicks per second", ClicksPerSecond(5), 75),
        achievement(8, "Marathoner", "Make 500 clicks", TotalClicks(500), 150),
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClickerState {
    pub points: u64,
    pub total_clicks: u64,
    pub clicks_per_second: u64,
    recent: VecDeque<u64>,
    pub achievements: Vec<Achievement>,
}

impl Default for ClickerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickerState {
    pub fn new() -> Self {
        ClickerState {
            points: 0,
            total_clicks: 0,
            clicks_per_second: 0,
            recent: VecDeque::new(),
            achievements: default_achievements(),
        }
    }

    /// Register one click at `now_ms` and return the achievements it
    /// unlocked, in unlock order.
    pub fn click(&mut self, now_ms: u64) -> Vec<Achievement> {
        self.points += 1;
        self.total_clicks += 1;

        self.recent.push_back(now_ms);
        while let Some(&oldest) = self.recent.front() {
            if now_ms.saturating_sub(oldest) < RATE_WINDOW_MS {
                break;
            }
            self.recent.pop_front();
        }
        self.clicks_per_second = self.recent.len() as u64;

        self.unlock_reached()
    }

    /// Rewards feed back into points, so keep evaluating until nothing new
    /// unlocks.
    fn unlock_reached(&mut self) -> Vec<Achievement> {
        let mut unlocked = Vec::new();
        loop {
            let next = self
                .achievements
                .iter()
                .position(|a| !a.unlocked && self.current(a.requirement) >= target(a.requirement));
            let Some(index) = next else {
                return unlocked;
            };
            let a = &mut self.achievements[index];
            a.unlocked = true;
            self.points += a.reward;
            info!("achievement unlocked: {} (+{})", a.title, a.reward);
            unlocked.push(a.clone());
        }
    }

    fn current(&self, requirement: Requirement) -> u64 {
        match requirement {
            Requirement::Points(_) => self.points,
            Requirement::ClicksPerSecond(_) => self.clicks_per_second,
            Requirement::TotalClicks(_) => self.total_clicks,
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// `(current, required)` for the achievement with `id`.
    pub fn progress(&self, id: u8) -> Option<(u64, u64)> {
        self.achievements
            .iter()
            .find(|a| a.id == id)
            .map(|a| (self.current(a.requirement), target(a.requirement)))
    }
}

fn target(requirement: Requirement) -> u64 {
    match requirement {
        Requirement::Points(n) | Requirement::ClicksPerSecond(n) | Requirement::TotalClicks(n) => n,
    }
}
