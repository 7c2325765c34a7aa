use std::collections::VecDeque;

use crate::training::episode::GameReport;

/// Rolling statistics over recent simulated games.
#[derive(Debug)]
pub struct GameMetrics {
    reports: VecDeque<GameReport>,
    capacity: usize,
    total_games: usize,
    best: Option<usize>,
    worst: Option<usize>,
}

impl GameMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        GameMetrics {
            reports: VecDeque::with_capacity(capacity),
            capacity,
            total_games: 0,
            best: None,
            worst: None,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_game(&mut self, report: GameReport) {
        self.total_games += 1;
        if report.won {
            self.best = Some(self.best.map_or(report.shots, |b| b.min(report.shots)));
            self.worst = Some(self.worst.map_or(report.shots, |w| w.max(report.shots)));
        }
        self.reports.push_back(report);
        if self.reports.len() > self.capacity {
            self.reports.pop_front();
        }
    }

    /// Mean shots per game over the last N games.
    pub fn average_shots(&self, last_n: usize) -> f32 {
        let n = self.reports.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.reports.iter().rev().take(n).map(|r| r.shots).sum();
        total as f32 / n as f32
    }

    /// Share of the last N games in which the whole fleet was sunk.
    pub fn win_rate(&self, last_n: usize) -> f32 {
        let n = self.reports.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let wins = self.reports.iter().rev().take(n).filter(|r| r.won).count();
        wins as f32 / n as f32
    }

    /// Fewest shots in any won game so far.
    pub fn best_game(&self) -> Option<usize> {
        self.best
    }

    /// Most shots in any won game so far.
    pub fn worst_game(&self) -> Option<usize> {
        self.worst
    }

    pub fn total_games(&self) -> usize {
        self.total_games
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(shots: usize, won: bool) -> GameReport {
        GameReport {
            shots,
            ships_sunk: if won { 10 } else { 3 },
            won,
        }
    }

    #[test]
    fn test_empty_metrics() {
        let m = GameMetrics::new();
        assert_eq!(m.average_shots(10), 0.0);
        assert_eq!(m.win_rate(10), 0.0);
        assert_eq!(m.best_game(), None);
        assert_eq!(m.total_games(), 0);
    }

    #[test]
    fn test_rolling_window() {
        let mut m = GameMetrics::with_capacity(2);
        m.record_game(report(60, true));
        m.record_game(report(50, true));
        m.record_game(report(40, false));

        assert_eq!(m.total_games(), 3);
        assert!((m.average_shots(10) - 45.0).abs() < 1e-6);
        assert!((m.win_rate(10) - 0.5).abs() < 1e-6);
        assert!((m.average_shots(1) - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_best_and_worst_count_only_wins() {
        let mut m = GameMetrics::new();
        m.record_game(report(70, true));
        m.record_game(report(10, false));
        m.record_game(report(55, true));
        assert_eq!(m.best_game(), Some(55));
        assert_eq!(m.worst_game(), Some(70));
    }
}
