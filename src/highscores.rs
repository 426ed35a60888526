//! High score leaderboard
//!
//! Scores are ranked after normalising for screen size: a bigger arena
//! gives boxes more room, so raw scores are scaled to a 1024x1024 reference.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Reference pixel count for score adjustment
const REFERENCE_PIXELS: f64 = 1024.0 * 1024.0;

/// Raw score scaled by `sqrt(1024^2 / (width * height))`, rounded
pub fn adjusted_score(score: u32, width: u32, height: u32) -> u64 {
    let pixels = (width as f64 * height as f64).max(1.0);
    (score as f64 * (REFERENCE_PIXELS / pixels).sqrt()).round() as u64
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    /// Raw in-game score
    pub score: u32,
    /// Resolution-adjusted score used for ranking
    pub adjusted_score: u64,
    /// Seconds survived
    pub time: f32,
    /// Arena resolution the run was played at
    pub resolution: (u32, u32),
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Position a run would take, 0-based, before truncation
    fn insertion_index(&self, adjusted: u64, time: f32) -> usize {
        self.entries
            .iter()
            .position(|e| adjusted > e.adjusted_score || (adjusted == e.adjusted_score && time < e.time))
            .unwrap_or(self.entries.len())
    }

    /// Check if a run qualifies for the leaderboard
    pub fn qualifies(&self, adjusted: u64, time: f32) -> bool {
        adjusted > 0 && self.insertion_index(adjusted, time) < MAX_HIGH_SCORES
    }

    /// Get the rank a run would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, adjusted: u64, time: f32) -> Option<usize> {
        self.qualifies(adjusted, time)
            .then(|| self.insertion_index(adjusted, time) + 1)
    }

    /// Add a finished run to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(
        &mut self,
        name: impl Into<String>,
        score: u32,
        time: f32,
        resolution: (u32, u32),
    ) -> Option<usize> {
        let adjusted = adjusted_score(score, resolution.0, resolution.1);
        if !self.qualifies(adjusted, time) {
            return None;
        }
        let index = self.insertion_index(adjusted, time);
        self.entries.insert(
            index,
            HighScoreEntry {
                name: name.into(),
                score,
                adjusted_score: adjusted,
                time,
                resolution,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("New high score #{}: {} ({} raw) in {:.2}s", index + 1, adjusted, score, time);
        Some(index + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top adjusted score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.adjusted_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: (u32, u32) = (1024, 1024);

    #[test]
    fn test_adjusted_score_scales_with_resolution() {
        assert_eq!(adjusted_score(100, 1024, 1024), 100);
        // Quarter the pixels, double the score
        assert_eq!(adjusted_score(100, 512, 512), 200);
        assert_eq!(adjusted_score(100, 2048, 2048), 50);
        assert_eq!(adjusted_score(7, 0, 0), 7168);
    }

    #[test]
    fn test_sorted_by_adjusted_then_time() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score("a", 50, 30.0, RES), Some(1));
        assert_eq!(scores.add_score("b", 80, 40.0, RES), Some(1));
        // Same score, faster time ranks higher
        assert_eq!(scores.add_score("c", 50, 20.0, RES), Some(2));
        // Same score, slower time goes after
        assert_eq!(scores.add_score("d", 50, 35.0, RES), Some(4));

        let names: Vec<_> = scores.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a", "d"]);
        assert_eq!(scores.top_score(), Some(80));
    }

    #[test]
    fn test_small_screen_outranks_raw_score() {
        let mut scores = HighScores::new();
        scores.add_score("big", 100, 10.0, (2048, 2048));
        assert_eq!(scores.add_score("small", 60, 10.0, (1024, 1024)), Some(1));
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut scores = HighScores::new();
        for i in 1..=12u32 {
            scores.add_score(format!("p{i}"), i * 10, 5.0, RES);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(120));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));

        assert!(!scores.qualifies(20, 5.0));
        assert_eq!(scores.potential_rank(25, 1.0), None);
        assert_eq!(scores.potential_rank(35, 1.0), Some(10));
        assert_eq!(scores.add_score("late", 10, 1.0, RES), None);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(scores.is_empty());
        assert!(!scores.qualifies(0, 1.0));
    }
}
