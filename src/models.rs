use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub country: String,
    pub major: String,
    pub year: String,
    pub compatibility: u8, // 0-100, supplied with the record, never recomputed
    pub challenges_completed: u32,
    pub total_challenges: u32,
    pub last_activity: String,
    pub activities: Vec<String>,
    pub status: PresenceStatus,
    pub interests: Vec<String>,
    pub languages: Vec<String>,
}

impl Person {
    pub fn compatibility_band(&self) -> CompatibilityBand {
        CompatibilityBand::of(self.compatibility)
    }

    pub fn challenge_progress(&self) -> u16 {
        progress_percent(self.challenges_completed, self.total_challenges)
    }
}

/// Display band for a precomputed compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatibilityBand {
    High,   // 90 and above
    Medium, // 80 - 89
    Low,
}

impl CompatibilityBand {
    pub fn of(score: u8) -> Self {
        if score >= 90 {
            CompatibilityBand::High
        } else if score >= 80 {
            CompatibilityBand::Medium
        } else {
            CompatibilityBand::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    Own,
    Counterpart,
}

/// Delivery status is assigned when a message is created and never advanced.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub timestamp: String, // display string, e.g. "2:30 PM" or "Yesterday 4:30 PM"
    pub origin: MessageOrigin,
    pub delivery_status: DeliveryStatus,
}

impl Message {
    pub fn is_own(&self) -> bool {
        self.origin == MessageOrigin::Own
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub country: String,
    pub major: String,
    pub last_message: String,
    pub last_activity: String,
    pub unread_count: u32,
    pub status: PresenceStatus,
    pub messages: Vec<Message>,
}

/// Shared by challenges and campus locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Campus,
    Social,
    Academic,
    Physical,
    Cultural,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Campus,
        Category::Social,
        Category::Academic,
        Category::Physical,
        Category::Cultural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Campus => "campus",
            Category::Social => "social",
            Category::Academic => "academic",
            Category::Physical => "physical",
            Category::Cultural => "cultural",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Campus => "Campus",
            Category::Social => "Social",
            Category::Academic => "Academic",
            Category::Physical => "Physical",
            Category::Cultural => "Cultural",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for Category {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub category: Category,
    pub location: String,
    pub distance: String,
    pub completed: bool,
    pub participants: u32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub distance: String,
    pub activities: u32,
    pub active_users: u32,
    pub coordinates: Coordinates,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub total_points: u32,
    pub completed_challenges: u32,
    pub total_challenges: u32,
    pub current_streak: u32,
}

impl UserStats {
    pub fn progress(&self) -> u16 {
        progress_percent(self.completed_challenges, self.total_challenges)
    }
}

fn progress_percent(done: u32, total: u32) -> u16 {
    if total == 0 {
        return 0;
    }
    ((done.min(total) as u64 * 100) / total as u64) as u16
}
