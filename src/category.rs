//! Sound categories, one per application event.

use std::fmt;
use std::str::FromStr;

use crate::error::SoundError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Notification,
    Blocked,
    Completed,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Notification, Category::Blocked, Category::Completed];

    /// Parse a category name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Result<Self, SoundError> {
        let lowered = name.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.dir_name() == lowered)
            .ok_or_else(|| SoundError::InvalidCategory { name: name.to_string() })
    }

    /// Subdirectory holding this category's sounds.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Notification => "notification",
            Category::Blocked => "blocked",
            Category::Completed => "completed",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Category::ALL.iter().map(|c| c.dir_name()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s)
    }
}
