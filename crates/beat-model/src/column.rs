use std::fmt;

use serde::{Deserialize, Serialize};

/// Input column a note belongs to.
///
/// Each column carries its own independent note sequence. `Scratch` is the
/// turntable, which is a continuous controller rather than a binary switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    Scratch,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
}

impl Column {
    /// Number of columns per player.
    pub const COUNT: usize = 8;

    /// All columns in index order.
    pub const ALL: [Column; Self::COUNT] = [
        Column::Scratch,
        Column::Key1,
        Column::Key2,
        Column::Key3,
        Column::Key4,
        Column::Key5,
        Column::Key6,
        Column::Key7,
    ];

    /// Index into per-column tables (0 = scratch).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_scratch(self) -> bool {
        self == Column::Scratch
    }

    /// Channel suffix used by the host input mapper (`SC`, `1`..`7`).
    pub fn channel_name(self) -> &'static str {
        match self {
            Column::Scratch => "SC",
            Column::Key1 => "1",
            Column::Key2 => "2",
            Column::Key3 => "3",
            Column::Key4 => "4",
            Column::Key5 => "5",
            Column::Key6 => "6",
            Column::Key7 => "7",
        }
    }

    /// Resolve a channel suffix. `SC2` is the second scratch direction and
    /// maps onto the same column.
    pub fn from_channel_name(name: &str) -> Option<Self> {
        match name {
            "SC" | "SC2" => Some(Column::Scratch),
            "1" => Some(Column::Key1),
            "2" => Some(Column::Key2),
            "3" => Some(Column::Key3),
            "4" => Some(Column::Key4),
            "5" => Some(Column::Key5),
            "6" => Some(Column::Key6),
            "7" => Some(Column::Key7),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.channel_name())
    }
}
