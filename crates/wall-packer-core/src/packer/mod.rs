use crate::config::StartingDirection;

pub mod bidirectional;
pub mod segment;
pub mod small;

/// Which end of the segment the cursor walks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// Direction for a row under the given starting rule. `Alternate` flips
    /// on odd rows to produce the running bond.
    pub fn for_row(row: usize, start: StartingDirection) -> Self {
        match start {
            StartingDirection::Left => Self::LeftToRight,
            StartingDirection::Right => Self::RightToLeft,
            StartingDirection::Alternate => {
                if row % 2 == 0 {
                    Self::LeftToRight
                } else {
                    Self::RightToLeft
                }
            }
        }
    }

    /// Direction for every row of the small variant: pinned, never
    /// alternating.
    pub fn pinned(start: StartingDirection) -> Self {
        match start {
            StartingDirection::Right => Self::RightToLeft,
            StartingDirection::Left | StartingDirection::Alternate => Self::LeftToRight,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftToRight => "left_to_right",
            Self::RightToLeft => "right_to_left",
        }
    }
}
