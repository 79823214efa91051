use serde::{Deserialize, Serialize};

/// Status of a single grid position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Unselected,
    Selected,
    Excluded,
}

impl Cell {
    /// State after a drag release passes over this cell.
    ///
    /// `Excluded` is terminal: dragging over it again never revives it.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Unselected => Self::Selected,
            Self::Selected => Self::Excluded,
            Self::Excluded => Self::Excluded,
        }
    }

    pub const fn is_selected(self) -> bool {
        matches!(self, Self::Selected)
    }
}
