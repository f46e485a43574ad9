//! Column sorting and the header-activation state machine.

use serde::Serialize;
use shared::domain::{PartnerColumn, PartnerRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        if self == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// What the displayed rows must undergo after a header activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAction {
    SortBy(PartnerColumn),
    Reverse,
}

/// Last-touched column and its direction.
///
/// Only meaningful relative to the last sort action: a later filter replaces the rows
/// without touching this state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub active_column: Option<PartnerColumn>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn activate(&mut self, column: PartnerColumn) -> SortAction {
        if self.active_column == Some(column) {
            self.direction = self.direction.toggled();
            SortAction::Reverse
        } else {
            self.active_column = Some(column);
            self.direction = SortDirection::Ascending;
            SortAction::SortBy(column)
        }
    }

    /// Direction to show on `column`'s header, if it is the active one.
    pub fn indicator(&self, column: PartnerColumn) -> Option<SortDirection> {
        (self.active_column == Some(column)).then_some(self.direction)
    }
}

/// Stable ascending sort by the column's string value.
pub fn sort_by(rows: &mut [PartnerRecord], column: PartnerColumn) {
    rows.sort_by(|a, b| column.value(a).cmp(column.value(b)));
}

pub fn reverse(rows: &mut [PartnerRecord]) {
    rows.reverse();
}

pub fn apply_action(rows: &mut [PartnerRecord], action: SortAction) {
    match action {
        SortAction::SortBy(column) => sort_by(rows, column),
        SortAction::Reverse => reverse(rows),
    }
}
