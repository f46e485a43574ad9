//! Column model of the partners table. Each header is declared together with the
//! renderer for its cells.

use shared::domain::{PartnerColumn, PartnerRecord};

use crate::sort::SortState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Text(String),
    /// Image at `src`, activating it opens `href`.
    Image { src: String, href: String },
}

impl CellContent {
    /// Plain-text rendering for terminals and logs.
    pub fn as_plain_text(&self) -> &str {
        match self {
            CellContent::Text(text) => text,
            CellContent::Image { href, .. } => href,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableColumn {
    pub column: PartnerColumn,
    pub label: &'static str,
    pub cell: fn(&PartnerRecord) -> CellContent,
}

impl TableColumn {
    pub fn render(&self, record: &PartnerRecord) -> CellContent {
        (self.cell)(record)
    }

    /// Header text with the sort arrow appended when this column is active.
    pub fn header_text(&self, sort: &SortState) -> String {
        match sort.indicator(self.column) {
            Some(direction) => format!("{} {}", self.label, direction.arrow()),
            None => self.label.to_string(),
        }
    }
}

pub fn partner_columns() -> Vec<TableColumn> {
    vec![
        TableColumn {
            column: PartnerColumn::Name,
            label: "Partner",
            cell: |record| CellContent::Text(record.name.clone()),
        },
        TableColumn {
            column: PartnerColumn::GroupPrefix,
            label: "Prefix",
            cell: |record| CellContent::Text(record.group_prefix.clone()),
        },
        TableColumn {
            column: PartnerColumn::Logo,
            label: "Logo/Preroll",
            cell: |record| CellContent::Image {
                src: record.logo.clone(),
                href: record.preroll.clone(),
            },
        },
        TableColumn {
            column: PartnerColumn::OfstedRating,
            label: "Ofsted Rating",
            cell: |record| CellContent::Text(record.ofsted_rating.clone()),
        },
    ]
}
