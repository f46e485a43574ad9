use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One partner organization as published in the remote document.
///
/// `name` doubles as the row key; uniqueness is assumed but not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRecord {
    pub name: String,
    pub group_prefix: String,
    pub logo: String,
    pub preroll: String,
    pub ofsted_rating: String,
}

/// Record attributes that can be displayed, sorted on, or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartnerColumn {
    Name,
    GroupPrefix,
    Logo,
    OfstedRating,
}

impl PartnerColumn {
    pub const ALL: [PartnerColumn; 4] = [
        PartnerColumn::Name,
        PartnerColumn::GroupPrefix,
        PartnerColumn::Logo,
        PartnerColumn::OfstedRating,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PartnerColumn::Name => "name",
            PartnerColumn::GroupPrefix => "groupPrefix",
            PartnerColumn::Logo => "logo",
            PartnerColumn::OfstedRating => "ofstedRating",
        }
    }

    pub fn value(self, record: &PartnerRecord) -> &str {
        match self {
            PartnerColumn::Name => &record.name,
            PartnerColumn::GroupPrefix => &record.group_prefix,
            PartnerColumn::Logo => &record.logo,
            PartnerColumn::OfstedRating => &record.ofsted_rating,
        }
    }
}

impl fmt::Display for PartnerColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown partner column '{0}' (expected one of: name, groupPrefix, logo, ofstedRating)")]
pub struct UnknownColumn(pub String);

impl FromStr for PartnerColumn {
    type Err = UnknownColumn;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // Accepts the wire key as well as kebab/snake spellings from the command line.
        let folded: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        PartnerColumn::ALL
            .into_iter()
            .find(|column| column.key().to_ascii_lowercase() == folded)
            .ok_or_else(|| UnknownColumn(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Input,
    Dropdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub key: String,
    pub text: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            key: value.clone(),
            text: text.into(),
            value,
        }
    }
}

/// Describes one filterable field of the filter form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: PartnerColumn,
    pub label: String,
    pub field_type: FieldType,
    pub options: Option<Vec<FieldOption>>,
}

impl FieldDescriptor {
    pub fn input(name: PartnerColumn, label: impl Into<String>) -> Self {
        Self {
            name,
            label: label.into(),
            field_type: FieldType::Input,
            options: None,
        }
    }

    pub fn dropdown(name: PartnerColumn, label: impl Into<String>, options: Vec<FieldOption>) -> Self {
        Self {
            name,
            label: label.into(),
            field_type: FieldType::Dropdown,
            options: Some(options),
        }
    }

    pub fn options(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or_default()
    }
}

/// Value collected for a single field: free text for input fields, a set of
/// selected option values for dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Selection(BTreeSet<String>),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(text) => text.is_empty(),
            FilterValue::Selection(values) => values.is_empty(),
        }
    }
}

/// User-chosen filter constraints keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria(BTreeMap<PartnerColumn, FilterValue>);

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, column: PartnerColumn, text: impl Into<String>) -> Self {
        self.insert(column, FilterValue::Text(text.into()));
        self
    }

    pub fn with_selection<I, S>(mut self, column: PartnerColumn, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.insert(column, FilterValue::Selection(values));
        self
    }

    pub fn insert(&mut self, column: PartnerColumn, value: FilterValue) {
        self.0.insert(column, value);
    }

    pub fn get(&self, column: PartnerColumn) -> Option<&FilterValue> {
        self.0.get(&column)
    }

    /// Criteria that actually constrain the result; empty values are skipped.
    pub fn active(&self) -> impl Iterator<Item = (PartnerColumn, &FilterValue)> {
        self.0
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(column, value)| (*column, value))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}
