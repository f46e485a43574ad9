//! Filter form state: one value per field descriptor, collected into criteria on submit.

use std::collections::{BTreeMap, BTreeSet};

use shared::domain::{
    FieldDescriptor, FieldOption, FieldType, FilterCriteria, FilterValue, PartnerColumn,
};

/// Fields offered by the partners filter form, in display order.
pub fn filter_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::input(PartnerColumn::Name, "Name"),
        FieldDescriptor::input(PartnerColumn::GroupPrefix, "Prefix"),
        FieldDescriptor::dropdown(
            PartnerColumn::OfstedRating,
            "Ofsted Rating",
            vec![
                FieldOption::new("good", "Good"),
                FieldOption::new("requires improvement", "Requires Improvement"),
                FieldOption::new("inadequate", "Inadequate"),
                FieldOption::new("outstanding", "Outstanding"),
            ],
        ),
    ]
}

/// Values typed or selected so far. Submitting does not clear them.
#[derive(Debug, Clone)]
pub struct FilterForm {
    fields: Vec<FieldDescriptor>,
    text: BTreeMap<PartnerColumn, String>,
    selected: BTreeMap<PartnerColumn, BTreeSet<String>>,
    search: BTreeMap<PartnerColumn, String>,
}

impl FilterForm {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            text: BTreeMap::new(),
            selected: BTreeMap::new(),
            search: BTreeMap::new(),
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn text(&self, field: PartnerColumn) -> &str {
        self.text.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Editable buffer for an input field.
    pub fn text_mut(&mut self, field: PartnerColumn) -> &mut String {
        self.text.entry(field).or_default()
    }

    pub fn set_text(&mut self, field: PartnerColumn, value: impl Into<String>) {
        self.text.insert(field, value.into());
    }

    pub fn is_selected(&self, field: PartnerColumn, value: &str) -> bool {
        self.selected
            .get(&field)
            .is_some_and(|values| values.contains(value))
    }

    pub fn set_selected(&mut self, field: PartnerColumn, value: &str, selected: bool) {
        let values = self.selected.entry(field).or_default();
        if selected {
            values.insert(value.to_string());
        } else {
            values.remove(value);
        }
    }

    pub fn selected(&self, field: PartnerColumn) -> impl Iterator<Item = &str> {
        self.selected
            .get(&field)
            .into_iter()
            .flat_map(|values| values.iter().map(String::as_str))
    }

    /// Search query typed into a dropdown.
    pub fn search_mut(&mut self, field: PartnerColumn) -> &mut String {
        self.search.entry(field).or_default()
    }

    /// Options of `descriptor` whose text contains the dropdown's search query,
    /// ignoring case.
    pub fn visible_options<'a>(&self, descriptor: &'a FieldDescriptor) -> Vec<&'a FieldOption> {
        let query = self
            .search
            .get(&descriptor.name)
            .map(|query| query.trim().to_lowercase())
            .unwrap_or_default();
        descriptor
            .options()
            .iter()
            .filter(|option| query.is_empty() || option.text.to_lowercase().contains(&query))
            .collect()
    }

    /// Snapshot of the current values as filter criteria.
    pub fn submit(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        for field in &self.fields {
            match field.field_type {
                FieldType::Input => {
                    if let Some(text) = self.text.get(&field.name) {
                        criteria.insert(field.name, FilterValue::Text(text.clone()));
                    }
                }
                FieldType::Dropdown => {
                    if let Some(values) = self.selected.get(&field.name) {
                        criteria.insert(field.name, FilterValue::Selection(values.clone()));
                    }
                }
            }
        }
        criteria
    }
}

impl Default for FilterForm {
    fn default() -> Self {
        Self::new(filter_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fields_cover_name_prefix_and_rating() {
        let fields = filter_fields();
        let names: Vec<PartnerColumn> = fields.iter().map(|field| field.name).collect();
        assert_eq!(
            names,
            vec![
                PartnerColumn::Name,
                PartnerColumn::GroupPrefix,
                PartnerColumn::OfstedRating
            ]
        );
        assert_eq!(fields[2].field_type, FieldType::Dropdown);
        assert_eq!(fields[2].options().len(), 4);
        assert!(fields[2]
            .options()
            .iter()
            .all(|option| option.value == option.value.to_lowercase()));
    }

    #[test]
    fn untouched_form_submits_empty_criteria() {
        assert!(FilterForm::default().submit().is_empty());
    }

    #[test]
    fn submit_collects_text_and_selection_and_keeps_values() {
        let mut form = FilterForm::default();
        form.text_mut(PartnerColumn::Name).push_str("Acme");
        form.set_selected(PartnerColumn::OfstedRating, "good", true);
        form.set_selected(PartnerColumn::OfstedRating, "inadequate", true);
        form.set_selected(PartnerColumn::OfstedRating, "inadequate", false);

        let criteria = form.submit();
        assert_eq!(
            criteria,
            FilterCriteria::new()
                .with_text(PartnerColumn::Name, "Acme")
                .with_selection(PartnerColumn::OfstedRating, ["good"])
        );

        assert_eq!(form.text(PartnerColumn::Name), "Acme");
        assert!(form.is_selected(PartnerColumn::OfstedRating, "good"));
        assert_eq!(form.submit(), criteria);
    }

    #[test]
    fn values_for_fields_outside_descriptors_are_not_submitted() {
        let mut form = FilterForm::new(vec![FieldDescriptor::input(PartnerColumn::Name, "Name")]);
        form.set_text(PartnerColumn::GroupPrefix, "AC");
        assert!(form.submit().get(PartnerColumn::GroupPrefix).is_none());
    }

    #[test]
    fn dropdown_search_narrows_options() {
        let fields = filter_fields();
        let mut form = FilterForm::new(fields.clone());
        form.search_mut(PartnerColumn::OfstedRating).push_str("OUT");

        let visible: Vec<&str> = form
            .visible_options(&fields[2])
            .into_iter()
            .map(|option| option.value.as_str())
            .collect();
        assert_eq!(visible, vec!["outstanding"]);
    }
}
