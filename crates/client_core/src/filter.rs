//! Derives the displayed subset of partners from the full dataset and filter criteria.

use shared::domain::{FilterCriteria, FilterValue, PartnerRecord};

/// Returns the records matching every non-empty criterion, in input order.
///
/// Text criteria match by case-sensitive substring. Selection criteria match when the
/// lower-cased attribute is one of the selected values.
pub fn apply(full: &[PartnerRecord], criteria: &FilterCriteria) -> Vec<PartnerRecord> {
    full.iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect()
}

pub fn matches(record: &PartnerRecord, criteria: &FilterCriteria) -> bool {
    criteria.active().all(|(column, value)| {
        let attribute = column.value(record);
        match value {
            FilterValue::Text(needle) => attribute.contains(needle.as_str()),
            FilterValue::Selection(selected) => selected.contains(&attribute.to_lowercase()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::PartnerColumn;

    fn partner(name: &str, prefix: &str, rating: &str) -> PartnerRecord {
        PartnerRecord {
            name: name.to_string(),
            group_prefix: prefix.to_string(),
            logo: format!("https://cdn.example/{prefix}.png"),
            preroll: format!("https://cdn.example/{prefix}.mp4"),
            ofsted_rating: rating.to_string(),
        }
    }

    fn dataset() -> Vec<PartnerRecord> {
        vec![
            partner("Acme", "AC", "Good"),
            partner("Beta", "BT", "Outstanding"),
            partner("Acme North", "ACN", "requires improvement"),
        ]
    }

    fn names(rows: &[PartnerRecord]) -> Vec<&str> {
        rows.iter().map(|row| row.name.as_str()).collect()
    }

    #[test]
    fn empty_criteria_keeps_everything() {
        let data = dataset();
        assert_eq!(apply(&data, &FilterCriteria::new()), data);

        let blank = FilterCriteria::new()
            .with_text(PartnerColumn::Name, "")
            .with_selection(PartnerColumn::OfstedRating, Vec::<String>::new());
        assert_eq!(apply(&data, &blank), data);
    }

    #[test]
    fn selection_matches_lower_cased_rating() {
        let data = vec![partner("Acme", "AC", "Good"), partner("Beta", "BT", "Outstanding")];
        let criteria = FilterCriteria::new().with_selection(PartnerColumn::OfstedRating, ["good"]);
        assert_eq!(names(&apply(&data, &criteria)), vec!["Acme"]);
    }

    #[test]
    fn text_match_is_case_sensitive_substring() {
        let data = dataset();
        let criteria = FilterCriteria::new().with_text(PartnerColumn::Name, "Acme");
        assert_eq!(names(&apply(&data, &criteria)), vec!["Acme", "Acme North"]);

        let criteria = FilterCriteria::new().with_text(PartnerColumn::Name, "acme");
        assert!(apply(&data, &criteria).is_empty());
    }

    #[test]
    fn criteria_combine_with_and() {
        let data = dataset();
        let criteria = FilterCriteria::new()
            .with_text(PartnerColumn::GroupPrefix, "AC")
            .with_selection(
                PartnerColumn::OfstedRating,
                ["requires improvement", "outstanding"],
            );
        assert_eq!(names(&apply(&data, &criteria)), vec!["Acme North"]);
    }

    #[test]
    fn no_match_yields_empty_rows() {
        let criteria = FilterCriteria::new().with_text(PartnerColumn::Name, "z");
        assert!(apply(&dataset(), &criteria).is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_input_untouched() {
        let data = dataset();
        let criteria = FilterCriteria::new().with_text(PartnerColumn::Name, "ta");
        let once = apply(&data, &criteria);
        let twice = apply(&once, &criteria);
        assert_eq!(once, twice);
        assert_eq!(data, dataset());
        assert_eq!(names(&once), vec!["Beta"]);
    }
}
