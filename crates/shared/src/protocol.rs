use serde::{Deserialize, Serialize};

use crate::{domain::PartnerRecord, error::FetchError};

/// Top-level shape of the published partner document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerDocument {
    #[serde(rename = "getColleges")]
    pub get_colleges: Vec<PartnerRecord>,
}

pub fn decode_partner_document(bytes: &[u8]) -> Result<Vec<PartnerRecord>, FetchError> {
    serde_json::from_slice::<PartnerDocument>(bytes)
        .map(|document| document.get_colleges)
        .map_err(|err| FetchError::Malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn decodes_colleges_in_document_order() {
        let body = br#"{
            "getColleges": [
                {"name": "Beta", "groupPrefix": "BT", "logo": "https://cdn/b.png",
                 "preroll": "https://cdn/b.mp4", "ofstedRating": "Outstanding"},
                {"name": "Acme", "groupPrefix": "AC", "logo": "https://cdn/a.png",
                 "preroll": "https://cdn/a.mp4", "ofstedRating": "Good", "extra": 1}
            ]
        }"#;

        let partners = decode_partner_document(body).expect("decode");
        assert_eq!(partners.len(), 2);
        assert_eq!(partners[0].name, "Beta");
        assert_eq!(partners[1].group_prefix, "AC");
        assert_eq!(partners[1].ofsted_rating, "Good");
    }

    #[test]
    fn missing_collection_is_malformed() {
        let err = decode_partner_document(br#"{"colleges": []}"#).expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Malformed);
    }

    #[test]
    fn record_missing_field_is_malformed() {
        let err = decode_partner_document(br#"{"getColleges": [{"name": "Acme"}]}"#)
            .expect_err("must fail");
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = decode_partner_document(b"<html>oops</html>").expect_err("must fail");
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
