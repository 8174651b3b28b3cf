//! Document Types
//!
//! Static registry mapping each identity document type to the fields an
//! applicant must provide for it.

use serde::{Deserialize, Serialize};

/// Identity document an applicant can apply for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    NationalIdCard,
    Passport,
    DrivingLicense,
    BirthCertificate,
    ResidencePermit,
}

/// How a field value is entered and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    /// `YYYY-MM-DD`. Date fields are picked from a calendar control and are
    /// not part of the required-value check.
    Date,
}

/// One required field of a document schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn text(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Text,
    }
}

const fn number(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Number,
    }
}

const fn date(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Date,
    }
}

const NATIONAL_ID_CARD_FIELDS: &[FieldSpec] = &[
    text("full_name", "Full name"),
    number("national_id_number", "National ID number"),
    date("date_of_birth", "Date of birth"),
    text("place_of_birth", "Place of birth"),
    text("address", "Address"),
];

const PASSPORT_FIELDS: &[FieldSpec] = &[
    text("full_name", "Full name"),
    text("nationality", "Nationality"),
    date("date_of_birth", "Date of birth"),
    text("place_of_birth", "Place of birth"),
    number("height_cm", "Height (cm)"),
];

const DRIVING_LICENSE_FIELDS: &[FieldSpec] = &[
    text("full_name", "Full name"),
    text("license_category", "License category"),
    date("date_of_birth", "Date of birth"),
    text("address", "Address"),
    text("blood_type", "Blood type"),
];

const BIRTH_CERTIFICATE_FIELDS: &[FieldSpec] = &[
    text("full_name", "Full name"),
    date("date_of_birth", "Date of birth"),
    text("place_of_birth", "Place of birth"),
    text("father_name", "Father's name"),
    text("mother_name", "Mother's name"),
];

const RESIDENCE_PERMIT_FIELDS: &[FieldSpec] = &[
    text("full_name", "Full name"),
    text("nationality", "Nationality"),
    text("passport_number", "Passport number"),
    date("date_of_entry", "Date of entry"),
    text("address", "Address"),
];

impl DocumentType {
    /// Every document type, in catalogue order.
    pub const ALL: [Self; 5] = [
        Self::NationalIdCard,
        Self::Passport,
        Self::DrivingLicense,
        Self::BirthCertificate,
        Self::ResidencePermit,
    ];

    /// Required fields for this document, in display order.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::NationalIdCard => NATIONAL_ID_CARD_FIELDS,
            Self::Passport => PASSPORT_FIELDS,
            Self::DrivingLicense => DRIVING_LICENSE_FIELDS,
            Self::BirthCertificate => BIRTH_CERTIFICATE_FIELDS,
            Self::ResidencePermit => RESIDENCE_PERMIT_FIELDS,
        }
    }

    /// Look up a single field of this document's schema.
    #[must_use]
    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Whether the physical document has a back side worth capturing.
    ///
    /// Informational: the back image is optional for every type.
    #[must_use]
    pub const fn has_back_side(self) -> bool {
        matches!(
            self,
            Self::NationalIdCard | Self::DrivingLicense | Self::ResidencePermit
        )
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NationalIdCard => "National ID card",
            Self::Passport => "Passport",
            Self::DrivingLicense => "Driving license",
            Self::BirthCertificate => "Birth certificate",
            Self::ResidencePermit => "Residence permit",
        }
    }

    /// Wire name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NationalIdCard => "national_id_card",
            Self::Passport => "passport",
            Self::DrivingLicense => "driving_license",
            Self::BirthCertificate => "birth_certificate",
            Self::ResidencePermit => "residence_permit",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_schema_starts_with_full_name() {
        for doc in DocumentType::ALL {
            assert_eq!(doc.fields()[0].name, "full_name", "{doc}");
        }
    }

    #[test]
    fn field_names_are_unique_per_schema() {
        for doc in DocumentType::ALL {
            let names: HashSet<_> = doc.fields().iter().map(|f| f.name).collect();
            assert_eq!(names.len(), doc.fields().len(), "{doc}");
        }
    }

    #[test]
    fn every_schema_has_a_date_field() {
        for doc in DocumentType::ALL {
            assert!(
                doc.fields().iter().any(|f| f.kind == FieldKind::Date),
                "{doc} should have a date field"
            );
        }
    }

    #[test]
    fn field_lookup() {
        let f = DocumentType::Passport.field("height_cm").unwrap();
        assert_eq!(f.kind, FieldKind::Number);
        assert!(DocumentType::Passport.field("license_category").is_none());
    }

    #[test]
    fn display_matches_serde() {
        for doc in DocumentType::ALL {
            let json = serde_json::to_string(&doc).unwrap();
            assert_eq!(json, format!("\"{doc}\""));
        }
    }
}
