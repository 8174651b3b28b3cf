//! Demo records loaded when `SEED_FIXTURES` is enabled.
//!
//! Eight applications: three pending, three approved, one rejected and one
//! under review.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use natioid_common::{ApplicationRecord, ApplicationStatus, ApplicationType, DocumentType};
use uuid::Uuid;

pub const PENDING_IDS: [Uuid; 3] = [
    Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001),
    Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0002),
    Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0003),
];

pub const APPROVED_IDS: [Uuid; 3] = [
    Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0004),
    Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0005),
    Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0006),
];

pub const REJECTED_ID: Uuid = Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0007);

pub const UNDER_REVIEW_ID: Uuid = Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0008);

struct Fixture {
    id: Uuid,
    name: &'static str,
    application_type: ApplicationType,
    document_type: DocumentType,
    reason: Option<&'static str>,
    status: ApplicationStatus,
    rejection_reason: Option<&'static str>,
}

const FIXTURES: [Fixture; 8] = [
    Fixture {
        id: PENDING_IDS[0],
        name: "Amina Okafor",
        application_type: ApplicationType::New,
        document_type: DocumentType::NationalIdCard,
        reason: None,
        status: ApplicationStatus::Pending,
        rejection_reason: None,
    },
    Fixture {
        id: PENDING_IDS[1],
        name: "Kofi Mensah",
        application_type: ApplicationType::Renewal,
        document_type: DocumentType::Passport,
        reason: Some("expired"),
        status: ApplicationStatus::Pending,
        rejection_reason: None,
    },
    Fixture {
        id: PENDING_IDS[2],
        name: "Lindiwe Dlamini",
        application_type: ApplicationType::Replacement,
        document_type: DocumentType::DrivingLicense,
        reason: Some("lost"),
        status: ApplicationStatus::Pending,
        rejection_reason: None,
    },
    Fixture {
        id: APPROVED_IDS[0],
        name: "Tariq Haddad",
        application_type: ApplicationType::New,
        document_type: DocumentType::Passport,
        reason: None,
        status: ApplicationStatus::Approved,
        rejection_reason: None,
    },
    Fixture {
        id: APPROVED_IDS[1],
        name: "Mei Lin Tan",
        application_type: ApplicationType::Update,
        document_type: DocumentType::NationalIdCard,
        reason: Some("address_change"),
        status: ApplicationStatus::Approved,
        rejection_reason: None,
    },
    Fixture {
        id: APPROVED_IDS[2],
        name: "Joao Pereira",
        application_type: ApplicationType::New,
        document_type: DocumentType::BirthCertificate,
        reason: None,
        status: ApplicationStatus::Approved,
        rejection_reason: None,
    },
    Fixture {
        id: REJECTED_ID,
        name: "Sofia Rossi",
        application_type: ApplicationType::New,
        document_type: DocumentType::ResidencePermit,
        reason: None,
        status: ApplicationStatus::Rejected,
        rejection_reason: Some("Supporting documents did not match the declared address"),
    },
    Fixture {
        id: UNDER_REVIEW_ID,
        name: "Nia Abara",
        application_type: ApplicationType::Renewal,
        document_type: DocumentType::NationalIdCard,
        reason: Some("expiring_soon"),
        status: ApplicationStatus::UnderReview,
        rejection_reason: None,
    },
];

/// Build the demo records, submitted one day apart ending at `now`.
pub fn fixtures(now: DateTime<Utc>) -> Vec<ApplicationRecord> {
    let count = FIXTURES.len() as i64;
    FIXTURES
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let submitted_at = now - Duration::days(count - i as i64);
            let mut fields = BTreeMap::new();
            fields.insert("full_name".to_string(), f.name.to_string());
            ApplicationRecord {
                id: f.id,
                tracking_code: format!("NID-2026-{:06}", i + 1),
                applicant_name: f.name.to_string(),
                application_type: f.application_type,
                document_type: f.document_type,
                reason: f.reason.map(str::to_string),
                fields,
                status: f.status,
                fee: None,
                fee_paid_at: None,
                rejection_reason: f.rejection_reason.map(str::to_string),
                assigned_operator: None,
                submitted_at,
                updated_at: submitted_at,
            }
        })
        .collect()
}
