//! Application Types and Reasons
//!
//! Each application type offers a fixed list of reasons. Some reasons are
//! special actions: choosing them has an irreversible side effect on the
//! applicant's current document and must be confirmed explicitly.

use serde::{Deserialize, Serialize};

/// Kind of application a citizen is filing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    New,
    Renewal,
    Replacement,
    Update,
}

impl ApplicationType {
    pub const ALL: [Self; 4] = [Self::New, Self::Renewal, Self::Replacement, Self::Update];

    /// Whether a reason must be chosen before submission.
    #[must_use]
    pub const fn requires_reason(self) -> bool {
        !matches!(self, Self::New)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Renewal => "renewal",
            Self::Replacement => "replacement",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable reason for an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReasonOption {
    pub id: &'static str,
    pub label: &'static str,
    /// Selecting this reason blocks or invalidates the current document.
    pub special_action: bool,
    /// Shown before a special action is confirmed.
    pub warning: Option<&'static str>,
}

const fn plain(id: &'static str, label: &'static str) -> ReasonOption {
    ReasonOption {
        id,
        label,
        special_action: false,
        warning: None,
    }
}

const fn special(id: &'static str, label: &'static str, warning: &'static str) -> ReasonOption {
    ReasonOption {
        id,
        label,
        special_action: true,
        warning: Some(warning),
    }
}

const RENEWAL_REASONS: &[ReasonOption] = &[
    plain("expired", "Document has expired"),
    plain("expiring_soon", "Document expires within six months"),
];

const REPLACEMENT_REASONS: &[ReasonOption] = &[
    special(
        "lost",
        "Document was lost",
        "Your current document will be permanently blocked and cannot be used again, even if found.",
    ),
    special(
        "stolen",
        "Document was stolen",
        "Your current document will be permanently blocked and reported as stolen.",
    ),
    plain("damaged", "Document is damaged"),
];

const UPDATE_REASONS: &[ReasonOption] = &[
    plain("name_change", "Change of name"),
    plain("address_change", "Change of address"),
    special(
        "data_correction",
        "Correction of recorded data",
        "Your current document will be invalidated once the corrected document is issued.",
    ),
    plain("photo_update", "New photograph"),
];

/// Reasons offered for an application type. Empty for new applications.
#[must_use]
pub const fn reasons_for(application_type: ApplicationType) -> &'static [ReasonOption] {
    match application_type {
        ApplicationType::New => &[],
        ApplicationType::Renewal => RENEWAL_REASONS,
        ApplicationType::Replacement => REPLACEMENT_REASONS,
        ApplicationType::Update => UPDATE_REASONS,
    }
}

/// Find a reason by id within the list for `application_type`.
#[must_use]
pub fn find_reason(application_type: ApplicationType, id: &str) -> Option<&'static ReasonOption> {
    reasons_for(application_type).iter().find(|r| r.id == id)
}
