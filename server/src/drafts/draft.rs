//! Draft state transitions and submission checks.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use natioid_common::{find_reason, ApplicationType, DocumentType, FieldKind, ReasonOption};
use uuid::Uuid;

use super::types::{ApplicationDraft, DraftError, DraftStep, ImageRef, ImageSide, ValidationFailure};
use crate::queue::NewApplication;

impl ApplicationDraft {
    pub fn new(application_type: ApplicationType, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            application_type,
            document_type: None,
            images: Default::default(),
            fields: BTreeMap::new(),
            reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Choose the document type. Switching to a different type clears the
    /// entered fields; images are kept.
    pub fn select_document_type(&mut self, document_type: DocumentType, now: DateTime<Utc>) {
        if self.document_type == Some(document_type) {
            return;
        }
        self.document_type = Some(document_type);
        self.fields.clear();
        self.updated_at = now;
    }

    pub fn set_image(&mut self, side: ImageSide, image: Option<ImageRef>, now: DateTime<Utc>) {
        match side {
            ImageSide::Front => self.images.front = image,
            ImageSide::Back => self.images.back = image,
        }
        self.updated_at = now;
    }

    /// Merge field values into the draft.
    ///
    /// Every name must belong to the current document schema. Values are
    /// trimmed; an empty value clears the field. Nothing is written unless
    /// every entry is accepted.
    pub fn set_fields(
        &mut self,
        values: BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<(), DraftError> {
        let document_type = self.document_type.ok_or(DraftError::DocumentTypeNotSelected)?;

        let mut accepted = Vec::with_capacity(values.len());
        for (name, value) in values {
            let spec = document_type
                .field(&name)
                .ok_or_else(|| DraftError::UnknownField {
                    document_type,
                    name: name.clone(),
                })?;
            let value = value.trim().to_string();
            if !value.is_empty() {
                check_value(spec.kind, spec.label, &value)?;
            }
            accepted.push((name, value));
        }

        for (name, value) in accepted {
            if value.is_empty() {
                self.fields.remove(&name);
            } else {
                self.fields.insert(name, value);
            }
        }
        self.updated_at = now;
        Ok(())
    }

    /// Look up a reason offered for this draft's application type.
    pub fn reason_option(&self, reason_id: &str) -> Result<&'static ReasonOption, DraftError> {
        if !self.application_type.requires_reason() {
            return Err(DraftError::ReasonNotApplicable(self.application_type));
        }
        find_reason(self.application_type, reason_id)
            .ok_or_else(|| DraftError::UnknownReason(reason_id.to_string()))
    }

    /// Record the chosen reason. Special-action reasons must already be
    /// confirmed by the caller.
    pub fn apply_reason(&mut self, reason_id: &str, now: DateTime<Utc>) -> Result<(), DraftError> {
        let option = self.reason_option(reason_id)?;
        self.reason = Some(option.id.to_string());
        self.updated_at = now;
        Ok(())
    }

    /// Check the draft is ready to submit, reporting only the first problem.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        let document_type = self
            .document_type
            .ok_or(ValidationFailure::MissingDocumentType)?;

        if self.images.front.is_none() {
            return Err(ValidationFailure::MissingFrontImage);
        }

        if let Some(spec) = document_type
            .fields()
            .iter()
            .filter(|f| f.kind != FieldKind::Date)
            .find(|f| self.fields.get(f.name).is_none_or(|v| v.trim().is_empty()))
        {
            return Err(ValidationFailure::MissingField {
                name: spec.name,
                label: spec.label,
            });
        }

        if self.application_type.requires_reason() && self.reason.is_none() {
            return Err(ValidationFailure::MissingReason);
        }

        Ok(())
    }

    pub fn next_step(&self) -> DraftStep {
        match self.validate() {
            Ok(()) => DraftStep::Review,
            Err(failure) => failure.step(),
        }
    }

    /// Convert a complete draft into a queue submission.
    pub fn into_submission(self) -> Result<NewApplication, DraftError> {
        self.validate().map_err(DraftError::Incomplete)?;
        let document_type = self
            .document_type
            .ok_or(DraftError::Incomplete(ValidationFailure::MissingDocumentType))?;
        let applicant_name = self
            .fields
            .get("full_name")
            .cloned()
            .unwrap_or_default();

        Ok(NewApplication {
            applicant_name,
            application_type: self.application_type,
            document_type,
            reason: self.reason,
            fields: self.fields,
        })
    }
}

fn check_value(kind: FieldKind, label: &str, value: &str) -> Result<(), DraftError> {
    match kind {
        FieldKind::Text => Ok(()),
        FieldKind::Number if value.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        FieldKind::Number => Err(DraftError::Validation(format!("{label} must be a number"))),
        FieldKind::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| DraftError::Validation(format!("{label} must be a date (YYYY-MM-DD)"))),
    }
}
