//! Document type and reason catalog.
//!
//! Read-only lookups the citizen wizard uses to render its steps.

use axum::{extract::Path, Json};
use natioid_common::{reasons_for, ApplicationType, DocumentType, FieldKind};
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DocumentTypeInfo {
    pub document_type: DocumentType,
    pub label: String,
    pub has_back_side: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FieldInfo {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Date fields are optional at submission.
    pub required: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DocumentFields {
    pub document_type: DocumentType,
    pub fields: Vec<FieldInfo>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReasonInfo {
    pub id: String,
    pub label: String,
    /// Choosing this reason requires an explicit confirmation.
    pub special_action: bool,
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReasonList {
    pub application_type: ApplicationType,
    pub requires_reason: bool,
    pub reasons: Vec<ReasonInfo>,
}

/// GET /api/document-types
pub async fn list_document_types() -> Json<Vec<DocumentTypeInfo>> {
    Json(
        DocumentType::ALL
            .iter()
            .map(|&t| DocumentTypeInfo {
                document_type: t,
                label: t.label().to_string(),
                has_back_side: t.has_back_side(),
            })
            .collect(),
    )
}

/// GET /api/document-types/{document_type}/fields
pub async fn document_fields(Path(document_type): Path<DocumentType>) -> Json<DocumentFields> {
    let fields = document_type
        .fields()
        .iter()
        .map(|f| FieldInfo {
            name: f.name.to_string(),
            label: f.label.to_string(),
            kind: f.kind,
            required: f.kind != FieldKind::Date,
        })
        .collect();

    Json(DocumentFields {
        document_type,
        fields,
    })
}

/// GET /api/application-types/{application_type}/reasons
pub async fn application_reasons(
    Path(application_type): Path<ApplicationType>,
) -> Json<ReasonList> {
    let reasons = reasons_for(application_type)
        .iter()
        .map(|r| ReasonInfo {
            id: r.id.to_string(),
            label: r.label.to_string(),
            special_action: r.special_action,
            warning: r.warning.map(str::to_string),
        })
        .collect();

    Json(ReasonList {
        application_type,
        requires_reason: application_type.requires_reason(),
        reasons,
    })
}
