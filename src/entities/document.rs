//! Document metadata: which server-side document this state belongs to.

use serde::{Deserialize, Serialize};

use crate::core::action::Action;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_id: Option<String>,
    pub base_url: String,
}

pub fn reduce(document: &Document, action: &Action) -> Option<Document> {
    match action {
        Action::AssignDocumentId { document_id, base_url } => {
            let next = Document { document_id: Some(document_id.clone()), base_url: base_url.clone() };
            (next != *document).then_some(next)
        }
        _ => None,
    }
}
