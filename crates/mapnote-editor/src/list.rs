//! Annotation list projection.
//!
//! The list is rebuilt from scratch on every store change.

use mapnote_core::{Annotation, AnnotationId, ShapeId};

/// One row of the list panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: AnnotationId,
    pub shape: ShapeId,
    pub title: String,
    /// Kind shown under the title (`marker`, `polygon`, ...).
    pub kind_label: &'static str,
}

/// Interaction on a list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Row clicked: fit the map to the annotation and open its popup.
    Activate(AnnotationId),
    /// Embedded edit control: open the form. Must not also activate the row.
    Edit(AnnotationId),
}

/// Project annotations, in store order, into list rows.
pub fn render<'a>(annotations: impl IntoIterator<Item = &'a Annotation>) -> Vec<ListRow> {
    annotations
        .into_iter()
        .map(|a| ListRow {
            id: a.id,
            shape: a.shape,
            title: a.title.clone(),
            kind_label: a.kind.as_str(),
        })
        .collect()
}
