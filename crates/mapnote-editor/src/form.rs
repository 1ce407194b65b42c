//! Annotation form workflow.
//!
//! A small modal state machine around the title/description inputs. It is
//! opened either for a freshly drawn draft or for an existing annotation, and
//! closed by `save` (on success) or `cancel`.

use crate::controller::DraftShape;
use mapnote_core::{
    Annotation, AnnotationFields, AnnotationId, AnnotationKind, AnnotationStore, Geometry,
    ShapeId, StoreError, is_missing_title,
};
use thiserror::Error;

/// Errors reported by `FormWorkflow::save`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Title left empty; the form stays open.
    #[error("Please enter a title")]
    MissingTitle,

    /// Save pressed with no form open.
    #[error("No annotation form is open")]
    NotOpen,

    /// The store rejected the change. The form is closed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the open form is editing.
#[derive(Debug, Clone, PartialEq)]
pub enum FormTarget {
    /// A new shape that is not stored yet.
    Create(DraftShape),
    /// An existing stored annotation.
    Edit {
        id: AnnotationId,
        shape: ShapeId,
        kind: AnnotationKind,
        geometry: Geometry,
    },
}

impl FormTarget {
    pub fn shape(&self) -> ShapeId {
        match self {
            FormTarget::Create(draft) => draft.shape,
            FormTarget::Edit { shape, .. } => *shape,
        }
    }
}

/// Snapshot of the form as it should be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: String,
    pub description: String,
    pub editing: bool,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub annotation: Annotation,
    /// `true` for a new annotation, `false` for an edit.
    pub created: bool,
}

/// Result of cancelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CancelOutcome {
    /// Newly drawn shape to take off the map. `None` when an edit was
    /// cancelled: the existing shape stays.
    pub discard: Option<ShapeId>,
}

#[derive(Debug, Default)]
pub struct FormWorkflow {
    target: Option<FormTarget>,
    title: String,
    description: String,
}

impl FormWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty form for a completed draft.
    pub fn open_create(&mut self, draft: DraftShape) {
        self.title.clear();
        self.description.clear();
        self.target = Some(FormTarget::Create(draft));
    }

    /// Open the form pre-filled with an existing annotation.
    pub fn open_edit(&mut self, annotation: &Annotation) {
        self.title = annotation.title.clone();
        self.description = annotation.description.clone();
        self.target = Some(FormTarget::Edit {
            id: annotation.id,
            shape: annotation.shape,
            kind: annotation.kind,
            geometry: annotation.geometry.clone(),
        });
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&FormTarget> {
        self.target.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn view(&self) -> Option<FormView> {
        self.target.as_ref().map(|t| FormView {
            title: self.title.clone(),
            description: self.description.clone(),
            editing: matches!(t, FormTarget::Edit { .. }),
        })
    }

    /// Validate and commit the form to the store.
    ///
    /// An empty title leaves everything untouched and the form open. Any other
    /// outcome closes the form.
    pub fn save(&mut self, store: &mut AnnotationStore) -> Result<SaveOutcome, FormError> {
        if self.target.is_none() {
            return Err(FormError::NotOpen);
        }
        if is_missing_title(&self.title) {
            return Err(FormError::MissingTitle);
        }
        let Some(target) = self.target.take() else {
            return Err(FormError::NotOpen);
        };
        let title = std::mem::take(&mut self.title);
        let description = std::mem::take(&mut self.description);

        match target {
            FormTarget::Create(draft) => {
                let id = store.next_id();
                let annotation = Annotation::new(
                    id,
                    title,
                    description,
                    draft.kind,
                    draft.geometry,
                    draft.shape,
                );
                store.add(annotation.clone())?;
                Ok(SaveOutcome {
                    annotation,
                    created: true,
                })
            }
            FormTarget::Edit { id, geometry, .. } => {
                store.update(
                    id,
                    AnnotationFields {
                        title,
                        description,
                        geometry,
                    },
                )?;
                let annotation = store.get(id).cloned().ok_or(StoreError::NotFound(id))?;
                Ok(SaveOutcome {
                    annotation,
                    created: false,
                })
            }
        }
    }

    /// Close without saving.
    pub fn cancel(&mut self) -> CancelOutcome {
        self.title.clear();
        self.description.clear();
        match self.target.take() {
            Some(FormTarget::Create(draft)) => CancelOutcome {
                discard: Some(draft.shape),
            },
            _ => CancelOutcome::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapnote_core::LatLng;

    fn draft() -> DraftShape {
        DraftShape {
            shape: ShapeId::mint(AnnotationKind::Marker),
            kind: AnnotationKind::Marker,
            geometry: Geometry::Point {
                at: LatLng::new(51.505, -0.09),
            },
            complete: true,
        }
    }

    #[test]
    fn empty_title_keeps_form_open() {
        let mut store = AnnotationStore::new();
        let mut form = FormWorkflow::new();
        form.open_create(draft());
        form.set_description("no title");
        assert_eq!(form.save(&mut store), Err(FormError::MissingTitle));
        assert!(form.is_open());
        assert_eq!(form.description(), "no title");
        assert!(store.is_empty());
        assert_eq!(FormError::MissingTitle.to_string(), "Please enter a title");
    }

    #[test]
    fn create_adds_annotation_and_closes() {
        let mut store = AnnotationStore::new();
        let mut form = FormWorkflow::new();
        let d = draft();
        form.open_create(d.clone());
        form.set_title("Home");
        form.set_description("My house");
        let outcome = form.save(&mut store).unwrap();
        assert!(outcome.created);
        assert_eq!(outcome.annotation.shape, d.shape);
        assert_eq!(outcome.annotation.kind, AnnotationKind::Marker);
        assert_eq!(store.len(), 1);
        assert!(!form.is_open());
    }

    #[test]
    fn edit_is_prefilled_and_updates_in_place() {
        let mut store = AnnotationStore::new();
        let mut form = FormWorkflow::new();
        form.open_create(draft());
        form.set_title("Home");
        let saved = form.save(&mut store).unwrap().annotation;

        form.open_edit(&saved);
        assert_eq!(
            form.view(),
            Some(FormView {
                title: "Home".into(),
                description: String::new(),
                editing: true,
            })
        );
        form.set_title("Office");
        let outcome = form.save(&mut store).unwrap();
        assert!(!outcome.created);
        assert_eq!(outcome.annotation.id, saved.id);
        assert_eq!(store.get(saved.id).map(|a| a.title.as_str()), Some("Office"));
    }

    #[test]
    fn cancel_discards_only_new_shapes() {
        let mut store = AnnotationStore::new();
        let mut form = FormWorkflow::new();
        let d = draft();
        form.open_create(d.clone());
        assert_eq!(form.cancel().discard, Some(d.shape));
        assert!(!form.is_open());

        form.open_create(draft());
        form.set_title("Keep");
        let saved = form.save(&mut store).unwrap().annotation;
        form.open_edit(&saved);
        form.set_title("Changed my mind");
        assert_eq!(form.cancel(), CancelOutcome::default());
        assert_eq!(store.get(saved.id).map(|a| a.title.as_str()), Some("Keep"));
    }

    #[test]
    fn edit_of_vanished_annotation_reports_not_found() {
        let mut store = AnnotationStore::new();
        let mut form = FormWorkflow::new();
        form.open_create(draft());
        form.set_title("Gone");
        let saved = form.save(&mut store).unwrap().annotation;
        form.open_edit(&saved);
        store.clear();
        assert_eq!(
            form.save(&mut store),
            Err(FormError::Store(StoreError::NotFound(saved.id)))
        );
        assert!(!form.is_open());
    }

    #[test]
    fn save_without_open_form() {
        let mut form = FormWorkflow::new();
        assert_eq!(form.save(&mut AnnotationStore::new()), Err(FormError::NotOpen));
    }
}
