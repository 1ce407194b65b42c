//! In-memory ordered annotation store.
//!
//! The store is the single source of truth for exports. Rendered shapes are
//! derived from it and joined by `ShapeId`.

use crate::error::StoreError;
use crate::id::{AnnotationId, IdSequence, ShapeId};
use crate::model::{Annotation, AnnotationFields, is_missing_title};

/// Ordered collection of annotations, in creation order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    items: Vec<Annotation>,
    ids: IdSequence,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose first minted id is `seed`.
    pub fn with_id_seed(seed: u64) -> Self {
        Self {
            items: Vec::new(),
            ids: IdSequence::starting_at(seed),
        }
    }

    /// Mint a fresh annotation id.
    pub fn next_id(&mut self) -> AnnotationId {
        self.ids.mint()
    }

    /// Append an annotation. Rejects empty titles without storing anything.
    pub fn add(&mut self, annotation: Annotation) -> Result<AnnotationId, StoreError> {
        if is_missing_title(&annotation.title) {
            return Err(StoreError::EmptyTitle);
        }
        let id = annotation.id;
        log::debug!("store: add {} ({}) as {}", id, annotation.kind, annotation.shape);
        self.items.push(annotation);
        Ok(id)
    }

    /// Replace title, description and geometry of the annotation with `id`,
    /// keeping its position in the collection.
    pub fn update(&mut self, id: AnnotationId, fields: AnnotationFields) -> Result<(), StoreError> {
        if is_missing_title(&fields.title) {
            return Err(StoreError::EmptyTitle);
        }
        let annotation = self
            .items
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound(id))?;
        annotation.title = fields.title;
        annotation.description = fields.description;
        annotation.geometry = fields.geometry;
        log::debug!("store: update {id}");
        Ok(())
    }

    /// Linear scan on the display reference.
    pub fn find_by_shape(&self, shape: ShapeId) -> Option<&Annotation> {
        self.items.iter().find(|a| a.shape == shape)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.items.iter().find(|a| a.id == id)
    }

    /// Position of `id` in creation order.
    pub fn position(&self, id: AnnotationId) -> Option<usize> {
        self.items.iter().position(|a| a.id == id)
    }

    /// Remove everything. Returns the shapes the caller must take off the map.
    pub fn clear(&mut self) -> Vec<ShapeId> {
        log::debug!("store: clear {} annotations", self.items.len());
        self.items.drain(..).map(|a| a.shape).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a AnnotationStore {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationKind, Geometry, LatLng};

    fn marker(store: &mut AnnotationStore, title: &str) -> Annotation {
        let id = store.next_id();
        Annotation::new(
            id,
            title,
            "",
            AnnotationKind::Marker,
            Geometry::Point {
                at: LatLng::new(51.505, -0.09),
            },
            ShapeId::mint(AnnotationKind::Marker),
        )
    }

    #[test]
    fn add_appends_in_order() {
        let mut store = AnnotationStore::new();
        let a = marker(&mut store, "A");
        let b = marker(&mut store, "B");
        store.add(a.clone()).unwrap();
        store.add(b.clone()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.position(b.id), Some(1));
        assert_eq!(store.as_slice()[0].title, "A");
    }

    #[test]
    fn add_rejects_empty_title() {
        let mut store = AnnotationStore::new();
        let a = marker(&mut store, "");
        assert_eq!(store.add(a), Err(StoreError::EmptyTitle));
        assert!(store.is_empty());
    }

    #[test]
    fn add_accepts_whitespace_title() {
        let mut store = AnnotationStore::new();
        let a = marker(&mut store, " ");
        assert_eq!(store.add(a.clone()), Ok(a.id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_keeps_position_and_identity() {
        let mut store = AnnotationStore::new();
        let a = marker(&mut store, "A");
        let b = marker(&mut store, "B");
        let c = marker(&mut store, "C");
        for x in [a, b.clone(), c] {
            store.add(x).unwrap();
        }
        store
            .update(
                b.id,
                AnnotationFields {
                    title: "B2".into(),
                    description: "edited".into(),
                    geometry: b.geometry.clone(),
                },
            )
            .unwrap();
        let updated = store.get(b.id).unwrap();
        assert_eq!(updated.title, "B2");
        assert_eq!(updated.description, "edited");
        assert_eq!(updated.shape, b.shape);
        assert_eq!(store.position(b.id), Some(1));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = AnnotationStore::new();
        let err = store
            .update(
                AnnotationId(99),
                AnnotationFields {
                    title: "x".into(),
                    description: String::new(),
                    geometry: Geometry::Point {
                        at: LatLng::new(0.0, 0.0),
                    },
                },
            )
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(AnnotationId(99)));
    }

    #[test]
    fn find_by_shape_and_clear() {
        let mut store = AnnotationStore::with_id_seed(100);
        let a = marker(&mut store, "A");
        let shape = a.shape;
        store.add(a).unwrap();
        assert_eq!(store.find_by_shape(shape).map(|a| a.id), Some(AnnotationId(100)));
        assert!(store.find_by_shape(ShapeId::intern("nope")).is_none());

        let removed = store.clear();
        assert_eq!(removed, vec![shape]);
        assert!(store.is_empty());
        assert!(store.find_by_shape(shape).is_none());
    }
}
