//! Identifiers: `ShapeId` joins a stored annotation to the shape drawn for it
//! on the map, `AnnotationId` names the annotation itself.

use crate::model::AnnotationKind;
use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static SHAPE_NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Shared by every kind, so `marker_0` and `polygon_1` never collide.
static NEXT_SHAPE: AtomicU64 = AtomicU64::new(0);

/// Name of one rendered map shape.
///
/// The map surface keys its layers by this name, and each stored annotation
/// carries the name of its layer. Drafts get a fresh one from `mint`; edits
/// keep it, so the redrawn shape replaces the old one in place.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Spur);

impl ShapeId {
    /// Look up (or register) a shape by its surface name.
    pub fn intern(name: &str) -> Self {
        ShapeId(SHAPE_NAMES.get_or_intern(name))
    }

    /// Fresh name for a new shape of `kind`, e.g. `polyline_3`.
    pub fn mint(kind: AnnotationKind) -> Self {
        let n = NEXT_SHAPE.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{kind}_{n}"))
    }

    pub fn as_str(&self) -> &str {
        SHAPE_NAMES.resolve(&self.0)
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape({})", self.as_str())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Cow::<'de, str>::deserialize(deserializer)?;
        Ok(ShapeId::intern(&name))
    }
}

/// Stable identifier of a stored annotation.
///
/// Exported verbatim as the `id` property of each GeoJSON feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mints strictly increasing annotation ids starting from a seed.
///
/// The browser bridge seeds it with the current epoch milliseconds so ids look
/// like creation timestamps; tests seed it with small numbers.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn starting_at(seed: u64) -> Self {
        Self { next: seed }
    }

    pub fn mint(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_shape() {
        let a = ShapeId::intern("marker_home");
        assert_eq!(a, ShapeId::intern("marker_home"));
        assert_eq!(a.to_string(), "marker_home");
        assert_eq!(format!("{a:?}"), "shape(marker_home)");
    }

    #[test]
    fn minted_names_never_repeat_across_kinds() {
        let a = ShapeId::mint(AnnotationKind::Polygon);
        let b = ShapeId::mint(AnnotationKind::Polygon);
        let c = ShapeId::mint(AnnotationKind::Circle);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("polygon_"));
        assert!(c.as_str().starts_with("circle_"));
        let num = |id: ShapeId| id.as_str().rsplit('_').next().map(str::to_string);
        assert_ne!(num(a), num(c));
    }

    #[test]
    fn serializes_as_its_name() {
        let id = ShapeId::intern("polyline_9");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"polyline_9\"");
        assert_eq!(serde_json::from_str::<ShapeId>(&json).unwrap(), id);
    }

    #[test]
    fn sequence_is_strictly_increasing() {
        let mut seq = IdSequence::starting_at(1_700_000_000_000);
        let a = seq.mint();
        let b = seq.mint();
        assert_eq!(a, AnnotationId(1_700_000_000_000));
        assert!(b > a);
    }
}
