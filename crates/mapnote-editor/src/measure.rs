//! Distance measurement session.
//!
//! Points accumulate into a polyline. Each new point adds the great-circle
//! distance from its predecessor to a running total; the total is never
//! recomputed, so it grows in entry order and an added segment is permanent.

use mapnote_core::LatLng;
use mapnote_core::geo::{format_distance, haversine_distance, midpoint};

/// Per-segment distance label anchored at the segment midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLabel {
    pub position: LatLng,
    pub distance_m: f64,
    pub text: String,
}

/// What changed after adding a point.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureStep {
    pub total_m: f64,
    /// `None` for the first point.
    pub label: Option<SegmentLabel>,
}

pub struct MeasurementSession {
    points: Vec<LatLng>,
    total_m: f64,
    labels: Vec<SegmentLabel>,
    earth_radius_m: f64,
    decimals: usize,
}

impl MeasurementSession {
    pub fn new(earth_radius_m: f64, decimals: usize) -> Self {
        Self {
            points: Vec::new(),
            total_m: 0.0,
            labels: Vec::new(),
            earth_radius_m,
            decimals,
        }
    }

    pub fn add_point(&mut self, at: LatLng) -> MeasureStep {
        let label = self.points.last().map(|&prev| {
            let distance_m = haversine_distance(prev, at, self.earth_radius_m);
            self.total_m += distance_m;
            SegmentLabel {
                position: midpoint(prev, at),
                distance_m,
                text: format_distance(distance_m, self.decimals),
            }
        });
        self.points.push(at);
        if let Some(l) = &label {
            self.labels.push(l.clone());
        }
        log::debug!(
            "measure: {} points, total {:.3} m",
            self.points.len(),
            self.total_m
        );
        MeasureStep {
            total_m: self.total_m,
            label,
        }
    }

    /// Clear points, total and labels.
    pub fn reset(&mut self) {
        self.points.clear();
        self.labels.clear();
        self.total_m = 0.0;
    }

    pub fn is_active(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn labels(&self) -> &[SegmentLabel] {
        &self.labels
    }

    pub fn total_m(&self) -> f64 {
        self.total_m
    }

    /// Displayed total: `"0"` when nothing is measured.
    pub fn total_text(&self) -> String {
        if self.points.is_empty() {
            "0".to_string()
        } else {
            format_distance(self.total_m, self.decimals)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapnote_core::EARTH_RADIUS_M;

    fn session() -> MeasurementSession {
        MeasurementSession::new(EARTH_RADIUS_M, 2)
    }

    #[test]
    fn total_sums_segments_in_entry_order() {
        let mut m = session();
        let p1 = LatLng::new(0.0, 0.0);
        let p2 = LatLng::new(0.0, 1.0);
        let p3 = LatLng::new(0.0, 2.0);

        let first = m.add_point(p1);
        assert_eq!(first.label, None);
        assert_eq!(first.total_m, 0.0);

        m.add_point(p2);
        let last = m.add_point(p3);

        let d12 = haversine_distance(p1, p2, EARTH_RADIUS_M);
        let d23 = haversine_distance(p2, p3, EARTH_RADIUS_M);
        assert_eq!(last.total_m, d12 + d23);
        assert!((m.total_m() - 222_389.85).abs() < 0.01);
        assert_eq!(m.labels().len(), 2);
        assert_eq!(m.labels()[1].position, LatLng::new(0.0, 1.5));
        assert_eq!(m.labels()[0].text, "111194.93 m");
        assert_eq!(m.total_text(), "222389.85 m");
    }

    #[test]
    fn total_never_decreases() {
        let mut m = session();
        let mut prev = 0.0;
        for (lat, lng) in [(0.0, 0.0), (1.0, 1.0), (1.0, 1.0), (0.0, 0.0), (-3.0, 2.0)] {
            let step = m.add_point(LatLng::new(lat, lng));
            assert!(step.total_m >= prev);
            prev = step.total_m;
        }
    }

    #[test]
    fn reset_clears_everything() {
        let mut m = session();
        m.add_point(LatLng::new(0.0, 0.0));
        m.add_point(LatLng::new(0.0, 1.0));
        m.reset();
        assert!(!m.is_active());
        assert_eq!(m.total_m(), 0.0);
        assert!(m.labels().is_empty());
        assert!(m.points().is_empty());
        assert_eq!(m.total_text(), "0");
    }
}
