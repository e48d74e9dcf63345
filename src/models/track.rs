//! Track model and registry.
//!
//! A track is a physical maintenance road inside a depot. Its length bounds
//! the vehicles it can hold; its overhead-line (OLE) section determines
//! whether electrified work (pantograph, traction tests) can be done on it.
//! Gradient, speed limit, and clearance are carried for display only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A physical maintenance track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier.
    pub id: String,
    /// Owning depot/facility.
    pub facility_id: String,
    /// Human-readable name.
    pub name: String,
    /// Usable length (m). Hard upper bound on vehicle length.
    pub length_m: f64,
    /// Length of the section under overhead line (m). `None` = unelectrified.
    pub electrified_length_m: Option<f64>,
    /// Gradient (‰). Informational.
    pub gradient_per_mille: Option<f64>,
    /// Speed limit (km/h). Informational.
    pub speed_limit_kmh: Option<f64>,
    /// Minimum lateral clearance at the documented pinch point (m). Informational.
    pub clearance_m: Option<f64>,
}

impl Track {
    /// Creates an unelectrified track.
    pub fn new(id: impl Into<String>, facility_id: impl Into<String>, length_m: f64) -> Self {
        Self {
            id: id.into(),
            facility_id: facility_id.into(),
            name: String::new(),
            length_m,
            electrified_length_m: None,
            gradient_per_mille: None,
            speed_limit_kmh: None,
            clearance_m: None,
        }
    }

    /// Sets the track name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the electrified section length.
    pub fn with_electrification(mut self, electrified_length_m: f64) -> Self {
        self.electrified_length_m = Some(electrified_length_m);
        self
    }

    /// Sets the gradient.
    pub fn with_gradient(mut self, per_mille: f64) -> Self {
        self.gradient_per_mille = Some(per_mille);
        self
    }

    /// Sets the speed limit.
    pub fn with_speed_limit(mut self, kmh: f64) -> Self {
        self.speed_limit_kmh = Some(kmh);
        self
    }

    /// Sets the pinch-point clearance.
    pub fn with_clearance(mut self, clearance_m: f64) -> Self {
        self.clearance_m = Some(clearance_m);
        self
    }

    /// Electrified length, treating an absent section as zero.
    #[inline]
    pub fn electrified_length(&self) -> f64 {
        self.electrified_length_m.unwrap_or(0.0)
    }

    /// Whether any part of the track is under overhead line.
    pub fn is_electrified(&self) -> bool {
        self.electrified_length() > 0.0
    }

    /// Whether a vehicle of the given length fits.
    #[inline]
    pub fn accommodates(&self, vehicle_length_m: f64) -> bool {
        vehicle_length_m <= self.length_m
    }

    /// Whether the OLE section is long enough to be usable.
    #[inline]
    pub fn has_usable_electrification(&self, min_electrified_length_m: f64) -> bool {
        self.electrified_length() >= min_electrified_length_m
    }
}

/// Catalogue of tracks per facility.
///
/// Built once per session and never edited afterwards. Track order within a
/// facility is insertion order; the auto-resolver uses it as its candidate
/// order, so it must stay stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackRegistry {
    facilities: Vec<String>,
    tracks: HashMap<String, Vec<Track>>,
}

impl TrackRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a track to its facility.
    pub fn with_track(mut self, track: Track) -> Self {
        if !self.tracks.contains_key(&track.facility_id) {
            self.facilities.push(track.facility_id.clone());
        }
        self.tracks
            .entry(track.facility_id.clone())
            .or_default()
            .push(track);
        self
    }

    /// Adds several tracks, preserving their order.
    pub fn with_tracks(self, tracks: impl IntoIterator<Item = Track>) -> Self {
        tracks.into_iter().fold(self, Self::with_track)
    }

    /// Tracks of a facility in registry order (empty if unknown).
    pub fn list_tracks(&self, facility_id: &str) -> &[Track] {
        self.tracks
            .get(facility_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Facility IDs in first-seen order.
    pub fn facilities(&self) -> &[String] {
        &self.facilities
    }

    /// Looks up a track by ID across all facilities.
    ///
    /// Facilities are searched in first-seen order, then tracks in registry
    /// order, so a repeated ID always resolves to its first registration.
    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.facilities
            .iter()
            .flat_map(|f| self.list_tracks(f))
            .find(|t| t.id == track_id)
    }

    /// Total number of tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_builder() {
        let t = Track::new("T1", "DEPOT-N", 220.0)
            .with_name("Road 1")
            .with_electrification(180.0)
            .with_gradient(1.5)
            .with_speed_limit(10.0)
            .with_clearance(1.2);

        assert_eq!(t.id, "T1");
        assert_eq!(t.facility_id, "DEPOT-N");
        assert_eq!(t.name, "Road 1");
        assert!((t.electrified_length() - 180.0).abs() < 1e-10);
        assert!(t.is_electrified());
        assert_eq!(t.clearance_m, Some(1.2));
        assert!(t.accommodates(220.0));
        assert!(!t.accommodates(220.5));
    }

    #[test]
    fn test_unelectrified_track() {
        let t = Track::new("T2", "DEPOT-N", 100.0);
        assert!(!t.is_electrified());
        assert!(!t.has_usable_electrification(50.0));

        let stub = Track::new("T3", "DEPOT-N", 100.0).with_electrification(20.0);
        assert!(stub.is_electrified());
        assert!(!stub.has_usable_electrification(50.0));
    }

    #[test]
    fn test_registry_order_is_stable() {
        let reg = TrackRegistry::new()
            .with_track(Track::new("B", "N", 100.0))
            .with_track(Track::new("X", "S", 100.0))
            .with_track(Track::new("A", "N", 100.0));

        let ids: Vec<&str> = reg.list_tracks("N").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        // Repeated calls yield the same sequence
        let again: Vec<&str> = reg.list_tracks("N").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, again);

        assert_eq!(reg.facilities(), &["N".to_string(), "S".to_string()]);
        assert_eq!(reg.track_count(), 3);
        assert_eq!(reg.track("X").map(|t| t.facility_id.as_str()), Some("S"));
    }

    #[test]
    fn test_registry_unknown_facility() {
        let reg = TrackRegistry::new();
        assert!(reg.list_tracks("nowhere").is_empty());
        assert!(reg.track("T1").is_none());
    }

    #[test]
    fn test_track_lookup_prefers_first_registration() {
        let reg = TrackRegistry::new()
            .with_track(Track::new("R1", "SOUTH", 120.0))
            .with_track(Track::new("R1", "NORTH", 300.0))
            .with_track(Track::new("R1", "SOUTH", 90.0));

        for _ in 0..10 {
            let t = reg.track("R1").unwrap();
            assert_eq!(t.facility_id, "SOUTH");
            assert!((t.length_m - 120.0).abs() < 1e-10);
        }
        assert_eq!(reg.list_tracks("NORTH").len(), 1);
    }
}
