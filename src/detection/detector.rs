// Copyright (c) 2024 Mike Tsao

use super::{DetectionEvent, DetectionHistory, ProximityRule};
use crate::{
    traits::SpatialQuery,
    types::{distance_between, EntityUid, Seconds},
};

/// Decides when to scan, performs the scan, and remembers what it found.
///
/// The scan is rate-limited: [ProximityDetector::is_check_due()] accumulates
/// frame time and fires once the check interval has elapsed. An interval of
/// zero scans every tick.
#[derive(Debug)]
pub struct ProximityDetector {
    check_interval: Seconds,
    time_since_last_check: Seconds,
    history: DetectionHistory,
}
impl Default for ProximityDetector {
    fn default() -> Self {
        Self::new_with(Seconds(0.1), 256)
    }
}
impl ProximityDetector {
    #[allow(missing_docs)]
    pub fn new_with(check_interval: Seconds, history_capacity: usize) -> Self {
        Self {
            check_interval,
            time_since_last_check: Seconds::zero(),
            history: DetectionHistory::new(history_capacity),
        }
    }

    /// Adds `delta` to the time since the last scan, and returns true (and
    /// resets the timer) if that reaches the check interval.
    pub fn is_check_due(&mut self, delta: Seconds) -> bool {
        self.time_since_last_check = self.time_since_last_check.plus(delta);
        if self.time_since_last_check.0 >= self.check_interval.0 {
            self.time_since_last_check = Seconds::zero();
            true
        } else {
            false
        }
    }

    /// Finds every entity near each of the rule's tracked entities that passes
    /// the distance and speed gates. Tracked entities that no longer exist are
    /// skipped, and an entity is never reported as near itself.
    pub fn scan<S: SpatialQuery + ?Sized>(
        &self,
        rule: &ProximityRule,
        spatial: &S,
    ) -> Vec<DetectionEvent> {
        let mut events = Vec::default();
        for &source in rule.tracked.iter() {
            let Some(center) = spatial.position(source) else {
                continue;
            };
            for other in spatial.overlap_sphere(center, rule.collider_radius, rule.collision_layer)
            {
                if other == source {
                    continue;
                }
                if let Some((distance, speed)) = Self::measure(spatial, source, other) {
                    if rule.admits(distance, speed) {
                        events.push(DetectionEvent {
                            source,
                            other,
                            distance,
                            speed,
                        });
                    }
                }
            }
        }
        events
    }

    /// Returns the distance from `source` to `other` and `other`'s speed
    /// (zero without a rigid body), or [None] if either has vanished.
    pub fn measure<S: SpatialQuery + ?Sized>(
        spatial: &S,
        source: EntityUid,
        other: EntityUid,
    ) -> Option<(f64, f64)> {
        let a = spatial.position(source)?;
        let b = spatial.position(other)?;
        let speed = spatial.rigid_body_speed(other).unwrap_or_default();
        Some((distance_between(&a, &b), speed))
    }

    #[allow(missing_docs)]
    pub fn record(&mut self, event: DetectionEvent) {
        self.history.push(event);
    }

    #[allow(missing_docs)]
    pub fn history(&self) -> &DetectionHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        detection::ProximityRuleBuilder,
        testing::TestHost,
        types::{LayerMask, Position},
    };
    use float_cmp::approx_eq;

    fn world() -> TestHost {
        let mut host = TestHost::default();
        host.add_entity(EntityUid(1), Position::new(0.0, 0.0, 0.0), None);
        host.add_entity(EntityUid(2), Position::new(3.0, 0.0, 0.0), Some(2.0));
        host.add_entity(EntityUid(3), Position::new(0.0, 4.0, 0.0), None);
        host.add_entity(EntityUid(4), Position::new(0.0, 0.0, 50.0), Some(1.0));
        host
    }

    #[test]
    fn check_interval_is_rate_limited() {
        let mut d = ProximityDetector::new_with(Seconds(0.1), 4);
        assert!(!d.is_check_due(Seconds(0.04)));
        assert!(!d.is_check_due(Seconds(0.04)));
        assert!(d.is_check_due(Seconds(0.04)));
        assert!(!d.is_check_due(Seconds(0.04)));

        let mut d = ProximityDetector::new_with(Seconds::zero(), 4);
        assert!(d.is_check_due(Seconds::zero()));
        assert!(d.is_check_due(Seconds(0.016)));
    }

    #[test]
    fn scan_applies_gates() {
        let host = world();
        let rule = ProximityRuleBuilder::default()
            .primary_event("Play_Hit")
            .track(EntityUid(1))
            .collider_radius(10.0)
            .distance_gate(1.0..=5.0)
            .speed_gate(0.0..=10.0)
            .build()
            .unwrap();
        let events = ProximityDetector::default().scan(&rule, &host);

        assert_eq!(events.len(), 2, "the far entity is outside the sphere");
        assert_eq!(events[0].other, EntityUid(2));
        assert!(approx_eq!(f64, events[0].distance, 3.0));
        assert!(approx_eq!(f64, events[0].speed, 2.0));
        assert_eq!(events[1].other, EntityUid(3));
        assert!(
            approx_eq!(f64, events[1].speed, 0.0),
            "no rigid body means zero speed"
        );
    }

    #[test]
    fn scan_skips_self_and_stale_sources() {
        let host = world();
        let rule = ProximityRuleBuilder::default()
            .primary_event("Play_Hit")
            .track(EntityUid(1))
            .track(EntityUid(2))
            .track(EntityUid(99))
            .collider_radius(10.0)
            .build()
            .unwrap();
        let events = ProximityDetector::default().scan(&rule, &host);
        assert!(events.iter().all(|e| e.other != e.source));
        assert!(events.iter().all(|e| e.source != EntityUid(99)));

        let pairs: Vec<(usize, usize)> = events.iter().map(|e| (e.source.0, e.other.0)).collect();
        assert_eq!(
            pairs,
            vec![(1, 2), (1, 3), (2, 1), (2, 3)],
            "tracked entities can detect each other"
        );
    }

    #[test]
    fn scan_respects_layers() {
        let mut host = world();
        host.add_entity_on_layer(EntityUid(5), Position::new(1.0, 1.0, 0.0), None, 7);
        let rule = ProximityRuleBuilder::default()
            .primary_event("Play_Hit")
            .track(EntityUid(1))
            .collider_radius(10.0)
            .collision_layer(LayerMask::layer(7))
            .build()
            .unwrap();
        let events = ProximityDetector::default().scan(&rule, &host);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].other, EntityUid(5));
    }

    #[test]
    fn gate_boundaries_are_included() {
        let host = world();
        let rule = ProximityRuleBuilder::default()
            .primary_event("Play_Hit")
            .track(EntityUid(1))
            .collider_radius(10.0)
            .distance_gate(3.0..=4.0)
            .speed_gate(0.0..=2.0)
            .build()
            .unwrap();
        let events = ProximityDetector::default().scan(&rule, &host);
        assert_eq!(events.len(), 2);
    }
}
