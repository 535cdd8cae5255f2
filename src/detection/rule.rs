// Copyright (c) 2024 Mike Tsao

use crate::{
    curves::CurveSource,
    types::{AudioEventName, EntityUid, LayerMask, Seconds},
};
use anyhow::{anyhow, Result};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Describes which entities to watch, which neighbors count as "near", and
/// what to tell the audio engine when one is.
///
/// An entity `other` is detected near a tracked entity when `other`'s collider
/// overlaps a sphere of [ProximityRule::collider_radius] around the tracked
/// entity, on a layer in [ProximityRule::collision_layer], and when the
/// distance between them and `other`'s speed both fall within the (inclusive)
/// gates.
#[derive(Clone, Debug, Derivative, PartialEq, Serialize, Deserialize, Builder)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
#[builder(build_fn(private, name = "build_from_builder"))]
pub struct ProximityRule {
    /// Posted on the tracked entity once the rule's rows have been pushed.
    #[builder(setter(into))]
    pub primary_event: AudioEventName,

    /// If set, posted [ProximityRule::secondary_delay] after the primary.
    #[builder(default, setter(into, strip_option))]
    pub secondary_event: Option<AudioEventName>,

    /// How long after the primary event the secondary is posted.
    #[builder(default = "Seconds(1.0)")]
    #[derivative(Default(value = "Seconds(1.0)"))]
    pub secondary_delay: Seconds,

    /// If set, posted when something leaves the tracked entity's trigger
    /// volume.
    #[builder(default, setter(into, strip_option))]
    pub exit_event: Option<AudioEventName>,

    /// If set, posted each time the host reports something still inside the
    /// tracked entity's trigger volume.
    #[builder(default, setter(into, strip_option))]
    pub stay_event: Option<AudioEventName>,

    /// Admissible distances, in world units.
    #[builder(default = "0.0..=f64::MAX")]
    #[derivative(Default(value = "0.0..=f64::MAX"))]
    pub distance_gate: RangeInclusive<f64>,

    /// Admissible speeds of the other entity, in world units per second.
    #[builder(default = "0.0..=f64::MAX")]
    #[derivative(Default(value = "0.0..=f64::MAX"))]
    pub speed_gate: RangeInclusive<f64>,

    /// Radius of the overlap sphere and of the trigger volume.
    #[builder(default = "1.0")]
    #[derivative(Default(value = "1.0"))]
    pub collider_radius: f64,

    /// Layers whose colliders the overlap sphere can see.
    #[builder(default)]
    pub collision_layer: LayerMask,

    /// How long after a row push the curve pipeline waits before loading.
    #[builder(default = "Seconds(5.0)")]
    #[derivative(Default(value = "Seconds(5.0)"))]
    pub curve_startup_delay: Seconds,

    /// Curves loaded and played after rows are pushed.
    #[builder(default, setter(each(name = "curve_source")))]
    pub curve_sources: Vec<CurveSource>,

    /// File names relative to the assets root, or `http(s)://` URLs.
    #[builder(default, setter(each(name = "row_source", into)))]
    pub row_sources: Vec<String>,

    /// The entities whose surroundings this rule watches.
    #[builder(default, setter(each(name = "track")))]
    pub tracked: Vec<EntityUid>,
}
impl ProximityRuleBuilder {
    /// Builds the [ProximityRule], rejecting inconsistent gates and negative
    /// durations.
    pub fn build(&self) -> Result<ProximityRule, ProximityRuleBuilderError> {
        let rule = self.build_from_builder()?;
        rule.validate()
            .map_err(|e| ProximityRuleBuilderError::ValidationError(e.to_string()))?;
        Ok(rule)
    }
}
impl ProximityRule {
    /// Checks that the gates are well-formed and durations aren't negative.
    /// Configurations loaded from files are checked the same way.
    pub fn validate(&self) -> Result<()> {
        Self::validate_gate("distance-gate", &self.distance_gate)?;
        Self::validate_gate("speed-gate", &self.speed_gate)?;
        if !(self.collider_radius >= 0.0) {
            return Err(anyhow!(
                "collider-radius must be non-negative, but was {}",
                self.collider_radius
            ));
        }
        for (name, duration) in [
            ("secondary-delay", self.secondary_delay),
            ("curve-startup-delay", self.curve_startup_delay),
        ] {
            if !(duration.0 >= 0.0) {
                return Err(anyhow!(
                    "{name} must be non-negative, but was {}",
                    duration.0
                ));
            }
        }
        Ok(())
    }

    fn validate_gate(name: &str, gate: &RangeInclusive<f64>) -> Result<()> {
        if !(*gate.start() >= 0.0 && gate.start() <= gate.end()) {
            return Err(anyhow!(
                "{name} must satisfy 0 <= start <= end, but was {}..={}",
                gate.start(),
                gate.end()
            ));
        }
        Ok(())
    }

    /// Whether a measured distance and speed pass both gates. Both ends of
    /// each gate are inclusive.
    pub fn admits(&self, distance: f64, speed: f64) -> bool {
        self.distance_gate.contains(&distance) && self.speed_gate.contains(&speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let rule = ProximityRuleBuilder::default()
            .primary_event("Play_Whoosh")
            .track(EntityUid(1))
            .track(EntityUid(2))
            .row_source("whoosh.csv")
            .build()
            .unwrap();
        assert_eq!(rule.tracked, vec![EntityUid(1), EntityUid(2)]);
        assert_eq!(rule.row_sources, vec!["whoosh.csv".to_string()]);
        assert_eq!(rule.secondary_delay, Seconds(1.0));
        assert_eq!(rule.curve_startup_delay, Seconds(5.0));
        assert_eq!(rule.secondary_event, None);
        assert_eq!(rule.collision_layer, LayerMask::ALL);
    }

    #[test]
    fn builder_rejects_bad_gates() {
        assert!(ProximityRuleBuilder::default()
            .primary_event("Play_Whoosh")
            .distance_gate(5.0..=1.0)
            .build()
            .is_err());
        assert!(ProximityRuleBuilder::default()
            .primary_event("Play_Whoosh")
            .speed_gate(-1.0..=1.0)
            .build()
            .is_err());
        assert!(ProximityRuleBuilder::default()
            .primary_event("Play_Whoosh")
            .secondary_delay(Seconds(-0.5))
            .build()
            .is_err());
        assert!(
            ProximityRuleBuilder::default().build().is_err(),
            "primary event is required"
        );
    }

    #[test]
    fn gates_are_inclusive() {
        let rule = ProximityRuleBuilder::default()
            .primary_event("Play_Whoosh")
            .distance_gate(1.0..=5.0)
            .speed_gate(0.0..=10.0)
            .build()
            .unwrap();
        assert!(rule.admits(1.0, 0.0));
        assert!(rule.admits(5.0, 10.0));
        assert!(rule.admits(3.0, 2.0));
        assert!(!rule.admits(0.999, 2.0));
        assert!(!rule.admits(5.001, 2.0));
        assert!(!rule.admits(3.0, 10.5));
    }

    #[test]
    fn serializes_as_kebab_case() {
        let rule = ProximityRuleBuilder::default()
            .primary_event("Play_Whoosh")
            .secondary_event("Play_Tail")
            .curve_source(CurveSource::new_with("Wind", "wind.csv"))
            .build()
            .unwrap();
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"primary-event\":\"Play_Whoosh\""));
        assert!(json.contains("\"curve-startup-delay\""));
        let round_trip: ProximityRule = serde_json::from_str(&json).unwrap();
        assert_eq!(round_trip, rule);
    }
}
