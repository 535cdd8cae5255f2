// Copyright (c) 2024 Mike Tsao

use super::ProximityRule;
use crate::{
    curves::CurveConfig,
    rows::CsvRow,
    types::{EntityUid, ParameterName, RuleUid, UidFactory},
};
use anyhow::{anyhow, Result};
use rustc_hash::FxHashMap;

/// A [ProximityRule] plus everything loaded on its behalf.
#[derive(Debug)]
pub struct RuleState {
    rule: ProximityRule,
    rows: Vec<CsvRow>,
    curves: Vec<CurveConfig>,
    is_pipeline_in_flight: bool,
}
impl RuleState {
    fn new_with(rule: ProximityRule) -> Self {
        let curves = rule
            .curve_sources
            .iter()
            .cloned()
            .map(CurveConfig::new_with)
            .collect();
        Self {
            rule,
            rows: Vec::default(),
            curves,
            is_pipeline_in_flight: false,
        }
    }

    #[allow(missing_docs)]
    pub fn rule(&self) -> &ProximityRule {
        &self.rule
    }

    /// The rows from the most recent completed load cycle.
    pub fn rows(&self) -> &[CsvRow] {
        &self.rows
    }

    /// Replaces the rows with a freshly loaded batch.
    pub fn replace_rows(&mut self, rows: Vec<CsvRow>) {
        self.rows = rows;
    }

    /// One entry per [ProximityRule::curve_sources], in the same order.
    pub fn curves(&self) -> &[CurveConfig] {
        &self.curves
    }

    #[allow(missing_docs)]
    pub fn curve_mut(&mut self, index: usize) -> Option<&mut CurveConfig> {
        self.curves.get_mut(index)
    }

    /// The first curve bound to `parameter`.
    pub fn curve(&self, parameter: &ParameterName) -> Option<&CurveConfig> {
        self.curves.iter().find(|c| c.parameter() == parameter)
    }

    /// Whether a curve pipeline is sleeping, loading, or spawning players for
    /// this rule. At most one runs at a time.
    pub fn is_pipeline_in_flight(&self) -> bool {
        self.is_pipeline_in_flight
    }

    #[allow(missing_docs)]
    pub fn set_pipeline_in_flight(&mut self, is_in_flight: bool) {
        self.is_pipeline_in_flight = is_in_flight;
    }
}

/// Owns the registered rules, in registration order.
#[derive(Debug, Default)]
pub struct RuleRepository {
    uid_factory: UidFactory<RuleUid>,
    uids: Vec<RuleUid>,
    states: FxHashMap<RuleUid, RuleState>,
}
impl RuleRepository {
    /// Registers a rule and returns its new [RuleUid].
    pub fn add_rule(&mut self, rule: ProximityRule) -> RuleUid {
        let uid = self.uid_factory.mint_next();
        self.uids.push(uid);
        self.states.insert(uid, RuleState::new_with(rule));
        uid
    }

    /// Removes a rule. Tasks still working on its behalf notice on their next
    /// poll and finish quietly.
    pub fn remove_rule(&mut self, uid: RuleUid) -> Result<ProximityRule> {
        if let Some(state) = self.states.remove(&uid) {
            self.uids.retain(|u| *u != uid);
            Ok(state.rule)
        } else {
            Err(anyhow!("Rule {uid} not found"))
        }
    }

    #[allow(missing_docs)]
    pub fn uids(&self) -> &[RuleUid] {
        &self.uids
    }

    #[allow(missing_docs)]
    pub fn get(&self, uid: RuleUid) -> Option<&RuleState> {
        self.states.get(&uid)
    }

    #[allow(missing_docs)]
    pub fn get_mut(&mut self, uid: RuleUid) -> Option<&mut RuleState> {
        self.states.get_mut(&uid)
    }

    /// Every rule that tracks `entity`, in registration order.
    pub fn rules_tracking(&self, entity: EntityUid) -> impl Iterator<Item = (RuleUid, &RuleState)> {
        self.uids.iter().filter_map(move |uid| {
            self.states
                .get(uid)
                .filter(|s| s.rule.tracked.contains(&entity))
                .map(|s| (*uid, s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{curves::CurveSource, detection::ProximityRuleBuilder};

    fn rule(event: &'static str, tracked: usize) -> ProximityRule {
        ProximityRuleBuilder::default()
            .primary_event(event)
            .track(EntityUid(tracked))
            .curve_source(CurveSource::new_with("Wind", "wind.csv"))
            .build()
            .unwrap()
    }

    #[test]
    fn add_and_remove() {
        let mut repo = RuleRepository::default();
        let a = repo.add_rule(rule("A", 1));
        let b = repo.add_rule(rule("B", 2));
        assert_ne!(a, b);
        assert_eq!(repo.uids(), &[a, b]);

        let state = repo.get(a).unwrap();
        assert_eq!(state.curves().len(), 1);
        assert!(state.curve(&ParameterName::from("Wind")).is_some());
        assert!(state.curve(&ParameterName::from("Rain")).is_none());
        assert!(state.rows().is_empty());
        assert!(!state.is_pipeline_in_flight());

        assert!(repo.remove_rule(a).is_ok());
        assert!(repo.remove_rule(a).is_err());
        assert_eq!(repo.uids(), &[b]);
        assert!(repo.get(a).is_none());
    }

    #[test]
    fn finds_rules_by_tracked_entity() {
        let mut repo = RuleRepository::default();
        let a = repo.add_rule(rule("A", 1));
        let _ = repo.add_rule(rule("B", 2));
        let c = repo.add_rule(rule("C", 1));

        let uids: Vec<RuleUid> = repo.rules_tracking(EntityUid(1)).map(|(u, _)| u).collect();
        assert_eq!(uids, vec![a, c]);
        assert_eq!(repo.rules_tracking(EntityUid(9)).count(), 0);
    }
}
