// Copyright (c) 2024 Mike Tsao

//! Periodic proximity scans. Each [ProximityRule] names the entities to
//! watch, and the [ProximityDetector] reports every neighbor that passes the
//! rule's gates as a [DetectionEvent].

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        DetectionEvent, DetectionHistory, ProximityDetector, ProximityRule,
        ProximityRuleBuilder, RuleRepository, RuleState,
    };
}

pub use {
    detector::ProximityDetector,
    event::{DetectionEvent, DetectionHistory},
    repository::{RuleRepository, RuleState},
    rule::{ProximityRule, ProximityRuleBuilder, ProximityRuleBuilderError},
};

mod detector;
mod event;
mod repository;
mod rule;
