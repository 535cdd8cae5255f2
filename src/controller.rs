// Copyright (c) 2024 Mike Tsao

//! The per-frame entry point that ties detection, dispatch, and the scheduler
//! together.

use crate::{
    curves::CurveConfig,
    detection::{DetectionEvent, DetectionHistory, ProximityDetector, ProximityRule, RuleRepository},
    dispatch::EventDispatcher,
    rows::CsvRow,
    scheduler::{Scheduler, TaskContext},
    traits::{DetectionObserver, Host},
    types::{EntityUid, ParameterName, RuleUid, Seconds},
    util::{ControllerConfig, ControllerSettings, Rng},
};
use anyhow::Result;
use log::info;

/// A [DetectionObserver] that logs every notification at `info` level when
/// enabled. This is what `debug-collisions` turns on.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    is_enabled: bool,
}
impl LoggingObserver {
    #[allow(missing_docs)]
    pub fn new_with(is_enabled: bool) -> Self {
        Self { is_enabled }
    }
}
impl DetectionObserver for LoggingObserver {
    fn handle_detection(&mut self, event: DetectionEvent) {
        if self.is_enabled {
            info!(
                "Proximity detected between {} and {}: distance {:.3}, speed {:.3}",
                event.source, event.other, event.distance, event.speed
            );
        }
    }

    fn handle_exit(&mut self, source: EntityUid, other: EntityUid) {
        if self.is_enabled {
            info!("{other} exited the trigger around {source}");
        }
    }

    fn handle_stay(&mut self, source: EntityUid, other: EntityUid, distance: f64, speed: f64) {
        if self.is_enabled {
            info!("{other} stays near {source}: distance {distance:.3}, speed {speed:.3}");
        }
    }
}

/// Watches the configured entities and drives the audio engine in response.
///
/// The host calls [ProximityController::start()] once, then
/// [ProximityController::tick()] every frame, and forwards its trigger-volume
/// notifications to [ProximityController::on_trigger_stay()] and
/// [ProximityController::on_trigger_exit()]. All work happens inside those
/// calls, on the caller's thread.
pub struct ProximityController {
    settings: ControllerSettings,
    rules: RuleRepository,
    detector: ProximityDetector,
    scheduler: Scheduler,
    rng: Rng,
    observer: Box<dyn DetectionObserver>,
}
impl core::fmt::Debug for ProximityController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProximityController")
            .field("settings", &self.settings)
            .field("rules", &self.rules)
            .field("detector", &self.detector)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
impl ProximityController {
    /// Creates a controller from a validated configuration.
    pub fn new_with(config: ControllerConfig, rng: Rng) -> Result<Self> {
        config.validate()?;
        let ControllerConfig { settings, rules } = config;
        let mut r = Self {
            detector: ProximityDetector::new_with(
                settings.check_interval,
                settings.history_capacity,
            ),
            observer: Box::new(LoggingObserver::new_with(settings.debug_collisions)),
            settings,
            rules: RuleRepository::default(),
            scheduler: Scheduler::default(),
            rng,
        };
        for rule in rules {
            r.rules.add_rule(rule);
        }
        Ok(r)
    }

    /// Replaces the default [LoggingObserver].
    pub fn with_observer(mut self, observer: Box<dyn DetectionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Adds a rule after construction.
    pub fn add_rule(&mut self, rule: ProximityRule) -> Result<RuleUid> {
        rule.validate()?;
        Ok(self.rules.add_rule(rule))
    }

    /// Removes a rule. Sequences already running for it end at their next
    /// step.
    pub fn remove_rule(&mut self, uid: RuleUid) -> Result<ProximityRule> {
        self.rules.remove_rule(uid)
    }

    /// Asks the host to attach a trigger volume to every tracked entity, then
    /// runs a detection pass right away.
    pub fn start(&mut self, host: &mut dyn Host) {
        for &uid in self.rules.uids() {
            if let Some(state) = self.rules.get(uid) {
                let rule = state.rule();
                for &tracked in rule.tracked.iter() {
                    host.attach_trigger_volume(tracked, rule.collider_radius);
                }
            }
        }
        self.check_all_rules(host);
        self.pump(host);
    }

    /// Advances time by `delta`, scans if the check interval has elapsed, and
    /// resumes every sequence that's due.
    pub fn tick(&mut self, delta: Seconds, host: &mut dyn Host) {
        self.scheduler.advance(delta);
        if self.detector.is_check_due(delta) {
            self.check_all_rules(host);
        }
        self.pump(host);
    }

    /// The host reports that `other` is still inside the trigger volume around
    /// `source`. Stays aren't gated, but they carry live measurements.
    pub fn on_trigger_stay(&mut self, source: EntityUid, other: EntityUid, host: &mut dyn Host) {
        if source == other {
            return;
        }
        let Some((distance, speed)) = ProximityDetector::measure(&*host, source, other) else {
            return;
        };
        let mut dispatcher = EventDispatcher::new_with(&mut self.scheduler);
        for (_, state) in self.rules.rules_tracking(source) {
            self.observer.handle_stay(source, other, distance, speed);
            dispatcher.dispatch_stay(state.rule(), source, host);
        }
    }

    /// The host reports that `other` left the trigger volume around `source`.
    pub fn on_trigger_exit(&mut self, source: EntityUid, other: EntityUid, host: &mut dyn Host) {
        if source == other {
            return;
        }
        let mut dispatcher = EventDispatcher::new_with(&mut self.scheduler);
        for (_, state) in self.rules.rules_tracking(source) {
            self.observer.handle_exit(source, other);
            dispatcher.dispatch_exit(state.rule(), source, host);
        }
    }

    fn check_all_rules(&mut self, host: &mut dyn Host) {
        let mut dispatcher = EventDispatcher::new_with(&mut self.scheduler);
        for &uid in self.rules.uids() {
            let Some(state) = self.rules.get(uid) else {
                continue;
            };
            for event in self.detector.scan(state.rule(), &*host) {
                self.detector.record(event);
                self.observer.handle_detection(event);
                dispatcher.dispatch_detection(uid, &event, host);
            }
        }
    }

    fn pump(&mut self, host: &mut dyn Host) {
        let mut cx = TaskContext::new_with(
            self.scheduler.now(),
            host,
            &mut self.rules,
            &mut self.rng,
            &self.settings,
        );
        self.scheduler.pump(&mut cx);
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// The most recent detections, oldest first.
    pub fn history(&self) -> &DetectionHistory {
        self.detector.history()
    }

    /// Registered rules, in registration order.
    pub fn rule_uids(&self) -> &[RuleUid] {
        self.rules.uids()
    }

    #[allow(missing_docs)]
    pub fn rule(&self, uid: RuleUid) -> Option<&ProximityRule> {
        self.rules.get(uid).map(|s| s.rule())
    }

    /// The rows from the rule's most recently completed load cycle.
    pub fn rows(&self, uid: RuleUid) -> Option<&[CsvRow]> {
        self.rules.get(uid).map(|s| s.rows())
    }

    /// The rule's curve bound to `parameter`.
    pub fn curve(&self, uid: RuleUid, parameter: &ParameterName) -> Option<&CurveConfig> {
        self.rules.get(uid).and_then(|s| s.curve(parameter))
    }

    /// The value most recently pushed by a player of that curve.
    pub fn current_curve_value(&self, uid: RuleUid, parameter: &ParameterName) -> Option<f64> {
        self.curve(uid, parameter).and_then(|c| c.current_value())
    }

    /// The number of row-load sequences, curve pipelines, and curve players
    /// still running.
    pub fn pending_task_count(&self) -> usize {
        self.scheduler.pending_task_count()
    }

    /// Total time passed to [ProximityController::tick()].
    pub fn now(&self) -> Seconds {
        self.scheduler.now()
    }
}
