// Copyright (c) 2024 Mike Tsao

use super::RowLoadTask;
use crate::{
    detection::{DetectionEvent, ProximityRule},
    scheduler::Scheduler,
    traits::Host,
    types::{AudioEventName, EntityUid, RuleUid},
};

/// Routes notifications for one tick. It borrows the scheduler so that the
/// sequences it starts begin on this tick's pump.
#[derive(Debug)]
pub struct EventDispatcher<'a> {
    scheduler: &'a mut Scheduler,
}
impl<'a> EventDispatcher<'a> {
    #[allow(missing_docs)]
    pub fn new_with(scheduler: &'a mut Scheduler) -> Self {
        Self { scheduler }
    }

    /// Registers the tracked entity with the audio engine and starts its
    /// row-load sequence.
    pub fn dispatch_detection(
        &mut self,
        rule_uid: RuleUid,
        event: &DetectionEvent,
        host: &mut dyn Host,
    ) {
        host.register_entity(event.source);
        self.scheduler
            .spawn(Box::new(RowLoadTask::new_with(rule_uid, event.source)));
    }

    /// Posts the rule's exit event, if it has one, on the tracked entity.
    pub fn dispatch_exit(&mut self, rule: &ProximityRule, source: EntityUid, host: &mut dyn Host) {
        Self::post_if_alive(rule.exit_event.as_ref(), source, host);
    }

    /// Posts the rule's stay event, if it has one, on the tracked entity.
    pub fn dispatch_stay(&mut self, rule: &ProximityRule, source: EntityUid, host: &mut dyn Host) {
        Self::post_if_alive(rule.stay_event.as_ref(), source, host);
    }

    fn post_if_alive(event: Option<&AudioEventName>, uid: EntityUid, host: &mut dyn Host) {
        if let Some(event) = event {
            if host.is_alive(uid) {
                host.post_event(event, uid);
            }
        }
    }
}
