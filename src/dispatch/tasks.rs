// Copyright (c) 2024 Mike Tsao

use crate::{
    curves::{CurveInterpolator, CurveParser, CurvePlayer},
    rows::{CsvRow, CsvRowLoader},
    scheduler::{Task, TaskContext, TaskStatus},
    types::{EntityUid, FetchTicket, ParameterName, RuleUid, Seconds},
    util::SourceLocation,
};
use log::{debug, error};

#[derive(Clone, Copy, Debug, PartialEq)]
enum RowLoadStage {
    LoadingRows,
    AwaitingSecondary,
}

/// The sequence that follows a detection: load every row source, pushing each
/// row's jittered value as it arrives, then post the primary event, wait, post
/// the secondary event, and release the entity.
///
/// The rows are collected into a local batch that replaces the rule's rows
/// once every source has been tried.
#[derive(Debug)]
pub struct RowLoadTask {
    rule: RuleUid,
    entity: EntityUid,
    stage: RowLoadStage,
    next_source: usize,
    ticket: Option<FetchTicket>,
    batch: Vec<CsvRow>,
}
impl RowLoadTask {
    #[allow(missing_docs)]
    pub fn new_with(rule: RuleUid, entity: EntityUid) -> Self {
        Self {
            rule,
            entity,
            stage: RowLoadStage::LoadingRows,
            next_source: 0,
            ticket: None,
            batch: Vec::default(),
        }
    }

    fn poll_rows(&mut self, cx: &mut TaskContext) -> TaskStatus {
        loop {
            let Some(state) = cx.rules.get(self.rule) else {
                if let Some(ticket) = self.ticket.take() {
                    cx.host.cancel_fetch(ticket);
                }
                return self.finish(cx);
            };
            let Some(source) = state.rule().row_sources.get(self.next_source) else {
                let batch = core::mem::take(&mut self.batch);
                if let Some(state) = cx.rules.get_mut(self.rule) {
                    state.replace_rows(batch);
                }
                return self.post_primary(cx);
            };
            let ticket = match self.ticket {
                Some(ticket) => ticket,
                None => {
                    let location = SourceLocation::resolve(source, &cx.settings.assets_root);
                    let ticket = cx.host.begin_fetch(&location);
                    self.ticket = Some(ticket);
                    ticket
                }
            };
            match cx.host.poll_fetch(ticket) {
                None => return TaskStatus::Yield,
                Some(Ok(text)) => {
                    let parsed = CsvRowLoader::new_with(cx.settings.enable_debug_logs).parse(&text);
                    for row in parsed.rows.iter() {
                        if let Some(value) = row.jittered_value(cx.rng) {
                            cx.host.set_parameter(&row.parameter, value);
                            trigger_curve_pipeline(self.rule, cx);
                        }
                    }
                    self.batch.extend(parsed.rows);
                }
                Some(Err(e)) => error!("Skipping row source: {e}"),
            }
            self.ticket = None;
            self.next_source += 1;
        }
    }

    fn post_primary(&mut self, cx: &mut TaskContext) -> TaskStatus {
        let Some(state) = cx.rules.get(self.rule) else {
            return self.finish(cx);
        };
        let rule = state.rule();
        let primary = rule.primary_event.clone();
        let has_secondary = rule.secondary_event.is_some();
        let delay = rule.secondary_delay;

        if !cx.host.is_alive(self.entity) {
            return self.finish(cx);
        }
        cx.host.post_event(&primary, self.entity);
        if has_secondary {
            self.stage = RowLoadStage::AwaitingSecondary;
            TaskStatus::Sleep(delay)
        } else {
            self.finish(cx)
        }
    }

    fn post_secondary(&mut self, cx: &mut TaskContext) -> TaskStatus {
        let secondary = cx
            .rules
            .get(self.rule)
            .and_then(|s| s.rule().secondary_event.clone());
        if let Some(secondary) = secondary {
            if cx.host.is_alive(self.entity) {
                cx.host.post_event(&secondary, self.entity);
            }
        }
        self.finish(cx)
    }

    fn finish(&mut self, cx: &mut TaskContext) -> TaskStatus {
        cx.host.unregister_entity(self.entity);
        TaskStatus::Done
    }
}
impl Task for RowLoadTask {
    fn poll(&mut self, cx: &mut TaskContext) -> TaskStatus {
        match self.stage {
            RowLoadStage::LoadingRows => self.poll_rows(cx),
            RowLoadStage::AwaitingSecondary => self.post_secondary(cx),
        }
    }
}

/// Starts a curve pipeline for the rule unless one is already in flight.
pub(crate) fn trigger_curve_pipeline(rule: RuleUid, cx: &mut TaskContext) {
    let Some(state) = cx.rules.get_mut(rule) else {
        return;
    };
    if state.curves().is_empty() {
        return;
    }
    if state.is_pipeline_in_flight() {
        if cx.settings.enable_debug_logs {
            debug!("Curve pipeline for rule {rule} already pending");
        }
        return;
    }
    state.set_pipeline_in_flight(true);
    let delay = state.rule().curve_startup_delay;
    cx.spawn(Box::new(CurvePipelineTask::new_with(rule, delay)));
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PipelineStage {
    Starting,
    Loading,
}

/// Waits out the startup delay, then loads each of a rule's curves in order
/// and starts a [CurvePlayerTask] for each one that loads.
#[derive(Debug)]
pub struct CurvePipelineTask {
    rule: RuleUid,
    startup_delay: Seconds,
    stage: PipelineStage,
    next_curve: usize,
    ticket: Option<FetchTicket>,
}
impl CurvePipelineTask {
    #[allow(missing_docs)]
    pub fn new_with(rule: RuleUid, startup_delay: Seconds) -> Self {
        Self {
            rule,
            startup_delay,
            stage: PipelineStage::Starting,
            next_curve: 0,
            ticket: None,
        }
    }

    fn poll_curves(&mut self, cx: &mut TaskContext) -> TaskStatus {
        let is_verbose = cx.settings.enable_debug_logs;
        let curve_root = cx.settings.curve_root();
        loop {
            let Some(state) = cx.rules.get_mut(self.rule) else {
                if let Some(ticket) = self.ticket.take() {
                    cx.host.cancel_fetch(ticket);
                }
                return TaskStatus::Done;
            };
            let index = self.next_curve;
            if index >= state.curves().len() {
                state.set_pipeline_in_flight(false);
                return TaskStatus::Done;
            }
            let Some(curve) = state.curve_mut(index) else {
                return TaskStatus::Done;
            };
            let ticket = match self.ticket {
                Some(ticket) => ticket,
                None => {
                    curve.clear();
                    let location = SourceLocation::resolve(&curve.source().source, &curve_root);
                    let ticket = cx.host.begin_fetch(&location);
                    self.ticket = Some(ticket);
                    ticket
                }
            };
            let Some(result) = cx.host.poll_fetch(ticket) else {
                return TaskStatus::Yield;
            };
            self.ticket = None;
            self.next_curve += 1;

            let Some(curve) = cx
                .rules
                .get_mut(self.rule)
                .and_then(|s| s.curve_mut(index))
            else {
                return TaskStatus::Done;
            };
            match result {
                Ok(text) => {
                    let diagnostics = curve.load_text(
                        &text,
                        &CurveParser::new_with(CurveParser::DEFAULT_DELIMITER, is_verbose),
                        &CurveInterpolator::new_with(
                            CurveInterpolator::SAMPLES_PER_TIME_UNIT,
                            is_verbose,
                        ),
                    );
                    if is_verbose {
                        debug!(
                            "Loaded curve {}: {} keyframes, {} samples, {} line(s) skipped",
                            curve.source().source,
                            curve.keyframes().len(),
                            curve.samples().len(),
                            diagnostics.len()
                        );
                    }
                    let parameter = curve.parameter().clone();
                    let samples = curve.samples().to_vec();
                    cx.spawn(Box::new(CurvePlayerTask::new_with(
                        self.rule, index, parameter, samples, is_verbose,
                    )));
                }
                Err(e) => {
                    curve.clear();
                    error!("Error loading curve {}: {e}", curve.source().source);
                }
            }
        }
    }
}
impl Task for CurvePipelineTask {
    fn poll(&mut self, cx: &mut TaskContext) -> TaskStatus {
        match self.stage {
            PipelineStage::Starting => {
                self.stage = PipelineStage::Loading;
                TaskStatus::Sleep(self.startup_delay)
            }
            PipelineStage::Loading => self.poll_curves(cx),
        }
    }
}

/// Pushes one curve sample per tick to the curve's parameter until the
/// samples run out. It owns a copy of the samples, so reloading the curve
/// doesn't disturb playback.
#[derive(Debug)]
pub struct CurvePlayerTask {
    rule: RuleUid,
    curve_index: usize,
    parameter: ParameterName,
    player: CurvePlayer,
    is_verbose: bool,
}
impl CurvePlayerTask {
    #[allow(missing_docs)]
    pub fn new_with(
        rule: RuleUid,
        curve_index: usize,
        parameter: ParameterName,
        samples: Vec<f64>,
        is_verbose: bool,
    ) -> Self {
        Self {
            rule,
            curve_index,
            parameter,
            player: CurvePlayer::new_with(samples),
            is_verbose,
        }
    }
}
impl Task for CurvePlayerTask {
    fn poll(&mut self, cx: &mut TaskContext) -> TaskStatus {
        let Some(value) = self.player.advance() else {
            if self.is_verbose {
                debug!(
                    "Final {} value: {:?}",
                    self.parameter,
                    self.player.current_value()
                );
            }
            return TaskStatus::Done;
        };
        if let Some(curve) = cx
            .rules
            .get_mut(self.rule)
            .and_then(|s| s.curve_mut(self.curve_index))
        {
            curve.set_current_value(value);
        }
        cx.host.set_parameter(&self.parameter, value);
        if self.is_verbose {
            debug!("{} = {value}", self.parameter);
        }
        TaskStatus::Yield
    }
}
