// Copyright (c) 2024 Mike Tsao

use proximity_rtpc::{
    prelude::*,
    testing::{AudioCall, TestHost},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// A long check interval, so that only the scan at start() detects anything.
fn controller_with(rule: ProximityRule) -> ProximityController {
    let mut config = ControllerConfig::default();
    config.settings.check_interval = Seconds(100.0);
    config.rules.push(rule);
    ProximityController::new_with(config, Rng::new_with_seed(1234)).unwrap()
}

fn hit_rule() -> ProximityRule {
    ProximityRuleBuilder::default()
        .primary_event("Play_Hit")
        .secondary_event("Play_Tail")
        .secondary_delay(Seconds(1.0))
        .distance_gate(1.0..=5.0)
        .speed_gate(0.0..=10.0)
        .collider_radius(10.0)
        .track(EntityUid(1))
        .build()
        .unwrap()
}

fn world() -> TestHost {
    let mut host = TestHost::default();
    host.add_entity(EntityUid(1), Position::new(0.0, 0.0, 0.0), None);
    host.add_entity(EntityUid(2), Position::new(3.0, 0.0, 0.0), Some(2.0));
    host
}

// Demonstrates the whole detection sequence: register, primary, a delay,
// secondary, unregister.
#[test]
fn detection_posts_primary_then_secondary() {
    init_logging();
    let mut host = world();
    let mut controller = controller_with(hit_rule());

    controller.start(&mut host);
    assert_eq!(controller.history().len(), 1);
    let event = controller.history().latest().unwrap();
    assert_eq!(event.source, EntityUid(1));
    assert_eq!(event.other, EntityUid(2));
    assert_eq!(event.distance, 3.0);
    assert_eq!(event.speed, 2.0);

    assert_eq!(host.post_count("Play_Hit"), 1);
    assert_eq!(host.post_count("Play_Tail"), 0);

    for _ in 0..3 {
        controller.tick(Seconds(0.25), &mut host);
    }
    assert_eq!(
        host.post_count("Play_Tail"),
        0,
        "the secondary waits a full second"
    );
    controller.tick(Seconds(0.25), &mut host);
    assert_eq!(host.post_count("Play_Tail"), 1);

    assert_eq!(
        host.calls,
        vec![
            AudioCall::Register(EntityUid(1)),
            AudioCall::Post(AudioEventName::from("Play_Hit"), EntityUid(1)),
            AudioCall::Post(AudioEventName::from("Play_Tail"), EntityUid(1)),
            AudioCall::Unregister(EntityUid(1)),
        ]
    );
    assert_eq!(controller.pending_task_count(), 0);
    assert_eq!(controller.history().len(), 1);
}

#[test]
fn destroyed_entities_truncate_the_sequence() {
    init_logging();
    let mut host = world();
    let mut controller = controller_with(hit_rule());

    controller.start(&mut host);
    assert_eq!(host.post_count("Play_Hit"), 1);

    host.remove_entity(EntityUid(1));
    for _ in 0..8 {
        controller.tick(Seconds(0.25), &mut host);
    }
    assert_eq!(host.post_count("Play_Tail"), 0);
    assert_eq!(
        host.calls.last(),
        Some(&AudioCall::Unregister(EntityUid(1))),
        "the entity is still released"
    );
    assert_eq!(controller.pending_task_count(), 0);
}

#[test]
fn neighbors_outside_the_gates_are_ignored() {
    init_logging();
    let mut host = world();
    host.add_entity(EntityUid(3), Position::new(0.0, 0.0, 5.001), None);
    host.add_entity(EntityUid(4), Position::new(0.0, 0.5, 0.0), None);
    host.add_entity(EntityUid(5), Position::new(0.0, 2.0, 0.0), Some(10.5));
    host.add_entity(EntityUid(6), Position::new(0.0, 0.0, -5.0), Some(10.0));

    let mut controller = controller_with(hit_rule());
    controller.start(&mut host);

    let others: Vec<EntityUid> = controller.history().iter().map(|e| e.other).collect();
    assert_eq!(others, vec![EntityUid(2), EntityUid(6)]);
}

#[test]
fn rules_are_evaluated_independently() {
    init_logging();
    let mut host = world();
    let mut controller = controller_with(hit_rule());
    let near_only = controller
        .add_rule(
            ProximityRuleBuilder::default()
                .primary_event("Play_Close")
                .distance_gate(0.0..=1.0)
                .collider_radius(10.0)
                .track(EntityUid(1))
                .build()
                .unwrap(),
        )
        .unwrap();
    assert_eq!(controller.rule_uids().len(), 2);

    controller.start(&mut host);
    assert_eq!(host.post_count("Play_Hit"), 1);
    assert_eq!(host.post_count("Play_Close"), 0);

    host.move_entity(EntityUid(2), Position::new(0.5, 0.0, 0.0));
    assert!(controller.remove_rule(controller.rule_uids()[0]).is_ok());
    let mut config_rule = controller.rule(near_only).unwrap().clone();
    config_rule.primary_event = AudioEventName::from("Play_Close_Again");
    assert!(controller.add_rule(config_rule).is_ok());

    controller.start(&mut host);
    assert_eq!(host.post_count("Play_Close"), 1);
    assert_eq!(host.post_count("Play_Close_Again"), 1);
    assert_eq!(host.post_count("Play_Hit"), 1);
}

#[test]
fn history_is_capped() {
    init_logging();
    let mut host = TestHost::default();
    host.add_entity(EntityUid(1), Position::new(0.0, 0.0, 0.0), None);
    for i in 2..10 {
        host.add_entity(EntityUid(i), Position::new(i as f64 * 0.1, 0.0, 0.0), None);
    }

    let mut config = ControllerConfig::default();
    config.settings.check_interval = Seconds::zero();
    config.settings.history_capacity = 5;
    config.rules.push(
        ProximityRuleBuilder::default()
            .primary_event("Play_Hit")
            .track(EntityUid(1))
            .collider_radius(10.0)
            .build()
            .unwrap(),
    );
    let mut controller = ProximityController::new_with(config, Rng::new_with_seed(1)).unwrap();

    controller.tick(Seconds(0.016), &mut host);
    assert_eq!(controller.history().len(), 5);
    assert_eq!(controller.history().capacity(), 5);
    assert_eq!(
        controller.history().latest().map(|e| e.other),
        Some(EntityUid(9))
    );
    assert_eq!(host.post_count("Play_Hit"), 8);

    // A zero interval scans on every tick.
    controller.tick(Seconds(0.016), &mut host);
    assert_eq!(host.post_count("Play_Hit"), 16);
}

// Stays and exits come from the host's trigger volumes, not from the periodic
// scan.
#[test]
fn stay_and_exit_events() {
    init_logging();
    let mut host = world();
    let rule = ProximityRuleBuilder::default()
        .primary_event("Play_Hit")
        .stay_event("Play_Hum")
        .exit_event("Play_Fade")
        .distance_gate(50.0..=60.0)
        .track(EntityUid(1))
        .build()
        .unwrap();
    let mut controller = controller_with(rule);
    controller.start(&mut host);
    assert!(controller.history().is_empty());

    controller.on_trigger_stay(EntityUid(1), EntityUid(2), &mut host);
    controller.on_trigger_stay(EntityUid(1), EntityUid(2), &mut host);
    controller.on_trigger_stay(EntityUid(1), EntityUid(1), &mut host);
    assert_eq!(host.post_count("Play_Hum"), 2, "stays aren't gated");

    controller.on_trigger_exit(EntityUid(1), EntityUid(2), &mut host);
    assert_eq!(host.post_count("Play_Fade"), 1);
    assert!(controller.history().is_empty(), "exits don't rescan");
    assert_eq!(host.post_count("Play_Hit"), 0);
}

// Removing a rule while its sources are still in flight abandons those fetches.
#[test]
fn removing_a_rule_abandons_its_fetches() {
    init_logging();
    let mut host = world();
    let rows = SourceLocation::Url("https://example.com/rows.csv".to_string());
    host.add_content(rows.clone(), "A,Gain_A,1,0,0\n");
    host.set_fetch_latency(3);

    let rule = ProximityRuleBuilder::default()
        .primary_event("Play_Hit")
        .row_source("https://example.com/rows.csv")
        .collider_radius(10.0)
        .track(EntityUid(1))
        .build()
        .unwrap();
    let mut controller = controller_with(rule.clone());
    controller.start(&mut host);
    assert_eq!(host.outstanding_fetch_count(), 1);

    assert!(controller.remove_rule(controller.rule_uids()[0]).is_ok());
    controller.tick(Seconds(0.016), &mut host);
    assert_eq!(host.outstanding_fetch_count(), 0);
    assert_eq!(controller.pending_task_count(), 0);
    assert_eq!(host.calls.last(), Some(&AudioCall::Unregister(EntityUid(1))));
    assert_eq!(host.post_count("Play_Hit"), 0);

    // The same, but with the curve pipeline waiting on its fetch.
    let mut host = world();
    host.add_content(rows, "A,Gain_A,1,0,0\n");
    host.set_fetch_latency(3);
    let mut rule = rule;
    rule.curve_sources.push(CurveSource::new_with("Wind", "https://example.com/wind.csv"));
    rule.curve_startup_delay = Seconds::zero();
    let mut controller = controller_with(rule);
    controller.start(&mut host);
    for _ in 0..20 {
        if host.fetched.len() == 2 {
            break;
        }
        controller.tick(Seconds(0.016), &mut host);
    }
    assert_eq!(host.fetched.len(), 2, "the curve fetch should have begun");
    assert_eq!(host.outstanding_fetch_count(), 1);

    assert!(controller.remove_rule(controller.rule_uids()[0]).is_ok());
    controller.tick(Seconds(0.016), &mut host);
    assert_eq!(host.outstanding_fetch_count(), 0);
    assert_eq!(controller.pending_task_count(), 0);
}
