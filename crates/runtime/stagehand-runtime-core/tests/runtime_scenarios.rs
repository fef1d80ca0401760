use std::time::Duration;

use stagehand_api_core::{Value, ViewHandle, ViewOp};
use stagehand_runtime::{
    AssetLibrary, RecordingView, RunConfig, Runtime, RuntimeEvent, StartReport, StreamPhase,
};
use stagehand_script_core::Program;

fn library() -> AssetLibrary {
    let mut assets = AssetLibrary::new();
    assets.register("cat_img", "data:image/png;base64,cat");
    assets.register("dog_img", "data:image/png;base64,dog");
    assets
}

fn runtime_with(config: RunConfig) -> Runtime<RecordingView> {
    Runtime::new(RecordingView::new(), library(), config)
}

fn fixture(name: &str) -> Program {
    let json = stagehand_test_fixtures::programs::json(name).expect("load program fixture");
    Program::from_json_str(&json).expect("fixture decodes")
}

fn start(name: &str) -> (Runtime<RecordingView>, StartReport) {
    let mut rt = runtime_with(RunConfig::default());
    let report = rt.start(&fixture(name));
    (rt, report)
}

fn position_ops(rt: &Runtime<RecordingView>, view: ViewHandle) -> Vec<(usize, f64, f64)> {
    rt.view()
        .ops()
        .iter()
        .enumerate()
        .filter_map(|(idx, op)| match op {
            ViewOp::SetPosition { view: v, x, y } if *v == view => Some((idx, *x, *y)),
            _ => None,
        })
        .collect()
}

#[test]
fn two_actors_run_in_launch_order() {
    let (mut rt, report) = start("two-actors");
    assert_eq!(report.actors, ["cat", "dog"]);
    assert_eq!(report.streams, ["cat", "dog"]);
    assert_eq!(report.finished, ["cat"]);

    assert!(rt.run_until_idle(Duration::from_secs(10)));
    let cat = rt.actor("cat").expect("cat");
    let dog = rt.actor("dog").expect("dog");
    assert_eq!((cat.x, cat.y), (30.0, 0.0));
    assert_eq!((dog.x, dog.y), (0.0, 5.0));
    assert_eq!(rt.now(), Duration::from_secs(1));

    // The dog's move lands after every cat op.
    let cat_moves = position_ops(&rt, cat.view);
    let dog_moves = position_ops(&rt, dog.view);
    let last_cat = cat_moves.last().expect("cat moved").0;
    let dog_move = dog_moves.last().expect("dog moved");
    assert_eq!((dog_move.1, dog_move.2), (0.0, 5.0));
    assert!(dog_move.0 > last_cat);
    assert_eq!(
        cat_moves.iter().map(|m| m.1).collect::<Vec<_>>(),
        [0.0, 10.0, 20.0, 30.0]
    );
    assert!(rt
        .stream_states()
        .iter()
        .all(|(_, phase)| *phase == StreamPhase::Done));
}

#[test]
fn divide_by_zero_leaves_score_at_eight() {
    let (rt, report) = start("score-math");
    assert_eq!(rt.variable("score"), Value::Number(8.0));
    assert_eq!(rt.variables().entry("score").expect("score").source, "cat");
    assert!(report.diagnostics.is_empty());
    let said = rt.view().ops().iter().find_map(|op| match op {
        ViewOp::ShowBubble { text, .. } => Some(text.clone()),
        _ => None,
    });
    assert_eq!(said.as_deref(), Some("8"));
}

#[test]
fn unknown_instructions_are_skipped() {
    let (rt, report) = start("unknown-skip");
    let cat = rt.actor("cat").expect("cat");
    assert_eq!((cat.x, cat.y), (5.0, -2.0));
    assert!(!cat.visible);
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(
        report.events[0],
        RuntimeEvent::UnknownInstruction {
            actor: "cat".into(),
            key: "foo-bar".into()
        }
    );
    assert!(matches!(
        &report.events[1],
        RuntimeEvent::MalformedPayload { key, .. } if key == "data-set"
    ));
    assert_eq!(
        report.events[2],
        RuntimeEvent::StreamFinished { actor: "cat".into() }
    );
}

#[test]
fn conditionals_take_exactly_one_branch() {
    let (rt, _) = start("branching");
    let cat = rt.actor("cat").expect("cat");
    // "3" == 3 holds loosely; "3" === 3 does not.
    assert_eq!((cat.x, cat.y), (10.0, 10.0));
    assert!(cat.visible);
    assert_eq!(rt.variable("lives"), Value::Text("3".into()));
}

#[test]
fn missing_asset_skips_actor_but_runs_its_stream() {
    let (rt, report) = start("missing-asset");
    assert_eq!(report.actors, ["cat"]);
    assert_eq!(report.missing_assets.len(), 1);
    assert_eq!(report.missing_assets[0].actor, "ghost");
    assert_eq!(report.missing_assets[0].asset, "ghost_img");
    assert_eq!(report.streams, ["ghost", "cat"]);

    assert!(rt.actor("ghost").is_none());
    assert_eq!(rt.variable("seen"), Value::Bool(true));
    assert_eq!(rt.actor("cat").expect("cat").x, -3.0);
}

#[test]
fn speech_bubble_expires_unless_replaced() {
    let (mut rt, _) = start("speech");
    assert!(rt.actor("cat").expect("cat").has_bubble());

    // The first bubble's timer fires at t=2 but "again" replaced it at t=1.
    rt.tick(Duration::from_secs(2));
    assert!(rt.actor("cat").expect("cat").has_bubble());

    rt.tick(Duration::from_secs(1));
    let cat = rt.actor("cat").expect("cat");
    assert!(!cat.has_bubble());
    assert_eq!(cat.scale, 2.0);
    assert!(rt.is_idle());

    let bubble_ops: Vec<&ViewOp> = rt
        .view()
        .ops()
        .iter()
        .filter(|op| matches!(op, ViewOp::ShowBubble { .. } | ViewOp::RemoveBubble { .. }))
        .collect();
    assert_eq!(bubble_ops.len(), 4);
    assert!(matches!(bubble_ops[1], ViewOp::RemoveBubble { .. }));
    assert!(matches!(bubble_ops[3], ViewOp::RemoveBubble { .. }));
}

#[test]
fn forever_advances_once_per_tick() {
    let (mut rt, _) = start("forever-counter");
    assert_eq!(rt.variable("ticks"), Value::Number(1.0));
    for _ in 0..5 {
        rt.tick(Duration::from_millis(16));
    }
    assert_eq!(rt.variable("ticks"), Value::Number(6.0));
    assert_eq!(rt.actor("cat").expect("cat").rotation, 90.0);
    assert!(!rt.run_until_idle(Duration::from_millis(200)));
    assert!(rt.now() >= Duration::from_millis(200));
}

#[test]
fn run_for_ticks_in_frame_steps() {
    let mut rt = runtime_with(RunConfig {
        frame_seconds: 0.025,
        ..RunConfig::default()
    });
    rt.start(&fixture("forever-counter"));
    let frame = rt.run_for(Duration::from_millis(100));
    assert_eq!(frame.resumed, 4);
    assert_eq!(frame.now, Duration::from_millis(100));
    assert_eq!(rt.variable("ticks"), Value::Number(5.0));
}

#[test]
fn cancelled_token_stops_streams() {
    let (mut rt, _) = start("forever-counter");
    rt.cancel_token().cancel();
    let frame = rt.tick(Duration::from_millis(16));
    assert_eq!(
        frame.events,
        [RuntimeEvent::StreamCancelled { actor: "cat".into() }]
    );
    assert_eq!(rt.variable("ticks"), Value::Number(1.0));
    assert_eq!(rt.stream_states(), [("cat".to_string(), StreamPhase::Cancelled)]);
    assert!(rt.is_idle());
}

#[test]
fn reset_clears_everything() {
    let (mut rt, _) = start("two-actors");
    rt.reset();
    assert!(rt.actors().is_empty());
    assert!(rt.variables().is_empty());
    assert!(rt.stream_states().is_empty());
    assert!(rt.meta().is_empty());
    assert!(rt.is_idle());
    assert_eq!(rt.now(), Duration::ZERO);
    assert_eq!(rt.view().ops().iter().last(), Some(&ViewOp::ClearAll));

    // A restarted program begins from a clean slate.
    rt.start(&fixture("two-actors"));
    assert_eq!(rt.actor("cat").expect("cat").x, 30.0);
    assert_eq!(rt.meta()["title"], "Two actors");
}

#[test]
fn resume_budget_rolls_over() {
    let program = Program::from_json(&serde_json::json!({
        "code": {
            "a": [{ "control-wait": 0.5 }, { "data-change": { "var": "n", "by": 1 } }],
            "b": [{ "control-wait": 0.5 }, { "data-change": { "var": "n", "by": 1 } }]
        }
    }))
    .expect("program decodes");
    let mut rt = runtime_with(RunConfig {
        max_resumes_per_tick: 1,
        ..RunConfig::default()
    });
    rt.start(&program);

    let first = rt.tick(Duration::from_secs(1));
    assert_eq!(first.resumed, 1);
    assert_eq!(first.finished, ["a"]);
    assert_eq!(rt.variable("n"), Value::Number(1.0));

    let second = rt.tick(Duration::ZERO);
    assert_eq!(second.finished, ["b"]);
    assert_eq!(rt.variable("n"), Value::Number(2.0));
}

#[test]
fn repeat_count_is_floored_from_variables() {
    let program = Program::from_json(&serde_json::json!({
        "sprites": { "cat": "cat_img" },
        "code": {
            "cat": [
                { "data-set": { "var": "times", "value": "2.9" } },
                { "control-repeat": { "times": { "var": "times" }, "do": [
                    { "looks-rotate": 45 },
                    { "looks-scale": 3 }
                ] } }
            ]
        }
    }))
    .expect("program decodes");
    let mut rt = runtime_with(RunConfig::default());
    rt.start(&program);
    let cat = rt.actor("cat").expect("cat");
    assert_eq!(cat.rotation, 90.0);
    assert_eq!(cat.scale, 3.0);
}

#[test]
fn infinite_wait_never_resumes() {
    let program = Program::from_json(&serde_json::json!({
        "code": { "a": [{ "control-wait": "Infinity" }, { "data-set": { "var": "x", "value": 1 } }] }
    }))
    .expect("program decodes");
    let mut rt = runtime_with(RunConfig::default());
    rt.start(&program);
    assert!(rt.is_idle());
    assert!(rt.run_until_idle(Duration::from_secs(60)));
    assert_eq!(rt.variables().get_raw("x"), None);
    assert_eq!(rt.stream_states(), [("a".to_string(), StreamPhase::Suspended)]);
}

#[test]
fn create_actor_reports_missing_asset() {
    let mut rt = runtime_with(RunConfig::default());
    assert!(rt.create_actor("cat", "cat_img").is_ok());
    let err = rt.create_actor("owl", "owl_img").expect_err("unknown asset");
    assert_eq!(err.to_string(), "missing asset `owl_img` for actor `owl`");
    assert_eq!(rt.actors().names(), ["cat"]);
}

#[test]
fn hidden_actor_shows_again_after_wait() {
    let program = Program::from_json(&serde_json::json!({
        "sprites": { "cat": "cat_img" },
        "code": {
            "cat": [{ "visibility-hide": null }, { "control-wait": 0.5 }, { "visibility-show": null }]
        }
    }))
    .expect("program decodes");
    let mut rt = runtime_with(RunConfig::default());
    rt.start(&program);
    assert!(!rt.actor("cat").expect("cat").visible);

    assert!(rt.run_until_idle(Duration::from_secs(5)));
    let cat = rt.actor("cat").expect("cat");
    assert!(cat.visible);
    let toggles: Vec<bool> = rt
        .view()
        .ops()
        .iter()
        .filter_map(|op| match op {
            ViewOp::SetVisible { view, visible } if *view == cat.view => Some(*visible),
            _ => None,
        })
        .collect();
    assert_eq!(toggles, [false, true]);
}

#[test]
fn missing_left_operand_is_not_strictly_null() {
    let program = Program::from_json(&serde_json::json!({
        "code": {
            "a": [
                { "control-ifelse": {
                    "cond": { "op": "===", "right": null },
                    "then": [{ "data-set": { "var": "strict", "value": "yes" } }],
                    "else": [{ "data-set": { "var": "strict", "value": "no" } }]
                } },
                { "control-if": {
                    "cond": { "op": "==", "right": null },
                    "then": [{ "data-set": { "var": "loose", "value": "yes" } }]
                } }
            ]
        }
    }))
    .expect("program decodes");
    let mut rt = runtime_with(RunConfig::default());
    rt.start(&program);
    assert_eq!(rt.variable("strict"), Value::Text("no".into()));
    assert_eq!(rt.variable("loose"), Value::Text("yes".into()));
}
