use super::*;
use serde_json::json;

fn doc(animation: serde_json::Value) -> serde_json::Value {
    json!({
        "version": "1",
        "objects": [
            {"name": "dot", "properties": {
                "opacity": {"scalar": 1.0},
                "position": {"vec2": [0.0, 0.0]},
                "scale": {"scalar": 1.0},
                "fill_color": {"color": "#ffffff"}
            }},
            {"name": "label", "properties": {"text": {"text": "hi"}, "opacity": {"scalar": 1.0}}}
        ],
        "groups": [{"name": "all", "members": ["dot", "label"]}],
        "animation": animation
    })
}

fn parse(v: serde_json::Value) -> TimelineDef {
    TimelineDef::from_json(&v.to_string()).unwrap()
}

#[test]
fn builds_graph_with_named_groups() {
    let def = parse(doc(json!({"type": "wait", "duration": 1.0})));
    let (g, anim) = def.build().unwrap();
    let all = g.lookup("all").unwrap();
    let dot = g.lookup("dot").unwrap();
    assert_eq!(g.object(dot).unwrap().parent(), Some(all));
    assert_eq!(anim.duration().unwrap(), 1.0);
}

#[test]
fn primitive_keyframes_take_windows_and_ease_overrides() {
    let def = parse(doc(json!({
        "type": "primitive",
        "targets": ["dot"],
        "duration": 2.0,
        "ease": "smooth",
        "keyframes": [
            {"property": "opacity", "change": {"to": {"scalar": 0.0}}, "window": [0.0, 1.0]},
            {"property": "position", "change": {"shift_by": {"vec2": {"x": 1.0, "y": 0.0}}}, "ease": "linear"}
        ]
    })));
    let (_, anim) = def.build().unwrap();
    let Animation::Primitive(p) = anim else {
        panic!("expected primitive");
    };
    assert_eq!(p.keyframes()[0].ease, Ease::Smooth);
    assert_eq!((p.keyframes()[0].t0, p.keyframes()[0].t1), (0.0, 1.0));
    assert_eq!(p.keyframes()[1].ease, Ease::Linear);
    assert_eq!(p.keyframes()[1].t1, 2.0);
}

#[test]
fn composites_honor_run_time() {
    let def = parse(doc(json!({
        "type": "staggered",
        "lag_ratio": 0.5,
        "run_time": 4.0,
        "children": [
            {"type": "fade_in", "targets": ["dot"], "duration": 1.0},
            {"type": "fade_in", "targets": ["label"], "duration": 1.0}
        ]
    })));
    let (_, anim) = def.build().unwrap();
    assert_eq!(anim.duration().unwrap(), 4.0);
}

#[test]
fn unknown_names_are_not_found() {
    let def = parse(doc(json!({"type": "remove", "targets": ["ghost"]})));
    assert!(matches!(def.build(), Err(TimeweaveError::NotFound(_))));
}

#[test]
fn unknown_fields_and_versions_are_rejected() {
    let mut v = doc(json!({"type": "wait", "duration": 1.0}));
    v["extra"] = json!(true);
    assert!(matches!(
        TimelineDef::from_json(&v.to_string()),
        Err(TimeweaveError::Serde(_))
    ));

    let mut v = doc(json!({"type": "wait", "duration": 1.0}));
    v["version"] = json!("2");
    assert!(matches!(
        parse(v).build(),
        Err(TimeweaveError::Validation(_))
    ));
}

#[test]
fn documents_survive_a_json_round_trip() {
    let def = parse(doc(json!({
        "type": "sequential",
        "children": [
            {"type": "fade_in", "targets": ["all"], "duration": 1.0, "shift": [0.0, 0.5]},
            {"type": "pulse", "targets": ["dot"], "factor": 1.1, "duration": 0.5},
            {"type": "set_color", "targets": ["dot"], "color": "#ff0000", "duration": 0.5},
            {"type": "fade_out", "targets": ["all"], "duration": 1.0}
        ]
    })));
    let back = TimelineDef::from_json(&def.to_json().unwrap()).unwrap();
    assert_eq!(back, def);
}
