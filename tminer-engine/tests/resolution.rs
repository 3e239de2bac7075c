//! Tests for token resolution, conditions and projection

use serde_json::json;
use tminer_engine::condition::{Cond, Condition};
use tminer_engine::config::{EngineOptions, OperatorTokens};
use tminer_engine::dimension::{Dimension, OptionScale, Variants};
use tminer_engine::engine::Engine;
use tminer_engine::error::MinerError;
use tminer_engine::path;
use tminer_engine::properties::PropertyBag;
use tminer_engine::token::Format;

fn palette_engine() -> Engine {
    Engine::builder()
        .theme(json!({
            "palette": {
                "black": { "sh-1": "#333", "sh+0": "#222", "sh+1": "#111" },
                "white": { "sh-1": "#eaeaea", "sh+0": "#e4e4e4", "sh+1": "#dedede" },
                "primary": { "sh-1": "#2963d7", "sh+0": "#255BC7", "sh+1": "#2253b6" }
            },
            "spacing": { "sp+0": 0, "sp+1": 8, "sp+2": 16 },
            "flags": { "rounded": false },
            "button": {
                "scale": { "sc+0": { "height": 32 }, "sc+1": { "height": 48 } }
            }
        }))
        .dimension(
            "palette",
            Dimension::new(OptionScale::new(["black", "white", "primary"], "primary"))
                .with_variants(Variants::new(
                    "shade",
                    OptionScale::new(["sh-1", "sh+0", "sh+1"], "sh+0"),
                )),
        )
        .dimension("scale", Dimension::new(OptionScale::new(["sc+0", "sc+1"], "sc+0")))
        .dimension(
            "spacing",
            Dimension::new(OptionScale::new(["sp+0", "sp+1", "sp+2"], "sp+0")),
        )
        .mixin("double", |_, _, value, _| {
            Ok(json!(value.as_f64().unwrap_or_default() * 2.0))
        })
        .build()
        .unwrap()
}

#[test]
fn test_stored_zero_and_false_resolve_exactly() {
    let theme = json!({ "spacing": { "sp+0": 0 }, "flags": { "rounded": false } });
    assert_eq!(path::resolve(&theme, "spacing.sp+0"), Some(&json!(0)));
    assert_eq!(path::resolve(&theme, "flags.rounded"), Some(&json!(false)));

    let engine = palette_engine();
    let props = PropertyBag::new();
    assert_eq!(engine.resolve("theme.spacing.sp+0", &props, None), Some(json!(0)));
    assert_eq!(engine.resolve("theme.flags.rounded", &props, None), Some(json!(false)));
}

#[test]
fn test_missing_segments_are_absent() {
    let theme = json!({ "a": { "b": { "c": 1 } } });
    assert_eq!(path::resolve(&theme, "a.x.c"), None);
    assert_eq!(path::resolve(&theme, "a.b.c.d"), None);
    assert_eq!(path::resolve(&json!("scalar"), "a"), None);

    let engine = palette_engine();
    assert_eq!(engine.resolve("theme.nope.deeper", &PropertyBag::new(), None), None);
}

#[test]
fn test_empty_bag_yields_defaults() {
    let engine = palette_engine();
    let active = engine.active(&PropertyBag::new());
    assert_eq!(active.key("palette"), Some("primary"));
    assert_eq!(active.variant("palette"), Some("sh+0"));
    assert_eq!(active.key("scale"), Some("sc+0"));
    assert_eq!(active.key("spacing"), Some("sp+0"));
    assert_eq!(active.len(), 3);
}

#[test]
fn test_later_declared_flag_wins() {
    let engine = palette_engine();
    let props = PropertyBag::new().with("$primary", true).with("$black", true);
    assert_eq!(engine.active(&props).key("palette"), Some("primary"));
    let props = PropertyBag::new().with("$white", true).with("$black", true);
    assert_eq!(engine.active(&props).key("palette"), Some("white"));
}

#[test]
fn test_closest_saturates() {
    let scale = OptionScale::new(["sp+0", "sp+1", "sp+2"], "sp+0");
    assert_eq!(scale.closest("sp+0", -1), "sp+0");
    assert_eq!(scale.closest("sp+2", 1), "sp+2");
    assert_eq!(scale.closest("sp+1", 0), "sp+1");
    assert_eq!(scale.closest("unknown", 1), "unknown");
}

#[test]
fn test_unit_suffix() {
    let engine = palette_engine();
    let props = PropertyBag::new().with("$spacing", "sp+2");
    assert_eq!(
        engine.token("spacing.active", &props, None, &Format::unit("px")),
        Some(json!("16px"))
    );
    assert_eq!(
        engine.token("spacing.active", &props, None, &Format::Raw),
        Some(json!(16))
    );
    assert_eq!(
        engine.token("spacing.sp+9", &props, None, &Format::unit("px")),
        None
    );
}

#[test]
fn test_cond_on_property() {
    let engine = palette_engine();
    let cond = Cond::when("props.$x == true").then("A").otherwise("B");

    let yes = PropertyBag::new().with("$x", true);
    let no = PropertyBag::new().with("$x", false);
    assert_eq!(engine.cond(&cond, &yes, None), Some(json!("A")));
    assert_eq!(engine.cond(&cond, &no, None), Some(json!("B")));
    assert_eq!(engine.cond(&cond, &PropertyBag::new(), None), Some(json!("B")));

    let no_else = Cond::when("props.$x");
    assert_eq!(engine.cond(&no_else, &no, None), None);
}

#[test]
fn test_missing_mixin_is_named() {
    let engine = palette_engine();
    let err = engine
        .mixin("multiply", &[], "spacing.sp+1", &PropertyBag::new(), None)
        .unwrap_err();
    match &err {
        MinerError::MissingMixin { name } => assert_eq!(name, "multiply"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("multiply"));
}

#[test]
fn test_mixin_receives_resolved_value_or_path() {
    let engine = palette_engine();
    let props = PropertyBag::new().with("$spacing", "sp+1");
    assert_eq!(
        engine.mixin("double", &[], "spacing.active", &props, None).unwrap(),
        json!(16.0)
    );

    let engine = Engine::builder()
        .mixin("echo", |_, _, value, _| Ok(value))
        .build()
        .unwrap();
    assert_eq!(
        engine.mixin("echo", &[], "missing.path", &PropertyBag::new(), None).unwrap(),
        json!("missing.path")
    );
}

#[test]
fn test_empty_and_or() {
    let engine = palette_engine();
    let props = PropertyBag::new();
    assert!(engine.evaluate(&Condition::all(Vec::<Condition>::new()), &props, None));
    assert!(!engine.evaluate(&Condition::any(Vec::<Condition>::new()), &props, None));
}

#[test]
fn test_single_option_palette_scenario() {
    let engine = Engine::builder()
        .theme(json!({ "palette": { "primary": { "sh+0": "#255BC7" } } }))
        .dimension("palette", Dimension::new(OptionScale::new(["primary"], "primary")))
        .build()
        .unwrap();
    assert_eq!(
        engine.resolve("palette.active.sh+0", &PropertyBag::new(), None),
        Some(json!("#255BC7"))
    );
}

#[test]
fn test_conditions_over_resolved_tokens() {
    let engine = palette_engine();
    let props = PropertyBag::new()
        .with("$scale", "sc+1")
        .with("$tags", json!(["left", "top"]))
        .with("$ghost", true);
    let check = |text: &str| engine.evaluate(&engine.condition(text), &props, None);

    assert!(check("active.scale.key == sc+1"));
    assert!(check("active.scale.key != sc+0"));
    assert!(check("button.scale.active.height > 40"));
    assert!(check("button.scale.active.height <= 48"));
    assert!(!check("button.scale.active.height < 48"));
    assert!(check("props.$tags in left"));
    assert!(!check("props.$tags nin left"));
    assert!(check("props.$tags nin bottom"));
    assert!(!check("props.$missing in left"));
    assert!(!check("props.$missing nin left"));
    assert!(check("props.$ghost"));
    assert!(check("==props.$ghost"));
    assert!(!check("!!props.$ghost"));
    assert!(check("!props.$outline"));
    assert!(check("palette.active"));

    let custom = Condition::custom(|props| props.has("$ghost"));
    assert!(engine.evaluate(&custom, &props, None));
    assert!(engine.evaluate(
        &Condition::all(["props.$ghost", "active.scale.key == sc+1"]),
        &props,
        None
    ));
    assert!(engine.evaluate(
        &Condition::any(["props.$outline", "props.$ghost"]),
        &props,
        None
    ));
}

#[test]
fn test_cached_active_state_is_reused_until_bypassed() {
    let engine = palette_engine();
    let cached = engine.active(&PropertyBag::new().with("$black", true));

    let props = PropertyBag::new().with("$white", true);
    assert_eq!(
        engine.resolve("palette.active", &props, Some(&cached)),
        Some(json!("#222"))
    );
    assert_eq!(
        engine.resolve("palette.active", &props.clone().disable_cache(), Some(&cached)),
        Some(json!("#e4e4e4"))
    );
}

#[test]
fn test_projection_buckets() {
    let engine = palette_engine();
    let props = PropertyBag::new()
        .with("$palette", "black")
        .with("$sh+1", true)
        .with("$white", false)
        .with("$spacing", "")
        .with("label", "Go")
        .with("onClick", "noop");
    let projection = engine.properties(&props, &["label".to_string()]);

    assert!(projection.all.has("$palette"));
    assert!(projection.all.has("$sh+1"));
    assert!(!projection.all.has("$white"));
    assert!(projection.all.has("$spacing"));
    assert!(projection.all.has("label"));
    assert!(!projection.all.has("onClick"));
    assert!(projection.local.has("label"));
    assert!(!projection.interactive.has("label"));
    assert!(projection.global.is_empty());
}

#[test]
fn test_text_conditions_use_engine_operators() {
    let options = EngineOptions {
        operators: OperatorTokens {
            eq: " is ".to_string(),
            ..OperatorTokens::default()
        },
        ..EngineOptions::default()
    };
    let engine = Engine::builder()
        .dimension("scale", Dimension::new(OptionScale::new(["sc+0", "sc+1"], "sc+0")))
        .options(options)
        .build()
        .unwrap();
    let props = PropertyBag::new().with("$scale", "sc+1");

    let cond = Cond::when("active.scale.key is sc+1").then("big").otherwise("small");
    assert_eq!(engine.cond(&cond, &props, None), Some(json!("big")));
    assert!(engine.evaluate(
        &Condition::all(["active.scale.key is sc+1", "props.$scale"]),
        &props,
        None
    ));
    assert!(!engine.evaluate(&Condition::any(["active.scale.key is sc+0"]), &props, None));
}

#[test]
fn test_boolean_markers_compare_loosely() {
    let engine = palette_engine();
    let props = PropertyBag::new()
        .with("$one", "1")
        .with("$zero", "0")
        .with("$blank", "")
        .with("$count", 1);
    let check = |text: &str| engine.evaluate(&engine.condition(text), &props, None);

    assert!(check("==props.$one"));
    assert!(check("==props.$count"));
    assert!(!check("==props.$zero"));
    assert!(check("!!props.$zero"));
    assert!(check("!!props.$blank"));
    assert!(!check("!!props.$one"));
    assert!(!check("==props.$missing"));
    assert!(!check("!!props.$missing"));
}

#[test]
fn test_zero_direct_property_is_ignored() {
    let engine = palette_engine();
    let props = PropertyBag::new().with("$scale", 0);
    assert_eq!(engine.active(&props).key("scale"), Some("sc+0"));
}
