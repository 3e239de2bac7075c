//! # Palette Mixins
//!
//! Mixins that pick colors from the `palette` theme table according to the
//! active palette key and shade. Two transient properties steer them:
//!
//! - `$color`: a raw CSS color that bypasses the palette entirely;
//! - `$negative`: use the `contrast` sub-table (or, with `$color`, black/white
//!   text readable on that color).
//!
//! The theme is expected to look like this:
//!
//! ```json
//! { "palette": { "primary": { "sh+0": "#255BC7", "contrast": { "sh+0": "#e4e4e4" } } } }
//! ```

use serde_json::Value;
use tminer_engine::engine::Engine;
use tminer_engine::error::{MinerError, MinerResult};
use tminer_engine::path;
use tminer_engine::properties::PropertyBag;
use tminer_engine::value;

use crate::color;

/// Dimension and theme table the palette mixins walk.
pub const PALETTE: &str = "palette";
/// Sub-table holding the contrasting colors of a palette entry.
pub const CONTRAST: &str = "contrast";

struct Flags<'p> {
    color: Option<&'p str>,
    negative: bool,
}

fn flags<'p>(engine: &Engine, props: &'p PropertyBag) -> Flags<'p> {
    let options = engine.options();
    Flags {
        color: props
            .get(&options.key("color"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty()),
        negative: value::is_set(props.get(&options.key("negative"))),
    }
}

fn palette_entry(engine: &Engine, key: &str, variant: &str, negative: bool) -> Option<Value> {
    let mut segments = vec![PALETTE, key];
    if negative {
        segments.push(CONTRAST);
    }
    segments.push(variant);
    path::resolve_segments(engine.theme(), segments).cloned()
}

fn readable(name: &str, raw: &str) -> MinerResult<Value> {
    let parsed = color::parse_color(raw).map_err(|e| MinerError::mixin(name, e))?;
    Ok(Value::String(color::readable_on(parsed).to_string()))
}

fn paint_with(
    name: &str,
    engine: &Engine,
    props: &PropertyBag,
    value: Value,
    negative: bool,
) -> MinerResult<Value> {
    if let Some(raw) = flags(engine, props).color {
        return if negative {
            readable(name, raw)
        } else {
            Ok(Value::String(raw.to_string()))
        };
    }

    if !negative {
        return Ok(value);
    }

    let active = engine.active(props);
    let entry = active.get(PALETTE).and_then(|selection| {
        let variant = selection.variant.as_deref()?;
        palette_entry(engine, &selection.key, variant, true)
    });
    Ok(entry.unwrap_or(value))
}

/// Paint a background: the value itself, its contrast when `$negative`, or `$color`.
pub fn paint(engine: &Engine, props: &PropertyBag, value: Value, _args: &[Value]) -> MinerResult<Value> {
    let negative = flags(engine, props).negative;
    paint_with("paint", engine, props, value, negative)
}

/// Paint a foreground: [`paint`] with `$negative` inverted.
pub fn paint_fg(
    engine: &Engine,
    props: &PropertyBag,
    value: Value,
    _args: &[Value],
) -> MinerResult<Value> {
    let negative = !flags(engine, props).negative;
    paint_with("paint_fg", engine, props, value, negative)
}

fn shift(
    name: &str,
    engine: &Engine,
    props: &PropertyBag,
    value: Value,
    diff: i64,
    darken: bool,
) -> MinerResult<Value> {
    let Flags { color: raw, negative } = flags(engine, props);

    if let Some(raw) = raw {
        if negative {
            return readable(name, raw);
        }
        let parsed = color::parse_color(raw).map_err(|e| MinerError::mixin(name, e))?;
        let amount = 10.0 * diff.unsigned_abs() as f32;
        let shifted = if darken {
            color::darken(parsed, amount)
        } else {
            color::lighten(parsed, amount)
        };
        return Ok(Value::String(color::to_hex(shifted)));
    }

    let active = engine.active(props);
    let Some(selection) = active.get(PALETTE) else {
        return Ok(value);
    };
    let Some(variant) = selection.variant.as_deref() else {
        return Ok(value);
    };

    let next = engine.closest(PALETTE, variant, diff, true)?;
    match palette_entry(engine, &selection.key, &next, negative) {
        Some(entry) => Ok(entry),
        None => {
            log::trace!("No palette entry {}.{} for {}", selection.key, next, name);
            Ok(value)
        }
    }
}

fn diff_arg(args: &[Value], default: i64) -> i64 {
    args.first().and_then(Value::as_i64).unwrap_or(default)
}

/// Color for a pressed state: `diff` shades along the palette (default `1`),
/// or a raw `$color` darkened by `10 * |diff|` percent.
pub fn as_active(
    engine: &Engine,
    props: &PropertyBag,
    value: Value,
    args: &[Value],
) -> MinerResult<Value> {
    shift("as_active", engine, props, value, diff_arg(args, 1), true)
}

/// Color for a hovered state: `diff` shades along the palette (default `-1`),
/// or a raw `$color` lightened by `10 * |diff|` percent.
pub fn as_hover(
    engine: &Engine,
    props: &PropertyBag,
    value: Value,
    args: &[Value],
) -> MinerResult<Value> {
    shift("as_hover", engine, props, value, diff_arg(args, -1), false)
}
