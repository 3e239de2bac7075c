//! Border outline for spotting component bounds.

use serde_json::Value;
use tminer_engine::engine::Engine;
use tminer_engine::error::MinerResult;
use tminer_engine::properties::PropertyBag;
use tminer_engine::value;

/// Emit a `border: <width>px <style> <color>;` declaration.
///
/// The first argument is an optional options object with `width` (default `2`),
/// `style` (default `solid`), `color` (default `red`) and `use_props`. With
/// `use_props` the border only shows when the `$debug` property is set.
pub fn debug(engine: &Engine, props: &PropertyBag, _value: Value, args: &[Value]) -> MinerResult<Value> {
    let options = args.first();
    let field = |name: &str| options.and_then(|o| o.get(name));

    let use_props = field("use_props").map_or(false, value::truthy);
    if use_props && !value::is_set(props.get(&engine.options().key("debug"))) {
        return Ok(Value::String(String::new()));
    }

    let width = field("width")
        .and_then(value::as_number)
        .map_or(Value::from(2), value::number);
    let style = field("style").and_then(Value::as_str).unwrap_or("solid");
    let color = field("color").and_then(Value::as_str).unwrap_or("red");

    Ok(Value::String(format!("border: {}px {} {};", width, style, color)))
}
