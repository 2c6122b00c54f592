//! Reference resolution.
//!
//! A reference is a string field holding another object's id. Resolution
//! swaps the id for the referenced object, `__metadata` included. Only
//! string values are looked up, so resolving an already-resolved object
//! leaves it untouched.

use serde_json::Value;
use sitegraph_core::ContentGraph;
use tracing::debug;

/// Resolve every dotted field path (`author`, `posts.author`) in `value`.
///
/// Arrays are resolved element by element at every level. Ids missing from
/// the graph stay as they are.
pub fn resolve_references(value: Value, field_paths: &[&str], graph: &ContentGraph) -> Value {
    field_paths.iter().fold(value, |value, field_path| {
        let segments: Vec<&str> = field_path.split('.').filter(|s| !s.is_empty()).collect();
        resolve_field(value, &segments, field_path, graph)
    })
}

fn resolve_field(value: Value, segments: &[&str], field_path: &str, graph: &ContentGraph) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| resolve_field(item, segments, field_path, graph))
                .collect(),
        ),
        Value::Object(mut map) => {
            let Some((field, rest)) = segments.split_first() else {
                return Value::Object(map);
            };
            if let Some(slot) = map.get_mut(*field) {
                let resolved = materialize(slot.take(), field_path, graph);
                *slot = if rest.is_empty() {
                    resolved
                } else {
                    resolve_field(resolved, rest, field_path, graph)
                };
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Replace an id, or an array of ids, with the referenced objects.
fn materialize(value: Value, field_path: &str, graph: &ContentGraph) -> Value {
    match value {
        Value::String(id) => match graph.object(&id) {
            Some(object) => object.to_value(),
            None => {
                debug!(field_path, id = %id, "reference target not found, leaving id in place");
                Value::String(id)
            }
        },
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(_) => materialize(item, field_path, graph),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}
