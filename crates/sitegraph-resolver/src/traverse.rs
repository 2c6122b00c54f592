//! Post-order traversal of payload trees.

use serde_json::Value;
use sitegraph_core::{ModelName, content::model_name_of};

/// Shape of a payload node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Object tagged with a registered content type.
    Content(ModelName),
    /// Any other object, including objects tagged with unregistered types.
    Record,
    /// Array.
    Collection,
    /// Null, boolean, number or string.
    Scalar,
}

impl Node {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => model_name_of(value)
                .and_then(|name| name.parse().ok())
                .map_or(Self::Record, Self::Content),
            Value::Array(_) => Self::Collection,
            _ => Self::Scalar,
        }
    }
}

/// Rebuild `value` bottom-up, handing every node to `visit` after its
/// children have been visited.
///
/// `visit` receives the key path of the node (object keys and array
/// indices), used for diagnostics.
pub fn map_post_order<F>(value: Value, visit: &mut F) -> Value
where
    F: FnMut(Value, Node, &[String]) -> Value,
{
    let mut key_path = Vec::new();
    walk(value, &mut key_path, visit)
}

fn walk<F>(value: Value, key_path: &mut Vec<String>, visit: &mut F) -> Value
where
    F: FnMut(Value, Node, &[String]) -> Value,
{
    let value = match value {
        Value::Array(items) => {
            let mut mapped = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                key_path.push(i.to_string());
                mapped.push(walk(item, key_path, visit));
                key_path.pop();
            }
            Value::Array(mapped)
        }
        Value::Object(map) => {
            let mut mapped = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                key_path.push(key.clone());
                let item = walk(item, key_path, visit);
                key_path.pop();
                mapped.insert(key, item);
            }
            Value::Object(mapped)
        }
        scalar => scalar,
    };

    let node = Node::of(&value);
    visit(value, node, key_path)
}
