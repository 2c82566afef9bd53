//! JSON serializer: structured output for tooling integration.
//!
//! Leaves become strings and branches become objects. Sibling names that
//! repeat are gathered into an array under that name, so `fields` holding
//! several `field` children encodes as `{"field": [{..}, {..}]}`.

use crate::error::{DocGenError, Result};
use crate::serialize::Serializer;
use crate::tree::DocValue;
use serde_json::{Map, Value};

pub struct JsonSerializer {
    /// Open branches, innermost last. Each holds its children in visit order.
    stack: Vec<Vec<(String, Value)>>,
    result: Option<Value>,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            result: None,
        }
    }

    fn push_member(&mut self, name: &str, value: Value) {
        match self.stack.last_mut() {
            Some(frame) => frame.push((name.to_string(), value)),
            None => {
                let mut top = Map::new();
                top.insert(name.to_string(), value);
                self.result = Some(Value::Object(top));
            }
        }
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold visited children into an object, grouping repeated names.
fn into_object(members: Vec<(String, Value)>) -> Value {
    let mut counts: Map<String, Value> = Map::new();
    for (name, _) in &members {
        let n = counts.get(name).and_then(Value::as_u64).unwrap_or(0);
        counts.insert(name.clone(), Value::from(n + 1));
    }

    let mut object = Map::new();
    for (name, value) in members {
        let repeated = counts.get(&name).and_then(Value::as_u64).unwrap_or(0) > 1;
        if !repeated {
            object.insert(name, value);
            continue;
        }
        match object.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                object.insert(name, Value::Array(vec![value]));
            }
        }
    }
    Value::Object(object)
}

impl Serializer for JsonSerializer {
    fn open(&mut self, _name: &str) {
        self.stack.push(Vec::new());
    }

    fn leaf(&mut self, name: &str, value: &DocValue) {
        self.push_member(name, Value::String(value.as_str().to_string()));
    }

    fn close(&mut self, name: &str) {
        let members = self.stack.pop().unwrap_or_default();
        let object = into_object(members);
        if self.stack.is_empty() {
            // The document element itself is not wrapped in its own name.
            self.result = Some(object);
        } else {
            self.push_member(name, object);
        }
    }

    fn encode(&self) -> Result<String> {
        let value = self.result.as_ref().ok_or_else(|| DocGenError::Serialize {
            format: "json".into(),
            message: "no document was serialized".into(),
        })?;
        let mut out = serde_json::to_string_pretty(value).map_err(|e| DocGenError::Serialize {
            format: "json".into(),
            message: e.to_string(),
        })?;
        out.push('\n');
        Ok(out)
    }

    fn extension(&self) -> &str {
        "json"
    }
}
