//! Which script nodes get documented.

use crate::facts::{Access, NodeFacts, SpawnerKind};

/// Node classes never documented.
pub const EXCLUDED_NODE_CLASSES: [&str; 3] = ["K2Node_DynamicCast", "K2Node_Message", "AnimGraphNode_Base"];

/// Function metadata that excludes a node.
pub const EXCLUDED_FUNCTION_META: &str = "BlueprintAutocast";

fn is_excluded_node_class(node_class: &str) -> bool {
    EXCLUDED_NODE_CLASSES.contains(&node_class) || node_class.starts_with("AnimGraphNode_")
}

/// Why `node` is not documented, or `None` when it is.
///
/// `in_blueprint` is set when the node comes from a script asset rather than
/// native code; event nodes are skipped there.
pub fn rejection_reason(node: &NodeFacts, in_blueprint: bool) -> Option<&'static str> {
    match node.spawner {
        SpawnerKind::Variable => return Some("variable spawner"),
        SpawnerKind::Delegate => return Some("delegate spawner"),
        SpawnerKind::Bound => return Some("bound spawner"),
        SpawnerKind::Component => return Some("component spawner"),
        SpawnerKind::Event if in_blueprint => return Some("event spawner in a blueprint context"),
        _ => {}
    }

    if is_excluded_node_class(&node.node_class) {
        return Some("excluded node class");
    }

    if let Some(function) = &node.function {
        if function.access == Access::Private && !function.blueprint_event {
            return Some("function is not public or protected");
        }
        if function.autocast {
            return Some("function carries BlueprintAutocast metadata");
        }
    }
    None
}

pub fn is_node_documentable(node: &NodeFacts, in_blueprint: bool) -> bool {
    rejection_reason(node, in_blueprint).is_none()
}
