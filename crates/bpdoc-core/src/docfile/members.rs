//! Field and event sections shared by class and struct documents.

use crate::comment::generate_doxygen_node;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::facts::MemberFacts;
use crate::text::{bool_str, description_or_empty, display_name_or, name_to_display_string, type_signature};
use crate::tree::DocTreeNode;
use tracing::debug;

/// Which member section of a type document is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSection {
    Fields,
    Events,
}

impl MemberSection {
    fn list_name(self) -> &'static str {
        match self {
            MemberSection::Fields => "fields",
            MemberSection::Events => "events",
        }
    }

    fn item_name(self) -> &'static str {
        match self {
            MemberSection::Fields => "field",
            MemberSection::Events => "event",
        }
    }
}

/// The type whose document receives the members.
#[derive(Debug, Clone, Copy)]
pub struct MemberHost<'a> {
    pub id: &'a str,
    /// Label used in missing-description warnings.
    pub context: &'a str,
}

/// Script visible, editable without being read-only, or deprecated.
pub fn is_member_visible(member: &MemberFacts) -> bool {
    member.blueprint_visible || is_editable(member) || member.deprecated
}

fn is_editable(member: &MemberFacts) -> bool {
    member.editable && !member.edit_const
}

pub fn blueprint_access(member: &MemberFacts) -> Option<&'static str> {
    if !member.blueprint_visible {
        return None;
    }
    Some(if member.blueprint_read_only {
        "Read Only"
    } else {
        "Read/Write"
    })
}

pub fn editor_access(member: &MemberFacts) -> Option<&'static str> {
    if !is_editable(member) {
        return None;
    }
    let on_template = !member.disable_edit_on_template;
    let on_instance = !member.disable_edit_on_instance;
    match (on_template, on_instance) {
        (false, false) => None,
        (_, false) => Some("Defaults Only"),
        (false, true) => Some("Instance Only"),
        (true, true) => Some("Anywhere"),
    }
}

/// Display name of a member; boolean members lose their `b` prefix.
pub fn member_display_name(member: &MemberFacts) -> String {
    if member.display_name.trim().is_empty() {
        name_to_display_string(&member.name, member.type_name == "bool")
    } else {
        member.display_name.clone()
    }
}

pub fn member_type(member: &MemberFacts) -> String {
    type_signature(&member.type_name, member.const_param, member.reference_param)
}

/// Append every visible member to `section` of `tree`.
///
/// Returns whether at least one visible member is declared on `host` itself.
pub fn generate_members(
    tree: &mut DocTreeNode,
    section: MemberSection,
    members: &[MemberFacts],
    host: MemberHost<'_>,
    diag: &mut Diagnostics,
) -> bool {
    let mut has_own = false;

    for member in members.iter().filter(|m| is_member_visible(m)) {
        let owner = member.owner.as_ref().filter(|o| o.id != host.id);
        let inherited = owner.is_some();
        debug!(
            host = host.id,
            member = %member.name,
            inherited,
            "member found"
        );
        has_own |= !inherited;

        let list = tree.child_or_insert(section.list_name());
        let item = list.append_child(section.item_name());
        item.append_child_with_value_escaped("name", member.name.as_str());
        item.append_child_with_value_escaped("display_name", member_display_name(member));
        item.append_child_with_value_escaped("type", member_type(member));
        item.append_child_with_value("inherited", bool_str(inherited));
        item.append_child_with_value_escaped("category", member.category.as_str());
        if section == MemberSection::Events {
            item.append_child_with_value_escaped("signature", member.signature.as_str());
        }

        if let Some(owner) = owner {
            let from = item.append_child("inheritedFrom");
            from.append_child_with_value_escaped("id", owner.id.as_str());
            from.append_child_with_value_escaped(
                "display_name",
                display_name_or(&owner.display_name, &owner.id),
            );
        }

        if let Some(access) = blueprint_access(member) {
            item.append_child_with_value("blueprint_access", access);
        }
        if let Some(access) = editor_access(member) {
            item.append_child_with_value("editor_access", access);
        }
        if member.deprecated {
            item.append_child_with_value_escaped("deprecated", member.deprecation_message.as_str());
        }

        item.append_child_with_value_escaped(
            "description",
            description_or_empty(&member.description, &member.name),
        );

        let has_comment = generate_doxygen_node(&member.comment, item);
        if !inherited && !has_comment {
            diag.warn(
                WarningKind::MissingDescription,
                format!(
                    "No description for {} (IsPublic {}): {}::{}",
                    host.context,
                    u8::from(member.public),
                    host.id,
                    member.name
                ),
            );
        }
    }

    has_own
}
