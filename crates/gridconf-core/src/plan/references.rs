//! Declared cross-entity references
//!
//! Each [`Reference`] says "records of kind `referrer` name a `target` in
//! attribute `field`". The planner walks this table before every delete;
//! the in-memory cluster uses it to refuse deletes of referenced entities.
//!
//! Besides `hostlist`, a queue refers to a host group through every
//! override clause scoped by it (`slots 1,[@gpu=8]`). Those edges are
//! derived from the queue attribute list rather than spelled out.

use crate::codec::override_list::{split_override, NONE};
use crate::model::queue::QUEUE_LIST_ATTRIBUTES;
use crate::model::{EntityKind, EntityRecord};

/// How a referrer's field names its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    /// The target name appears as a token, plainly or as an override value
    Name,
    /// Only override clauses scoped by the target refer to it
    OverrideScope,
}

/// One `target ← referrer.field` edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Kind being referenced
    pub target: EntityKind,
    /// Kind holding the reference
    pub referrer: EntityKind,
    /// Attribute of the referrer that carries the name
    pub field: &'static str,
    pub matching: Matching,
}

const fn reference(target: EntityKind, referrer: EntityKind, field: &'static str) -> Reference {
    Reference {
        target,
        referrer,
        field,
        matching: Matching::Name,
    }
}

/// The complete reference relation
pub const REFERENCES: &[Reference] = &[
    reference(EntityKind::ParallelEnvironment, EntityKind::ClusterQueue, "pe_list"),
    reference(EntityKind::CkptInterface, EntityKind::ClusterQueue, "ckpt_list"),
    reference(EntityKind::Calendar, EntityKind::ClusterQueue, "calendar"),
    reference(EntityKind::UserSetList, EntityKind::ClusterQueue, "user_lists"),
    reference(EntityKind::UserSetList, EntityKind::ClusterQueue, "xuser_lists"),
    reference(EntityKind::UserSetList, EntityKind::ParallelEnvironment, "user_lists"),
    reference(EntityKind::UserSetList, EntityKind::ParallelEnvironment, "xuser_lists"),
    reference(EntityKind::UserSetList, EntityKind::ExecHost, "user_lists"),
    reference(EntityKind::UserSetList, EntityKind::ExecHost, "xuser_lists"),
    reference(EntityKind::UserSetList, EntityKind::Project, "acl"),
    reference(EntityKind::UserSetList, EntityKind::Project, "xacl"),
    reference(EntityKind::Project, EntityKind::ClusterQueue, "projects"),
    reference(EntityKind::Project, EntityKind::ClusterQueue, "xprojects"),
    reference(EntityKind::Project, EntityKind::ExecHost, "projects"),
    reference(EntityKind::Project, EntityKind::ExecHost, "xprojects"),
    reference(EntityKind::Project, EntityKind::User, "default_project"),
    reference(EntityKind::HostGroup, EntityKind::ClusterQueue, "hostlist"),
    reference(EntityKind::HostGroup, EntityKind::HostGroup, "hostlist"),
];

/// Host-group-scoped override clauses on every queue list attribute
static HOST_GROUP_OVERRIDES: [Reference; QUEUE_LIST_ATTRIBUTES.len()] = host_group_overrides();

const fn host_group_overrides() -> [Reference; QUEUE_LIST_ATTRIBUTES.len()] {
    let mut out = [Reference {
        target: EntityKind::HostGroup,
        referrer: EntityKind::ClusterQueue,
        field: "",
        matching: Matching::OverrideScope,
    }; QUEUE_LIST_ATTRIBUTES.len()];
    let mut i = 0;
    while i < QUEUE_LIST_ATTRIBUTES.len() {
        out[i].field = QUEUE_LIST_ATTRIBUTES[i];
        i += 1;
    }
    out
}

/// The declared table followed by the derived override edges
pub fn all_references() -> impl Iterator<Item = &'static Reference> {
    REFERENCES.iter().chain(HOST_GROUP_OVERRIDES.iter())
}

/// All references that point at `target`, declared ones first
pub fn references_to(target: EntityKind) -> impl Iterator<Item = &'static Reference> {
    all_references().filter(move |r| r.target == target)
}

/// Kinds that may hold a reference to `target`, deduplicated, in table order
pub fn referrer_kinds(target: EntityKind) -> Vec<EntityKind> {
    let mut kinds = Vec::new();
    for r in references_to(target) {
        if !kinds.contains(&r.referrer) {
            kinds.push(r.referrer);
        }
    }
    kinds
}

enum FieldMut<'a> {
    List(&'a mut Vec<String>),
    Scalar(&'a mut String),
}

fn field_mut<'a>(record: &'a mut EntityRecord, field: &str) -> Option<FieldMut<'a>> {
    match record {
        EntityRecord::ClusterQueue(q) => q.list_attribute_mut(field).map(FieldMut::List),
        EntityRecord::ExecHost(h) => h.list_attribute_mut(field).map(FieldMut::List),
        EntityRecord::ParallelEnvironment(pe) => match field {
            "user_lists" => Some(FieldMut::List(&mut pe.user_lists)),
            "xuser_lists" => Some(FieldMut::List(&mut pe.xuser_lists)),
            _ => None,
        },
        EntityRecord::Project(p) => match field {
            "acl" => Some(FieldMut::List(&mut p.acl)),
            "xacl" => Some(FieldMut::List(&mut p.xacl)),
            _ => None,
        },
        EntityRecord::HostGroup(g) if field == "hostlist" => Some(FieldMut::List(&mut g.hostlist)),
        EntityRecord::User(u) if field == "default_project" => {
            Some(FieldMut::Scalar(&mut u.default_project))
        }
        _ => None,
    }
}

/// Remove `token` from a token list, looking inside override clauses too
///
/// An override scoped by `token` itself, or left with no values, is
/// dropped. Returns whether anything changed.
fn strip_token(list: &mut Vec<String>, token: &str) -> bool {
    let mut changed = false;
    let mut kept = Vec::with_capacity(list.len());
    for item in list.drain(..) {
        if item == token {
            changed = true;
            continue;
        }
        if let Some((scope, values)) = split_override(&item) {
            if scope == token {
                changed = true;
                continue;
            }
            if values.contains(&token) {
                changed = true;
                let rest: Vec<&str> = values.into_iter().filter(|v| *v != token).collect();
                if !rest.is_empty() {
                    let sep = if item.contains(char::is_whitespace) { " " } else { "," };
                    kept.push(format!("[{}={}]", scope, rest.join(sep)));
                }
                continue;
            }
        }
        kept.push(item);
    }
    *list = kept;
    changed
}

/// Drop the override clauses scoped by `scope`, leaving plain tokens alone
fn strip_scope(list: &mut Vec<String>, scope: &str) -> bool {
    let before = list.len();
    list.retain(|item| !matches!(split_override(item), Some((s, _)) if s == scope));
    list.len() != before
}

/// Strip every occurrence of `target_name` from the referencing field
///
/// Host groups are always named with a leading `@`; any other name in a
/// host list is a host, so it never matches a host-group target.
///
/// Returns `false` when the record does not hold the reference (or is not
/// of the referrer kind).
pub fn strip_reference(record: &mut EntityRecord, reference: &Reference, target_name: &str) -> bool {
    if reference.target == EntityKind::HostGroup && !target_name.starts_with('@') {
        return false;
    }
    match (reference.matching, field_mut(record, reference.field)) {
        (Matching::Name, Some(FieldMut::List(list))) => strip_token(list, target_name),
        (Matching::OverrideScope, Some(FieldMut::List(list))) => strip_scope(list, target_name),
        (Matching::Name, Some(FieldMut::Scalar(value))) if value.as_str() == target_name => {
            *value = NONE.to_string();
            true
        }
        _ => false,
    }
}

/// True if `record` names `target_name` through `reference`
pub fn holds_reference(record: &EntityRecord, reference: &Reference, target_name: &str) -> bool {
    strip_reference(&mut record.clone(), reference, target_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClusterQueueConfig, HostGroupConfig, UserConfig};

    fn queue_with_pes(pes: &[&str]) -> EntityRecord {
        let mut q = ClusterQueueConfig::new("all.q");
        q.pe_list = pes.iter().map(|s| s.to_string()).collect();
        EntityRecord::ClusterQueue(q)
    }

    fn pe_ref() -> &'static Reference {
        references_to(EntityKind::ParallelEnvironment)
            .next()
            .expect("pe reference declared")
    }

    #[test]
    fn test_every_reference_points_backwards_in_apply_order() {
        let pos = |k: EntityKind| EntityKind::APPLY_ORDER.iter().position(|x| *x == k);
        for r in all_references() {
            if r.target != r.referrer {
                assert!(
                    pos(r.target) < pos(r.referrer),
                    "{} must be applied before {}",
                    r.target,
                    r.referrer
                );
            }
        }
    }

    #[test]
    fn test_every_reference_field_resolves() {
        for r in all_references() {
            let mut record = match r.referrer {
                EntityKind::ClusterQueue => EntityRecord::ClusterQueue(ClusterQueueConfig::default()),
                EntityKind::ExecHost => EntityRecord::ExecHost(Default::default()),
                EntityKind::ParallelEnvironment => EntityRecord::ParallelEnvironment(Default::default()),
                EntityKind::Project => EntityRecord::Project(Default::default()),
                EntityKind::HostGroup => EntityRecord::HostGroup(Default::default()),
                EntityKind::User => EntityRecord::User(Default::default()),
                other => panic!("unexpected referrer {}", other),
            };
            assert!(field_mut(&mut record, r.field).is_some(), "{}.{}", r.referrer, r.field);
        }
    }

    #[test]
    fn test_strip_plain_token() {
        let mut q = queue_with_pes(&["mpi", "smp"]);
        assert!(strip_reference(&mut q, pe_ref(), "mpi"));
        let EntityRecord::ClusterQueue(q) = q else { panic!("queue") };
        assert_eq!(q.pe_list, vec!["smp".to_string()]);
    }

    #[test]
    fn test_strip_inside_overrides() {
        let mut q = queue_with_pes(&["make", "[@hg=mpi smp]", "[node1=mpi]"]);
        assert!(strip_reference(&mut q, pe_ref(), "mpi"));
        let EntityRecord::ClusterQueue(q) = q else { panic!("queue") };
        assert_eq!(q.pe_list, vec!["make".to_string(), "[@hg=smp]".to_string()]);
    }

    #[test]
    fn test_unreferenced_record_is_untouched() {
        let q = queue_with_pes(&["smp"]);
        assert!(!holds_reference(&q, pe_ref(), "mpi"));
        assert!(holds_reference(&q, pe_ref(), "smp"));
    }

    #[test]
    fn test_nested_host_group_reference() {
        let r = references_to(EntityKind::HostGroup)
            .find(|r| r.referrer == EntityKind::HostGroup)
            .expect("nested host group reference");
        let mut g = EntityRecord::HostGroup(HostGroupConfig {
            name: "@all".into(),
            hostlist: vec!["@gpu".into(), "node1".into()],
        });
        assert!(!holds_reference(&g, r, "node1"));
        assert!(strip_reference(&mut g, r, "@gpu"));
        let EntityRecord::HostGroup(g) = g else { panic!("host group") };
        assert_eq!(g.hostlist, vec!["node1".to_string()]);
    }

    #[test]
    fn test_host_group_overrides_are_stripped_from_every_queue_attribute() {
        let mut q = ClusterQueueConfig::new("all.q");
        q.hostlist = vec!["@gpu".into(), "n1".into()];
        q.slots = vec!["1".into(), "[@gpu=8]".into(), "[n1=2]".into()];
        q.pe_list = vec!["make".into(), "[@gpu=mpi]".into()];
        let mut record = EntityRecord::ClusterQueue(q);

        let touched: Vec<&str> = references_to(EntityKind::HostGroup)
            .filter(|r| r.referrer == EntityKind::ClusterQueue)
            .filter(|r| strip_reference(&mut record, r, "@gpu"))
            .map(|r| r.field)
            .collect();

        assert_eq!(touched, vec!["hostlist", "pe_list", "slots"]);
        let EntityRecord::ClusterQueue(q) = record else { panic!("queue") };
        assert_eq!(q.hostlist, vec!["n1".to_string()]);
        assert_eq!(q.slots, vec!["1".to_string(), "[n1=2]".to_string()]);
        assert_eq!(q.pe_list, vec!["make".to_string()]);
    }

    #[test]
    fn test_override_scope_keeps_plain_tokens() {
        let r = references_to(EntityKind::HostGroup)
            .find(|r| r.matching == Matching::OverrideScope && r.field == "pe_list")
            .expect("pe_list override edge");
        let q = queue_with_pes(&["@gpu", "[@cpu=@gpu]"]);
        assert!(!holds_reference(&q, r, "@gpu"));
    }

    #[test]
    fn test_host_names_never_match_host_group_targets() {
        let mut q = ClusterQueueConfig::new("all.q");
        q.hostlist = vec!["node1".into()];
        q.slots = vec!["[node1=4]".into()];
        let q = EntityRecord::ClusterQueue(q);
        assert!(!references_to(EntityKind::HostGroup).any(|r| holds_reference(&q, r, "node1")));
    }

    #[test]
    fn test_default_project_reset_to_none() {
        let r = references_to(EntityKind::Project)
            .find(|r| r.referrer == EntityKind::User)
            .expect("user reference");
        let mut u = EntityRecord::User(UserConfig {
            name: "alice".into(),
            default_project: "physics".into(),
            ..Default::default()
        });
        assert!(strip_reference(&mut u, r, "physics"));
        let EntityRecord::User(u) = u else { panic!("user") };
        assert_eq!(u.default_project, "NONE");
    }

    #[test]
    fn test_referrer_kinds_are_deduplicated() {
        assert_eq!(
            referrer_kinds(EntityKind::UserSetList),
            vec![
                EntityKind::ClusterQueue,
                EntityKind::ParallelEnvironment,
                EntityKind::ExecHost,
                EntityKind::Project
            ]
        );
    }
}
