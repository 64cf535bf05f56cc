//! Structural diff computation
//!
//! [`find_differences`] is the one comparison routine; every collection
//! and every scalar list goes through it, so the added/modified/removed
//! rules cannot drift between entity kinds.

use crate::diff::model::{CollectionDiff, Comparison};
use crate::errors::Result;
use crate::model::{collection_from_entities, Collection, Entity, EntityKind, Snapshot};

/// Compare two collections by name
///
/// Names only in `new` are added, names only in `old` are removed, and
/// names in both whose records are not equal are modified (new value
/// kept). Equal records appear nowhere.
pub fn find_differences<T: Entity>(old: &Collection<T>, new: &Collection<T>) -> CollectionDiff<T> {
    let mut diff = CollectionDiff::new();
    for (name, new_entity) in new {
        match old.get(name) {
            None => {
                diff.added.insert(name.clone(), new_entity.clone());
            }
            Some(old_entity) if old_entity != new_entity => {
                diff.modified.insert(name.clone(), new_entity.clone());
            }
            Some(_) => {}
        }
    }
    for (name, old_entity) in old {
        if !new.contains_key(name) {
            diff.removed.insert(name.clone(), old_entity.clone());
        }
    }
    diff
}

/// Compare two scalar lists as sets
///
/// Each string is its own key, so nothing is ever modified. Returns the
/// added members in `new` order and the removed ones in `old` order.
///
/// # Errors
///
/// Returns `DuplicateName` if either list repeats a member.
pub fn find_list_differences(
    kind: EntityKind,
    old: &[String],
    new: &[String],
) -> Result<(Vec<String>, Vec<String>)> {
    let old_set = collection_from_entities(kind, old.iter().cloned())?;
    let new_set = collection_from_entities(kind, new.iter().cloned())?;
    let diff = find_differences(&old_set, &new_set);

    let added = new
        .iter()
        .filter(|m| diff.added.contains_key(*m))
        .cloned()
        .collect();
    let removed = old
        .iter()
        .filter(|m| diff.removed.contains_key(*m))
        .cloned()
        .collect();
    Ok((added, removed))
}

/// Whole-record comparison of a singleton
///
/// A missing new record means "unmanaged" and is never a change.
fn singleton_change<T: Clone + PartialEq>(old: &Option<T>, new: &Option<T>) -> Option<T> {
    match (old, new) {
        (_, None) => None,
        (Some(o), Some(n)) if o == n => None,
        (_, Some(n)) => Some(n.clone()),
    }
}

macro_rules! diff_collections {
    ($old:expr, $new:expr, $cmp:expr, $($field:ident),* $(,)?) => {
        $(
            let d = find_differences(&$old.$field, &$new.$field);
            $cmp.added.$field = d.added;
            $cmp.modified.$field = d.modified;
            $cmp.removed.$field = d.removed;
        )*
    };
}

/// Compute the [`Comparison`] between an old and a new snapshot
///
/// Both snapshots are checked for identity ambiguity first. The cluster
/// environment is ignored.
///
/// # Errors
///
/// Returns `NameMismatch` or `DuplicateName` if either snapshot has
/// ambiguous identities.
///
/// ```
/// use gridconf_core::diff::compare;
/// use gridconf_core::model::Snapshot;
///
/// let live = Snapshot { managers: vec!["root".into()], ..Default::default() };
/// let cmp = compare(&Snapshot::empty(), &live).unwrap();
/// assert_eq!(cmp.added.managers, vec!["root".to_string()]);
/// assert!(!cmp.is_same);
/// ```
pub fn compare(old: &Snapshot, new: &Snapshot) -> Result<Comparison> {
    old.validate_identity()?;
    new.validate_identity()?;

    let mut cmp = Comparison {
        added: Snapshot::empty(),
        modified: Snapshot::empty(),
        removed: Snapshot::empty(),
        is_same: false,
        global_config_changed: false,
        scheduler_config_changed: false,
    };

    diff_collections!(
        old,
        new,
        cmp,
        calendars,
        complex_entries,
        ckpt_interfaces,
        host_configurations,
        exec_hosts,
        host_groups,
        resource_quota_sets,
        parallel_environments,
        projects,
        users,
        cluster_queues,
        user_set_lists,
    );

    let lists = [
        (EntityKind::AdminHost, &old.admin_hosts, &new.admin_hosts),
        (EntityKind::SubmitHost, &old.submit_hosts, &new.submit_hosts),
        (EntityKind::Manager, &old.managers, &new.managers),
        (EntityKind::Operator, &old.operators, &new.operators),
    ];
    for (kind, old_list, new_list) in lists {
        let (added, removed) = find_list_differences(kind, old_list, new_list)?;
        let (added_slot, removed_slot) = match kind {
            EntityKind::AdminHost => (&mut cmp.added.admin_hosts, &mut cmp.removed.admin_hosts),
            EntityKind::SubmitHost => (&mut cmp.added.submit_hosts, &mut cmp.removed.submit_hosts),
            EntityKind::Manager => (&mut cmp.added.managers, &mut cmp.removed.managers),
            _ => (&mut cmp.added.operators, &mut cmp.removed.operators),
        };
        *added_slot = added;
        *removed_slot = removed;
    }

    cmp.modified.global_config = singleton_change(&old.global_config, &new.global_config);
    cmp.global_config_changed = cmp.modified.global_config.is_some();
    cmp.modified.scheduler_config =
        singleton_change(&old.scheduler_config, &new.scheduler_config);
    cmp.scheduler_config_changed = cmp.modified.scheduler_config.is_some();

    cmp.is_same = cmp.added.is_empty() && cmp.modified.is_empty() && cmp.removed.is_empty();

    let counts = cmp.counts();
    tracing::debug!(
        added_len = counts.added,
        modified_len = counts.modified,
        removed_len = counts.removed,
        is_same = cmp.is_same,
        global_config_changed = cmp.global_config_changed,
        "snapshots compared"
    );

    Ok(cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComplexEntryConfig, GlobalConfig};

    fn complex(name: &str, urgency: i64) -> ComplexEntryConfig {
        ComplexEntryConfig {
            name: name.to_string(),
            value_type: "INT".to_string(),
            urgency,
            ..Default::default()
        }
    }

    fn complexes(entries: &[ComplexEntryConfig]) -> Collection<ComplexEntryConfig> {
        entries
            .iter()
            .map(|c| (c.name.clone(), c.clone()))
            .collect()
    }

    #[test]
    fn test_find_differences_partitions_names() {
        let old = complexes(&[complex("c1", 0), complex("c2", 0), complex("c4", 1)]);
        let new = complexes(&[complex("c1", 0), complex("c3", 0), complex("c4", 5)]);
        let d = find_differences(&old, &new);
        assert_eq!(d.added.keys().collect::<Vec<_>>(), vec!["c3"]);
        assert_eq!(d.removed.keys().collect::<Vec<_>>(), vec!["c2"]);
        assert_eq!(d.modified.keys().collect::<Vec<_>>(), vec!["c4"]);
        assert_eq!(d.modified["c4"].urgency, 5, "modified keeps the new value");
    }

    #[test]
    fn test_list_differences_keep_order() {
        let old = vec!["b".to_string(), "a".to_string(), "x".to_string()];
        let new = vec!["z".to_string(), "a".to_string(), "y".to_string(), "b".to_string()];
        let (added, removed) = find_list_differences(EntityKind::AdminHost, &old, &new).unwrap();
        assert_eq!(added, vec!["z".to_string(), "y".to_string()]);
        assert_eq!(removed, vec!["x".to_string()]);
    }

    #[test]
    fn test_list_reordering_is_not_a_change() {
        let old = Snapshot {
            operators: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let new = Snapshot {
            operators: vec!["b".into(), "a".into()],
            ..Default::default()
        };
        assert!(compare(&old, &new).unwrap().is_same);
    }

    #[test]
    fn test_singleton_rules() {
        let g1 = GlobalConfig {
            mailer: "/bin/mail".into(),
            ..Default::default()
        };
        let g2 = GlobalConfig {
            mailer: "/usr/bin/mailx".into(),
            ..Default::default()
        };
        assert_eq!(singleton_change(&Some(g1.clone()), &None), None);
        assert_eq!(singleton_change(&Some(g1.clone()), &Some(g1.clone())), None);
        assert_eq!(singleton_change(&Some(g1.clone()), &Some(g2.clone())), Some(g2.clone()));
        assert_eq!(singleton_change(&None, &Some(g1.clone())), Some(g1));
    }

    #[test]
    fn test_global_change_sets_flag_and_whole_record() {
        let old = Snapshot {
            global_config: Some(GlobalConfig {
                max_jobs: 10,
                mailer: "/bin/mail".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut new = old.clone();
        if let Some(g) = new.global_config.as_mut() {
            g.max_jobs = 20;
        }
        let cmp = compare(&old, &new).unwrap();
        assert!(cmp.global_config_changed);
        assert!(!cmp.scheduler_config_changed);
        assert!(!cmp.is_same);
        assert_eq!(cmp.modified.global_config, new.global_config);
        assert_eq!(cmp.changed_kinds(), vec![EntityKind::GlobalConfig]);
    }
}
