//! The snapshot aggregate
//!
//! A snapshot is a complete point-in-time capture of a cluster's managed
//! state. Its JSON shape is the desired-state file format: one key per
//! singleton record, one object (name → record) per collection, one array
//! per scalar list. Empty collections are omitted on output and `null` is
//! accepted for them on input, so "nil" and "empty" are the same thing.

use super::{
    CalendarConfig, CkptInterfaceConfig, ClusterEnvironment, ClusterQueueConfig,
    ComplexEntryConfig, Entity, EntityKind, EntityRecord, GlobalConfig, HostConfiguration,
    HostExecConfig, HostGroupConfig, ParallelEnvironmentConfig, ProjectConfig,
    ResourceQuotaSetConfig, SchedulerConfig, UserConfig, UserSetListConfig, GLOBAL_CONFIG_NAME,
    SCHEDULER_CONFIG_NAME,
};
use crate::errors::{GridConfError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// A named collection: entity name → record
pub type Collection<T> = BTreeMap<String, T>;

/// Build a collection from records, keyed by each record's own name
///
/// # Errors
///
/// Returns `DuplicateName` if two records share a name.
pub fn collection_from_entities<T, I>(kind: EntityKind, entities: I) -> Result<Collection<T>>
where
    T: Entity,
    I: IntoIterator<Item = T>,
{
    let mut collection = Collection::new();
    for entity in entities {
        let name = entity.name().to_string();
        if collection.contains_key(&name) {
            return Err(GridConfError::DuplicateName { kind, name });
        }
        collection.insert(name, entity);
    }
    Ok(collection)
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Complete administrative state of a cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Installation identity; carried along but never diffed or digested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_environment: Option<ClusterEnvironment>,
    /// `None` means unmanaged: the desired state says nothing about it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_config: Option<GlobalConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler_config: Option<SchedulerConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub calendars: Collection<CalendarConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub complex_entries: Collection<ComplexEntryConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub ckpt_interfaces: Collection<CkptInterfaceConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub host_configurations: Collection<HostConfiguration>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub exec_hosts: Collection<HostExecConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub admin_hosts: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub submit_hosts: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub host_groups: Collection<HostGroupConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub resource_quota_sets: Collection<ResourceQuotaSetConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub managers: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub operators: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub parallel_environments: Collection<ParallelEnvironmentConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub projects: Collection<ProjectConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub users: Collection<UserConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub cluster_queues: Collection<ClusterQueueConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub user_set_lists: Collection<UserSetListConfig>,
}

fn lookup<T: Entity>(
    collection: &Collection<T>,
    name: &str,
    wrap: fn(T) -> EntityRecord,
) -> Option<EntityRecord> {
    collection.get(name).cloned().map(wrap)
}

fn lookup_member(list: &[String], name: &str) -> Option<EntityRecord> {
    list.iter()
        .find(|m| m.as_str() == name)
        .map(|m| EntityRecord::Member(m.clone()))
}

fn remove_member(list: &mut Vec<String>, name: &str) -> bool {
    let before = list.len();
    list.retain(|m| m != name);
    list.len() != before
}

fn check_keys<T: Entity>(kind: EntityKind, collection: &Collection<T>) -> Result<()> {
    for (key, entity) in collection {
        if key != entity.name() {
            return Err(GridConfError::NameMismatch {
                kind,
                key: key.clone(),
                name: entity.name().to_string(),
            });
        }
    }
    Ok(())
}

fn check_unique(kind: EntityKind, list: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for member in list {
        if !seen.insert(member.as_str()) {
            return Err(GridConfError::DuplicateName {
                kind,
                name: member.clone(),
            });
        }
    }
    Ok(())
}

impl Snapshot {
    /// A snapshot with no managed state at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check that every collection key equals its record's name and that
    /// no scalar list repeats a member
    ///
    /// # Errors
    ///
    /// Returns `NameMismatch` or `DuplicateName` for the first violation.
    pub fn validate_identity(&self) -> Result<()> {
        check_keys(EntityKind::Calendar, &self.calendars)?;
        check_keys(EntityKind::ComplexEntry, &self.complex_entries)?;
        check_keys(EntityKind::CkptInterface, &self.ckpt_interfaces)?;
        check_keys(EntityKind::HostConfiguration, &self.host_configurations)?;
        check_keys(EntityKind::ExecHost, &self.exec_hosts)?;
        check_keys(EntityKind::HostGroup, &self.host_groups)?;
        check_keys(EntityKind::ResourceQuotaSet, &self.resource_quota_sets)?;
        check_keys(EntityKind::ParallelEnvironment, &self.parallel_environments)?;
        check_keys(EntityKind::Project, &self.projects)?;
        check_keys(EntityKind::User, &self.users)?;
        check_keys(EntityKind::ClusterQueue, &self.cluster_queues)?;
        check_keys(EntityKind::UserSetList, &self.user_set_lists)?;
        check_unique(EntityKind::AdminHost, &self.admin_hosts)?;
        check_unique(EntityKind::SubmitHost, &self.submit_hosts)?;
        check_unique(EntityKind::Manager, &self.managers)?;
        check_unique(EntityKind::Operator, &self.operators)?;
        Ok(())
    }

    /// Names of all entities of `kind`, sorted
    pub fn names(&self, kind: EntityKind) -> Vec<String> {
        fn keys<T>(c: &Collection<T>) -> Vec<String> {
            c.keys().cloned().collect()
        }
        fn sorted(list: &[String]) -> Vec<String> {
            let mut names = list.to_vec();
            names.sort();
            names
        }
        match kind {
            EntityKind::UserSetList => keys(&self.user_set_lists),
            EntityKind::Project => keys(&self.projects),
            EntityKind::User => keys(&self.users),
            EntityKind::Manager => sorted(&self.managers),
            EntityKind::Operator => sorted(&self.operators),
            EntityKind::ComplexEntry => keys(&self.complex_entries),
            EntityKind::Calendar => keys(&self.calendars),
            EntityKind::CkptInterface => keys(&self.ckpt_interfaces),
            EntityKind::ParallelEnvironment => keys(&self.parallel_environments),
            EntityKind::HostConfiguration => keys(&self.host_configurations),
            EntityKind::HostGroup => keys(&self.host_groups),
            EntityKind::AdminHost => sorted(&self.admin_hosts),
            EntityKind::SubmitHost => sorted(&self.submit_hosts),
            EntityKind::ExecHost => keys(&self.exec_hosts),
            EntityKind::ResourceQuotaSet => keys(&self.resource_quota_sets),
            EntityKind::ClusterQueue => keys(&self.cluster_queues),
            EntityKind::GlobalConfig => self
                .global_config
                .as_ref()
                .map(|_| vec![GLOBAL_CONFIG_NAME.to_string()])
                .unwrap_or_default(),
            EntityKind::SchedulerConfig => self
                .scheduler_config
                .as_ref()
                .map(|_| vec![SCHEDULER_CONFIG_NAME.to_string()])
                .unwrap_or_default(),
        }
    }

    /// Clone out one record
    pub fn record(&self, kind: EntityKind, name: &str) -> Option<EntityRecord> {
        match kind {
            EntityKind::UserSetList => {
                lookup(&self.user_set_lists, name, EntityRecord::UserSetList)
            }
            EntityKind::Project => lookup(&self.projects, name, EntityRecord::Project),
            EntityKind::User => lookup(&self.users, name, EntityRecord::User),
            EntityKind::Manager => lookup_member(&self.managers, name),
            EntityKind::Operator => lookup_member(&self.operators, name),
            EntityKind::ComplexEntry => {
                lookup(&self.complex_entries, name, EntityRecord::ComplexEntry)
            }
            EntityKind::Calendar => lookup(&self.calendars, name, EntityRecord::Calendar),
            EntityKind::CkptInterface => {
                lookup(&self.ckpt_interfaces, name, EntityRecord::CkptInterface)
            }
            EntityKind::ParallelEnvironment => lookup(
                &self.parallel_environments,
                name,
                EntityRecord::ParallelEnvironment,
            ),
            EntityKind::HostConfiguration => lookup(
                &self.host_configurations,
                name,
                EntityRecord::HostConfiguration,
            ),
            EntityKind::HostGroup => lookup(&self.host_groups, name, EntityRecord::HostGroup),
            EntityKind::AdminHost => lookup_member(&self.admin_hosts, name),
            EntityKind::SubmitHost => lookup_member(&self.submit_hosts, name),
            EntityKind::ExecHost => lookup(&self.exec_hosts, name, EntityRecord::ExecHost),
            EntityKind::ResourceQuotaSet => lookup(
                &self.resource_quota_sets,
                name,
                EntityRecord::ResourceQuotaSet,
            ),
            EntityKind::ClusterQueue => {
                lookup(&self.cluster_queues, name, EntityRecord::ClusterQueue)
            }
            EntityKind::GlobalConfig => self
                .global_config
                .clone()
                .filter(|_| name == GLOBAL_CONFIG_NAME)
                .map(EntityRecord::GlobalConfig),
            EntityKind::SchedulerConfig => self
                .scheduler_config
                .clone()
                .filter(|_| name == SCHEDULER_CONFIG_NAME)
                .map(EntityRecord::SchedulerConfig),
        }
    }

    /// All records of `kind`, in name order
    pub fn records(&self, kind: EntityKind) -> Vec<EntityRecord> {
        self.names(kind)
            .iter()
            .filter_map(|name| self.record(kind, name))
            .collect()
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.names(kind).iter().any(|n| n == name)
    }

    /// Insert or replace a record
    ///
    /// # Errors
    ///
    /// Returns `KindMismatch` if the record variant does not belong to `kind`.
    pub fn upsert(&mut self, kind: EntityKind, record: EntityRecord) -> Result<()> {
        fn put<T: Entity>(c: &mut Collection<T>, r: T) {
            c.insert(r.name().to_string(), r);
        }
        fn push(list: &mut Vec<String>, member: String) {
            if !list.contains(&member) {
                list.push(member);
            }
        }
        match (kind, record) {
            (EntityKind::UserSetList, EntityRecord::UserSetList(r)) => {
                put(&mut self.user_set_lists, r)
            }
            (EntityKind::Project, EntityRecord::Project(r)) => put(&mut self.projects, r),
            (EntityKind::User, EntityRecord::User(r)) => put(&mut self.users, r),
            (EntityKind::ComplexEntry, EntityRecord::ComplexEntry(r)) => {
                put(&mut self.complex_entries, r)
            }
            (EntityKind::Calendar, EntityRecord::Calendar(r)) => put(&mut self.calendars, r),
            (EntityKind::CkptInterface, EntityRecord::CkptInterface(r)) => {
                put(&mut self.ckpt_interfaces, r)
            }
            (EntityKind::ParallelEnvironment, EntityRecord::ParallelEnvironment(r)) => {
                put(&mut self.parallel_environments, r)
            }
            (EntityKind::HostConfiguration, EntityRecord::HostConfiguration(r)) => {
                put(&mut self.host_configurations, r)
            }
            (EntityKind::HostGroup, EntityRecord::HostGroup(r)) => put(&mut self.host_groups, r),
            (EntityKind::ExecHost, EntityRecord::ExecHost(r)) => put(&mut self.exec_hosts, r),
            (EntityKind::ResourceQuotaSet, EntityRecord::ResourceQuotaSet(r)) => {
                put(&mut self.resource_quota_sets, r)
            }
            (EntityKind::ClusterQueue, EntityRecord::ClusterQueue(r)) => {
                put(&mut self.cluster_queues, r)
            }
            (EntityKind::Manager, EntityRecord::Member(m)) => push(&mut self.managers, m),
            (EntityKind::Operator, EntityRecord::Member(m)) => push(&mut self.operators, m),
            (EntityKind::AdminHost, EntityRecord::Member(m)) => push(&mut self.admin_hosts, m),
            (EntityKind::SubmitHost, EntityRecord::Member(m)) => push(&mut self.submit_hosts, m),
            (EntityKind::GlobalConfig, EntityRecord::GlobalConfig(r)) => {
                self.global_config = Some(r)
            }
            (EntityKind::SchedulerConfig, EntityRecord::SchedulerConfig(r)) => {
                self.scheduler_config = Some(r)
            }
            (kind, record) => {
                return Err(GridConfError::KindMismatch {
                    kind,
                    name: record.name().to_string(),
                })
            }
        }
        Ok(())
    }

    /// Remove a record; returns whether it was present
    pub fn remove(&mut self, kind: EntityKind, name: &str) -> bool {
        match kind {
            EntityKind::UserSetList => self.user_set_lists.remove(name).is_some(),
            EntityKind::Project => self.projects.remove(name).is_some(),
            EntityKind::User => self.users.remove(name).is_some(),
            EntityKind::Manager => remove_member(&mut self.managers, name),
            EntityKind::Operator => remove_member(&mut self.operators, name),
            EntityKind::ComplexEntry => self.complex_entries.remove(name).is_some(),
            EntityKind::Calendar => self.calendars.remove(name).is_some(),
            EntityKind::CkptInterface => self.ckpt_interfaces.remove(name).is_some(),
            EntityKind::ParallelEnvironment => self.parallel_environments.remove(name).is_some(),
            EntityKind::HostConfiguration => self.host_configurations.remove(name).is_some(),
            EntityKind::HostGroup => self.host_groups.remove(name).is_some(),
            EntityKind::AdminHost => remove_member(&mut self.admin_hosts, name),
            EntityKind::SubmitHost => remove_member(&mut self.submit_hosts, name),
            EntityKind::ExecHost => self.exec_hosts.remove(name).is_some(),
            EntityKind::ResourceQuotaSet => self.resource_quota_sets.remove(name).is_some(),
            EntityKind::ClusterQueue => self.cluster_queues.remove(name).is_some(),
            EntityKind::GlobalConfig => self.global_config.take().is_some(),
            EntityKind::SchedulerConfig => self.scheduler_config.take().is_some(),
        }
    }

    /// Number of managed entities, singletons included
    pub fn entity_count(&self) -> usize {
        let named: usize = EntityKind::APPLY_ORDER
            .iter()
            .map(|k| self.names(*k).len())
            .sum();
        named
            + usize::from(self.global_config.is_some())
            + usize::from(self.scheduler_config.is_some())
    }

    /// True when the snapshot holds no managed state
    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }

    /// SHA-256 (hex) of the canonical JSON of the managed state
    ///
    /// The cluster environment is excluded and scalar lists are sorted, so
    /// two snapshots that compare as the same have the same digest.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if JSON encoding fails.
    pub fn managed_digest(&self) -> Result<String> {
        let mut canonical = self.clone();
        canonical.cluster_environment = None;
        canonical.admin_hosts.sort();
        canonical.submit_hosts.sort();
        canonical.managers.sort();
        canonical.operators.sort();
        let json = serde_json::to_string(&canonical)?;
        Ok(hash_string(&json))
    }
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
