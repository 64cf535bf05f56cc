//! Snapshot-backed cluster double
//!
//! [`InMemoryCluster`] plays both collaborator roles against a plain
//! [`Snapshot`]. It enforces the same rules a real cluster does: no
//! duplicate adds, no modify or delete of something missing, and no delete
//! of an entity another entity still names. Failures can be injected per
//! mutation.

use crate::source::SnapshotSource;
use gridconf_core::apply::ApplyCollaborator;
use gridconf_core::errors::{GcError, GcErrorKind};
use gridconf_core::model::{EntityKind, EntityRecord, Snapshot};
use gridconf_core::plan::{holds_reference, references_to};

/// Collaborator call kinds, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Modify,
    ModifyInPlace,
    Delete,
}

impl Mutation {
    fn as_str(&self) -> &'static str {
        match self {
            Mutation::Add => "add",
            Mutation::Modify => "modify",
            Mutation::ModifyInPlace => "modify_in_place",
            Mutation::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCluster {
    state: Snapshot,
    fetches: usize,
    fetch_unavailable: bool,
    failures: Vec<(Mutation, EntityKind, String)>,
}

impl InMemoryCluster {
    pub fn new(state: Snapshot) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    /// Current state of the cluster
    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    /// Number of successful fetches so far
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Make every following fetch fail
    pub fn make_unavailable(&mut self) {
        self.fetch_unavailable = true;
    }

    /// Reject `mutation` of `kind`/`name` from now on
    pub fn fail_on(&mut self, mutation: Mutation, kind: EntityKind, name: impl Into<String>) {
        self.failures.push((mutation, kind, name.into()));
    }

    fn rejected(mutation: Mutation, kind: EntityKind, name: &str, message: String) -> GcError {
        GcError::new(GcErrorKind::ExternalService)
            .with_op(mutation.as_str())
            .with_entity_kind(kind)
            .with_entity_name(name)
            .with_message(message)
    }

    fn check_injected(&self, mutation: Mutation, kind: EntityKind, name: &str) -> Result<(), GcError> {
        let injected = self
            .failures
            .iter()
            .any(|(m, k, n)| *m == mutation && *k == kind && n == name);
        if injected {
            return Err(Self::rejected(
                mutation,
                kind,
                name,
                format!("{} of {} '{}' refused", mutation.as_str(), kind, name),
            ));
        }
        Ok(())
    }

    fn check_exists(&self, mutation: Mutation, kind: EntityKind, name: &str) -> Result<(), GcError> {
        // a real cluster always has its global and scheduler configuration
        if kind.is_singleton() || self.state.contains(kind, name) {
            return Ok(());
        }
        Err(Self::rejected(
            mutation,
            kind,
            name,
            format!("{} '{}' does not exist", kind, name),
        ))
    }

    fn store(
        &mut self,
        mutation: Mutation,
        kind: EntityKind,
        name: &str,
        record: &EntityRecord,
    ) -> Result<(), GcError> {
        if record.name() != name {
            return Err(Self::rejected(
                mutation,
                kind,
                name,
                format!("record is named '{}'", record.name()),
            ));
        }
        self.state.upsert(kind, record.clone())?;
        Ok(())
    }

    /// First entity that still names `kind`/`name`, as `(referrer kind, referrer name)`
    fn referenced_by(&self, kind: EntityKind, name: &str) -> Option<(EntityKind, String)> {
        for reference in references_to(kind) {
            for record in self.state.records(reference.referrer) {
                if reference.referrer == kind && record.name() == name {
                    continue;
                }
                if holds_reference(&record, reference, name) {
                    return Some((reference.referrer, record.name().to_string()));
                }
            }
        }
        None
    }
}

impl SnapshotSource for InMemoryCluster {
    fn fetch_snapshot(&mut self) -> Result<Snapshot, GcError> {
        if self.fetch_unavailable {
            return Err(GcError::new(GcErrorKind::ExternalService)
                .with_op("fetch_snapshot")
                .with_message("cluster is unreachable"));
        }
        self.fetches += 1;
        Ok(self.state.clone())
    }
}

impl ApplyCollaborator for InMemoryCluster {
    fn add(&mut self, kind: EntityKind, name: &str, record: &EntityRecord) -> Result<(), GcError> {
        self.check_injected(Mutation::Add, kind, name)?;
        if self.state.contains(kind, name) {
            return Err(Self::rejected(
                Mutation::Add,
                kind,
                name,
                format!("{} '{}' already exists", kind, name),
            ));
        }
        self.store(Mutation::Add, kind, name, record)
    }

    fn modify(&mut self, kind: EntityKind, name: &str, record: &EntityRecord) -> Result<(), GcError> {
        self.check_injected(Mutation::Modify, kind, name)?;
        self.check_exists(Mutation::Modify, kind, name)?;
        self.store(Mutation::Modify, kind, name, record)
    }

    fn modify_in_place(
        &mut self,
        kind: EntityKind,
        name: &str,
        record: &EntityRecord,
    ) -> Result<(), GcError> {
        self.check_injected(Mutation::ModifyInPlace, kind, name)?;
        self.check_exists(Mutation::ModifyInPlace, kind, name)?;
        self.store(Mutation::ModifyInPlace, kind, name, record)
    }

    fn delete(&mut self, kind: EntityKind, name: &str) -> Result<(), GcError> {
        self.check_injected(Mutation::Delete, kind, name)?;
        if let Some((referrer, referrer_name)) = self.referenced_by(kind, name) {
            return Err(Self::rejected(
                Mutation::Delete,
                kind,
                name,
                format!(
                    "{} '{}' is still referenced by {} '{}'",
                    kind, name, referrer, referrer_name
                ),
            ));
        }
        if !self.state.remove(kind, name) {
            return Err(Self::rejected(
                Mutation::Delete,
                kind,
                name,
                format!("{} '{}' does not exist", kind, name),
            ));
        }
        Ok(())
    }
}
