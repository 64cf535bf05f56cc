#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{live_cluster, pe, strings};
use gridconf_core::diff::compare;
use gridconf_core::errors::GcErrorKind;
use gridconf_core::model::{EntityKind, Snapshot};
use gridconf_core::plan::{PlanPhase, PlanState};
use gridconf_engine::{reconcile, InMemoryCluster, Mutation, ReconcileOptions, ReconcileOutcome};

fn options() -> ReconcileOptions {
    ReconcileOptions::default()
}

/// Drop `smp`, add `hybrid`, and keep the queue consistent with both
fn consistent_change() -> Snapshot {
    let mut desired = live_cluster();
    desired.parallel_environments.remove("smp");
    desired.parallel_environments.insert("hybrid".into(), pe("hybrid"));
    desired.cluster_queues.get_mut("all.q").unwrap().pe_list = strings(&["mpi", "hybrid"]);
    desired
}

#[test]
fn test_matching_cluster_needs_no_changes() {
    let mut cluster = InMemoryCluster::new(live_cluster());

    let outcome = reconcile(&mut cluster, &live_cluster(), &options()).unwrap();

    assert!(matches!(outcome, ReconcileOutcome::NoChanges));
    assert!(outcome.plan().is_none());
    assert_eq!(cluster.fetch_count(), 1);
}

#[test]
fn test_unmanaged_singleton_is_left_alone() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    let mut desired = live_cluster();
    desired.global_config = None;

    let outcome = reconcile(&mut cluster, &desired, &options()).unwrap();

    assert!(matches!(outcome, ReconcileOutcome::NoChanges));
    assert!(cluster.snapshot().global_config.is_some());
}

#[test]
fn test_dry_run_plans_without_touching_cluster() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    let options = ReconcileOptions {
        dry_run: true,
        ..Default::default()
    };

    let outcome = reconcile(&mut cluster, &consistent_change(), &options).unwrap();

    let ReconcileOutcome::Planned(plan) = outcome else {
        panic!("expected a dry-run plan");
    };
    assert_eq!(plan.state(), PlanState::Built);
    assert!(plan
        .position_of(PlanPhase::Add, EntityKind::ParallelEnvironment, "hybrid")
        .is_some());
    assert_eq!(cluster.snapshot(), &live_cluster());
}

#[test]
fn test_consistent_change_converges() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    let desired = consistent_change();

    let outcome = reconcile(&mut cluster, &desired, &options()).unwrap();

    let ReconcileOutcome::Applied {
        plan,
        report,
        converged,
        residual,
    } = outcome
    else {
        panic!("expected an applied plan");
    };
    assert_eq!(plan.state(), PlanState::Completed);
    assert!(report.is_clean());
    assert_eq!(report.applied.len(), plan.len());
    assert_eq!(converged, Some(true));
    assert!(residual.is_none());
    assert!(compare(cluster.snapshot(), &desired).unwrap().is_same);
    assert_eq!(
        cluster.snapshot().managed_digest().unwrap(),
        plan.target_digest()
    );
    assert_eq!(cluster.fetch_count(), 2);
}

#[test]
fn test_second_run_is_a_no_op() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    let desired = consistent_change();

    reconcile(&mut cluster, &desired, &options()).unwrap();
    let again = reconcile(&mut cluster, &desired, &options()).unwrap();

    assert!(matches!(again, ReconcileOutcome::NoChanges));
}

#[test]
fn test_dangling_reference_in_desired_state_does_not_converge() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    let mut desired = live_cluster();
    // the queue still offers smp, but smp itself is gone
    desired.parallel_environments.remove("smp");

    let outcome = reconcile(&mut cluster, &desired, &options()).unwrap();

    let ReconcileOutcome::Applied {
        report,
        converged,
        residual,
        ..
    } = outcome
    else {
        panic!("expected an applied plan");
    };
    assert!(report.is_clean());
    assert_eq!(converged, Some(false));
    let residual = residual.unwrap();
    assert_eq!(residual.modified.names(EntityKind::ClusterQueue), strings(&["all.q"]));
    assert_eq!(
        cluster.snapshot().cluster_queues["all.q"].pe_list,
        strings(&["mpi"])
    );
    assert!(!cluster
        .snapshot()
        .contains(EntityKind::ParallelEnvironment, "smp"));
}

#[test]
fn test_verify_disabled_leaves_convergence_unknown() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    let options = ReconcileOptions {
        verify: false,
        ..Default::default()
    };

    let outcome = reconcile(&mut cluster, &consistent_change(), &options).unwrap();

    assert!(matches!(
        outcome,
        ReconcileOutcome::Applied {
            converged: None,
            residual: None,
            ..
        }
    ));
    assert_eq!(cluster.fetch_count(), 1);
}

#[test]
fn test_refused_delete_is_reported_and_run_continues() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    cluster.fail_on(Mutation::Delete, EntityKind::ParallelEnvironment, "smp");
    let mut desired = consistent_change();
    desired.managers = strings(&[]);

    let outcome = reconcile(&mut cluster, &desired, &options()).unwrap();

    let ReconcileOutcome::Applied {
        report,
        converged,
        residual,
        ..
    } = outcome
    else {
        panic!("expected an applied plan");
    };
    assert_eq!(report.delete_failures.len(), 1);
    assert_eq!(report.delete_failures[0].name, "smp");
    assert!(!cluster.snapshot().contains(EntityKind::Manager, "root"));
    assert_eq!(converged, Some(false));
    assert_eq!(
        residual.unwrap().removed.names(EntityKind::ParallelEnvironment),
        strings(&["smp"])
    );
}

#[test]
fn test_refused_delete_aborts_when_configured() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    cluster.fail_on(Mutation::Delete, EntityKind::ParallelEnvironment, "smp");
    let options = ReconcileOptions {
        continue_on_delete_error: false,
        ..Default::default()
    };

    let err = reconcile(&mut cluster, &consistent_change(), &options).unwrap_err();

    assert_eq!(err.kind(), GcErrorKind::DeleteFailed);
    assert_eq!(err.entity_name(), Some("smp"));
}

#[test]
fn test_refused_add_fails_the_run() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    cluster.fail_on(Mutation::Add, EntityKind::ParallelEnvironment, "hybrid");

    let err = reconcile(&mut cluster, &consistent_change(), &options()).unwrap_err();

    assert_eq!(err.kind(), GcErrorKind::ApplyFailed);
    assert_eq!(
        err.source_error().map(|source| source.kind()),
        Some(GcErrorKind::ExternalService)
    );
    // nothing after the failed add ran
    assert_eq!(
        cluster.snapshot().cluster_queues["all.q"].pe_list,
        strings(&["mpi", "smp"])
    );
}

#[test]
fn test_unreachable_cluster_is_snapshot_unavailable() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    cluster.make_unavailable();

    let err = reconcile(&mut cluster, &consistent_change(), &options()).unwrap_err();

    assert_eq!(err.kind(), GcErrorKind::SnapshotUnavailable);
    assert_eq!(
        err.source_error().map(|source| source.kind()),
        Some(GcErrorKind::ExternalService)
    );
}

#[test]
fn test_ambiguous_desired_state_mutates_nothing() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    let mut desired = consistent_change();
    desired.parallel_environments.insert("mpi".into(), pe("openmpi"));

    let err = reconcile(&mut cluster, &desired, &options()).unwrap_err();

    assert_eq!(err.kind(), GcErrorKind::AmbiguousIdentity);
    assert_eq!(cluster.snapshot(), &live_cluster());
}

#[test]
fn test_removing_everything_deletes_referrers_first() {
    let mut cluster = InMemoryCluster::new(live_cluster());
    let mut desired = Snapshot::empty();
    desired.global_config = live_cluster().global_config;

    let outcome = reconcile(&mut cluster, &desired, &options()).unwrap();

    let ReconcileOutcome::Applied {
        report, converged, ..
    } = outcome
    else {
        panic!("expected an applied plan");
    };
    assert!(report.is_clean(), "{:?}", report.delete_failures);
    assert_eq!(converged, Some(true));
    assert_eq!(cluster.snapshot().entity_count(), 1);
}
