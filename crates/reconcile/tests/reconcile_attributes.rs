//! Reconciliation scenarios against in-memory services.
//!
//! Each test builds a spec, runs one reconciliation over a
//! `RecordingFilesystem` and `StaticIdentity`, then checks the exact calls.

use std::io;
use std::path::PathBuf;

use filespec::{ContentRef, ErrorKind, FileSpec, SpecError};
use reconcile::{Change, ReconcileError, ReconcileOptions, Reconciler, reconcile};
use test_support::{Call, Lookup, Operation, RecordingFilesystem, StaticIdentity};

const PATH: &str = "/tmp/test";

fn path() -> PathBuf {
    PathBuf::from(PATH)
}

fn spec() -> FileSpec {
    FileSpec::with_path(PATH)
}

fn identity() -> StaticIdentity {
    StaticIdentity::new()
        .with_user("root", 0)
        .with_user("somebody", 10)
        .with_group("root", 0)
        .with_group("staff", 1)
        .with_group("somebody", 10)
}

// ============================================================================
// Permissions
// ============================================================================

#[test]
fn chmod_when_permissions_differ() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 0);
    let spec = spec().with_perms("755").unwrap();

    let report = reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(fs.mutations(), vec![Call::Chmod(path(), 0o755)]);
    assert_eq!(
        report.changes(),
        &[Change::Permissions {
            from: 0o644,
            to: 0o755
        }]
    );
}

#[test]
fn no_chmod_when_permissions_unset() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 0);

    let report = reconcile(&spec(), &fs, &identity()).expect("reconcile");

    assert!(fs.calls().is_empty());
    assert!(report.is_unchanged());
}

#[test]
fn no_chmod_when_permissions_match() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o744, 0, 0);
    let spec = spec().with_perms("744").unwrap();

    reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(fs.calls(), vec![Call::Stat(path())]);
}

#[test]
fn leading_zero_perms_compare_numerically() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o755, 0, 0);
    let spec = spec().with_perms("0755").unwrap();

    reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert!(fs.mutations().is_empty());
}

#[test]
fn special_bits_are_compared() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o4755, 0, 0);
    let spec = spec().with_perms("755").unwrap();

    reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(fs.mutations(), vec![Call::Chmod(path(), 0o755)]);
}

// ============================================================================
// Owner
// ============================================================================

#[test]
fn chown_when_owner_differs_preserving_gid() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 1);
    let identity = identity();
    let spec = spec().owned_by("somebody");

    let report = reconcile(&spec, &fs, &identity).expect("reconcile");

    assert_eq!(fs.mutations(), vec![Call::Chown(path(), 10, 1)]);
    assert_eq!(
        identity.lookups(),
        vec![
            Lookup::UserNameForId(0),
            Lookup::UserIdForName("somebody".into())
        ]
    );
    assert_eq!(report.changes(), &[Change::Owner { from: 0, to: 10 }]);
}

#[test]
fn no_lookup_or_chown_when_owner_unset() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 1);
    let identity = identity();

    reconcile(&spec(), &fs, &identity).expect("reconcile");

    assert!(identity.lookups().is_empty());
    assert!(fs.mutations().is_empty());
}

#[test]
fn no_chown_when_owner_matches() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 10, 1);
    let identity = identity();
    let spec = spec().owned_by("somebody");

    reconcile(&spec, &fs, &identity).expect("reconcile");

    assert!(fs.mutations().is_empty());
    assert_eq!(identity.lookups(), vec![Lookup::UserNameForId(10)]);
}

#[test]
fn no_chown_when_owner_is_alias_of_current_uid() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 0);
    let identity = identity().with_user("toor", 0);
    let spec = spec().owned_by("toor");

    let report = reconcile(&spec, &fs, &identity).expect("reconcile");

    assert!(fs.mutations().is_empty());
    assert!(report.is_unchanged());
}

#[test]
fn chown_when_current_uid_has_no_name() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 4242, 1);
    let spec = spec().owned_by("somebody");

    reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(fs.mutations(), vec![Call::Chown(path(), 10, 1)]);
}

#[test]
fn unknown_owner_propagates_not_found() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 1);
    let spec = spec().owned_by("nobody-here");

    let error = reconcile(&spec, &fs, &identity()).expect_err("unknown user");

    assert_eq!(error.kind(), ErrorKind::ExternalService);
    assert_eq!(error.as_io().map(io::Error::kind), Some(io::ErrorKind::NotFound));
    assert!(fs.mutations().is_empty());
}

// ============================================================================
// Group
// ============================================================================

#[test]
fn chown_when_group_differs_preserving_uid() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 1, 1);
    let identity = identity();
    let spec = spec().grouped_by("somebody");

    let report = reconcile(&spec, &fs, &identity).expect("reconcile");

    assert_eq!(fs.mutations(), vec![Call::Chown(path(), 1, 10)]);
    assert_eq!(
        identity.lookups(),
        vec![
            Lookup::GroupNameForId(1),
            Lookup::GroupIdForName("somebody".into())
        ]
    );
    assert_eq!(report.changes(), &[Change::Group { from: 1, to: 10 }]);
}

#[test]
fn no_lookup_or_chown_when_group_unset() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 1, 1);
    let identity = identity();

    reconcile(&spec(), &fs, &identity).expect("reconcile");

    assert!(identity.lookups().is_empty());
    assert!(fs.mutations().is_empty());
}

#[test]
fn no_chown_when_group_matches() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 1, 10);
    let identity = identity();
    let spec = spec().grouped_by("somebody");

    reconcile(&spec, &fs, &identity).expect("reconcile");

    assert!(fs.mutations().is_empty());
    assert_eq!(identity.lookups(), vec![Lookup::GroupNameForId(10)]);
}

#[test]
fn no_chown_when_group_is_alias_of_current_gid() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 3, 1);
    let identity = identity().with_group("wheel", 1);
    let spec = spec().grouped_by("wheel");

    let report = reconcile(&spec, &fs, &identity).expect("reconcile");

    assert!(fs.mutations().is_empty());
    assert!(report.is_unchanged());
    assert_eq!(
        identity.lookups(),
        vec![
            Lookup::GroupNameForId(1),
            Lookup::GroupIdForName("wheel".into())
        ]
    );
}

#[test]
fn chown_when_current_gid_has_no_name() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 3, 4242);
    let spec = spec().grouped_by("somebody");

    let report = reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(fs.mutations(), vec![Call::Chown(path(), 3, 10)]);
    assert_eq!(report.changes(), &[Change::Group { from: 4242, to: 10 }]);
}

#[test]
fn unknown_group_propagates_not_found() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 1);
    let spec = spec().grouped_by("no-such-group");

    let error = reconcile(&spec, &fs, &identity()).expect_err("unknown group");

    assert_eq!(error.kind(), ErrorKind::ExternalService);
    assert_eq!(error.as_io().map(io::Error::kind), Some(io::ErrorKind::NotFound));
    assert!(fs.mutations().is_empty());
}

#[test]
fn owner_and_group_each_use_fresh_stat() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 0);
    let spec = spec().owned_by("somebody").grouped_by("staff");

    reconcile(&spec, &fs, &identity()).expect("reconcile");

    // The group step sees the uid written by the owner step.
    assert_eq!(
        fs.mutations(),
        vec![Call::Chown(path(), 10, 0), Call::Chown(path(), 10, 1)]
    );
    let stats = fs
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Stat(_)))
        .count();
    assert_eq!(stats, 2);
}

// ============================================================================
// Content
// ============================================================================

#[test]
fn content_written_when_different() {
    let fs = RecordingFilesystem::new()
        .with_file(PATH, 0o644, 0, 0)
        .with_contents(PATH, "old");
    let mut spec = spec();
    spec.set_content("new body").unwrap();

    let report = reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(
        fs.mutations(),
        vec![Call::WriteAll(path(), b"new body".to_vec())]
    );
    assert_eq!(report.changes(), &[Change::Content { bytes: 8 }]);
}

#[test]
fn content_skipped_when_identical() {
    let fs = RecordingFilesystem::new()
        .with_file(PATH, 0o644, 0, 0)
        .with_contents(PATH, "same");
    let mut spec = spec();
    spec.set_content("same").unwrap();

    reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(fs.calls(), vec![Call::ReadAll(path())]);
}

#[test]
fn content_creates_missing_file() {
    let fs = RecordingFilesystem::new();
    let mut spec = spec();
    spec.set_content("fresh").unwrap();

    reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(fs.entry(PATH).expect("created").contents, b"fresh");
}

#[test]
fn blind_overwrite_when_comparison_disabled() {
    let fs = RecordingFilesystem::new()
        .with_file(PATH, 0o644, 0, 0)
        .with_contents(PATH, "same");
    let mut spec = spec();
    spec.set_content("same").unwrap();

    Reconciler::new(&fs, identity())
        .with_options(ReconcileOptions::new().compare_content(false))
        .reconcile(&spec)
        .expect("reconcile");

    assert_eq!(fs.calls(), vec![Call::WriteAll(path(), b"same".to_vec())]);
}

#[test]
fn deferred_content_uses_resolver() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 0);
    let mut spec = spec();
    spec.set_content(ContentRef::new("banner")).unwrap();

    Reconciler::new(&fs, identity())
        .with_resolver(|name: &str| -> io::Result<String> { Ok(format!("<{name}>")) })
        .reconcile(&spec)
        .expect("reconcile");

    assert_eq!(fs.entry(PATH).unwrap().contents, b"<banner>");
}

#[test]
fn deferred_content_without_resolver_fails_before_any_call() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 0);
    let mut spec = spec().with_perms("600").unwrap();
    spec.set_content(ContentRef::new("banner")).unwrap();

    let error = reconcile(&spec, &fs, &identity()).expect_err("no resolver");

    assert_eq!(error.kind(), ErrorKind::InvalidState);
    assert!(matches!(
        error,
        ReconcileError::Spec(SpecError::UnresolvedContent { .. })
    ));
    assert!(fs.calls().is_empty());
}

// ============================================================================
// Ordering, errors and idempotence
// ============================================================================

#[test]
fn missing_path_is_invalid_state() {
    let fs = RecordingFilesystem::new();
    let identity = identity();
    let spec = FileSpec::new().with_perms("644").unwrap().owned_by("root");

    let error = reconcile(&spec, &fs, &identity).expect_err("no path");

    assert_eq!(error.kind(), ErrorKind::InvalidState);
    assert!(fs.calls().is_empty());
    assert!(identity.lookups().is_empty());
}

#[test]
fn steps_run_in_fixed_order() {
    let fs = RecordingFilesystem::new()
        .with_file(PATH, 0o600, 0, 0)
        .with_contents(PATH, "old");
    let mut spec = spec()
        .with_perms("640")
        .unwrap()
        .owned_by("somebody")
        .grouped_by("staff");
    spec.set_content("new").unwrap();

    let report = reconcile(&spec, &fs, &identity()).expect("reconcile");

    assert_eq!(
        fs.mutations(),
        vec![
            Call::Chmod(path(), 0o640),
            Call::Chown(path(), 10, 0),
            Call::Chown(path(), 10, 1),
            Call::WriteAll(path(), b"new".to_vec()),
        ]
    );
    assert_eq!(report.changes().len(), 4);
}

#[test]
fn missing_file_error_is_returned_unchanged() {
    let fs = RecordingFilesystem::new();
    let spec = spec().with_perms("644").unwrap();

    let error = reconcile(&spec, &fs, &identity()).expect_err("missing file");

    let io_error = error.as_io().expect("service error");
    assert_eq!(io_error.kind(), io::ErrorKind::NotFound);
    assert_eq!(io_error.to_string(), format!("{PATH} does not exist"));
}

#[test]
fn failure_keeps_earlier_changes() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 0);
    fs.fail_on(Operation::Chown, io::ErrorKind::PermissionDenied);
    let spec = spec().with_perms("755").unwrap().owned_by("somebody");

    let error = reconcile(&spec, &fs, &identity()).expect_err("chown denied");

    assert_eq!(
        error.as_io().map(io::Error::kind),
        Some(io::ErrorKind::PermissionDenied)
    );
    let entry = fs.entry(PATH).unwrap();
    assert_eq!(entry.mode & 0o7777, 0o755);
    assert_eq!(entry.uid, 0);
}

#[test]
fn failure_stops_later_steps() {
    let fs = RecordingFilesystem::new().with_file(PATH, 0o644, 0, 0);
    fs.fail_on(Operation::Chmod, io::ErrorKind::PermissionDenied);
    let mut spec = spec().with_perms("755").unwrap();
    spec.set_content("body").unwrap();

    reconcile(&spec, &fs, &identity()).expect_err("chmod denied");

    assert!(
        !fs.calls()
            .iter()
            .any(|call| matches!(call, Call::ReadAll(_) | Call::WriteAll(..)))
    );
}

#[test]
fn second_run_issues_no_mutations() {
    let fs = RecordingFilesystem::new()
        .with_file(PATH, 0o600, 0, 0)
        .with_contents(PATH, "old");
    let reconciler = Reconciler::new(&fs, identity());
    let mut spec = spec()
        .with_perms("755")
        .unwrap()
        .owned_by("somebody")
        .grouped_by("somebody");
    spec.set_content("converged").unwrap();

    let first = reconciler.reconcile(&spec).expect("first run");
    assert_eq!(first.changes().len(), 4);

    fs.clear_calls();
    let second = reconciler.reconcile(&spec).expect("second run");
    assert!(second.is_unchanged());
    assert!(fs.mutations().is_empty());
}

#[test]
fn dry_run_reports_without_mutating() {
    let fs = RecordingFilesystem::new()
        .with_file(PATH, 0o644, 0, 1)
        .with_contents(PATH, "old");
    let mut spec = spec()
        .with_perms("755")
        .unwrap()
        .owned_by("somebody")
        .grouped_by("somebody");
    spec.set_content("new").unwrap();

    let report = Reconciler::new(&fs, identity())
        .with_options(ReconcileOptions::new().dry_run(true))
        .reconcile(&spec)
        .expect("dry run");

    assert!(report.is_dry_run());
    assert_eq!(
        report.changes(),
        &[
            Change::Permissions {
                from: 0o644,
                to: 0o755
            },
            Change::Owner { from: 0, to: 10 },
            Change::Group { from: 1, to: 10 },
            Change::Content { bytes: 3 },
        ]
    );
    assert!(fs.mutations().is_empty());
    assert_eq!(fs.entry(PATH).unwrap().contents, b"old");
}
