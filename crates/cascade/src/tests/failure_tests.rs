// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use court_booking_domain::{Booking, EntityRef, GameSession, GameSessionSchedule, Semester};
use court_booking_persistence::{Persistence, PersistenceError, StoreSet};
use diesel::RunQueryDsl;

use super::{
    DeferredCheckStore, FaultyStore, SlowStore, WideTree, assert_store_state, create_booking, create_semester, create_session,
    seed_small_tree, seed_wide_tree,
};
use crate::{CascadeError, CascadeExecutor, StepFailure};

fn injected_failure(root: EntityRef, entity: EntityRef) -> CascadeError {
    CascadeError::CascadeFailed {
        root,
        entity,
        source: StepFailure::Store(PersistenceError::DatabaseError(
            "injected fault".to_string(),
        )),
    }
}

fn assert_tree_intact(persistence: &mut Persistence, tree: &WideTree) {
    assert_eq!(
        persistence.get::<Semester>(tree.semester.id).unwrap(),
        Some(tree.semester.clone())
    );
    for schedule in &tree.schedules {
        assert_eq!(
            persistence.get::<GameSessionSchedule>(schedule.id).unwrap(),
            Some(schedule.clone())
        );
    }
    for session in &tree.sessions {
        assert_eq!(
            persistence.get::<GameSession>(session.id).unwrap(),
            Some(session.clone())
        );
    }
    for booking in &tree.bookings {
        assert_eq!(
            persistence.get::<Booking>(booking.id).unwrap(),
            Some(booking.clone())
        );
    }
    assert!(persistence.find_orphans().unwrap().is_clean());
}

/// Runs a semester cascade with `stores`, asserts it failed at `entity`
/// with everything rolled back, then retries with healthy stores.
fn assert_fault_rolls_back(
    persistence: &mut Persistence,
    tree: &WideTree,
    stores: StoreSet,
    entity: EntityRef,
) {
    let before = persistence.row_counts().unwrap();
    let executor = CascadeExecutor::new(stores);

    let err = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();

    assert_eq!(err, injected_failure(tree.semester.id.into(), entity));
    assert_eq!(executor.coordinator().transactions_opened(), 1);
    assert_store_state(persistence, before);
    assert_tree_intact(persistence, tree);

    CascadeExecutor::default()
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap();
    assert!(persistence.get::<Semester>(tree.semester.id).unwrap().is_none());
    assert!(persistence.find_orphans().unwrap().is_clean());
}

#[test]
fn test_failure_while_deleting_bookings_rolls_back() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let last = tree.bookings[2].id;

    let mut stores = StoreSet::diesel();
    stores.bookings = Box::new(FaultyStore::<Booking>::failing_delete(last, 1));

    assert_fault_rolls_back(&mut persistence, &tree, stores, last.into());
}

#[test]
fn test_failure_while_deleting_sessions_rolls_back() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let last = tree.sessions[2].id;

    let mut stores = StoreSet::diesel();
    stores.sessions = Box::new(FaultyStore::<GameSession>::failing_delete(last, 1));

    assert_fault_rolls_back(&mut persistence, &tree, stores, last.into());
}

#[test]
fn test_failure_while_deleting_schedules_rolls_back() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let last = tree.schedules[1].id;

    let mut stores = StoreSet::diesel();
    stores.schedules = Box::new(FaultyStore::<GameSessionSchedule>::failing_delete(last, 1));

    assert_fault_rolls_back(&mut persistence, &tree, stores, last.into());
}

#[test]
fn test_failure_while_deleting_semester_rolls_back() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let root = tree.semester.id;

    let mut stores = StoreSet::diesel();
    stores.semesters = Box::new(FaultyStore::<Semester>::failing_delete(root, 1));

    assert_fault_rolls_back(&mut persistence, &tree, stores, root.into());
}

#[test]
fn test_schedule_failure_keeps_every_entity() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_small_tree(&mut persistence);

    let mut stores = StoreSet::diesel();
    stores.schedules = Box::new(FaultyStore::<GameSessionSchedule>::failing_delete(
        tree.schedule.id,
        1,
    ));
    let executor = CascadeExecutor::new(stores);

    let err = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();

    assert_eq!(
        err,
        injected_failure(tree.semester.id.into(), tree.schedule.id.into())
    );
    assert!(persistence.get::<Semester>(tree.semester.id).unwrap().is_some());
    assert!(
        persistence
            .get::<GameSessionSchedule>(tree.schedule.id)
            .unwrap()
            .is_some()
    );
    assert!(
        persistence
            .get::<GameSession>(tree.booked_session.id)
            .unwrap()
            .is_some()
    );
    assert!(
        persistence
            .get::<GameSession>(tree.empty_session.id)
            .unwrap()
            .is_some()
    );
    assert_eq!(
        persistence.get::<Booking>(tree.booking.id).unwrap(),
        Some(tree.booking.clone())
    );
    assert!(persistence.find_orphans().unwrap().is_clean());
}

#[test]
fn test_retry_after_transient_failure_succeeds() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_small_tree(&mut persistence);

    let mut stores = StoreSet::diesel();
    stores.schedules = Box::new(FaultyStore::<GameSessionSchedule>::failing_delete(
        tree.schedule.id,
        1,
    ));
    let executor = CascadeExecutor::new(stores);

    executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();
    let summary = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap();

    assert_eq!(summary.total(), 5);
    assert_eq!(executor.coordinator().transactions_opened(), 2);
    assert_eq!(persistence.row_counts().unwrap().total(), 0);
    assert!(persistence.find_orphans().unwrap().is_clean());
}

#[test]
fn test_read_failure_during_resolution_opens_no_transaction() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let before = persistence.row_counts().unwrap();

    let mut stores = StoreSet::diesel();
    stores.sessions = Box::new(FaultyStore::<GameSession>::failing_reads(1));
    let executor = CascadeExecutor::new(stores);

    let err = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();

    assert_eq!(
        err,
        injected_failure(tree.semester.id.into(), tree.schedules[0].id.into())
    );
    assert_eq!(executor.coordinator().transactions_opened(), 0);
    assert_store_state(&mut persistence, before);
}

#[test]
fn test_booking_added_after_planning_aborts_cascade() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let executor = CascadeExecutor::default();

    let plan = executor
        .preview_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap();
    let late = create_booking(&mut persistence, &tree.sessions[1], "late-player");
    let before = persistence.row_counts().unwrap();

    let err = executor.execute(persistence.connection(), &plan).unwrap_err();

    match err {
        CascadeError::CascadeFailed {
            root,
            entity,
            source: StepFailure::Store(PersistenceError::ForeignKeyViolation(_)),
        } => {
            assert_eq!(root, EntityRef::from(tree.semester.id));
            assert_eq!(entity, EntityRef::from(tree.sessions[1].id));
        }
        other => panic!("Expected foreign key failure, got {other:?}"),
    }
    assert_store_state(&mut persistence, before);
    assert_tree_intact(&mut persistence, &tree);
    assert_eq!(persistence.get::<Booking>(late.id).unwrap(), Some(late));

    let summary = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap();
    assert_eq!(summary.bookings, 4);
    assert_eq!(persistence.row_counts().unwrap().total(), 0);
}

#[test]
fn test_session_added_after_planning_aborts_cascade() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let executor = CascadeExecutor::default();

    let plan = executor
        .preview_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap();
    create_session(
        &mut persistence,
        &tree.schedules[0],
        time::macros::date!(2026 - 03 - 25),
    );
    let before = persistence.row_counts().unwrap();

    let err = executor.execute(persistence.connection(), &plan).unwrap_err();

    assert!(matches!(
        err,
        CascadeError::CascadeFailed {
            source: StepFailure::Store(PersistenceError::ForeignKeyViolation(_)),
            ..
        }
    ));
    if let CascadeError::CascadeFailed { entity, .. } = err {
        assert_eq!(entity, EntityRef::from(tree.schedules[0].id));
    }
    assert_store_state(&mut persistence, before);
}

#[test]
fn test_row_removed_after_planning_aborts_cascade() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let executor = CascadeExecutor::default();

    let plan = executor
        .preview_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap();
    persistence.delete::<Booking>(tree.bookings[0].id).unwrap();
    let before = persistence.row_counts().unwrap();

    let err = executor.execute(persistence.connection(), &plan).unwrap_err();

    assert!(matches!(
        err,
        CascadeError::CascadeFailed {
            source: StepFailure::Store(PersistenceError::NotFound(_)),
            ..
        }
    ));
    assert_store_state(&mut persistence, before);
}

#[test]
fn test_exhausted_budget_stops_resolution() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let before = persistence.row_counts().unwrap();
    let executor = CascadeExecutor::default().with_budget(Duration::ZERO);

    let err = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();

    assert_eq!(
        err,
        CascadeError::CascadeFailed {
            root: tree.semester.id.into(),
            entity: tree.semester.id.into(),
            source: StepFailure::DeadlineExceeded {
                budget: Duration::ZERO
            },
        }
    );
    assert_eq!(executor.coordinator().transactions_opened(), 0);
    assert_store_state(&mut persistence, before);
    assert_tree_intact(&mut persistence, &tree);
}

#[test]
fn test_exhausted_budget_on_empty_semester_keeps_it() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let semester = create_semester(&mut persistence, "Empty");
    let executor = CascadeExecutor::default().with_budget(Duration::ZERO);

    let err = executor
        .delete_semester_cascade(persistence.connection(), semester.id)
        .unwrap_err();

    assert!(matches!(
        err,
        CascadeError::CascadeFailed {
            source: StepFailure::DeadlineExceeded { .. },
            ..
        }
    ));
    assert_eq!(
        persistence.get::<Semester>(semester.id).unwrap(),
        Some(semester)
    );
}

#[test]
fn test_budget_covers_slow_resolution() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let before = persistence.row_counts().unwrap();

    let mut stores = StoreSet::diesel();
    stores.schedules = Box::new(SlowStore::<GameSessionSchedule>::slow_reads(
        Duration::from_millis(300),
    ));
    let budget = Duration::from_millis(100);
    let executor = CascadeExecutor::new(stores).with_budget(budget);

    let err = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();

    assert_eq!(
        err,
        CascadeError::CascadeFailed {
            root: tree.semester.id.into(),
            entity: tree.schedules[0].id.into(),
            source: StepFailure::DeadlineExceeded { budget },
        }
    );
    assert_eq!(executor.coordinator().transactions_opened(), 0);
    assert_store_state(&mut persistence, before);
    assert_tree_intact(&mut persistence, &tree);
}

#[test]
fn test_budget_running_out_mid_delete_rolls_back() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let before = persistence.row_counts().unwrap();

    let mut stores = StoreSet::diesel();
    stores.bookings = Box::new(SlowStore::<Booking>::slow_deletes(Duration::from_millis(300)));
    let budget = Duration::from_millis(100);
    let executor = CascadeExecutor::new(stores).with_budget(budget);

    let err = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();

    assert_eq!(
        err,
        CascadeError::CascadeFailed {
            root: tree.semester.id.into(),
            entity: tree.bookings[1].id.into(),
            source: StepFailure::DeadlineExceeded { budget },
        }
    );
    assert_eq!(executor.coordinator().transactions_opened(), 1);
    assert_store_state(&mut persistence, before);
    assert_tree_intact(&mut persistence, &tree);
}

#[test]
fn test_generous_budget_allows_cascade() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let executor = CascadeExecutor::default().with_budget(Duration::from_secs(60));

    executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap();

    assert_eq!(persistence.row_counts().unwrap().total(), 0);
}

#[test]
fn test_busy_connection_reports_transaction_unavailable() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_small_tree(&mut persistence);
    let before = persistence.row_counts().unwrap();
    let executor = CascadeExecutor::default();

    diesel::sql_query("BEGIN")
        .execute(persistence.connection())
        .unwrap();
    let err = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();
    diesel::sql_query("ROLLBACK")
        .execute(persistence.connection())
        .unwrap();

    assert!(matches!(
        err,
        CascadeError::TransactionUnavailable {
            source: PersistenceError::TransactionFailed(_),
            ..
        }
    ));
    assert_eq!(executor.coordinator().transactions_opened(), 0);
    assert_store_state(&mut persistence, before);
}

#[test]
fn test_commit_failure_reports_transaction_unavailable() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let tree = seed_wide_tree(&mut persistence, "Spring 2026");
    let before = persistence.row_counts().unwrap();

    let mut stores = StoreSet::diesel();
    stores.bookings = Box::new(DeferredCheckStore::new());
    let executor = CascadeExecutor::new(stores);

    let err = executor
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap_err();

    match err {
        CascadeError::TransactionUnavailable {
            root,
            source: PersistenceError::TransactionFailed(message),
        } => {
            assert_eq!(root, EntityRef::from(tree.semester.id));
            assert!(message.starts_with("commit"), "unexpected message: {message}");
        }
        other => panic!("Expected commit failure, got {other:?}"),
    }
    assert_eq!(executor.coordinator().transactions_opened(), 1);
    assert_store_state(&mut persistence, before);
    assert_tree_intact(&mut persistence, &tree);

    CascadeExecutor::default()
        .delete_semester_cascade(persistence.connection(), tree.semester.id)
        .unwrap();
    assert_eq!(persistence.row_counts().unwrap().total(), 0);
}
