//! Races on contended slots and rows.
//!
//! These tests drive genuinely concurrent tasks at the same (table, window)
//! or the same reservation row; the store's conditional writes are the only
//! coordination anywhere in the engine.

mod common;

use booking_server::{AppError, ReservationStatus};
use chrono::Duration;
use common::*;

/// For all concurrent locks on one table and overlapping window, exactly
/// one succeeds and the rest get a typed Conflict.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_locks_exactly_one_wins() {
    let (state, _clock) = test_env().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            lock_service(&state)
                .lock(table5_request(&format!("customer-{}", i)))
                .await
        }));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(reservation) => {
                assert_eq!(reservation.status, ReservationStatus::Locked);
                winners += 1;
            }
            Err(AppError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(winners, 1, "exactly one lock must win");
    assert_eq!(conflicts, 7);

    // The slot is really gone for everyone else
    let tables = availability_service(&state)
        .find_available("2025-06-01", "18:00", 90, 4)
        .await
        .unwrap();
    assert!(!tables.iter().any(|t| t.number == 5));
}

/// Disjoint slots on the same table never contend with each other.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_locks_on_disjoint_windows_all_win() {
    let (state, _clock) = test_env().await;

    let starts = ["12:00", "13:30", "15:00", "16:30", "18:00"];
    let mut handles = Vec::new();
    for (i, start) in starts.iter().enumerate() {
        let state = state.clone();
        let start = start.to_string();
        handles.push(tokio::spawn(async move {
            lock_service(&state)
                .lock(slot_request(
                    "t5",
                    "2025-06-01",
                    &start,
                    90,
                    4,
                    &format!("customer-{}", i),
                ))
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().expect("disjoint window lock failed");
    }
}

/// For a fixed reservation id, concurrent settle attempts are linearized:
/// exactly one of confirm/cancel wins.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_confirm_and_cancel_single_winner() {
    let (state, _clock) = test_env().await;

    let reservation = lock_table5(&state, "A").await;
    let key = reservation.key();

    let confirm_state = state.clone();
    let confirm_key = key.clone();
    let confirm = tokio::spawn(async move {
        confirmation_service(&confirm_state)
            .confirm(&confirm_key, "A", None)
            .await
    });
    let cancel_state = state.clone();
    let cancel_key = key.clone();
    let cancel = tokio::spawn(async move {
        cancellation_service(&cancel_state)
            .cancel(
                &cancel_key,
                booking_server::Requester {
                    customer_id: "A".into(),
                    staff: false,
                },
            )
            .await
    });

    let confirm_result = confirm.await.unwrap();
    let cancel_result = cancel.await.unwrap();
    let successes = [confirm_result.is_ok(), cancel_result.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(successes, 1, "exactly one settle attempt may win");

    // The surviving row state matches the winner
    let row = booking_server::db::repository::ReservationRepository::new(state.db.clone())
        .find_by_id(&key)
        .await
        .unwrap()
        .unwrap();
    if confirm_result.is_ok() {
        assert_eq!(row.status, ReservationStatus::Confirmed);
    } else {
        assert_eq!(row.status, ReservationStatus::Cancelled);
    }
}

/// Two confirms for the same id: one wins, one gets a typed failure.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_double_confirm_single_winner() {
    let (state, _clock) = test_env().await;

    let reservation = lock_table5(&state, "A").await;
    let key = reservation.key();

    let mut handles = Vec::new();
    for _ in 0..2 {
        let state = state.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            confirmation_service(&state).confirm(&key, "A", None).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1, "confirmation must never be merged or doubled");

    let row = booking_server::db::repository::ReservationRepository::new(state.db.clone())
        .find_by_id(&key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ReservationStatus::Confirmed);
}

/// Once the TTL has elapsed, a racing confirm can never beat the reaper:
/// the final resting state is expired, whichever write lands first.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reaper_vs_late_confirm_settles_expired() {
    let (state, clock) = test_env().await;

    let reservation = lock_table5(&state, "A").await;
    let key = reservation.key();
    clock.advance(Duration::minutes(6));

    let sweep_state = state.clone();
    let sweep = tokio::spawn(async move { reaper(&sweep_state).sweep().await });
    let confirm_state = state.clone();
    let confirm_key = key.clone();
    let confirm = tokio::spawn(async move {
        confirmation_service(&confirm_state)
            .confirm(&confirm_key, "A", None)
            .await
    });

    sweep.await.unwrap().unwrap();
    let confirm_result = confirm.await.unwrap();
    assert!(
        matches!(confirm_result, Err(AppError::Expired(_))),
        "late confirm must fail expired, got {:?}",
        confirm_result.map(|r| r.status)
    );

    let row = booking_server::db::repository::ReservationRepository::new(state.db.clone())
        .find_by_id(&key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ReservationStatus::Expired);
}
