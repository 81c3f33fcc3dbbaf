//! Database-backed integration tests for the booking engine.
//!
//! Each test runs against a fresh database provisioned by `#[sqlx::test]`
//! with the embedded migrations applied, exercising `BookingService`
//! directly. Scenarios are seeded through `CatalogService`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use randevu_api::domain::{AppointmentStatus, ServiceRequest};
use randevu_api::error::ApiError;
use randevu_api::persistence::models::{
    AppointmentFilter, CreateCompany, CreateService, CreateUser, UpdateService,
};
use randevu_api::service::{BookingPatch, BookingService, CatalogService, NewBooking};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Seeded {
    user_id: Uuid,
    company_id: i64,
    haircut_id: i64,
    massage_id: i64,
}

/// Creates one user plus one company with two active services
/// (haircut at 25.00, massage at 40.00).
async fn seed(pool: &PgPool) -> Seeded {
    let catalog = CatalogService::new(pool.clone());

    let user = catalog
        .create_user(CreateUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    let company = catalog
        .create_company(CreateCompany {
            name: "Shear Genius".to_string(),
            email: "booking@sheargenius.example".to_string(),
            phone: "+1-555-0100".to_string(),
            address: None,
        })
        .await
        .unwrap();

    let haircut = catalog
        .create_service(
            company.id,
            CreateService {
                name: "Haircut".to_string(),
                description: None,
                price: Decimal::new(2500, 2),
                duration_minutes: 30,
            },
        )
        .await
        .unwrap();

    let massage = catalog
        .create_service(
            company.id,
            CreateService {
                name: "Massage".to_string(),
                description: None,
                price: Decimal::new(4000, 2),
                duration_minutes: 60,
            },
        )
        .await
        .unwrap();

    Seeded {
        user_id: user.id,
        company_id: company.id,
        haircut_id: haircut.id,
        massage_id: massage.id,
    }
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, hour, minute, 0).unwrap()
}

fn booking(
    seeded: &Seeded,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    services: Vec<ServiceRequest>,
) -> NewBooking {
    NewBooking {
        user_id: seeded.user_id,
        company_id: seeded.company_id,
        start_time: start,
        end_time: end,
        notes: None,
        services,
    }
}

fn one_haircut(seeded: &Seeded) -> Vec<ServiceRequest> {
    vec![ServiceRequest {
        service_id: seeded.haircut_id,
        quantity: 1,
    }]
}

async fn user_appointment_count(engine: &BookingService, user_id: Uuid) -> usize {
    engine
        .list(AppointmentFilter {
            user_id: Some(user_id),
            limit: 100,
            ..AppointmentFilter::default()
        })
        .await
        .unwrap()
        .len()
}

// ---------------------------------------------------------------------------
// Test: overlapping windows are rejected, adjacent windows are not
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn overlapping_booking_rejected_adjacent_allowed(pool: PgPool) {
    let seeded = seed(&pool).await;
    let engine = BookingService::new(pool);

    engine
        .create(booking(&seeded, at(9, 0), at(10, 0), one_haircut(&seeded)))
        .await
        .unwrap();

    let overlapping = engine
        .create(booking(&seeded, at(9, 30), at(10, 30), one_haircut(&seeded)))
        .await;
    assert!(matches!(overlapping, Err(ApiError::TimeOverlap)));

    // Back-to-back is legal: the window is half-open.
    engine
        .create(booking(&seeded, at(10, 0), at(11, 0), one_haircut(&seeded)))
        .await
        .unwrap();

    assert_eq!(user_appointment_count(&engine, seeded.user_id).await, 2);
}

// ---------------------------------------------------------------------------
// Test: a cancelled appointment frees its window
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn cancelled_appointment_does_not_block_rebooking(pool: PgPool) {
    let seeded = seed(&pool).await;
    let engine = BookingService::new(pool);

    let first = engine
        .create(booking(&seeded, at(9, 0), at(10, 0), one_haircut(&seeded)))
        .await
        .unwrap();
    engine.cancel(first.id).await.unwrap();

    engine
        .create(booking(&seeded, at(9, 0), at(10, 0), one_haircut(&seeded)))
        .await
        .unwrap();

    // Second cancel of the first appointment must fail, not no-op.
    let again = engine.cancel(first.id).await;
    assert!(matches!(again, Err(ApiError::AlreadyCancelled)));
}

// ---------------------------------------------------------------------------
// Test: an empty service list persists nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn empty_service_list_persists_nothing(pool: PgPool) {
    let seeded = seed(&pool).await;
    let engine = BookingService::new(pool);

    let rejected = engine
        .create(booking(&seeded, at(9, 0), at(10, 0), vec![]))
        .await;
    assert!(matches!(rejected, Err(ApiError::NoServices)));

    assert_eq!(user_appointment_count(&engine, seeded.user_id).await, 0);
}

// ---------------------------------------------------------------------------
// Test: foreign or inactive services roll the whole booking back
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn deactivated_service_rejects_booking_without_partial_rows(pool: PgPool) {
    let seeded = seed(&pool).await;
    let catalog = CatalogService::new(pool.clone());
    let engine = BookingService::new(pool);

    catalog
        .update_service(
            seeded.massage_id,
            UpdateService {
                is_active: Some(false),
                ..UpdateService::default()
            },
        )
        .await
        .unwrap();

    let rejected = engine
        .create(booking(
            &seeded,
            at(9, 0),
            at(10, 0),
            vec![
                ServiceRequest {
                    service_id: seeded.haircut_id,
                    quantity: 1,
                },
                ServiceRequest {
                    service_id: seeded.massage_id,
                    quantity: 1,
                },
            ],
        ))
        .await;
    assert!(matches!(
        rejected,
        Err(ApiError::NotFound(randevu_api::error::Entity::Service))
    ));

    assert_eq!(user_appointment_count(&engine, seeded.user_id).await, 0);
}

// ---------------------------------------------------------------------------
// Test: price snapshots survive a later catalog price change
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn price_snapshot_survives_catalog_price_change(pool: PgPool) {
    let seeded = seed(&pool).await;
    let catalog = CatalogService::new(pool.clone());
    let engine = BookingService::new(pool);

    let appointment = engine
        .create(booking(
            &seeded,
            at(9, 0),
            at(10, 0),
            vec![
                ServiceRequest {
                    service_id: seeded.haircut_id,
                    quantity: 2,
                },
                ServiceRequest {
                    service_id: seeded.massage_id,
                    quantity: 1,
                },
            ],
        ))
        .await
        .unwrap();

    catalog
        .update_service(
            seeded.haircut_id,
            UpdateService {
                price: Some(Decimal::new(9900, 2)),
                ..UpdateService::default()
            },
        )
        .await
        .unwrap();

    let reread = engine.get(appointment.id).await.unwrap();
    assert_eq!(reread.services.len(), 2);

    let haircut_line = reread
        .services
        .iter()
        .find(|line| line.service_id == seeded.haircut_id)
        .unwrap();
    assert_eq!(haircut_line.quantity, 2);
    assert_eq!(haircut_line.price_at_booking, Decimal::new(2500, 2));

    let massage_line = reread
        .services
        .iter()
        .find(|line| line.service_id == seeded.massage_id)
        .unwrap();
    assert_eq!(massage_line.quantity, 1);
    assert_eq!(massage_line.price_at_booking, Decimal::new(4000, 2));
}

// ---------------------------------------------------------------------------
// Test: a notes-only patch succeeds without touching the window
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn notes_only_update_keeps_window(pool: PgPool) {
    let seeded = seed(&pool).await;
    let engine = BookingService::new(pool);

    let appointment = engine
        .create(booking(&seeded, at(9, 0), at(10, 0), one_haircut(&seeded)))
        .await
        .unwrap();

    let updated = engine
        .update(
            appointment.id,
            BookingPatch {
                notes: Some(Some("bring the loyalty card".to_string())),
                ..BookingPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.notes.as_deref(), Some("bring the loyalty card"));
    assert_eq!(updated.start_time, at(9, 0));
    assert_eq!(updated.end_time, at(10, 0));
    assert_eq!(updated.status, AppointmentStatus::Scheduled);
}

// ---------------------------------------------------------------------------
// Test: an explicit null patch clears the notes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn explicit_null_patch_clears_notes(pool: PgPool) {
    let seeded = seed(&pool).await;
    let engine = BookingService::new(pool);

    let mut request = booking(&seeded, at(9, 0), at(10, 0), one_haircut(&seeded));
    request.notes = Some("scribble".to_string());
    let appointment = engine.create(request).await.unwrap();
    assert_eq!(appointment.notes.as_deref(), Some("scribble"));

    let cleared = engine
        .update(
            appointment.id,
            BookingPatch {
                notes: Some(None),
                ..BookingPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.notes, None);

    // An absent notes field keeps whatever is stored.
    let untouched = engine
        .update(appointment.id, BookingPatch::default())
        .await
        .unwrap();
    assert_eq!(untouched.notes, None);
}
