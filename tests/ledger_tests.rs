//! Tests de integración del ledger sobre SQLite en memoria
//!
//! Se monta la base con el schema y la siembra reales y se atacan los
//! servicios directamente, sin pasar por el shell HTTP.

use sqlx::SqlitePool;

use fleet_ledger::database;
use fleet_ledger::models::duty_hours::NewDutyHoursRequest;
use fleet_ledger::models::fuel::NewFuelPurchaseRequest;
use fleet_ledger::models::trip::{LegType, NewTripRequest};
use fleet_ledger::models::user::User;
use fleet_ledger::repositories::{DriverRepository, DutyHoursRepository, TruckRepository, UserRepository};
use fleet_ledger::services::LedgerService;
use fleet_ledger::utils::errors::AppError;

struct TestContext {
    pool: SqlitePool,
    ledger: LedgerService,
    manager: User,
    driver_user: User,
    driver_id: i64,
    truck_id: i64,
}

/// Base en memoria con el manager sembrado, un conductor con usuario
/// emparejado y un camión de pruebas
async fn setup() -> TestContext {
    let pool = database::init_in_memory().await.unwrap();

    let users = UserRepository::new(pool.clone());
    let manager = users
        .find_by_credentials("Admin", "9999")
        .await
        .unwrap()
        .expect("usuario manager sembrado");

    let drivers = DriverRepository::new(pool.clone());
    let driver = drivers.create("Carlos", None, None).await.unwrap();
    let driver_user = users
        .create_driver_user("Carlos", "2222", driver.id)
        .await
        .unwrap();

    let trucks = TruckRepository::new(pool.clone());
    let truck = trucks.create("1234-ABC", Some("Tractora")).await.unwrap();

    TestContext {
        ledger: LedgerService::new(pool.clone()),
        pool,
        manager,
        driver_user,
        driver_id: driver.id,
        truck_id: truck.id,
    }
}

fn trip_request(truck_id: i64) -> NewTripRequest {
    NewTripRequest {
        departure_date: "2025-03-10".to_string(),
        arrival_date: "2025-03-11".to_string(),
        origin: "Madrid".to_string(),
        destination: "Valencia".to_string(),
        truck_id: Some(truck_id),
        ..Default::default()
    }
}

#[tokio::test]
async fn loaded_trip_computes_revenue_from_tariff() {
    let ctx = setup().await;

    let trip = ctx
        .ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(1000.0),
                odometer_end: Some(1500.0),
                driver_id: Some(ctx.driver_id),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    assert_eq!(trip.leg_type, LegType::Loaded);
    assert!((trip.distance() - 500.0).abs() < 1e-9);
    // 500 km * tarifa sembrada 0.95
    assert!((trip.revenue - 475.0).abs() < 1e-9);
}

#[tokio::test]
async fn manager_explicit_revenue_wins_over_tariff() {
    let ctx = setup().await;

    let trip = ctx
        .ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(0.0),
                odometer_end: Some(100.0),
                revenue: Some(800.0),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    assert!((trip.revenue - 800.0).abs() < 1e-9);
}

#[tokio::test]
async fn driver_cannot_override_revenue() {
    let ctx = setup().await;

    let trip = ctx
        .ledger
        .submit_trip(
            &ctx.driver_user,
            NewTripRequest {
                odometer_start: Some(0.0),
                odometer_end: Some(100.0),
                revenue: Some(9999.0),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    // El override se ignora y se aplica la tarifa
    assert!((trip.revenue - 95.0).abs() < 1e-9);
}

#[tokio::test]
async fn empty_leg_zeroes_weight_tolls_parking_and_document() {
    let ctx = setup().await;

    let trip = ctx
        .ledger
        .submit_trip(
            &ctx.driver_user,
            NewTripRequest {
                leg_type: Some("empty ".to_string()),
                odometer_start: Some(0.0),
                odometer_end: Some(120.0),
                weight_kg: Some(24000.0),
                toll_cost: Some(35.0),
                parking_cost: Some(12.0),
                document_ref: Some("cmr-001.pdf".to_string()),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    assert_eq!(trip.leg_type, LegType::Empty);
    assert_eq!(trip.weight_kg, 0.0);
    assert_eq!(trip.toll_cost, 0.0);
    assert_eq!(trip.parking_cost, 0.0);
    assert_eq!(trip.document_ref, None);
    assert_eq!(trip.revenue, 0.0);
}

#[tokio::test]
async fn odometer_end_below_start_rejects_and_persists_nothing() {
    let ctx = setup().await;

    let result = ctx
        .ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(500.0),
                odometer_end: Some(400.0),
                ..trip_request(ctx.truck_id)
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));

    let trips = ctx.ledger.list_trips(&ctx.manager, None).await.unwrap();
    assert!(trips.is_empty());
}

#[tokio::test]
async fn driver_blank_odometer_falls_back_to_last_truck_reading() {
    let ctx = setup().await;

    ctx.ledger
        .submit_trip(
            &ctx.driver_user,
            NewTripRequest {
                odometer_start: Some(100.0),
                odometer_end: Some(200.0),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    let second = ctx
        .ledger
        .submit_trip(
            &ctx.driver_user,
            NewTripRequest {
                odometer_start: None,
                odometer_end: Some(350.0),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    assert!((second.odometer_start - 200.0).abs() < 1e-9);
    assert!((second.distance() - 150.0).abs() < 1e-9);
}

#[tokio::test]
async fn driver_first_trip_without_odometer_starts_at_zero() {
    let ctx = setup().await;

    let trip = ctx
        .ledger
        .submit_trip(
            &ctx.driver_user,
            NewTripRequest {
                odometer_start: None,
                odometer_end: Some(80.0),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    assert_eq!(trip.odometer_start, 0.0);
}

#[tokio::test]
async fn driver_assignment_is_forced_to_own_driver() {
    let ctx = setup().await;

    let drivers = DriverRepository::new(ctx.pool.clone());
    let other = drivers.create("Pedro", None, None).await.unwrap();

    let trip = ctx
        .ledger
        .submit_trip(
            &ctx.driver_user,
            NewTripRequest {
                odometer_start: Some(0.0),
                odometer_end: Some(50.0),
                driver_id: Some(other.id),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    assert_eq!(trip.driver_id, Some(ctx.driver_id));
}

#[tokio::test]
async fn driver_listing_never_shows_other_drivers_rows() {
    let ctx = setup().await;

    let drivers = DriverRepository::new(ctx.pool.clone());
    let other = drivers.create("Pedro", None, None).await.unwrap();

    // El manager da de alta un viaje para cada conductor
    ctx.ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(0.0),
                odometer_end: Some(100.0),
                driver_id: Some(ctx.driver_id),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();
    ctx.ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(100.0),
                odometer_end: Some(300.0),
                driver_id: Some(other.id),
                ..trip_request(ctx.truck_id)
            },
        )
        .await
        .unwrap();

    let visible = ctx.ledger.list_trips(&ctx.driver_user, None).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].trip.driver_id, Some(ctx.driver_id));

    let all = ctx.ledger.list_trips(&ctx.manager, None).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn fuel_purchase_requires_document_ref() {
    let ctx = setup().await;

    let result = ctx
        .ledger
        .submit_fuel_purchase(
            &ctx.driver_user,
            NewFuelPurchaseRequest {
                date: "2025-03-10".to_string(),
                truck_id: Some(ctx.truck_id),
                liters: 200.0,
                price_per_liter: 1.45,
                document_ref: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));

    let purchases = ctx
        .ledger
        .list_fuel_purchases(&ctx.driver_user, None)
        .await
        .unwrap();
    assert!(purchases.is_empty());
}

#[tokio::test]
async fn fuel_amount_is_always_liters_times_price() {
    let ctx = setup().await;

    let purchase = ctx
        .ledger
        .submit_fuel_purchase(
            &ctx.driver_user,
            NewFuelPurchaseRequest {
                date: "2025-03-10".to_string(),
                truck_id: Some(ctx.truck_id),
                liters: 200.0,
                price_per_liter: 1.45,
                station: Some("Repsol A-3".to_string()),
                document_ref: Some("ticket-77".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!((purchase.amount - 290.0).abs() < 1e-9);
    assert_eq!(purchase.driver_id, Some(ctx.driver_id));
    assert_eq!(purchase.document_ref, "ticket-77");
}

#[tokio::test]
async fn fuel_rejects_nonpositive_liters_and_price() {
    let ctx = setup().await;

    let base = NewFuelPurchaseRequest {
        date: "2025-03-10".to_string(),
        liters: 0.0,
        price_per_liter: 1.45,
        document_ref: Some("ticket-1".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        ctx.ledger.submit_fuel_purchase(&ctx.manager, base).await,
        Err(AppError::Validation(_))
    ));

    let bad_price = NewFuelPurchaseRequest {
        date: "2025-03-10".to_string(),
        liters: 100.0,
        price_per_liter: -0.5,
        document_ref: Some("ticket-2".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        ctx.ledger.submit_fuel_purchase(&ctx.manager, bad_price).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn duty_hours_second_entry_overwrites_same_day() {
    let ctx = setup().await;

    ctx.ledger
        .submit_duty_hours(
            &ctx.driver_user,
            NewDutyHoursRequest {
                date: "2025-03-10".to_string(),
                driving_hours: 8.0,
                availability_hours: 1.0,
                rest_hours: None,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = ctx
        .ledger
        .submit_duty_hours(
            &ctx.driver_user,
            NewDutyHoursRequest {
                date: "2025-03-10".to_string(),
                driving_hours: 9.5,
                availability_hours: 0.5,
                rest_hours: Some(10.0),
                comment: Some("Retención en la A-3".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!((updated.driving_hours - 9.5).abs() < 1e-9);

    let repo = DutyHoursRepository::new(ctx.pool.clone());
    let records = repo
        .window(ctx.driver_id, "2025-03-10", "2025-03-10")
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!((records[0].driving_hours - 9.5).abs() < 1e-9);
    assert!((records[0].rest_hours - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn duty_hours_rest_defaults_to_eleven() {
    let ctx = setup().await;

    let record = ctx
        .ledger
        .submit_duty_hours(
            &ctx.driver_user,
            NewDutyHoursRequest {
                date: "2025-03-12".to_string(),
                driving_hours: 7.0,
                availability_hours: 2.0,
                rest_hours: None,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!((record.rest_hours - 11.0).abs() < 1e-9);
}

#[tokio::test]
async fn unlinked_driver_user_falls_back_to_lowest_driver() {
    let ctx = setup().await;

    // Mohsin se siembra sin conductor enlazado
    let users = UserRepository::new(ctx.pool.clone());
    let mohsin = users
        .find_by_credentials("Mohsin", "1111")
        .await
        .unwrap()
        .expect("usuario driver sembrado");
    assert_eq!(mohsin.driver_id, None);

    let record = ctx
        .ledger
        .submit_duty_hours(
            &mohsin,
            NewDutyHoursRequest {
                date: "2025-03-14".to_string(),
                driving_hours: 6.0,
                availability_hours: 1.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Carlos es el conductor de id más bajo
    assert_eq!(record.driver_id, ctx.driver_id);
}

#[tokio::test]
async fn duplicate_plate_is_a_conflict() {
    let ctx = setup().await;

    let trucks = TruckRepository::new(ctx.pool.clone());
    let result = trucks.create("1234-ABC", None).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let ctx = setup().await;

    let drivers = DriverRepository::new(ctx.pool.clone());
    let second = drivers.create("Carlos II", None, None).await.unwrap();

    let users = UserRepository::new(ctx.pool.clone());
    let result = users.create_driver_user("Carlos", "3333", second.id).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}
