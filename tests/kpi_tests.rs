//! Tests de integración del motor de costes y los KPIs mensuales

use sqlx::SqlitePool;

use fleet_ledger::database;
use fleet_ledger::models::duty_hours::NewDutyHoursRequest;
use fleet_ledger::models::fuel::NewFuelPurchaseRequest;
use fleet_ledger::models::settings::{keys, UpdateSettingsRequest};
use fleet_ledger::models::trip::NewTripRequest;
use fleet_ledger::models::user::User;
use fleet_ledger::repositories::{DriverRepository, SettingsRepository, TruckRepository, UserRepository};
use fleet_ledger::services::{CostService, ExportService, LedgerService, Scope};

struct TestContext {
    pool: SqlitePool,
    ledger: LedgerService,
    costs: CostService,
    manager: User,
    driver_id: i64,
    truck_id: i64,
}

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

    let trucks = TruckRepository::new(pool.clone());
    let truck = trucks.create("1234-ABC", None).await.unwrap();

    TestContext {
        ledger: LedgerService::new(pool.clone()),
        costs: CostService::new(pool.clone()),
        pool,
        manager,
        driver_id: driver.id,
        truck_id: truck.id,
    }
}

fn trip_request(ctx: &TestContext, date: &str) -> NewTripRequest {
    NewTripRequest {
        departure_date: date.to_string(),
        arrival_date: date.to_string(),
        origin: "Madrid".to_string(),
        destination: "Valencia".to_string(),
        truck_id: Some(ctx.truck_id),
        driver_id: Some(ctx.driver_id),
        ..Default::default()
    }
}

/// Carga un mes completo: un tramo cargado de 100 km con 5 € de peajes,
/// uno vacío de 50 km, un repostaje de 50 € y un parte de horas.
async fn load_march(ctx: &TestContext) {
    ctx.ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(0.0),
                odometer_end: Some(100.0),
                toll_cost: Some(5.0),
                ..trip_request(ctx, "2025-03-05")
            },
        )
        .await
        .unwrap();

    ctx.ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                leg_type: Some("EMPTY".to_string()),
                odometer_start: Some(100.0),
                odometer_end: Some(150.0),
                ..trip_request(ctx, "2025-03-06")
            },
        )
        .await
        .unwrap();

    ctx.ledger
        .submit_fuel_purchase(
            &ctx.manager,
            NewFuelPurchaseRequest {
                date: "2025-03-06".to_string(),
                truck_id: Some(ctx.truck_id),
                driver_id: Some(ctx.driver_id),
                liters: 50.0,
                price_per_liter: 1.0,
                document_ref: Some("ticket-1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    ctx.ledger
        .submit_duty_hours(
            &ctx.manager,
            NewDutyHoursRequest {
                date: "2025-03-05".to_string(),
                driver_id: Some(ctx.driver_id),
                driving_hours: 9.0,
                availability_hours: 2.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn monthly_kpis_aggregate_trips_fuel_and_hours() {
    let ctx = setup().await;
    load_march(&ctx).await;

    let kpis = ctx.costs.monthly_kpis("2025-03", &Scope::All).await.unwrap();

    assert!((kpis.total_km - 150.0).abs() < 1e-9);
    assert!((kpis.empty_km - 50.0).abs() < 1e-9);
    assert!((kpis.empty_ratio_pct - 33.333333).abs() < 1e-3);
    // 100 km cargados a 0.95 €/km
    assert!((kpis.revenue - 95.0).abs() < 1e-9);
    assert!((kpis.variable_cost - 5.0).abs() < 1e-9);
    // Fijos por defecto: 5430 €/mes sobre 12000 km objetivo
    assert!((kpis.fixed_cost_per_km - 0.4525).abs() < 1e-9);
    assert!((kpis.allocated_fixed_cost - 150.0 * 0.4525).abs() < 1e-9);
    assert!((kpis.real_fuel_cost - 50.0).abs() < 1e-9);
    assert!((kpis.estimated_fuel_cost - 3924.0).abs() < 1e-9);
    assert!((kpis.driving_hours - 9.0).abs() < 1e-9);
    assert!((kpis.availability_hours - 2.0).abs() < 1e-9);

    let expected_net = 95.0 - (5.0 + 150.0 * 0.4525 + 50.0);
    assert!((kpis.net_profit - expected_net).abs() < 1e-9);
}

#[tokio::test]
async fn monthly_kpis_ignore_other_months() {
    let ctx = setup().await;
    load_march(&ctx).await;

    ctx.ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(150.0),
                odometer_end: Some(400.0),
                ..trip_request(&ctx, "2025-02-20")
            },
        )
        .await
        .unwrap();

    let kpis = ctx.costs.monthly_kpis("2025-03", &Scope::All).await.unwrap();
    assert!((kpis.total_km - 150.0).abs() < 1e-9);

    let february = ctx.costs.monthly_kpis("2025-02", &Scope::All).await.unwrap();
    assert!((february.total_km - 250.0).abs() < 1e-9);
}

#[tokio::test]
async fn driver_scope_narrows_kpis_to_own_rows() {
    let ctx = setup().await;
    load_march(&ctx).await;

    let drivers = DriverRepository::new(ctx.pool.clone());
    let other = drivers.create("Pedro", None, None).await.unwrap();
    ctx.ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(150.0),
                odometer_end: Some(550.0),
                driver_id: Some(other.id),
                departure_date: "2025-03-07".to_string(),
                arrival_date: "2025-03-07".to_string(),
                origin: "Zaragoza".to_string(),
                destination: "Bilbao".to_string(),
                truck_id: Some(ctx.truck_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let own = ctx
        .costs
        .monthly_kpis("2025-03", &Scope::Driver(ctx.driver_id))
        .await
        .unwrap();
    assert!((own.total_km - 150.0).abs() < 1e-9);

    let all = ctx.costs.monthly_kpis("2025-03", &Scope::All).await.unwrap();
    assert!((all.total_km - 550.0).abs() < 1e-9);
}

#[tokio::test]
async fn empty_month_yields_zeroed_kpis() {
    let ctx = setup().await;

    let kpis = ctx.costs.monthly_kpis("2024-01", &Scope::All).await.unwrap();
    assert_eq!(kpis.total_km, 0.0);
    assert_eq!(kpis.empty_ratio_pct, 0.0);
    assert_eq!(kpis.real_fuel_cost, 0.0);
    assert_eq!(kpis.driving_hours, 0.0);
}

#[tokio::test]
async fn dashboard_recent_trips_respect_scope() {
    let ctx = setup().await;
    load_march(&ctx).await;

    let drivers = DriverRepository::new(ctx.pool.clone());
    let other = drivers.create("Pedro", None, None).await.unwrap();
    ctx.ledger
        .submit_trip(
            &ctx.manager,
            NewTripRequest {
                odometer_start: Some(150.0),
                odometer_end: Some(300.0),
                driver_id: Some(other.id),
                ..trip_request(&ctx, "2025-03-08")
            },
        )
        .await
        .unwrap();

    let dashboard = ctx
        .costs
        .dashboard("2025-03", &Scope::Driver(ctx.driver_id))
        .await
        .unwrap();

    assert_eq!(dashboard.recent_trips.len(), 2);
    assert!(dashboard
        .recent_trips
        .iter()
        .all(|row| row.trip.driver_id == Some(ctx.driver_id)));
}

#[tokio::test]
async fn weekly_window_sums_only_days_inside() {
    let ctx = setup().await;

    // end-7 queda fuera de la ventana [end-6, end]
    for (date, driving) in [("2025-03-03", 4.0), ("2025-03-09", 8.0), ("2025-03-02", 10.0)] {
        ctx.ledger
            .submit_duty_hours(
                &ctx.manager,
                NewDutyHoursRequest {
                    date: date.to_string(),
                    driver_id: Some(ctx.driver_id),
                    driving_hours: driving,
                    availability_hours: 1.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let week = ctx
        .costs
        .weekly_duty_hours(ctx.driver_id, "2025-03-09")
        .await
        .unwrap();

    assert_eq!(week.start_date, "2025-03-03");
    assert_eq!(week.days.len(), 2);
    assert!((week.driving_hours - 12.0).abs() < 1e-9);
    assert!((week.availability_hours - 2.0).abs() < 1e-9);
    // 11 h de descanso por defecto en cada parte
    assert!((week.rest_hours - 22.0).abs() < 1e-9);
}

#[tokio::test]
async fn settings_update_changes_derived_costs() {
    let ctx = setup().await;

    let settings = SettingsRepository::new(ctx.pool.clone());
    settings
        .apply_update(&UpdateSettingsRequest {
            target_km_month: Some(1000.0),
            tariff_per_km: Some(1.5),
            ..Default::default()
        })
        .await
        .unwrap();

    let kpis = ctx.costs.monthly_kpis("2025-03", &Scope::All).await.unwrap();
    assert!((kpis.fixed_cost_per_km - 5430.0 / 1000.0).abs() < 1e-9);
    assert!((kpis.tariff_per_km - 1.5).abs() < 1e-9);
}

#[tokio::test]
async fn unparsable_setting_falls_back_to_default() {
    let ctx = setup().await;

    sqlx::query("UPDATE settings SET value = 'abc' WHERE key = ?")
        .bind(keys::TARIFF_PER_KM)
        .execute(&ctx.pool)
        .await
        .unwrap();

    let settings = SettingsRepository::new(ctx.pool.clone());
    let tariff = settings.get_f64(keys::TARIFF_PER_KM, 0.95).await.unwrap();
    assert!((tariff - 0.95).abs() < 1e-9);
}

#[tokio::test]
async fn csv_export_contains_labels_and_header() {
    let ctx = setup().await;
    load_march(&ctx).await;

    let export = ExportService::new(ctx.pool.clone());
    let bytes = export.trips_csv().await.unwrap();
    let text = String::from_utf8(bytes).unwrap();

    let mut lines = text.lines();
    let header = lines.next().expect("cabecera CSV");
    assert!(header.contains("leg_type"));
    assert!(header.contains("truck_plate"));

    assert_eq!(lines.count(), 2);
    assert!(text.contains("1234-ABC"));
    assert!(text.contains("Carlos"));
}
