//! Reservation dashboard demo
//!
//! Seeds the in-memory booking service, loads every bucket, confirms and
//! cancels a reservation, then prints the dashboard statistics.

use pitchside_core::environment::SystemClock;
use pitchside_reservations::mocks::fixture;
use pitchside_reservations::{
    Config, FacilityId, FilterPatch, InMemoryReservationService, ReservationCoordinator,
    ReservationId, ReservationStatus, UserId, WeeklyChart,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn seed() -> InMemoryReservationService {
    let service = InMemoryReservationService::new();

    for id in 1..=14 {
        let status = match id % 3 {
            0 => ReservationStatus::Confirmed,
            1 => ReservationStatus::Pending,
            _ => ReservationStatus::Cancelled,
        };
        let mut reservation = fixture(id, status);
        if id % 2 == 0 {
            reservation.facility_id = FacilityId::new(2);
            reservation.facility_name = "Stade Iba Mar Diop".to_string();
        }
        reservation.registered_players = u32::try_from(4 + id % 7).unwrap_or(4);
        service.insert(reservation);
    }

    service.set_chart(WeeklyChart {
        daily_revenue: [12_000, 9_000, 15_000, 0, 21_000, 36_000, 30_000],
    });
    service
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level)?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Pitchside reservation dashboard ===\n");

    let service = seed();
    let coordinator =
        ReservationCoordinator::new(Arc::new(service.clone()), Arc::new(SystemClock), config.page_size);

    coordinator.load_all().await?.wait().await;
    for status in ReservationStatus::ALL {
        let bucket = coordinator.snapshot(status).await;
        println!(
            "{status:>9}: {} loaded of {} (more: {})",
            bucket.items.len(),
            bucket.pagination.total,
            bucket.has_more
        );
    }

    let approver = UserId::new(1);

    println!("\n>>> Confirming reservation 1");
    coordinator
        .confirm(ReservationId::new(1), approver)
        .await?
        .wait()
        .await;

    println!(">>> Cancelling reservation 3");
    coordinator
        .cancel(
            ReservationId::new(3),
            Some("Pitch under maintenance".to_string()),
            Some(approver),
        )
        .await?
        .wait()
        .await;

    println!(">>> Cancelling reservation 2 again");
    coordinator
        .cancel(ReservationId::new(2), None, Some(approver))
        .await?
        .wait()
        .await;
    if let Some(error) = coordinator.last_error().await {
        println!("    server said: {error}");
        coordinator.clear_error().await?;
    }

    println!("\n>>> Restricting to facility 2");
    coordinator
        .set_filters(FilterPatch::new().facility(FacilityId::new(2)))
        .await?
        .wait()
        .await;

    let stats = coordinator.statistics().await;
    println!("\nRevenue:         {}", stats.revenue);
    println!("Matches:         {}", stats.matches);
    println!("Players:         {} (avg {})", stats.players, stats.average_players);
    println!("Occupancy:       {}%", stats.occupancy_rate);
    println!("Popular slot:    {}", stats.popular_time);
    println!("Weekly revenue:  {:?} (total {})", stats.weekly_revenue, stats.weekly_total);
    println!(
        "Loaded:          {} ({} pending, {} confirmed, {} cancelled)",
        stats.reservations,
        stats.reservations_pending,
        stats.reservations_confirmed,
        stats.reservations_cancelled
    );

    coordinator.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
