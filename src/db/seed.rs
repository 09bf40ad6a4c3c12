//! Seed Data
//!
//! 首次启动时写入演示餐厅，幂等：slug 已存在则跳过。

use crate::core::ServerError;
use crate::db::models::{
    BookingConfig, Contact, GiftCardSettings, RegularSchedule, Restaurant, Table, TimeSlot,
};
use crate::db::repository::RestaurantRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const DEMO_SLUG: &str = "demo-restaurant";

/// Seed the demo restaurant if the store is empty
pub async fn seed_demo_restaurant(db: &Surreal<Db>) -> Result<(), ServerError> {
    let repo = RestaurantRepository::new(db.clone());

    let existing = repo
        .find_by_slug(DEMO_SLUG)
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;
    if existing.is_some() {
        return Ok(());
    }

    let restaurant = demo_restaurant();
    repo.create(restaurant)
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;
    tracing::info!("Seeded demo restaurant '{}'", DEMO_SLUG);
    Ok(())
}

/// 演示餐厅：午市 + 晚市，周一闭店，10 张桌台共 46 座
pub fn demo_restaurant() -> Restaurant {
    let lunch_and_dinner = vec![
        TimeSlot::new("13:00", 30),
        TimeSlot::new("14:00", 30),
        TimeSlot::new("15:00", 30),
        TimeSlot::new("20:00", 30),
        TimeSlot::new("21:00", 30),
        TimeSlot::new("22:00", 30),
    ];
    let lunch_only = vec![
        TimeSlot::new("13:00", 30),
        TimeSlot::new("14:00", 30),
        TimeSlot::new("15:00", 30),
    ];

    Restaurant {
        id: None,
        slug: DEMO_SLUG.to_string(),
        name: "La Maison Gourmet".to_string(),
        slogan: Some("Una experiencia culinaria extraordinaria".to_string()),
        description: Some(
            "Descubre la fusión perfecta entre la cocina tradicional y la innovación moderna"
                .to_string(),
        ),
        contact: Contact {
            phone: Some("+34 912 345 678".to_string()),
            email: Some("reservas@lamaisongourmet.com".to_string()),
            address: Some("Calle Principal 123, 28001 Madrid".to_string()),
        },
        gift_cards: GiftCardSettings::default(),
        booking_config: BookingConfig {
            regular_schedule: RegularSchedule {
                monday: vec![],
                tuesday: lunch_and_dinner.clone(),
                wednesday: lunch_and_dinner.clone(),
                thursday: lunch_and_dinner.clone(),
                friday: lunch_and_dinner.clone(),
                saturday: lunch_and_dinner,
                sunday: lunch_only,
            },
            special_dates: vec![],
            tables: vec![
                Table::new(1, 2),
                Table::new(2, 2),
                Table::new(3, 2),
                Table::new(4, 4),
                Table::new(5, 4),
                Table::new(6, 4),
                Table::new(7, 6),
                Table::new(8, 6),
                Table::new(9, 8),
                Table::new(10, 8),
            ],
            min_guests_per_booking: 1,
            max_guests_per_booking: 10,
            advance_booking_days: 30,
            closed_days: vec!["monday".to_string()],
            default_booking_duration: Some(120),
            special_notes: Some(
                "Para grupos mayores de 6 personas, por favor contactar directamente".to_string(),
            ),
        },
        is_active: true,
    }
}
