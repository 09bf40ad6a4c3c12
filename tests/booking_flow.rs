//! 预订全流程集成测试
//!
//! 使用内存数据库 + 种子演示餐厅，走 BookingService 的完整
//! 读-算-写路径：排期校验、桌台分配、取消释放容量、并发安全。

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use reserva_server::booking::{BookingError, BookingService};
use reserva_server::core::state::SlotLocks;
use reserva_server::db::models::{BookingCreate, BookingStatus};
use reserva_server::db::seed::{DEMO_SLUG, seed_demo_restaurant};
use reserva_server::db::DbService;
use reserva_server::services::NotificationService;

async fn setup() -> BookingService {
    let db = DbService::in_memory().await.expect("in-memory db");
    seed_demo_restaurant(&db.db).await.expect("seed");
    BookingService::new(
        db.db,
        Arc::new(SlotLocks::new()),
        Arc::new(NotificationService::new(None)),
    )
}

/// 明天起第一个营业的晚市日 (周二至周六有 20:00 时段)
fn next_dinner_date() -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while matches!(date.weekday(), Weekday::Mon | Weekday::Sun) {
        date += Duration::days(1);
    }
    date
}

/// 明天起第一个周一 (演示餐厅闭店日)
fn next_monday() -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != Weekday::Mon {
        date += Duration::days(1);
    }
    date
}

fn make_request(date: NaiveDate, time: &str, guests: u32) -> BookingCreate {
    BookingCreate {
        restaurant_id: DEMO_SLUG.to_string(),
        customer_name: "Carlos Ruiz".to_string(),
        customer_email: "carlos@example.com".to_string(),
        customer_phone: "+34 600 000 001".to_string(),
        date,
        time: time.to_string(),
        guests,
        special_requests: None,
    }
}

#[tokio::test]
async fn test_create_booking_assigns_smallest_table() {
    let service = setup().await;
    let booking = service
        .create_booking(make_request(next_dinner_date(), "20:00", 2))
        .await
        .expect("booking should succeed");

    // 桌台按 (容量, 桌号) 升序选取：2 人占最小的两人桌
    assert_eq!(booking.tables, vec![1]);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.confirmation_code.len(), 8);
}

#[tokio::test]
async fn test_large_party_combines_small_tables() {
    let service = setup().await;
    let booking = service
        .create_booking(make_request(next_dinner_date(), "20:00", 10))
        .await
        .expect("booking should succeed");

    // 贪心组合：2+2+2+4 恰好覆盖 10 人
    assert_eq!(booking.tables, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_fallback_to_single_larger_table() {
    let service = setup().await;
    let booking = service
        .create_booking(make_request(next_dinner_date(), "20:00", 8))
        .await
        .expect("booking should succeed");

    // 贪心在 2+2+2 后剩 2 人无桌可配，回退到最小的 8 人桌
    assert_eq!(booking.tables, vec![9]);
}

#[tokio::test]
async fn test_insufficient_capacity_reports_free_seats() {
    let service = setup().await;
    let date = next_dinner_date();

    // 第一桌 10 人占掉 1-4 号桌 (2+2+2+4)
    service
        .create_booking(make_request(date, "20:00", 10))
        .await
        .expect("first booking");

    // 剩余 4,4,6,6,8,8：贪心凑不齐 10 且无单桌 >= 10
    let err = service
        .create_booking(make_request(date, "20:00", 10))
        .await
        .expect_err("second booking should fail");
    assert!(matches!(
        err,
        BookingError::InsufficientCapacity { free_capacity: 36 }
    ));
}

#[tokio::test]
async fn test_guest_count_out_of_range() {
    let service = setup().await;
    let err = service
        .create_booking(make_request(next_dinner_date(), "20:00", 11))
        .await
        .expect_err("11 guests exceeds max");
    assert!(matches!(
        err,
        BookingError::GuestCountOutOfRange { min: 1, max: 10 }
    ));
}

#[tokio::test]
async fn test_booking_window_enforced() {
    let service = setup().await;
    let too_far = Utc::now().date_naive() + Duration::days(31);
    let err = service
        .create_booking(make_request(too_far, "20:00", 2))
        .await
        .expect_err("beyond advance window");
    assert!(matches!(err, BookingError::BookingWindowExceeded { days: 30 }));

    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let err = service
        .create_booking(make_request(yesterday, "20:00", 2))
        .await
        .expect_err("past date");
    assert!(matches!(err, BookingError::BookingWindowExceeded { .. }));
}

#[tokio::test]
async fn test_closed_day_and_unknown_slot_unavailable() {
    let service = setup().await;

    let err = service
        .create_booking(make_request(next_monday(), "20:00", 2))
        .await
        .expect_err("monday is closed");
    assert!(matches!(err, BookingError::SlotUnavailable));

    let err = service
        .create_booking(make_request(next_dinner_date(), "19:00", 2))
        .await
        .expect_err("19:00 is not a published slot");
    assert!(matches!(err, BookingError::SlotUnavailable));
}

#[tokio::test]
async fn test_cancel_releases_capacity() {
    let service = setup().await;
    let date = next_dinner_date();

    // 两个 8 人桌都占掉后第三桌 8 人分配不出来
    let first = service
        .create_booking(make_request(date, "20:00", 8))
        .await
        .expect("first");
    service
        .create_booking(make_request(date, "20:00", 8))
        .await
        .expect("second");
    let err = service
        .create_booking(make_request(date, "20:00", 8))
        .await
        .expect_err("no single table seats 8");
    assert!(matches!(err, BookingError::InsufficientCapacity { .. }));

    // 取消第一桌后桌台回到空闲集合
    let id = first.id.as_ref().expect("persisted id").to_string();
    let cancelled = service.cancel(&id).await.expect("cancel");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let retry = service
        .create_booking(make_request(date, "20:00", 8))
        .await
        .expect("freed table should be reusable");
    assert_eq!(retry.tables, first.tables);
}

#[tokio::test]
async fn test_cancel_twice_reports_already_cancelled() {
    let service = setup().await;
    let booking = service
        .create_booking(make_request(next_dinner_date(), "20:00", 2))
        .await
        .expect("booking");

    let id = booking.id.as_ref().expect("persisted id").to_string();
    service.cancel(&id).await.expect("first cancel");
    let err = service.cancel(&id).await.expect_err("second cancel");
    assert!(matches!(err, BookingError::AlreadyCancelled));
}

#[tokio::test]
async fn test_slots_are_independent() {
    let service = setup().await;
    let date = next_dinner_date();

    service
        .create_booking(make_request(date, "20:00", 10))
        .await
        .expect("dinner booking");

    // 同一天另一个时段不受影响
    let lunch = service
        .create_booking(make_request(date, "13:00", 10))
        .await
        .expect("lunch booking");
    assert_eq!(lunch.tables, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_availability_projection() {
    let service = setup().await;
    let date = next_dinner_date();

    let day = service.availability(DEMO_SLUG, date).await.expect("availability");
    assert_eq!(day.time_slots.len(), 6);
    for slot in &day.time_slots {
        assert_eq!(slot.capacity, 46);
        assert_eq!(slot.available_tables.len(), 10);
    }

    // 8 人桌被占后只在对应时段消失
    service
        .create_booking(make_request(date, "20:00", 8))
        .await
        .expect("booking");
    let day = service.availability(DEMO_SLUG, date).await.expect("availability");
    let dinner = day
        .time_slots
        .iter()
        .find(|s| s.hour == "20:00")
        .expect("20:00 slot");
    assert_eq!(dinner.capacity, 38);
    assert!(!dinner.available_tables.contains(&9));

    let lunch = day
        .time_slots
        .iter()
        .find(|s| s.hour == "13:00")
        .expect("13:00 slot");
    assert_eq!(lunch.capacity, 46);
}

#[tokio::test]
async fn test_availability_on_closed_day_is_empty() {
    let service = setup().await;
    let day = service
        .availability(DEMO_SLUG, next_monday())
        .await
        .expect("availability");
    assert!(day.time_slots.is_empty());
}

#[tokio::test]
async fn test_confirmation_code_lookup() {
    let service = setup().await;
    let booking = service
        .create_booking(make_request(next_dinner_date(), "20:00", 4))
        .await
        .expect("booking");

    let found = service
        .find_by_confirmation_code(&booking.confirmation_code)
        .await
        .expect("lookup");
    assert_eq!(found.booking.confirmation_code, booking.confirmation_code);
    let restaurant = found.restaurant.expect("restaurant summary");
    assert_eq!(restaurant.name, "La Maison Gourmet");

    let err = service
        .find_by_confirmation_code("NOPE0000")
        .await
        .expect_err("unknown code");
    assert!(matches!(err, BookingError::BookingNotFound(_)));
}

#[tokio::test]
async fn test_unknown_restaurant_rejected() {
    let service = setup().await;
    let mut req = make_request(next_dinner_date(), "20:00", 2);
    req.restaurant_id = "no-such-restaurant".to_string();
    let err = service.create_booking(req).await.expect_err("unknown slug");
    assert!(matches!(err, BookingError::RestaurantNotFound(_)));
}

/// 并发创建同一时段的预订：成功的预订之间桌台不得重叠
#[tokio::test]
async fn test_concurrent_bookings_never_share_tables() {
    let service = setup().await;
    let date = next_dinner_date();

    let mut handles = Vec::new();
    for i in 0..12 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let mut req = make_request(date, "21:00", 4);
            req.customer_email = format!("guest{i}@example.com");
            service.create_booking(req).await
        }));
    }

    let mut seen = BTreeSet::new();
    let mut succeeded = 0u32;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(booking) => {
                succeeded += 1;
                for table in booking.tables {
                    assert!(seen.insert(table), "table {table} allocated twice");
                }
            }
            Err(BookingError::InsufficientCapacity { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    // 46 座、每桌 4 人：至少能安排进前几桌
    assert!(succeeded >= 2, "expected some bookings to succeed");
}
