//! Database Models

// Serde helpers
pub mod serde_helpers;

// Restaurant domain
pub mod restaurant;

// Bookings
pub mod booking;

// Gift cards
pub mod gift_card;

// Re-exports
pub use booking::{
    Booking, BookingCreate, BookingStatus, BookingStatusUpdate, BookingWithRestaurant,
    RestaurantSummary,
};
pub use gift_card::{
    GiftCard, GiftCardConfirm, GiftCardError, GiftCardFilter, GiftCardPurchase, GiftCardRedeem,
    GiftCardStatus,
};
pub use restaurant::{
    BookingConfig, BookingConfigUpdate, ConfigError, Contact, GiftCardSettings, RegularSchedule,
    Restaurant, SpecialDate, Table, TimeSlot, WEEKDAY_NAMES, weekday_name,
};
