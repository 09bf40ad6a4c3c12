//! Booking Engine Errors

use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

/// 预订流程的类型化错误
///
/// 所有校验错误都在任何写入之前发现；
/// 确认码冲突在内部重试，从不向调用方暴露。
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Restaurant {0} not found")]
    RestaurantNotFound(String),

    #[error("Booking {0} not found")]
    BookingNotFound(String),

    #[error("Number of guests must be between {min} and {max}")]
    GuestCountOutOfRange { min: u32, max: u32 },

    #[error("Bookings can only be made up to {days} days in advance")]
    BookingWindowExceeded { days: u32 },

    #[error("Selected time slot is not available")]
    SlotUnavailable,

    #[error("Not enough free table capacity (remaining: {free_capacity})")]
    InsufficientCapacity { free_capacity: u32 },

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::RestaurantNotFound(_) | BookingError::BookingNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            BookingError::GuestCountOutOfRange { .. }
            | BookingError::BookingWindowExceeded { .. }
            | BookingError::SlotUnavailable => AppError::Validation(err.to_string()),
            BookingError::InsufficientCapacity { .. } | BookingError::AlreadyCancelled => {
                AppError::BusinessRule(err.to_string())
            }
            BookingError::InvalidRequest(msg) => AppError::Invalid(msg),
            BookingError::Repo(RepoError::NotFound(msg)) => AppError::NotFound(msg),
            BookingError::Repo(RepoError::Validation(msg)) => AppError::Validation(msg),
            BookingError::Repo(RepoError::Duplicate(msg)) => AppError::Conflict(msg),
            BookingError::Repo(RepoError::Database(msg)) => AppError::Database(msg),
        }
    }
}
