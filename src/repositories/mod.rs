// Repositories module - data access layer

pub mod booking_repository;


pub use booking_repository::{BookingRepository, HttpBookingRepository};
