// Services module - business logic layer

pub mod booking_service;
pub mod form_session;

pub use booking_service::BookingService;
pub use form_session::FormSession;
