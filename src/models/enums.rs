use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bookable service categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    PetSitting,
    DogWalking,
    Feeding,
    Overnight,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::PetSitting,
        ServiceType::DogWalking,
        ServiceType::Feeding,
        ServiceType::Overnight,
    ];

    /// Base hourly rate per pet, in dollars
    pub fn base_rate(&self) -> Decimal {
        match self {
            ServiceType::PetSitting => dec!(25),
            ServiceType::DogWalking => dec!(20),
            ServiceType::Feeding => dec!(15),
            ServiceType::Overnight => dec!(75),
        }
    }

    /// Parse a service type, falling back to pet sitting for anything unrecognized.
    pub fn from_str_lenient(s: &str) -> Self {
        s.parse().unwrap_or(ServiceType::PetSitting)
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        ServiceType::PetSitting
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::PetSitting => write!(f, "pet-sitting"),
            ServiceType::DogWalking => write!(f, "dog-walking"),
            ServiceType::Feeding => write!(f, "feeding"),
            ServiceType::Overnight => write!(f, "overnight"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact rate-table keys only, matching the serde wire names
        match s {
            "pet-sitting" => Ok(ServiceType::PetSitting),
            "dog-walking" => Ok(ServiceType::DogWalking),
            "feeding" => Ok(ServiceType::Feeding),
            "overnight" => Ok(ServiceType::Overnight),
            _ => Err(format!("Invalid service type: {}", s)),
        }
    }
}

/// Lifecycle status of a booking as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::InProgress => write!(f, "in-progress"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "in-progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}
