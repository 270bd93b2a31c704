use chrono::{NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ServiceType;

const MINUTES_PER_HOUR: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * MINUTES_PER_HOUR;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Wall-clock time of day entered as `HH:MM` (or `HH:MM:SS`), without date
/// or timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    /// Seconds elapsed since midnight, including any seconds component
    pub fn seconds_since_midnight(&self) -> i64 {
        i64::from(self.0.num_seconds_from_midnight())
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(TimeOfDay)
            .map_err(|_| format!("Invalid time of day: {}", s))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Derived, non-persisted cost estimate for an in-progress booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub service_type: ServiceType,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_rate: Decimal,
    /// Billed hours, rounded to two decimals for display
    #[serde(with = "rust_decimal::serde::float")]
    pub hours: Decimal,
    pub pet_multiplier: u32,
    pub wrapped_overnight: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl CostEstimate {
    /// The result reported while the form is incomplete or unparseable
    pub fn zero(service_type: ServiceType) -> Self {
        Self {
            service_type,
            base_rate: service_type.base_rate(),
            hours: Decimal::ZERO,
            pet_multiplier: 0,
            wrapped_overnight: false,
            total: Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero()
    }
}

/// Estimate the cost of a booking from raw form values.
///
/// Empty or malformed times and an empty pet selection yield a zero estimate.
/// An end time at or before the start time is taken to cross midnight.
pub fn estimate_cost(
    service_type: &str,
    start_time: &str,
    end_time: &str,
    pet_count: usize,
) -> CostEstimate {
    let service_type = ServiceType::from_str_lenient(service_type);

    if start_time.trim().is_empty() || end_time.trim().is_empty() || pet_count == 0 {
        return CostEstimate::zero(service_type);
    }

    match (start_time.parse::<TimeOfDay>(), end_time.parse::<TimeOfDay>()) {
        (Ok(start), Ok(end)) => estimate_for_times(service_type, start, end, pet_count),
        _ => CostEstimate::zero(service_type),
    }
}

/// Estimate the cost for already parsed inputs
pub fn estimate_for_times(
    service_type: ServiceType,
    start: TimeOfDay,
    end: TimeOfDay,
    pet_count: usize,
) -> CostEstimate {
    if pet_count == 0 {
        return CostEstimate::zero(service_type);
    }

    let base_rate = service_type.base_rate();
    let pet_multiplier = u32::try_from(pet_count).unwrap_or(u32::MAX).max(1);

    let mut seconds = end.seconds_since_midnight() - start.seconds_since_midnight();
    let wrapped_overnight = seconds <= 0;
    if wrapped_overnight {
        seconds += SECONDS_PER_DAY;
    }

    let hours = (Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)).max(dec!(1));

    let total = (base_rate * hours * Decimal::from(pet_multiplier))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    CostEstimate {
        service_type,
        base_rate,
        hours: hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        pet_multiplier,
        wrapped_overnight,
        total,
    }
}
