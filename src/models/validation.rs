use super::{
    BookingForm, SelectedPet, ServiceType, TimeOfDay, UpdateBookingRequest, ValidationError,
    ValidationResult,
};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MIN_PETS_PER_BOOKING: usize = 1;
pub const MAX_PETS_PER_BOOKING: usize = 20;
pub const MAX_NOTES_LENGTH: usize = 1000;
pub const MAX_ID_LENGTH: usize = 100;
pub const MAX_SPECIES_LENGTH: usize = 50;

/// Submit-time validation of the booking form. Runs before any network call.
impl Validate for BookingForm {
    fn validate(&self) -> ValidationResult<()> {
        validate_service_type(&self.service_type)?;

        if self.date.is_none() {
            return Err(ValidationError::RequiredField {
                field: "date".to_string(),
            });
        }

        let start = validate_time_of_day("start_time", &self.start_time)?;
        let end = validate_time_of_day("end_time", &self.end_time)?;
        validate_time_range(start, end)?;

        validate_pet_selection(&self.pets)?;
        validate_notes(&self.notes)?;
        Ok(())
    }
}

impl Validate for UpdateBookingRequest {
    fn validate(&self) -> ValidationResult<()> {
        if self.status.is_none() && self.sitter.is_none() && self.notes.is_none() {
            return Err(ValidationError::InvalidValue {
                field: "update".to_string(),
                value: "{}".to_string(),
                reason: "At least one of status, sitter or notes must be provided".to_string(),
            });
        }
        if let Some(sitter) = &self.sitter {
            validate_id("sitter", sitter)?;
        }
        if let Some(notes) = &self.notes {
            validate_notes(notes)?;
        }
        Ok(())
    }
}

/// Validate that the service type is one of the bookable categories
pub fn validate_service_type(service_type: &str) -> ValidationResult<ServiceType> {
    if service_type.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: "service_type".to_string(),
        });
    }

    service_type
        .parse()
        .map_err(|reason| ValidationError::InvalidValue {
            field: "service_type".to_string(),
            value: service_type.to_string(),
            reason,
        })
}

/// Validate a required `HH:MM` time field
pub fn validate_time_of_day(field: &str, value: &str) -> ValidationResult<TimeOfDay> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    value.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        expected: "HH:MM (24-hour clock)".to_string(),
    })
}

/// Reject a same-day range whose end is not strictly after its start
pub fn validate_time_range(start: TimeOfDay, end: TimeOfDay) -> ValidationResult<()> {
    if end <= start {
        return Err(ValidationError::InvalidTimeRange {
            start_time: start.to_string(),
            end_time: end.to_string(),
        });
    }
    Ok(())
}

/// Validate the selected pets
pub fn validate_pet_selection(pets: &[SelectedPet]) -> ValidationResult<()> {
    if pets.len() < MIN_PETS_PER_BOOKING {
        return Err(ValidationError::RequiredField {
            field: "pets".to_string(),
        });
    }

    if pets.len() > MAX_PETS_PER_BOOKING {
        return Err(ValidationError::OutOfRange {
            field: "pets".to_string(),
            min: MIN_PETS_PER_BOOKING.to_string(),
            max: MAX_PETS_PER_BOOKING.to_string(),
            value: pets.len().to_string(),
        });
    }

    for (index, pet) in pets.iter().enumerate() {
        validate_id(&format!("pets[{}].id", index), &pet.id)?;

        let species = pet.species.trim();
        if species.is_empty() {
            return Err(ValidationError::RequiredField {
                field: format!("pets[{}].species", index),
            });
        }
        if species.len() > MAX_SPECIES_LENGTH {
            return Err(ValidationError::TooLong {
                field: format!("pets[{}].species", index),
                max_length: MAX_SPECIES_LENGTH,
                actual_length: species.len(),
            });
        }
    }

    Ok(())
}

/// Validate free-text booking notes
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    let length = notes.trim().chars().count();
    if length > MAX_NOTES_LENGTH {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max_length: MAX_NOTES_LENGTH,
            actual_length: length,
        });
    }
    Ok(())
}

/// Validate a backend resource identifier
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let trimmed = id.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    if trimmed.len() > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length: MAX_ID_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            expected: "Only alphanumeric characters, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::NaiveDate;

    fn valid_form() -> BookingForm {
        BookingForm {
            service_type: "pet-sitting".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            start_time: "09:00".to_string(),
            end_time: "11:00".to_string(),
            pets: vec![SelectedPet {
                id: "pet-1".to_string(),
                name: Some("Biscuit".to_string()),
                species: "dog".to_string(),
            }],
            notes: String::new(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let form = BookingForm {
            start_time: "10:00".to_string(),
            end_time: "09:00".to_string(),
            ..valid_form()
        };

        // The estimator still wraps this range around midnight
        assert!(!form.estimate().is_zero());

        match form.validate() {
            Err(ValidationError::InvalidTimeRange { start_time, end_time }) => {
                assert_eq!(start_time, "10:00");
                assert_eq!(end_time, "09:00");
            }
            other => panic!("Expected InvalidTimeRange, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_times_are_rejected() {
        let form = BookingForm {
            end_time: "09:00".to_string(),
            ..valid_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_sub_minute_range_is_accepted_and_billed_minimum() {
        let form = BookingForm {
            start_time: "10:00:30".to_string(),
            end_time: "10:00:59".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());

        let estimate = form.estimate();
        assert!(!estimate.wrapped_overnight);
        assert_eq!(estimate.total, rust_decimal_macros::dec!(25));
    }

    #[test]
    fn test_overnight_same_day_range_is_rejected() {
        let form = BookingForm {
            service_type: "overnight".to_string(),
            start_time: "22:00".to_string(),
            end_time: "06:00".to_string(),
            ..valid_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_validate_time_of_day() {
        assert!(validate_time_of_day("start_time", "00:00").is_ok());
        assert!(validate_time_of_day("start_time", "23:59").is_ok());

        assert_eq!(
            validate_time_of_day("start_time", ""),
            Err(ValidationError::RequiredField {
                field: "start_time".to_string()
            })
        );
        assert!(matches!(
            validate_time_of_day("start_time", "9am"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_time_of_day("end_time", "24:00").is_err());
    }

    #[test]
    fn test_validate_service_type() {
        assert_eq!(
            validate_service_type("feeding").unwrap(),
            ServiceType::Feeding
        );
        assert!(validate_service_type("grooming").is_err());
        assert!(validate_service_type("  ").is_err());
        assert!(matches!(
            validate_service_type("Overnight"),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_date_is_rejected() {
        let form = BookingForm {
            date: None,
            ..valid_form()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::RequiredField {
                field: "date".to_string()
            })
        );
    }

    #[test]
    fn test_validate_pet_selection() {
        assert!(validate_pet_selection(&[]).is_err());

        let unnamed = SelectedPet {
            id: "pet-1".to_string(),
            name: None,
            species: " ".to_string(),
        };
        assert!(validate_pet_selection(&[unnamed]).is_err());

        let too_many: Vec<SelectedPet> = (0..=MAX_PETS_PER_BOOKING)
            .map(|i| SelectedPet {
                id: format!("pet-{}", i),
                name: None,
                species: "cat".to_string(),
            })
            .collect();
        assert!(matches!(
            validate_pet_selection(&too_many),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_notes() {
        assert!(validate_notes("Water the plants too").is_ok());
        assert!(validate_notes(&"a".repeat(MAX_NOTES_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("id", "65f0c1a2b3").is_ok());
        assert!(validate_id("id", "user_42-b").is_ok());
        assert!(validate_id("id", "").is_err());
        assert!(validate_id("id", "../etc").is_err());
        assert!(validate_id("id", &"a".repeat(MAX_ID_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_update_booking_request_validation() {
        assert!(UpdateBookingRequest::default().validate().is_err());

        let assign = UpdateBookingRequest {
            sitter: Some("sitter-7".to_string()),
            status: Some(BookingStatus::Confirmed),
            notes: None,
        };
        assert!(assign.validate().is_ok());

        let bad_sitter = UpdateBookingRequest {
            sitter: Some("sitter 7".to_string()),
            ..Default::default()
        };
        assert!(bad_sitter.validate().is_err());
    }
}
