use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    estimate_cost, BookingStatus, CostEstimate, ServiceType, TimeOfDay, ValidationError,
    ValidationResult,
};

/// A pet chosen for the booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPet {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub species: String,
}

/// Immutable state of the booking-creation form.
///
/// Values are kept as entered; parsing happens in the estimator and at submit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub service_type: String,
    pub date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub pets: Vec<SelectedPet>,
    pub notes: String,
}

/// Discrete updates applied to a `BookingForm`
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    SetServiceType(String),
    SetDate(Option<NaiveDate>),
    SetStartTime(String),
    SetEndTime(String),
    SelectPet(SelectedPet),
    DeselectPet(String),
    SetNotes(String),
    Reset,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            service_type: ServiceType::default().to_string(),
            date: None,
            start_time: String::new(),
            end_time: String::new(),
            pets: Vec::new(),
            notes: String::new(),
        }
    }
}

impl BookingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next form state for an action
    pub fn apply(&self, action: FormAction) -> Self {
        let mut next = self.clone();
        match action {
            FormAction::SetServiceType(service_type) => next.service_type = service_type,
            FormAction::SetDate(date) => next.date = date,
            FormAction::SetStartTime(time) => next.start_time = time,
            FormAction::SetEndTime(time) => next.end_time = time,
            FormAction::SelectPet(pet) => {
                if !next.pets.iter().any(|p| p.id == pet.id) {
                    next.pets.push(pet);
                }
            }
            FormAction::DeselectPet(id) => next.pets.retain(|p| p.id != id),
            FormAction::SetNotes(notes) => next.notes = notes,
            FormAction::Reset => next = Self::default(),
        }
        next
    }

    /// Current cost estimate for the form
    pub fn estimate(&self) -> CostEstimate {
        estimate_cost(
            &self.service_type,
            &self.start_time,
            &self.end_time,
            self.pets.len(),
        )
    }

    pub fn pet_ids(&self) -> Vec<&str> {
        self.pets.iter().map(|p| p.id.as_str()).collect()
    }

    /// Build the backend payload. Expects a form that has passed validation.
    pub fn to_create_request(
        &self,
        estimate: &CostEstimate,
    ) -> ValidationResult<CreateBookingRequest> {
        let service_type: ServiceType = self.service_type.parse().map_err(|reason: String| {
            ValidationError::InvalidValue {
                field: "service_type".to_string(),
                value: self.service_type.clone(),
                reason,
            }
        })?;

        let date = self.date.ok_or_else(|| ValidationError::RequiredField {
            field: "date".to_string(),
        })?;

        let start = parse_time_field("start_time", &self.start_time)?;
        let end = parse_time_field("end_time", &self.end_time)?;
        let day = date.format("%Y-%m-%d").to_string();

        Ok(CreateBookingRequest {
            start_date: format!("{}T{}", day, start),
            end_date: format!("{}T{}", day, end),
            service_type,
            number_of_pets: self.pets.len() as u32,
            pet_types: self.pets.iter().map(|p| p.species.clone()).collect(),
            notes: self.notes.clone(),
            total_amount: estimate.total,
        })
    }
}

fn parse_time_field(field: &str, value: &str) -> ValidationResult<TimeOfDay> {
    value.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        expected: "HH:MM".to_string(),
    })
}

/// Payload of `POST /bookings` on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub start_date: String,
    pub end_date: String,
    pub service_type: ServiceType,
    pub number_of_pets: u32,
    pub pet_types: Vec<String>,
    pub notes: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// Booking as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    pub start_date: String,
    pub end_date: String,
    pub service_type: ServiceType,
    #[serde(default)]
    pub number_of_pets: u32,
    #[serde(default)]
    pub pet_types: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Partial update of a booking: sitter assignment, status change or notes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pet(id: &str, species: &str) -> SelectedPet {
        SelectedPet {
            id: id.to_string(),
            name: None,
            species: species.to_string(),
        }
    }

    #[test]
    fn test_form_reducer() {
        let form = BookingForm::new()
            .apply(FormAction::SetServiceType("overnight".to_string()))
            .apply(FormAction::SetStartTime("22:00".to_string()))
            .apply(FormAction::SetEndTime("06:00".to_string()))
            .apply(FormAction::SelectPet(pet("p1", "dog")))
            .apply(FormAction::SelectPet(pet("p2", "cat")));

        assert_eq!(form.pet_ids(), vec!["p1", "p2"]);
        assert_eq!(form.estimate().total, dec!(1200));

        let form = form.apply(FormAction::DeselectPet("p2".to_string()));
        assert_eq!(form.estimate().total, dec!(600));

        let reset = form.apply(FormAction::Reset);
        assert_eq!(reset, BookingForm::default());
        assert!(reset.estimate().is_zero());
    }

    #[test]
    fn test_selecting_same_pet_twice_is_noop() {
        let form = BookingForm::new()
            .apply(FormAction::SelectPet(pet("p1", "dog")))
            .apply(FormAction::SelectPet(pet("p1", "dog")));
        assert_eq!(form.pets.len(), 1);
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let original = BookingForm::new();
        let _next = original.apply(FormAction::SetNotes("Feed at 6".to_string()));
        assert!(original.notes.is_empty());
    }

    #[test]
    fn test_to_create_request() {
        let form = BookingForm {
            service_type: "dog-walking".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            start_time: "09:00".to_string(),
            end_time: "10:30".to_string(),
            pets: vec![pet("p1", "dog"), pet("p2", "dog")],
            notes: "Leash by the door".to_string(),
        };

        let estimate = form.estimate();
        let request = form.to_create_request(&estimate).unwrap();

        assert_eq!(request.start_date, "2024-05-01T09:00");
        assert_eq!(request.end_date, "2024-05-01T10:30");
        assert_eq!(request.service_type, ServiceType::DogWalking);
        assert_eq!(request.number_of_pets, 2);
        assert_eq!(request.pet_types, vec!["dog", "dog"]);
        assert_eq!(request.total_amount, dec!(60));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["startDate"], "2024-05-01T09:00");
        assert_eq!(json["numberOfPets"], 2);
        assert_eq!(json["totalAmount"], serde_json::json!(60.0));
    }

    #[test]
    fn test_booking_deserializes_backend_shape() {
        let json = serde_json::json!({
            "_id": "65f0c1",
            "startDate": "2024-05-01T09:00:00.000Z",
            "endDate": "2024-05-01T11:00:00.000Z",
            "serviceType": "pet-sitting",
            "numberOfPets": 1,
            "petTypes": ["cat"],
            "totalAmount": 50,
            "status": "confirmed",
            "sitter": "u42"
        });

        let booking: Booking = serde_json::from_value(json).unwrap();
        assert_eq!(booking.id, "65f0c1");
        assert_eq!(booking.total_amount, dec!(50));
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.sitter.as_deref(), Some("u42"));
        assert!(booking.notes.is_empty());
    }

    #[test]
    fn test_form_deserializes_with_defaults() {
        let form: BookingForm = serde_json::from_str(r#"{"start_time": "09:00"}"#).unwrap();
        assert_eq!(form.service_type, "pet-sitting");
        assert_eq!(form.start_time, "09:00");
        assert!(form.pets.is_empty());
    }
}
