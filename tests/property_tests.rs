use petsit_rs::models::{
    estimate_cost, validate_time_range, BookingForm, FormAction, SelectedPet, ServiceType,
    TimeOfDay,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

prop_compose! {
    fn arb_service_type()(service_type in prop_oneof![
        Just(ServiceType::PetSitting),
        Just(ServiceType::DogWalking),
        Just(ServiceType::Feeding),
        Just(ServiceType::Overnight),
    ]) -> ServiceType {
        service_type
    }
}

prop_compose! {
    // Known labels with at least one letter upper-cased, plus free text
    fn arb_unrecognized_label()(label in prop_oneof![
        "[a-zA-Z-]{3,12}",
        (arb_service_type(), any::<prop::sample::Index>()).prop_map(|(service_type, index)| {
            let label = service_type.to_string();
            let letters: Vec<usize> = label
                .char_indices()
                .filter(|(_, c)| c.is_ascii_lowercase())
                .map(|(i, _)| i)
                .collect();
            let at = letters[index.index(letters.len())];
            let mut mangled = label.clone();
            mangled.replace_range(at..at + 1, &label[at..at + 1].to_ascii_uppercase());
            mangled
        }),
        arb_service_type().prop_map(|service_type| service_type.to_string().to_uppercase()),
    ]) -> String {
        label
    }
}

prop_compose! {
    fn arb_time()(hour in 0u32..24, minute in 0u32..60) -> String {
        format!("{:02}:{:02}", hour, minute)
    }
}

prop_compose! {
    fn arb_time_with_seconds()(hour in 0u32..24, minute in 0u32..60, second in 0u32..60) -> String {
        format!("{:02}:{:02}:{:02}", hour, minute, second)
    }
}

fn seconds(value: &str) -> i64 {
    value
        .parse::<TimeOfDay>()
        .map(|t| t.seconds_since_midnight())
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn test_estimate_is_never_negative(
        service_type in arb_service_type(),
        start in arb_time(),
        end in arb_time(),
        pets in 0usize..25,
    ) {
        let estimate = estimate_cost(&service_type.to_string(), &start, &end, pets);
        prop_assert!(estimate.total >= Decimal::ZERO);
    }

    #[test]
    fn test_estimate_is_deterministic(
        service_type in arb_service_type(),
        start in arb_time(),
        end in arb_time(),
        pets in 0usize..25,
    ) {
        let label = service_type.to_string();
        prop_assert_eq!(
            estimate_cost(&label, &start, &end, pets),
            estimate_cost(&label, &start, &end, pets)
        );
    }

    #[test]
    fn test_zero_pets_costs_nothing(
        service_type in arb_service_type(),
        start in arb_time(),
        end in arb_time(),
    ) {
        let estimate = estimate_cost(&service_type.to_string(), &start, &end, 0);
        prop_assert_eq!(estimate.total, Decimal::ZERO);
    }

    #[test]
    fn test_missing_time_costs_nothing(
        service_type in arb_service_type(),
        time in arb_time(),
        pets in 1usize..25,
    ) {
        let label = service_type.to_string();
        prop_assert_eq!(estimate_cost(&label, "", &time, pets).total, Decimal::ZERO);
        prop_assert_eq!(estimate_cost(&label, &time, "", pets).total, Decimal::ZERO);
    }

    #[test]
    fn test_at_least_one_hour_is_billed(
        service_type in arb_service_type(),
        start in arb_time(),
        end in arb_time(),
        pets in 1usize..25,
    ) {
        let estimate = estimate_cost(&service_type.to_string(), &start, &end, pets);
        let floor = service_type.base_rate() * Decimal::from(pets as u64);
        prop_assert!(estimate.total >= floor);
        prop_assert!(estimate.hours >= Decimal::ONE);
    }

    #[test]
    fn test_backwards_range_wraps_to_next_day(
        service_type in arb_service_type(),
        start in arb_time(),
        end in arb_time(),
        pets in 1usize..25,
    ) {
        let estimate = estimate_cost(&service_type.to_string(), &start, &end, pets);
        prop_assert_eq!(estimate.wrapped_overnight, seconds(&end) <= seconds(&start));
        prop_assert!(estimate.hours <= Decimal::from(24));
    }

    #[test]
    fn test_total_scales_with_pet_count(
        service_type in arb_service_type(),
        start in arb_time(),
        end in arb_time(),
        pets in 1usize..20,
    ) {
        let label = service_type.to_string();
        let one = estimate_cost(&label, &start, &end, 1);
        let many = estimate_cost(&label, &start, &end, pets);
        let expected = (one.total * Decimal::from(pets as u64))
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        // Per-pet total is already rounded, so allow one cent per pet of drift
        let drift = (many.total - expected).abs();
        prop_assert!(drift <= Decimal::new(pets as i64, 2));
    }

    #[test]
    fn test_unknown_service_type_prices_as_pet_sitting(
        label in arb_unrecognized_label(),
        start in arb_time(),
        end in arb_time(),
        pets in 1usize..10,
    ) {
        prop_assume!(label.parse::<ServiceType>().is_err());
        prop_assert_eq!(
            estimate_cost(&label, &start, &end, pets).total,
            estimate_cost("pet-sitting", &start, &end, pets).total
        );
    }

    #[test]
    fn test_submit_range_check_rejects_wrapped_ranges(
        start in arb_time(),
        end in arb_time(),
    ) {
        let start_t: TimeOfDay = start.parse().unwrap();
        let end_t: TimeOfDay = end.parse().unwrap();
        prop_assert_eq!(
            validate_time_range(start_t, end_t).is_ok(),
            seconds(&end) > seconds(&start)
        );
    }

    #[test]
    fn test_submittable_range_never_wraps(
        service_type in arb_service_type(),
        start in arb_time_with_seconds(),
        end in arb_time_with_seconds(),
        pets in 1usize..10,
    ) {
        let start_t: TimeOfDay = start.parse().unwrap();
        let end_t: TimeOfDay = end.parse().unwrap();
        prop_assume!(validate_time_range(start_t, end_t).is_ok());

        let estimate = estimate_cost(&service_type.to_string(), &start, &end, pets);
        prop_assert!(!estimate.wrapped_overnight);
        let full_day = service_type.base_rate() * Decimal::from(24u64 * pets as u64);
        prop_assert!(estimate.total < full_day);
    }

    #[test]
    fn test_selecting_same_pet_twice_keeps_one(id in "[a-z0-9]{1,8}") {
        let pet = SelectedPet { id: id.clone(), name: None, species: "dog".to_string() };
        let form = BookingForm::default()
            .apply(FormAction::SelectPet(pet.clone()))
            .apply(FormAction::SelectPet(pet));
        prop_assert_eq!(form.pets.len(), 1);
    }
}
