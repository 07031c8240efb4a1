use crate::domain::model::{PassengerDetail, PassengerType, Passengers};

/// Bring the passenger list in line with the adult and child counts.
///
/// Entries are kept by position. Appended entries are typed adult while their
/// index is below the adult count and child after that; entries that already
/// exist keep their type even when the counts moved underneath them. Surplus
/// entries are dropped from the tail.
///
/// Returns the list length before the resize.
pub fn sync_passenger_list(passengers: &Passengers, details: &mut Vec<PassengerDetail>) -> usize {
    let previous = details.len();
    let target = passengers.seated();

    if target > previous {
        let adults = usize::try_from(passengers.adults).unwrap_or(0);
        details.extend((previous..target).map(|index| {
            if index < adults {
                PassengerDetail::new(PassengerType::Adult)
            } else {
                PassengerDetail::new(PassengerType::Child)
            }
        }));
    } else if target < previous {
        details.truncate(target);
    }

    previous
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(adults: i32, children: i32) -> Passengers {
        Passengers {
            adults,
            children,
            infants: 0,
        }
    }

    fn named(passenger_type: PassengerType, first_name: &str) -> PassengerDetail {
        PassengerDetail {
            first_name: first_name.to_string(),
            ..PassengerDetail::new(passenger_type)
        }
    }

    fn types(details: &[PassengerDetail]) -> Vec<PassengerType> {
        details.iter().map(|d| d.passenger_type).collect()
    }

    #[test]
    fn test_length_matches_adults_plus_children() {
        for adults in 1..=9 {
            for children in 0..=9 {
                let mut details = Vec::new();
                sync_passenger_list(&counts(adults, children), &mut details);
                assert_eq!(details.len(), (adults + children) as usize);
            }
        }
    }

    #[test]
    fn test_grow_types_new_entries_by_position() {
        let mut details = Vec::new();
        sync_passenger_list(&counts(2, 1), &mut details);

        assert_eq!(
            types(&details),
            vec![
                PassengerType::Adult,
                PassengerType::Adult,
                PassengerType::Child
            ]
        );
    }

    #[test]
    fn test_grow_keeps_existing_entries() {
        let mut details = vec![named(PassengerType::Adult, "Ada")];
        let previous = sync_passenger_list(&counts(1, 2), &mut details);

        assert_eq!(previous, 1);
        assert_eq!(details.len(), 3);
        assert_eq!(details[0], named(PassengerType::Adult, "Ada"));
        assert_eq!(details[1].passenger_type, PassengerType::Child);
    }

    #[test]
    fn test_shrink_removes_from_tail() {
        let mut details = vec![
            named(PassengerType::Adult, "Ada"),
            named(PassengerType::Adult, "Grace"),
            named(PassengerType::Child, "Alan"),
        ];
        sync_passenger_list(&counts(1, 1), &mut details);

        assert_eq!(
            details,
            vec![
                named(PassengerType::Adult, "Ada"),
                named(PassengerType::Adult, "Grace"),
            ]
        );
    }

    #[test]
    fn test_same_total_does_not_retype() {
        let mut details = vec![
            named(PassengerType::Adult, "Ada"),
            named(PassengerType::Child, "Alan"),
        ];
        sync_passenger_list(&counts(2, 0), &mut details);

        assert_eq!(
            types(&details),
            vec![PassengerType::Adult, PassengerType::Child]
        );
    }

    #[test]
    fn test_existing_entries_are_not_retyped_when_growing() {
        // One child became an adult and another child was added.
        let mut details = vec![
            named(PassengerType::Adult, "Ada"),
            named(PassengerType::Child, "Alan"),
        ];
        sync_passenger_list(&counts(2, 1), &mut details);

        assert_eq!(
            types(&details),
            vec![
                PassengerType::Adult,
                PassengerType::Child,
                PassengerType::Child
            ]
        );
    }

    #[test]
    fn test_negative_counts_do_not_panic() {
        let mut details = vec![named(PassengerType::Adult, "Ada")];
        sync_passenger_list(&counts(-1, -4), &mut details);
        assert!(details.is_empty());
    }
}
