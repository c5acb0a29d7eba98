#[cfg(test)]
mod tests {
    use crate::logic::list_events;
    use crate::service::mock::InMemoryCalendarService;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use neobrain_common::services::{CalendarEvent, EventTime};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap()
    }

    // Distinct start minutes keep the ordering total.
    fn events_from_offsets(offsets: &[i64]) -> Vec<CalendarEvent> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, minutes)| CalendarEvent {
                id: Some(format!("ev{}", i)),
                summary: Some(format!("Event {}", i)),
                start: Some(EventTime::at(base() + Duration::minutes(*minutes))),
                ..Default::default()
            })
            .collect()
    }

    fn listed_ids(service: &InMemoryCalendarService, page_size: u32) -> Vec<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        runtime
            .block_on(list_events(
                service,
                "primary",
                Some(base()),
                Some(base() + Duration::days(7)),
                page_size,
            ))
            .expect("listing")
            .into_iter()
            .filter_map(|e| e.id)
            .collect()
    }

    proptest! {
        // Paged listing equals a single-page listing for any page size
        #[test]
        fn test_pagination_matches_single_shot(
            offsets in proptest::collection::hash_set(0..10_000i64, 0..40),
            page_size in 1..15u32,
        ) {
            let offsets: Vec<i64> = offsets.into_iter().collect();
            let service = InMemoryCalendarService::with_events(events_from_offsets(&offsets));

            let paged = listed_ids(&service, page_size);
            let single = listed_ids(&service, 2500);

            prop_assert_eq!(&paged, &single);

            let unique: HashSet<&String> = paged.iter().collect();
            prop_assert_eq!(unique.len(), paged.len());
            prop_assert_eq!(paged.len(), offsets.len());
        }
    }
}
