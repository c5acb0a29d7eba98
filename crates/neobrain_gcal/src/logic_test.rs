#[cfg(test)]
mod tests {
    use crate::logic::{list_events, resolve_window, upsert_event, GcalError, DEFAULT_WINDOW_DAYS};
    use crate::service::mock::InMemoryCalendarService;
    use crate::service::{from_api_event, to_api_event};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use google_calendar3::api::{Event, EventDateTime, EventExtendedProperties};
    use neobrain_common::services::{CalendarEvent, EventTime};
    use neobrain_common::NeoBrainError;
    use std::collections::{BTreeMap, HashMap};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap()
    }

    fn event(id: &str, start: DateTime<Utc>, summary: &str) -> CalendarEvent {
        CalendarEvent {
            id: Some(id.to_string()),
            summary: Some(summary.to_string()),
            description: None,
            start: Some(EventTime::at(start)),
            end: Some(EventTime::at(start + Duration::minutes(30))),
            private_properties: BTreeMap::new(),
        }
    }

    #[test]
    fn test_resolve_window_defaults() {
        let now = base();
        let window = resolve_window(None, None, now).unwrap();
        assert_eq!(window.time_min, now);
        assert_eq!(window.time_max, now + Duration::days(DEFAULT_WINDOW_DAYS));

        let start = now - Duration::days(3);
        let window = resolve_window(Some(start), None, now).unwrap();
        assert_eq!(window.time_min, start);
        assert_eq!(window.time_max, start + Duration::days(7));

        let end = now + Duration::days(1);
        let window = resolve_window(None, Some(end), now).unwrap();
        assert_eq!(window.time_min, now);
        assert_eq!(window.time_max, end);
    }

    #[test]
    fn test_resolve_window_rejects_inverted() {
        let now = base();
        let result = resolve_window(Some(now), Some(now - Duration::hours(1)), now);
        assert!(matches!(result, Err(GcalError::InvalidWindow(..))));
    }

    #[tokio::test]
    async fn test_list_events_follows_all_pages() {
        let events: Vec<_> = (0..7)
            .map(|i| event(&format!("ev{}", i), base() + Duration::hours(i), "x"))
            .collect();
        let service = InMemoryCalendarService::with_events(events);

        let listed = list_events(
            &service,
            "primary",
            Some(base()),
            Some(base() + Duration::days(1)),
            3,
        )
        .await
        .unwrap();

        let ids: Vec<_> = listed.iter().filter_map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec!["ev0", "ev1", "ev2", "ev3", "ev4", "ev5", "ev6"]);
        assert_eq!(service.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_list_events_empty_calendar_makes_one_call() {
        let service = InMemoryCalendarService::new();
        let listed = list_events(&service, "primary", Some(base()), None, 250)
            .await
            .unwrap();
        assert!(listed.is_empty());
        assert_eq!(service.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_events_respects_window() {
        let service = InMemoryCalendarService::with_events(vec![
            event("before", base() - Duration::days(1), "x"),
            event("inside", base() + Duration::hours(2), "x"),
            event("after", base() + Duration::days(10), "x"),
        ]);
        let listed = list_events(&service, "primary", Some(base()), None, 10)
            .await
            .unwrap();
        let ids: Vec<_> = listed.iter().filter_map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec!["inside"]);
    }

    #[tokio::test]
    async fn test_list_events_rejects_page_size() {
        let service = InMemoryCalendarService::new();
        for size in [0, 2501] {
            let result = list_events(&service, "primary", Some(base()), None, size).await;
            assert!(matches!(result, Err(NeoBrainError::ValidationError(_))));
        }
        assert_eq!(service.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_upsert_with_id_patches_only_given_fields() {
        let mut original = event("ev1", base(), "Weekly sync");
        original.description = Some("agenda".to_string());
        let service = InMemoryCalendarService::with_events(vec![original]);

        let patch = CalendarEvent {
            summary: Some("#17410001 – Weekly sync".to_string()),
            ..Default::default()
        };
        let written = upsert_event(&service, "primary", patch, Some("ev1"))
            .await
            .unwrap();

        assert_eq!(written.summary.as_deref(), Some("#17410001 – Weekly sync"));
        assert_eq!(written.description.as_deref(), Some("agenda"));
        assert!(written.start.is_some());
    }

    #[tokio::test]
    async fn test_upsert_without_id_inserts() {
        let service = InMemoryCalendarService::new();
        let created = upsert_event(&service, "primary", event("ignored", base(), "New"), None)
            .await
            .unwrap();
        assert!(created.id.is_some());
        assert_eq!(service.events().len(), 1);
        assert_eq!(service.upsert_calls(), vec![None]);
    }

    #[tokio::test]
    async fn test_upsert_remote_failure_propagates() {
        let service = InMemoryCalendarService::with_events(vec![event("ev1", base(), "x")]);
        service.fail_on("ev1");
        let result = upsert_event(&service, "primary", CalendarEvent::default(), Some("ev1")).await;
        match result {
            Err(NeoBrainError::RemoteApiError(source)) => {
                assert!(source.to_string().contains("ev1"))
            }
            other => panic!("expected RemoteApiError, got {:?}", other),
        }
    }

    #[test]
    fn test_from_api_event_reads_all_day_and_properties() {
        let mut private = HashMap::new();
        private.insert("neobrain_code".to_string(), "#42".to_string());
        let api = Event {
            id: Some("abc123".to_string()),
            summary: Some("Holiday".to_string()),
            start: Some(EventDateTime {
                date: NaiveDate::from_ymd_opt(2025, 7, 28),
                ..Default::default()
            }),
            extended_properties: Some(EventExtendedProperties {
                private: Some(private),
                ..Default::default()
            }),
            ..Default::default()
        };

        let event = from_api_event(api);

        assert_eq!(event.id.as_deref(), Some("abc123"));
        assert_eq!(
            event.start.and_then(|s| s.date),
            NaiveDate::from_ymd_opt(2025, 7, 28)
        );
        assert!(event.end.is_none());
        assert_eq!(
            event.private_properties.get("neobrain_code").map(String::as_str),
            Some("#42")
        );
    }

    #[test]
    fn test_to_api_event_omits_id_and_empty_properties() {
        let api = to_api_event(event("ev1", base(), "Title"));
        assert!(api.id.is_none());
        assert!(api.extended_properties.is_none());
        assert_eq!(api.summary.as_deref(), Some("Title"));
        assert_eq!(api.start.and_then(|s| s.date_time), Some(base()));
    }
}
