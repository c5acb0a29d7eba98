#[cfg(test)]
mod tests {
    use crate::logic::{assign_code, plan_assignment, suggest_code, EventRef};
    use crate::normalize::{extract_code, is_valid_code, reconstruct_title};
    use proptest::prelude::*;

    fn arb_title() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-Za-z][A-Za-z ]{0,20}",
            ("[0-9]{1,5}", "[A-Za-z][A-Za-z ]{0,20}").prop_map(|(d, t)| format!("#{} {}", d, t)),
            ("[0-9]{1,5}", "[A-Za-z][A-Za-z ]{0,20}").prop_map(|(d, t)| format!("#{} – {}", d, t)),
        ]
    }

    fn arb_code() -> impl Strategy<Value = String> {
        prop_oneof![
            "#[0-9]{1,6}",
            "[#A-Za-z0-9 -]{1,8}",
        ]
    }

    proptest! {
        // Writing a code and parsing the new title gives that code back.
        #[test]
        fn prop_assigned_code_is_parsed_back(title in arb_title(), digits in "[0-9]{1,6}") {
            let code = format!("#{}", digits);
            let event = EventRef { event_id: "e".into(), title: title.clone(), current_code: None };
            let assignment = assign_code(&event, &code);
            let parsed = extract_code(&assignment.title);
            prop_assert_eq!(&parsed.code, &code);
            prop_assert_eq!(parsed.description, extract_code(&title).description);
        }

        // Assigning twice is the same as assigning once.
        #[test]
        fn prop_assignment_is_idempotent(title in arb_title(), digits in "[0-9]{1,6}") {
            let code = format!("#{}", digits);
            let first = assign_code(
                &EventRef { event_id: "e".into(), title, current_code: None },
                &code,
            );
            let again = EventRef { event_id: "e".into(), title: first.title.clone(), current_code: None };
            prop_assert_eq!(plan_assignment(&again, &code), None);
            prop_assert_eq!(assign_code(&again, &code).title, first.title);
        }

        // Exactly the codes that pass validation survive a write and a re-read.
        #[test]
        fn prop_only_valid_codes_are_read_back(title in arb_title(), code in arb_code()) {
            let event = EventRef { event_id: "e".into(), title, current_code: None };
            let parsed = extract_code(&assign_code(&event, &code).title);
            prop_assert_eq!(is_valid_code(&code), parsed.code == code);
        }

        // Suggestions for any calendar id are valid codes that are read back from the title.
        #[test]
        fn prop_suggestion_is_read_back(id in "[a-v0-9_]{0,40}") {
            let code = suggest_code("#1741", &id);
            prop_assert!(is_valid_code(&code));
            prop_assert_eq!(code.len(), "#1741".len() + 4);
            let title = reconstruct_title(&code, "Sync", "Sync");
            prop_assert_eq!(extract_code(&title).code, code);
        }
    }
}
