//! Unit tests for NotificationOptions merging and NotificationRequest

use core_types::{NotificationAction, NotificationOptions, NotificationRequest};
use serde_json::json;

#[cfg(test)]
mod merge_tests {
    use super::*;

    #[test]
    fn test_caller_overrides_kind_default() {
        let defaults = NotificationOptions::new().with_require_interaction(false);
        let merged = NotificationOptions::new()
            .with_require_interaction(true)
            .merged_over(defaults);
        assert!(merged.requires_interaction());
    }

    #[test]
    fn test_unset_caller_fields_keep_defaults() {
        let defaults = NotificationOptions::new()
            .with_tag("pushbell-rich")
            .with_image("banner.svg")
            .with_silent(false);
        let merged = NotificationOptions::new()
            .with_body("hello")
            .merged_over(defaults);

        assert_eq!(merged.tag.as_deref(), Some("pushbell-rich"));
        assert_eq!(merged.image.as_deref(), Some("banner.svg"));
        assert_eq!(merged.silent, Some(false));
        assert_eq!(merged.body.as_deref(), Some("hello"));
    }

    #[test]
    fn test_actions_replaced_not_appended() {
        let defaults = NotificationOptions::new().with_actions(vec![
            NotificationAction::new("yes", "Yes"),
            NotificationAction::new("no", "No"),
        ]);
        let merged = NotificationOptions::new()
            .with_actions(vec![NotificationAction::new("ok", "OK")])
            .merged_over(defaults);

        let actions = merged.actions.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, "ok");
    }

    #[test]
    fn test_without_actions_keeps_everything_else() {
        let options = NotificationOptions::new()
            .with_body("b")
            .with_actions(vec![NotificationAction::new("yes", "Yes")]);
        let stripped = options.without_actions();
        assert!(stripped.actions.is_none());
        assert_eq!(stripped.body.as_deref(), Some("b"));
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_payload() {
        let options: NotificationOptions = serde_json::from_value(json!({
            "body": "from push",
            "requireInteraction": true,
            "actions": [{"action": "view", "title": "View", "icon": "eye"}]
        }))
        .unwrap();

        assert_eq!(options.body.as_deref(), Some("from push"));
        assert!(options.requires_interaction());
        let actions = options.actions.unwrap();
        assert_eq!(actions[0].id, "view");
        assert_eq!(actions[0].icon.as_deref(), Some("eye"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options: NotificationOptions =
            serde_json::from_value(json!({"body": "x", "somethingElse": 1})).unwrap();
        assert_eq!(options.body.as_deref(), Some("x"));
    }
}

#[cfg(test)]
mod request_tests {
    use super::*;

    #[test]
    fn test_request_accessors() {
        let request = NotificationRequest::new("Title", NotificationOptions::new().with_body("Body"));
        assert_eq!(request.title(), "Title");
        assert_eq!(request.body(), Some("Body"));
    }

    #[test]
    fn test_request_is_timestamped() {
        let before = chrono::Utc::now();
        let request = NotificationRequest::new("t", NotificationOptions::new());
        assert!(request.timestamp_created() >= before);
    }

    #[test]
    fn test_request_survives_json() {
        let request = NotificationRequest::new("Title", NotificationOptions::new().with_body("Body"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["title"], json!("Title"));
        assert!(value["timestampCreated"].is_string());

        let parsed: NotificationRequest = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, request);
    }
}
