//! Unit tests for CapabilitySet and PermissionState

use core_types::{CapabilitySet, Feature, HostStrategy, PermissionState};

#[cfg(test)]
mod capability_tests {
    use super::*;

    #[test]
    fn test_full_supports_every_feature() {
        let caps = CapabilitySet::full();
        assert_eq!(caps.supported().len(), Feature::ALL.len());
    }

    #[test]
    fn test_undetected_features_default_false() {
        let caps = CapabilitySet::from_probe(|f| f == Feature::Basic, HostStrategy::Standard);
        assert!(caps.basic);
        assert!(!caps.persistent);
        assert!(!caps.actions);
        assert!(!caps.vibrate);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(CapabilitySet::none()).unwrap();
        assert_eq!(json["requireInteraction"], false);
        assert_eq!(json["hostStrategy"], "standard");
    }
}

#[cfg(test)]
mod permission_tests {
    use super::*;

    #[test]
    fn test_default_state() {
        assert_eq!(PermissionState::default(), PermissionState::Default);
    }

    #[test]
    fn test_only_granted_is_granted() {
        assert!(PermissionState::Granted.is_granted());
        assert!(!PermissionState::Default.is_granted());
        assert!(!PermissionState::Denied.is_granted());
        assert!(!PermissionState::Unsupported.is_granted());
    }
}
