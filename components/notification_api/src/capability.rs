//! Capability detection.

use core_types::{CapabilitySet, HostStrategy};
use web_platform::NotificationHost;

/// Probe `host` once and record which notification features it exposes.
///
/// Probing never fails; a feature the host cannot confirm is reported as
/// absent. Without the basic notification API nothing else is reported.
pub fn detect(host: &dyn NotificationHost) -> CapabilitySet {
    let strategy = if host.uses_legacy_permission_callback() {
        HostStrategy::LegacyCallback
    } else {
        HostStrategy::Standard
    };

    let capabilities = CapabilitySet::from_probe(|feature| host.probe(feature), strategy);
    if !capabilities.basic {
        return CapabilitySet {
            host_strategy: strategy,
            ..CapabilitySet::none()
        };
    }

    tracing::debug!(supported = ?capabilities.supported(), ?strategy, "detected notification capabilities");
    capabilities
}
