//! Default artwork referenced by notifications when the caller gives none.

/// Round bell icon.
pub const DEFAULT_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='64' height='64' viewBox='0 0 64 64'%3E%3Ccircle cx='32' cy='32' r='32' fill='%23667eea'/%3E%3Cpath fill='white' d='M32 14c2 0 4 2 4 4v5c6 3 9 8 9 15v4h4v4H15v-4h4v-4c0-7 3-12 9-15v-5c0-2 2-4 4-4zm0 40c2 0 4-2 4-4h-8c0 2 2 4 4 4z'/%3E%3C/svg%3E";

/// Small monochrome badge.
pub const DEFAULT_BADGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='24' height='24' viewBox='0 0 24 24'%3E%3Ccircle cx='12' cy='12' r='12' fill='%23f56565'/%3E%3C/svg%3E";

/// Wide gradient banner for rich notifications.
pub const DEFAULT_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='320' height='180' viewBox='0 0 320 180'%3E%3Cdefs%3E%3ClinearGradient id='g' x1='0' y1='0' x2='320' y2='180' gradientUnits='userSpaceOnUse'%3E%3Cstop stop-color='%23667eea'/%3E%3Cstop offset='1' stop-color='%23764ba2'/%3E%3C/linearGradient%3E%3C/defs%3E%3Crect width='320' height='180' fill='url(%23g)'/%3E%3Ccircle cx='160' cy='90' r='20' fill='white'/%3E%3C/svg%3E";
