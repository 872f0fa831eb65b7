//! Permission definitions
//!
//! Capability flags map one-to-one onto the six boolean switches stored on
//! each user document. A permission string is granted when its flag is set
//! (or the role is superadmin, which implies all of them).

/// The six configurable capability flags, in storage order
pub const ALL_PERMISSIONS: &[&str] = &[
    "manage_products",
    "manage_categories",
    "manage_waiters",
    "manage_users",
    "manage_settings",
    "view_reports",
];
