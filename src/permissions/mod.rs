//! Static catalog of feature modules and fine-grained permissions.
//!
//! The catalog is compiled in and never changes at runtime. Module access
//! controls which feature areas a role can see at all; permissions gate
//! individual actions inside those areas.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Module {
    pub key: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub key: &'static str,
    pub name: &'static str,
    pub module: &'static str,
}

const fn module(key: &'static str, name: &'static str) -> Module {
    Module { key, name }
}

const fn permission(key: &'static str, name: &'static str, module: &'static str) -> Permission {
    Permission { key, name, module }
}

static MODULES: &[Module] = &[
    module("dashboard", "Dashboard"),
    module("flights", "Flight Search"),
    module("bookings", "Bookings"),
    module("tickets", "Tickets"),
    module("refunds", "Refunds"),
    module("reissues", "Reissues"),
    module("markups", "Markups"),
    module("agents", "Agents"),
    module("accounts", "Accounts"),
    module("reports", "Reports"),
    module("users", "Users"),
    module("roles", "Roles & Permissions"),
    module("settings", "Settings"),
];

static PERMISSIONS: &[Permission] = &[
    permission("dashboard.view", "View dashboard", "dashboard"),
    permission("flight.search", "Search flights", "flights"),
    permission("flight.fare_rules", "View fare rules", "flights"),
    permission("booking.view", "View bookings", "bookings"),
    permission("booking.create", "Create bookings", "bookings"),
    permission("booking.cancel", "Cancel bookings", "bookings"),
    permission("ticket.view", "View tickets", "tickets"),
    permission("ticket.issue", "Issue tickets", "tickets"),
    permission("ticket.void", "Void tickets", "tickets"),
    permission("refund.view", "View refunds", "refunds"),
    permission("refund.request", "Request refunds", "refunds"),
    permission("refund.approve", "Approve refunds", "refunds"),
    permission("reissue.view", "View reissues", "reissues"),
    permission("reissue.request", "Request reissues", "reissues"),
    permission("reissue.approve", "Approve reissues", "reissues"),
    permission("markup.view", "View markups", "markups"),
    permission("markup.create", "Create markups", "markups"),
    permission("agent.view", "View agents", "agents"),
    permission("agent.manage", "Manage agents", "agents"),
    permission("account.view", "View accounts", "accounts"),
    permission("account.deposit_approve", "Approve deposits", "accounts"),
    permission("report.view", "View reports", "reports"),
    permission("report.export", "Export reports", "reports"),
    permission("user.view", "View users", "users"),
    permission("user.manage", "Manage users", "users"),
    permission("role.view", "View roles", "roles"),
    permission("role.manage", "Manage roles", "roles"),
    permission("settings.view", "View settings", "settings"),
    permission("settings.manage", "Manage settings", "settings"),
];

pub fn modules() -> &'static [Module] {
    MODULES
}

pub fn permissions() -> &'static [Permission] {
    PERMISSIONS
}

/// Permissions grouped under their module key. Modules without permissions map to an empty list.
pub fn permissions_by_module() -> BTreeMap<&'static str, Vec<&'static Permission>> {
    let mut grouped: BTreeMap<&'static str, Vec<&'static Permission>> =
        MODULES.iter().map(|m| (m.key, Vec::new())).collect();

    for permission in PERMISSIONS {
        grouped.entry(permission.module).or_default().push(permission);
    }
    grouped
}

#[cfg(test)]
pub(crate) fn is_known_module(key: &str) -> bool {
    MODULES.iter().any(|m| m.key == key)
}

#[cfg(test)]
pub(crate) fn is_known_permission(key: &str) -> bool {
    PERMISSIONS.iter().any(|p| p.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_permission_belongs_to_a_known_module() {
        for p in permissions() {
            assert!(is_known_module(p.module), "unknown module for {}", p.key);
        }
    }

    #[test]
    fn permission_keys_are_unique() {
        let mut keys: Vec<&str> = permissions().iter().map(|p| p.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), permissions().len());
    }

    #[test]
    fn grouping_covers_all_modules_and_permissions() {
        let grouped = permissions_by_module();
        assert_eq!(grouped.len(), modules().len());
        assert_eq!(grouped.values().map(Vec::len).sum::<usize>(), permissions().len());
        assert!(grouped["markups"].iter().any(|p| p.key == "markup.create"));
    }
}
