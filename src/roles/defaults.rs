use super::Role;

/// Seed entry for the `roles` collection and fallback when a slug is not stored.
#[derive(Debug, Clone, Copy)]
pub struct DefaultRole {
    pub slug: &'static str,
    pub name: &'static str,
    pub name_bn: &'static str,
    pub permissions: &'static [&'static str],
    pub module_access: &'static [&'static str],
}

impl DefaultRole {
    pub fn to_role(&self) -> Role {
        Role {
            slug: self.slug.to_string(),
            name: self.name.to_string(),
            localized_name: self.name_bn.to_string(),
            permissions: self.permissions.iter().map(|p| p.to_string()).collect(),
            module_access: self.module_access.iter().map(|m| m.to_string()).collect(),
        }
    }
}

static DEFAULT_ROLES: &[DefaultRole] = &[
    DefaultRole {
        slug: "super_admin",
        name: "Super Admin",
        name_bn: "সুপার অ্যাডমিন",
        permissions: &[
            "dashboard.view",
            "flight.search",
            "flight.fare_rules",
            "booking.view",
            "booking.create",
            "booking.cancel",
            "ticket.view",
            "ticket.issue",
            "ticket.void",
            "refund.view",
            "refund.request",
            "refund.approve",
            "reissue.view",
            "reissue.request",
            "reissue.approve",
            "markup.view",
            "markup.create",
            "agent.view",
            "agent.manage",
            "account.view",
            "account.deposit_approve",
            "report.view",
            "report.export",
            "user.view",
            "user.manage",
            "role.view",
            "role.manage",
            "settings.view",
            "settings.manage",
        ],
        module_access: &[
            "dashboard", "flights", "bookings", "tickets", "refunds", "reissues", "markups", "agents",
            "accounts", "reports", "users", "roles", "settings",
        ],
    },
    DefaultRole {
        slug: "admin",
        name: "Admin",
        name_bn: "অ্যাডমিন",
        permissions: &[
            "dashboard.view",
            "flight.search",
            "flight.fare_rules",
            "booking.view",
            "booking.create",
            "booking.cancel",
            "ticket.view",
            "ticket.issue",
            "ticket.void",
            "refund.view",
            "refund.request",
            "refund.approve",
            "reissue.view",
            "reissue.request",
            "reissue.approve",
            "markup.view",
            "markup.create",
            "agent.view",
            "agent.manage",
            "account.view",
            "report.view",
            "report.export",
            "user.view",
            "role.view",
            "settings.view",
        ],
        module_access: &[
            "dashboard", "flights", "bookings", "tickets", "refunds", "reissues", "markups", "agents",
            "accounts", "reports", "users", "roles", "settings",
        ],
    },
    DefaultRole {
        slug: "reservation",
        name: "Reservation",
        name_bn: "রিজার্ভেশন",
        permissions: &[
            "dashboard.view",
            "flight.search",
            "flight.fare_rules",
            "booking.view",
            "booking.create",
            "booking.cancel",
            "ticket.view",
            "ticket.issue",
            "reissue.view",
            "reissue.request",
            "refund.view",
            "refund.request",
        ],
        module_access: &["dashboard", "flights", "bookings", "tickets", "reissues", "refunds"],
    },
    DefaultRole {
        slug: "accounts",
        name: "Accounts",
        name_bn: "অ্যাকাউন্টস",
        permissions: &[
            "dashboard.view",
            "booking.view",
            "ticket.view",
            "refund.view",
            "refund.approve",
            "account.view",
            "account.deposit_approve",
            "report.view",
            "report.export",
        ],
        module_access: &["dashboard", "bookings", "tickets", "refunds", "accounts", "reports"],
    },
    DefaultRole {
        slug: "agent",
        name: "Agent",
        name_bn: "এজেন্ট",
        permissions: &[
            "dashboard.view",
            "flight.search",
            "flight.fare_rules",
            "booking.view",
            "booking.create",
            "ticket.view",
        ],
        module_access: &["dashboard", "flights", "bookings", "tickets"],
    },
];

pub fn default_roles() -> &'static [DefaultRole] {
    DEFAULT_ROLES
}

pub fn find_default_role(slug: &str) -> Option<&'static DefaultRole> {
    DEFAULT_ROLES.iter().find(|r| r.slug == slug)
}
