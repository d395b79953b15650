use super::role::{Action, Resource, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub resource: Resource,
    pub label: &'static str,
    pub path: &'static str,
    pub can_write: bool,
}

// Sidebar order.
const NAV_ENTRIES: &[(Resource, &str, &str)] = &[
    (Resource::Dashboard, "Dashboard", "/dashboard"),
    (Resource::Programs, "Programs", "/programs"),
    (Resource::Projects, "Projects", "/projects"),
    (Resource::Grants, "Grants", "/grants"),
    (Resource::Donations, "Donations", "/donations"),
    (Resource::Beneficiaries, "Beneficiaries", "/beneficiaries"),
    (Resource::Distributions, "Resource distribution", "/distributions"),
    (Resource::Partners, "Partners", "/partners"),
    (Resource::Files, "Files", "/files"),
    (Resource::Attendance, "My attendance", "/attendance"),
    (Resource::AttendanceReports, "Team attendance", "/attendance/team"),
    (Resource::Users, "Users", "/users"),
];

pub fn navigation_for(role: &Role) -> Vec<NavItem> {
    NAV_ENTRIES
        .iter()
        .filter(|(resource, _, _)| role.can(*resource, Action::Read))
        .map(|(resource, label, path)| NavItem {
            resource: *resource,
            label,
            path,
            can_write: role.can(*resource, Action::Write),
        })
        .collect()
}
