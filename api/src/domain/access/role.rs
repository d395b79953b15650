use std::fmt;

/// Role stored as free text on the user record. Unknown values are kept
/// verbatim in `Other` and get the least access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Manager,
    Finance,
    Staff,
    Volunteer,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Dashboard,
    Projects,
    Programs,
    Grants,
    Donations,
    Beneficiaries,
    Partners,
    Distributions,
    Files,
    Attendance,
    AttendanceReports,
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Write,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RoleError {
    #[error("unknown role `{0}`")]
    Unknown(String),
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "admin" | "administrator" => Role::Admin,
            "manager" | "program_manager" | "project_manager" => Role::Manager,
            "finance" | "accountant" | "finance_officer" => Role::Finance,
            "staff" | "field_officer" | "officer" => Role::Staff,
            "volunteer" => Role::Volunteer,
            _ => Role::Other(raw.trim().to_string()),
        }
    }

    /// Strict variant used when an admin assigns a role.
    pub fn parse_known(raw: &str) -> Result<Self, RoleError> {
        match Role::parse(raw) {
            Role::Other(v) => Err(RoleError::Unknown(v)),
            role => Ok(role),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Finance => "finance",
            Role::Staff => "staff",
            Role::Volunteer => "volunteer",
            Role::Other(v) => v.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Other(_))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can(&self, resource: Resource, action: Action) -> bool {
        use Action::{Read, Write};
        use Resource::*;
        use Role::{Admin, Finance, Manager, Staff, Volunteer};

        match (resource, action) {
            // Everyone tracks their own time, whatever their role string says.
            (Attendance, _) => true,
            _ if !self.is_known() => false,
            (Dashboard, Read) | (Projects, Read) | (Programs, Read) | (Files, Read) => true,
            (Dashboard, Write) | (AttendanceReports, Write) => false,
            (Projects | Programs, Write) => matches!(self, Admin | Manager),
            (Grants | Donations, Read) => matches!(self, Admin | Manager | Finance),
            (Grants | Donations, Write) => matches!(self, Admin | Finance),
            (Beneficiaries | Distributions, Read) => {
                matches!(self, Admin | Manager | Staff | Volunteer)
            }
            (Beneficiaries | Distributions, Write) => matches!(self, Admin | Manager | Staff),
            (Partners, Read) => matches!(self, Admin | Manager | Finance | Staff),
            (Partners, Write) => matches!(self, Admin | Manager),
            (Files, Write) => !matches!(self, Volunteer),
            (AttendanceReports, Read) => matches!(self, Admin | Manager),
            (Users, _) => matches!(self, Admin),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Resource {
    pub fn key(&self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::Projects => "projects",
            Resource::Programs => "programs",
            Resource::Grants => "grants",
            Resource::Donations => "donations",
            Resource::Beneficiaries => "beneficiaries",
            Resource::Partners => "partners",
            Resource::Distributions => "distributions",
            Resource::Files => "files",
            Resource::Attendance => "attendance",
            Resource::AttendanceReports => "attendance_reports",
            Resource::Users => "users",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_and_spacing() {
        assert_eq!(Role::parse(" Admin "), Role::Admin);
        assert_eq!(Role::parse("Project Manager"), Role::Manager);
        assert_eq!(Role::parse("finance-officer"), Role::Finance);
        assert_eq!(Role::parse("FIELD_OFFICER"), Role::Staff);
        assert_eq!(
            Role::parse("Board Member"),
            Role::Other("Board Member".into())
        );
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!(
            Role::parse_known("intern"),
            Err(RoleError::Unknown("intern".into()))
        );
        assert_eq!(Role::parse_known("volunteer"), Ok(Role::Volunteer));
    }

    #[test]
    fn finance_sees_money_but_not_beneficiaries() {
        let role = Role::Finance;
        assert!(role.can(Resource::Grants, Action::Write));
        assert!(role.can(Resource::Donations, Action::Read));
        assert!(!role.can(Resource::Beneficiaries, Action::Read));
        assert!(!role.can(Resource::Projects, Action::Write));
    }

    #[test]
    fn volunteer_reads_field_data_only() {
        let role = Role::Volunteer;
        assert!(role.can(Resource::Beneficiaries, Action::Read));
        assert!(!role.can(Resource::Beneficiaries, Action::Write));
        assert!(!role.can(Resource::Files, Action::Write));
        assert!(!role.can(Resource::Donations, Action::Read));
    }

    #[test]
    fn unknown_role_only_tracks_attendance() {
        let role = Role::Other("guest".into());
        assert!(role.can(Resource::Attendance, Action::Write));
        assert!(!role.can(Resource::Dashboard, Action::Read));
        assert!(!role.can(Resource::Files, Action::Read));
    }

    #[test]
    fn only_admin_manages_users() {
        assert!(Role::Admin.can(Resource::Users, Action::Write));
        assert!(!Role::Manager.can(Resource::Users, Action::Read));
        assert!(Role::Manager.can(Resource::AttendanceReports, Action::Read));
        assert!(!Role::Admin.can(Resource::Dashboard, Action::Write));
    }
}
