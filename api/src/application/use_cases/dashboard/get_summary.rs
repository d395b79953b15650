use chrono::{Duration, NaiveDate};

use crate::application::access::{self, Actor};
use crate::application::ports::dashboard_repository::{CurrencyTotal, DashboardRepository};
use crate::domain::access::role::{Action, Resource};

pub const RECENT_DAYS: i64 = 30;

#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    pub projects_by_status: Option<Vec<(String, i64)>>,
    pub active_programs: Option<i64>,
    pub awarded_grants: Option<Vec<CurrencyTotal>>,
    pub recent_donations: Option<Vec<CurrencyTotal>>,
    pub beneficiaries: Option<i64>,
    pub partners: Option<i64>,
    pub recent_distributions: Option<i64>,
    /// (checked in, on break)
    pub attendance: Option<(i64, i64)>,
}

pub struct GetDashboard<'a, R: DashboardRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DashboardRepository + ?Sized> GetDashboard<'a, R> {
    /// Sections the actor cannot read stay `None`.
    pub async fn execute(&self, actor: &Actor, today: NaiveDate) -> anyhow::Result<DashboardSummary> {
        access::require(actor, Resource::Dashboard, Action::Read)?;
        let since = today - Duration::days(RECENT_DAYS);
        let can = |r: Resource| actor.can(r, Action::Read);

        let mut out = DashboardSummary::default();
        if can(Resource::Projects) {
            out.projects_by_status = Some(self.repo.project_status_counts().await?);
        }
        if can(Resource::Programs) {
            out.active_programs = Some(self.repo.active_program_count().await?);
        }
        if can(Resource::Grants) {
            out.awarded_grants = Some(self.repo.awarded_grant_totals().await?);
        }
        if can(Resource::Donations) {
            out.recent_donations = Some(self.repo.donation_totals(Some(since)).await?);
        }
        if can(Resource::Beneficiaries) {
            out.beneficiaries = Some(self.repo.beneficiary_count().await?);
        }
        if can(Resource::Partners) {
            out.partners = Some(self.repo.partner_count().await?);
        }
        if can(Resource::Distributions) {
            out.recent_distributions = Some(self.repo.distribution_count(since).await?);
        }
        if can(Resource::AttendanceReports) {
            out.attendance = Some(self.repo.attendance_counts().await?);
        }
        Ok(out)
    }
}
