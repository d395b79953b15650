use std::sync::Arc;

use crate::application::ports::attendance_repository::AttendanceRepository;
use crate::application::ports::dashboard_repository::DashboardRepository;
use crate::application::ports::files_repository::FilesRepository;
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::record_repository::RecordRepository;
use crate::application::ports::storage_port::StoragePort;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::domain::records::Record;
use crate::domain::records::beneficiary::Beneficiary;
use crate::domain::records::distribution::Distribution;
use crate::domain::records::donation::Donation;
use crate::domain::records::grant::Grant;
use crate::domain::records::partner::Partner;
use crate::domain::records::program::Program;
use crate::domain::records::project::Project;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct RecordRepos {
    pub programs: Arc<dyn RecordRepository<Program>>,
    pub projects: Arc<dyn RecordRepository<Project>>,
    pub grants: Arc<dyn RecordRepository<Grant>>,
    pub donations: Arc<dyn RecordRepository<Donation>>,
    pub beneficiaries: Arc<dyn RecordRepository<Beneficiary>>,
    pub partners: Arc<dyn RecordRepository<Partner>>,
    pub distributions: Arc<dyn RecordRepository<Distribution>>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    records: RecordRepos,
    dashboard_repo: Arc<dyn DashboardRepository>,
    folder_repo: Arc<dyn FolderRepository>,
    files_repo: Arc<dyn FilesRepository>,
    storage_port: Arc<dyn StoragePort>,
    attendance_repo: Arc<dyn AttendanceRepository>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        records: RecordRepos,
        dashboard_repo: Arc<dyn DashboardRepository>,
        folder_repo: Arc<dyn FolderRepository>,
        files_repo: Arc<dyn FilesRepository>,
        storage_port: Arc<dyn StoragePort>,
        attendance_repo: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            user_repo,
            records,
            dashboard_repo,
            folder_repo,
            files_repo,
            storage_port,
            attendance_repo,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn dashboard_repo(&self) -> Arc<dyn DashboardRepository> {
        self.services.dashboard_repo.clone()
    }

    pub fn folder_repo(&self) -> Arc<dyn FolderRepository> {
        self.services.folder_repo.clone()
    }

    pub fn files_repo(&self) -> Arc<dyn FilesRepository> {
        self.services.files_repo.clone()
    }

    pub fn storage_port(&self) -> Arc<dyn StoragePort> {
        self.services.storage_port.clone()
    }

    pub fn attendance_repo(&self) -> Arc<dyn AttendanceRepository> {
        self.services.attendance_repo.clone()
    }
}

/// Lookup of the repository backing one record kind.
pub trait RecordStore<R: Record> {
    fn records(&self) -> Arc<dyn RecordRepository<R>>;
}

macro_rules! record_store {
    ($($ty:ty => $field:ident),+ $(,)?) => {
        $(
            impl RecordStore<$ty> for AppContext {
                fn records(&self) -> Arc<dyn RecordRepository<$ty>> {
                    self.services.records.$field.clone()
                }
            }
        )+
    };
}

record_store! {
    Program => programs,
    Project => projects,
    Grant => grants,
    Donation => donations,
    Beneficiary => beneficiaries,
    Partner => partners,
    Distribution => distributions,
}
