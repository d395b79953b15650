use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use ngo_api::application::ports::storage_port::StoragePort;
use ngo_api::bootstrap::app_context::{AppContext, AppServices, RecordRepos};
use ngo_api::bootstrap::config::{Config, StorageBackend};
use ngo_api::infrastructure::db::repositories::{
    attendance_repository_sqlx::SqlxAttendanceRepository,
    beneficiary_repository_sqlx::SqlxBeneficiaryRepository,
    dashboard_repository_sqlx::SqlxDashboardRepository,
    distribution_repository_sqlx::SqlxDistributionRepository,
    donation_repository_sqlx::SqlxDonationRepository,
    files_repository_sqlx::SqlxFilesRepository, folder_repository_sqlx::SqlxFolderRepository,
    grant_repository_sqlx::SqlxGrantRepository, partner_repository_sqlx::SqlxPartnerRepository,
    program_repository_sqlx::SqlxProgramRepository,
    project_repository_sqlx::SqlxProjectRepository, user_repository_sqlx::SqlxUserRepository,
};
use ngo_api::presentation::http as web;

#[derive(OpenApi)]
#[openapi(
        paths(
            web::auth::register,
            web::auth::login,
            web::auth::logout,
            web::auth::me,
            web::users::list_users,
            web::users::directory,
            web::users::update_role,
            web::users::delete_user,
            web::navigation::navigation,
            web::dashboard::dashboard,
            web::records::programs::list,
            web::records::programs::create,
            web::records::programs::get_one,
            web::records::programs::update,
            web::records::programs::delete,
            web::records::projects::list,
            web::records::projects::create,
            web::records::projects::get_one,
            web::records::projects::update,
            web::records::projects::delete,
            web::records::grants::list,
            web::records::grants::create,
            web::records::grants::get_one,
            web::records::grants::update,
            web::records::grants::delete,
            web::records::donations::list,
            web::records::donations::create,
            web::records::donations::get_one,
            web::records::donations::update,
            web::records::donations::delete,
            web::records::beneficiaries::list,
            web::records::beneficiaries::create,
            web::records::beneficiaries::get_one,
            web::records::beneficiaries::update,
            web::records::beneficiaries::delete,
            web::records::partners::list,
            web::records::partners::create,
            web::records::partners::get_one,
            web::records::partners::update,
            web::records::partners::delete,
            web::records::distributions::list,
            web::records::distributions::create,
            web::records::distributions::get_one,
            web::records::distributions::update,
            web::records::distributions::delete,
            web::folders::create_folder,
            web::folders::list_folder,
            web::folders::get_folder,
            web::folders::update_folder,
            web::folders::delete_folder,
            web::folders::share_folder,
            web::folders::unshare_folder,
            web::folders::download_folder,
            web::files::upload_file,
            web::files::get_file,
            web::files::get_file_content,
            web::files::delete_file,
            web::files::share_file,
            web::files::unshare_file,
            web::files::list_shared,
            web::attendance::check_in,
            web::attendance::start_break,
            web::attendance::end_break,
            web::attendance::check_out,
            web::attendance::current,
            web::attendance::history,
            web::attendance::active,
            web::health::health,
        ),
        components(schemas(
            web::auth::RegisterRequest,
            web::auth::LoginRequest,
            web::auth::LoginResponse,
            web::auth::UserResponse,
            web::users::UserPage,
            web::users::DirectoryEntry,
            web::users::UpdateRoleRequest,
            web::navigation::NavItemResponse,
            web::navigation::NavigationResponse,
            web::dashboard::CurrencyTotalResponse,
            web::dashboard::AttendanceNow,
            web::dashboard::DashboardResponse,
            web::records::programs::ProgramResponse,
            web::records::programs::ProgramPage,
            web::records::programs::CreateProgramRequest,
            web::records::programs::UpdateProgramRequest,
            web::records::projects::ProjectResponse,
            web::records::projects::ProjectPage,
            web::records::projects::CreateProjectRequest,
            web::records::projects::UpdateProjectRequest,
            web::records::grants::GrantResponse,
            web::records::grants::GrantPage,
            web::records::grants::CreateGrantRequest,
            web::records::grants::UpdateGrantRequest,
            web::records::donations::DonationResponse,
            web::records::donations::DonationPage,
            web::records::donations::CreateDonationRequest,
            web::records::donations::UpdateDonationRequest,
            web::records::beneficiaries::BeneficiaryResponse,
            web::records::beneficiaries::BeneficiaryPage,
            web::records::beneficiaries::CreateBeneficiaryRequest,
            web::records::beneficiaries::UpdateBeneficiaryRequest,
            web::records::partners::PartnerResponse,
            web::records::partners::PartnerPage,
            web::records::partners::CreatePartnerRequest,
            web::records::partners::UpdatePartnerRequest,
            web::records::distributions::DistributionResponse,
            web::records::distributions::DistributionPage,
            web::records::distributions::CreateDistributionRequest,
            web::records::distributions::UpdateDistributionRequest,
            web::folders::FolderResponse,
            web::folders::FolderListingResponse,
            web::folders::FolderDetailResponse,
            web::folders::DeleteFolderResponse,
            web::folders::CreateFolderRequest,
            web::folders::UpdateFolderRequest,
            web::files::FileResponse,
            web::files::ShareRequest,
            web::files::ShareResponse,
            web::files::SharedWithMeResponse,
            web::files::UploadFileMultipart,
            web::attendance::BreakResponse,
            web::attendance::SessionResponse,
            web::attendance::CurrentResponse,
            web::attendance::ActiveAttendeeResponse,
            web::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Authentication"),
            (name = "Users", description = "User administration"),
            (name = "Navigation", description = "Role based navigation"),
            (name = "Dashboard", description = "Organisation summary"),
            (name = "Programs", description = "Programs"),
            (name = "Projects", description = "Projects"),
            (name = "Grants", description = "Grants"),
            (name = "Donations", description = "Donations"),
            (name = "Beneficiaries", description = "Beneficiaries"),
            (name = "Partners", description = "Partners"),
            (name = "Distributions", description = "Resource distribution"),
            (name = "Folders", description = "Folder tree and sharing"),
            (name = "Files", description = "File management"),
            (name = "Attendance", description = "Check-in, breaks and check-out"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([
            http::header::CONTENT_TYPE,
            http::header::AUTHORIZATION,
        ]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // FRONTEND_URL is mandatory in production; an unparsable one denies all.
        _ if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "ngo_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        storage = ?cfg.storage_backend,
        production = cfg.is_production,
        "Starting NGO dashboard backend"
    );

    // Database
    let pool = ngo_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    ngo_api::infrastructure::db::migrate(&pool).await?;

    let storage_port: Arc<dyn StoragePort> = match cfg.storage_backend {
        StorageBackend::Filesystem => {
            if let Err(e) = tokio::fs::create_dir_all(&cfg.storage_root).await {
                tracing::warn!(error = ?e, dir = %cfg.storage_root, "Failed to create storage dir");
            }
            Arc::new(ngo_api::infrastructure::storage::fs::FsStoragePort::new(
                &cfg.storage_root,
            ))
        }
        StorageBackend::S3 => {
            Arc::new(ngo_api::infrastructure::storage::s3::S3StoragePort::new(&cfg).await?)
        }
    };

    let records = RecordRepos {
        programs: Arc::new(SqlxProgramRepository::new(pool.clone())),
        projects: Arc::new(SqlxProjectRepository::new(pool.clone())),
        grants: Arc::new(SqlxGrantRepository::new(pool.clone())),
        donations: Arc::new(SqlxDonationRepository::new(pool.clone())),
        beneficiaries: Arc::new(SqlxBeneficiaryRepository::new(pool.clone())),
        partners: Arc::new(SqlxPartnerRepository::new(pool.clone())),
        distributions: Arc::new(SqlxDistributionRepository::new(pool.clone())),
    };
    let services = AppServices::new(
        Arc::new(SqlxUserRepository::new(pool.clone())),
        records,
        Arc::new(SqlxDashboardRepository::new(pool.clone())),
        Arc::new(SqlxFolderRepository::new(pool.clone())),
        Arc::new(SqlxFilesRepository::new(pool.clone())),
        storage_port,
        Arc::new(SqlxAttendanceRepository::new(pool.clone())),
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let app = Router::new()
        .nest("/api", web::health::routes(pool.clone()))
        .nest("/api", web::router(ctx))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&cfg))
        // Global body size limit for uploads (configurable)
        .layer(DefaultBodyLimit::max(cfg.upload_max_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(?e, "API server failed");
        return Err(e.into());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(?e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
