use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::app_conf::AppConfig;
use crate::config::{AdminUserConfig, CotizacionConfig, JwtConfig, MinioConfig, MongoConfig};
use crate::middlewares::auth_middleware::AuthState;
use crate::model::user::User;
use crate::repository::cotizacion_repo::MongoCotizacionRepository;
use crate::repository::departamento_repo::MongoDepartamentoRepository;
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::router::cotizacion_router::cotizacion_router;
use crate::router::departamento_router::departamento_router;
use crate::router::user_router::user_router;
use crate::service::cotizacion_service::CotizacionServiceImpl;
use crate::service::departamento_service::DepartamentoServiceImpl;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::minio::MinioService;

pub struct App {
    config: AppConfig,
    router: Router,
    pub user_service: Arc<UserServiceImpl>,
    pub cotizacion_service: Arc<CotizacionServiceImpl>,
    pub departamento_service: Arc<DepartamentoServiceImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();

        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let minio_config = MinioConfig::from_env().expect("Minio config error");
        let cotizacion_config = CotizacionConfig::from_env().expect("Cotizacion config error");

        let user_repo = Arc::new(
            UserRepositoryImpl::new(&mongo_config)
                .await
                .expect("User repo error"),
        );
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let user_service = Arc::new(UserServiceImpl::new(user_repo.clone(), jwt_utils.clone()));

        let minio_service = Arc::new(
            MinioService::new(minio_config)
                .await
                .expect("Minio service error"),
        );
        let departamento_repo = Arc::new(
            MongoDepartamentoRepository::new(&mongo_config)
                .await
                .expect("Departamento repo error"),
        );
        let cotizacion_repo = MongoCotizacionRepository::new(&mongo_config)
            .await
            .expect("Cotizacion repo error");
        let cotizacion_repo_cascade = Arc::new(
            MongoCotizacionRepository::new(&mongo_config)
                .await
                .expect("Cotizacion repo error"),
        );

        let cotizacion_service = Arc::new(CotizacionServiceImpl {
            cotizacion_repo,
            departamento_repo: departamento_repo.clone(),
            user_repo: user_repo.clone(),
            minio_service: minio_service.clone(),
            config: cotizacion_config,
        });
        let departamento_service = Arc::new(DepartamentoServiceImpl {
            departamento_repo,
            cotizacion_repo: cotizacion_repo_cascade,
            minio_service,
        });

        let auth_state = Arc::new(AuthState { jwt_utils });

        let mut app = App {
            config,
            router: Router::new(),
            user_service,
            cotizacion_service,
            departamento_service,
        };
        app.router = app.create_router(auth_state);
        app.create_first_admin_user().await;
        app
    }

    fn create_router(&self, auth_state: Arc<AuthState>) -> Router {
        Router::new()
            .merge(cotizacion_router(
                self.cotizacion_service.clone(),
                auth_state.clone(),
            ))
            .merge(departamento_router(
                self.departamento_service.clone(),
                auth_state,
            ))
            .merge(user_router(self.user_service.clone()))
            .route("/health", get(|| async { "OK" }))
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(self.config.host.parse().expect("Invalid host"), self.config.port);
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }

    async fn create_first_admin_user(&self) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };

        let user_repo = self.user_service.user_repo.clone();
        match user_repo.find_by_username(&admin_conf.username).await {
            Ok(Some(_)) => {
                info!("Admin user already exists, skipping creation.");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to check for existing admin user: {e}");
                return;
            }
        }

        let user = User {
            id: None,
            username: admin_conf.username.clone(),
            first_name: admin_conf.first_name.clone(),
            last_name: admin_conf.last_name.clone(),
            email: admin_conf.email.clone(),
            password_hash: String::new(), // Set by register
            role: "admin".to_string(),
            created_at: None,
            updated_at: None,
        };
        match self.user_service.register(user, admin_conf.password.clone()).await {
            Ok(_) => info!("First admin user created."),
            Err(e) => error!("Failed to create admin user: {e}"),
        }
    }
}
