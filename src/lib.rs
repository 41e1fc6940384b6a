pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod usecases;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::DocumentStore;
use crate::repositories::{
    StoreAppointmentRepository, StoreDoctorRepository, StoreHospitalRepository, StoreUserRepository,
};
use crate::usecases::{AppointmentUsecase, DoctorUsecase, HospitalUsecase, UserUsecase};

/// Shared handler state: configuration, signing keys and one usecase per resource.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,
    pub store: Arc<dyn DocumentStore>,
    pub users: Arc<UserUsecase>,
    pub hospitals: Arc<HospitalUsecase>,
    pub doctors: Arc<DoctorUsecase>,
    pub appointments: Arc<AppointmentUsecase>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let jwt = Arc::new(JwtKeys::new(&config.jwt));

        let users = UserUsecase::new(Arc::new(StoreUserRepository::new(store.clone())), jwt.clone());
        let hospitals = HospitalUsecase::new(Arc::new(StoreHospitalRepository::new(store.clone())));
        let doctors = DoctorUsecase::new(Arc::new(StoreDoctorRepository::new(store.clone())));
        let appointments = AppointmentUsecase::new(Arc::new(StoreAppointmentRepository::new(store.clone())));

        Self {
            config: Arc::new(config),
            jwt,
            store,
            users: Arc::new(users),
            hospitals: Arc::new(hospitals),
            doctors: Arc::new(doctors),
            appointments: Arc::new(appointments),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::health::root))
        .route("/healthcheck", get(handlers::health::healthcheck))
        .route("/health", get(handlers::health::health))
        .merge(public_routes())
        // Protected (bearer access token)
        .merge(protected_routes(&state))
        // Global middleware
        .layer(cors_layer(&state.config))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::{doctor, hospital, user};

    Router::new()
        .route("/users", post(user::register_user))
        .route("/users/login", post(user::login_user))
        .route("/users/refresh", post(user::refresh_token))
        .route("/hospitals", get(hospital::get_hospitals))
        .route("/hospitals/:id", get(hospital::get_hospital_by_id))
        .route("/doctors/:id", get(doctor::get_doctor_by_id))
        .route("/doctors/hospital/:id", get(doctor::get_doctors_by_hospital_id))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::patch;
    use handlers::{appointment, doctor, hospital, user};

    Router::new()
        .route(
            "/users/:id",
            get(user::get_user_by_id).patch(user::update_user_by_id).delete(user::delete_user_by_id),
        )
        .route("/hospitals", post(hospital::create_hospital))
        .route(
            "/hospitals/:id",
            patch(hospital::update_hospital_by_id).delete(hospital::delete_hospital),
        )
        .route("/doctors", post(doctor::create_doctor))
        .route(
            "/doctors/:id",
            patch(doctor::update_doctor_by_id).delete(doctor::delete_doctor_by_id),
        )
        .route("/appointments", post(appointment::create_appointment))
        .route(
            "/appointments/:id",
            get(appointment::get_single_appointment_by_id)
                .patch(appointment::update_appointment_by_id)
                .delete(appointment::delete_appointment_by_id),
        )
        .route("/appointments/user/:id", get(appointment::get_appointments_by_user_id))
        .route("/appointments/doctor/:id", get(appointment::get_appointments_by_doctor_id))
        .route_layer(axum::middleware::from_fn_with_state(
            state.jwt.clone(),
            middleware::jwt_auth_middleware,
        ))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
}
