use std::path::PathBuf;

use axum::{
    Router,
    middleware::{from_fn, map_response_with_state},
    routing::{get, patch},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use super::{
    endpoints::{
        aplicaciones, clientes, freelancer_habilidades, freelancers, habilidades, index,
        proyectos, tables,
    },
    errors::{ErrorMode, apply_error_mode},
    middleware::log_request,
};
use crate::repo::{FacadeMarketplace, RelationalStore};

pub const DASHBOARD_FILE: &str = "freelancer-dashboard.html";

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub error_mode: ErrorMode,
    /// Directory served for any path not matched by the API, `None` disables static files
    pub static_dir: Option<PathBuf>,
}

pub fn router<S: RelationalStore>(facade: FacadeMarketplace<S>, options: RouterOptions) -> Router {
    let mut router = Router::new()
        .route("/", get(index::index))
        .route("/tablas", get(tables::dump::<S>))
        .route("/schema", get(tables::schema::<S>))
        .route("/clientes", get(clientes::list::<S>).post(clientes::create::<S>))
        .route("/clientes/:id", get(clientes::get::<S>))
        .route(
            "/freelancers",
            get(freelancers::list::<S>).post(freelancers::create::<S>),
        )
        .route("/freelancers/:id", get(freelancers::get::<S>))
        .route(
            "/proyectos",
            get(proyectos::list::<S>).post(proyectos::create::<S>),
        )
        .route("/proyectos/:id", get(proyectos::get::<S>))
        .route(
            "/habilidades",
            get(habilidades::list::<S>).post(habilidades::create::<S>),
        )
        .route(
            "/aplicaciones",
            get(aplicaciones::list::<S>).post(aplicaciones::create::<S>),
        )
        .route(
            "/aplicaciones/:id",
            patch(aplicaciones::update_estado::<S>),
        )
        .route(
            "/freelancer-habilidades",
            get(freelancer_habilidades::list::<S>).post(freelancer_habilidades::create::<S>),
        );

    if let Some(dir) = options.static_dir {
        router = router
            .route_service("/dashboard", ServeFile::new(dir.join(DASHBOARD_FILE)))
            .fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(facade)
        .layer(map_response_with_state(options.error_mode, apply_error_mode))
        .layer(from_fn(log_request))
        .layer(CorsLayer::permissive())
}
