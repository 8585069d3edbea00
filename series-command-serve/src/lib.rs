pub mod action;
pub mod middleware;
pub mod response;

use std::{sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    BoxError, Router,
};
use series_common::{repository::Store, Conf, MEMORY_DATABASE};
use series_queries::{MemoryStore, PgStore};
use series_usecase::{
    CreateReviewInteractor, CreateSeriesInteractor, DefaultPresenter,
    FindReviewsBySeriesInteractor, FindSeriesByIdInteractor, FindSeriesByTitleInteractor,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// All interactors of the API, built once per server over the same store.
pub struct Interactors<S> {
    pub create_series: CreateSeriesInteractor<S, DefaultPresenter>,
    pub create_review: CreateReviewInteractor<S, DefaultPresenter>,
    pub find_series_by_id: FindSeriesByIdInteractor<S, DefaultPresenter>,
    pub find_series_by_title: FindSeriesByTitleInteractor<S, DefaultPresenter>,
    pub find_reviews_by_series: FindReviewsBySeriesInteractor<S, DefaultPresenter>,
}

impl<S: Store> Interactors<S> {
    pub fn new(store: S, timeout: Duration) -> Self {
        Self {
            create_series: CreateSeriesInteractor::new(store.clone(), DefaultPresenter, timeout),
            create_review: CreateReviewInteractor::new(store.clone(), DefaultPresenter, timeout),
            find_series_by_id: FindSeriesByIdInteractor::new(store.clone(), DefaultPresenter, timeout),
            find_series_by_title: FindSeriesByTitleInteractor::new(
                store.clone(),
                DefaultPresenter,
                timeout,
            ),
            find_reviews_by_series: FindReviewsBySeriesInteractor::new(
                store,
                DefaultPresenter,
                timeout,
            ),
        }
    }
}

pub fn router<S: Store>(interactors: Interactors<S>) -> Router {
    let api = Router::new()
        .route(
            "/series",
            post(action::create_series::<S>).get(action::find_series_by_title::<S>),
        )
        .route("/series/:id", get(action::find_series_by_id::<S>))
        .route("/series/:id/reviews", get(action::find_reviews_by_series::<S>))
        .route("/reviews", post(action::create_review::<S>));

    Router::new().nest("/v1", api).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::log_requests))
            .layer(CorsLayer::permissive())
            .layer(HandleErrorLayer::new(|error: BoxError| async move {
                if error.is::<tower::timeout::error::Elapsed>() {
                    StatusCode::REQUEST_TIMEOUT
                } else if error.is::<tower::load_shed::error::Overloaded>() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    tracing::error!(error = %error, "unhandled service error");

                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }))
            .load_shed()
            .concurrency_limit(1024)
            .timeout(REQUEST_TIMEOUT)
            .layer(Extension(Arc::new(interactors)))
            .into_inner(),
    )
}

pub async fn run(conf: &Conf) -> Result<(), series_common::Report> {
    if conf.database == MEMORY_DATABASE {
        tracing::warn!("using the in-memory store, nothing will be persisted");

        return serve(conf, MemoryStore::new()).await;
    }

    let pool = series_queries::init_database_connection(conf).await?;

    series_queries::migrate(&pool).await?;

    serve(conf, PgStore::new(pool)).await
}

async fn serve<S: Store>(conf: &Conf, store: S) -> Result<(), series_common::Report> {
    let app = router(Interactors::new(store, conf.timeout()));

    let listener = tokio::net::TcpListener::bind(conf.address()).await?;

    tracing::info!("starting on `{}`", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(err = %err, "unable to listen for shutdown signal");
    }

    tracing::info!("server is shutting down");
}
