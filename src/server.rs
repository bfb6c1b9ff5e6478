use crate::error::PredictError;
use crate::input::read_form;
use crate::state::{ServiceConfig, ServiceState};
use actix_cors::Cors;
use actix_web::{HttpRequest, HttpResponse, HttpServer, get, post, web};
use std::io::Write;

#[get("/")]
pub async fn home(_req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Sentiment Analysis API")
}

#[post("/predict")]
pub async fn predict(
    req: HttpRequest,
    payload: web::Payload,
    app_state: web::Data<ServiceState>,
) -> Result<HttpResponse, PredictError> {
    log::info!("Received predict request");
    let form = read_form(&req, payload, app_state.max_upload_bytes).await?;
    log::debug!(
        "Form text field: {:?}, file: {:?}",
        form.text,
        form.file.as_ref().map(|f| (&f.filename, f.content.len()))
    );

    let texts = form.into_texts()?;
    log::debug!("Text data: {:?}", texts);

    let state = app_state.clone();
    let response = web::block(move || state.classify(&texts))
        .await
        .map_err(|e| PredictError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(response))
}

/// Installs the process-wide logger. Safe to call more than once.
pub fn init_logging(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .try_init();
}

/// Cross-origin requests are accepted from anywhere.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home).service(predict);
}

pub async fn startup(config: ServiceConfig, state: ServiceState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    log::info!("Starting server at {}:{}", config.host, config.port);

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(cors())
            .app_data(app_state.clone())
            .configure(configure)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    std::io::Result::Ok(())
}
