//! # docent 웹 서버 진입점
//!
//! 이 파일은 docent 애플리케이션의 **시작점(entry point)**입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 예시 문서(seed) 삽입
//! 6. API 라우터 설정 (REST + WebSocket)
//! 7. HTTP 서버 시작

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use docent::{config::Config, db, routes, routes::documents::AppState, services::OpenAiReviewer};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// #[tokio::main]: 비동기 런타임을 시작하는 어트리뷰트 매크로.
// 내부적으로 tokio 런타임을 생성하고 main을 그 안에서 실행합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok()는 Result를 Option으로 변환하여, .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // EnvFilter: RUST_LOG 환경변수로 로그 레벨을 제어합니다.
    // 환경변수가 없으면 기본값으로 docent, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docent=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting docent server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // 연결 풀: 연결을 미리 만들어두고 재사용하는 패턴.
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 마이그레이션 + 예시 문서 ──
    // sqlx::migrate!는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시키는 매크로
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    db::seed_documents(&pool).await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    // 리뷰어는 트레이트 객체(Arc<dyn Reviewer>)로 넣습니다.
    let state = AppState {
        pool: pool.clone(),
        reviewer: Arc::new(OpenAiReviewer::new(&config)),
    };

    // ── 7단계: API 라우터 설정 ──
    // 요청/응답 API와 WebSocket 채널을 /api/v1 아래에 함께 둡니다.
    // WebSocket 업그레이드는 GET 요청으로 시작하므로 get()으로 라우팅합니다.
    let api_routes = Router::new()
        .route("/document", get(routes::get_document))
        .route("/save", post(routes::save))
        .route("/create_version", post(routes::create_version))
        .route("/versions", get(routes::get_versions))
        .route("/ws", get(routes::review_ws))
        .route("/ws_ai_sugg", get(routes::incorporate_ws))
        .route("/health", get(routes::health_check))
        .with_state(state);

    // ── 8단계: CORS 미들웨어 설정 ──
    // 개발 환경에서는 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http()); // HTTP 요청/응답 자동 로깅

    // ── 9단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
