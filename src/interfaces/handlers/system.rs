use actix_web::{web, get, HttpResponse, Responder};
use humantime::format_duration;
use once_cell::sync::Lazy;
use chrono::Utc;
use parking_lot::RwLock;
use std::{
    time::Duration,
    sync::atomic::{AtomicI64, Ordering},
};
use sysinfo::System;
use serde::Serialize;
use crate::{
    constants::START_TIME,
    repositories::{blog_post::BlogPostRepository, project::ProjectRepository},
    AppState,
};

const CACHE_TTL_SECS: i64 = 5;

#[derive(Serialize, Clone, Default)]
struct SystemInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
}

#[derive(Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    storage_backend: String,
    storage: String,
    chat_upstream: String,
    version: String,
    memory_usage: String,
    system: SystemInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> = Lazy::new(||
    RwLock::new(HealthCheckResponse::default())
);

async fn build_health_response(state: &AppState) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime_duration = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime_duration.num_seconds().max(0) as u64));

    let mut sys = System::new_all();
    sys.refresh_all();

    let system_info = SystemInfo {
        os: System::name().unwrap_or_else(|| "Unknown".to_string()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
    };

    let projects_ok = state.project_handler.project_repo.check_connection().await.is_ok();
    let posts_ok = state.blog_handler.blog_post_repo.check_connection().await.is_ok();
    let storage_ok = projects_ok && posts_ok;

    let process = sysinfo::get_current_pid().ok().and_then(|pid| sys.process(pid));
    let memory_usage = process.map_or("Unknown".to_string(), |p|
        format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0)
    );

    let chat_upstream = if state.chat_configured { "Configured" } else { "Fallback only" };

    HealthCheckResponse {
        status: if storage_ok { "healthy" } else { "degraded" }.to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        storage_backend: state.storage_backend.to_string(),
        storage: if storage_ok { "OK" } else { "Unavailable" }.to_string(),
        chat_upstream: chat_upstream.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        memory_usage,
        system: system_info,
    }
}

/// Cached for a few seconds; probing sysinfo on every hit is expensive.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    let response = if now - last > CACHE_TTL_SECS {
        let fresh = build_health_response(&state).await;
        *CACHED_STATUS.write() = fresh.clone();
        LAST_CHECK.store(now, Ordering::Relaxed);
        fresh
    } else {
        CACHED_STATUS.read().clone()
    };

    let mut builder = if response.status == "healthy" {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder.json(serde_json::json!({ "success": response.status == "healthy", "data": response }))
}
