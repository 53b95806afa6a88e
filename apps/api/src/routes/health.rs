use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME")
    }))
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>resumeforge</title></head>
<body>
<h1>Build a professional resume</h1>
<p>Fill in the form, pick a layout, preview it and download a one-page A4 PDF.</p>
<ul>
<li><a href="/api/v1/forms">Create a resume</a> (POST to open a form)</li>
<li><a href="/api/v1/resumes">Your resume history</a></li>
<li><a href="/api/v1/session">Session</a></li>
</ul>
</body>
</html>
"#;

/// GET /
pub async fn landing_handler() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
