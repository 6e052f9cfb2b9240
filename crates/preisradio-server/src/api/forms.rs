//! Contact and merchant-onboarding form relays.
//!
//! Both endpoints answer in the storefront's own JSON shape
//! (`{success: true}` or `{error: "..."}`), which the browser forms expect.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use preisradio_core::{ContactMessage, ShopRequest};
use serde_json::json;

use super::AppState;

const MISSING_FIELDS: &str = "Alle Felder sind erforderlich";
const CONTACT_FAILED: &str = "Fehler beim Senden der Nachricht";
const SHOP_REQUEST_FAILED: &str = "Fehler beim Verarbeiten der Anfrage";
const MAIL_FROM: &str = "Preisradio <noreply@preisradio.de>";

fn form_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn success() -> Response {
    Json(json!({ "success": true })).into_response()
}

pub(super) async fn contact(State(state): State<AppState>, body: Bytes) -> Response {
    let message: ContactMessage = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(error) => {
            tracing::warn!(error = %error, "contact form: unreadable body");
            return form_error(StatusCode::INTERNAL_SERVER_ERROR, CONTACT_FAILED);
        }
    };

    if !message.is_complete() {
        return form_error(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    }

    match state.api.submit_contact(&message).await {
        Ok(()) => {
            tracing::info!(subject = %message.subject, "contact form relayed");
            success()
        }
        Err(error) => {
            tracing::error!(error = %error, "contact form relay failed");
            form_error(StatusCode::INTERNAL_SERVER_ERROR, CONTACT_FAILED)
        }
    }
}

pub(super) async fn shop_request(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ShopRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!(error = %error, "shop request: unreadable body");
            return form_error(StatusCode::INTERNAL_SERVER_ERROR, SHOP_REQUEST_FAILED);
        }
    };

    if !request.is_complete() {
        return form_error(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    }

    let Some(api_key) = state.config.resend_api_key.as_deref() else {
        tracing::info!(
            shop_name = %request.shop_name,
            website = %request.website,
            email = %request.email,
            "shop request received; no mail relay configured"
        );
        return success();
    };

    let mail = json!({
        "from": MAIL_FROM,
        "to": [state.config.contact_email],
        "subject": format!("Neue Händler-Anfrage: {}", request.shop_name),
        "text": shop_request_text(&request),
    });

    let outcome = state
        .http
        .post(&state.config.resend_endpoint)
        .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
        .json(&mail)
        .send()
        .await;

    match outcome {
        Ok(response) if response.status().is_success() => {
            tracing::info!(shop_name = %request.shop_name, "shop request mailed");
            success()
        }
        Ok(response) => {
            tracing::error!(status = %response.status(), "mail relay rejected shop request");
            form_error(StatusCode::INTERNAL_SERVER_ERROR, SHOP_REQUEST_FAILED)
        }
        Err(error) => {
            tracing::error!(error = %error, "mail relay unreachable");
            form_error(StatusCode::INTERNAL_SERVER_ERROR, SHOP_REQUEST_FAILED)
        }
    }
}

fn shop_request_text(request: &ShopRequest) -> String {
    format!(
        "Neue Händler-Anfrage auf Preisradio\n\n\
         Shop-Name: {}\n\
         Website: {}\n\
         E-Mail: {}\n\n\
         ---\n\
         Gesendet von preisradio.de/haendler",
        request.shop_name, request.website, request.email
    )
}
