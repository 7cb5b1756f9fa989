use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde_json::json;
use tera::Context;
use uuid::Uuid;

use crate::chat::{Effect, Event, Turn};
use crate::web::models::{
    Directives, ErrorResponse, LanguageRequest, MessageRequest, SessionView, ToolRequest,
};
use crate::web::session::SessionError;
use crate::AppState;

// Index page handler. Every load starts a new conversation.
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let view = data
        .sessions
        .create(data.default_language)
        .and_then(|id| data.sessions.with_session(id, |s| SessionView::new(id, s.state())));
    let view = match view {
        Ok(view) => view,
        Err(e) => return session_error(e),
    };

    let mut context = Context::new();
    context.insert("view", &view);
    match data.tera.render("index.html", &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn get_session(data: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    snapshot(&data, path.into_inner(), false, Directives::default())
}

// Chat API endpoint
pub async fn send_message(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<MessageRequest>,
) -> HttpResponse {
    let session_id = path.into_inner();
    let message = req.into_inner().message;

    let effects = data.sessions.with_session(session_id, |session| {
        session.apply(Event::DraftChanged(message));
        session.apply(Event::Submit)
    });
    let effects = match effects {
        Ok(effects) => effects,
        Err(e) => return session_error(e),
    };

    let mut directives = Directives::default();
    let Some((epoch, transcript)) = run_effects(effects, &mut directives) else {
        return snapshot(&data, session_id, false, directives);
    };

    info!(
        "Submitting message for session {} ({} turns)",
        session_id,
        transcript.len()
    );

    // Spawned so the call and its resolution finish even if this request is
    // dropped. The store lock is not held across the await.
    let task = actix_web::rt::spawn({
        let data = data.clone();
        async move {
            let result = data.gateway.complete(&transcript).await;
            let effects = data.sessions.with_session(session_id, |session| {
                session.apply(Event::CompletionResolved { epoch, result })
            })?;
            let mut directives = directives;
            run_effects(effects, &mut directives);
            Ok::<_, SessionError>(directives)
        }
    });

    match task.await {
        Ok(Ok(directives)) => snapshot(&data, session_id, true, directives),
        Ok(Err(e)) => session_error(e),
        Err(e) => {
            error!("Completion task for session {} failed: {}", session_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Internal server error".to_string(),
            })
        }
    }
}

pub async fn new_chat(data: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    apply_and_snapshot(&data, path.into_inner(), Event::NewChat)
}

pub async fn select_tool(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ToolRequest>,
) -> HttpResponse {
    apply_and_snapshot(&data, path.into_inner(), Event::SelectTool(req.tool))
}

pub async fn select_language(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<LanguageRequest>,
) -> HttpResponse {
    let event = match req.language {
        Some(language) => Event::SelectLanguage(language),
        None => Event::ToggleLanguage,
    };
    apply_and_snapshot(&data, path.into_inner(), event)
}

fn apply_and_snapshot(data: &AppState, session_id: Uuid, event: Event) -> HttpResponse {
    let effects = match data.sessions.with_session(session_id, |s| s.apply(event)) {
        Ok(effects) => effects,
        Err(e) => return session_error(e),
    };
    let mut directives = Directives::default();
    run_effects(effects, &mut directives);
    snapshot(data, session_id, false, directives)
}

/// Carries out the side effects of a transition and hands back the pending
/// completion request, if the transition asked for one.
fn run_effects(effects: Vec<Effect>, directives: &mut Directives) -> Option<(u64, Vec<Turn>)> {
    let mut pending = None;
    for effect in effects {
        directives.absorb(&effect);
        match effect {
            Effect::RequestCompletion { epoch, transcript } => pending = Some((epoch, transcript)),
            Effect::LogFailure(e) => error!("Completion failed ({}): {}", e.kind(), e),
            Effect::ScrollToBottom | Effect::ResetInputHeight => {}
        }
    }
    pending
}

fn snapshot(
    data: &AppState,
    session_id: Uuid,
    accepted: bool,
    directives: Directives,
) -> HttpResponse {
    let view = data.sessions.with_session(session_id, |s| {
        SessionView::new(session_id, s.state())
            .accepted(accepted)
            .with_directives(directives)
    });
    match view {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => session_error(e),
    }
}

fn session_error(e: SessionError) -> HttpResponse {
    match e {
        SessionError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: e.to_string(),
        }),
        SessionError::Poisoned => {
            error!("Failed to lock session store: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Internal server error".to_string(),
            })
        }
    }
}
