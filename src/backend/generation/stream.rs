/**
 * Streaming Page Generation
 *
 * `POST /api/ai-pages/stream` generates (or edits) a page and pushes the
 * result to the browser as Server-Sent Events:
 *
 * ```text
 * data: {"type":"start","message":"Starting page creation..."}
 * data: {"type":"content","content":"<div class=\"min-h-screen ..."}
 * ...
 * data: {"type":"done","page":{"id":"...","slug":"...", ...}}
 * ```
 *
 * The providers answer in one piece, so the finished HTML is replayed in
 * `CHUNK_SIZE` character chunks spaced `CHUNK_INTERVAL` apart. The work runs
 * in a spawned task that feeds an mpsc channel; the response body unfolds
 * the receiver. A client that disconnects closes the channel; the task stops
 * sending but still saves the page and charges for it.
 */

use std::time::Duration;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures_util::stream;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{resolve_generator, GeneratedPage, GenerationError};
use crate::backend::cache::keys;
use crate::backend::credits::{self, CreditAction, CreditStatus};
use crate::backend::error::{BackendError, INSUFFICIENT_CREDITS_CODE};
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::pages::{db, generate_slug, AiPage};
use crate::backend::server::state::AppState;
use crate::shared::event::chunk_content;
use crate::shared::{GenerationEvent, SharedError, StreamedPage};

/// Characters per `content` event
pub const CHUNK_SIZE: usize = 100;

/// Pause between `content` events
pub const CHUNK_INTERVAL: Duration = Duration::from_millis(10);

/// Longest prompt prefix used as a default title
const TITLE_PREFIX_CHARS: usize = 50;

/// Markers the dashboard puts in the system message of an edit conversation
const EDIT_MODE_MARKERS: &[&str] = &["MODO EDIÇÃO PONTUAL", "EDIT MODE"];

/// Markers the dashboard puts before the current HTML in a user message
const CURRENT_HTML_MARKERS: &[&str] = &["HTML ATUAL DA PÁGINA", "CURRENT PAGE HTML"];

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl ChatMessage {
    fn text(&self) -> Option<&str> {
        self.content.as_str()
    }

    fn mentions(&self, role: &str, markers: &[&str]) -> bool {
        self.role == role
            && self
                .text()
                .is_some_and(|text| markers.iter().any(|marker| text.contains(marker)))
    }
}

/// `POST /api/ai-pages/stream` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub id: Option<String>,
}

impl StreamRequest {
    /// An edit needs the edit-mode system message plus a page id or the
    /// current HTML in a user message
    pub fn is_edit(&self) -> bool {
        let edit_mode = self
            .messages
            .iter()
            .any(|m| m.mentions("system", EDIT_MODE_MARKERS));
        let has_html = self
            .messages
            .iter()
            .any(|m| m.mentions("user", CURRENT_HTML_MARKERS));
        edit_mode && (self.id.is_some() || has_html)
    }

    /// The last message when it is a user message, else `prompt`
    pub fn effective_prompt(&self) -> &str {
        match self.messages.last() {
            Some(last) if last.role == "user" => last.text().unwrap_or(&self.prompt),
            _ => &self.prompt,
        }
    }

    pub fn title_or_default(&self) -> String {
        match self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(title) => title.to_string(),
            None => default_title(&self.prompt),
        }
    }
}

/// First 50 characters of the prompt, with `...` when it was longer
pub fn default_title(prompt: &str) -> String {
    let mut title: String = prompt.chars().take(TITLE_PREFIX_CHARS).collect();
    if prompt.chars().count() > TITLE_PREFIX_CHARS {
        title.push_str("...");
    }
    title
}

enum Target {
    Create { slug: String },
    Edit { page: AiPage },
}

struct StreamJob {
    state: AppState,
    user: AuthenticatedUser,
    action: CreditAction,
    target: Target,
    title: String,
    prompt: String,
}

type EventSender = mpsc::Sender<GenerationEvent>;

pub async fn stream_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<StreamRequest>,
) -> Result<Response, BackendError> {
    if body.prompt.trim().is_empty() {
        return Err(SharedError::validation("prompt", "Prompt is required").into());
    }
    let pool = state.db()?;

    let is_edit = body.is_edit();
    let action = if is_edit {
        CreditAction::PageEdit
    } else {
        CreditAction::PageCreation
    };
    info!(
        "Stream request from {} (edit={}, messages={})",
        user.user_id,
        is_edit,
        body.messages.len()
    );

    let required = action.cost();
    let status = match state.main_db_pool.as_ref() {
        Some(main_db) => credits::check_user_credit_status(main_db, &user.user_id, required).await,
        None => {
            warn!("Main database not configured; {} has no plan", user.user_id);
            CreditStatus::no_plan(required, "None", "Main database is not configured")
        }
    };
    if !status.has_credits {
        info!("User {} cannot afford {} ({})", user.user_id, action.as_str(), status.message);
        let mut details = status.details();
        details.insert("action".into(), serde_json::json!(action.label()));
        let event = GenerationEvent::error_with_details(
            status.stream_error(action),
            INSUFFICIENT_CREDITS_CODE,
            details,
        );
        return Ok(single_event(event));
    }

    let edited = match (is_edit, body.id.as_deref()) {
        (true, Some(id)) => {
            let id = Uuid::parse_str(id).map_err(|_| BackendError::not_found("Page not found"))?;
            let page = db::find_owned(pool, id, &user.user_id)
                .await?
                .ok_or_else(|| BackendError::not_found("Page not found"))?;
            Some(page)
        }
        _ => None,
    };

    let target = match edited {
        Some(page) => Target::Edit { page },
        None => {
            let base = match body.slug.as_deref().map(str::trim) {
                Some(slug) if !slug.is_empty() => slug.to_string(),
                _ => generate_slug(&body.title_or_default()),
            };
            Target::Create {
                slug: db::unique_slug(pool, &base).await?,
            }
        }
    };

    let title = match (&target, body.title.as_deref().filter(|t| !t.trim().is_empty())) {
        (_, Some(title)) => title.to_string(),
        (Target::Edit { page }, None) => page.title.clone(),
        (Target::Create { .. }, None) => default_title(&body.prompt),
    };

    let job = StreamJob {
        state,
        user,
        action,
        target,
        title,
        prompt: body.effective_prompt().to_string(),
    };

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(run_job(job, tx));
    Ok(sse_response(rx))
}

fn sse_response(rx: mpsc::Receiver<GenerationEvent>) -> Response {
    let events = stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        if event.is_terminal() {
            debug!("Generation stream finished");
        }
        Some((Event::default().json_data(&event), rx))
    });
    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}

fn single_event(event: GenerationEvent) -> Response {
    let (tx, rx) = mpsc::channel(1);
    if tx.try_send(event).is_err() {
        warn!("Could not queue stream event");
    }
    sse_response(rx)
}

async fn run_job(job: StreamJob, tx: EventSender) {
    let start_message = match job.target {
        Target::Edit { .. } => "Starting page edit...",
        Target::Create { .. } => "Starting page creation...",
    };
    if tx.send(GenerationEvent::start(start_message)).await.is_err() {
        return;
    }

    let event = match generate_and_save(&job, &tx).await {
        Ok(Some(page)) => GenerationEvent::done(page),
        Ok(None) => return,
        Err(e) => {
            error!("Streaming generation for {} failed: {}", job.user.user_id, e);
            GenerationEvent::error(e.to_string())
        }
    };
    let _ = tx.send(event).await;
}

#[derive(Debug, thiserror::Error)]
enum StreamError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("Failed to save page: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database is not configured")]
    NoDatabase,
}

/// Generate, replay the HTML in chunks, persist. `Ok(None)` means the
/// client went away mid-replay; the page is saved and charged regardless.
async fn generate_and_save(job: &StreamJob, tx: &EventSender) -> Result<Option<StreamedPage>, StreamError> {
    let state = &job.state;
    let pool = state.db_pool.as_ref().ok_or(StreamError::NoDatabase)?;
    let generator = resolve_generator(state).await?;

    let generated = match &job.target {
        Target::Edit { page } => {
            generator
                .edit_page(&job.title, &page.html_content, &job.prompt)
                .await?
        }
        Target::Create { .. } => generator.create_page(&job.title, &job.prompt).await?,
    };

    let mut connected = true;
    for chunk in chunk_content(&generated.html_content, CHUNK_SIZE) {
        if tx.send(GenerationEvent::content(chunk)).await.is_err() {
            info!("Stream client for {} disconnected; saving page anyway", job.user.user_id);
            connected = false;
            break;
        }
        tokio::time::sleep(CHUNK_INTERVAL).await;
    }

    let saved = save(pool, job, generated).await?;
    after_save(job, &saved).await;
    if !connected {
        return Ok(None);
    }

    Ok(Some(StreamedPage {
        id: saved.id,
        title: saved.title,
        slug: saved.slug,
        html_content: saved.html_content,
        created_at: saved.created_at,
        updated_at: saved.updated_at,
    }))
}

async fn save(pool: &sqlx::PgPool, job: &StreamJob, generated: GeneratedPage) -> Result<AiPage, sqlx::Error> {
    match &job.target {
        Target::Edit { page } => {
            let mut page = page.clone();
            page.title = job.title.clone();
            page.html_content = generated.html_content;
            page.meta_title = Some(generated.meta_title);
            page.meta_description = Some(generated.meta_description);
            page.og_title = Some(generated.og_title);
            page.og_description = Some(generated.og_description);
            db::save_page(pool, &page).await
        }
        Target::Create { slug } => {
            let mut new_page = crate::backend::pages::types::NewPage {
                title: job.title.clone(),
                slug: slug.clone(),
                html_content: generated.html_content,
                prompt: Some(job.prompt.clone()),
                user_id: job.user.user_id.clone(),
                ..Default::default()
            };
            new_page.fields.meta_title = Some(generated.meta_title);
            new_page.fields.meta_description = Some(generated.meta_description);
            new_page.fields.og_title = Some(generated.og_title);
            new_page.fields.og_description = Some(generated.og_description);
            let page = db::insert_page(pool, &new_page).await?;
            job.state.metrics.record_page_created();
            Ok(page)
        }
    }
}

/// Credits, referral reward, sync and cache invalidation; all best-effort
async fn after_save(job: &StreamJob, page: &AiPage) {
    let state = &job.state;
    let user_id = &job.user.user_id;
    let is_edit = matches!(job.target, Target::Edit { .. });

    let charged = match state.main_db_pool.as_ref() {
        Some(main_db) => {
            let verb = if is_edit { "Page edit" } else { "Page creation" };
            let reference = page.id.to_string();
            credits::consume_credits(
                main_db,
                user_id,
                job.action.cost(),
                job.action,
                &format!("{verb}: {}", page.title),
                Some(&reference),
            )
            .await
            .success
        }
        None => false,
    };

    if is_edit {
        let stale = keys::page_invalidation(&page.slug, None, false);
        state.cache.del_many(&stale).await;
        return;
    }

    if charged {
        if let Some(pool) = state.db_pool.as_ref() {
            match db::count_user_pages(pool, user_id).await {
                Ok(1) => {
                    info!("First page for {}, requesting referral reward", user_id);
                    state.upstream.credit_signup_reward_logged(user_id).await;
                }
                Ok(_) => {}
                Err(e) => warn!("Could not count pages for {}: {:?}", user_id, e),
            }
        }
    }

    state.upstream.sync_page_logged(&page.sync_payload()).await;
}
