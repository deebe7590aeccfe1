//! HTTP Handlers

use std::sync::Arc;

use auth::Session;
use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use kernel::id::PostId;
use platform::template::Templates;
use serde::Serialize;

use crate::domain::entities::Post;
use crate::domain::repository::PostRepository;
use crate::error::{BlogError, BlogResult};
use crate::presentation::forms::PostForm;

/// Shared state for blog handlers
#[derive(Clone)]
pub struct BlogAppState<R>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub templates: Arc<Templates>,
}

#[derive(Serialize)]
struct IndexPage {
    posts: Vec<Post>,
}

#[derive(Serialize)]
struct PostPage {
    post: Post,
}

/// `post_id` is set when editing; the template picks the form action from it
#[derive(Serialize)]
struct FormPage {
    form: PostForm,
    post_id: Option<PostId>,
}

fn render<T: Serialize>(
    templates: &Templates,
    session: &Session,
    status: StatusCode,
    page: &str,
    data: T,
) -> BlogResult<Response> {
    let body = templates.render(page, &session.page(data))?;
    Ok((status, Html(body)).into_response())
}

fn render_form(
    templates: &Templates,
    session: &Session,
    status: StatusCode,
    form: PostForm,
    post_id: Option<PostId>,
) -> BlogResult<Response> {
    render(
        templates,
        session,
        status,
        "post_form.html",
        FormPage { form, post_id },
    )
}

fn parse_form(form: Result<Form<PostForm>, FormRejection>) -> BlogResult<PostForm> {
    form.map(|Form(form)| form)
        .map_err(|e| BlogError::MalformedForm(e.body_text()))
}

fn view_path(id: PostId) -> String {
    format!("/post/view/{id}")
}

// ============================================================================
// Public
// ============================================================================

/// GET /
pub async fn index<R>(
    State(state): State<BlogAppState<R>>,
    session: Session,
) -> BlogResult<Response>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let posts = state.repo.get_all().await?;

    render(
        &state.templates,
        &session,
        StatusCode::OK,
        "index.html",
        IndexPage { posts },
    )
}

/// GET /post/view/{id}
pub async fn view<R>(
    State(state): State<BlogAppState<R>>,
    session: Session,
    Path(id): Path<String>,
) -> BlogResult<Response>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let id: PostId = id.parse()?;
    let post = state.repo.get(id).await?;

    render(
        &state.templates,
        &session,
        StatusCode::OK,
        "post.html",
        PostPage { post },
    )
}

// ============================================================================
// Add (requires authentication)
// ============================================================================

/// GET /post/add
pub async fn add_page<R>(
    State(state): State<BlogAppState<R>>,
    session: Session,
) -> BlogResult<Response>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    render_form(
        &state.templates,
        &session,
        StatusCode::OK,
        PostForm::add(),
        None,
    )
}

/// POST /post/add
pub async fn add<R>(
    State(state): State<BlogAppState<R>>,
    session: Session,
    form: Result<Form<PostForm>, FormRejection>,
) -> BlogResult<Response>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let mut form = parse_form(form)?;
    form.name = PostForm::ADD.to_string();

    if !form.validate() {
        return render_form(
            &state.templates,
            &session,
            StatusCode::UNPROCESSABLE_ENTITY,
            form,
            None,
        );
    }

    let id = state.repo.insert(&form.title, &form.content).await?;

    tracing::info!(post_id = %id, "Post created");
    session.put_flash("Post created successfully");

    Ok(Redirect::to(&view_path(id)).into_response())
}

// ============================================================================
// Edit (requires authentication)
// ============================================================================

/// GET /post/edit/{id}
pub async fn edit_page<R>(
    State(state): State<BlogAppState<R>>,
    session: Session,
    Path(id): Path<String>,
) -> BlogResult<Response>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let id: PostId = id.parse()?;
    let post = state.repo.get(id).await?;

    render_form(
        &state.templates,
        &session,
        StatusCode::OK,
        PostForm::edit(post),
        Some(id),
    )
}

/// POST /post/edit/{id}
pub async fn edit<R>(
    State(state): State<BlogAppState<R>>,
    session: Session,
    Path(id): Path<String>,
    form: Result<Form<PostForm>, FormRejection>,
) -> BlogResult<Response>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let id: PostId = id.parse()?;
    let mut form = parse_form(form)?;
    form.name = PostForm::EDIT.to_string();

    if !form.validate() {
        // Still 404 for a post that does not exist
        state.repo.get(id).await?;
        return render_form(
            &state.templates,
            &session,
            StatusCode::UNPROCESSABLE_ENTITY,
            form,
            Some(id),
        );
    }

    state.repo.update(id, &form.title, &form.content).await?;

    tracing::info!(post_id = %id, "Post updated");
    session.put_flash("Post updated successfully");

    Ok(Redirect::to(&view_path(id)).into_response())
}

// ============================================================================
// Delete (requires authentication)
// ============================================================================

/// GET or POST /post/delete/{id}
pub async fn delete<R>(
    State(state): State<BlogAppState<R>>,
    session: Session,
    Path(id): Path<String>,
) -> BlogResult<Response>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let id: PostId = id.parse()?;
    state.repo.delete(id).await?;

    tracing::info!(post_id = %id, "Post deleted");
    session.put_flash("Post deleted successfully");

    Ok(Redirect::to("/").into_response())
}
