//! Post and comment handlers.
//!
//! Content-mutating operations check the admin policy first and touch
//! no state when it fails.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use quill_core::domain::{Comment, NewComment, NewPost, Post, PostDraft, User};
use quill_core::policy::ensure_admin;
use quill_shared::ApiResponse;
use quill_shared::dto::{CommentRequest, CommentResponse, PostDetailResponse, PostRequest, PostResponse};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post, author: Option<&User>) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        subtitle: post.subtitle,
        date: post.date,
        body: post.body,
        img_url: post.img_url,
        author_id: post.author_id,
        author_name: author.map(|u| u.name.clone()).unwrap_or_default(),
    }
}

fn comment_response(comment: Comment, author: Option<&User>) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        body: comment.body,
        author_id: comment.author_id,
        author_name: author.map(|u| u.name.clone()).unwrap_or_default(),
        created_at: comment.created_at.to_rfc3339(),
    }
}

fn draft_from(req: PostRequest) -> Result<PostDraft, AppError> {
    let draft = PostDraft {
        title: req.title,
        subtitle: req.subtitle,
        body: req.body,
        img_url: req.img_url,
    };
    draft.validate()?;
    Ok(draft)
}

/// GET / - all posts in insertion order, public.
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list()
        .await?
        .into_iter()
        .map(|(post, author)| post_response(post, author.as_ref()))
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /post/{id} - a single post with its comments, public.
pub async fn show_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post_id)))?;

    let author = state.users.find_by_id(post.author_id).await?;

    let comments = state
        .comments
        .list_for_post(post_id)
        .await?
        .into_iter()
        .map(|(comment, commenter)| comment_response(comment, commenter.as_ref()))
        .collect::<Vec<_>>();

    let can_comment = state.resolve_actor(viewer.0.as_ref()).await?.is_some();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: post_response(post, author.as_ref()),
        comments,
        can_comment,
    })))
}

/// POST /post/{id} - comment on a post, authenticated only.
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    viewer: OptionalIdentity,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let actor = state
        .resolve_actor(viewer.0.as_ref())
        .await?
        .ok_or(AppError::LoginRequired)?;

    let req = body.into_inner();
    if req.body.trim().is_empty() {
        return Err(AppError::Validation("Comment is required".to_string()));
    }

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post_id)))?;

    let comment = state
        .comments
        .create(NewComment {
            post_id: post.id,
            author_id: actor.id,
            body: req.body,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(comment_response(comment, Some(&actor)))))
}

/// POST /new-post - create a post, admin only.
pub async fn create_post(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let actor = state.resolve_actor(viewer.0.as_ref()).await?;
    let admin = ensure_admin(actor.as_ref())?;

    let draft = draft_from(body.into_inner())?;

    let post = state
        .posts
        .create(NewPost::from_draft(admin.id, draft, Utc::now()))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(post, Some(admin)))))
}

/// GET /edit-post/{id} - current fields for the editor, admin only.
pub async fn edit_form(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let actor = state.resolve_actor(viewer.0.as_ref()).await?;
    ensure_admin(actor.as_ref())?;

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post_id)))?;

    let author = state.users.find_by_id(post.author_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post, author.as_ref()))))
}

/// POST /edit-post/{id} - update a post's editable fields, admin only.
/// Creation date and author never change.
pub async fn edit_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    viewer: OptionalIdentity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let actor = state.resolve_actor(viewer.0.as_ref()).await?;
    ensure_admin(actor.as_ref())?;

    let draft = draft_from(body.into_inner())?;

    let post = match state.posts.update(post_id, draft).await {
        Ok(post) => post,
        Err(quill_core::error::RepoError::NotFound) => {
            return Err(AppError::NotFound(format!(
                "Post with id {} not found",
                post_id
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let author = state.users.find_by_id(post.author_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post, author.as_ref()))))
}

/// GET /delete/{id} - delete a post and its comments, admin only.
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let actor = state.resolve_actor(viewer.0.as_ref()).await?;
    ensure_admin(actor.as_ref())?;

    match state.posts.delete_with_comments(post_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Post deleted"))),
        Err(quill_core::error::RepoError::NotFound) => Err(AppError::NotFound(format!(
            "Post with id {} not found",
            post_id
        ))),
        Err(e) => Err(e.into()),
    }
}
