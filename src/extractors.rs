use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` whose rejections render as a 400 [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` whose rejections render as a 400 [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
