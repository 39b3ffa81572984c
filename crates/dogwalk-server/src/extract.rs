//! Extractors whose rejections render as [`ServerError`] bodies.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServerError;

/// JSON body extractor that rejects with a 400 `{error:{code,message}}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

/// Query-string extractor that rejects with a 400 `{error:{code,message}}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub struct ApiQuery<T>(pub T);
