use askama::Template;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::models::Explanation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Html,
    Text,
}

impl ResponseFormat {
    /// Picks a representation from an `Accept` header value. No header means JSON;
    /// anything that names neither JSON nor HTML gets plain text.
    pub fn from_accept(accept: Option<&str>) -> Self {
        let Some(accept) = accept.map(str::trim).filter(|a| !a.is_empty()) else {
            return ResponseFormat::Json;
        };

        if accept.contains("application/json") {
            ResponseFormat::Json
        } else if accept.contains("text/html") {
            ResponseFormat::Html
        } else {
            ResponseFormat::Text
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
            ResponseFormat::Html => "text/html; charset=utf-8",
            ResponseFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

#[derive(Template)]
#[template(source = "<p>{{ analysis }}</p>", ext = "html")]
struct AnswerTemplate<'a> {
    analysis: &'a str,
}

pub fn render_body(explanation: &Explanation, format: ResponseFormat) -> Result<String, ApiError> {
    match format {
        ResponseFormat::Json => {
            serde_json::to_string(explanation).map_err(|err| ApiError::Internal(err.to_string()))
        }
        ResponseFormat::Html => {
            let template = AnswerTemplate {
                analysis: &explanation.analysis,
            };
            Ok(template.render()?)
        }
        ResponseFormat::Text => Ok(explanation.analysis.clone()),
    }
}

pub fn render_response(
    explanation: &Explanation,
    format: ResponseFormat,
) -> Result<Response, ApiError> {
    let body = render_body(explanation, format)?;
    Ok(([(CONTENT_TYPE, format.content_type())], body).into_response())
}
