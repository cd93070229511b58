//! Request body extractor for user fields.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{Map, Value};

/// User fields from a JSON object body, or from a form-encoded body where
/// every value arrives as a string.
pub struct UserFields(pub Map<String, Value>);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

#[async_trait]
impl<S> FromRequest<S> for UserFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            // a repeated key keeps its last value
            let fields = pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
            return Ok(Self(fields));
        }
        let Json(fields) = Json::<Map<String, Value>>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn extract(content_type: &str, body: &'static str) -> Result<Value, StatusCode> {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        match UserFields::from_request(req, &()).await {
            Ok(UserFields(fields)) => Ok(Value::Object(fields)),
            Err(res) => Err(res.status()),
        }
    }

    #[tokio::test]
    async fn json_and_form_bodies_become_fields() {
        assert_eq!(
            extract("application/json", r#"{"name":"A","age":3}"#).await,
            Ok(json!({"name": "A", "age": 3}))
        );
        assert_eq!(
            extract("application/x-www-form-urlencoded", "name=Ada+L&city=Paris").await,
            Ok(json!({"name": "Ada L", "city": "Paris"}))
        );
        assert_eq!(
            extract("application/x-www-form-urlencoded; charset=utf-8", "").await,
            Ok(json!({}))
        );
    }

    #[tokio::test]
    async fn other_bodies_are_rejected() {
        assert_eq!(extract("application/json", "[1,2]").await, Err(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(extract("text/plain", "name=A").await, Err(StatusCode::UNSUPPORTED_MEDIA_TYPE));
    }
}
