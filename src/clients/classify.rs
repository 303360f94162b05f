//! Mapping of error responses to [`Error`] kinds.

use serde_json::Value;

use crate::clients::errors::{
    Error, Problem, RateLimitError, ResponseError, ServerError, UnauthorizedError,
};
use crate::clients::http_response::HttpResponse;

/// Status codes reported as [`ServerError`].
pub const SERVER_ERROR_CODES: [u16; 5] = [500, 502, 503, 504, 507];

/// Classifies a response into an error, or `None` if it should be decoded.
///
/// 2xx and 404 responses pass through; whether a 404 is acceptable is decided
/// by the response-type directory of the request.
#[must_use]
pub fn classify(response: &HttpResponse) -> Option<Error> {
    let code = response.code;
    if code < 400 || code == 404 {
        return None;
    }

    let body = serde_json::from_str::<Value>(&response.body).ok();
    let message = error_message(response, body.as_ref());

    let error = match code {
        401 => UnauthorizedError::new(code, message).into(),
        429 => RateLimitError {
            status: code,
            message,
            retry_after: response.retry_after(),
        }
        .into(),
        _ if SERVER_ERROR_CODES.contains(&code) => ServerError {
            status: code,
            message,
        }
        .into(),
        _ => ResponseError {
            status: code,
            message,
            problem: body.and_then(|body| problem(&body)),
        }
        .into(),
    };

    Some(error)
}

/// Picks the message from `detail`, then `error_description`, then the status line.
fn error_message(response: &HttpResponse, body: Option<&Value>) -> String {
    let field = |name: &str| {
        body.and_then(|body| body.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    field("detail")
        .or_else(|| field("error_description"))
        .unwrap_or_else(|| {
            format!("{} {}", response.code, response.reason_phrase())
                .trim_end()
                .to_string()
        })
}

fn problem(body: &Value) -> Option<Problem> {
    let problem: Problem = serde_json::from_value(body.clone()).ok()?;
    if problem == Problem::default() {
        None
    } else {
        Some(problem)
    }
}
