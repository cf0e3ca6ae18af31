//! Single-shot request plumbing for `ajax`.
//!
//! Requests never touch a real network: the host resolves each one through
//! its registered request handler (status 0 when none is registered), then
//! reports the outcome through the caller's callback exactly once. There is
//! no retry, timeout, or cancellation.

use std::error::Error as StdError;
use std::fmt;

/// Request description handed to [`crate::Host::ajax`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxOptions {
    pub method: String,
    pub url: String,
    /// Parse the response body as JSON before reporting it.
    pub json: bool,
    /// Treat status 0 as success, for file-origin style requests where
    /// status reporting is unreliable.
    pub local: bool,
}

impl AjaxOptions {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            json: false,
            local: false,
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }
}

/// What the registered request handler sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxRequest {
    pub method: String,
    pub url: String,
}

/// What the registered request handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxResponse {
    pub status: u16,
    pub body: String,
}

impl AjaxResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// Terminal lifecycle position of a request when its outcome was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Unsent,
    Opened,
    HeadersReceived,
    Loading,
    Done,
}

impl ReadyState {
    pub fn code(self) -> u8 {
        match self {
            Self::Unsent => 0,
            Self::Opened => 1,
            Self::HeadersReceived => 2,
            Self::Loading => 3,
            Self::Done => 4,
        }
    }
}

/// Successful response payload: parsed JSON or the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum AjaxBody {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Debug)]
pub enum AjaxError {
    Fetch { status: u16, state: ReadyState },
    Parse(serde_json::Error),
}

impl fmt::Display for AjaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { status, state } => {
                write!(f, "Fetch failed: status={status}, state={}", state.code())
            }
            Self::Parse(err) => write!(f, "response parse failed: {err}"),
        }
    }
}

impl StdError for AjaxError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Fetch { .. } => None,
            Self::Parse(err) => Some(err),
        }
    }
}

/// Outcome delivered to the `ajax` callback, exactly once per request.
pub type AjaxResult = std::result::Result<AjaxBody, AjaxError>;

pub(crate) type AjaxCallbackBox = Box<dyn FnOnce(AjaxResult)>;

pub(crate) type RequestHandlerBox = Box<dyn FnMut(&AjaxRequest) -> AjaxResponse>;

pub(crate) struct PendingRequest {
    pub(crate) options: AjaxOptions,
    pub(crate) callback: AjaxCallbackBox,
}

/// Classifies a handler response under the options' success rules.
pub(crate) fn resolve(options: &AjaxOptions, response: &AjaxResponse) -> AjaxResult {
    let success = response.status == 200 || (options.local && response.status == 0);
    if !success {
        return Err(AjaxError::Fetch {
            status: response.status,
            state: ReadyState::Done,
        });
    }

    if options.json {
        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(AjaxBody::Json(value)),
            Err(err) => Err(AjaxError::Parse(err)),
        }
    } else {
        Ok(AjaxBody::Text(response.body.clone()))
    }
}
