use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;

use crate::actions::Action;

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
pub const JSON_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    pub fn for_action(action: &Action) -> Self {
        Request {
            method: action.method.clone(),
            url: action.url.clone(),
            headers: vec![("Accept".into(), JSON_ACCEPT.into())],
            body: None,
        }
    }

    pub fn with_json(mut self, body: &Value) -> Self {
        self.headers
            .push(("Content-Type".into(), JSON_CONTENT_TYPE.into()));
        self.body = Some(body.to_string());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A failed exchange as the browser reports it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{status} {status_text}: {error}")]
pub struct TransportError {
    pub status: u16,
    pub status_text: String,
    pub error: String,
}

impl TransportError {
    pub fn new(status: u16, status_text: impl Into<String>, error: impl Into<String>) -> Self {
        TransportError {
            status,
            status_text: status_text.into(),
            error: error.into(),
        }
    }
}

pub type Completion = Box<dyn FnOnce(Result<Value, TransportError>)>;

/// A completion that several callbacks race to call. Only the first call
/// gets through.
#[derive(Clone)]
pub struct SharedCompletion {
    pending: Rc<RefCell<Option<Completion>>>,
}

impl SharedCompletion {
    pub fn new(on_done: Completion) -> Self {
        SharedCompletion {
            pending: Rc::new(RefCell::new(Some(on_done))),
        }
    }

    /// Returns `false` when the completion already ran.
    pub fn complete(&self, result: Result<Value, TransportError>) -> bool {
        let on_done = self.pending.borrow_mut().take();
        match on_done {
            Some(on_done) => {
                on_done(result);
                true
            }
            None => false,
        }
    }
}

/// Sends requests and hands the decoded JSON body (or the failure) to
/// `on_done`, possibly before `send` returns.
pub trait Transport {
    fn send(&self, request: Request, on_done: Completion);
}

/// Shows transport failures to the user.
pub trait MessageDisplay {
    fn show(&self, status: u16, phrase: &str, error: &str);
}

/// Fallback display that only logs.
pub struct LogMessages;

impl MessageDisplay for LogMessages {
    fn show(&self, status: u16, phrase: &str, error: &str) {
        log::warn!("request failed: {} {} ({})", status, phrase, error);
    }
}
