use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::XmlHttpRequest;

use crate::transport::{Completion, Request, SharedCompletion, Transport, TransportError};

/// Sends requests with `XMLHttpRequest`.
pub struct XhrTransport;

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

fn outcome(xhr: &XmlHttpRequest) -> Result<Value, TransportError> {
    let status = xhr.status().unwrap_or(0);
    let status_text = xhr.status_text().unwrap_or_default();

    if !(200..300).contains(&status) {
        let error = if status_text.is_empty() { "error".to_owned() } else { status_text.clone() };
        return Err(TransportError::new(status, status_text, error));
    }

    let body = xhr.response_text().ok().flatten().unwrap_or_default();
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body)
        .map_err(|err| TransportError::new(status, status_text, format!("parsererror: {}", err)))
}

impl Transport for XhrTransport {
    fn send(&self, request: Request, on_done: Completion) {
        let xhr = match XmlHttpRequest::new() {
            Ok(xhr) => xhr,
            Err(err) => return on_done(Err(TransportError::new(0, "error", describe(err)))),
        };
        if let Err(err) = xhr.open_with_async(&request.method, &request.url, true) {
            return on_done(Err(TransportError::new(0, "error", describe(err))));
        }
        for (name, value) in &request.headers {
            if let Err(err) = xhr.set_request_header(name, value) {
                log::warn!("could not set header {}: {}", name, describe(err));
            }
        }

        let completion = SharedCompletion::new(on_done);
        let on_load_end = {
            let xhr = xhr.clone();
            let completion = completion.clone();
            Closure::once_into_js(move || {
                completion.complete(outcome(&xhr));
            })
        };
        xhr.set_onloadend(Some(on_load_end.unchecked_ref()));

        if let Err(err) = xhr.send_with_opt_str(request.body.as_deref()) {
            let error = describe(err);
            log::warn!("{} {} was not sent: {}", request.method, request.url, error);
            completion.complete(Err(TransportError::new(0, "error", error)));
        }
    }
}
