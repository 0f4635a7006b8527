extern crate chrono;
extern crate console_error_panic_hook;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

pub mod actions;
pub mod class_hint;
pub mod config;
pub mod memory;
pub mod reading;
pub mod reconcile;
pub mod transport;
pub mod widget;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use actions::{Action, ActionRegistry};
pub use class_hint::{unwrap_class_hints, ClassHintError, ClassHints, Native, Payload, Slot};
pub use config::WidgetConfig;
pub use reading::Reading;
pub use reconcile::{reconcile, ListView, ReadingFields, ReadingPanel};
pub use transport::{MessageDisplay, Request, Transport, TransportError};
pub use widget::Readit;

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(contents: &str);
}
