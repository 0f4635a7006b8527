pub mod console;
pub mod dom;
pub mod xhr;

use std::rc::Rc;

use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::actions::Action;
use crate::config::WidgetConfig;
use crate::widget::Readit;
use dom::{DomListView, DomMessageBox, DomPanel};
use xhr::XhrTransport;

pub type BrowserReadit = Readit<DomListView, DomPanel>;

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document to attach to"))
}

fn set_location(url: &str) {
    match web_sys::window() {
        Some(window) => {
            if let Err(err) = window.location().set_href(url) {
                log::warn!("could not navigate to {}: {:?}", url, err);
            }
        }
        None => log::warn!("no window to navigate to {}", url),
    }
}

/// The widget as seen from JavaScript.
#[wasm_bindgen]
pub struct ReaditHandle {
    widget: BrowserReadit,
}

#[wasm_bindgen]
impl ReaditHandle {
    pub fn update(&self) {
        self.widget.update();
    }

    #[wasm_bindgen(js_name = fetchReadings)]
    pub fn fetch_readings(&self) {
        self.widget.fetch_readings();
    }

    /// Takes the reading as a JSON string.
    #[wasm_bindgen(js_name = addReading)]
    pub fn add_reading(&self, reading: &str) -> Result<(), JsValue> {
        let attrs: Value = serde_json::from_str(reading).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.widget.add_reading(&self.widget.create_reading(&attrs));
        Ok(())
    }

    #[wasm_bindgen(js_name = setAction)]
    pub fn set_action(&self, name: &str, method: &str, url: &str) {
        self.widget.set_action(name, Action::new(method, url));
    }

    #[wasm_bindgen(js_name = readingCount)]
    pub fn reading_count(&self) -> usize {
        self.widget.readings().len()
    }
}

/// Wires the widget to the document. `config` is the widget configuration as
/// JSON; an empty string selects the defaults.
#[wasm_bindgen]
pub fn bootstrap(config: &str) -> Result<ReaditHandle, JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let config = WidgetConfig::from_json(config).map_err(|err| JsValue::from_str(&err.to_string()))?;
    console::init(config.log_level());

    let document = document()?;
    let view = DomListView::new(&document, &config)
        .ok_or_else(|| JsValue::from_str(&format!("no template matches {}", config.reading_li)))?;
    let panel = DomPanel::new(&document, &config);

    let mut widget = Readit::new(view, panel, Rc::new(XhrTransport))
        .with_actions(config.actions.clone())
        .with_navigator(set_location);
    match DomMessageBox::new(&document, &config.message) {
        Some(message_box) => widget = widget.with_messages(Rc::new(message_box)),
        None => log::debug!("no message box matches {}", config.message.selector),
    }

    log::debug!("readit attached with actions {:?}", config.actions);
    Ok(ReaditHandle { widget })
}
