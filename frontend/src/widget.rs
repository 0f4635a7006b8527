use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::actions::{Action, ActionRegistry, ADD_READING, GET_READINGS};
use crate::class_hint::{unwrap_class_hints, ClassHints, Native, Payload};
use crate::reading::Reading;
use crate::reconcile::{reconcile, ListView, ReadingFields, ReadingPanel};
use crate::transport::{LogMessages, MessageDisplay, Request, Transport, TransportError};

struct State<V, P> {
    readings: Vec<Reading>,
    actions: ActionRegistry,
    view: V,
    panel: P,
}

/// The reading list widget.
///
/// Keeps the readings, renders them into a [`ListView`] and talks to the
/// server through the advertised actions. Handles are cheap to clone and
/// share the same state.
pub struct Readit<V, P> {
    state: Rc<RefCell<State<V, P>>>,
    hints: Rc<ClassHints<Native>>,
    transport: Rc<dyn Transport>,
    messages: Rc<dyn MessageDisplay>,
    navigate: Rc<dyn Fn(&str)>,
}

impl<V, P> Clone for Readit<V, P> {
    fn clone(&self) -> Self {
        Readit {
            state: self.state.clone(),
            hints: self.hints.clone(),
            transport: self.transport.clone(),
            messages: self.messages.clone(),
            navigate: self.navigate.clone(),
        }
    }
}

impl<V, P> Readit<V, P>
where
    V: ListView + 'static,
    P: ReadingPanel + 'static,
{
    pub fn new(view: V, panel: P, transport: Rc<dyn Transport>) -> Self {
        Readit {
            state: Rc::new(RefCell::new(State {
                readings: Vec::new(),
                actions: ActionRegistry::new(),
                view,
                panel,
            })),
            hints: Rc::new(ClassHints::standard()),
            transport,
            messages: Rc::new(LogMessages),
            navigate: Rc::new(|url: &str| log::warn!("no navigator installed, not following {}", url)),
        }
    }

    pub fn with_messages(mut self, messages: Rc<dyn MessageDisplay>) -> Self {
        self.messages = messages;
        self
    }

    /// Called with the target of every `redirect_to` the server answers with.
    pub fn with_navigator(mut self, navigate: impl Fn(&str) + 'static) -> Self {
        self.navigate = Rc::new(navigate);
        self
    }

    pub fn with_class_hints(mut self, hints: ClassHints<Native>) -> Self {
        self.hints = Rc::new(hints);
        self
    }

    pub fn with_actions(self, actions: ActionRegistry) -> Self {
        self.state.borrow_mut().actions.extend(actions);
        self
    }

    pub fn with_readings(self, readings: Vec<Reading>) -> Self {
        self.state.borrow_mut().readings = readings;
        self
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.state.borrow().readings.clone()
    }

    pub fn set_readings(&self, readings: Vec<Reading>) {
        self.state.borrow_mut().readings = readings;
    }

    pub fn push_reading(&self, reading: Reading) {
        self.state.borrow_mut().readings.push(reading);
    }

    pub fn actions(&self) -> ActionRegistry {
        self.state.borrow().actions.clone()
    }

    pub fn set_action(&self, name: &str, action: Action) {
        self.state.borrow_mut().actions.insert(name, action);
    }

    pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.state.borrow().view)
    }

    pub fn with_panel<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.state.borrow().panel)
    }

    pub fn create_reading(&self, attrs: &Value) -> Reading {
        Reading::from_json(attrs)
    }

    /// Brings the list view in line with the readings.
    pub fn update(&self) {
        let on_select = self.selector();
        let mut state = self.state.borrow_mut();
        let State { readings, view, .. } = &mut *state;
        reconcile(readings, view, on_select);
    }

    /// Shows `reading` in the detail panel.
    pub fn show_reading(&self, reading: &Reading) {
        self.state.borrow_mut().panel.fill(&ReadingFields::from(reading));
    }

    /// Sends `reading` to the server and puts the stored copy at the front
    /// of the list. Does nothing without an `add-reading` action.
    pub fn add_reading(&self, reading: &Reading) {
        let Some(action) = self.action(ADD_READING) else {
            return;
        };
        let request = Request::for_action(&action).with_json(&reading.to_json());

        let widget = self.clone();
        self.transport.send(
            request,
            Box::new(move |result| {
                let Some(body) = widget.accept(result) else { return };
                log::debug!("add-reading succeeded: {}", body);

                match body.get("new_reading") {
                    Some(new_reading) => {
                        let reading = widget.revive(new_reading);
                        widget.state.borrow_mut().readings.insert(0, reading);
                        widget.update();
                    }
                    None => log::warn!("add-reading answered without a new_reading"),
                }
            }),
        );
    }

    /// Replaces the readings with the server's list. Does nothing without a
    /// `get-readings` action.
    pub fn fetch_readings(&self) {
        let Some(action) = self.action(GET_READINGS) else {
            return;
        };

        let widget = self.clone();
        self.transport.send(
            Request::for_action(&action),
            Box::new(move |result| {
                let Some(body) = widget.accept(result) else { return };
                log::debug!("get-readings succeeded: {}", body);

                match body.get("readings").and_then(Value::as_array) {
                    Some(readings) => {
                        let readings = readings.iter().map(|r| widget.revive(r)).collect();
                        widget.state.borrow_mut().readings = readings;
                        widget.update();
                    }
                    None => log::warn!("get-readings answered without a readings list"),
                }
            }),
        );
    }

    fn action(&self, name: &str) -> Option<Action> {
        let action = self.state.borrow().actions.get(name).cloned();
        if action.is_none() {
            log::debug!("no {} action defined", name);
        }
        action
    }

    /// Reports failures and follows redirects; what is left is a body to apply.
    fn accept(&self, result: Result<Value, TransportError>) -> Option<Value> {
        match result {
            Err(err) => {
                log::debug!("request failed: {}", err);
                self.messages.show(err.status, &err.status_text, &err.error);
                None
            }
            Ok(body) => match body.get("redirect_to").and_then(Value::as_str) {
                Some(url) => {
                    log::debug!("handling redirect to {}", url);
                    (self.navigate)(url);
                    None
                }
                None => Some(body),
            },
        }
    }

    fn revive(&self, wire: &Value) -> Reading {
        let Some(object) = wire.as_object() else {
            return Reading::from_json(wire);
        };
        let mut payload: Payload<Native> = Payload::from(object.clone());
        if let Err(err) = unwrap_class_hints(&mut payload, self.hints.as_ref()) {
            log::warn!("reading {} has a bad class hint: {}", wire, err);
        }
        Reading::from_payload(&payload)
    }

    fn selector(&self) -> Rc<dyn Fn(&Reading)> {
        let state: Weak<RefCell<State<V, P>>> = Rc::downgrade(&self.state);
        Rc::new(move |reading: &Reading| {
            let Some(state) = state.upgrade() else { return };
            match state.try_borrow_mut() {
                Ok(mut state) => state.panel.fill(&ReadingFields::from(reading)),
                Err(_) => log::warn!("widget busy, not showing {:?}", reading.title),
            };
        })
    }
}
