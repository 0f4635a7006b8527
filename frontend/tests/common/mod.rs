#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use readit_frontend::memory::{MemoryListView, MemoryMessages, MemoryPanel};
use readit_frontend::transport::{Completion, Request, Transport, TransportError};
use readit_frontend::{ActionRegistry, Readit, Reading};
use serde_json::Value;

/// Answers requests synchronously with queued responses and remembers what
/// was sent. Each test builds its own.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<Value, TransportError>>>,
    requests: RefCell<Vec<Request>>,
}

impl FakeTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, body: Value) {
        self.responses.borrow_mut().push_back(Ok(body));
    }

    pub fn fail(&self, status: u16, phrase: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError::new(status, phrase, phrase)));
    }

    pub fn was_called(&self) -> bool {
        !self.requests.borrow().is_empty()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: Request, on_done: Completion) {
        self.requests.borrow_mut().push(request);
        let response = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new(599, "No Response", "no response queued")));
        on_done(response);
    }
}

pub type TestReadit = Readit<MemoryListView, MemoryPanel>;

pub struct Harness {
    pub readit: TestReadit,
    pub transport: Rc<FakeTransport>,
    pub messages: Rc<MemoryMessages>,
    pub navigated: Rc<RefCell<Option<String>>>,
}

pub fn harness() -> Harness {
    build(ActionRegistry::new())
}

pub fn harness_with_actions() -> Harness {
    build(readit_actions())
}

fn build(actions: ActionRegistry) -> Harness {
    let transport = FakeTransport::new();
    let messages = Rc::new(MemoryMessages::new());
    let navigated = Rc::new(RefCell::new(None));
    let navigated0 = navigated.clone();

    let readit = Readit::new(MemoryListView::new(), MemoryPanel::default(), transport.clone())
        .with_actions(actions)
        .with_messages(messages.clone())
        .with_navigator(move |url: &str| *navigated0.borrow_mut() = Some(url.to_owned()));

    Harness {
        readit,
        transport,
        messages,
        navigated,
    }
}

pub fn readit_actions() -> ActionRegistry {
    ActionRegistry::new()
        .with("add-reading", "POST", "http://add/reading")
        .with("get-readings", "GET", "http://readings")
}

pub fn create_reading(id: &str) -> Reading {
    Reading::new(format!("title {}", id), format!("http://link/{}", id)).with_id(id)
}
