use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node};

use crate::config::{MessageSelectors, WidgetConfig};
use crate::reconcile::{ListView, ReadingFields, ReadingPanel};
use crate::transport::MessageDisplay;

/// CSS selectors for the parts of a rendered reading.
#[derive(Clone, Debug)]
struct FieldSelectors {
    title: String,
    when: String,
    link: String,
    url: String,
}

impl From<&WidgetConfig> for FieldSelectors {
    fn from(config: &WidgetConfig) -> Self {
        FieldSelectors {
            title: config.title.clone(),
            when: config.when.clone(),
            link: config.link.clone(),
            url: config.url.clone(),
        }
    }
}

fn each_match(root: &Element, selector: &str, mut f: impl FnMut(Element)) {
    let Ok(matches) = root.query_selector_all(selector) else {
        log::warn!("bad selector {:?}", selector);
        return;
    };
    for index in 0..matches.length() {
        if let Some(element) = matches.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            f(element);
        }
    }
}

fn fill_element(root: &Element, selectors: &FieldSelectors, fields: &ReadingFields) {
    each_match(root, &selectors.title, |el| el.set_text_content(Some(&fields.title)));
    each_match(root, &selectors.when, |el| el.set_text_content(Some(&fields.when)));
    each_match(root, &selectors.link, |el| {
        for (name, value) in [("href", fields.href.as_str()), ("rel", fields.rel)] {
            if let Err(err) = el.set_attribute(name, value) {
                log::warn!("could not set {} on {:?}: {:?}", name, fields.title, err);
            }
        }
    });
    each_match(root, &selectors.url, |el| el.set_text_content(Some(&fields.url)));
}

/// The reading list as it lives in the document: the template item and the
/// siblings cloned from it.
pub struct DomListView {
    template: Element,
    template_class: String,
    selectors: FieldSelectors,
    handlers: HashMap<String, Closure<dyn FnMut()>>,
}

impl DomListView {
    pub fn new(document: &Document, config: &WidgetConfig) -> Option<Self> {
        let template = document.query_selector(&config.reading_li).ok().flatten()?;
        Some(DomListView {
            template,
            template_class: config.template.clone(),
            selectors: FieldSelectors::from(config),
            handlers: HashMap::new(),
        })
    }

    fn is_template(&self, element: &Element) -> bool {
        element.class_list().contains(&self.template_class)
    }
}

impl ListView for DomListView {
    type Node = Element;

    fn rendered(&self) -> Vec<Element> {
        let Some(parent) = self.template.parent_element() else {
            return Vec::new();
        };
        let children = parent.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .filter(|child| !self.is_template(child))
            .collect()
    }

    fn node_id(&self, node: &Element) -> Option<String> {
        let id = node.id();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    fn find(&self, id: &str) -> Option<Element> {
        self.rendered().into_iter().find(|element| element.id() == id)
    }

    fn insert_from_template(&mut self, id: &str) -> Option<Element> {
        let parent = self.template.parent_node()?;
        let clone = self
            .template
            .clone_node_with_deep(true)
            .ok()?
            .dyn_into::<Element>()
            .ok()?;
        clone.set_id(id);
        if let Err(err) = clone.class_list().remove_1(&self.template_class) {
            log::warn!("could not strip the template class: {:?}", err);
        }
        let anchor: &Node = self.template.as_ref();
        parent.insert_before(&clone, Some(anchor)).ok()?;
        Some(clone)
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
        self.handlers.remove(&node.id());
    }

    fn fill(&mut self, node: &Element, fields: &ReadingFields) {
        fill_element(node, &self.selectors, fields);
    }

    fn bind_activation(&mut self, node: &Element, handler: Rc<dyn Fn()>) {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let on_click = Closure::<dyn FnMut()>::new(move || handler());
        element.set_onclick(Some(on_click.as_ref().unchecked_ref()));
        // drops the closure of the previous binding
        self.handlers.insert(node.id(), on_click);
    }
}

/// The reading info box.
pub struct DomPanel {
    element: Option<Element>,
    selectors: FieldSelectors,
}

impl DomPanel {
    pub fn new(document: &Document, config: &WidgetConfig) -> Self {
        DomPanel {
            element: document.query_selector(&config.reading_info).ok().flatten(),
            selectors: FieldSelectors::from(config),
        }
    }
}

impl ReadingPanel for DomPanel {
    fn fill(&mut self, fields: &ReadingFields) {
        match &self.element {
            Some(element) => fill_element(element, &self.selectors, fields),
            None => log::debug!("no reading info element to show {:?} in", fields.title),
        }
    }
}

/// Shows status, phrase and error of failed requests and unhides itself.
pub struct DomMessageBox {
    element: Element,
    selectors: MessageSelectors,
}

impl DomMessageBox {
    pub fn new(document: &Document, selectors: &MessageSelectors) -> Option<Self> {
        let element = document.query_selector(&selectors.selector).ok().flatten()?;
        Some(DomMessageBox {
            element,
            selectors: selectors.clone(),
        })
    }
}

impl MessageDisplay for DomMessageBox {
    fn show(&self, status: u16, phrase: &str, error: &str) {
        let status = status.to_string();
        each_match(&self.element, &self.selectors.status, |el| el.set_text_content(Some(&status)));
        each_match(&self.element, &self.selectors.phrase, |el| el.set_text_content(Some(phrase)));
        each_match(&self.element, &self.selectors.error, |el| el.set_text_content(Some(error)));

        if let Some(element) = self.element.dyn_ref::<HtmlElement>() {
            if let Err(err) = element.style().set_property("display", "block") {
                log::warn!("could not show the message box: {:?}", err);
            }
        }
    }
}
