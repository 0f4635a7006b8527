use std::rc::Rc;

use crate::reading::Reading;

/// What a rendered reading shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadingFields {
    pub title: String,
    pub when: String,
    pub href: String,
    pub rel: &'static str,
    pub url: String,
}

impl From<&Reading> for ReadingFields {
    fn from(reading: &Reading) -> Self {
        ReadingFields {
            title: reading.title.clone(),
            when: reading.when_text(),
            href: reading.link.clone(),
            rel: "external",
            url: reading.link.clone(),
        }
    }
}

/// A list of rendered readings anchored on a template node.
///
/// The template is never reported by [`ListView::rendered`] and new nodes
/// always go in right before it, so it stays the last sibling.
pub trait ListView {
    type Node: Clone;

    /// Every rendered node except the template, in document order.
    fn rendered(&self) -> Vec<Self::Node>;

    fn node_id(&self, node: &Self::Node) -> Option<String>;

    fn find(&self, id: &str) -> Option<Self::Node>;

    /// Clones the template, gives the clone `id`, strips the template marker
    /// and inserts it before the template. `None` when there is no template.
    fn insert_from_template(&mut self, id: &str) -> Option<Self::Node>;

    fn remove(&mut self, node: &Self::Node);

    fn fill(&mut self, node: &Self::Node, fields: &ReadingFields);

    /// Replaces the node's activation handler.
    fn bind_activation(&mut self, node: &Self::Node, handler: Rc<dyn Fn()>);
}

/// The detail panel that shows a single reading.
pub trait ReadingPanel {
    fn fill(&mut self, fields: &ReadingFields);
}

/// Makes `view` show `readings`, matching nodes to readings by id.
///
/// Nodes whose id no longer belongs to a reading are removed first. Readings
/// with a node get their fields overwritten, the others get a fresh clone of
/// the template. Activating a node calls `on_select` with its reading.
pub fn reconcile<V: ListView>(readings: &[Reading], view: &mut V, on_select: Rc<dyn Fn(&Reading)>) {
    for node in view.rendered() {
        let backed = view
            .node_id(&node)
            .map(|id| readings.iter().any(|reading| reading.id.as_deref() == Some(id.as_str())))
            .unwrap_or(false);
        if !backed {
            view.remove(&node);
        }
    }

    for reading in readings {
        let Some(id) = reading.id.as_deref() else {
            log::debug!("not rendering {:?}, it has no id yet", reading.title);
            continue;
        };

        let node = match view.find(id) {
            Some(node) => node,
            None => match view.insert_from_template(id) {
                Some(node) => node,
                None => {
                    log::warn!("no template to render reading {} with", id);
                    return;
                }
            },
        };

        let selected = reading.clone();
        let on_select = on_select.clone();
        view.bind_activation(&node, Rc::new(move || on_select(&selected)));
        view.fill(&node, &ReadingFields::from(reading));
    }
}
