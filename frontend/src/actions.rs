use std::collections::BTreeMap;

pub const ADD_READING: &str = "add-reading";
pub const GET_READINGS: &str = "get-readings";

/// An operation the server has advertised: which HTTP method to use on which URL.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    pub method: String,
    pub url: String,
}

impl Action {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Action {
            method: method.into(),
            url: url.into(),
        }
    }
}

/// Operations by name. An operation that is not in the registry is not
/// available and callers skip it quietly.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ActionRegistry(BTreeMap<String, Action>);

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, action: Action) -> Option<Action> {
        self.0.insert(name.into(), action)
    }

    pub fn with(mut self, name: impl Into<String>, method: &str, url: &str) -> Self {
        self.insert(name, Action::new(method, url));
        self
    }

    /// Adds or replaces every action of `other`.
    pub fn extend(&mut self, other: ActionRegistry) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
