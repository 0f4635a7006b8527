use thiserror::Error;

use crate::actions::ActionRegistry;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("widget configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the message box lives and where its parts are inside it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MessageSelectors {
    pub selector: String,
    pub status: String,
    pub phrase: String,
    pub error: String,
}

impl Default for MessageSelectors {
    fn default() -> Self {
        MessageSelectors {
            selector: "#message".into(),
            status: ".status".into(),
            phrase: ".phrase".into(),
            error: ".error".into(),
        }
    }
}

/// Widget options. Every field may be left out of the JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetConfig {
    /// The template list item new readings are cloned from.
    #[serde(rename = "reading_li_selector")]
    pub reading_li: String,
    #[serde(rename = "reading_info_selector")]
    pub reading_info: String,
    /// Class marking the template; stripped from clones.
    #[serde(rename = "template_class")]
    pub template: String,
    #[serde(rename = "title_selector")]
    pub title: String,
    #[serde(rename = "when_selector")]
    pub when: String,
    #[serde(rename = "link_selector")]
    pub link: String,
    #[serde(rename = "url_selector")]
    pub url: String,
    #[serde(rename = "message_selectors")]
    pub message: MessageSelectors,
    pub actions: ActionRegistry,
    pub debug: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            reading_li: "#reading".into(),
            reading_info: "#readinginfo".into(),
            template: "template".into(),
            title: ".title".into(),
            when: ".when".into(),
            link: ".link".into(),
            url: ".url".into(),
            message: MessageSelectors::default(),
            actions: ActionRegistry::default(),
            debug: false,
        }
    }
}

impl WidgetConfig {
    /// Blank input means defaults.
    pub fn from_json(config: &str) -> Result<Self, ConfigError> {
        if config.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(config)?)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, GET_READINGS};

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::from_json("").unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.reading_li, "#reading");
        assert_eq!(config.message.selector, "#message");
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_selectors_are_parameters() {
        let config = WidgetConfig::from_json(
            r##"{
                "template_class": "p-template",
                "reading_li_selector": "#p-reading",
                "title_selector": ".p-title",
                "url_selector": "#p-url",
                "message_selectors": { "selector": "#parameterized-message", "phrase": "p:eq(1)" },
                "actions": { "get-readings": { "method": "GET", "url": "http://readings" } },
                "debug": true
            }"##,
        )
        .unwrap();

        assert_eq!(config.template, "p-template");
        assert_eq!(config.reading_li, "#p-reading");
        assert_eq!(config.title, ".p-title");
        assert_eq!(config.when, ".when");
        assert_eq!(config.url, "#p-url");
        assert_eq!(config.message.selector, "#parameterized-message");
        assert_eq!(config.message.phrase, "p:eq(1)");
        assert_eq!(config.message.status, ".status");
        assert_eq!(
            config.actions.get(GET_READINGS),
            Some(&Action::new("GET", "http://readings"))
        );
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            WidgetConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }
}
