//! Tab strip configuration

use serde::Deserialize;

use crate::error::TabsResult;

/// Layout parameters of a tab strip, in pixels
///
/// Deserializes from the camelCase option object hosts already pass to
/// chrome-style tab strips; omitted keys keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabStripOptions {
    /// How far adjacent tabs overlap
    pub tab_overlap_distance: f32,
    /// Narrowest a tab may shrink to
    pub min_width: f32,
    /// Width of tabs when there is room
    pub max_width: f32,
    /// Space between the last tab and the add button
    pub add_button_gap: f32,
}

impl Default for TabStripOptions {
    fn default() -> Self {
        Self {
            tab_overlap_distance: 14.0,
            min_width: 45.0,
            max_width: 243.0,
            add_button_gap: 8.0,
        }
    }
}

impl TabStripOptions {
    /// Parse options from a JSON object
    pub fn from_json(json: &str) -> TabsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options =
            TabStripOptions::from_json(r#"{"tabOverlapDistance": 12, "maxWidth": 240}"#).unwrap();

        assert_eq!(options.tab_overlap_distance, 12.0);
        assert_eq!(options.max_width, 240.0);
        assert_eq!(options.min_width, 45.0);
        assert_eq!(options.add_button_gap, 8.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(TabStripOptions::from_json("{\"minWidth\": ").is_err());
    }
}
