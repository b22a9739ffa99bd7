//!
//! Consumable levels from the LEDM `ProductUsageDyn` document
//!
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::debug;
use roxmltree::Document;

use crate::{error::InkError, matcher::TagMatcher, namespace::Namespaces};

macro_rules! define_tags {
    ($($name:ident => $value:literal),* $(,)?) => {
        $(pub const $name: &'static str = $value;)*
    };
}

/// Normalize a marker color for comparison
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Printer supply with its remaining level
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consumable {
    /// Marker color as reported by the device, e.g. `Cyan`
    pub color: String,
    /// Remaining level in percent
    pub remaining: i32,
}

impl Consumable {
    define_tags! {
        CONSUMABLE_SUBUNIT => "pudyn:ConsumableSubunit",
        CONSUMABLE => "pudyn:Consumable",
        MARKER_COLOR => "dd:MarkerColor",
        LEVEL_REMAINING => "dd:ConsumableRawPercentageLevelRemaining",
    }

    /// Create consumable
    pub fn new<S: AsRef<str>>(color: S, remaining: i32) -> Consumable {
        Consumable {
            color: color.as_ref().to_owned(),
            remaining,
        }
    }

    /// Matcher selecting every consumable below the document root
    pub fn matcher() -> TagMatcher<Consumable> {
        let color = TagMatcher::text(Consumable::MARKER_COLOR);
        let level = TagMatcher::text(Consumable::LEVEL_REMAINING);

        TagMatcher::branch(
            Consumable::CONSUMABLE_SUBUNIT,
            [TagMatcher::leaf(Consumable::CONSUMABLE, move |node, namespaces| {
                let color = color.first(node, namespaces)?;
                let remaining = level
                    .first(node, namespaces)?
                    .parse::<i32>()
                    .map_err(|source| InkError::InvalidLevel {
                        tag: Consumable::LEVEL_REMAINING.to_owned(),
                        source,
                    })?;
                Ok(Consumable { color, remaining })
            })],
        )
    }

    /// Extract all consumables from a raw `ProductUsageDyn` document
    pub fn parse_document(xml: &str) -> Result<Vec<Consumable>, InkError> {
        let namespaces = Namespaces::scrape(xml);
        let doc = Document::parse(xml)?;

        let consumables = Consumable::matcher().search(doc.root_element(), &namespaces)?;
        for consumable in &consumables {
            debug!("Consumable {}: {}%", consumable.color, consumable.remaining);
        }
        Ok(consumables)
    }
}

/// Map normalized marker colors to their remaining level.
///
/// If a color is reported more than once the first occurrence wins.
pub fn levels(consumables: &[Consumable]) -> HashMap<String, i32> {
    let mut levels = HashMap::new();
    for consumable in consumables {
        levels
            .entry(normalize_label(&consumable.color))
            .or_insert(consumable.remaining);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_USAGE: &str = include_str!("../testdata/product_usage_dyn.xml");

    #[test]
    fn test_parse_product_usage() {
        let consumables = Consumable::parse_document(PRODUCT_USAGE).unwrap();
        assert_eq!(
            consumables,
            vec![
                Consumable::new("Black", 42),
                Consumable::new("Cyan", 8),
                Consumable::new("Magenta", 17),
                Consumable::new("Yellow", 75),
            ]
        );
    }

    #[test]
    fn test_levels_are_normalized() {
        let levels = levels(&[Consumable::new(" Black ", 42), Consumable::new("CYAN", 8)]);
        assert_eq!(levels.get("black"), Some(&42));
        assert_eq!(levels.get("cyan"), Some(&8));
        assert_eq!(levels.len(), 2);
    }

    #[test]
    fn test_duplicate_color_keeps_first() {
        let levels = levels(&[Consumable::new("Black", 42), Consumable::new("black", 3)]);
        assert_eq!(levels.get("black"), Some(&42));
    }

    #[test]
    fn test_no_consumables() {
        let xml = r#"<pudyn:ProductUsageDyn xmlns:pudyn="urn:p" xmlns:dd="urn:d"/>"#;
        assert!(Consumable::parse_document(xml).unwrap().is_empty());
    }

    #[test]
    fn test_missing_level() {
        let xml = r#"<pudyn:ProductUsageDyn xmlns:pudyn="urn:p" xmlns:dd="urn:d">
            <pudyn:ConsumableSubunit>
                <pudyn:Consumable><dd:MarkerColor>Black</dd:MarkerColor></pudyn:Consumable>
            </pudyn:ConsumableSubunit>
        </pudyn:ProductUsageDyn>"#;

        let err = Consumable::parse_document(xml).unwrap_err();
        assert!(matches!(err, InkError::MissingElement(ref tag) if tag == Consumable::LEVEL_REMAINING));
    }

    #[test]
    fn test_invalid_level() {
        let xml = r#"<pudyn:ProductUsageDyn xmlns:pudyn="urn:p" xmlns:dd="urn:d">
            <pudyn:ConsumableSubunit>
                <pudyn:Consumable>
                    <dd:MarkerColor>Black</dd:MarkerColor>
                    <dd:ConsumableRawPercentageLevelRemaining>lots</dd:ConsumableRawPercentageLevelRemaining>
                </pudyn:Consumable>
            </pudyn:ConsumableSubunit>
        </pudyn:ProductUsageDyn>"#;

        assert!(matches!(
            Consumable::parse_document(xml),
            Err(InkError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            Consumable::parse_document("<pudyn:ProductUsageDyn"),
            Err(InkError::XmlError(_))
        ));
    }
}
