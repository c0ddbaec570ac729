use std::collections::BTreeMap;

use jardin_scene::ObjectStore;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignItem {
    pub item_name: String,
    pub quantity: u32,
}

/// JSON body of the `design_data` form part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignCreateData {
    pub name: String,
    pub items: Vec<DesignItem>,
}

impl DesignCreateData {
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Groups item names and counts them, ordered by name.
pub fn inventory_from_names<I, S>(names: I) -> Vec<DesignItem>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for name in names {
        *counts.entry(name.as_ref().to_string()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(item_name, quantity)| DesignItem {
            item_name,
            quantity,
        })
        .collect()
}

pub fn inventory_from_scene<S: ObjectStore + ?Sized>(store: &S) -> Vec<DesignItem> {
    inventory_from_names(
        store
            .placed_objects()
            .into_iter()
            .map(|placed| placed.item_name),
    )
}

/// A named design ready to be turned into an upload request.
#[derive(Clone, Debug, PartialEq)]
pub struct DesignSubmission {
    pub data: DesignCreateData,
    /// PNG bytes of the captured view, when one was taken.
    pub screenshot: Option<Vec<u8>>,
}

impl DesignSubmission {
    pub fn new(name: &str, items: Vec<DesignItem>, screenshot: Option<Vec<u8>>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(Self {
            data: DesignCreateData {
                name: name.to_string(),
                items,
            },
            screenshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_counts_by_name() {
        let items = inventory_from_names(["Rosal", "Banco", "Rosal", "Rosal"]);
        assert_eq!(
            items,
            vec![
                DesignItem {
                    item_name: "Banco".to_string(),
                    quantity: 1
                },
                DesignItem {
                    item_name: "Rosal".to_string(),
                    quantity: 3
                },
            ]
        );
    }

    #[test]
    fn payload_uses_backend_field_names() -> Result<()> {
        let data = DesignCreateData {
            name: "Patio".to_string(),
            items: inventory_from_names(["Olivo"]),
        };
        let json = data.to_json_string()?;
        assert_eq!(
            json,
            r#"{"name":"Patio","items":[{"item_name":"Olivo","quantity":1}]}"#
        );
        Ok(())
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(
            DesignSubmission::new("  ", Vec::new(), None),
            Err(Error::EmptyName)
        ));
    }
}
