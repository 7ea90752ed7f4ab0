//! Bibliographic metadata of a single book.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// All values of the field, in table order.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }
}

/// Normalized contents of a detail page's bibliographic table.
///
/// Fields keep the order in which their label first appears. A label that
/// occurs more than once in the table becomes a [`FieldValue::Multiple`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: Vec<(String, FieldValue)>,
}

impl Metadata {
    /// Pairs the table's label cells with its value cells by global position.
    ///
    /// Both sequences span the whole table, so a row with unequal numbers of
    /// label and value cells shifts every later pairing.
    pub fn from_cells(labels: Vec<String>, values: Vec<String>) -> Result<Self> {
        if values.len() < labels.len() {
            return Err(Error::MalformedTable {
                labels: labels.len(),
                values: values.len(),
            });
        }

        let mut metadata = Self::default();
        for (label, value) in labels.iter().zip(values) {
            let repeated = labels.iter().filter(|other| *other == label).count() > 1;
            match metadata.position(label) {
                // Repeated labels always start out as lists.
                Some(index) => {
                    if let FieldValue::Multiple(existing) = &mut metadata.fields[index].1 {
                        existing.push(value);
                    }
                }
                None => {
                    let field = if repeated {
                        FieldValue::Multiple(vec![value])
                    } else {
                        FieldValue::Single(value)
                    };
                    metadata.fields.push((label.clone(), field));
                }
            }
        }
        Ok(metadata)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(field, _)| field == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.position(name).map(|index| &self.fields[index].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Sidecar text format: one `field: value` line per value.
impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.fields {
            for value in value.values() {
                writeln!(f, "{name}: {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn repeated_labels_become_lists() {
        let metadata = Metadata::from_cells(
            strings(&["language", "subject", "subject", "subject"]),
            strings(&["English", "Horror", "Monsters", "Science fiction"]),
        )
        .unwrap();

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("language").and_then(FieldValue::as_single), Some("English"));
        assert_eq!(
            metadata.get("subject"),
            Some(&FieldValue::Multiple(strings(&["Horror", "Monsters", "Science fiction"])))
        );
    }

    #[test]
    fn field_order_follows_first_appearance() {
        let metadata = Metadata::from_cells(
            strings(&["author", "subject", "title", "subject"]),
            strings(&["Shelley", "Horror", "Frankenstein", "Gothic"]),
        )
        .unwrap();
        let names: Vec<&str> = metadata.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["author", "subject", "title"]);
    }

    #[test]
    fn missing_values_are_a_malformed_table() {
        let err = Metadata::from_cells(strings(&["title", "author"]), strings(&["Frankenstein"]))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedTable { labels: 2, values: 1 }));
    }

    #[test]
    fn surplus_values_are_ignored() {
        let metadata =
            Metadata::from_cells(strings(&["title"]), strings(&["Frankenstein", "Download"])).unwrap();
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn text_form_repeats_list_fields() {
        let metadata = Metadata::from_cells(
            strings(&["title", "subject", "subject"]),
            strings(&["Frankenstein", "Horror", "Gothic"]),
        )
        .unwrap();
        assert_eq!(
            metadata.to_string(),
            "title: Frankenstein\nsubject: Horror\nsubject: Gothic\n"
        );
    }

    #[test]
    fn json_form_keeps_scalars_and_lists() {
        let metadata = Metadata::from_cells(
            strings(&["language", "subject", "subject"]),
            strings(&["English", "Horror", "Gothic"]),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_string(&metadata).unwrap(),
            r#"{"language":"English","subject":["Horror","Gothic"]}"#
        );
    }
}
