use serde::{Deserialize, Deserializer, Serialize};

use super::subtask::Subtask;

/// Category tag shown on an item card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Food,
    Item,
}

impl ItemKind {
    /// Parse a tag; `---` and the empty string mean "unset" and yield `None`.
    pub fn parse(s: &str) -> Option<ItemKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" => Some(ItemKind::Task),
            "food" => Some(ItemKind::Food),
            "item" => Some(ItemKind::Item),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Task => write!(f, "task"),
            ItemKind::Food => write!(f, "food"),
            ItemKind::Item => write!(f, "item"),
        }
    }
}

/// Value of a custom field: free text, a number or a flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Interpret user input: `true`/`false` become flags, numerals numbers,
    /// anything else text.
    pub fn from_input(s: &str) -> FieldValue {
        match s {
            "true" => FieldValue::Flag(true),
            "false" => FieldValue::Flag(false),
            _ => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => FieldValue::Number(n),
                _ => FieldValue::Text(s.to_string()),
            },
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Flag(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A user-defined key/value pair on an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: FieldValue,
    #[serde(default)]
    pub required: bool,
}

/// A top-level entry of a to-do list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique within the owning list
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    /// `None` when the stored value was absent or not a number
    #[serde(
        default,
        deserialize_with = "lenient_cost",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<f64>,
    #[serde(default)]
    pub required: bool,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "kind_or_unset",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<ItemKind>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    /// Root forest of this item's subtask tree
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            title: title.into(),
            done: false,
            cost: Some(0.0),
            required: false,
            kind: None,
            custom_fields: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    /// Cost as used by aggregates: absent and non-finite count as zero.
    pub fn effective_cost(&self) -> f64 {
        match self.cost {
            Some(c) if c.is_finite() => c,
            _ => 0.0,
        }
    }
}

/// Accepts numbers and numeric strings; anything else (empty input, `null`,
/// garbage) deserializes to `None`.
fn lenient_cost<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CostRepr {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match CostRepr::deserialize(deserializer)? {
        CostRepr::Number(n) => Some(n),
        CostRepr::Text(s) => s.trim().parse::<f64>().ok(),
        CostRepr::Other(_) => None,
    })
}

/// Unknown tags and the `---` placeholder both mean "unset".
fn kind_or_unset<'de, D>(deserializer: D) -> Result<Option<ItemKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ItemKind::parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_accepts_numbers_and_numeric_strings() {
        let item: Item = serde_json::from_str(r#"{"id":"a","title":"t","cost":12.5}"#).unwrap();
        assert_eq!(item.cost, Some(12.5));

        let item: Item = serde_json::from_str(r#"{"id":"a","title":"t","cost":"7"}"#).unwrap();
        assert_eq!(item.cost, Some(7.0));
    }

    #[test]
    fn cost_absent_or_garbage_is_none() {
        let item: Item = serde_json::from_str(r#"{"id":"a","title":"t"}"#).unwrap();
        assert_eq!(item.cost, None);
        assert_eq!(item.effective_cost(), 0.0);

        let item: Item = serde_json::from_str(r#"{"id":"a","title":"t","cost":""}"#).unwrap();
        assert_eq!(item.cost, None);

        let item: Item = serde_json::from_str(r#"{"id":"a","title":"t","cost":null}"#).unwrap();
        assert_eq!(item.cost, None);

        let item: Item =
            serde_json::from_str(r#"{"id":"a","title":"t","cost":{"x":1}}"#).unwrap();
        assert_eq!(item.cost, None);
    }

    #[test]
    fn kind_placeholder_is_unset() {
        let item: Item =
            serde_json::from_str(r#"{"id":"a","title":"t","type":"---"}"#).unwrap();
        assert_eq!(item.kind, None);

        let item: Item =
            serde_json::from_str(r#"{"id":"a","title":"t","type":"food"}"#).unwrap();
        assert_eq!(item.kind, Some(ItemKind::Food));
    }

    #[test]
    fn serializes_camel_case_and_type_key() {
        let mut item = Item::new("a", "Groceries");
        item.kind = Some(ItemKind::Food);
        item.custom_fields.push(CustomField {
            title: "store".into(),
            value: FieldValue::Text("corner".into()),
            required: false,
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "food");
        assert_eq!(json["customFields"][0]["value"], "corner");
        assert_eq!(json["cost"], 0.0);
    }

    #[test]
    fn field_value_from_input() {
        assert_eq!(FieldValue::from_input("true"), FieldValue::Flag(true));
        assert_eq!(FieldValue::from_input("3.5"), FieldValue::Number(3.5));
        assert_eq!(
            FieldValue::from_input("aisle 4"),
            FieldValue::Text("aisle 4".into())
        );
    }

    #[test]
    fn field_value_untagged_round_trip() {
        let fields: Vec<CustomField> = serde_json::from_str(
            r#"[{"title":"a","value":true,"required":false},
                {"title":"b","value":2,"required":true},
                {"title":"c","value":"x","required":false}]"#,
        )
        .unwrap();
        assert_eq!(fields[0].value, FieldValue::Flag(true));
        assert_eq!(fields[1].value, FieldValue::Number(2.0));
        assert_eq!(fields[2].value, FieldValue::Text("x".into()));
    }
}
