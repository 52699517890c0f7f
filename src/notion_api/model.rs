use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Notion rejects rich text objects with more content than this
const MAX_TEXT_LENGTH: usize = 2000;

/// Property definitions sent when updating a database, keyed by property name.
pub type PropertyDefinitions = BTreeMap<String, PropertyDefinition>;

/// Property values of a new page, keyed by property name.
pub type PageProperties = BTreeMap<String, PropertyValue>;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    /// Set to rename the property while updating it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub schema: PropertySchema,
}

impl PropertyDefinition {
    pub fn new(schema: PropertySchema) -> Self {
        Self { name: None, schema }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertySchema {
    Title {},
    Date {},
    RichText {},
    Number { format: NumberFormat },
    Select { options: Vec<SelectOption> },
}

impl PropertySchema {
    pub fn select(options: impl IntoIterator<Item = String>) -> Self {
        PropertySchema::Select {
            options: options.into_iter().map(|name| SelectOption { name }).collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropertySchema::Title {} => "title",
            PropertySchema::Date {} => "date",
            PropertySchema::RichText {} => "rich_text",
            PropertySchema::Number { .. } => "number",
            PropertySchema::Select { .. } => "select",
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    Yuan,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichText>),
    RichText(Vec<RichText>),
    Date {
        start: String,
    },
    Select {
        name: String,
    },
    Number(#[serde(with = "rust_decimal::serde::float")] Decimal),
}

impl PropertyValue {
    pub fn title(content: &str) -> Self {
        PropertyValue::Title(vec![RichText::plain(content)])
    }

    pub fn rich_text(content: &str) -> Self {
        PropertyValue::RichText(vec![RichText::plain(content)])
    }

    pub fn select(name: &str) -> Self {
        PropertyValue::Select {
            name: name.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    text: TextContent,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
struct TextContent {
    content: String,
}

impl RichText {
    pub fn plain(content: &str) -> Self {
        Self {
            text: TextContent {
                content: content.chars().take(MAX_TEXT_LENGTH).collect(),
            },
        }
    }

    pub fn content(&self) -> &str {
        &self.text.content
    }
}

/// The parts of a retrieved Notion database that the importer looks at.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, RemoteProperty>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteProperty {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    select: Option<RemoteSelect>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct RemoteSelect {
    #[serde(default)]
    options: Vec<SelectOption>,
}

impl RemoteProperty {
    pub fn select_options(&self) -> &[SelectOption] {
        self.select
            .as_ref()
            .map(|select| select.options.as_slice())
            .unwrap_or(&[])
    }
}

impl RemoteSchema {
    /// Name of the database's title property. Every Notion database has exactly one.
    pub fn title_property(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, property)| property.type_ == "title")
            .map(|(name, _)| name.as_str())
    }

    /// Existing option names of a select property, empty if it isn't a select property.
    pub fn select_options(&self, property: &str) -> Vec<&str> {
        self.properties
            .get(property)
            .filter(|property| property.type_ == "select")
            .map(|property| {
                property
                    .select_options()
                    .iter()
                    .map(|option| option.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Applies a database update the way Notion does, used by in-process stand-ins.
    pub fn apply(&mut self, definitions: &PropertyDefinitions) {
        for (name, definition) in definitions {
            let name = match &definition.name {
                Some(new_name) => {
                    self.properties.remove(name);
                    new_name
                }
                None => name,
            };
            let select = match &definition.schema {
                PropertySchema::Select { options } => Some(RemoteSelect {
                    options: options.clone(),
                }),
                _ => None,
            };
            self.properties.insert(
                name.clone(),
                RemoteProperty {
                    type_: definition.schema.type_name().to_string(),
                    select,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize_definitions() {
        let mut definitions = PropertyDefinitions::new();
        definitions.insert(
            "Name".to_string(),
            PropertyDefinition {
                name: Some("商品".to_string()),
                schema: PropertySchema::Title {},
            },
        );
        definitions.insert(
            "交易类型".to_string(),
            PropertyDefinition::new(PropertySchema::select(["餐饮美食".to_string(), "其他".to_string()])),
        );
        definitions.insert(
            "金额".to_string(),
            PropertyDefinition::new(PropertySchema::Number {
                format: NumberFormat::Yuan,
            }),
        );
        definitions.insert(
            "交易对方".to_string(),
            PropertyDefinition::new(PropertySchema::RichText {}),
        );
        definitions.insert(
            "交易时间".to_string(),
            PropertyDefinition::new(PropertySchema::Date {}),
        );
        assert_eq!(
            json!({
                "Name": {"name": "商品", "title": {}},
                "交易类型": {"select": {"options": [{"name": "餐饮美食"}, {"name": "其他"}]}},
                "金额": {"number": {"format": "yuan"}},
                "交易对方": {"rich_text": {}},
                "交易时间": {"date": {}},
            }),
            serde_json::to_value(&definitions).unwrap()
        );
    }

    #[test]
    fn serialize_page_properties() {
        let mut properties = PageProperties::new();
        properties.insert("商品".to_string(), PropertyValue::title("测试商品"));
        properties.insert("交易对方".to_string(), PropertyValue::rich_text("测试商户"));
        properties.insert("交易类型".to_string(), PropertyValue::select("餐饮美食"));
        properties.insert(
            "交易时间".to_string(),
            PropertyValue::Date {
                start: "2024-01-01T02:00:00.000Z".to_string(),
            },
        );
        properties.insert("金额".to_string(), PropertyValue::Number(Decimal::new(2550, 2)));
        assert_eq!(
            json!({
                "商品": {"title": [{"text": {"content": "测试商品"}}]},
                "交易对方": {"rich_text": [{"text": {"content": "测试商户"}}]},
                "交易类型": {"select": {"name": "餐饮美食"}},
                "交易时间": {"date": {"start": "2024-01-01T02:00:00.000Z"}},
                "金额": {"number": 25.5},
            }),
            serde_json::to_value(&properties).unwrap()
        );
    }

    #[test]
    fn long_text_is_truncated() {
        let text = RichText::plain(&"长".repeat(MAX_TEXT_LENGTH + 10));
        assert_eq!(MAX_TEXT_LENGTH, text.content().chars().count());
    }

    #[test]
    fn deserialize_database() {
        let schema: RemoteSchema = serde_json::from_value(json!({
            "object": "database",
            "id": "d9824bdc-8445-4327-be8b-5b47500af6ce",
            "title": [],
            "properties": {
                "Name": {"id": "title", "name": "Name", "type": "title", "title": {}},
                "交易类型": {
                    "id": "abc",
                    "name": "交易类型",
                    "type": "select",
                    "select": {"options": [{"id": "1", "name": "餐饮美食", "color": "red"}]}
                },
                "金额": {"id": "def", "name": "金额", "type": "number", "number": {"format": "yuan"}},
            }
        }))
        .unwrap();
        assert_eq!(Some("Name"), schema.title_property());
        assert_eq!(vec!["餐饮美食"], schema.select_options("交易类型"));
        assert!(schema.select_options("金额").is_empty());
        assert!(schema.select_options("missing").is_empty());
    }

    #[test]
    fn apply_renames_and_replaces() {
        let mut schema: RemoteSchema = serde_json::from_value(json!({
            "properties": {"Name": {"type": "title", "title": {}}}
        }))
        .unwrap();
        let mut definitions = PropertyDefinitions::new();
        definitions.insert(
            "Name".to_string(),
            PropertyDefinition {
                name: Some("商品".to_string()),
                schema: PropertySchema::Title {},
            },
        );
        definitions.insert(
            "支付方式".to_string(),
            PropertyDefinition::new(PropertySchema::select(["零钱".to_string()])),
        );
        schema.apply(&definitions);
        assert_eq!(Some("商品"), schema.title_property());
        assert!(!schema.properties.contains_key("Name"));
        assert_eq!(vec!["零钱"], schema.select_options("支付方式"));
    }
}
