use anyhow::{bail, Result};

use crate::ledger::{Direction, FALLBACK_CATEGORY, FALLBACK_PAYMENT_METHOD};
use crate::notion_api::{
    NumberFormat, PropertyDefinition, PropertyDefinitions, PropertySchema, RemoteSchema,
};

use super::options::SchemaOptions;

pub const PROPERTY_TITLE: &str = "商品";
pub const PROPERTY_DATE: &str = "交易时间";
pub const PROPERTY_CATEGORY: &str = "交易类型";
pub const PROPERTY_COUNTERPARTY: &str = "交易对方";
pub const PROPERTY_DIRECTION: &str = "收/支";
pub const PROPERTY_AMOUNT: &str = "金额";
pub const PROPERTY_PAYMENT_METHOD: &str = "支付方式";

/// Builds the database properties needed to store the ledger.
///
/// Select options already present in `current` are kept in front of the new ones, so an
/// update never drops options other imports rely on. The fallback option stays last. If the
/// database's title property has another name, it gets renamed instead of adding a second
/// title property. Fails if that rename would clash with an existing property.
pub fn build_definitions(
    options: &SchemaOptions,
    current: &RemoteSchema,
) -> Result<PropertyDefinitions> {
    let mut definitions = PropertyDefinitions::new();

    definitions.insert(
        PROPERTY_DATE.to_string(),
        PropertyDefinition::new(PropertySchema::Date {}),
    );
    definitions.insert(
        PROPERTY_CATEGORY.to_string(),
        select(
            current,
            PROPERTY_CATEGORY,
            options.category_options(),
            Some(FALLBACK_CATEGORY),
        ),
    );
    definitions.insert(
        PROPERTY_COUNTERPARTY.to_string(),
        PropertyDefinition::new(PropertySchema::RichText {}),
    );
    definitions.insert(
        PROPERTY_DIRECTION.to_string(),
        select(
            current,
            PROPERTY_DIRECTION,
            Direction::ALL
                .iter()
                .map(|direction| direction.label().to_string())
                .collect(),
            None,
        ),
    );
    definitions.insert(
        PROPERTY_AMOUNT.to_string(),
        PropertyDefinition::new(PropertySchema::Number {
            format: NumberFormat::Yuan,
        }),
    );
    definitions.insert(
        PROPERTY_PAYMENT_METHOD.to_string(),
        select(
            current,
            PROPERTY_PAYMENT_METHOD,
            options.payment_method_options(),
            Some(FALLBACK_PAYMENT_METHOD),
        ),
    );

    if let Some(property) = current.properties.get(PROPERTY_TITLE) {
        if property.type_ != "title" {
            bail!(
                "The database has a {} property named '{PROPERTY_TITLE}', but that name is needed \
                 for the title property. Rename or delete it in Notion and run the import again.",
                property.type_
            );
        }
    }

    match current.title_property() {
        Some(existing) if existing != PROPERTY_TITLE => {
            if let Some(clashing) = definitions.get(existing) {
                bail!(
                    "The database's title property is named '{existing}', but that name is needed \
                     for a {} property. Rename the title property to '{PROPERTY_TITLE}' in Notion \
                     and run the import again.",
                    clashing.schema.type_name()
                );
            }
            log::debug!("Renaming title property '{existing}' to '{PROPERTY_TITLE}'");
            definitions.insert(
                existing.to_string(),
                PropertyDefinition {
                    name: Some(PROPERTY_TITLE.to_string()),
                    schema: PropertySchema::Title {},
                },
            );
        }
        _ => {
            definitions.insert(
                PROPERTY_TITLE.to_string(),
                PropertyDefinition::new(PropertySchema::Title {}),
            );
        }
    }

    Ok(definitions)
}

fn select(
    current: &RemoteSchema,
    property: &str,
    desired: Vec<String>,
    fallback: Option<&str>,
) -> PropertyDefinition {
    let existing = current.select_options(property);
    let new_options: Vec<&String> = desired
        .iter()
        .filter(|option| !existing.contains(&option.as_str()))
        .collect();
    if !new_options.is_empty() {
        log::debug!("New options for {property}: {new_options:?}");
    }
    PropertyDefinition::new(PropertySchema::select(merge_options(
        &existing, desired, fallback,
    )))
}

/// Existing options first, then the desired ones not present yet, then `fallback`.
fn merge_options(existing: &[&str], desired: Vec<String>, fallback: Option<&str>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + desired.len());
    for option in existing.iter().map(|option| option.to_string()).chain(desired) {
        if Some(option.as_str()) != fallback && !merged.contains(&option) {
            merged.push(option);
        }
    }
    merged.extend(fallback.map(str::to_string));
    merged
}

#[cfg(test)]
mod tests {
    use common_macros::b_tree_set;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::notion_api::SelectOption;

    fn options() -> SchemaOptions {
        SchemaOptions {
            categories: b_tree_set! {"餐饮美食".to_string(), "交通出行".to_string()},
            payment_methods: b_tree_set! {"零钱".to_string()},
        }
    }

    fn select_option_names(definition: &PropertyDefinition) -> Vec<&str> {
        match &definition.schema {
            PropertySchema::Select { options } => options
                .iter()
                .map(|SelectOption { name }| name.as_str())
                .collect(),
            other => panic!("Expected select property, got {other:?}"),
        }
    }

    #[test]
    fn fresh_database() {
        let definitions = build_definitions(&options(), &RemoteSchema::default()).unwrap();
        assert_eq!(7, definitions.len());
        assert_eq!(
            vec!["交通出行", "餐饮美食", "其他"],
            select_option_names(&definitions[PROPERTY_CATEGORY])
        );
        assert_eq!(
            vec!["收入", "支出"],
            select_option_names(&definitions[PROPERTY_DIRECTION])
        );
        assert_eq!(
            vec!["零钱", "其他"],
            select_option_names(&definitions[PROPERTY_PAYMENT_METHOD])
        );
        assert_eq!(
            PropertyDefinition::new(PropertySchema::Title {}),
            definitions[PROPERTY_TITLE]
        );
        assert_eq!(
            PropertyDefinition::new(PropertySchema::Date {}),
            definitions[PROPERTY_DATE]
        );
        assert_eq!(
            PropertyDefinition::new(PropertySchema::RichText {}),
            definitions[PROPERTY_COUNTERPARTY]
        );
        assert_eq!(
            PropertyDefinition::new(PropertySchema::Number {
                format: NumberFormat::Yuan
            }),
            definitions[PROPERTY_AMOUNT]
        );
    }

    #[test]
    fn renames_existing_title_property() {
        let current: RemoteSchema = serde_json::from_value(json!({
            "properties": {"Name": {"type": "title", "title": {}}}
        }))
        .unwrap();
        let definitions = build_definitions(&options(), &current).unwrap();
        assert!(!definitions.contains_key(PROPERTY_TITLE));
        assert_eq!(
            PropertyDefinition {
                name: Some(PROPERTY_TITLE.to_string()),
                schema: PropertySchema::Title {},
            },
            definitions["Name"]
        );
    }

    #[test]
    fn keeps_existing_options() {
        let current: RemoteSchema = serde_json::from_value(json!({
            "properties": {
                "商品": {"type": "title", "title": {}},
                "交易类型": {"type": "select", "select": {"options": [
                    {"id": "a", "name": "购物", "color": "blue"},
                    {"id": "b", "name": "餐饮美食", "color": "red"},
                ]}},
            }
        }))
        .unwrap();
        let definitions = build_definitions(&options(), &current).unwrap();
        assert_eq!(
            PropertyDefinition::new(PropertySchema::Title {}),
            definitions[PROPERTY_TITLE]
        );
        assert_eq!(
            vec!["购物", "餐饮美食", "交通出行", "其他"],
            select_option_names(&definitions[PROPERTY_CATEGORY])
        );
    }

    #[test]
    fn fallback_stays_last() {
        let current: RemoteSchema = serde_json::from_value(json!({
            "properties": {
                "商品": {"type": "title", "title": {}},
                "交易类型": {"type": "select", "select": {"options": [
                    {"id": "a", "name": "购物", "color": "blue"},
                    {"id": "b", "name": "其他", "color": "gray"},
                    {"id": "c", "name": "转账", "color": "red"},
                ]}},
            }
        }))
        .unwrap();
        let definitions = build_definitions(&options(), &current).unwrap();
        assert_eq!(
            vec!["购物", "转账", "交通出行", "餐饮美食", "其他"],
            select_option_names(&definitions[PROPERTY_CATEGORY])
        );
    }

    #[rstest]
    fn title_named_like_another_column_is_rejected(
        #[values(
            PROPERTY_DATE,
            PROPERTY_CATEGORY,
            PROPERTY_COUNTERPARTY,
            PROPERTY_DIRECTION,
            PROPERTY_AMOUNT,
            PROPERTY_PAYMENT_METHOD
        )]
        title: &str,
    ) {
        let current: RemoteSchema = serde_json::from_value(json!({
            "properties": {title: {"type": "title", "title": {}}}
        }))
        .unwrap();
        let err = build_definitions(&options(), &current).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(&format!("title property is named '{title}'")));
        assert!(message.contains(PROPERTY_TITLE));
    }

    #[test]
    fn rename_onto_existing_property_is_rejected() {
        let current: RemoteSchema = serde_json::from_value(json!({
            "properties": {
                "Name": {"type": "title", "title": {}},
                "商品": {"type": "rich_text", "rich_text": {}},
            }
        }))
        .unwrap();
        let err = build_definitions(&options(), &current).unwrap_err();
        assert!(err
            .to_string()
            .contains("has a rich_text property named '商品'"));
    }

    #[test]
    fn merge_never_duplicates() {
        assert_eq!(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            merge_options(
                &["a", "b"],
                vec!["b".to_string(), "c".to_string(), "a".to_string()],
                None
            )
        );
        assert_eq!(
            vec!["x".to_string()],
            merge_options(&[], vec!["x".to_string(), "x".to_string()], None)
        );
    }

    #[test]
    fn merge_keeps_fallback_last() {
        assert_eq!(
            vec!["a".to_string(), "c".to_string(), "b".to_string(), "z".to_string()],
            merge_options(
                &["a", "z", "c"],
                vec!["b".to_string(), "z".to_string()],
                Some("z")
            )
        );
    }
}
