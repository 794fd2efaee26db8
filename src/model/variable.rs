// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::fmt;

use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::de::{present, take_typed};
use super::ids::VariableId;

const NAME_KEY: &str = "name";
const TYPE_KEY: &str = "type";
const CATEGORY_KEY: &str = "category";

/// A typed entry on the process blackboard.
///
/// A `name`, `type` or `category` of the wrong shape is kept in `extra` and written back in
/// place of the typed default until the field is edited.
#[derive(Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Documents written before categories existed omit this; they read as `local`.
    pub category: VariableCategory,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `"Order Total"` -> `"order_total"`.
pub fn variable_id_from_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect()
}

impl Variable {
    pub fn new(id: VariableId, name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            id,
            name: name.into(),
            var_type,
            default_value: None,
            category: VariableCategory::default(),
            extra: Map::new(),
        }
    }

    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_category(mut self, category: VariableCategory) -> Self {
        self.category = category;
        self
    }

    pub fn apply_patch(&mut self, patch: VariablePatch) -> bool {
        let mut changed = false;
        if let Some(id) = patch.id {
            changed |= set_if_changed(&mut self.id, id);
        }
        if let Some(name) = patch.name {
            changed |= self.extra.remove(NAME_KEY).is_some();
            changed |= set_if_changed(&mut self.name, name);
        }
        if let Some(var_type) = patch.var_type {
            changed |= self.extra.remove(TYPE_KEY).is_some();
            changed |= set_if_changed(&mut self.var_type, var_type);
        }
        if let Some(default_value) = patch.default_value {
            changed |= set_if_changed(&mut self.default_value, default_value);
        }
        if let Some(category) = patch.category {
            changed |= self.extra.remove(CATEGORY_KEY).is_some();
            changed |= set_if_changed(&mut self.category, category);
        }
        changed
    }

    /// The keys the blackboard editor does not show, for carrying over into an edited copy.
    pub fn unknown_fields(&self) -> Map<String, Value> {
        self.extra
            .iter()
            .filter(|(key, _)| ![NAME_KEY, TYPE_KEY, CATEGORY_KEY].contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let typed = |key: &str| !self.extra.contains_key(key);
        VariableOut {
            id: &self.id,
            name: typed(NAME_KEY).then_some(self.name.as_str()),
            var_type: typed(TYPE_KEY).then_some(&self.var_type),
            default_value: self.default_value.as_ref(),
            category: typed(CATEGORY_KEY).then_some(&self.category),
            extra: &self.extra,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Variable {
    /// A variable without a usable id takes one derived from its name.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = LooseVariable::deserialize(deserializer)?;
        let mut extra = raw.extra;
        let name: Option<String> = take_typed(raw.name, NAME_KEY, &mut extra);

        let id = match raw.id {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => name.as_deref().map(variable_id_from_name).unwrap_or_default(),
        };
        let id = VariableId::new(id)
            .map_err(|_| D::Error::custom("variable has neither an id nor a name"))?;

        let var_type: Option<VariableType> =
            take_typed(raw.var_type.filter(|value| !value.is_null()), TYPE_KEY, &mut extra);
        let category: Option<VariableCategory> = take_typed(
            raw.category.filter(|value| !value.is_null()),
            CATEGORY_KEY,
            &mut extra,
        );

        Ok(Self {
            id,
            name: name.unwrap_or_default(),
            var_type: var_type.unwrap_or_default(),
            default_value: raw.default_value,
            category: category.unwrap_or_default(),
            extra,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VariableOut<'a> {
    id: &'a VariableId,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    var_type: Option<&'a VariableType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a VariableCategory>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseVariable {
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    name: Option<Value>,
    #[serde(rename = "type", default, deserialize_with = "present")]
    var_type: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    default_value: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    category: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Field-wise update; `default_value: Some(None)` clears the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariablePatch {
    pub id: Option<VariableId>,
    pub name: Option<String>,
    pub var_type: Option<VariableType>,
    pub default_value: Option<Option<Value>>,
    pub category: Option<VariableCategory>,
}

fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Unknown type names are carried verbatim so a newer document never fails to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VariableType {
    #[default]
    String,
    Number,
    Boolean,
    Vector3,
    Object,
    Other(String),
}

impl VariableType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Vector3 => "vector3",
            Self::Object => "object",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for VariableType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "vector3" => Self::Vector3,
            "object" => Self::Object,
            _ => Self::Other(value),
        }
    }
}

impl From<VariableType> for String {
    fn from(value: VariableType) -> Self {
        match value {
            VariableType::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for VariableType {
    fn schema_name() -> Cow<'static, str> {
        "VariableType".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "examples": ["string", "number", "boolean", "vector3", "object"]
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VariableCategory {
    Input,
    Output,
    #[default]
    Local,
    Other(String),
}

impl VariableCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Local => "local",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for VariableCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "input" => Self::Input,
            "output" => Self::Output,
            "local" | "" => Self::Local,
            _ => Self::Other(value),
        }
    }
}

impl From<VariableCategory> for String {
    fn from(value: VariableCategory) -> Self {
        match value {
            VariableCategory::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for VariableCategory {
    fn schema_name() -> Cow<'static, str> {
        "VariableCategory".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "default": "local",
            "examples": ["input", "output", "local"]
        })
    }
}
