//! The partially-filled order record and its all-fields-present proof.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::schema::{FieldName, FormSchema};
use crate::domain::foundation::ValidationError;

/// Order fields collected so far. All free text; a field counts as present
/// once it holds a non-blank value. No per-field validation beyond that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pizza_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

impl OrderData {
    /// Creates an empty order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value for a field.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::PizzaType => self.pizza_type.as_deref(),
            FieldName::Name => self.name.as_deref(),
            FieldName::Address => self.address.as_deref(),
            FieldName::Phone => self.phone.as_deref(),
        }
    }

    /// Sets a field to the trimmed value. Blank values are ignored, so a
    /// collected field is never cleared by an empty update.
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return;
        }
        let slot = match field {
            FieldName::PizzaType => &mut self.pizza_type,
            FieldName::Name => &mut self.name,
            FieldName::Address => &mut self.address,
            FieldName::Phone => &mut self.phone,
        };
        *slot = Some(value);
    }

    /// Returns true if the field holds a non-blank value.
    pub fn is_present(&self, field: FieldName) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Merges an extraction fragment into the order, following the schema's
    /// field order. String and number values are taken (numbers as their
    /// decimal rendering, since models often emit bare numbers for phone
    /// fields); blanks, missing keys, and other JSON types never overwrite.
    ///
    /// Returns the fields that were updated.
    pub fn merge(&mut self, schema: &FormSchema, fragment: &Map<String, Value>) -> Vec<FieldName> {
        let mut updated = Vec::new();
        for descriptor in schema.fields() {
            let field = descriptor.name;
            let value = match fragment.get(field.key()) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => continue,
            };
            if value.trim().is_empty() {
                continue;
            }
            self.set(field, value);
            updated.push(field);
        }
        updated
    }
}

/// A fully-collected order: every field present and non-blank.
///
/// Receipt rendering takes this type, so an incomplete order can never
/// reach submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedOrder {
    pub pizza_type: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl CompletedOrder {
    /// Builds the completed order, failing on the first absent field.
    pub fn from_order(order: &OrderData) -> Result<Self, ValidationError> {
        Ok(Self {
            pizza_type: required(order, FieldName::PizzaType)?,
            name: required(order, FieldName::Name)?,
            address: required(order, FieldName::Address)?,
            phone: required(order, FieldName::Phone)?,
        })
    }
}

fn required(order: &OrderData, field: FieldName) -> Result<String, ValidationError> {
    order
        .get(field)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ValidationError::empty_field(field.key()))
}
