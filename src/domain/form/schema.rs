//! Explicit description of the record the form collects.
//!
//! The schema is an ordered list of fields with required flags. Prompt
//! building and extraction merging both iterate it, so the shape of the
//! order record lives in exactly one place.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::order::OrderData;

/// The fields of a pizza order, in declaration order.
///
/// Declaration order doubles as the priority order when asking the user
/// for missing information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    PizzaType,
    Name,
    Address,
    Phone,
}

impl FieldName {
    /// Returns all fields in declaration order.
    pub fn all() -> &'static [FieldName] {
        &[
            FieldName::PizzaType,
            FieldName::Name,
            FieldName::Address,
            FieldName::Phone,
        ]
    }

    /// Returns the stable JSON key used in extraction payloads.
    pub fn key(&self) -> &'static str {
        match self {
            FieldName::PizzaType => "pizza_type",
            FieldName::Name => "name",
            FieldName::Address => "address",
            FieldName::Phone => "phone",
        }
    }

    /// Returns the conversational label used in prompts and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::PizzaType => "pizza type",
            FieldName::Name => "name",
            FieldName::Address => "delivery address",
            FieldName::Phone => "phone number",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One field of the target record: its name and whether it must be
/// collected before the order can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: FieldName,
    pub required: bool,
}

impl FieldDescriptor {
    /// Creates a required field descriptor.
    pub fn required(name: FieldName) -> Self {
        Self { name, required: true }
    }

    /// Creates an optional field descriptor.
    pub fn optional(name: FieldName) -> Self {
        Self { name, required: false }
    }
}

/// Ordered collection of field descriptors driving extraction and
/// completeness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    /// Creates a schema from an explicit field list.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// The pizza-order schema: all four fields, all required.
    pub fn pizza_order() -> Self {
        Self::new(
            FieldName::all()
                .iter()
                .copied()
                .map(FieldDescriptor::required)
                .collect(),
        )
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the required fields not yet present on the order, in
    /// declaration order.
    pub fn missing_fields(&self, order: &OrderData) -> Vec<FieldName> {
        self.fields
            .iter()
            .filter(|d| d.required && !order.is_present(d.name))
            .map(|d| d.name)
            .collect()
    }

    /// Returns the first missing required field, if any.
    ///
    /// The form asks for exactly one field per turn; this picks which.
    pub fn first_missing(&self, order: &OrderData) -> Option<FieldName> {
        self.fields
            .iter()
            .find(|d| d.required && !order.is_present(d.name))
            .map(|d| d.name)
    }

    /// Returns true when every required field is present on the order.
    pub fn is_complete(&self, order: &OrderData) -> bool {
        self.first_missing(order).is_none()
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::pizza_order()
    }
}
