//! Canned assistant replies produced without a model call.

use super::order::OrderData;
use super::schema::FormSchema;

/// Returned for every turn after the session has closed.
pub const FORM_CLOSED: &str =
    "This order form is closed. Start a new order whenever you feel like pizza.";

/// Returned when the user abandons the form.
pub const ORDER_CANCELLED: &str = "No problem, the order is cancelled. Come back any time.";

/// Builds the summary shown once every field is collected, asking the user
/// to confirm. Deterministic: lists the collected values in schema order.
pub fn confirmation_summary(schema: &FormSchema, order: &OrderData) -> String {
    let mut lines = vec!["Here is your order:".to_string()];
    for descriptor in schema.fields() {
        if let Some(value) = order.get(descriptor.name) {
            lines.push(format!("- {}: {}", descriptor.name.label(), value));
        }
    }
    lines.push("Shall I submit it? (yes/no)".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::schema::FieldName;

    #[test]
    fn summary_lists_collected_values_in_schema_order() {
        let schema = FormSchema::pizza_order();
        let mut order = OrderData::new();
        order.set(FieldName::PizzaType, "margherita");
        order.set(FieldName::Name, "Bob");
        order.set(FieldName::Address, "Main St");
        order.set(FieldName::Phone, "555");

        let summary = confirmation_summary(&schema, &order);
        assert_eq!(
            summary,
            "Here is your order:\n\
             - pizza type: margherita\n\
             - name: Bob\n\
             - delivery address: Main St\n\
             - phone number: 555\n\
             Shall I submit it? (yes/no)"
        );
    }

    #[test]
    fn summary_skips_absent_fields() {
        let schema = FormSchema::pizza_order();
        let mut order = OrderData::new();
        order.set(FieldName::Name, "Bob");

        let summary = confirmation_summary(&schema, &order);
        assert!(summary.contains("- name: Bob"));
        assert!(!summary.contains("pizza type:"));
    }
}
