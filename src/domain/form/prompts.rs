//! Prompt templates for the three model calls the form makes.
//!
//! Each builder returns the full prompt text for one call: the exit check,
//! the confirm check, the field extraction, and the follow-up phrasing for
//! one missing field. The two boolean prompts prime an open JSON fragment
//! and are answered by substring search; the extraction prompt asks for a
//! complete bare object and is answered by brace truncation (see `parse`).

use super::order::OrderData;
use super::schema::{FieldName, FormSchema};
use super::transcript::Transcript;

// ============================================================================
// Exit check
// ============================================================================

const EXIT_EXAMPLES: [&str; 5] = [
    "I would like to exit the module",
    "I no longer want to continue filling out the form",
    "You go out",
    "Return to normal conversation",
    "Stop and go out",
];

/// Builds the exit-intent prompt for the current utterance.
pub fn exit_check(user_text: &str) -> String {
    let examples = EXIT_EXAMPLES
        .iter()
        .map(|e| format!("- {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Your task is to produce a JSON representing whether a user wants to exit or not.
JSON must be in this format:
```json
{{
    "exit": // type boolean, must be `true` or `false`
}}
```

Examples of user messages that mean exit:
{examples}

User message:
{user_text}

JSON:
```json
{{
    "exit":"#
    )
}

// ============================================================================
// Confirm check
// ============================================================================

/// Builds the confirm-intent prompt for the current utterance.
pub fn confirm_check(user_text: &str) -> String {
    format!(
        r#"Your task is to produce a JSON representing whether a user is confirming a proposed order or not.
JSON must be in this format:
```json
{{
    "confirm": // type boolean, must be `true` or `false`
}}
```

User said "{user_text}"

JSON:
```json
{{
    "confirm":"#
    )
}

// ============================================================================
// Field extraction
// ============================================================================

/// Builds the extraction prompt: one complete JSON object with the schema's
/// keys, values inferred from the conversation, empty strings for unknowns.
pub fn extraction(schema: &FormSchema, transcript: &Transcript, user_text: &str) -> String {
    format!(
        r#"Your task is to fill a JSON record for a pizza order out of a conversation.
The JSON must have exactly these keys:
{skeleton}
Use an empty string for anything the conversation does not mention.

Conversation:
{history}

Reply with the JSON object only, without code fences or commentary.
JSON:"#,
        skeleton = skeleton(schema),
        history = history(transcript, user_text),
    )
}

fn skeleton(schema: &FormSchema) -> String {
    let mut out = String::from("{\n");
    let fields = schema.fields();
    for (i, descriptor) in fields.iter().enumerate() {
        out.push_str(&format!("    \"{}\": \"\"", descriptor.name.key()));
        if i + 1 < fields.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push('}');
    out
}

// ============================================================================
// Follow-up phrasing
// ============================================================================

/// Builds the prompt that asks the model to phrase a request for exactly
/// one missing field.
pub fn follow_up(
    field: FieldName,
    order: &OrderData,
    transcript: &Transcript,
    user_text: &str,
) -> String {
    format!(
        r#"You are a friendly assistant taking a pizza order.

Information collected so far:
{collected}

Conversation:
{history}

Ask the user for their {label}, in one short sentence. Do not ask for anything else and do not repeat information already collected."#,
        collected = collected(order),
        history = history(transcript, user_text),
        label = field.label(),
    )
}

fn collected(order: &OrderData) -> String {
    let lines: Vec<String> = FieldName::all()
        .iter()
        .filter(|f| order.is_present(**f))
        .map(|f| format!("- {}: {}", f.label(), order.get(*f).unwrap_or_default()))
        .collect();
    if lines.is_empty() {
        "- nothing yet".to_string()
    } else {
        lines.join("\n")
    }
}

fn history(transcript: &Transcript, user_text: &str) -> String {
    let current = format!("User: {}", user_text);
    if transcript.is_empty() {
        current
    } else {
        format!("{}\n{}", transcript.render(), current)
    }
}
