//! FormSession - drives one pizza order conversation turn by turn.
//!
//! The session owns the collected order, the bounded transcript, and the
//! lifecycle state. Each user message runs through exit detection first,
//! then through the state's own flow: confirmation handling while a summary
//! is pending, field collection otherwise. All model calls go through the
//! `LanguageModel` port, so the session itself never touches the network.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::FormConfig;
use crate::domain::foundation::{SessionId, StateMachine, Timestamp, ValidationError};
use crate::domain::form::{
    parse, prompts, receipt, replies, CompletedOrder, FormSchema, OrderData, SessionState,
    Transcript, Turn,
};
use crate::ports::{LanguageModel, ModelError};

/// Reply produced by one turn of the form.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    /// Text to show the user.
    pub output: String,
}

/// Error type for handling a turn
#[derive(Debug, Clone)]
pub enum TurnError {
    /// Language model call failed
    Model(String),
    /// Domain validation failed
    Validation(ValidationError),
}

impl std::fmt::Display for TurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnError::Model(err) => write!(f, "Language model error: {}", err),
            TurnError::Validation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TurnError {}

impl From<ModelError> for TurnError {
    fn from(err: ModelError) -> Self {
        TurnError::Model(err.to_string())
    }
}

impl From<ValidationError> for TurnError {
    fn from(err: ValidationError) -> Self {
        TurnError::Validation(err)
    }
}

/// One pizza order intake conversation.
pub struct FormSession<M: ?Sized + LanguageModel> {
    model: Arc<M>,
    schema: FormSchema,
    order: OrderData,
    transcript: Transcript,
    state: SessionState,
    config: FormConfig,
    id: SessionId,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl<M: ?Sized + LanguageModel> FormSession<M> {
    /// Opens a new session in the collecting state.
    pub fn new(model: Arc<M>, schema: FormSchema, config: FormConfig) -> Self {
        let now = Timestamp::now();
        let session = Self {
            model,
            schema,
            order: OrderData::new(),
            transcript: Transcript::new(),
            state: SessionState::default(),
            config,
            id: SessionId::new(),
            created_at: now,
            updated_at: now,
        };
        debug!(session_id = %session.id, "form session opened");
        session
    }

    /// Session identifier for logging and correlation.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once the session no longer accepts input.
    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// The fields collected so far.
    pub fn order(&self) -> &OrderData {
        &self.order
    }

    /// The bounded conversation history.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// When the session was opened.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the session last handled a turn.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Processes one user message and returns the reply to show.
    pub async fn handle_turn(&mut self, input: &str) -> Result<TurnReply, TurnError> {
        // 1. Closed sessions keep answering without mutating anything
        if self.state.is_closed() {
            return Ok(TurnReply {
                output: replies::FORM_CLOSED.to_string(),
            });
        }

        // 2. Exit intent wins over everything else
        if self.wants_exit(input).await? {
            info!(session_id = %self.id, "user abandoned the order");
            self.close()?;
            return Ok(self.reply(input, replies::ORDER_CANCELLED.to_string()));
        }

        // 3. A pending confirmation is resolved before any extraction
        if self.state == SessionState::AwaitingConfirmation {
            if self.confirms_order(input).await? {
                let order = CompletedOrder::from_order(&self.order)?;
                let output = receipt::render(&order);
                info!(session_id = %self.id, "order submitted");
                self.close()?;
                return Ok(self.reply(input, output));
            }

            // Declined: back to collecting. The same message continues the
            // turn, since a decline usually carries the correction.
            debug!(session_id = %self.id, "confirmation declined");
            self.advance(SessionState::Collecting)?;
        }

        // 4. Extract fields from the message and decide what to ask next
        self.collect(input).await
    }

    /// Runs extraction over the conversation, then either asks for the next
    /// missing field, proposes the summary, or submits outright.
    async fn collect(&mut self, input: &str) -> Result<TurnReply, TurnError> {
        let prompt = prompts::extraction(&self.schema, &self.transcript, input);
        let response = self.model.complete(&prompt).await?;
        let fragment = parse::extract_fragment(&response);

        let updated = self.order.merge(&self.schema, &fragment);
        if !updated.is_empty() {
            debug!(session_id = %self.id, fields = ?updated, "captured order fields");
        }

        match self.schema.first_missing(&self.order) {
            // Ask for exactly one missing field per turn
            Some(missing) => {
                let follow_up = prompts::follow_up(missing, &self.order, &self.transcript, input);
                let output = self.model.complete(&follow_up).await?;
                Ok(self.reply(input, output))
            }
            None if self.config.ask_confirm => {
                self.advance(SessionState::AwaitingConfirmation)?;
                let output = replies::confirmation_summary(&self.schema, &self.order);
                Ok(self.reply(input, output))
            }
            None => {
                let order = CompletedOrder::from_order(&self.order)?;
                let output = receipt::render(&order);
                info!(session_id = %self.id, "order submitted");
                self.close()?;
                Ok(self.reply(input, output))
            }
        }
    }

    /// Asks the model whether the user wants to abandon the form.
    async fn wants_exit(&self, input: &str) -> Result<bool, ModelError> {
        let prompt = prompts::exit_check(input);
        let response = self.model.complete(&prompt).await?;
        Ok(parse::affirmation(&response))
    }

    /// Asks the model whether the user accepted the pending summary.
    async fn confirms_order(&self, input: &str) -> Result<bool, ModelError> {
        let prompt = prompts::confirm_check(input);
        let response = self.model.complete(&prompt).await?;
        Ok(parse::affirmation(&response))
    }

    /// Records the exchange and wraps the output for the caller.
    fn reply(&mut self, input: &str, output: String) -> TurnReply {
        self.transcript.push(Turn::user(input));
        self.transcript.push(Turn::assistant(output.as_str()));
        self.updated_at = Timestamp::now();
        TurnReply { output }
    }

    fn advance(&mut self, next: SessionState) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(next)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), ValidationError> {
        self.advance(SessionState::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockLanguageModel;
    use crate::domain::form::FieldName;

    /// A primed boolean fragment continued with `false`.
    fn deny() -> &'static str {
        " false\n}\n```"
    }

    /// A primed boolean fragment continued with `true`.
    fn affirm() -> &'static str {
        " true\n}\n```"
    }

    fn full_extraction() -> &'static str {
        r#"{"pizza_type": "margherita", "name": "Bob", "address": "5 Elm St", "phone": "555-0100"}"#
    }

    fn session(mock: MockLanguageModel) -> FormSession<MockLanguageModel> {
        FormSession::new(
            Arc::new(mock),
            FormSchema::pizza_order(),
            FormConfig::default(),
        )
    }

    #[tokio::test]
    async fn exit_intent_cancels_and_closes() {
        let mock = MockLanguageModel::new().with_response(affirm());
        let mut session = session(mock.clone());

        let reply = session.handle_turn("stop, please").await.unwrap();

        assert_eq!(reply.output, replies::ORDER_CANCELLED);
        assert!(session.is_closed());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn closed_session_answers_without_model_calls() {
        let mock = MockLanguageModel::new().with_response(affirm());
        let mut session = session(mock.clone());
        session.handle_turn("forget it").await.unwrap();

        let reply = session.handle_turn("hello?").await.unwrap();

        assert_eq!(reply.output, replies::FORM_CLOSED);
        // Only the exit check from the first turn reached the model
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn partial_message_gets_a_follow_up_question() {
        let mock = MockLanguageModel::new()
            .with_response(deny())
            .with_response(r#"{"pizza_type": "margherita", "name": "", "address": "", "phone": ""}"#)
            .with_response("Who should the order be for?");
        let mut session = session(mock.clone());

        let reply = session.handle_turn("a margherita please").await.unwrap();

        assert_eq!(reply.output, "Who should the order be for?");
        assert_eq!(
            session.order().get(FieldName::PizzaType),
            Some("margherita")
        );
        assert_eq!(session.state(), SessionState::Collecting);
        assert_eq!(mock.call_count(), 3);

        let prompts = mock.prompts();
        assert!(prompts[1].contains("User: a margherita please"));
    }

    #[tokio::test]
    async fn complete_order_asks_for_confirmation() {
        let mock = MockLanguageModel::new()
            .with_response(deny())
            .with_response(full_extraction());
        let mut session = session(mock.clone());

        let reply = session
            .handle_turn("margherita for Bob, 5 Elm St, 555-0100")
            .await
            .unwrap();

        assert_eq!(session.state(), SessionState::AwaitingConfirmation);
        assert!(reply.output.contains("margherita"));
        assert!(reply.output.contains("Shall I submit it?"));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn confirming_submits_and_closes() {
        let mock = MockLanguageModel::new()
            .with_response(deny())
            .with_response(full_extraction())
            .with_response(deny()) // exit check on the confirming turn
            .with_response(affirm()); // confirm check
        let mut session = session(mock.clone());

        session
            .handle_turn("margherita for Bob, 5 Elm St, 555-0100")
            .await
            .unwrap();
        let reply = session.handle_turn("yes").await.unwrap();

        assert!(reply.output.contains("ORDER CONFIRMED"));
        assert!(reply.output.contains("Bob"));
        assert!(session.is_closed());
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn declining_keeps_fields_and_resumes_collection() {
        let mock = MockLanguageModel::new()
            .with_response(deny())
            .with_response(full_extraction())
            .with_response(deny()) // exit check on the declining turn
            .with_response(deny()) // confirm check says no
            .with_response(
                r#"{"pizza_type": "diavola", "name": "", "address": "", "phone": ""}"#,
            );
        let mut session = session(mock.clone());

        session
            .handle_turn("margherita for Bob, 5 Elm St, 555-0100")
            .await
            .unwrap();
        let reply = session
            .handle_turn("no, make it a diavola instead")
            .await
            .unwrap();

        // The correction was applied, the rest of the order survived
        assert_eq!(session.order().get(FieldName::PizzaType), Some("diavola"));
        assert_eq!(session.order().get(FieldName::Name), Some("Bob"));

        // Still complete, so the summary is proposed again in the same turn
        assert_eq!(session.state(), SessionState::AwaitingConfirmation);
        assert!(reply.output.contains("diavola"));
        assert_eq!(mock.call_count(), 5);
    }

    #[tokio::test]
    async fn submits_directly_when_confirmation_disabled() {
        let config = FormConfig {
            ask_confirm: false,
            strict: false,
        };
        let mock = MockLanguageModel::new()
            .with_response(deny())
            .with_response(full_extraction());
        let mut session = FormSession::new(
            Arc::new(mock.clone()),
            FormSchema::pizza_order(),
            config,
        );

        let reply = session
            .handle_turn("margherita for Bob, 5 Elm St, 555-0100")
            .await
            .unwrap();

        assert!(reply.output.contains("ORDER CONFIRMED"));
        assert!(session.is_closed());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn malformed_extraction_captures_nothing() {
        let mock = MockLanguageModel::new()
            .with_response(deny())
            .with_response("sorry, I cannot help with that")
            .with_response("What pizza would you like?");
        let mut session = session(mock.clone());

        let reply = session.handle_turn("a margherita").await.unwrap();

        assert_eq!(reply.output, "What pizza would you like?");
        assert!(session.order().get(FieldName::PizzaType).is_none());
        assert_eq!(session.state(), SessionState::Collecting);
    }

    #[tokio::test]
    async fn model_failure_surfaces_as_turn_error() {
        let mock = MockLanguageModel::new().with_error(ModelError::unavailable("down"));
        let mut session = session(mock);

        let result = session.handle_turn("a margherita").await;

        assert!(matches!(result, Err(TurnError::Model(_))));
    }

    #[tokio::test]
    async fn turns_are_recorded_in_the_transcript() {
        let mock = MockLanguageModel::new()
            .with_response(deny())
            .with_response(r#"{"pizza_type": "", "name": "", "address": "", "phone": ""}"#)
            .with_response("What pizza would you like?");
        let mut session = session(mock);

        session.handle_turn("hi there").await.unwrap();

        assert_eq!(session.transcript().len(), 2);
        let rendered = session.transcript().render();
        assert!(rendered.contains("User: hi there"));
        assert!(rendered.contains("Assistant: What pizza would you like?"));
    }
}
