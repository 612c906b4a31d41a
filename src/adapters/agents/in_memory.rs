//! In-memory Agent Service for testing.
//!
//! Keeps conversations in a map and answers runs from a script, so the
//! gateway can be exercised end to end without the remote service.
//!
//! # Features
//!
//! - Scripted conversation ids, run status and assistant replies
//! - Error injection for conversation creation and runs
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let service = InMemoryAgentService::new()
//!     .with_conversation_ids(["conv-1"])
//!     .with_run_status("completed")
//!     .with_reply("Hi there");
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::conversation::{
    ContentBlock, ConversationId, MessageList, MessageRole, RunResult, TextBody, TextMessage,
    ThreadMessage,
};
use crate::ports::{AgentService, AgentServiceError};

/// A call observed by [`InMemoryAgentService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    CreateConversation,
    AppendMessage {
        conversation: String,
        role: String,
        content: String,
    },
    CreateAndProcessRun {
        conversation: String,
        agent_id: String,
    },
    ListMessages {
        conversation: String,
    },
}

#[derive(Debug)]
struct State {
    threads: HashMap<String, Vec<ThreadMessage>>,
    scripted_ids: VecDeque<String>,
    next_id: u64,
    run_status: Option<String>,
    replies: VecDeque<Vec<ContentBlock>>,
    text_view: bool,
    create_error: Option<AgentServiceError>,
    run_error: Option<AgentServiceError>,
    calls: Vec<RecordedCall>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            threads: HashMap::new(),
            scripted_ids: VecDeque::new(),
            next_id: 0,
            run_status: Some("completed".to_string()),
            replies: VecDeque::new(),
            text_view: false,
            create_error: None,
            run_error: None,
            calls: Vec::new(),
        }
    }
}

/// In-memory agent service with scripted behaviour.
///
/// Clones share state, so a test can keep a handle for inspection after
/// handing a clone to the gateway.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentService {
    state: Arc<Mutex<State>>,
}

impl InMemoryAgentService {
    /// Creates a service whose runs complete without replying.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identifiers handed out by `create_conversation`, in order. Once
    /// exhausted, ids fall back to `thread_<n>`.
    pub fn with_conversation_ids<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state()
            .scripted_ids
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Registers an already existing conversation.
    pub fn with_existing_conversation(self, id: impl Into<String>) -> Self {
        self.state().threads.entry(id.into()).or_default();
        self
    }

    /// Status reported by every run.
    pub fn with_run_status(self, status: impl Into<String>) -> Self {
        self.state().run_status = Some(status.into());
        self
    }

    /// Runs report no status at all.
    pub fn without_run_status(self) -> Self {
        self.state().run_status = None;
        self
    }

    /// Queues an assistant text reply for the next run.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_reply_blocks(vec![ContentBlock::text(text)])
    }

    /// Queues an assistant reply with arbitrary content blocks.
    pub fn with_reply_blocks(self, blocks: Vec<ContentBlock>) -> Self {
        self.state().replies.push_back(blocks);
        self
    }

    /// Also expose the text-only view when listing messages.
    pub fn with_text_view(self) -> Self {
        self.state().text_view = true;
        self
    }

    /// Makes `create_conversation` fail.
    pub fn failing_create(self, error: AgentServiceError) -> Self {
        self.state().create_error = Some(error);
        self
    }

    /// Makes `create_and_process_run` fail.
    pub fn failing_run(self, error: AgentServiceError) -> Self {
        self.state().run_error = Some(error);
        self
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Returns the messages stored for a conversation.
    pub fn messages(&self, conversation: &str) -> Vec<ThreadMessage> {
        self.state()
            .threads
            .get(conversation)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of conversations created or registered.
    pub fn conversation_count(&self) -> usize {
        self.state().threads.len()
    }
}

fn thread_not_found(conversation: &ConversationId) -> AgentServiceError {
    AgentServiceError::status(404, format!("No thread found with id '{}'.", conversation))
}

fn text_view(messages: &[ThreadMessage]) -> Vec<TextMessage> {
    messages
        .iter()
        .flat_map(|message| {
            message.content.iter().filter_map(|block| {
                block
                    .text
                    .clone()
                    .map(|text| TextMessage::new(message.role.clone(), text))
            })
        })
        .collect()
}

#[async_trait]
impl AgentService for InMemoryAgentService {
    async fn create_conversation(&self) -> Result<ConversationId, AgentServiceError> {
        let mut state = self.state();
        state.calls.push(RecordedCall::CreateConversation);

        if let Some(err) = state.create_error.clone() {
            return Err(err);
        }

        let id = match state.scripted_ids.pop_front() {
            Some(id) => id,
            None => {
                state.next_id += 1;
                format!("thread_{}", state.next_id)
            }
        };
        state.threads.insert(id.clone(), Vec::new());
        Ok(ConversationId::new(id))
    }

    async fn append_message(
        &self,
        conversation: &ConversationId,
        role: &MessageRole,
        content: &str,
    ) -> Result<(), AgentServiceError> {
        let mut state = self.state();
        state.calls.push(RecordedCall::AppendMessage {
            conversation: conversation.to_string(),
            role: role.to_string(),
            content: content.to_string(),
        });

        let thread = state
            .threads
            .get_mut(conversation.as_str())
            .ok_or_else(|| thread_not_found(conversation))?;
        thread.push(ThreadMessage::new(
            role.clone(),
            vec![ContentBlock {
                kind: Some("text".to_string()),
                text: Some(TextBody::structured(content)),
                value: None,
            }],
        ));
        Ok(())
    }

    async fn create_and_process_run(
        &self,
        conversation: &ConversationId,
        agent_id: &str,
    ) -> Result<RunResult, AgentServiceError> {
        let mut state = self.state();
        state.calls.push(RecordedCall::CreateAndProcessRun {
            conversation: conversation.to_string(),
            agent_id: agent_id.to_string(),
        });

        if let Some(err) = state.run_error.clone() {
            return Err(err);
        }
        if !state.threads.contains_key(conversation.as_str()) {
            return Err(thread_not_found(conversation));
        }

        if let Some(blocks) = state.replies.pop_front() {
            if let Some(thread) = state.threads.get_mut(conversation.as_str()) {
                thread.push(ThreadMessage::new(MessageRole::assistant(), blocks));
            }
        }

        Ok(RunResult {
            id: None,
            status: state.run_status.clone(),
        })
    }

    async fn list_messages(
        &self,
        conversation: &ConversationId,
    ) -> Result<MessageList, AgentServiceError> {
        let mut state = self.state();
        state.calls.push(RecordedCall::ListMessages {
            conversation: conversation.to_string(),
        });

        let data = state
            .threads
            .get(conversation.as_str())
            .cloned()
            .ok_or_else(|| thread_not_found(conversation))?;

        let list = if state.text_view {
            let view = text_view(&data);
            MessageList::new(data).with_text_messages(view)
        } else {
            MessageList::new(data)
        };
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_ids_then_generated_ids() {
        let service = InMemoryAgentService::new().with_conversation_ids(["conv-1"]);

        assert_eq!(service.create_conversation().await.unwrap().as_str(), "conv-1");
        assert_eq!(service.create_conversation().await.unwrap().as_str(), "thread_1");
        assert_eq!(service.create_conversation().await.unwrap().as_str(), "thread_2");
        assert_eq!(service.conversation_count(), 3);
    }

    #[tokio::test]
    async fn run_appends_queued_reply() {
        let service = InMemoryAgentService::new().with_reply("Hi there");
        let id = service.create_conversation().await.unwrap();

        service
            .append_message(&id, &MessageRole::user(), "Hello")
            .await
            .unwrap();
        let run = service.create_and_process_run(&id, "asst_1").await.unwrap();
        let list = service.list_messages(&id).await.unwrap();

        assert_eq!(run.status(), Some("completed"));
        assert_eq!(list.data.len(), 2);
        assert!(list.data[1].role.is_assistant());
        assert!(list.text_messages.is_none());
    }

    #[tokio::test]
    async fn text_view_mirrors_text_blocks() {
        let service = InMemoryAgentService::new()
            .with_text_view()
            .with_reply("Hi");
        let id = service.create_conversation().await.unwrap();
        service.create_and_process_run(&id, "asst_1").await.unwrap();

        let list = service.list_messages(&id).await.unwrap();
        let view = list.text_messages.unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].role, Some(MessageRole::assistant()));
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let service = InMemoryAgentService::new();
        let err = service
            .append_message(&ConversationId::new("missing"), &MessageRole::user(), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentServiceError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn injected_run_failure_is_returned() {
        let service =
            InMemoryAgentService::new().failing_run(AgentServiceError::network("reset by peer"));
        let id = service.create_conversation().await.unwrap();

        let err = service.create_and_process_run(&id, "asst_1").await.unwrap_err();
        assert_eq!(err.to_string(), "network error: reset by peer");
    }
}
