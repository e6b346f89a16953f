//! Turn persistence service.
//!
//! Given a conversation and a new user message, produce an assistant
//! reply and durably record the turn -- while guaranteeing the caller
//! always receives the generated reply even if persistence fails.
//!
//! Failure policy: provider failure and input validation failure
//! propagate; persistence failure after a successful generation is
//! caught and logged, never surfaced. Conversational availability takes
//! priority over durability for a single turn, and the log line is the
//! operator's only signal that turn data was lost.

use chrono::{Duration, Utc};
use colloquy_types::chat::{Chat, Message, MessageRole};
use colloquy_types::config::HistoryPolicy;
use colloquy_types::error::{RepositoryError, TurnError};
use colloquy_types::identity::Caller;
use colloquy_types::turn::{TurnRequest, WireMessage};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::repository::ChatRepository;
use crate::provider::TextProvider;

/// Maximum title length derived from the first user message.
const TITLE_MAX_CHARS: usize = 30;

/// Title used when the user text is empty.
const FALLBACK_TITLE: &str = "New Chat";

/// Orchestrates one conversation turn: provider call plus best-effort
/// persistence.
///
/// Generic over `ChatRepository` and `TextProvider` to maintain clean
/// architecture (colloquy-core never depends on colloquy-infra).
pub struct TurnService<R: ChatRepository, P: TextProvider> {
    repo: R,
    provider: P,
    history: HistoryPolicy,
}

impl<R: ChatRepository, P: TextProvider> TurnService<R, P> {
    /// Create a new turn service.
    pub fn new(repo: R, provider: P, history: HistoryPolicy) -> Self {
        Self {
            repo,
            provider,
            history,
        }
    }

    /// Run one turn for the given caller.
    ///
    /// Returns the generated text. The only errors that propagate are
    /// input validation (`BadRequest`) and provider failure (`Upstream`);
    /// persistence problems are logged and swallowed.
    pub async fn run_turn(
        &self,
        caller: &Caller,
        request: &TurnRequest,
    ) -> Result<String, TurnError> {
        let messages = request
            .messages
            .as_deref()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| TurnError::BadRequest("No messages".to_string()))?;

        // The latest user text drives both the prompt (under the default
        // policy) and the derived chat title.
        let user_text = messages[messages.len() - 1].content.clone();

        let prompt = build_prompt(self.history, messages);
        let text = self.provider.generate(&prompt).await?;

        if let Some(chat_id) = request.chat_id.as_deref() {
            if let Err(e) = self
                .persist_turn(chat_id, caller, &user_text, &text)
                .await
            {
                warn!(
                    chat_id,
                    owner = caller.scope_id(),
                    error = %e,
                    "turn persistence failed; reply returned anyway"
                );
            }
        } else {
            info!("no chat id supplied; skipping persistence");
        }

        Ok(text)
    }

    /// Record a completed turn: idempotent chat creation, then the user
    /// and assistant messages in order, then the chat's activity bump.
    async fn persist_turn(
        &self,
        chat_id: &str,
        caller: &Caller,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let chat = Chat {
            id: chat_id.to_string(),
            owner_id: caller.scope_id().to_string(),
            title: derive_title(user_text),
            created_at: now,
            updated_at: now,
        };
        self.repo.upsert_chat(&chat).await?;

        let user_at = Utc::now();
        self.repo
            .append_message(&Message {
                id: Uuid::now_v7(),
                chat_id: chat_id.to_string(),
                role: MessageRole::User,
                content: user_text.to_string(),
                created_at: user_at,
            })
            .await?;

        // The assistant timestamp must strictly follow the user's even
        // when both land within the clock's resolution.
        let assistant_at = Utc::now().max(user_at + Duration::nanoseconds(1));
        self.repo
            .append_message(&Message {
                id: Uuid::now_v7(),
                chat_id: chat_id.to_string(),
                role: MessageRole::Assistant,
                content: assistant_text.to_string(),
                created_at: assistant_at,
            })
            .await?;

        self.repo.touch_chat(chat_id, assistant_at).await?;
        Ok(())
    }
}

/// Derive a chat title from the first user text: the leading characters,
/// or a fallback when the text is empty.
fn derive_title(user_text: &str) -> String {
    let title: String = user_text.chars().take(TITLE_MAX_CHARS).collect();
    if title.trim().is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title
    }
}

/// Build the provider prompt from the conversation under a history policy.
///
/// `Latest` forwards only the final message's content. Wider policies
/// join the selected window as `role: content` lines in conversation
/// order, since the provider is unary and has no native multi-turn
/// context.
fn build_prompt(policy: HistoryPolicy, messages: &[WireMessage]) -> String {
    let window: &[WireMessage] = match policy {
        HistoryPolicy::Latest => return messages[messages.len() - 1].content.clone(),
        HistoryPolicy::LastN { n } => {
            let start = messages.len().saturating_sub(n);
            &messages[start..]
        }
        HistoryPolicy::Full => messages,
    };

    window
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use colloquy_types::chat::ChatSummary;
    use colloquy_types::error::ProviderError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory repository fake recording every write.
    #[derive(Default)]
    struct FakeRepo {
        chats: Mutex<Vec<Chat>>,
        messages: Mutex<Vec<Message>>,
        fail_writes: bool,
    }

    impl ChatRepository for FakeRepo {
        async fn upsert_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::Query("database is locked".to_string()));
            }
            let mut chats = self.chats.lock().unwrap();
            // First write wins, like the conditional insert in SQLite.
            if !chats.iter().any(|c| c.id == chat.id) {
                chats.push(chat.clone());
            }
            Ok(())
        }

        async fn append_message(&self, message: &Message) -> Result<(), RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::Query("database is locked".to_string()));
            }
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn touch_chat(
            &self,
            chat_id: &str,
            at: DateTime<Utc>,
        ) -> Result<(), RepositoryError> {
            for chat in self.chats.lock().unwrap().iter_mut() {
                if chat.id == chat_id {
                    chat.updated_at = at;
                }
            }
            Ok(())
        }

        async fn get_chat(
            &self,
            chat_id: &str,
            owner_id: &str,
        ) -> Result<Option<Chat>, RepositoryError> {
            Ok(self
                .chats
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == chat_id && c.owner_id == owner_id)
                .cloned())
        }

        async fn get_messages(&self, chat_id: &str) -> Result<Vec<Message>, RepositoryError> {
            let mut messages: Vec<Message> = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.chat_id == chat_id)
                .cloned()
                .collect();
            messages.sort_by_key(|m| m.created_at);
            Ok(messages)
        }

        async fn list_chats(&self, _owner_id: &str) -> Result<Vec<ChatSummary>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    /// Provider fake returning a fixed reply and counting invocations.
    struct FakeProvider {
        reply: Result<String, ()>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl FakeProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }
    }

    impl TextProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(ProviderError::Upstream {
                    message: "HTTP 503: overloaded".to_string(),
                }),
            }
        }
    }

    fn request(messages: &[(&str, MessageRole)], chat_id: Option<&str>) -> TurnRequest {
        TurnRequest {
            messages: Some(
                messages
                    .iter()
                    .map(|(content, role)| WireMessage {
                        role: *role,
                        content: content.to_string(),
                    })
                    .collect(),
            ),
            chat_id: chat_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_missing_messages_is_bad_request() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::replying("hi"),
            HistoryPolicy::Latest,
        );
        let err = service
            .run_turn(
                &Caller::Guest,
                &TurnRequest {
                    messages: None,
                    chat_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::BadRequest(_)));
        assert_eq!(service.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_messages_is_bad_request() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::replying("hi"),
            HistoryPolicy::Latest,
        );
        let err = service
            .run_turn(
                &Caller::Guest,
                &TurnRequest {
                    messages: Some(Vec::new()),
                    chat_id: Some("chat_1".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_no_chat_id_skips_persistence() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::replying("Yes, I am working."),
            HistoryPolicy::Latest,
        );
        let text = service
            .run_turn(
                &Caller::Guest,
                &request(&[("Hello, are you working?", MessageRole::User)], None),
            )
            .await
            .unwrap();

        assert_eq!(text, "Yes, I am working.");
        assert!(service.repo.chats.lock().unwrap().is_empty());
        assert!(service.repo.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_turn_persists_user_then_assistant() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::replying("reply text"),
            HistoryPolicy::Latest,
        );
        let text = service
            .run_turn(
                &Caller::User("user_a".to_string()),
                &request(&[("Hello there", MessageRole::User)], Some("chat_1")),
            )
            .await
            .unwrap();
        assert_eq!(text, "reply text");

        let chats = service.repo.chats.lock().unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, "chat_1");
        assert_eq!(chats[0].owner_id, "user_a");
        assert_eq!(chats[0].title, "Hello there");

        let messages = service.repo.messages.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hello there");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "reply text");
        assert!(messages[0].created_at < messages[1].created_at);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates_and_persists_nothing() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::failing(),
            HistoryPolicy::Latest,
        );
        let err = service
            .run_turn(
                &Caller::Guest,
                &request(&[("Hello", MessageRole::User)], Some("chat_1")),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Upstream(_)));
        assert!(service.repo.chats.lock().unwrap().is_empty());
        assert!(service.repo.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_is_swallowed() {
        let repo = FakeRepo {
            fail_writes: true,
            ..FakeRepo::default()
        };
        let service = TurnService::new(
            repo,
            FakeProvider::replying("still here"),
            HistoryPolicy::Latest,
        );
        let text = service
            .run_turn(
                &Caller::Guest,
                &request(&[("Hello", MessageRole::User)], Some("chat_1")),
            )
            .await
            .unwrap();

        // The caller still receives the generated text.
        assert_eq!(text, "still here");
    }

    #[tokio::test]
    async fn test_two_turns_one_chat_four_messages() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::replying("ok"),
            HistoryPolicy::Latest,
        );
        let req = request(&[("Hello, are you working?", MessageRole::User)], Some("chat_1"));

        service.run_turn(&Caller::Guest, &req).await.unwrap();
        let first_updated = service.repo.chats.lock().unwrap()[0].updated_at;
        service.run_turn(&Caller::Guest, &req).await.unwrap();

        let chats = service.repo.chats.lock().unwrap();
        assert_eq!(chats.len(), 1);
        assert!(chats[0].updated_at > first_updated);

        let messages = service.repo.messages.lock().unwrap();
        assert_eq!(messages.len(), 4);
        // Strict chronological order across both turns.
        for pair in messages.windows(2) {
            assert!(pair[0].created_at < pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_upsert_retains_first_title() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::replying("ok"),
            HistoryPolicy::Latest,
        );

        service
            .run_turn(
                &Caller::Guest,
                &request(&[("first question", MessageRole::User)], Some("chat_1")),
            )
            .await
            .unwrap();
        service
            .run_turn(
                &Caller::Guest,
                &request(&[("second question", MessageRole::User)], Some("chat_1")),
            )
            .await
            .unwrap();

        let chats = service.repo.chats.lock().unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].title, "first question");
    }

    #[tokio::test]
    async fn test_latest_policy_forwards_only_final_message() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::replying("ok"),
            HistoryPolicy::Latest,
        );
        service
            .run_turn(
                &Caller::Guest,
                &request(
                    &[
                        ("earlier question", MessageRole::User),
                        ("earlier answer", MessageRole::Assistant),
                        ("latest question", MessageRole::User),
                    ],
                    None,
                ),
            )
            .await
            .unwrap();

        let prompt = service.provider.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(prompt, "latest question");
    }

    #[tokio::test]
    async fn test_full_policy_forwards_whole_window() {
        let service = TurnService::new(
            FakeRepo::default(),
            FakeProvider::replying("ok"),
            HistoryPolicy::Full,
        );
        service
            .run_turn(
                &Caller::Guest,
                &request(
                    &[
                        ("q1", MessageRole::User),
                        ("a1", MessageRole::Assistant),
                        ("q2", MessageRole::User),
                    ],
                    None,
                ),
            )
            .await
            .unwrap();

        let prompt = service.provider.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(prompt, "user: q1\nassistant: a1\nuser: q2");
    }

    #[test]
    fn test_last_n_policy_window() {
        let messages = vec![
            WireMessage {
                role: MessageRole::User,
                content: "q1".to_string(),
            },
            WireMessage {
                role: MessageRole::Assistant,
                content: "a1".to_string(),
            },
            WireMessage {
                role: MessageRole::User,
                content: "q2".to_string(),
            },
        ];
        assert_eq!(
            build_prompt(HistoryPolicy::LastN { n: 2 }, &messages),
            "assistant: a1\nuser: q2"
        );
        // A window wider than the conversation takes everything.
        assert_eq!(
            build_prompt(HistoryPolicy::LastN { n: 10 }, &messages),
            "user: q1\nassistant: a1\nuser: q2"
        );
    }

    #[test]
    fn test_derive_title_truncates_by_chars() {
        assert_eq!(derive_title("Hello"), "Hello");
        assert_eq!(
            derive_title("This is a fairly long first message that keeps going"),
            "This is a fairly long first me"
        );
        // Multibyte input truncates on character boundaries.
        let title = derive_title(&"ü".repeat(40));
        assert_eq!(title.chars().count(), 30);
    }

    #[test]
    fn test_derive_title_fallback() {
        assert_eq!(derive_title(""), "New Chat");
        assert_eq!(derive_title("   "), "New Chat");
    }
}
