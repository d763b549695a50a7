//! Troubleshooting Session
//!
//! Drives the guided fault-diagnosis chat against any [`AiAssistant`].
//! The transcript lives in the project's [`TroubleshootingState`]; the
//! full history is resent on every turn, so resuming after a restart
//! needs no provider-side session handle.

use crate::ai::provider::AiAssistant;
use crate::ai::{prompts, AiError};
use crate::project::model::{ChatMessage, TroubleshootingState};

/// Stateless driver; all session state is in the `TroubleshootingState`.
pub struct Troubleshooter<'a, A: AiAssistant + ?Sized> {
    assistant: &'a A,
}

impl<'a, A: AiAssistant + ?Sized> Troubleshooter<'a, A> {
    pub fn new(assistant: &'a A) -> Self {
        Troubleshooter { assistant }
    }

    /// Open a session from a fault description. The opening prompt is not
    /// part of the visible transcript; only the assistant's first step is.
    pub async fn begin(
        &self,
        state: &mut TroubleshootingState,
        description: &str,
    ) -> Result<(), AiError> {
        let opening = prompts::session_opening(description);
        let reply = self.assistant.chat(&[], &opening).await?;
        state.description = description.to_string();
        state.messages = vec![ChatMessage::assistant(reply)];
        state.active = true;
        Ok(())
    }

    /// One exchange: append the installer's message and the assistant's
    /// reply. On failure nothing is appended and the caller shows
    /// [`AiError::user_message`].
    pub async fn exchange(
        &self,
        state: &mut TroubleshootingState,
        message: &str,
    ) -> Result<(), AiError> {
        let reply = self.assistant.chat(&state.messages, message).await?;
        state.messages.push(ChatMessage::user(message));
        state.messages.push(ChatMessage::assistant(reply));
        Ok(())
    }

    /// Compose the intervention report from the transcript so far.
    pub async fn compose_report(&self, state: &TroubleshootingState) -> Result<String, AiError> {
        self.assistant.compose_report(&state.messages).await
    }
}
