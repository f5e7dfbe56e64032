//! Ordered execution of declarative click-action lists.

use std::sync::Arc;

use npc_content::DialogRegistry;
use npc_core::{ActionDefinition, ActionKind, DialogDescriptor};
use thiserror::Error;

use crate::bridge::{
    ActorId, CommandOrigin, EntityHandle, PlaceholderResolver, PlayerGateway, ResolvedButton,
    ResolvedDialog,
};
use crate::text;

/// Failure of a single action; never aborts the rest of the list.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("dialog not found: {0}")]
    DialogNotFound(String),

    #[error("command rejected: {0}")]
    CommandRejected(String),
}

/// Resolves action lists into executable steps and runs them in order.
///
/// Each invocation is independent; the pipeline holds no per-interaction
/// state. A failing action is logged and the remaining actions still run, so
/// an NPC with three configured actions always attempts all three.
pub struct ActionPipeline {
    dialogs: Arc<DialogRegistry>,
    gateway: Arc<dyn PlayerGateway>,
    placeholders: Arc<dyn PlaceholderResolver>,
}

impl ActionPipeline {
    pub fn new(
        dialogs: Arc<DialogRegistry>,
        gateway: Arc<dyn PlayerGateway>,
        placeholders: Arc<dyn PlaceholderResolver>,
    ) -> Self {
        Self {
            dialogs,
            gateway,
            placeholders,
        }
    }

    /// Runs every action once, in order, isolating per-action failures.
    pub fn execute(&self, actor: &ActorId, source: EntityHandle, actions: &[ActionDefinition]) {
        for action in actions {
            if let Err(error) = self.run_action(actor, source, action) {
                tracing::error!(kind = %action.kind, %actor, %error, "click action failed");
            }
        }
    }

    /// Runs a pressed dialog button: its command list, then its message.
    pub fn run_button(&self, actor: &ActorId, button: &ResolvedButton) {
        for command in &button.commands {
            if let Err(error) = self.run_command(actor, command, button.as_actor) {
                tracing::error!(%actor, %error, "dialog button command failed");
            }
        }

        if let Some(message) = &button.message {
            if !message.is_empty() {
                self.send_message(actor, message);
            }
        }
    }

    fn run_action(
        &self,
        actor: &ActorId,
        source: EntityHandle,
        action: &ActionDefinition,
    ) -> Result<(), ActionError> {
        match action.kind {
            ActionKind::Command => self.run_command(actor, &action.value, action.as_actor),
            ActionKind::Dialog => self.open_dialog(actor, source, &action.value),
            ActionKind::Message => {
                self.send_message(actor, &action.value);
                Ok(())
            }
        }
    }

    fn run_command(&self, actor: &ActorId, template: &str, as_actor: bool) -> Result<(), ActionError> {
        let resolved = self.placeholders.resolve(actor, template);
        let command = resolved.strip_prefix('/').unwrap_or(&resolved);
        let origin = if as_actor {
            CommandOrigin::Actor(*actor)
        } else {
            CommandOrigin::Server
        };

        if self.gateway.execute_command(origin, command) {
            Ok(())
        } else {
            Err(ActionError::CommandRejected(command.to_owned()))
        }
    }

    fn send_message(&self, actor: &ActorId, template: &str) {
        let message = text::colorize(&self.placeholders.resolve(actor, template));
        self.gateway.send_message(actor, &message);
    }

    fn open_dialog(
        &self,
        actor: &ActorId,
        source: EntityHandle,
        name: &str,
    ) -> Result<(), ActionError> {
        let Some(descriptor) = self.dialogs.get(name) else {
            return Err(ActionError::DialogNotFound(name.to_owned()));
        };

        let dialog = self.resolve_dialog(actor, &descriptor);
        self.gateway.show_dialog(actor, source, dialog);
        Ok(())
    }

    /// Substitutes placeholders and color codes for one viewer. Button
    /// command/message templates stay raw until the button is pressed.
    fn resolve_dialog(&self, actor: &ActorId, descriptor: &DialogDescriptor) -> ResolvedDialog {
        ResolvedDialog {
            title: text::colorize(&self.placeholders.resolve(actor, &descriptor.title)),
            body: text::colorize(&self.placeholders.resolve(actor, &descriptor.body)),
            buttons: descriptor
                .buttons
                .iter()
                .map(|button| ResolvedButton {
                    label: text::colorize(&self.placeholders.resolve(actor, &button.label)),
                    commands: button.commands.clone(),
                    message: button.message.clone(),
                    as_actor: button.as_actor,
                })
                .collect(),
        }
    }
}
