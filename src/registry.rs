//! Command registry and dispatch.
//!
//! A [`CommandRegistry`] holds command definitions together with their async
//! handlers, keyed by name locally and by snowflake ID once Discord has
//! registered them. [`CommandRegistry::dispatch`] turns an incoming
//! [`Interaction`] into a handler invocation, running any before/after hooks
//! attached to the command.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::types::{ApplicationCommand, CommandData, CommandDataOption, Interaction, Snowflake};

/// Error type handlers and hooks report with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;

/// An async command handler.
pub type CommandHandler = Box<dyn Fn(CommandContext) -> HandlerFuture + Send + Sync>;

/// An async hook run before or after a handler.
pub type InvokeHook = Box<dyn Fn() -> HandlerFuture + Send + Sync>;

/// Everything a handler gets about the invocation it serves.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub interaction: Interaction,
}

impl CommandContext {
    pub fn data(&self) -> Option<&CommandData> {
        self.interaction.data.as_ref()
    }

    /// Look up a supplied argument by name, descending subcommand levels.
    pub fn argument(&self, name: &str) -> Option<&CommandDataOption> {
        self.data().and_then(|data| data.argument(name))
    }
}

/// A command definition bound to its handler and hooks.
pub struct RegisteredCommand {
    command: ApplicationCommand,
    handler: CommandHandler,
    before_hook: Option<InvokeHook>,
    after_hook: Option<InvokeHook>,
}

impl RegisteredCommand {
    pub fn new<F, Fut>(command: ApplicationCommand, handler: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Self {
            command,
            handler: Box::new(move |ctx| Box::pin(handler(ctx))),
            before_hook: None,
            after_hook: None,
        }
    }

    /// Run `hook` before the handler. A failing hook skips the handler.
    pub fn before_invoke<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.before_hook = Some(Box::new(move || Box::pin(hook())));
        self
    }

    /// Run `hook` after the handler, whether or not the handler succeeded.
    pub fn after_invoke<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.after_hook = Some(Box::new(move || Box::pin(hook())));
        self
    }

    pub fn command(&self) -> &ApplicationCommand {
        &self.command
    }

    pub fn name(&self) -> &str {
        &self.command.name
    }
}

impl std::fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("command", &self.command)
            .field("before_hook", &self.before_hook.is_some())
            .field("after_hook", &self.after_hook.is_some())
            .finish()
    }
}

/// Error raised when registering a command.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two handlers for the same command name would make dispatch ambiguous.
    #[error("a command named `{0}` is already registered")]
    DuplicateName(String),
}

/// Error raised while invoking a command.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// The before hook failed, so the handler never ran.
    #[error("before hook failed: {0}")]
    BeforeHook(HandlerError),

    /// The handler itself failed.
    #[error("handler failed: {0}")]
    Handler(HandlerError),

    /// The handler succeeded but the after hook failed.
    #[error("after hook failed: {0}")]
    AfterHook(HandlerError),
}

/// What [`CommandRegistry::dispatch`] decided about an interaction.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The interaction was a Ping; answer with Pong.
    Ping,
    /// No registered command matched the invocation.
    NotFound { command_id: Option<Snowflake> },
    /// A handler ran to completion.
    Invoked,
}

/// Holds registered commands and routes interactions to their handlers.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<Snowflake, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Names are unique; a second registration under an
    /// existing name is rejected rather than silently replaced.
    pub fn register(&mut self, registered: RegisteredCommand) -> Result<(), RegistryError> {
        let name = registered.name().to_owned();
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        let index = self.commands.len();
        if let Some(id) = registered.command.id {
            self.by_id.insert(id, index);
        }
        debug!(command = %name, "registered command");
        self.by_name.insert(name, index);
        self.commands.push(registered);
        Ok(())
    }

    /// Record the snowflake Discord assigned to a command, enabling ID-based
    /// dispatch. Returns false when no command has that name.
    pub fn bind_id(&mut self, name: &str, id: Snowflake) -> bool {
        match self.by_name.get(name) {
            Some(&index) => {
                self.commands[index].command.id = Some(id);
                self.by_id.insert(id, index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: Snowflake) -> Option<&RegisteredCommand> {
        self.by_id.get(&id).map(|&index| &self.commands[index])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&RegisteredCommand> {
        self.by_name.get(name).map(|&index| &self.commands[index])
    }

    /// Iterate every registered command definition, e.g. for bulk upload.
    pub fn commands(&self) -> impl Iterator<Item = &ApplicationCommand> {
        self.commands.iter().map(RegisteredCommand::command)
    }

    /// Route an interaction to its handler.
    ///
    /// Pings short-circuit without touching handlers. Command invocations
    /// are matched by the invoked command's ID, falling back to its name for
    /// commands whose ID has not been bound yet.
    pub async fn dispatch(&self, interaction: Interaction) -> Result<DispatchOutcome, InvokeError> {
        if interaction.is_ping() {
            debug!(id = %interaction.id, "ping interaction");
            return Ok(DispatchOutcome::Ping);
        }

        let Some(data) = interaction.data.as_ref() else {
            warn!(id = %interaction.id, "command interaction without data");
            return Ok(DispatchOutcome::NotFound { command_id: None });
        };

        // Name fallback only covers commands whose ID is not bound yet; a
        // bound ID that differs from the payload is a mismatch, not a match.
        let registered = self.get(data.id).or_else(|| {
            self.get_by_name(&data.name)
                .filter(|registered| registered.command.id.is_none())
        });
        let Some(registered) = registered else {
            warn!(command_id = %data.id, name = %data.name, "no handler for command");
            return Ok(DispatchOutcome::NotFound {
                command_id: Some(data.id),
            });
        };

        self.invoke(registered, interaction).await?;
        Ok(DispatchOutcome::Invoked)
    }

    async fn invoke(
        &self,
        registered: &RegisteredCommand,
        interaction: Interaction,
    ) -> Result<(), InvokeError> {
        if let Some(before) = &registered.before_hook {
            before().await.map_err(InvokeError::BeforeHook)?;
        }

        let result = (registered.handler)(CommandContext { interaction }).await;

        // The after hook runs regardless; a handler failure takes precedence
        // over an after hook failure.
        let after_result = match &registered.after_hook {
            Some(after) => after().await,
            None => Ok(()),
        };

        result.map_err(InvokeError::Handler)?;
        after_result.map_err(InvokeError::AfterHook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApplicationCommandBuilder, JsonModel};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;

    fn hello_command() -> ApplicationCommand {
        ApplicationCommandBuilder::new("hello", "Say hello").build()
    }

    fn invocation() -> Interaction {
        Interaction::from_json(json!({
            "type": 2,
            "id": "1",
            "guild_id": "2",
            "channel_id": "3",
            "token": "tok",
            "member": {"user": {"id": "4"}},
            "data": {"id": "5", "name": "hello"},
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn dispatches_to_handler_bound_by_id() {
        let invoked = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&invoked);

        let mut registry = CommandRegistry::new();
        registry
            .register(RegisteredCommand::new(hello_command(), move |ctx| {
                let seen = Arc::clone(&seen);
                async move {
                    assert_eq!(ctx.interaction.member_id(), Some(Snowflake::new(4)));
                    seen.store(true, Ordering::SeqCst);
                    Ok(())
                }
            }))
            .unwrap();
        assert!(registry.bind_id("hello", Snowflake::new(5)));

        let outcome = registry.dispatch(invocation()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Invoked);
        assert!(invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn falls_back_to_name_when_id_unbound() {
        let mut registry = CommandRegistry::new();
        registry
            .register(RegisteredCommand::new(hello_command(), |_| async { Ok(()) }))
            .unwrap();

        let outcome = registry.dispatch(invocation()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Invoked);
    }

    #[tokio::test]
    async fn bound_id_mismatch_reports_not_found() {
        let mut registry = CommandRegistry::new();
        registry
            .register(RegisteredCommand::new(hello_command(), |_| async { Ok(()) }))
            .unwrap();
        assert!(registry.bind_id("hello", Snowflake::new(99)));

        // The payload invokes command 5; our "hello" is bound to 99.
        let outcome = registry.dispatch(invocation()).await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::NotFound {
                command_id: Some(Snowflake::new(5))
            }
        );
    }

    #[tokio::test]
    async fn ping_short_circuits() {
        let registry = CommandRegistry::new();
        let ping = Interaction::from_json(json!({"type": 1, "id": "1", "token": "tok"})).unwrap();
        assert_eq!(registry.dispatch(ping).await.unwrap(), DispatchOutcome::Ping);
    }

    #[tokio::test]
    async fn unknown_command_reports_not_found() {
        let registry = CommandRegistry::new();
        let outcome = registry.dispatch(invocation()).await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::NotFound {
                command_id: Some(Snowflake::new(5))
            }
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .register(RegisteredCommand::new(hello_command(), |_| async { Ok(()) }))
            .unwrap();
        let err = registry
            .register(RegisteredCommand::new(hello_command(), |_| async { Ok(()) }))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "hello"));
    }

    #[tokio::test]
    async fn failing_before_hook_skips_handler() {
        let invoked = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&invoked);

        let mut registry = CommandRegistry::new();
        registry
            .register(
                RegisteredCommand::new(hello_command(), move |_| {
                    let seen = Arc::clone(&seen);
                    async move {
                        seen.store(true, Ordering::SeqCst);
                        Ok(())
                    }
                })
                .before_invoke(|| async { Err::<(), HandlerError>("not allowed".into()) }),
            )
            .unwrap();

        let err = registry.dispatch(invocation()).await.unwrap_err();
        assert!(matches!(err, InvokeError::BeforeHook(_)));
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn after_hook_runs_when_handler_fails() {
        let after_runs = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&after_runs);

        let mut registry = CommandRegistry::new();
        registry
            .register(
                RegisteredCommand::new(hello_command(), |_| async {
                    Err::<(), HandlerError>("boom".into())
                })
                .after_invoke(move || {
                    let counter = Arc::clone(&counter);
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                }),
            )
            .unwrap();

        let err = registry.dispatch(invocation()).await.unwrap_err();
        // Handler error wins even though the after hook ran fine.
        assert!(matches!(err, InvokeError::Handler(_)));
        assert_eq!(after_runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn after_hook_failure_surfaces_when_handler_succeeds() {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                RegisteredCommand::new(hello_command(), |_| async { Ok(()) })
                    .after_invoke(|| async { Err::<(), HandlerError>("cleanup failed".into()) }),
            )
            .unwrap();

        let err = registry.dispatch(invocation()).await.unwrap_err();
        assert!(matches!(err, InvokeError::AfterHook(_)));
    }

    #[test]
    fn context_argument_lookup() {
        let interaction = Interaction::from_json(json!({
            "type": 2,
            "id": "1",
            "token": "tok",
            "data": {
                "id": "5",
                "name": "order",
                "options": [{"name": "icecream", "options": [{"name": "flavor", "value": "mint"}]}],
            },
        }))
        .unwrap();
        let ctx = CommandContext { interaction };
        assert_eq!(ctx.argument("flavor").unwrap().as_str(), Some("mint"));
    }
}
