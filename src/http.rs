//! REST transport for the interaction endpoints.
//!
//! [`HttpClient`] owns the bot token and a connection pool, and exposes
//! typed convenience calls for command registration and interaction
//! responses on top of a single `request` entry point. Errors carry the
//! route and response body so a failed call is diagnosable from the log
//! line alone.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::route::{MessageTarget, Route, RouteError};
use crate::types::{ApplicationCommand, InteractionResponse, JsonModel, Snowflake};

const USER_AGENT: &str = concat!(
    "DiscordBot (discord-interactions, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP methods the interaction endpoints use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Error raised by the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Discord answered with a non-success status.
    #[error("api error {status} on {route}: {body}")]
    Api {
        status: u16,
        route: String,
        body: String,
    },

    /// The request never completed (DNS, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body did not parse as the expected model.
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    /// A route was assembled in an order the API does not define.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// A model error while encoding a request body.
    #[error(transparent)]
    Model(#[from] crate::types::ModelError),
}

/// A client for the interaction REST endpoints.
pub struct HttpClient {
    token: String,
    http: reqwest::Client,
}

// The token never appears in logs.
impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl HttpClient {
    /// Create a client holding `token` for bot authorization.
    pub fn new(token: impl Into<String>) -> Result<Self, HttpError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            token: token.into(),
            http,
        })
    }

    /// Send `method` to `route`, returning the raw response body.
    ///
    /// Success is any 2xx status; anything else becomes [`HttpError::Api`]
    /// with the body attached.
    pub async fn request(
        &self,
        method: Method,
        route: &Route,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, HttpError> {
        let url = route.url();
        debug!(?method, path = route.path(), "sending request");

        let mut request = self
            .http
            .request(method.into(), &url)
            .header("Authorization", format!("Bot {}", self.token));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(HttpError::Api {
                status: status.as_u16(),
                route: route.path().to_owned(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }

    /// Send a request and parse the response body as `T`.
    pub async fn request_json<T: JsonModel>(
        &self,
        method: Method,
        route: &Route,
        body: Option<serde_json::Value>,
    ) -> Result<T, HttpError> {
        let bytes = self.request(method, route, body).await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(T::from_json(value)?)
    }

    // -----------------------------------------------------------------------
    // Command registration
    // -----------------------------------------------------------------------

    fn commands_route(
        application_id: Snowflake,
        guild_id: Option<Snowflake>,
        command_id: Option<Snowflake>,
    ) -> Result<Route, RouteError> {
        let route = Route::new().application(application_id)?;
        let route = match guild_id {
            Some(guild_id) => route.guilds(guild_id)?,
            None => route,
        };
        route.commands(command_id)
    }

    /// Register a command, global or guild-scoped, returning the command as
    /// Discord stored it (with its assigned ID).
    pub async fn create_command(
        &self,
        application_id: Snowflake,
        guild_id: Option<Snowflake>,
        command: &ApplicationCommand,
    ) -> Result<ApplicationCommand, HttpError> {
        let route = Self::commands_route(application_id, guild_id, None)?;
        self.request_json(Method::Post, &route, Some(command.to_json()?))
            .await
    }

    /// Fetch every registered command in the given scope.
    pub async fn get_commands(
        &self,
        application_id: Snowflake,
        guild_id: Option<Snowflake>,
    ) -> Result<Vec<ApplicationCommand>, HttpError> {
        let route = Self::commands_route(application_id, guild_id, None)?;
        let bytes = self.request(Method::Get, &route, None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch a single registered command.
    pub async fn get_command(
        &self,
        application_id: Snowflake,
        guild_id: Option<Snowflake>,
        command_id: Snowflake,
    ) -> Result<ApplicationCommand, HttpError> {
        let route = Self::commands_route(application_id, guild_id, Some(command_id))?;
        self.request_json(Method::Get, &route, None).await
    }

    /// Replace a registered command's definition.
    pub async fn edit_command(
        &self,
        application_id: Snowflake,
        guild_id: Option<Snowflake>,
        command_id: Snowflake,
        command: &ApplicationCommand,
    ) -> Result<ApplicationCommand, HttpError> {
        let route = Self::commands_route(application_id, guild_id, Some(command_id))?;
        self.request_json(Method::Patch, &route, Some(command.to_json()?))
            .await
    }

    /// Remove a registered command.
    pub async fn delete_command(
        &self,
        application_id: Snowflake,
        guild_id: Option<Snowflake>,
        command_id: Snowflake,
    ) -> Result<(), HttpError> {
        let route = Self::commands_route(application_id, guild_id, Some(command_id))?;
        self.request(Method::Delete, &route, None).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Interaction responses
    // -----------------------------------------------------------------------

    /// Answer an interaction within its three second window.
    pub async fn create_interaction_response(
        &self,
        interaction_id: Snowflake,
        interaction_token: &str,
        response: &InteractionResponse,
    ) -> Result<(), HttpError> {
        let route = Route::new().interaction_callback(interaction_id, interaction_token)?;
        self.request(Method::Post, &route, Some(response.to_json()?))
            .await?;
        Ok(())
    }

    /// Fetch the original response to an interaction. The returned message
    /// shape belongs to the host application, so it stays a raw value.
    pub async fn get_original_response(
        &self,
        application_id: Snowflake,
        interaction_token: &str,
    ) -> Result<serde_json::Value, HttpError> {
        let route = Route::new()
            .webhooks(application_id, interaction_token)?
            .messages(MessageTarget::Original)?;
        let bytes = self.request(Method::Get, &route, None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Edit the original response to an interaction.
    pub async fn edit_original_response(
        &self,
        application_id: Snowflake,
        interaction_token: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        let route = Route::new()
            .webhooks(application_id, interaction_token)?
            .messages(MessageTarget::Original)?;
        let bytes = self.request(Method::Patch, &route, Some(body)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Delete the original response to an interaction.
    pub async fn delete_original_response(
        &self,
        application_id: Snowflake,
        interaction_token: &str,
    ) -> Result<(), HttpError> {
        let route = Route::new()
            .webhooks(application_id, interaction_token)?
            .messages(MessageTarget::Original)?;
        self.request(Method::Delete, &route, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let client = HttpClient::new("super-secret-token").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn command_routes_cover_both_scopes() {
        let global =
            HttpClient::commands_route(Snowflake::new(1), None, None).unwrap();
        assert_eq!(global.path(), "applications/1/commands");

        let guild = HttpClient::commands_route(
            Snowflake::new(1),
            Some(Snowflake::new(2)),
            Some(Snowflake::new(3)),
        )
        .unwrap();
        assert_eq!(guild.path(), "applications/1/guilds/2/commands/3");
    }
}
