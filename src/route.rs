//! Typed construction of interaction API routes.
//!
//! Discord's interaction endpoints are a small grammar, not a flat list:
//! `applications/{id}` may be followed by `guilds/{id}` or `commands`,
//! `webhooks/{id}/{token}` by `messages/...`, and so on. [`Route`] encodes
//! that grammar with consuming methods that fail when a segment is appended
//! somewhere it cannot go, so a malformed URL never reaches the transport.

use std::fmt;

use crate::http::{HttpClient, HttpError, Method};
use crate::types::Snowflake;

/// Base URL of the API version the interaction endpoints live under.
pub const API_BASE: &str = "https://discord.com/api/v9";

/// The grammar position a route currently sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Root,
    Application,
    Guilds,
    Commands,
    Interaction,
    Webhook,
    Message,
}

impl Segment {
    fn name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Application => "applications",
            Self::Guilds => "guilds",
            Self::Commands => "commands",
            Self::Interaction => "interactions",
            Self::Webhook => "webhooks",
            Self::Message => "messages",
        }
    }
}

/// Error raised when route segments are chained in an order the API does not
/// define.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("`{segment}/` endpoint cannot follow `{preceding}`")]
    InvalidPosition {
        segment: &'static str,
        preceding: &'static str,
    },
}

/// Which message a webhook route addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    /// The original interaction response.
    Original,
    /// A follow-up message by ID.
    Id(Snowflake),
}

impl fmt::Display for MessageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("@original"),
            Self::Id(id) => id.fmt(f),
        }
    }
}

/// An interaction API route under construction.
///
/// ```
/// use discord_interactions::route::Route;
/// use discord_interactions::types::Snowflake;
///
/// let route = Route::new()
///     .application(Snowflake::new(1))?
///     .guilds(Snowflake::new(2))?
///     .commands(Some(Snowflake::new(3)))?;
/// assert_eq!(route.path(), "applications/1/guilds/2/commands/3");
/// # Ok::<(), discord_interactions::route::RouteError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    path: String,
    last: Segment,
}

impl Route {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: String::new(),
            last: Segment::Root,
        }
    }

    fn guard(&self, segment: Segment, allowed: &[Segment]) -> Result<(), RouteError> {
        if allowed.contains(&self.last) {
            Ok(())
        } else {
            Err(RouteError::InvalidPosition {
                segment: segment.name(),
                preceding: self.last.name(),
            })
        }
    }

    fn append(mut self, piece: &str, last: Segment) -> Self {
        if !self.path.is_empty() {
            self.path.push('/');
        }
        self.path.push_str(piece);
        self.last = last;
        self
    }

    /// `applications/{application_id}`. Must come first.
    pub fn application(self, application_id: Snowflake) -> Result<Self, RouteError> {
        self.guard(Segment::Application, &[Segment::Root])?;
        Ok(self.append(&format!("applications/{application_id}"), Segment::Application))
    }

    /// `guilds/{guild_id}`, scoping subsequent commands to a guild.
    pub fn guilds(self, guild_id: Snowflake) -> Result<Self, RouteError> {
        self.guard(Segment::Guilds, &[Segment::Application])?;
        Ok(self.append(&format!("guilds/{guild_id}"), Segment::Guilds))
    }

    /// `commands` or `commands/{command_id}`, after an application or guild.
    pub fn commands(self, command_id: Option<Snowflake>) -> Result<Self, RouteError> {
        self.guard(Segment::Commands, &[Segment::Application, Segment::Guilds])?;
        let piece = match command_id {
            Some(id) => format!("commands/{id}"),
            None => "commands".to_owned(),
        };
        Ok(self.append(&piece, Segment::Commands))
    }

    /// `interactions/{id}/{token}/callback`, the response endpoint.
    pub fn interaction_callback(
        self,
        interaction_id: Snowflake,
        token: &str,
    ) -> Result<Self, RouteError> {
        self.guard(Segment::Interaction, &[Segment::Root])?;
        Ok(self.append(
            &format!("interactions/{interaction_id}/{token}/callback"),
            Segment::Interaction,
        ))
    }

    /// `webhooks/{application_id}/{token}`, the follow-up endpoint.
    pub fn webhooks(self, application_id: Snowflake, token: &str) -> Result<Self, RouteError> {
        self.guard(Segment::Webhook, &[Segment::Root])?;
        Ok(self.append(&format!("webhooks/{application_id}/{token}"), Segment::Webhook))
    }

    /// `messages/@original` or `messages/{id}`, after a webhook.
    pub fn messages(self, target: MessageTarget) -> Result<Self, RouteError> {
        self.guard(Segment::Message, &[Segment::Webhook])?;
        Ok(self.append(&format!("messages/{target}"), Segment::Message))
    }

    /// The path relative to [`API_BASE`], without a leading slash.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The absolute URL.
    pub fn url(&self) -> String {
        format!("{API_BASE}/{}", self.path)
    }

    // -----------------------------------------------------------------------
    // Transport shorthands
    // -----------------------------------------------------------------------

    /// Send `method` to this route with an optional JSON body.
    pub async fn request(
        &self,
        http: &HttpClient,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, HttpError> {
        http.request(method, self, body).await
    }

    pub async fn get(&self, http: &HttpClient) -> Result<Vec<u8>, HttpError> {
        self.request(http, Method::Get, None).await
    }

    pub async fn post(
        &self,
        http: &HttpClient,
        body: serde_json::Value,
    ) -> Result<Vec<u8>, HttpError> {
        self.request(http, Method::Post, Some(body)).await
    }

    pub async fn patch(
        &self,
        http: &HttpClient,
        body: serde_json::Value,
    ) -> Result<Vec<u8>, HttpError> {
        self.request(http, Method::Patch, Some(body)).await
    }

    pub async fn delete(&self, http: &HttpClient) -> Result<Vec<u8>, HttpError> {
        self.request(http, Method::Delete, None).await
    }
}
