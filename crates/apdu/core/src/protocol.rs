//! Named commands and responses for multi-step card protocols
//!
//! A card protocol is an ordered sequence of [`ProtocolCommand`]s. Every command
//! carries a key that is unique within its sequence, so that the responses can
//! be looked up by name once the sequence has run.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

use bytes::Bytes;
use derive_more::{Deref, IntoIterator};

use crate::command::Command;
use crate::response::Response;
use crate::response::status::StatusWord;
use crate::{Error, Result};

/// Maps status words to human readable failure messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTable(BTreeMap<StatusWord, Cow<'static, str>>);

impl ErrorTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a message for a status word
    pub fn with(
        mut self,
        status: impl Into<StatusWord>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.0.insert(status.into(), message.into());
        self
    }

    /// Message registered for a status word, if any
    pub fn get(&self, status: StatusWord) -> Option<&str> {
        self.0.get(&status).map(AsRef::as_ref)
    }

    /// Message for a status word, empty when none is registered
    pub fn resolve(&self, status: StatusWord) -> &str {
        self.get(status).unwrap_or_default()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single named step of a card protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolCommand {
    key: String,
    description: String,
    command: Command,
    errors: ErrorTable,
}

impl ProtocolCommand {
    /// Create a command with an empty error table
    pub fn new(key: impl Into<String>, description: impl Into<String>, command: Command) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            command,
            errors: ErrorTable::new(),
        }
    }

    /// Attach an error table
    pub fn with_errors(mut self, errors: ErrorTable) -> Self {
        self.errors = errors;
        self
    }

    /// Key addressing this command's response
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The APDU sent for this step
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Status word messages for this step
    pub const fn errors(&self) -> &ErrorTable {
        &self.errors
    }

    /// Failure message for the given status word, empty if unknown
    pub fn error_message(&self, status: StatusWord) -> &str {
        self.errors.resolve(status)
    }
}

/// Ordered sequence of protocol commands
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
#[deref(forward)]
#[into_iterator(owned, ref)]
pub struct ProtocolCommands(Vec<ProtocolCommand>);

impl ProtocolCommands {
    /// Create an empty sequence
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Sequence holding one command
    pub fn single(command: ProtocolCommand) -> Self {
        Self(vec![command])
    }

    /// Append a command
    pub fn push(&mut self, command: ProtocolCommand) {
        self.0.push(command);
    }

    /// Append every command of another sequence, keeping order
    pub fn extend(&mut self, commands: impl IntoIterator<Item = ProtocolCommand>) {
        self.0.extend(commands);
    }

    /// Keys in sequence order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(ProtocolCommand::key)
    }

    /// First key that occurs more than once, if any
    pub fn duplicate_key(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.keys().find(|key| !seen.insert(*key))
    }
}

impl FromIterator<ProtocolCommand> for ProtocolCommands {
    fn from_iter<I: IntoIterator<Item = ProtocolCommand>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Card response to a named command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolResponse {
    /// Key of the command this answers
    pub key: String,
    /// The response as received
    pub response: Response,
}

impl ProtocolResponse {
    /// Create a new named response
    pub fn new(key: impl Into<String>, response: Response) -> Self {
        Self {
            key: key.into(),
            response,
        }
    }

    /// Response payload without the status word
    pub const fn data(&self) -> &Bytes {
        self.response.payload()
    }

    /// Status word of the response
    pub const fn status(&self) -> StatusWord {
        self.response.status()
    }
}

/// Responses of an executed sequence, looked up by command key
#[derive(Debug, Clone, Default)]
pub struct ProtocolResponses(HashMap<String, Response>);

impl ProtocolResponses {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a response under its key
    pub fn insert(&mut self, response: ProtocolResponse) {
        self.0.insert(response.key, response.response);
    }

    /// Response for a key
    pub fn get(&self, key: &str) -> Option<&Response> {
        self.0.get(key)
    }

    /// Response payload for a key
    pub fn data(&self, key: &str) -> Option<&Bytes> {
        self.get(key).map(Response::payload)
    }

    /// Response for a key, failing when it is absent
    pub fn require(&self, key: &str) -> Result<&Response> {
        self.get(key)
            .ok_or_else(|| Error::MissingResponse(key.to_string()))
    }

    /// Whether a response is stored for the key
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys with a stored response, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of stored responses
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no responses are stored
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ProtocolResponse> for ProtocolResponses {
    fn from_iter<I: IntoIterator<Item = ProtocolResponse>>(iter: I) -> Self {
        let mut responses = Self::new();
        for response in iter {
            responses.insert(response);
        }
        responses
    }
}
