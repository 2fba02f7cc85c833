//! In-flight catalog requests
//!
//! Each request is issued under a scope ("streams", "detail", ...) and the
//! selection that triggered it. Starting a new request in a scope
//! supersedes the previous one: its task is aborted and, should its
//! response still arrive, `complete` reports it as stale so the scene
//! ignores it.

use std::collections::HashMap;
use tokio::task::AbortHandle;
use tracing::debug;

use super::{ApiError, XtreamClient};
use crate::models::{AuthResult, CatalogKind, Category, DetailRecord, Profile, StreamSummary};

/// Identity of one issued request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub scope: String,
    pub selection: String,
    generation: u64,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    abort: Option<AbortHandle>,
}

/// Latest-request-wins bookkeeping per scope
#[derive(Debug, Default)]
pub struct RequestTracker {
    next_generation: u64,
    in_flight: HashMap<String, InFlight>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding whatever was in flight for `scope`
    pub fn begin(&mut self, scope: &str, selection: impl Into<String>) -> RequestTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        if let Some(previous) = self.in_flight.insert(
            scope.to_string(),
            InFlight {
                generation,
                abort: None,
            },
        ) {
            if let Some(handle) = previous.abort {
                handle.abort();
            }
            debug!(scope, "superseded in-flight request");
        }
        RequestTicket {
            scope: scope.to_string(),
            selection: selection.into(),
            generation,
        }
    }

    /// Remember the task serving `ticket` so it can be aborted
    pub fn attach(&mut self, ticket: &RequestTicket, handle: AbortHandle) {
        match self.in_flight.get_mut(&ticket.scope) {
            Some(entry) if entry.generation == ticket.generation => entry.abort = Some(handle),
            // Already superseded
            _ => handle.abort(),
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.in_flight
            .get(&ticket.scope)
            .is_some_and(|entry| entry.generation == ticket.generation)
    }

    /// Accept a response; false means it is stale and must be dropped
    pub fn complete(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(scope = %ticket.scope, selection = %ticket.selection, "dropping stale response");
            return false;
        }
        self.in_flight.remove(&ticket.scope);
        true
    }

    pub fn is_loading(&self, scope: &str) -> bool {
        self.in_flight.contains_key(scope)
    }

    /// Abort everything (scene teardown)
    pub fn cancel_all(&mut self) {
        for (_, entry) in self.in_flight.drain() {
            if let Some(handle) = entry.abort {
                handle.abort();
            }
        }
    }
}

// =============================================================================
// Request / response messages
// =============================================================================

/// A catalog call a scene wants made
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRequest {
    Login(Profile),
    Categories(CatalogKind),
    Streams {
        kind: CatalogKind,
        category: Option<String>,
    },
    Detail {
        kind: CatalogKind,
        id: String,
    },
    Search {
        kind: CatalogKind,
        query: String,
    },
}

/// Result of a `CatalogRequest`
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPayload {
    Auth(Result<AuthResult, ApiError>),
    Categories(Result<Vec<Category>, ApiError>),
    Streams(Result<Vec<StreamSummary>, ApiError>),
    Detail(Result<DetailRecord, ApiError>),
}

/// A payload tagged with the ticket it answers
#[derive(Debug, Clone)]
pub struct CatalogResponse {
    pub ticket: RequestTicket,
    pub payload: CatalogPayload,
}

impl CatalogRequest {
    /// Run the request against `client`
    pub async fn execute(self, client: &XtreamClient) -> CatalogPayload {
        match self {
            CatalogRequest::Login(_) => CatalogPayload::Auth(client.login().await),
            CatalogRequest::Categories(kind) => {
                CatalogPayload::Categories(client.list_categories(kind).await)
            }
            CatalogRequest::Streams { kind, category } => {
                CatalogPayload::Streams(client.list_streams(kind, category.as_deref()).await)
            }
            CatalogRequest::Detail { kind, id } => {
                CatalogPayload::Detail(client.get_detail(kind, &id).await)
            }
            CatalogRequest::Search { kind, query } => {
                CatalogPayload::Streams(client.search(kind, &query).await)
            }
        }
    }
}
