//! Backend commands queued from a table page to the runtime.

use std::sync::Arc;

use client_core::{FetchTicket, PageController, Resource, ResourceGateway, SaveRequest};

use crate::controller::events::UiEvent;

pub enum BackendCommand<R: Resource> {
    Fetch(FetchTicket),
    Save(SaveRequest<R>),
    Delete(R::Id),
}

impl<R: Resource> BackendCommand<R> {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Fetch(_) => "fetch",
            BackendCommand::Save(_) => "save",
            BackendCommand::Delete(_) => "delete",
        }
    }

    /// Runs the command and wraps its result for the UI thread.
    pub async fn execute<G>(self, gateway: Arc<G>) -> UiEvent<R>
    where
        G: ResourceGateway<R> + ?Sized + 'static,
    {
        match self {
            BackendCommand::Fetch(ticket) => {
                UiEvent::Fetched(PageController::<R, G>::run_fetch(gateway, ticket).await)
            }
            BackendCommand::Save(request) => UiEvent::Saved(request.send(&*gateway).await),
            BackendCommand::Delete(id) => UiEvent::Deleted {
                id,
                result: <G as ResourceGateway<R>>::delete(&*gateway, id).await,
            },
        }
    }
}
