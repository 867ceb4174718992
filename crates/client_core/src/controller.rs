//! Page controller: per-route view state for one CRUD table.
//!
//! Every list request gets a generation number and a cancellation token.
//! Starting a new request cancels the previous token, and `apply_fetch` only
//! accepts the outcome of the newest generation, so a slow response can never
//! overwrite rows from a request issued after it.

use std::sync::Arc;

use shared::protocol::{page_count, ListQuery, Page, MAX_PAGE_SIZE};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::ClientSettings,
    error::{GatewayError, ValidationErrors},
    forms::{EditorMode, FormEditor, SaveRequest},
    gateway::ResourceGateway,
    notifications::{Level, NotificationCenter},
    resources::Resource,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Idle,
    Loading,
    Error(String),
}

/// Identifies one list request issued by a controller.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    query: ListQuery,
    token: CancellationToken,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub struct FetchOutcome<R: Resource> {
    pub generation: u64,
    pub result: Result<Page<R::Record>, GatewayError>,
}

/// Why a save or delete was not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked {
    NoEditor,
    Busy,
    Invalid(ValidationErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Busy,
    Invalid,
    Failed,
}

pub struct PageController<R: Resource, G: ResourceGateway<R> + ?Sized> {
    gateway: Arc<G>,
    query: ListQuery,
    rows: Vec<R::Record>,
    total: u64,
    status: PageStatus,
    generation: u64,
    inflight: Option<CancellationToken>,
    mutating: bool,
    editor: Option<FormEditor<R>>,
    notifications: NotificationCenter,
}

impl<R, G> PageController<R, G>
where
    R: Resource,
    G: ResourceGateway<R> + ?Sized,
{
    pub fn new(gateway: Arc<G>, page_size: u32) -> Self {
        Self {
            gateway,
            query: ListQuery::with_page_size(page_size),
            rows: Vec::new(),
            total: 0,
            status: PageStatus::Idle,
            generation: 0,
            inflight: None,
            mutating: false,
            editor: None,
            notifications: NotificationCenter::default(),
        }
    }

    pub fn from_settings(gateway: Arc<G>, settings: &ClientSettings) -> Self {
        let mut controller = Self::new(gateway, settings.page_size);
        controller.notifications = NotificationCenter::new(settings.notification_ttl);
        controller
    }

    /// Scopes every request, e.g. with a classroom id taken from the route.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.filters.insert(key.into(), value.to_string());
        self
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn rows(&self) -> &[R::Record] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == PageStatus::Loading
    }

    /// Loading and in-flight mutations gate edit/delete actions.
    pub fn is_busy(&self) -> bool {
        self.is_loading() || self.mutating
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.query.page_size)
    }

    pub fn has_previous_page(&self) -> bool {
        self.query.page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.query.page < self.page_count()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn set_search(&mut self, text: &str) -> FetchTicket {
        let text = text.trim();
        self.query.search = (!text.is_empty()).then(|| text.to_string());
        self.query.page = 1;
        self.begin_fetch()
    }

    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        self.query.page = page.max(1);
        self.begin_fetch()
    }

    pub fn set_page_size(&mut self, page_size: u32) -> FetchTicket {
        self.query.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.query.page = 1;
        self.begin_fetch()
    }

    pub fn set_filter(&mut self, key: &str, value: Option<String>) -> FetchTicket {
        match value {
            Some(value) => {
                self.query.filters.insert(key.to_string(), value);
            }
            None => {
                self.query.filters.remove(key);
            }
        }
        self.query.page = 1;
        self.begin_fetch()
    }

    /// Supersedes any in-flight list request and issues a ticket for a new one.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        if let Some(previous) = self.inflight.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.inflight = Some(token.clone());
        self.status = PageStatus::Loading;
        debug!(
            resource = R::LABEL,
            generation = self.generation,
            page = self.query.page,
            "list request issued"
        );
        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            token,
        }
    }

    /// Runs a ticket against the gateway. Holds no borrow of the controller so
    /// it can be spawned onto a runtime.
    pub async fn run_fetch(gateway: Arc<G>, ticket: FetchTicket) -> FetchOutcome<R> {
        let FetchTicket {
            generation,
            query,
            token,
        } = ticket;
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(GatewayError::Cancelled),
            result = <G as ResourceGateway<R>>::list(&*gateway, &query) => result,
        };
        FetchOutcome { generation, result }
    }

    /// Applies a list outcome if it belongs to the newest request. Returns
    /// whether the page state changed.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome<R>) -> bool {
        if outcome.generation != self.generation {
            debug!(
                resource = R::LABEL,
                stale = outcome.generation,
                current = self.generation,
                "discarding superseded list response"
            );
            return false;
        }
        self.inflight = None;

        match outcome.result {
            Ok(page) => {
                let mut items = page.items;
                let cap = self.query.page_size as usize;
                if items.len() > cap {
                    warn!(
                        resource = R::LABEL,
                        received = items.len(),
                        page_size = cap,
                        "truncating oversized page"
                    );
                    items.truncate(cap);
                }
                self.rows = items;
                self.total = page.total;
                self.status = PageStatus::Idle;
                true
            }
            Err(GatewayError::Cancelled) => {
                self.status = PageStatus::Idle;
                false
            }
            Err(err) => {
                warn!(resource = R::LABEL, error = %err, "list request failed");
                self.notifications.from_error(&err);
                self.status = PageStatus::Error(err.user_message());
                true
            }
        }
    }

    /// Cancels the in-flight list request, e.g. when the page is left.
    pub fn cancel_inflight(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
        if self.is_loading() {
            self.status = PageStatus::Idle;
        }
    }

    pub async fn refresh(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let outcome = Self::run_fetch(Arc::clone(&self.gateway), ticket).await;
        self.apply_fetch(outcome)
    }

    pub fn editor(&self) -> Option<&FormEditor<R>> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut FormEditor<R>> {
        self.editor.as_mut()
    }

    pub fn open_create(&mut self) {
        self.editor = Some(FormEditor::create());
    }

    pub fn open_create_with(&mut self, draft: R::Draft) {
        self.editor = Some(FormEditor::create_with(draft));
    }

    /// Opens the editor on a displayed row. Returns false if the row is gone.
    pub fn open_edit(&mut self, id: R::Id) -> bool {
        match self.rows.iter().find(|row| R::id_of(row) == id) {
            Some(record) => {
                self.editor = Some(FormEditor::edit(record));
                true
            }
            None => {
                self.notifications
                    .error(format!("{} #{id} is no longer on this page.", R::LABEL));
                false
            }
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub fn prepare_save(&mut self) -> Result<SaveRequest<R>, Blocked> {
        if self.is_busy() {
            self.notifications
                .info("Please wait for the current request to finish.");
            return Err(Blocked::Busy);
        }
        let editor = self.editor.as_mut().ok_or(Blocked::NoEditor)?;
        match editor.prepare() {
            Ok(request) => {
                self.mutating = true;
                Ok(request)
            }
            Err(errors) => {
                self.notifications
                    .push(Level::Warning, format!("Please fix the form: {errors}."));
                Err(Blocked::Invalid(errors))
            }
        }
    }

    /// Completes a save. On success the editor closes and the current page is
    /// re-requested; on failure the editor stays open with its staged edits.
    pub fn finish_save(
        &mut self,
        result: Result<R::Record, GatewayError>,
    ) -> Option<FetchTicket> {
        self.mutating = false;
        match result {
            Ok(record) => {
                let id = R::id_of(&record);
                info!(resource = R::LABEL, %id, "record saved");
                self.editor = None;
                self.notifications.success(format!("{} saved.", R::LABEL));
                Some(self.begin_fetch())
            }
            Err(err) => {
                warn!(resource = R::LABEL, error = %err, "save failed");
                self.notifications.from_error(&err);
                None
            }
        }
    }

    pub async fn save(&mut self) -> ActionOutcome {
        let request = match self.prepare_save() {
            Ok(request) => request,
            Err(Blocked::Busy) => return ActionOutcome::Busy,
            Err(Blocked::NoEditor | Blocked::Invalid(_)) => return ActionOutcome::Invalid,
        };
        let result = request.send(&*self.gateway).await;
        let saved = result.is_ok();
        if let Some(ticket) = self.finish_save(result) {
            let outcome = Self::run_fetch(Arc::clone(&self.gateway), ticket).await;
            self.apply_fetch(outcome);
        }
        if saved {
            ActionOutcome::Completed
        } else {
            ActionOutcome::Failed
        }
    }

    pub fn begin_delete(&mut self, id: R::Id) -> Result<(), Blocked> {
        if self.is_busy() {
            self.notifications
                .info("Please wait for the current request to finish.");
            return Err(Blocked::Busy);
        }
        debug!(resource = R::LABEL, %id, "delete requested");
        self.mutating = true;
        Ok(())
    }

    /// Completes a delete. The row is dropped locally, the page steps back if
    /// it became empty, and the current page is re-requested.
    pub fn finish_delete(
        &mut self,
        id: R::Id,
        result: Result<(), GatewayError>,
    ) -> Option<FetchTicket> {
        self.mutating = false;
        match result {
            Ok(()) => {
                info!(resource = R::LABEL, %id, "record deleted");
                self.rows.retain(|row| R::id_of(row) != id);
                self.total = self.total.saturating_sub(1);
                if self.rows.is_empty() && self.query.page > 1 {
                    self.query.page -= 1;
                }
                let editing_deleted = self
                    .editor
                    .as_ref()
                    .is_some_and(|editor| editor.mode() == EditorMode::Edit(id));
                if editing_deleted {
                    self.editor = None;
                }
                self.notifications.success(format!("{} deleted.", R::LABEL));
                Some(self.begin_fetch())
            }
            Err(err) => {
                warn!(resource = R::LABEL, %id, error = %err, "delete failed");
                self.notifications.from_error(&err);
                None
            }
        }
    }

    pub async fn delete(&mut self, id: R::Id) -> ActionOutcome {
        if self.begin_delete(id).is_err() {
            return ActionOutcome::Busy;
        }
        let result = <G as ResourceGateway<R>>::delete(&*self.gateway, id).await;
        let deleted = result.is_ok();
        if let Some(ticket) = self.finish_delete(id, result) {
            let outcome = Self::run_fetch(Arc::clone(&self.gateway), ticket).await;
            self.apply_fetch(outcome);
        }
        if deleted {
            ActionOutcome::Completed
        } else {
            ActionOutcome::Failed
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
