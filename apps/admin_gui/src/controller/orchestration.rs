//! Command orchestration from UI actions onto the backend runtime.

use std::sync::Arc;

use client_core::{dashboard::load_counts, Resource, ResourceGateway, RestGateway};
use crossbeam_channel::{Sender, TrySendError};

use crate::{
    backend_bridge::{commands::BackendCommand, runtime::BackendRuntime},
    controller::events::{DashboardEvent, UiEvent},
};

fn deliver<T>(ui_tx: &Sender<T>, event: T, source: &'static str, command: &'static str) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            tracing::warn!(source, command, "ui event queue is full; dropping result");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(source, command, "page closed before result arrived");
        }
    }
}

pub fn dispatch_backend_command<R, G>(
    runtime: &BackendRuntime,
    gateway: Arc<G>,
    command: BackendCommand<R>,
    ui_tx: Sender<UiEvent<R>>,
    ctx: egui::Context,
) where
    R: Resource,
    G: ResourceGateway<R> + ?Sized + 'static,
{
    let name = command.name();
    tracing::debug!(resource = R::LABEL, command = name, "queued ui->backend command");
    runtime.spawn(async move {
        let event = command.execute(gateway).await;
        deliver(&ui_tx, event, R::LABEL, name);
        ctx.request_repaint();
    });
}

pub fn dispatch_dashboard_load(
    runtime: &BackendRuntime,
    gateway: Arc<RestGateway>,
    ui_tx: Sender<DashboardEvent>,
    ctx: egui::Context,
) {
    runtime.spawn(async move {
        let result = load_counts(&*gateway).await;
        deliver(&ui_tx, DashboardEvent::Loaded(result), "dashboard", "load_counts");
        ctx.request_repaint();
    });
}
