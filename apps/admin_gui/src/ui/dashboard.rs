use std::sync::Arc;

use client_core::{navigation::Route, ClientSettings, NotificationCenter, RestGateway};
use crossbeam_channel::{bounded, Receiver, Sender};
use egui::RichText;
use shared::protocol::DashboardCounts;

use crate::{
    backend_bridge::runtime::BackendRuntime,
    controller::{
        events::{DashboardEvent, UiError},
        orchestration::dispatch_dashboard_load,
    },
    ui::{pages::PageView, widgets::ERROR_RED},
};

pub struct DashboardPage {
    gateway: Arc<RestGateway>,
    counts: Option<DashboardCounts>,
    error: Option<UiError>,
    loading: bool,
    notifications: NotificationCenter,
    ui_tx: Sender<DashboardEvent>,
    ui_rx: Receiver<DashboardEvent>,
    ctx: egui::Context,
}

impl DashboardPage {
    pub fn open(
        runtime: &BackendRuntime,
        gateway: Arc<RestGateway>,
        settings: &ClientSettings,
        ctx: egui::Context,
    ) -> Self {
        let (ui_tx, ui_rx) = bounded(4);
        let mut page = Self {
            gateway,
            counts: None,
            error: None,
            loading: false,
            notifications: NotificationCenter::new(settings.notification_ttl),
            ui_tx,
            ui_rx,
            ctx,
        };
        page.load(runtime);
        page
    }

    fn load(&mut self, runtime: &BackendRuntime) {
        if self.loading {
            return;
        }
        self.loading = true;
        dispatch_dashboard_load(
            runtime,
            Arc::clone(&self.gateway),
            self.ui_tx.clone(),
            self.ctx.clone(),
        );
    }
}

fn stat_card(ui: &mut egui::Ui, label: &str, value: Option<u64>) -> egui::Response {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_min_width(150.0);
            ui.vertical(|ui| {
                let value = value.map_or_else(|| "-".to_string(), |v| v.to_string());
                ui.label(RichText::new(value).size(28.0).strong());
                ui.label(label);
            });
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
}

impl PageView for DashboardPage {
    fn poll(&mut self, _runtime: &BackendRuntime) {
        while let Ok(DashboardEvent::Loaded(result)) = self.ui_rx.try_recv() {
            self.loading = false;
            match result {
                Ok(counts) => {
                    self.counts = Some(counts);
                    self.error = None;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "dashboard counts failed");
                    self.notifications.from_error(&err);
                    self.error = Some(UiError::from_gateway(&err));
                }
            }
        }
    }

    fn show(&mut self, ui: &mut egui::Ui, runtime: &BackendRuntime) -> Option<Route> {
        let mut follow = None;
        ui.horizontal(|ui| {
            ui.heading("Overview");
            if ui.add_enabled(!self.loading, egui::Button::new("Refresh")).clicked() {
                self.load(runtime);
            }
            if self.loading {
                ui.spinner();
            }
        });
        if let Some(err) = &self.error {
            ui.colored_label(ERROR_RED, format!("{}: {}", err.title(), err.message()));
            if let Some(hint) = err.hint() {
                ui.weak(hint);
            }
        }
        ui.add_space(8.0);

        let counts = self.counts;
        ui.horizontal_wrapped(|ui| {
            let cards = [
                ("Teachers", counts.map(|c| c.teachers), Route::Teachers),
                ("Students", counts.map(|c| c.students), Route::Students),
                ("Classrooms", counts.map(|c| c.classrooms), Route::Classrooms),
                ("Subjects", counts.map(|c| c.subjects), Route::Subjects),
            ];
            for (label, value, route) in cards {
                if stat_card(ui, label, value).clicked() {
                    follow = Some(route);
                }
            }
        });
        follow
    }

    fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    fn close(&mut self) {}
}
