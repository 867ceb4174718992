//! Table pages: one generic CRUD page per resource, driven by a
//! `PageController` whose network work runs on the backend runtime.

use std::sync::Arc;

use client_core::{
    navigation::Route, ClientSettings, NotificationCenter, PageController, PageStatus,
    RestGateway,
};
use crossbeam_channel::{bounded, Receiver, Sender};
use egui::RichText;

use crate::{
    backend_bridge::{commands::BackendCommand, runtime::BackendRuntime},
    controller::{events::UiEvent, orchestration::dispatch_backend_command},
    ui::{views::TableView, widgets::ERROR_RED},
};

const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// A page mounted in the shell's central panel.
pub trait PageView {
    /// Applies backend results that arrived since the last frame.
    fn poll(&mut self, runtime: &BackendRuntime);
    /// Renders the page; returns a route when the user follows a link.
    fn show(&mut self, ui: &mut egui::Ui, runtime: &BackendRuntime) -> Option<Route>;
    fn notifications_mut(&mut self) -> &mut NotificationCenter;
    /// Called when the page is unmounted.
    fn close(&mut self);
}

pub struct TablePage<R: TableView> {
    controller: PageController<R, RestGateway>,
    prefill: R::Draft,
    ui_tx: Sender<UiEvent<R>>,
    ui_rx: Receiver<UiEvent<R>>,
    ctx: egui::Context,
    search: String,
    choice: &'static str,
    confirm_delete: Option<R::Id>,
}

impl<R: TableView> TablePage<R> {
    /// Builds the page and issues its first list request. `filters` and
    /// `prefill` carry route parameters into every query and new record.
    pub fn open(
        runtime: &BackendRuntime,
        gateway: Arc<RestGateway>,
        settings: &ClientSettings,
        filters: Vec<(&'static str, String)>,
        prefill: R::Draft,
        ctx: egui::Context,
    ) -> Self {
        let mut controller = PageController::from_settings(gateway, settings);
        for (key, value) in filters {
            controller = controller.with_filter(key, value);
        }
        let (ui_tx, ui_rx) = bounded::<UiEvent<R>>(64);
        let mut page = Self {
            controller,
            prefill,
            ui_tx,
            ui_rx,
            ctx,
            search: String::new(),
            choice: "",
            confirm_delete: None,
        };
        let ticket = page.controller.begin_fetch();
        page.dispatch(runtime, BackendCommand::Fetch(ticket));
        page
    }

    fn dispatch(&self, runtime: &BackendRuntime, command: BackendCommand<R>) {
        dispatch_backend_command(
            runtime,
            Arc::clone(self.controller.gateway()),
            command,
            self.ui_tx.clone(),
            self.ctx.clone(),
        );
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui, runtime: &BackendRuntime) {
        let busy = self.controller.is_busy();
        ui.horizontal(|ui| {
            let search = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Search")
                    .desired_width(220.0),
            );
            let submitted = search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if submitted || ui.button("Search").clicked() {
                let ticket = self.controller.set_search(&self.search);
                self.dispatch(runtime, BackendCommand::Fetch(ticket));
            }

            if let Some(filter) = R::choice_filter() {
                let selected = filter
                    .options
                    .iter()
                    .find(|(_, value)| *value == self.choice)
                    .map(|(label, _)| *label)
                    .unwrap_or("All");
                let mut choice = self.choice;
                egui::ComboBox::from_id_salt((R::PATH, filter.key))
                    .selected_text(format!("{}: {selected}", filter.label))
                    .show_ui(ui, |ui| {
                        for (label, value) in filter.options {
                            ui.selectable_value(&mut choice, *value, *label);
                        }
                    });
                if choice != self.choice {
                    self.choice = choice;
                    let value = (!choice.is_empty()).then(|| choice.to_string());
                    let ticket = self.controller.set_filter(filter.key, value);
                    self.dispatch(runtime, BackendCommand::Fetch(ticket));
                }
            }

            if ui.button("Refresh").clicked() {
                let ticket = self.controller.begin_fetch();
                self.dispatch(runtime, BackendCommand::Fetch(ticket));
            }
            if ui
                .add_enabled(!busy, egui::Button::new(format!("New {}", R::LABEL.to_lowercase())))
                .clicked()
            {
                self.controller.open_create_with(self.prefill.clone());
            }
            match self.controller.status() {
                PageStatus::Loading => {
                    ui.spinner();
                }
                PageStatus::Error(message) => {
                    ui.colored_label(ERROR_RED, message);
                }
                PageStatus::Idle => {}
            }
        });
    }

    fn show_table(&mut self, ui: &mut egui::Ui) -> Option<Route> {
        let busy = self.controller.is_busy();
        let mut edit = None;
        let mut follow = None;

        egui::ScrollArea::both()
            .max_height((ui.available_height() - 36.0).max(120.0))
            .show(ui, |ui| {
                egui::Grid::new((R::PATH, "table"))
                    .striped(true)
                    .num_columns(R::COLUMNS.len() + 1)
                    .show(ui, |ui| {
                        for column in R::COLUMNS {
                            ui.label(RichText::new(*column).strong());
                        }
                        ui.label("");
                        ui.end_row();

                        for record in self.controller.rows() {
                            for cell in R::cells(record) {
                                ui.label(cell);
                            }
                            let id = R::id_of(record);
                            ui.horizontal(|ui| {
                                if ui.add_enabled(!busy, egui::Button::new("Edit")).clicked() {
                                    edit = Some(id);
                                }
                                if ui.add_enabled(!busy, egui::Button::new("Delete")).clicked() {
                                    self.confirm_delete = Some(id);
                                }
                                for (label, route) in R::links(record) {
                                    if ui.link(label).clicked() {
                                        follow = Some(route);
                                    }
                                }
                                if let Some(route) = R::row_menu(ui, record) {
                                    follow = Some(route);
                                }
                            });
                            ui.end_row();
                        }
                    });
                if self.controller.rows().is_empty() && !self.controller.is_loading() {
                    ui.weak(format!("No {} records found.", R::LABEL.to_lowercase()));
                }
            });

        if let Some(id) = edit {
            self.controller.open_edit(id);
        }
        follow
    }

    fn show_pagination(&mut self, ui: &mut egui::Ui, runtime: &BackendRuntime) {
        let busy = self.controller.is_busy();
        let query = self.controller.query().clone();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    !busy && self.controller.has_previous_page(),
                    egui::Button::new("< Prev"),
                )
                .clicked()
            {
                let ticket = self.controller.set_page(query.page - 1);
                self.dispatch(runtime, BackendCommand::Fetch(ticket));
            }
            ui.label(format!(
                "Page {} of {} ({} total)",
                query.page,
                self.controller.page_count(),
                self.controller.total()
            ));
            if ui
                .add_enabled(
                    !busy && self.controller.has_next_page(),
                    egui::Button::new("Next >"),
                )
                .clicked()
            {
                let ticket = self.controller.set_page(query.page + 1);
                self.dispatch(runtime, BackendCommand::Fetch(ticket));
            }

            let mut page_size = query.page_size;
            egui::ComboBox::from_id_salt((R::PATH, "page_size"))
                .selected_text(format!("{page_size} per page"))
                .show_ui(ui, |ui| {
                    for size in PAGE_SIZES {
                        ui.selectable_value(&mut page_size, size, size.to_string());
                    }
                });
            if page_size != query.page_size {
                let ticket = self.controller.set_page_size(page_size);
                self.dispatch(runtime, BackendCommand::Fetch(ticket));
            }
        });
    }

    fn show_editor(&mut self, ctx: &egui::Context, runtime: &BackendRuntime) {
        let busy = self.controller.is_busy();
        let Some(editor) = self.controller.editor_mut() else {
            return;
        };
        let title = editor.title();
        let errors = editor.errors().clone();
        let mut open = true;
        let mut save = false;
        let mut cancel = false;

        egui::Window::new(title)
            .id(egui::Id::new((R::PATH, "editor")))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new((R::PATH, "form"))
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| R::form(ui, editor.draft_mut(), &errors));
                ui.separator();
                ui.horizontal(|ui| {
                    save = ui.add_enabled(!busy, egui::Button::new("Save")).clicked();
                    cancel = ui.button("Cancel").clicked();
                    if busy {
                        ui.spinner();
                    }
                });
            });

        if !open || cancel {
            self.controller.close_editor();
        } else if save {
            // Invalid drafts and busy pages are reported through notifications.
            if let Ok(request) = self.controller.prepare_save() {
                self.dispatch(runtime, BackendCommand::Save(request));
            }
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context, runtime: &BackendRuntime) {
        let Some(id) = self.confirm_delete else {
            return;
        };
        let mut decided = None;
        egui::Window::new(format!("Delete {} #{id}?", R::LABEL.to_lowercase()))
            .id(egui::Id::new((R::PATH, "confirm_delete")))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("This cannot be undone.");
                ui.horizontal(|ui| {
                    if ui.button(RichText::new("Delete").color(ERROR_RED)).clicked() {
                        decided = Some(true);
                    }
                    if ui.button("Keep").clicked() {
                        decided = Some(false);
                    }
                });
            });

        match decided {
            Some(true) => {
                self.confirm_delete = None;
                if self.controller.begin_delete(id).is_ok() {
                    self.dispatch(runtime, BackendCommand::Delete(id));
                }
            }
            Some(false) => self.confirm_delete = None,
            None => {}
        }
    }
}

impl<R: TableView> PageView for TablePage<R> {
    fn poll(&mut self, runtime: &BackendRuntime) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let follow_up = match event {
                UiEvent::Fetched(outcome) => {
                    self.controller.apply_fetch(outcome);
                    None
                }
                UiEvent::Saved(result) => self.controller.finish_save(result),
                UiEvent::Deleted { id, result } => self.controller.finish_delete(id, result),
            };
            if let Some(ticket) = follow_up {
                self.dispatch(runtime, BackendCommand::Fetch(ticket));
            }
        }
    }

    fn show(&mut self, ui: &mut egui::Ui, runtime: &BackendRuntime) -> Option<Route> {
        self.show_toolbar(ui, runtime);
        ui.separator();
        let follow = self.show_table(ui);
        ui.separator();
        self.show_pagination(ui, runtime);

        let ctx = ui.ctx().clone();
        self.show_editor(&ctx, runtime);
        self.show_delete_confirmation(&ctx, runtime);
        follow
    }

    fn notifications_mut(&mut self) -> &mut NotificationCenter {
        self.controller.notifications_mut()
    }

    fn close(&mut self) {
        self.controller.cancel_inflight();
    }
}
