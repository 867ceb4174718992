//! Application shell: routing, sidebar chrome, bare pages, and toasts.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use client_core::{
    navigation::{sidebar, Layout, Route},
    resources::{
        AcademicYears, AttendanceReports, Classrooms, HealthReports, IndicatorReports, Indicators,
        LifeSkillReports, Roles, Students, Subjects, TeacherRoles, Teachers,
    },
    ClientSettings, Level, Navigator, Notification, NotificationCenter, RestGateway,
};
use egui::{Color32, RichText};
use shared::protocol::{
    AcademicYearDraft, AttendanceReportDraft, ClassroomDraft, HealthReportDraft, IndicatorDraft,
    IndicatorReportDraft, LifeSkillReportDraft, RoleAssignmentDraft, RoleDraft, StudentDraft,
    SubjectDraft, TeacherDraft,
};

use crate::{
    backend_bridge::runtime::BackendRuntime,
    controller::events::UiError,
    ui::{
        dashboard::DashboardPage,
        pages::{PageView, TablePage},
        views::TableView,
    },
};

/// Everything a page needs once configuration has been accepted.
pub struct Session {
    runtime: BackendRuntime,
    gateway: Arc<RestGateway>,
    settings: ClientSettings,
}

impl Session {
    pub fn start(settings: ClientSettings) -> Result<Self, UiError> {
        let runtime = BackendRuntime::start().map_err(|err| {
            tracing::error!("failed to build backend runtime: {err}");
            UiError::startup(format!("Could not start the network worker: {err}"))
        })?;
        let gateway = RestGateway::new(&settings).map_err(|err| {
            tracing::error!(error = %err, "failed to build HTTP client");
            UiError::startup(err.user_message())
        })?;
        tracing::info!(base_url = %settings.api_base_url, "session ready");
        Ok(Self {
            runtime,
            gateway: Arc::new(gateway),
            settings,
        })
    }

    fn table<R: TableView>(
        &self,
        ctx: &egui::Context,
        filters: Vec<(&'static str, String)>,
        prefill: R::Draft,
    ) -> Box<dyn PageView> {
        Box::new(TablePage::<R>::open(
            &self.runtime,
            Arc::clone(&self.gateway),
            &self.settings,
            filters,
            prefill,
            ctx.clone(),
        ))
    }

    /// Mounts the page for a shell route. Bare routes have no page state.
    fn mount(&self, route: &Route, ctx: &egui::Context) -> Option<Box<dyn PageView>> {
        let page: Box<dyn PageView> = match route {
            Route::Splash | Route::Login | Route::Register | Route::NotFound { .. } => return None,
            Route::Dashboard => Box::new(DashboardPage::open(
                &self.runtime,
                Arc::clone(&self.gateway),
                &self.settings,
                ctx.clone(),
            )),
            Route::Teachers => self.table::<Teachers>(ctx, Vec::new(), TeacherDraft::default()),
            Route::Roles => self.table::<Roles>(ctx, Vec::new(), RoleDraft::default()),
            Route::TeacherRoles => {
                self.table::<TeacherRoles>(ctx, Vec::new(), RoleAssignmentDraft::default())
            }
            Route::Classrooms => {
                self.table::<Classrooms>(ctx, Vec::new(), ClassroomDraft::default())
            }
            Route::Subjects => self.table::<Subjects>(ctx, Vec::new(), SubjectDraft::default()),
            Route::Students => self.table::<Students>(ctx, Vec::new(), StudentDraft::default()),
            Route::AcademicYears => {
                self.table::<AcademicYears>(ctx, Vec::new(), AcademicYearDraft::default())
            }
            Route::Indicators { subject_id } => self.table::<Indicators>(
                ctx,
                subject_id
                    .map(|id| vec![("subject_id", id.to_string())])
                    .unwrap_or_default(),
                IndicatorDraft {
                    subject_id: *subject_id,
                    ..IndicatorDraft::default()
                },
            ),
            Route::AttendanceReport { classroom_id } => self.table::<AttendanceReports>(
                ctx,
                vec![("classroom_id", classroom_id.to_string())],
                AttendanceReportDraft {
                    classroom_id: Some(*classroom_id),
                    ..AttendanceReportDraft::default()
                },
            ),
            Route::IndicatorReport {
                subject_id,
                classroom_id,
            } => self.table::<IndicatorReports>(
                ctx,
                vec![
                    ("subject_id", subject_id.to_string()),
                    ("classroom_id", classroom_id.to_string()),
                ],
                IndicatorReportDraft {
                    subject_id: Some(*subject_id),
                    classroom_id: Some(*classroom_id),
                    ..IndicatorReportDraft::default()
                },
            ),
            Route::LifeSkillReport { classroom_id } => self.table::<LifeSkillReports>(
                ctx,
                vec![("classroom_id", classroom_id.to_string())],
                LifeSkillReportDraft {
                    classroom_id: Some(*classroom_id),
                    ..LifeSkillReportDraft::default()
                },
            ),
            Route::HealthReport { classroom_id } => self.table::<HealthReports>(
                ctx,
                vec![("classroom_id", classroom_id.to_string())],
                HealthReportDraft {
                    classroom_id: Some(*classroom_id),
                    ..HealthReportDraft::default()
                },
            ),
        };
        Some(page)
    }
}

pub struct AdminApp {
    session: Result<Session, UiError>,
    navigator: Navigator,
    page: Option<Box<dyn PageView>>,
    address: String,
    notifications: NotificationCenter,
    ctx: egui::Context,
}

impl AdminApp {
    pub fn new(
        ctx: egui::Context,
        settings: Result<ClientSettings, UiError>,
        initial_path: &str,
    ) -> Self {
        let session = settings.and_then(Session::start);
        let notifications = session
            .as_ref()
            .map(|session| NotificationCenter::new(session.settings.notification_ttl))
            .unwrap_or_default();
        let mut app = Self {
            session,
            navigator: Navigator::default(),
            page: None,
            address: String::new(),
            notifications,
            ctx,
        };
        app.navigate(Route::parse(initial_path));
        app
    }

    fn navigate(&mut self, route: Route) {
        let mounted = self.page.is_some() || route.layout() == Layout::Bare;
        if &route == self.navigator.current() && mounted {
            return;
        }
        self.navigator.go(route);
        self.remount();
    }

    /// Follows a typed address. Entering the current address reloads it.
    fn open_address(&mut self) {
        self.navigator.navigate(self.address.trim());
        self.remount();
    }

    fn back(&mut self) {
        self.navigator.back();
        self.remount();
    }

    fn remount(&mut self) {
        if let Some(mut page) = self.page.take() {
            page.close();
        }
        let route = self.navigator.current().clone();
        tracing::debug!(route = %route, "navigating");
        self.address = route.path();
        if let Ok(session) = &self.session {
            self.page = session.mount(&route, &self.ctx);
        }
    }

    fn show_startup_failure(&self, ctx: &egui::Context, err: &UiError) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading(err.title());
                ui.add_space(12.0);
                ui.colored_label(Color32::from_rgb(220, 90, 90), err.message());
                if let Some(hint) = err.hint() {
                    ui.add_space(8.0);
                    ui.label(hint);
                }
            });
        });
    }

    fn show_bare(&mut self, ctx: &egui::Context, route: &Route) {
        let mut target = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                match route {
                    Route::Splash => {
                        ui.heading(RichText::new("e-Report").size(32.0).strong());
                        ui.label("School report administration");
                        ui.add_space(16.0);
                        if ui.button("Open dashboard").clicked() {
                            target = Some(Route::Dashboard);
                        }
                        if ui.link("Sign in").clicked() {
                            target = Some(Route::Login);
                        }
                    }
                    Route::Login | Route::Register => {
                        ui.heading(route.title());
                        ui.label("Accounts are managed by the e-Report server.");
                        ui.add_space(16.0);
                        if ui.button("Continue to dashboard").clicked() {
                            target = Some(Route::Dashboard);
                        }
                    }
                    _ => {
                        if let Some(view) = route.not_found_view() {
                            ui.heading(RichText::new("404").size(40.0).strong());
                            ui.heading(route.title());
                            ui.label(&view.message);
                            ui.add_space(16.0);
                            if ui.button(view.back_label).clicked() {
                                target = Some(view.back_to);
                            }
                        }
                    }
                }
            });
        });
        if let Some(route) = target {
            self.navigate(route);
        }
    }

    fn show_shell(&mut self, ctx: &egui::Context, route: &Route) {
        let mut target = None;
        let mut go_back = false;
        let mut submitted = false;

        egui::TopBottomPanel::top("address_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.navigator.can_go_back(), egui::Button::new("<"))
                    .on_hover_text("Back")
                    .clicked()
                {
                    go_back = true;
                }
                let address = ui.add(
                    egui::TextEdit::singleline(&mut self.address).desired_width(f32::INFINITY),
                );
                submitted =
                    address.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            });
        });

        egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(180.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("e-Report").size(20.0).strong());
                ui.separator();
                for entry in sidebar() {
                    let selected = &entry.route == route;
                    if ui.selectable_label(selected, entry.label).clicked() {
                        target = Some(entry.route);
                    }
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(route.title());
            ui.add_space(4.0);
            if let (Some(page), Ok(session)) = (self.page.as_mut(), &self.session) {
                if let Some(route) = page.show(ui, &session.runtime) {
                    target = Some(route);
                }
            }
        });

        if go_back {
            self.back();
        } else if submitted {
            self.open_address();
        } else if let Some(route) = target {
            self.navigate(route);
        }
    }

    fn show_toasts(&mut self, ctx: &egui::Context) {
        let now = Utc::now();
        self.notifications.expire(now);
        let mut dismissed = Vec::new();
        let page_toasts: Vec<Notification> = match self.page.as_mut() {
            Some(page) => {
                let center = page.notifications_mut();
                center.expire(now);
                center.active().cloned().collect()
            }
            None => Vec::new(),
        };
        let toasts: Vec<Notification> = self
            .notifications
            .active()
            .cloned()
            .chain(page_toasts)
            .collect();
        if toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                for toast in &toasts {
                    let color = match toast.level {
                        Level::Info => Color32::from_rgb(90, 140, 220),
                        Level::Success => Color32::from_rgb(67, 181, 129),
                        Level::Warning => Color32::from_rgb(230, 170, 60),
                        Level::Error => Color32::from_rgb(220, 90, 90),
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.colored_label(color, "●");
                            ui.label(&toast.message);
                            if ui.small_button("x").clicked() {
                                dismissed.push(toast.id);
                            }
                        });
                    });
                }
            });

        for id in dismissed {
            self.notifications.dismiss(id);
            if let Some(page) = self.page.as_mut() {
                page.notifications_mut().dismiss(id);
            }
        }
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl eframe::App for AdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(err) = &self.session {
            self.show_startup_failure(ctx, err);
            return;
        }

        if let (Some(page), Ok(session)) = (self.page.as_mut(), &self.session) {
            page.poll(&session.runtime);
        }

        let route = self.navigator.current().clone();
        match route.layout() {
            Layout::Bare => self.show_bare(ctx, &route),
            Layout::Shell => self.show_shell(ctx, &route),
        }
        self.show_toasts(ctx);
    }
}
