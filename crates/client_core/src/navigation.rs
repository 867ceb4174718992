//! Navigation shell: route table, layout choice, and sidebar entries.

use std::{collections::VecDeque, fmt};

use shared::domain::{ClassroomId, SubjectId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Splash,
    Login,
    Register,
    Dashboard,
    Teachers,
    Roles,
    TeacherRoles,
    Classrooms,
    Subjects,
    Students,
    AcademicYears,
    Indicators {
        subject_id: Option<SubjectId>,
    },
    AttendanceReport {
        classroom_id: ClassroomId,
    },
    IndicatorReport {
        subject_id: SubjectId,
        classroom_id: ClassroomId,
    },
    LifeSkillReport {
        classroom_id: ClassroomId,
    },
    HealthReport {
        classroom_id: ClassroomId,
    },
    NotFound {
        path: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Sidebar chrome around the page.
    Shell,
    /// No chrome: splash, auth, and not-found pages.
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub label: &'static str,
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundView {
    pub requested: String,
    pub message: String,
    pub back_label: &'static str,
    pub back_to: Route,
}

fn parse_id(segment: &str) -> Option<i64> {
    segment.parse::<i64>().ok().filter(|id| *id > 0)
}

impl Route {
    pub fn parse(raw: &str) -> Route {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Some(Route::Splash),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["dashboard"] => Some(Route::Dashboard),
            ["teachers"] => Some(Route::Teachers),
            ["roles"] => Some(Route::Roles),
            ["teacher-roles"] => Some(Route::TeacherRoles),
            ["classrooms"] => Some(Route::Classrooms),
            ["subjects"] => Some(Route::Subjects),
            ["students"] => Some(Route::Students),
            ["academic-years"] => Some(Route::AcademicYears),
            ["indicators"] => Some(Route::Indicators { subject_id: None }),
            ["indicators", subject] => parse_id(subject).map(|id| Route::Indicators {
                subject_id: Some(SubjectId(id)),
            }),
            ["reports", "attendance", classroom] => {
                parse_id(classroom).map(|id| Route::AttendanceReport {
                    classroom_id: ClassroomId(id),
                })
            }
            ["reports", "lifeskill", classroom] => {
                parse_id(classroom).map(|id| Route::LifeSkillReport {
                    classroom_id: ClassroomId(id),
                })
            }
            ["reports", "health", classroom] => {
                parse_id(classroom).map(|id| Route::HealthReport {
                    classroom_id: ClassroomId(id),
                })
            }
            // "knowledge-skill" is the older name of the same page.
            ["reports", "indicator" | "knowledge-skill", subject, classroom] => {
                match (parse_id(subject), parse_id(classroom)) {
                    (Some(subject), Some(classroom)) => Some(Route::IndicatorReport {
                        subject_id: SubjectId(subject),
                        classroom_id: ClassroomId(classroom),
                    }),
                    _ => None,
                }
            }
            _ => None,
        };

        route.unwrap_or_else(|| Route::NotFound {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
        })
    }

    pub fn path(&self) -> String {
        match self {
            Route::Splash => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Teachers => "/teachers".to_string(),
            Route::Roles => "/roles".to_string(),
            Route::TeacherRoles => "/teacher-roles".to_string(),
            Route::Classrooms => "/classrooms".to_string(),
            Route::Subjects => "/subjects".to_string(),
            Route::Students => "/students".to_string(),
            Route::AcademicYears => "/academic-years".to_string(),
            Route::Indicators { subject_id: None } => "/indicators".to_string(),
            Route::Indicators {
                subject_id: Some(subject_id),
            } => format!("/indicators/{subject_id}"),
            Route::AttendanceReport { classroom_id } => {
                format!("/reports/attendance/{classroom_id}")
            }
            Route::IndicatorReport {
                subject_id,
                classroom_id,
            } => format!("/reports/indicator/{subject_id}/{classroom_id}"),
            Route::LifeSkillReport { classroom_id } => format!("/reports/lifeskill/{classroom_id}"),
            Route::HealthReport { classroom_id } => format!("/reports/health/{classroom_id}"),
            Route::NotFound { path } => path.clone(),
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Route::Splash | Route::Login | Route::Register | Route::NotFound { .. } => Layout::Bare,
            _ => Layout::Shell,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Route::Splash => "e-Report".to_string(),
            Route::Login => "Sign in".to_string(),
            Route::Register => "Register".to_string(),
            Route::Dashboard => "Dashboard".to_string(),
            Route::Teachers => "Teachers".to_string(),
            Route::Roles => "Roles".to_string(),
            Route::TeacherRoles => "Teacher roles".to_string(),
            Route::Classrooms => "Classrooms".to_string(),
            Route::Subjects => "Subjects".to_string(),
            Route::Students => "Students".to_string(),
            Route::AcademicYears => "Academic years".to_string(),
            Route::Indicators { subject_id: None } => "Indicators".to_string(),
            Route::Indicators {
                subject_id: Some(subject_id),
            } => format!("Indicators for subject {subject_id}"),
            Route::AttendanceReport { classroom_id } => {
                format!("Attendance, classroom {classroom_id}")
            }
            Route::IndicatorReport {
                subject_id,
                classroom_id,
            } => format!(
                "Knowledge & skill scores, subject {subject_id}, classroom {classroom_id}"
            ),
            Route::LifeSkillReport { classroom_id } => {
                format!("Life skills, classroom {classroom_id}")
            }
            Route::HealthReport { classroom_id } => format!("Health, classroom {classroom_id}"),
            Route::NotFound { .. } => "Page not found".to_string(),
        }
    }

    pub fn not_found_view(&self) -> Option<NotFoundView> {
        let Route::NotFound { path } = self else {
            return None;
        };
        Some(NotFoundView {
            requested: path.clone(),
            message: format!("There is no page at {path}."),
            back_label: "Back to dashboard",
            back_to: Route::Dashboard,
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub fn sidebar() -> Vec<SidebarEntry> {
    [
        ("Dashboard", Route::Dashboard),
        ("Teachers", Route::Teachers),
        ("Roles", Route::Roles),
        ("Teacher roles", Route::TeacherRoles),
        ("Academic years", Route::AcademicYears),
        ("Classrooms", Route::Classrooms),
        ("Subjects", Route::Subjects),
        ("Students", Route::Students),
        ("Indicators", Route::Indicators { subject_id: None }),
    ]
    .into_iter()
    .map(|(label, route)| SidebarEntry { label, route })
    .collect()
}

/// Back entries kept by a `Navigator`; the oldest are dropped first.
pub const HISTORY_LIMIT: usize = 50;

/// In-memory history for the shell; `navigate` accepts raw paths so links
/// with route parameters work the same way as typed addresses.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Route,
    history: VecDeque<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Route::Splash,
            history: VecDeque::new(),
        }
    }
}

impl Navigator {
    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn navigate(&mut self, path: &str) -> &Route {
        self.go(Route::parse(path))
    }

    pub fn go(&mut self, route: Route) -> &Route {
        if route != self.current {
            let previous = std::mem::replace(&mut self.current, route);
            if self.history.len() == HISTORY_LIMIT {
                self.history.pop_front();
            }
            self.history.push_back(previous);
        }
        &self.current
    }

    pub fn back(&mut self) -> &Route {
        if let Some(previous) = self.history.pop_back() {
            self.current = previous;
        }
        &self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
