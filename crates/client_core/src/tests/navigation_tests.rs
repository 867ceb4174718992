use super::*;

#[test]
fn every_route_path_parses_back_to_itself() {
    let routes = [
        Route::Splash,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Teachers,
        Route::Roles,
        Route::TeacherRoles,
        Route::Classrooms,
        Route::Subjects,
        Route::Students,
        Route::AcademicYears,
        Route::Indicators { subject_id: None },
        Route::Indicators {
            subject_id: Some(SubjectId(4)),
        },
        Route::AttendanceReport {
            classroom_id: ClassroomId(2),
        },
        Route::IndicatorReport {
            subject_id: SubjectId(3),
            classroom_id: ClassroomId(9),
        },
        Route::LifeSkillReport {
            classroom_id: ClassroomId(5),
        },
        Route::HealthReport {
            classroom_id: ClassroomId(6),
        },
    ];
    for route in routes {
        assert_eq!(Route::parse(&route.path()), route, "path {}", route.path());
    }
}

#[test]
fn trailing_slash_and_query_are_ignored() {
    assert_eq!(Route::parse("/teachers/"), Route::Teachers);
    assert_eq!(Route::parse("/students?page=3#top"), Route::Students);
    assert_eq!(
        Route::parse("reports/health/12"),
        Route::HealthReport {
            classroom_id: ClassroomId(12)
        }
    );
}

#[test]
fn knowledge_skill_path_opens_indicator_report() {
    let legacy = Route::parse("/reports/knowledge-skill/3/9");
    assert_eq!(
        legacy,
        Route::IndicatorReport {
            subject_id: SubjectId(3),
            classroom_id: ClassroomId(9),
        }
    );
    assert_eq!(legacy.path(), "/reports/indicator/3/9");
}

#[test]
fn malformed_parameters_fall_through_to_not_found() {
    for path in [
        "/reports/attendance/abc",
        "/reports/attendance/0",
        "/reports/attendance/-4",
        "/reports/indicator/3",
        "/indicators/x",
        "/teachers/1/extra",
        "/nowhere",
    ] {
        assert!(
            matches!(Route::parse(path), Route::NotFound { .. }),
            "{path} should not resolve"
        );
    }
}

#[test]
fn not_found_view_points_back_to_dashboard() {
    let route = Route::parse("/grades?term=1");
    let view = route.not_found_view().expect("not found route");

    assert_eq!(view.requested, "/grades");
    assert_eq!(view.back_to, Route::Dashboard);
    assert_eq!(route.layout(), Layout::Bare);
    assert!(Route::Teachers.not_found_view().is_none());
}

#[test]
fn auth_and_splash_pages_have_no_chrome() {
    assert_eq!(Route::Splash.layout(), Layout::Bare);
    assert_eq!(Route::Login.layout(), Layout::Bare);
    assert_eq!(Route::Register.layout(), Layout::Bare);
    assert_eq!(Route::Dashboard.layout(), Layout::Shell);
    assert_eq!(
        Route::AttendanceReport {
            classroom_id: ClassroomId(1)
        }
        .layout(),
        Layout::Shell
    );
}

#[test]
fn sidebar_links_only_to_shell_pages() {
    let entries = sidebar();
    assert_eq!(entries.first().map(|e| &e.route), Some(&Route::Dashboard));
    assert!(entries.iter().all(|e| e.route.layout() == Layout::Shell));
    assert!(entries.iter().any(|e| e.route == Route::TeacherRoles));
}

#[test]
fn navigator_keeps_history_and_skips_repeats() {
    let mut nav = Navigator::default();
    assert_eq!(nav.current(), &Route::Splash);
    assert!(!nav.can_go_back());

    nav.navigate("/dashboard");
    nav.navigate("/dashboard");
    nav.navigate("/reports/lifeskill/7");
    assert_eq!(
        nav.current(),
        &Route::LifeSkillReport {
            classroom_id: ClassroomId(7)
        }
    );

    assert_eq!(nav.back(), &Route::Dashboard);
    assert_eq!(nav.back(), &Route::Splash);
    assert!(!nav.can_go_back());
    assert_eq!(nav.back(), &Route::Splash);
}

#[test]
fn navigator_history_is_bounded() {
    let mut nav = Navigator::default();
    for id in 1..=(HISTORY_LIMIT as i64 + 20) {
        nav.go(Route::AttendanceReport {
            classroom_id: ClassroomId(id),
        });
    }

    let mut steps = 0;
    while nav.can_go_back() {
        nav.back();
        steps += 1;
    }
    assert_eq!(steps, HISTORY_LIMIT);
    // The oldest entries, including the splash page, were dropped.
    assert_eq!(
        nav.current(),
        &Route::AttendanceReport {
            classroom_id: ClassroomId(20)
        }
    );
}
