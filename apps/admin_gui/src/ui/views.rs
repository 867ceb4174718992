//! How each resource renders as table rows and as an editor form.

use chrono::{DateTime, Utc};
use client_core::{
    navigation::Route,
    resources::{
        AcademicYears, AttendanceReports, Classrooms, HealthReports, IndicatorReports, Indicators,
        LifeSkillReports, Roles, Students, Subjects, TeacherRoles, Teachers,
    },
    Resource, ValidationErrors,
};
use shared::domain::{
    AcademicYearId, ClassroomId, Gender, IndicatorId, IndicatorKind, LifeSkillGrade, RoleId,
    Semester, StudentId, SubjectId, TeacherId,
};

use crate::ui::widgets::{
    choice, id_field, id_list, id_prompt, number_field, optional_number, optional_text,
    text_field,
};

/// Select-style filter offered above a table: query key plus (label, value)
/// choices, where an empty value clears the filter.
pub struct ChoiceFilter {
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [(&'static str, &'static str)],
}

const GENDER_FILTER: ChoiceFilter = ChoiceFilter {
    key: "gender",
    label: "Gender",
    options: &[("All", ""), ("Male", "male"), ("Female", "female")],
};

const KIND_FILTER: ChoiceFilter = ChoiceFilter {
    key: "kind",
    label: "Kind",
    options: &[
        ("All", ""),
        (
            IndicatorKind::Knowledge.label(),
            IndicatorKind::Knowledge.as_query_value(),
        ),
        (
            IndicatorKind::Skill.label(),
            IndicatorKind::Skill.as_query_value(),
        ),
    ],
};

const GENDERS: [Gender; 2] = [Gender::Male, Gender::Female];
const KINDS: [IndicatorKind; 2] = [IndicatorKind::Knowledge, IndicatorKind::Skill];

pub trait TableView: Resource {
    const COLUMNS: &'static [&'static str];

    fn cells(record: &Self::Record) -> Vec<String>;

    fn form(ui: &mut egui::Ui, draft: &mut Self::Draft, errors: &ValidationErrors);

    /// Per-row shortcuts into pages scoped by this record.
    fn links(_record: &Self::Record) -> Vec<(&'static str, Route)> {
        Vec::new()
    }

    /// Row links that need a second id chosen by the user.
    fn row_menu(_ui: &mut egui::Ui, _record: &Self::Record) -> Option<Route> {
        None
    }

    fn choice_filter() -> Option<&'static ChoiceFilter> {
        None
    }
}

/// Knowledge/skill scores for one subject in one classroom. Non-positive
/// ids have no page.
fn indicator_scores(subject_id: i64, classroom_id: i64) -> Option<Route> {
    (subject_id > 0 && classroom_id > 0).then(|| Route::IndicatorReport {
        subject_id: SubjectId(subject_id),
        classroom_id: ClassroomId(classroom_id),
    })
}

fn joined<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("#{item}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn updated(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn report_scope(
    ui: &mut egui::Ui,
    student_id: &mut Option<StudentId>,
    classroom_id: &mut Option<ClassroomId>,
    academic_year_id: &mut Option<AcademicYearId>,
    errors: &ValidationErrors,
) {
    id_field(ui, "Student", student_id, StudentId, |id| id.0, errors, "student_id");
    id_field(ui, "Classroom", classroom_id, ClassroomId, |id| id.0, errors, "classroom_id");
    id_field(
        ui,
        "Academic year",
        academic_year_id,
        AcademicYearId,
        |id| id.0,
        errors,
        "academic_year_id",
    );
}

impl TableView for Teachers {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "NIP", "Gender", "Roles"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            r.name.clone(),
            r.nip.clone(),
            r.gender.label().to_string(),
            joined(&r.role_ids),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        text_field(ui, "Name", &mut d.name, errors, "name");
        text_field(ui, "NIP", &mut d.nip, errors, "nip");
        choice(ui, "Gender", &mut d.gender, &GENDERS, Gender::label);
        id_list(ui, "Roles", &mut d.role_ids, RoleId, |id| id.0, errors, "role_ids");
    }
}

impl TableView for Roles {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Description"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            r.name.clone(),
            r.description.clone().unwrap_or_default(),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        text_field(ui, "Name", &mut d.name, errors, "name");
        optional_text(ui, "Description", &mut d.description, errors, "description");
    }
}

impl TableView for TeacherRoles {
    const COLUMNS: &'static [&'static str] = &["ID", "Teacher", "Roles", "Homeroom"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            format!("#{}", r.teacher_id),
            joined(&r.role_ids),
            optional(r.homeroom_classroom_id),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        id_field(ui, "Teacher", &mut d.teacher_id, TeacherId, |id| id.0, errors, "teacher_id");
        id_list(ui, "Roles", &mut d.role_ids, RoleId, |id| id.0, errors, "role_ids");
        id_field(
            ui,
            "Homeroom class",
            &mut d.homeroom_classroom_id,
            ClassroomId,
            |id| id.0,
            errors,
            "homeroom_classroom_id",
        );
    }
}

impl TableView for Classrooms {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Grade", "Academic year", "Homeroom teacher"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            r.name.clone(),
            r.grade_level.to_string(),
            format!("#{}", r.academic_year_id),
            optional(r.homeroom_teacher_id),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        text_field(ui, "Name", &mut d.name, errors, "name");
        number_field(ui, "Grade level", &mut d.grade_level, errors, "grade_level");
        id_field(
            ui,
            "Academic year",
            &mut d.academic_year_id,
            AcademicYearId,
            |id| id.0,
            errors,
            "academic_year_id",
        );
        id_field(
            ui,
            "Homeroom teacher",
            &mut d.homeroom_teacher_id,
            TeacherId,
            |id| id.0,
            errors,
            "homeroom_teacher_id",
        );
    }

    fn links(r: &Self::Record) -> Vec<(&'static str, Route)> {
        vec![
            (
                "Attendance",
                Route::AttendanceReport {
                    classroom_id: r.id,
                },
            ),
            (
                "Life skills",
                Route::LifeSkillReport {
                    classroom_id: r.id,
                },
            ),
            (
                "Health",
                Route::HealthReport {
                    classroom_id: r.id,
                },
            ),
        ]
    }

    fn row_menu(ui: &mut egui::Ui, r: &Self::Record) -> Option<Route> {
        id_prompt(ui, "Scores", "Subject", ("classroom", r.id.0))
            .and_then(|subject| indicator_scores(subject, r.id.0))
    }
}

impl TableView for Subjects {
    const COLUMNS: &'static [&'static str] = &["ID", "Code", "Name"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![r.id.to_string(), r.code.clone(), r.name.clone()]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        text_field(ui, "Code", &mut d.code, errors, "code");
        text_field(ui, "Name", &mut d.name, errors, "name");
    }

    fn links(r: &Self::Record) -> Vec<(&'static str, Route)> {
        vec![(
            "Indicators",
            Route::Indicators {
                subject_id: Some(r.id),
            },
        )]
    }

    fn row_menu(ui: &mut egui::Ui, r: &Self::Record) -> Option<Route> {
        id_prompt(ui, "Scores", "Classroom", ("subject", r.id.0))
            .and_then(|classroom| indicator_scores(r.id.0, classroom))
    }
}

impl TableView for Students {
    const COLUMNS: &'static [&'static str] = &["ID", "NISN", "Name", "Gender", "Classroom"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            r.nisn.clone(),
            r.name.clone(),
            r.gender.label().to_string(),
            format!("#{}", r.classroom_id),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        text_field(ui, "NISN", &mut d.nisn, errors, "nisn");
        text_field(ui, "Name", &mut d.name, errors, "name");
        choice(ui, "Gender", &mut d.gender, &GENDERS, Gender::label);
        id_field(
            ui,
            "Classroom",
            &mut d.classroom_id,
            ClassroomId,
            |id| id.0,
            errors,
            "classroom_id",
        );
    }

    fn choice_filter() -> Option<&'static ChoiceFilter> {
        Some(&GENDER_FILTER)
    }
}

impl TableView for AcademicYears {
    const COLUMNS: &'static [&'static str] = &["ID", "Label", "Semester", "Active"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            r.label.clone(),
            r.semester.label().to_string(),
            if r.is_active { "yes" } else { "" }.to_string(),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        text_field(ui, "Label", &mut d.label, errors, "label");
        choice(
            ui,
            "Semester",
            &mut d.semester,
            &[Semester::Odd, Semester::Even],
            Semester::label,
        );
        ui.label("Active");
        ui.checkbox(&mut d.is_active, "Current academic year");
        ui.end_row();
    }
}

impl TableView for Indicators {
    const COLUMNS: &'static [&'static str] = &["ID", "Subject", "Kind", "Code", "Description"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            format!("#{}", r.subject_id),
            r.kind.label().to_string(),
            r.code.clone(),
            r.description.clone(),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        id_field(ui, "Subject", &mut d.subject_id, SubjectId, |id| id.0, errors, "subject_id");
        choice(ui, "Kind", &mut d.kind, &KINDS, IndicatorKind::label);
        text_field(ui, "Code", &mut d.code, errors, "code");
        text_field(ui, "Description", &mut d.description, errors, "description");
    }

    fn choice_filter() -> Option<&'static ChoiceFilter> {
        Some(&KIND_FILTER)
    }
}

impl TableView for AttendanceReports {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Student", "Sick", "Permitted", "Absent", "Updated"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            format!("#{}", r.student_id),
            r.sick_days.to_string(),
            r.permitted_days.to_string(),
            r.absent_days.to_string(),
            updated(r.updated_at),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        report_scope(ui, &mut d.student_id, &mut d.classroom_id, &mut d.academic_year_id, errors);
        number_field(ui, "Sick days", &mut d.sick_days, errors, "sick_days");
        number_field(ui, "Permitted days", &mut d.permitted_days, errors, "permitted_days");
        number_field(ui, "Absent days", &mut d.absent_days, errors, "absent_days");
    }
}

impl TableView for IndicatorReports {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Student", "Indicator", "Kind", "Score", "Notes", "Updated"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            format!("#{}", r.student_id),
            format!("#{}", r.indicator_id),
            r.kind.label().to_string(),
            format!("{:.1}", r.score),
            r.description.clone().unwrap_or_default(),
            updated(r.updated_at),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        report_scope(ui, &mut d.student_id, &mut d.classroom_id, &mut d.academic_year_id, errors);
        id_field(ui, "Subject", &mut d.subject_id, SubjectId, |id| id.0, errors, "subject_id");
        id_field(
            ui,
            "Indicator",
            &mut d.indicator_id,
            IndicatorId,
            |id| id.0,
            errors,
            "indicator_id",
        );
        choice(ui, "Kind", &mut d.kind, &KINDS, IndicatorKind::label);
        optional_number(ui, "Score", &mut d.score, errors, "score");
        optional_text(ui, "Notes", &mut d.description, errors, "description");
    }

    fn choice_filter() -> Option<&'static ChoiceFilter> {
        Some(&KIND_FILTER)
    }
}

impl TableView for LifeSkillReports {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Student", "Skill", "Grade", "Notes", "Updated"];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            format!("#{}", r.student_id),
            r.skill.clone(),
            r.grade.label().to_string(),
            r.description.clone().unwrap_or_default(),
            updated(r.updated_at),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        report_scope(ui, &mut d.student_id, &mut d.classroom_id, &mut d.academic_year_id, errors);
        text_field(ui, "Skill", &mut d.skill, errors, "skill");
        ui.label("Grade");
        ui.horizontal(|ui| {
            for grade in LifeSkillGrade::ALL {
                ui.selectable_value(&mut d.grade, Some(grade), grade.label());
            }
        });
        ui.end_row();
        if errors.has_field("grade") {
            ui.label("");
            ui.colored_label(crate::ui::widgets::ERROR_RED, "Pick a grade.");
            ui.end_row();
        }
        optional_text(ui, "Notes", &mut d.description, errors, "description");
    }
}

impl TableView for HealthReports {
    const COLUMNS: &'static [&'static str] = &[
        "ID", "Student", "Height (cm)", "Weight (kg)", "Vision", "Hearing", "Dental", "Updated",
    ];

    fn cells(r: &Self::Record) -> Vec<String> {
        vec![
            r.id.to_string(),
            format!("#{}", r.student_id),
            format!("{:.1}", r.height_cm),
            format!("{:.1}", r.weight_kg),
            r.vision.clone(),
            r.hearing.clone(),
            r.dental.clone(),
            updated(r.updated_at),
        ]
    }

    fn form(ui: &mut egui::Ui, d: &mut Self::Draft, errors: &ValidationErrors) {
        report_scope(ui, &mut d.student_id, &mut d.classroom_id, &mut d.academic_year_id, errors);
        optional_number(ui, "Height (cm)", &mut d.height_cm, errors, "height_cm");
        optional_number(ui, "Weight (kg)", &mut d.weight_kg, errors, "weight_kg");
        text_field(ui, "Vision", &mut d.vision, errors, "vision");
        text_field(ui, "Hearing", &mut d.hearing, errors, "hearing");
        text_field(ui, "Dental", &mut d.dental, errors, "dental");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use shared::domain::{Classroom, IndicatorReport, ReportId};

    #[test]
    fn cells_line_up_with_columns() {
        let classroom = Classroom {
            id: ClassroomId(4),
            name: "VIII-B".to_string(),
            grade_level: 8,
            academic_year_id: AcademicYearId(1),
            homeroom_teacher_id: None,
        };
        assert_eq!(Classrooms::cells(&classroom).len(), Classrooms::COLUMNS.len());

        let score = IndicatorReport {
            id: ReportId(1),
            student_id: StudentId(2),
            classroom_id: ClassroomId(4),
            academic_year_id: AcademicYearId(1),
            subject_id: SubjectId(3),
            indicator_id: IndicatorId(5),
            kind: IndicatorKind::Skill,
            score: 87.5,
            description: None,
            updated_at: None,
        };
        let cells = IndicatorReports::cells(&score);
        assert_eq!(cells.len(), IndicatorReports::COLUMNS.len());
        assert_eq!(cells[4], "87.5");
    }

    #[test]
    fn classroom_rows_link_to_report_pages() {
        let classroom = Classroom {
            id: ClassroomId(4),
            name: "VIII-B".to_string(),
            grade_level: 8,
            academic_year_id: AcademicYearId(1),
            homeroom_teacher_id: Some(TeacherId(2)),
        };
        let paths: Vec<String> = Classrooms::links(&classroom)
            .into_iter()
            .map(|(_, route)| route.path())
            .collect();
        assert_eq!(
            paths,
            [
                "/reports/attendance/4",
                "/reports/lifeskill/4",
                "/reports/health/4"
            ]
        );
    }

    #[test]
    fn indicator_scores_need_both_ids() {
        let route = indicator_scores(3, 9).expect("route");
        assert_eq!(route.path(), "/reports/indicator/3/9");
        assert_eq!(Route::parse(&route.path()), route);
        assert!(indicator_scores(0, 9).is_none());
        assert!(indicator_scores(3, -1).is_none());
    }

    #[test]
    fn kind_filter_uses_query_values() {
        let values: Vec<&str> = KIND_FILTER.options.iter().map(|(_, value)| *value).collect();
        assert_eq!(values, ["", "knowledge", "skill"]);
    }
}
