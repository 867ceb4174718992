//! Catalogue of backend resources the admin pages manage.

use std::{fmt, hash::Hash};

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{
        AcademicYear, AcademicYearId, AttendanceReport, Classroom, ClassroomId, HealthReport,
        Indicator, IndicatorId, IndicatorReport, LifeSkillReport, ReportId, Role, RoleAssignment,
        RoleAssignmentId, RoleId, Student, StudentId, Subject, SubjectId, Teacher, TeacherId,
    },
    protocol::{
        AcademicYearDraft, AttendanceReportDraft, ClassroomDraft, HealthReportDraft,
        IndicatorDraft, IndicatorReportDraft, LifeSkillReportDraft, RoleAssignmentDraft,
        RoleDraft, StudentDraft, SubjectDraft, TeacherDraft,
    },
};

use crate::{forms::FormDraft, schema::Validate};

pub trait Resource: Send + Sync + 'static {
    /// Collection path relative to the API base URL.
    const PATH: &'static str;
    const LABEL: &'static str;

    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;
    type Record: Clone
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Validate
        + Send
        + Sync
        + 'static;
    type Draft: Clone + fmt::Debug + Default + Serialize + FormDraft + Send + Sync + 'static;

    fn id_of(record: &Self::Record) -> Self::Id;
    /// Wraps a raw id typed on the command line or taken from a route.
    fn id_from_raw(raw: i64) -> Self::Id;
    fn draft_from(record: &Self::Record) -> Self::Draft;
}

macro_rules! resource {
    ($name:ident, $path:literal, $label:literal, $id:ident, $record:ty, $draft:ty, |$r:ident| $to_draft:expr) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl Resource for $name {
            const PATH: &'static str = $path;
            const LABEL: &'static str = $label;

            type Id = $id;
            type Record = $record;
            type Draft = $draft;

            fn id_of(record: &Self::Record) -> Self::Id {
                record.id
            }

            fn id_from_raw(raw: i64) -> Self::Id {
                $id(raw)
            }

            fn draft_from($r: &Self::Record) -> Self::Draft {
                $to_draft
            }
        }
    };
}

resource!(Teachers, "teachers", "Teacher", TeacherId, Teacher, TeacherDraft, |r| {
    TeacherDraft {
        name: r.name.clone(),
        nip: r.nip.clone(),
        gender: r.gender,
        role_ids: r.role_ids.clone(),
    }
});

resource!(Roles, "roles", "Role", RoleId, Role, RoleDraft, |r| RoleDraft {
    name: r.name.clone(),
    description: r.description.clone(),
});

resource!(
    TeacherRoles,
    "teacher-roles",
    "Teacher role",
    RoleAssignmentId,
    RoleAssignment,
    RoleAssignmentDraft,
    |r| RoleAssignmentDraft {
        teacher_id: Some(r.teacher_id),
        role_ids: r.role_ids.clone(),
        homeroom_classroom_id: r.homeroom_classroom_id,
    }
);

resource!(
    Classrooms,
    "classrooms",
    "Classroom",
    ClassroomId,
    Classroom,
    ClassroomDraft,
    |r| ClassroomDraft {
        name: r.name.clone(),
        grade_level: r.grade_level,
        academic_year_id: Some(r.academic_year_id),
        homeroom_teacher_id: r.homeroom_teacher_id,
    }
);

resource!(Subjects, "subjects", "Subject", SubjectId, Subject, SubjectDraft, |r| {
    SubjectDraft {
        code: r.code.clone(),
        name: r.name.clone(),
    }
});

resource!(Students, "students", "Student", StudentId, Student, StudentDraft, |r| {
    StudentDraft {
        nisn: r.nisn.clone(),
        name: r.name.clone(),
        gender: r.gender,
        classroom_id: Some(r.classroom_id),
    }
});

resource!(
    AcademicYears,
    "academic-years",
    "Academic year",
    AcademicYearId,
    AcademicYear,
    AcademicYearDraft,
    |r| AcademicYearDraft {
        label: r.label.clone(),
        semester: r.semester,
        is_active: r.is_active,
    }
);

resource!(
    Indicators,
    "indicators",
    "Indicator",
    IndicatorId,
    Indicator,
    IndicatorDraft,
    |r| IndicatorDraft {
        subject_id: Some(r.subject_id),
        kind: r.kind,
        code: r.code.clone(),
        description: r.description.clone(),
    }
);

resource!(
    AttendanceReports,
    "report-attendance",
    "Attendance report",
    ReportId,
    AttendanceReport,
    AttendanceReportDraft,
    |r| AttendanceReportDraft {
        student_id: Some(r.student_id),
        classroom_id: Some(r.classroom_id),
        academic_year_id: Some(r.academic_year_id),
        sick_days: r.sick_days,
        permitted_days: r.permitted_days,
        absent_days: r.absent_days,
    }
);

resource!(
    IndicatorReports,
    "report-indicator",
    "Indicator score",
    ReportId,
    IndicatorReport,
    IndicatorReportDraft,
    |r| IndicatorReportDraft {
        student_id: Some(r.student_id),
        classroom_id: Some(r.classroom_id),
        academic_year_id: Some(r.academic_year_id),
        subject_id: Some(r.subject_id),
        indicator_id: Some(r.indicator_id),
        kind: r.kind,
        score: Some(r.score),
        description: r.description.clone(),
    }
);

resource!(
    LifeSkillReports,
    "report-lifeskill",
    "Life-skill report",
    ReportId,
    LifeSkillReport,
    LifeSkillReportDraft,
    |r| LifeSkillReportDraft {
        student_id: Some(r.student_id),
        classroom_id: Some(r.classroom_id),
        academic_year_id: Some(r.academic_year_id),
        skill: r.skill.clone(),
        grade: Some(r.grade),
        description: r.description.clone(),
    }
);

resource!(
    HealthReports,
    "report-health",
    "Health report",
    ReportId,
    HealthReport,
    HealthReportDraft,
    |r| HealthReportDraft {
        student_id: Some(r.student_id),
        classroom_id: Some(r.classroom_id),
        academic_year_id: Some(r.academic_year_id),
        height_cm: Some(r.height_cm),
        weight_kg: Some(r.weight_kg),
        vision: r.vision.clone(),
        hearing: r.hearing.clone(),
        dental: r.dental.clone(),
    }
);
