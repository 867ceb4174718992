use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(TeacherId);
id_newtype!(RoleId);
id_newtype!(RoleAssignmentId);
id_newtype!(ClassroomId);
id_newtype!(SubjectId);
id_newtype!(StudentId);
id_newtype!(AcademicYearId);
id_newtype!(IndicatorId);
id_newtype!(ReportId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semester {
    #[default]
    Odd,
    Even,
}

impl Semester {
    pub fn label(self) -> &'static str {
        match self {
            Semester::Odd => "Odd",
            Semester::Even => "Even",
        }
    }
}

/// Competency dimension an indicator (and its scores) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    #[default]
    Knowledge,
    Skill,
}

impl IndicatorKind {
    pub const fn label(self) -> &'static str {
        match self {
            IndicatorKind::Knowledge => "Knowledge",
            IndicatorKind::Skill => "Skill",
        }
    }

    /// Value of the `kind` list filter.
    pub const fn as_query_value(self) -> &'static str {
        match self {
            IndicatorKind::Knowledge => "knowledge",
            IndicatorKind::Skill => "skill",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeSkillGrade {
    A,
    B,
    C,
    D,
}

impl LifeSkillGrade {
    pub const ALL: [LifeSkillGrade; 4] = [
        LifeSkillGrade::A,
        LifeSkillGrade::B,
        LifeSkillGrade::C,
        LifeSkillGrade::D,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LifeSkillGrade::A => "A",
            LifeSkillGrade::B => "B",
            LifeSkillGrade::C => "C",
            LifeSkillGrade::D => "D",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub nip: String,
    pub gender: Gender,
    #[serde(default)]
    pub role_ids: Vec<RoleId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: RoleAssignmentId,
    pub teacher_id: TeacherId,
    pub role_ids: Vec<RoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeroom_classroom_id: Option<ClassroomId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub grade_level: u8,
    pub academic_year_id: AcademicYearId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeroom_teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub nisn: String,
    pub name: String,
    pub gender: Gender,
    pub classroom_id: ClassroomId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: AcademicYearId,
    pub label: String,
    pub semester: Semester,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: IndicatorId,
    pub subject_id: SubjectId,
    pub kind: IndicatorKind,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReport {
    pub id: ReportId,
    pub student_id: StudentId,
    pub classroom_id: ClassroomId,
    pub academic_year_id: AcademicYearId,
    pub sick_days: u32,
    pub permitted_days: u32,
    pub absent_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub id: ReportId,
    pub student_id: StudentId,
    pub classroom_id: ClassroomId,
    pub academic_year_id: AcademicYearId,
    pub subject_id: SubjectId,
    pub indicator_id: IndicatorId,
    pub kind: IndicatorKind,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeSkillReport {
    pub id: ReportId,
    pub student_id: StudentId,
    pub classroom_id: ClassroomId,
    pub academic_year_id: AcademicYearId,
    pub skill: String,
    pub grade: LifeSkillGrade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub id: ReportId,
    pub student_id: StudentId,
    pub classroom_id: ClassroomId,
    pub academic_year_id: AcademicYearId,
    pub height_cm: f32,
    pub weight_kg: f32,
    #[serde(default)]
    pub vision: String,
    #[serde(default)]
    pub hearing: String,
    #[serde(default)]
    pub dental: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
