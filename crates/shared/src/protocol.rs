use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    AcademicYearId, ClassroomId, Gender, IndicatorId, IndicatorKind, LifeSkillGrade, RoleId,
    Semester, StudentId, SubjectId, TeacherId,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Parameter names owned by `ListQuery` itself; filters may not use them.
pub const RESERVED_QUERY_KEYS: [&str; 3] = ["search", "page", "page_size"];

/// Filter and pagination state sent with every list request.
///
/// Pages are 1-based. `filters` carries resource-specific scoping such as
/// `classroom_id` taken from the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            ..Self::default()
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    /// Flattens the query into URL parameters. Blank search text is omitted,
    /// and filters named like a reserved key are dropped so they cannot
    /// shadow the pagination parameters.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(3 + self.filters.len());
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                pairs.push(("search".to_string(), search.to_string()));
            }
        }
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("page_size".to_string(), self.page_size.to_string()));
        for (key, value) in &self.filters {
            if RESERVED_QUERY_KEYS.contains(&key.as_str()) {
                continue;
            }
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.page_size)
    }
}

pub fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 || total == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherDraft {
    pub name: String,
    pub nip: String,
    pub gender: Gender,
    #[serde(default)]
    pub role_ids: Vec<RoleId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignmentDraft {
    pub teacher_id: Option<TeacherId>,
    pub role_ids: Vec<RoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeroom_classroom_id: Option<ClassroomId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassroomDraft {
    pub name: String,
    pub grade_level: u8,
    pub academic_year_id: Option<AcademicYearId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeroom_teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectDraft {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub nisn: String,
    pub name: String,
    pub gender: Gender,
    pub classroom_id: Option<ClassroomId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicYearDraft {
    pub label: String,
    pub semester: Semester,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDraft {
    pub subject_id: Option<SubjectId>,
    pub kind: IndicatorKind,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReportDraft {
    pub student_id: Option<StudentId>,
    pub classroom_id: Option<ClassroomId>,
    pub academic_year_id: Option<AcademicYearId>,
    pub sick_days: u32,
    pub permitted_days: u32,
    pub absent_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReportDraft {
    pub student_id: Option<StudentId>,
    pub classroom_id: Option<ClassroomId>,
    pub academic_year_id: Option<AcademicYearId>,
    pub subject_id: Option<SubjectId>,
    pub indicator_id: Option<IndicatorId>,
    pub kind: IndicatorKind,
    pub score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifeSkillReportDraft {
    pub student_id: Option<StudentId>,
    pub classroom_id: Option<ClassroomId>,
    pub academic_year_id: Option<AcademicYearId>,
    pub skill: String,
    pub grade: Option<LifeSkillGrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReportDraft {
    pub student_id: Option<StudentId>,
    pub classroom_id: Option<ClassroomId>,
    pub academic_year_id: Option<AcademicYearId>,
    pub height_cm: Option<f32>,
    pub weight_kg: Option<f32>,
    #[serde(default)]
    pub vision: String,
    #[serde(default)]
    pub hearing: String,
    #[serde(default)]
    pub dental: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub teachers: u64,
    pub students: u64,
    pub classrooms: u64,
    pub subjects: u64,
}
