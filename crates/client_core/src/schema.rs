//! Shape checks applied to every decoded response before it reaches a page.

use shared::{
    domain::{
        AcademicYear, AttendanceReport, Classroom, HealthReport, Indicator, IndicatorReport,
        LifeSkillReport, Role, RoleAssignment, Student, Subject, Teacher,
    },
    protocol::Page,
};

use crate::error::SchemaError;

pub trait Validate {
    fn validate(&self) -> Result<(), SchemaError>;
}

fn positive_id(field: &'static str, id: i64) -> Result<(), SchemaError> {
    if id <= 0 {
        return Err(SchemaError::new(field, format!("expected a positive id, got {id}")));
    }
    Ok(())
}

fn non_blank(field: &'static str, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        return Err(SchemaError::new(field, "must not be blank"));
    }
    Ok(())
}

fn finite_in(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), SchemaError> {
    if !value.is_finite() || value < min || value > max {
        return Err(SchemaError::new(
            field,
            format!("expected a value in {min}..={max}, got {value}"),
        ));
    }
    Ok(())
}

impl<T: Validate> Validate for Page<T> {
    fn validate(&self) -> Result<(), SchemaError> {
        if self.page == 0 {
            return Err(SchemaError::new("page", "pages are 1-based"));
        }
        if self.items.len() > self.page_size as usize {
            return Err(SchemaError::new(
                "items",
                format!(
                    "{} items exceed the page size of {}",
                    self.items.len(),
                    self.page_size
                ),
            ));
        }
        if (self.items.len() as u64) > self.total {
            return Err(SchemaError::new(
                "total",
                format!("total {} is smaller than the page", self.total),
            ));
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }
}

impl Validate for Teacher {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        non_blank("name", &self.name)?;
        non_blank("nip", &self.nip)?;
        for role_id in &self.role_ids {
            positive_id("role_ids", role_id.0)?;
        }
        Ok(())
    }
}

impl Validate for Role {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        non_blank("name", &self.name)
    }
}

impl Validate for RoleAssignment {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        positive_id("teacher_id", self.teacher_id.0)?;
        if self.role_ids.is_empty() {
            return Err(SchemaError::new("role_ids", "assignment carries no roles"));
        }
        for role_id in &self.role_ids {
            positive_id("role_ids", role_id.0)?;
        }
        if let Some(classroom_id) = self.homeroom_classroom_id {
            positive_id("homeroom_classroom_id", classroom_id.0)?;
        }
        Ok(())
    }
}

impl Validate for Classroom {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        non_blank("name", &self.name)?;
        positive_id("academic_year_id", self.academic_year_id.0)
    }
}

impl Validate for Subject {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        non_blank("code", &self.code)?;
        non_blank("name", &self.name)
    }
}

impl Validate for Student {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        non_blank("nisn", &self.nisn)?;
        non_blank("name", &self.name)?;
        positive_id("classroom_id", self.classroom_id.0)
    }
}

impl Validate for AcademicYear {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        non_blank("label", &self.label)
    }
}

impl Validate for Indicator {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        positive_id("subject_id", self.subject_id.0)?;
        non_blank("code", &self.code)
    }
}

impl Validate for AttendanceReport {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        positive_id("student_id", self.student_id.0)?;
        positive_id("classroom_id", self.classroom_id.0)?;
        positive_id("academic_year_id", self.academic_year_id.0)
    }
}

impl Validate for IndicatorReport {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        positive_id("student_id", self.student_id.0)?;
        positive_id("classroom_id", self.classroom_id.0)?;
        positive_id("academic_year_id", self.academic_year_id.0)?;
        positive_id("subject_id", self.subject_id.0)?;
        positive_id("indicator_id", self.indicator_id.0)?;
        finite_in("score", self.score, 0.0, 100.0)
    }
}

impl Validate for LifeSkillReport {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        positive_id("student_id", self.student_id.0)?;
        positive_id("classroom_id", self.classroom_id.0)?;
        positive_id("academic_year_id", self.academic_year_id.0)?;
        non_blank("skill", &self.skill)
    }
}

impl Validate for HealthReport {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("id", self.id.0)?;
        positive_id("student_id", self.student_id.0)?;
        positive_id("classroom_id", self.classroom_id.0)?;
        positive_id("academic_year_id", self.academic_year_id.0)?;
        finite_in("height_cm", self.height_cm, 0.0, 300.0)?;
        finite_in("weight_kg", self.weight_kg, 0.0, 500.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{Gender, RoleId, TeacherId};

    fn teacher(id: i64) -> Teacher {
        Teacher {
            id: TeacherId(id),
            name: "Siti Aminah".to_string(),
            nip: "198706152010012003".to_string(),
            gender: Gender::Female,
            role_ids: vec![RoleId(1)],
        }
    }

    #[test]
    fn rejects_page_larger_than_its_page_size() {
        let page = Page {
            items: vec![teacher(1), teacher(2), teacher(3)],
            total: 3,
            page: 1,
            page_size: 2,
        };
        let err = page.validate().expect_err("oversized page");
        assert_eq!(err.field, "items");
    }

    #[test]
    fn rejects_page_with_invalid_record() {
        let mut bad = teacher(2);
        bad.nip = " ".to_string();
        let page = Page {
            items: vec![teacher(1), bad],
            total: 2,
            page: 1,
            page_size: 10,
        };
        let err = page.validate().expect_err("blank nip");
        assert_eq!(err.field, "nip");
    }

    #[test]
    fn accepts_empty_page() {
        let page: Page<Teacher> = Page {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: 10,
        };
        assert!(page.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_scores() {
        use shared::domain::{
            AcademicYearId, ClassroomId, IndicatorId, IndicatorKind, ReportId, StudentId,
            SubjectId,
        };
        let report = IndicatorReport {
            id: ReportId(1),
            student_id: StudentId(2),
            classroom_id: ClassroomId(3),
            academic_year_id: AcademicYearId(4),
            subject_id: SubjectId(5),
            indicator_id: IndicatorId(6),
            kind: IndicatorKind::Skill,
            score: 101.5,
            description: None,
            updated_at: None,
        };
        assert_eq!(report.validate().expect_err("score").field, "score");
    }
}
