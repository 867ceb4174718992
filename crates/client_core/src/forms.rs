//! Modal/form editors: stage edits locally, validate, then submit.

use shared::protocol::{
    AcademicYearDraft, AttendanceReportDraft, ClassroomDraft, HealthReportDraft, IndicatorDraft,
    IndicatorReportDraft, LifeSkillReportDraft, RoleAssignmentDraft, RoleDraft, StudentDraft,
    SubjectDraft, TeacherDraft,
};
use tracing::debug;

use crate::{
    error::{GatewayError, ValidationErrors},
    gateway::ResourceGateway,
    resources::Resource,
};

const MAX_SCHOOL_DAYS: u32 = 366;

/// Client-side checks for a create/update body.
pub trait FormDraft {
    fn check(&self) -> ValidationErrors;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode<Id> {
    Create,
    Edit(Id),
}

/// A validated create or update, ready to hand to a gateway.
#[derive(Debug)]
pub struct SaveRequest<R: Resource> {
    pub target: Option<R::Id>,
    pub draft: R::Draft,
}

impl<R: Resource> SaveRequest<R> {
    pub async fn send<G>(self, gateway: &G) -> Result<R::Record, GatewayError>
    where
        G: ResourceGateway<R> + ?Sized,
    {
        match self.target {
            None => gateway.create(&self.draft).await,
            Some(id) => gateway.update(id, &self.draft).await,
        }
    }
}

#[derive(Debug)]
pub struct FormEditor<R: Resource> {
    mode: EditorMode<R::Id>,
    draft: R::Draft,
    errors: ValidationErrors,
}

impl<R: Resource> FormEditor<R> {
    pub fn create() -> Self {
        Self::create_with(R::Draft::default())
    }

    /// Create form with fields pre-filled, e.g. the classroom taken from the route.
    pub fn create_with(draft: R::Draft) -> Self {
        Self {
            mode: EditorMode::Create,
            draft,
            errors: ValidationErrors::new(),
        }
    }

    pub fn edit(record: &R::Record) -> Self {
        Self {
            mode: EditorMode::Edit(R::id_of(record)),
            draft: R::draft_from(record),
            errors: ValidationErrors::new(),
        }
    }

    pub fn mode(&self) -> EditorMode<R::Id> {
        self.mode
    }

    pub fn title(&self) -> String {
        match self.mode {
            EditorMode::Create => format!("New {}", R::LABEL.to_ascii_lowercase()),
            EditorMode::Edit(id) => format!("Edit {} #{id}", R::LABEL.to_ascii_lowercase()),
        }
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        self.errors = self.draft.check();
        self.errors.clone().into_result()
    }

    pub fn prepare(&mut self) -> Result<SaveRequest<R>, ValidationErrors> {
        self.validate()?;
        let target = match self.mode {
            EditorMode::Create => None,
            EditorMode::Edit(id) => Some(id),
        };
        Ok(SaveRequest {
            target,
            draft: self.draft.clone(),
        })
    }

    /// Validates, then sends. An invalid draft never reaches the gateway.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<R::Record, GatewayError>
    where
        G: ResourceGateway<R> + ?Sized,
    {
        let request = self.prepare().map_err(|errors| {
            debug!(resource = R::LABEL, %errors, "form rejected before submit");
            GatewayError::Validation(errors)
        })?;
        request.send(gateway).await
    }
}

fn digits_only(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !value.chars().all(|c| c.is_ascii_digit()) {
        errors.push(field, "must contain digits only");
    }
}

fn within(errors: &mut ValidationErrors, field: &'static str, value: Option<f32>, max: f32) {
    if let Some(value) = value {
        if !value.is_finite() || !(0.0..=max).contains(&value) {
            errors.push(field, format!("must be between 0 and {max}"));
        }
    }
}

impl FormDraft for TeacherDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors.require_text("nip", &self.nip);
        digits_only(&mut errors, "nip", &self.nip);
        errors
    }
}

impl FormDraft for RoleDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors
    }
}

impl FormDraft for RoleAssignmentDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("teacher_id", &self.teacher_id);
        if self.role_ids.is_empty() {
            errors.push("role_ids", "select at least one role");
        }
        errors
    }
}

impl FormDraft for ClassroomDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("name", &self.name);
        errors.require("academic_year_id", &self.academic_year_id);
        if !(1..=12).contains(&self.grade_level) {
            errors.push("grade_level", "must be between 1 and 12");
        }
        errors
    }
}

impl FormDraft for SubjectDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("code", &self.code);
        errors.require_text("name", &self.name);
        errors
    }
}

impl FormDraft for StudentDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("nisn", &self.nisn);
        digits_only(&mut errors, "nisn", &self.nisn);
        errors.require_text("name", &self.name);
        errors.require("classroom_id", &self.classroom_id);
        errors
    }
}

impl FormDraft for AcademicYearDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_text("label", &self.label);
        if !self.label.trim().is_empty() && !is_school_year_label(&self.label) {
            errors.push("label", "must look like 2024/2025");
        }
        errors
    }
}

/// `YYYY/YYYY` where the second year follows the first.
fn is_school_year_label(label: &str) -> bool {
    let Some((start, end)) = label.trim().split_once('/') else {
        return false;
    };
    match (start.parse::<u32>(), end.parse::<u32>()) {
        (Ok(start), Ok(end)) => start.to_string().len() == 4 && end == start + 1,
        _ => false,
    }
}

impl FormDraft for IndicatorDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("subject_id", &self.subject_id);
        errors.require_text("code", &self.code);
        errors.require_text("description", &self.description);
        errors
    }
}

impl FormDraft for AttendanceReportDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("student_id", &self.student_id);
        errors.require("classroom_id", &self.classroom_id);
        errors.require("academic_year_id", &self.academic_year_id);
        let total = self
            .sick_days
            .saturating_add(self.permitted_days)
            .saturating_add(self.absent_days);
        if total > MAX_SCHOOL_DAYS {
            errors.push("absent_days", "more days recorded than a school year has");
        }
        errors
    }
}

impl FormDraft for IndicatorReportDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("student_id", &self.student_id);
        errors.require("classroom_id", &self.classroom_id);
        errors.require("academic_year_id", &self.academic_year_id);
        errors.require("subject_id", &self.subject_id);
        errors.require("indicator_id", &self.indicator_id);
        errors.require("score", &self.score);
        within(&mut errors, "score", self.score, 100.0);
        errors
    }
}

impl FormDraft for LifeSkillReportDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("student_id", &self.student_id);
        errors.require("classroom_id", &self.classroom_id);
        errors.require("academic_year_id", &self.academic_year_id);
        errors.require_text("skill", &self.skill);
        errors.require("grade", &self.grade);
        errors
    }
}

impl FormDraft for HealthReportDraft {
    fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("student_id", &self.student_id);
        errors.require("classroom_id", &self.classroom_id);
        errors.require("academic_year_id", &self.academic_year_id);
        errors.require("height_cm", &self.height_cm);
        errors.require("weight_kg", &self.weight_kg);
        within(&mut errors, "height_cm", self.height_cm, 300.0);
        within(&mut errors, "weight_kg", self.weight_kg, 500.0);
        errors
    }
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
