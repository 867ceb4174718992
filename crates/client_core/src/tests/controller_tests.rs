use super::*;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicI64, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{Gender, Teacher, TeacherId},
    protocol::TeacherDraft,
};

use crate::resources::Teachers;

struct FakeTeacherGateway {
    rows: Mutex<Vec<Teacher>>,
    next_id: AtomicI64,
    calls: Mutex<Vec<&'static str>>,
    list_delay: Option<Duration>,
    oversized_pages: bool,
    fail_list: AtomicBool,
    fail_delete: bool,
}

impl FakeTeacherGateway {
    fn with_teachers(count: i64) -> Self {
        let rows = (1..=count)
            .map(|i| Teacher {
                id: TeacherId(i),
                name: if i % 2 == 0 {
                    format!("Guru Ahmad {i}")
                } else {
                    format!("Ibu Sari {i}")
                },
                nip: format!("19800101200501{i:04}"),
                gender: if i % 2 == 0 { Gender::Male } else { Gender::Female },
                role_ids: Vec::new(),
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
            next_id: AtomicI64::new(count + 1),
            calls: Mutex::new(Vec::new()),
            list_delay: None,
            oversized_pages: false,
            fail_list: AtomicBool::new(false),
            fail_delete: false,
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    fn oversized(mut self) -> Self {
        self.oversized_pages = true;
        self
    }

    fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls").clone()
    }

    fn record_call(&self, name: &'static str) {
        self.calls.lock().expect("calls").push(name);
    }
}

#[async_trait]
impl ResourceGateway<Teachers> for FakeTeacherGateway {
    async fn list(&self, query: &ListQuery) -> Result<Page<Teacher>, GatewayError> {
        self.record_call("list");
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                path: "teachers".to_string(),
                status: 503,
                message: "maintenance".to_string(),
                body: None,
            });
        }

        let rows = self.rows.lock().expect("rows");
        let needle = query.search.clone().unwrap_or_default().to_lowercase();
        let matching: Vec<Teacher> = rows
            .iter()
            .filter(|t| needle.is_empty() || t.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let items = if self.oversized_pages {
            matching
        } else {
            let start = ((query.page - 1) * query.page_size) as usize;
            matching
                .into_iter()
                .skip(start)
                .take(query.page_size as usize)
                .collect()
        };
        Ok(Page {
            items,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }

    async fn get(&self, id: TeacherId) -> Result<Teacher, GatewayError> {
        self.record_call("get");
        self.rows
            .lock()
            .expect("rows")
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(GatewayError::NotFound {
                path: format!("teachers/{id}"),
            })
    }

    async fn create(&self, draft: &TeacherDraft) -> Result<Teacher, GatewayError> {
        self.record_call("create");
        let teacher = Teacher {
            id: TeacherId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            name: draft.name.clone(),
            nip: draft.nip.clone(),
            gender: draft.gender,
            role_ids: draft.role_ids.clone(),
        };
        self.rows.lock().expect("rows").push(teacher.clone());
        Ok(teacher)
    }

    async fn update(&self, id: TeacherId, draft: &TeacherDraft) -> Result<Teacher, GatewayError> {
        self.record_call("update");
        let mut rows = self.rows.lock().expect("rows");
        let teacher = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(GatewayError::NotFound {
                path: format!("teachers/{id}"),
            })?;
        teacher.name = draft.name.clone();
        teacher.nip = draft.nip.clone();
        teacher.gender = draft.gender;
        Ok(teacher.clone())
    }

    async fn delete(&self, id: TeacherId) -> Result<(), GatewayError> {
        self.record_call("delete");
        if self.fail_delete {
            return Err(GatewayError::NotFound {
                path: format!("teachers/{id}"),
            });
        }
        self.rows.lock().expect("rows").retain(|t| t.id != id);
        Ok(())
    }
}

type TeacherPage = PageController<Teachers, FakeTeacherGateway>;

fn controller(
    gateway: FakeTeacherGateway,
    page_size: u32,
) -> (TeacherPage, Arc<FakeTeacherGateway>) {
    let gateway = Arc::new(gateway);
    (PageController::new(Arc::clone(&gateway), page_size), gateway)
}

#[tokio::test]
async fn refresh_loads_first_page() {
    let (mut page, _) = controller(FakeTeacherGateway::with_teachers(25), 10);

    assert!(page.refresh().await);
    assert_eq!(page.rows().len(), 10);
    assert_eq!(page.total(), 25);
    assert_eq!(page.page_count(), 3);
    assert_eq!(page.status(), &PageStatus::Idle);
    assert!(!page.has_previous_page());
    assert!(page.has_next_page());
}

#[tokio::test]
async fn displayed_rows_never_exceed_page_size() {
    let (mut page, _) = controller(FakeTeacherGateway::with_teachers(40), 10);

    for page_size in [1, 3, 10, 50] {
        for search in ["", "guru", "ibu sari 3", "nobody"] {
            let ticket = page.set_page_size(page_size);
            let outcome = TeacherPage::run_fetch(Arc::clone(page.gateway()), ticket).await;
            page.apply_fetch(outcome);
            let ticket = page.set_search(search);
            let outcome = TeacherPage::run_fetch(Arc::clone(page.gateway()), ticket).await;
            page.apply_fetch(outcome);
            assert!(
                page.rows().len() <= page_size as usize,
                "{} rows shown for page size {page_size} and search {search:?}",
                page.rows().len()
            );
        }
    }
}

#[tokio::test]
async fn oversized_server_pages_are_truncated_for_display() {
    let (mut page, _) = controller(FakeTeacherGateway::with_teachers(12).oversized(), 5);

    page.refresh().await;
    assert_eq!(page.rows().len(), 5);
    assert_eq!(page.total(), 12);
}

#[tokio::test]
async fn missing_required_field_issues_no_network_call() {
    let (mut page, gateway) = controller(FakeTeacherGateway::with_teachers(3), 10);
    page.refresh().await;

    page.open_create();
    if let Some(editor) = page.editor_mut() {
        editor.draft_mut().nip = "198001012005011001".to_string();
    }
    let outcome = page.save().await;

    assert_eq!(outcome, ActionOutcome::Invalid);
    assert_eq!(gateway.calls(), vec!["list"]);
    let editor = page.editor().expect("editor stays open");
    assert!(editor.errors().has_field("name"));
    assert_eq!(
        page.notifications().latest().map(|n| n.level),
        Some(Level::Warning)
    );
}

#[tokio::test]
async fn editing_with_cleared_field_issues_no_network_call() {
    let (mut page, gateway) = controller(FakeTeacherGateway::with_teachers(3), 10);
    page.refresh().await;

    assert!(page.open_edit(TeacherId(2)));
    if let Some(editor) = page.editor_mut() {
        editor.draft_mut().nip.clear();
    }
    assert_eq!(page.save().await, ActionOutcome::Invalid);
    assert!(!gateway.calls().contains(&"update"));
}

#[tokio::test]
async fn successful_create_closes_editor_and_refetches() {
    let (mut page, gateway) = controller(FakeTeacherGateway::with_teachers(2), 10);
    page.refresh().await;

    page.open_create();
    if let Some(editor) = page.editor_mut() {
        let draft = editor.draft_mut();
        draft.name = "Bapak Joko".to_string();
        draft.nip = "197912312006041002".to_string();
    }
    assert_eq!(page.save().await, ActionOutcome::Completed);

    assert!(page.editor().is_none());
    assert_eq!(gateway.calls(), vec!["list", "create", "list"]);
    assert_eq!(page.total(), 3);
    assert!(page.rows().iter().any(|t| t.name == "Bapak Joko"));
    assert_eq!(
        page.notifications().latest().map(|n| n.level),
        Some(Level::Success)
    );
}

#[tokio::test]
async fn successful_edit_updates_row() {
    let (mut page, gateway) = controller(FakeTeacherGateway::with_teachers(2), 10);
    page.refresh().await;

    assert!(page.open_edit(TeacherId(1)));
    if let Some(editor) = page.editor_mut() {
        assert_eq!(editor.mode(), EditorMode::Edit(TeacherId(1)));
        editor.draft_mut().name = "Ibu Sari Renamed".to_string();
    }
    assert_eq!(page.save().await, ActionOutcome::Completed);
    assert!(gateway.calls().contains(&"update"));
    assert_eq!(page.rows()[0].name, "Ibu Sari Renamed");
}

#[tokio::test]
async fn deleted_id_is_absent_from_next_page() {
    let (mut page, gateway) = controller(FakeTeacherGateway::with_teachers(15), 10);
    page.refresh().await;
    assert!(page.rows().iter().any(|t| t.id == TeacherId(4)));

    assert_eq!(page.delete(TeacherId(4)).await, ActionOutcome::Completed);

    assert_eq!(gateway.calls(), vec!["list", "delete", "list"]);
    assert!(page.rows().iter().all(|t| t.id != TeacherId(4)));
    assert_eq!(page.rows().len(), 10);
    assert_eq!(page.total(), 14);
}

#[tokio::test]
async fn failed_delete_keeps_rows_and_notifies() {
    let (mut page, _) = controller(FakeTeacherGateway::with_teachers(3).failing_delete(), 10);
    page.refresh().await;

    assert_eq!(page.delete(TeacherId(2)).await, ActionOutcome::Failed);
    assert_eq!(page.rows().len(), 3);
    assert_eq!(
        page.notifications().latest().map(|n| n.level),
        Some(Level::Warning)
    );
    assert!(!page.is_busy());
}

#[tokio::test]
async fn deleting_last_row_of_a_page_steps_back() {
    let (mut page, _) = controller(FakeTeacherGateway::with_teachers(11), 10);
    let ticket = page.set_page(2);
    let outcome = TeacherPage::run_fetch(Arc::clone(page.gateway()), ticket).await;
    page.apply_fetch(outcome);
    assert_eq!(page.rows().len(), 1);

    page.delete(TeacherId(11)).await;
    assert_eq!(page.query().page, 1);
    assert_eq!(page.rows().len(), 10);
}

#[tokio::test]
async fn stale_response_never_overwrites_newer_data() {
    let (mut page, _) = controller(FakeTeacherGateway::with_teachers(20), 10);

    let first = page.begin_fetch();
    let second = page.set_search("guru");
    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());

    // Both requests race; the older one is run to completion anyway.
    let gateway = Arc::clone(page.gateway());
    let newer = TeacherPage::run_fetch(Arc::clone(&gateway), second).await;
    let older = FetchOutcome::<Teachers> {
        generation: first.generation(),
        result: <FakeTeacherGateway as ResourceGateway<Teachers>>::list(
            &*gateway,
            first.query(),
        )
        .await,
    };

    assert!(page.apply_fetch(newer));
    let filtered: Vec<TeacherId> = page.rows().iter().map(|t| t.id).collect();
    assert!(!page.apply_fetch(older));
    let after: Vec<TeacherId> = page.rows().iter().map(|t| t.id).collect();
    assert_eq!(filtered, after);
    assert!(page.rows().iter().all(|t| t.name.starts_with("Guru")));
}

#[tokio::test]
async fn superseded_request_is_cancelled_without_waiting_for_server() {
    let (mut page, _) = controller(
        FakeTeacherGateway::with_teachers(5).slow(Duration::from_secs(30)),
        10,
    );

    let first = page.begin_fetch();
    let _second = page.begin_fetch();
    let outcome = tokio::time::timeout(
        Duration::from_secs(1),
        TeacherPage::run_fetch(Arc::clone(page.gateway()), first),
    )
    .await
    .expect("cancelled request returns promptly");

    assert!(matches!(outcome.result, Err(GatewayError::Cancelled)));
    assert!(!page.apply_fetch(outcome));
    assert!(page.is_loading());
}

#[tokio::test]
async fn loading_state_gates_mutations() {
    let (mut page, gateway) = controller(FakeTeacherGateway::with_teachers(3), 10);
    page.refresh().await;
    page.open_create();
    if let Some(editor) = page.editor_mut() {
        editor.draft_mut().name = "Bapak Joko".to_string();
        editor.draft_mut().nip = "197912312006041002".to_string();
    }

    let _ticket = page.begin_fetch();
    assert!(matches!(page.prepare_save(), Err(Blocked::Busy)));
    assert!(matches!(page.begin_delete(TeacherId(1)), Err(Blocked::Busy)));
    assert_eq!(gateway.calls(), vec!["list"]);
    assert!(page.editor().is_some());
}

#[tokio::test]
async fn list_failure_keeps_previous_rows() {
    let (mut page, gateway) = controller(FakeTeacherGateway::with_teachers(4), 10);
    page.refresh().await;
    assert_eq!(page.rows().len(), 4);

    gateway.fail_list.store(true, Ordering::SeqCst);
    assert!(page.refresh().await);

    assert_eq!(page.rows().len(), 4);
    assert_eq!(page.status(), &PageStatus::Error("maintenance".to_string()));
    assert_eq!(
        page.notifications().latest().map(|n| n.level),
        Some(Level::Error)
    );
}

#[tokio::test]
async fn route_filters_travel_with_every_request() {
    let (page, _) = controller(FakeTeacherGateway::with_teachers(1), 10);
    let mut page = page.with_filter("classroom_id", 7);
    let ticket = page.set_search("x");
    assert_eq!(
        ticket.query().filters.get("classroom_id").map(String::as_str),
        Some("7")
    );
    let ticket = page.set_page(3);
    assert_eq!(ticket.query().page, 3);
    assert_eq!(
        ticket.query().filters.get("classroom_id").map(String::as_str),
        Some("7")
    );
}

#[test]
fn open_edit_on_missing_row_notifies() {
    let (mut page, _) = controller(FakeTeacherGateway::with_teachers(0), 10);
    assert!(!page.open_edit(TeacherId(99)));
    assert!(page.editor().is_none());
    assert_eq!(page.notifications().len(), 1);
}

#[test]
fn search_page_size_and_filter_changes_return_to_first_page() {
    let (mut page, _) = controller(FakeTeacherGateway::with_teachers(0), 10);

    assert_eq!(page.set_page(3).query().page, 3);
    let ticket = page.set_search("  sari  ");
    assert_eq!(ticket.query().page, 1);
    assert_eq!(ticket.query().search.as_deref(), Some("sari"));

    page.set_page(3);
    let ticket = page.set_page_size(25);
    assert_eq!(ticket.query().page, 1);
    assert_eq!(ticket.query().page_size, 25);

    page.set_page(3);
    let ticket = page.set_filter("gender", Some("female".to_string()));
    assert_eq!(ticket.query().page, 1);
    assert_eq!(
        ticket.query().filters.get("gender").map(String::as_str),
        Some("female")
    );
    assert_eq!(page.query(), ticket.query());
}

#[test]
fn clearing_a_filter_removes_it_from_the_query() {
    let (page, _) = controller(FakeTeacherGateway::with_teachers(0), 10);
    let mut page = page.with_filter("classroom_id", 7);

    page.set_filter("gender", Some("male".to_string()));
    page.set_page(2);
    let ticket = page.set_filter("gender", None);

    assert_eq!(ticket.query().page, 1);
    assert!(!ticket.query().filters.contains_key("gender"));
    assert_eq!(
        ticket.query().filters.get("classroom_id").map(String::as_str),
        Some("7")
    );
    assert!(!ticket
        .query()
        .to_pairs()
        .iter()
        .any(|(key, _)| key == "gender"));
}

#[tokio::test]
async fn leaving_a_page_cancels_its_request() {
    let (mut page, _) = controller(
        FakeTeacherGateway::with_teachers(5).slow(Duration::from_secs(30)),
        10,
    );

    let ticket = page.begin_fetch();
    assert_eq!(page.status(), &PageStatus::Loading);

    page.cancel_inflight();
    assert!(ticket.is_cancelled());
    assert_eq!(page.status(), &PageStatus::Idle);
    assert!(!page.is_busy());

    let outcome = tokio::time::timeout(
        Duration::from_secs(1),
        TeacherPage::run_fetch(Arc::clone(page.gateway()), ticket),
    )
    .await
    .expect("cancelled request returns promptly");
    assert!(matches!(outcome.result, Err(GatewayError::Cancelled)));
}
