//! Acceptance tests: a JSON Lines file paged through `PagedList` and rendered
//! by `LineViewFactory`.

use pagelist::integration::PagedList;
use pagelist::model::{FetchError, TriggerRef};
use pagelist::source::JsonlFileProvider;
use pagelist::state::ListConfig;
use pagelist::view::{LineViewFactory, ViewportGate};
use ratatui::text::Line;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;

const TRIGGER: TriggerRef = TriggerRef::new(1);

type List = PagedList<JsonlFileProvider, LineViewFactory, ViewportGate>;

const EVENTS: &str = r#"{"id":"a","msg":"boot","level":"info"}
{"id":"b","msg":"disk almost full","level":"warn"}
{"id":"c","msg":"shutdown","level":"info"}
"#;

struct TempFile(PathBuf);

impl TempFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "pagelist_acceptance_{name}_{}.jsonl",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        Self(path)
    }

    fn rewrite(&self, contents: &str) {
        fs::write(&self.0, contents).unwrap();
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

fn mount(file: &TempFile, page_size: usize, auto_refresh: bool) -> (List, Rc<ViewportGate>) {
    let mut config = ListConfig::new().with_page_size(page_size).unwrap();
    if auto_refresh {
        config = config.with_auto_refresh(Duration::from_secs(3600));
    }
    let provider = JsonlFileProvider::new(&file.0);
    let factory = LineViewFactory::new("id", 40).with_summary_field("msg");
    let gate = Rc::new(ViewportGate::new());
    let list = PagedList::mount(provider, factory, Rc::clone(&gate), TRIGGER, config);
    (list, gate)
}

/// Poll until `done` holds; file reads complete on the blocking pool.
async fn wait_for(mut done: impl FnMut() -> bool) {
    for _ in 0..400 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

async fn load_page(list: &List, gate: &ViewportGate) {
    gate.observe(TRIGGER, false);
    gate.observe(TRIGGER, true);
    wait_for(|| !list.with_session(|s| s.is_loading())).await;
}

fn text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn screen(list: &List) -> String {
    list.with_session(|s| s.fragments().map(text).collect::<Vec<_>>().join("\n"))
}

#[tokio::test]
async fn file_pages_render_until_exhausted() {
    LocalSet::new()
        .run_until(async {
            let file = TempFile::new("pages", EVENTS);
            let (list, gate) = mount(&file, 2, false);

            load_page(&list, &gate).await;
            assert_eq!(list.with_session(|s| s.keys().join(",")), "a,b");

            load_page(&list, &gate).await;
            load_page(&list, &gate).await;

            insta::assert_snapshot!(screen(&list), @r"
            ▸ a  boot
              level: info
            ▸ b  disk almost full
              level: warn
            ▸ c  shutdown
              level: info
            ");
            assert!(!list.with_session(|s| s.has_trigger()));
            assert_eq!(list.with_session(|s| s.current_page()), 3);
        })
        .await;
}

#[tokio::test]
async fn graceful_update_picks_up_file_edits() {
    LocalSet::new()
        .run_until(async {
            let file = TempFile::new("edits", EVENTS);
            let (list, gate) = mount(&file, 2, true);
            load_page(&list, &gate).await;
            load_page(&list, &gate).await;

            file.rewrite(
                r#"{"id":"z","msg":"late arrival","level":"info"}
{"id":"a","msg":"boot","level":"info"}
{"id":"b","msg":"disk full","level":"error"}
{"id":"c","msg":"shutdown","level":"info"}
"#,
            );
            list.trigger_update(true).unwrap();
            wait_for(|| !list.with_session(|s| s.is_refreshing())).await;

            insta::assert_snapshot!(screen(&list), @r"
            ▸ z  late arrival
              level: info
            ▸ a  boot
              level: info
            ▸ b  disk full
              level: error
            ▸ c  shutdown
              level: info
            ");
            assert_eq!(list.with_session(|s| s.factory().live_views()), 4);
            assert_eq!(list.with_session(|s| s.prepended_fragments()), 2);
        })
        .await;
}

#[tokio::test]
async fn filter_matches_raw_line_text() {
    LocalSet::new()
        .run_until(async {
            let file = TempFile::new(
                "filter",
                &format!("{EVENTS}not json at all\n{{\"id\":\"d\",\"msg\":\"WARN again\"}}\n"),
            );
            let (list, gate) = mount(&file, 10, false);

            assert!(list.set_filter("warn"));
            load_page(&list, &gate).await;

            assert_eq!(list.with_session(|s| s.keys().join(",")), "b,d");
        })
        .await;
}

#[tokio::test]
async fn missing_file_is_reported_to_host() {
    LocalSet::new()
        .run_until(async {
            let file = TempFile::new("missing", "");
            fs::remove_file(&file.0).unwrap();
            let (list, gate) = mount(&file, 10, false);
            let errors = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&errors);
            list.on_load_error(move |err| sink.borrow_mut().push(err.clone()));

            load_page(&list, &gate).await;

            let errors = errors.borrow();
            assert_eq!(errors.len(), 1);
            assert!(matches!(&errors[0], FetchError::Io { path, .. } if *path == file.0));
            assert!(list.with_session(|s| s.is_empty()));
            assert!(list.with_session(|s| s.has_trigger()));
        })
        .await;
}
