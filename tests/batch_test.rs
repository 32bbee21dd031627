mod common;

use common::{fast_timeouts, Action, FakePortal, HOME_URL};
use pje_pdf_opener::{
    BatchContext, BatchProcessor, CompletionLog, DebugArtifacts, ProcessFlow, RunSummary,
};

const FIRST: &str = "12345678920231400001";
const UNKNOWN: &str = "99999999999999999999";

fn processor(dir: &std::path::Path) -> BatchProcessor {
    BatchProcessor::new(
        ProcessFlow::new(fast_timeouts(), DebugArtifacts::new(dir)),
        HOME_URL.to_string(),
        fast_timeouts(),
    )
}

#[tokio::test]
async fn test_only_opened_processes_are_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.txt");
    let log = CompletionLog::load(&log_path).unwrap();
    let portal = FakePortal::happy_panel(&["1234567-89.2023.1.40.0001"]);
    let mut ctx = BatchContext::new(portal, vec![FIRST.to_string(), UNKNOWN.to_string()], log);

    let summary = processor(dir.path()).run(&mut ctx).await;

    assert_eq!(
        summary,
        RunSummary {
            opened: 1,
            failed: 1,
            skipped: 0,
            total: 2,
        }
    );
    let on_disk = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(on_disk.lines().collect::<Vec<_>>(), vec![FIRST]);
    assert!(ctx.log.contains(FIRST));
    assert!(!ctx.log.contains(UNKNOWN));

    // 第二个案件开始前回到首页
    let navigations: Vec<Action> = ctx
        .driver
        .actions()
        .into_iter()
        .filter(|a| matches!(a, Action::Navigate(_)))
        .collect();
    assert_eq!(navigations, vec![Action::Navigate(HOME_URL.to_string())]);
}

#[tokio::test]
async fn test_duplicate_rows_are_skipped_once_done() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.txt");
    let log = CompletionLog::load(&log_path).unwrap();
    let portal = FakePortal::happy_panel(&["1234567-89.2023.1.40.0001"]);
    let mut ctx = BatchContext::new(portal, vec![FIRST.to_string(), FIRST.to_string()], log);

    let summary = processor(dir.path()).run(&mut ctx).await;

    assert_eq!(summary.opened, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(std::fs::read_to_string(&log_path).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn test_failures_leave_log_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.txt");
    let log = CompletionLog::load(&log_path).unwrap();
    let portal = FakePortal::happy_panel(&[]);
    let mut ctx = BatchContext::new(portal, vec![UNKNOWN.to_string()], log);

    let summary = processor(dir.path()).run(&mut ctx).await;

    assert_eq!(summary.failed, 1);
    assert!(!log_path.exists());
    assert!(ctx.log.is_empty());
}

#[tokio::test]
async fn test_previous_run_log_yields_no_pending() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.txt");
    std::fs::write(&log_path, format!("{}\n", FIRST)).unwrap();

    let log = CompletionLog::load(&log_path).unwrap();
    assert!(log.pending(&[FIRST.to_string()]).is_empty());
    assert_eq!(log.pending(&[FIRST.to_string(), UNKNOWN.to_string()]), vec![UNKNOWN]);
}
