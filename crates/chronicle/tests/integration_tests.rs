use chronicle::activity::ActivityLog;
use chronicle::Level;
use tempfile::TempDir;

#[test]
fn test_console_helpers_do_not_panic() {
  chronicle::info("info message");
  chronicle::warn("warning message");
  chronicle::error("error message");
  chronicle::debug("debug message");
  chronicle::success("success message");
  chronicle::info!("formatted {} message", "info");
}

#[tokio::test]
async fn test_clones_share_one_log_file() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("shared.jsonl");

  let log = ActivityLog::open_with_silent(&path, true).unwrap();
  let other = log.clone();

  log.info("from the original", "test").await;
  other.info("from the clone", "test").await;

  let entries = log.entries(None, Some(Level::Info)).await.unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[1].message, "from the clone");
}
