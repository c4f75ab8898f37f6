mod common;

use answer_sheet_etl::{BatchEntry, BatchKey, TableSession};
use common::{text_field, write_pdf};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_session_reuses_table_until_upload_changes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_pdf(dir.path(), "a.pdf", Some(vec![text_field("Math_1", "3")]));
    let batch = vec![BatchEntry::from_path(&path)];

    let mut session = TableSession::new();
    let first = session.tabulate(&batch);
    let again = session.tabulate(&batch);
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(first.table.get(0, "Math_1"), Some("3"));

    // 重新上傳同名檔案但內容不同
    let key_before = BatchKey::of(&batch);
    write_pdf(dir.path(), "a.pdf", Some(vec![text_field("Math_1", "5")]));
    assert_ne!(BatchKey::of(&batch), key_before);

    let updated = session.tabulate(&batch);
    assert!(!Arc::ptr_eq(&first, &updated));
    assert_eq!(updated.table.get(0, "Math_1"), Some("5"));
    Ok(())
}
