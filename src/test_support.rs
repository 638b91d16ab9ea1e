use crate::cli::GlobalArgs;
use crate::context::StoreContext;
use crate::fs::atomic_write_file;
use crate::store::FileLockStore;
use tempfile::TempDir;

/// Config used by command tests: one repository with a reader, two writers
/// and a maintainer.
pub(crate) const TEST_CONFIG: &str = r#"
documentation_url: https://example.test/docs/locking
users:
  alice:
    name: Alice Liddell
  bob:
    name: Bob
  carol:
    name: Carol
  admin:
    name: Admin
repositories:
  games/tower:
    readers: [carol]
    writers: [alice, bob]
    maintainers: [admin]
"#;

/// Create an initialized state root in a temporary directory.
pub(crate) fn create_test_root(config: &str) -> (TempDir, StoreContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = StoreContext::at(temp_dir.path().join(".assetlock"));

    FileLockStore::open(ctx.store_dir()).unwrap();
    std::fs::create_dir_all(ctx.events_dir()).unwrap();
    atomic_write_file(ctx.config_path(), config).unwrap();

    (temp_dir, ctx)
}

/// Global flags pointing at `ctx` as `user`.
pub(crate) fn global_as(ctx: &StoreContext, user: &str) -> GlobalArgs {
    GlobalArgs {
        root: Some(ctx.root.clone()),
        user: Some(user.to_string()),
    }
}
