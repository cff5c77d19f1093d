use peerlink::share::{self, OfferRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

//===============
// Test Helpers
//===============

fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

async fn write_test_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    tokio::fs::write(&path, content)
        .await
        .expect("Failed to write test file");
    path
}

/// Register a file, bind its one-shot listener, and spawn the serve task,
/// mirroring what the upload handler does after staging.
async fn start_offer(registry: &Arc<OfferRegistry>, path: PathBuf) -> u16 {
    let code = registry.register(path);
    let listener = share::bind(code).await.expect("Failed to bind offer port");
    let registry = registry.clone();
    tokio::spawn(async move {
        share::serve(registry, code, listener).await;
    });
    code
}

/// A port that nothing listens on: bind an ephemeral listener to claim a
/// free port number, then drop it.
fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe");
    listener.local_addr().expect("probe addr").port()
}

//===============
// Round Trips
//===============

#[tokio::test]
async fn fetch_returns_filename_and_exact_content() {
    let dir = setup_temp_dir();
    let path = write_test_file(&dir, "a.txt", b"hello").await;

    let registry = Arc::new(OfferRegistry::new());
    let code = start_offer(&registry, path).await;

    let fetched = share::fetch(code).await.expect("fetch");
    assert_eq!(fetched.file_name, "a.txt");
    assert_eq!(fetched.content, b"hello");
}

#[tokio::test]
async fn fetch_round_trips_binary_content() {
    let dir = setup_temp_dir();
    let content: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
    let path = write_test_file(&dir, "blob.bin", &content).await;

    let registry = Arc::new(OfferRegistry::new());
    let code = start_offer(&registry, path).await;

    let fetched = share::fetch(code).await.expect("fetch");
    assert_eq!(fetched.file_name, "blob.bin");
    assert_eq!(fetched.content, content);
}

#[tokio::test]
async fn header_carries_the_base_name_not_the_path() {
    let dir = setup_temp_dir();
    tokio::fs::create_dir_all(dir.path().join("nested/deeper"))
        .await
        .expect("mkdir");
    let path = write_test_file(&dir, "nested/deeper/a.txt", b"hi").await;

    let registry = Arc::new(OfferRegistry::new());
    let code = start_offer(&registry, path).await;

    let fetched = share::fetch(code).await.expect("fetch");
    assert_eq!(fetched.file_name, "a.txt");
}

#[tokio::test]
async fn empty_file_round_trips() {
    let dir = setup_temp_dir();
    let path = write_test_file(&dir, "empty.txt", b"").await;

    let registry = Arc::new(OfferRegistry::new());
    let code = start_offer(&registry, path).await;

    let fetched = share::fetch(code).await.expect("fetch");
    assert_eq!(fetched.file_name, "empty.txt");
    assert!(fetched.content.is_empty());
}

//===============
// One-Shot Semantics
//===============

#[tokio::test]
async fn second_fetch_after_a_served_offer_fails() {
    let dir = setup_temp_dir();
    let path = write_test_file(&dir, "once.txt", b"only one").await;

    let registry = Arc::new(OfferRegistry::new());
    let code = start_offer(&registry, path).await;

    let first = share::fetch(code).await.expect("first fetch");
    assert_eq!(first.content, b"only one");

    // the sender closed the stream and the listener is gone
    assert!(share::fetch(code).await.is_err());
}

#[tokio::test]
async fn racing_fetches_never_both_receive_full_content() {
    let dir = setup_temp_dir();
    let content = b"winner takes all".to_vec();
    let path = write_test_file(&dir, "race.txt", &content).await;

    let registry = Arc::new(OfferRegistry::new());
    let code = start_offer(&registry, path).await;

    let (first, second) = tokio::join!(share::fetch(code), share::fetch(code));
    let full_copies = [first, second]
        .into_iter()
        .filter(|result| {
            result
                .as_ref()
                .map(|fetched| fetched.content == content)
                .unwrap_or(false)
        })
        .count();
    assert_eq!(full_copies, 1);
}

#[tokio::test]
async fn fetch_of_an_unregistered_code_is_a_connection_error() {
    let err = share::fetch(free_port()).await.expect_err("must fail");
    assert!(err.to_string().contains("failed to connect"));
}

#[tokio::test]
async fn serve_without_a_registry_entry_closes_the_listener() {
    let registry = Arc::new(OfferRegistry::new());
    let code = free_port();
    let listener = share::bind(code).await.expect("bind");

    // no entry for `code`: serve must give up without accepting
    tokio::time::timeout(
        Duration::from_secs(1),
        share::serve(registry, code, listener),
    )
    .await
    .expect("serve should return immediately");

    assert!(share::fetch(code).await.is_err());
}

#[tokio::test]
async fn binding_a_taken_port_fails_synchronously() {
    let holder = tokio::net::TcpListener::bind("0.0.0.0:0")
        .await
        .expect("bind holder");
    let taken = holder.local_addr().expect("addr").port();

    assert!(share::bind(taken).await.is_err());
}
