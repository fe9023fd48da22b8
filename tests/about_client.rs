use std::sync::Arc;

use anyhow::Result;
use message_board::client::{AboutClient, AboutPage, PageState};
use message_board::server::{router, AppState};
use message_board::MemoryStore;
use tokio::net::TcpListener;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn about_page_loads_from_running_server() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    let app = router(AppState::new(Arc::new(MemoryStore::new())), false);
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = AboutClient::new(&format!("http://127.0.0.1:{port}"))?;
    let mut page = AboutPage::new();
    page.mount(&client).await;

    let PageState::Loaded(content) = page.state() else {
        panic!("about page did not load");
    };
    assert_eq!(content.paragraphs.len(), 3);
    assert_eq!(content.image, "/brian_zou_picture.png");

    let rendered = page.render();
    assert!(rendered.starts_with("About Brian\n"));
    assert!(rendered.contains("[image: /brian_zou_picture.png]"));

    server.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn second_mount_does_not_refetch() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);

    // Nothing is listening yet, so the first (and only) fetch fails.
    let client = AboutClient::new(&format!("http://127.0.0.1:{port}"))?;
    let mut page = AboutPage::new();
    page.mount(&client).await;
    assert!(!page.is_loaded());

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let app = router(AppState::new(Arc::new(MemoryStore::new())), false);
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    page.mount(&client).await;
    assert_eq!(page.state(), &PageState::Unloaded);

    server.abort();
    Ok(())
}
