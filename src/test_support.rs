use axum::Router;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend crashed");
    });
    format!("http://{addr}")
}
