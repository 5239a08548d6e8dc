//! 本地 mock HTTP 服务（仅测试）

use axum::Router;

/// 在随机端口启动 router，返回 `http://127.0.0.1:{port}`
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
