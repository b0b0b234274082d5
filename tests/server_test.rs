use booktrack::server;
use std::io::ErrorKind;

#[tokio::test]
async fn test_bind_listener_uses_exact_port() {
    // Let the OS pick a free port, then release it and bind it by number
    let free = tokio::net::TcpListener::bind("0.0.0.0:0").await.unwrap();
    let port = free.local_addr().unwrap().port();
    drop(free);

    let listener = server::bind_listener(port).await.unwrap();
    assert_eq!(listener.local_addr().unwrap().port(), port);
}

#[tokio::test]
async fn test_bind_listener_fails_on_busy_port() {
    let taken = tokio::net::TcpListener::bind("0.0.0.0:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let err = server::bind_listener(port).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AddrInUse);
}
