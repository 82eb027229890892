//! Ephemeral host-port allocation (spec.md §4.6).
//!
//! Binds a listener on `0.0.0.0:0`, reads the kernel-assigned port, then
//! closes the listener and hands the number back. There is an unavoidable
//! race between close and the runtime's later re-bind; callers must invoke
//! this as late as possible before spawn, never during config parsing
//! (spec.md §4.6).

use shared::Error;
use tokio::net::{TcpListener, UdpSocket};

pub async fn allocate(protocol: &str) -> Result<u16, Error> {
    match protocol {
        "udp" => allocate_udp().await,
        _ => allocate_tcp().await,
    }
}

async fn allocate_tcp() -> Result<u16, Error> {
    let listener = TcpListener::bind("0.0.0.0:0")
        .await
        .map_err(|e| Error::Io(format!("allocating tcp port: {}", e)))?;
    let port = listener
        .local_addr()
        .map_err(|e| Error::Io(format!("reading allocated tcp port: {}", e)))?
        .port();
    drop(listener);
    Ok(port)
}

async fn allocate_udp() -> Result<u16, Error> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| Error::Io(format!("allocating udp port: {}", e)))?;
    let port = socket
        .local_addr()
        .map_err(|e| Error::Io(format!("reading allocated udp port: {}", e)))?
        .port();
    drop(socket);
    Ok(port)
}
