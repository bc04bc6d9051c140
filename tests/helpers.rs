// Shared test helpers: a scripted SOCKS5 server for handshake tests.
//
// The server speaks just enough of RFC 1928/1929 to exercise the probe's
// greeting and credential sub-negotiation paths.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use stream_status::ProxyConfig;

/// What the scripted SOCKS5 server does after accepting a connection.
#[derive(Clone, Copy, Debug)]
pub enum SocksBehavior {
    /// `05 00` to the greeting, `05 00` to a credential message.
    AcceptAll,
    /// `05 01` to the greeting (no acceptable method).
    RejectGreeting,
    /// Accept the greeting but reject the credential sub-negotiation.
    RejectAuth,
    /// Accept the connection and never write anything.
    Silent,
}

/// Spawns the scripted server on an ephemeral port and returns its address.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_socks_server(behavior: SocksBehavior) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind scripted SOCKS server");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle_connection(stream, behavior));
        }
    });

    addr
}

async fn handle_connection(mut stream: TcpStream, behavior: SocksBehavior) {
    if matches!(behavior, SocksBehavior::Silent) {
        tokio::time::sleep(Duration::from_secs(60)).await;
        return;
    }

    let mut greeting = [0u8; 3];
    if stream.read_exact(&mut greeting).await.is_err() {
        return;
    }

    if matches!(behavior, SocksBehavior::RejectGreeting) {
        let _ = stream.write_all(&[0x05, 0x01]).await;
        return;
    }

    if stream.write_all(&[0x05, 0x00]).await.is_err() {
        return;
    }

    // Optional credential message: version, ulen, username, plen, password.
    let mut header = [0u8; 2];
    if stream.read_exact(&mut header).await.is_err() {
        return;
    }
    let ulen = header[1] as usize;
    let mut username_and_plen = vec![0u8; ulen + 1];
    if stream.read_exact(&mut username_and_plen).await.is_err() {
        return;
    }
    let plen = username_and_plen[ulen] as usize;
    let mut password = vec![0u8; plen];
    if plen > 0 && stream.read_exact(&mut password).await.is_err() {
        return;
    }

    let reply = if matches!(behavior, SocksBehavior::AcceptAll) {
        [0x05, 0x00]
    } else {
        [0x05, 0x01]
    };
    let _ = stream.write_all(&reply).await;
}

/// Proxy configuration pointing at a scripted server.
#[allow(dead_code)] // Used by other test files
pub fn proxy_for(addr: SocketAddr, username: Option<&str>, password: Option<&str>) -> ProxyConfig {
    ProxyConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        username: username.map(str::to_string),
        password: password.map(str::to_string),
    }
}
