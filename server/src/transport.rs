use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::UdpSocket;

use crate::errors::TransportError;

/// The server's single datagram endpoint
///
/// Cheap to clone; every clone shares the same socket.
#[derive(Debug, Clone)]
pub struct Transport {
    socket: Arc<UdpSocket>,
    max_datagram: usize,
}

impl Transport {
    /// Bind the endpoint
    pub async fn bind(addr: SocketAddr, max_datagram: usize) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .with_context(|| format!("Failed to bind UDP socket on {}", addr))?;

        Ok(Self {
            socket: Arc::new(socket),
            max_datagram,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }

    /// Send one text datagram
    pub async fn send(&self, addr: SocketAddr, text: &str) -> Result<(), TransportError> {
        self.socket.send_to(text.as_bytes(), addr).await?;
        Ok(())
    }

    /// Receive the next datagram as text with trailing whitespace removed
    ///
    /// Datagrams longer than `max_datagram` are rejected rather than
    /// truncated.
    pub async fn recv(&self) -> Result<(String, SocketAddr), TransportError> {
        // one spare byte tells an exact fit apart from an oversized datagram
        let mut buf = vec![0u8; self.max_datagram + 1];
        let (n, from) = self.socket.recv_from(&mut buf).await?;

        if n > self.max_datagram {
            return Err(TransportError::Oversized {
                from,
                max: self.max_datagram,
            });
        }

        buf.truncate(n);
        let text = String::from_utf8(buf).map_err(|_| TransportError::NotUtf8 { from })?;

        Ok((text.trim_end().to_string(), from))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn create_pair(max: usize) -> (Transport, UdpSocket) {
        let server = Transport::bind(SocketAddr::from(([127, 0, 0, 1], 0)), max)
            .await
            .unwrap();
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        (server, client)
    }

    async fn recv_soon(transport: &Transport) -> Result<(String, SocketAddr), TransportError> {
        tokio::time::timeout(Duration::from_secs(5), transport.recv())
            .await
            .expect("datagram should arrive")
    }

    #[tokio::test]
    async fn test_recv_trims_trailing_newline() {
        let (server, client) = create_pair(64).await;
        client
            .send_to(b"LOGIN:ash\r\n", server.local_addr().unwrap())
            .await
            .unwrap();

        let (text, from) = recv_soon(&server).await.unwrap();
        assert_eq!(text, "LOGIN:ash");
        assert_eq!(from, client.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_oversized_datagram_rejected() {
        let (server, client) = create_pair(8).await;
        let to = server.local_addr().unwrap();

        client.send_to(b"123456789", to).await.unwrap();
        assert!(matches!(
            recv_soon(&server).await,
            Err(TransportError::Oversized { max: 8, .. })
        ));

        client.send_to(b"12345678", to).await.unwrap();
        assert_eq!(recv_soon(&server).await.unwrap().0, "12345678");
    }

    #[tokio::test]
    async fn test_non_utf8_datagram_rejected() {
        let (server, client) = create_pair(64).await;
        client
            .send_to(&[0xff, 0xfe, 0x00], server.local_addr().unwrap())
            .await
            .unwrap();

        assert!(matches!(
            recv_soon(&server).await,
            Err(TransportError::NotUtf8 { .. })
        ));
    }

    #[tokio::test]
    async fn test_send_reaches_client() {
        let (server, client) = create_pair(64).await;
        server
            .send(client.local_addr().unwrap(), "You win!")
            .await
            .unwrap();

        let mut buf = [0u8; 64];
        let (n, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf[..n], b"You win!");
    }
}
