use crate::probe::{
    HealthInfo, HealthProbe, InfoReply, ProbeOutcome, ServerInfo, decode_info_reply,
    encode_info_request,
};
use crate::{SupervisorError, SupervisorResult};

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::panic::Location;
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use log::debug;
use tokio::net::UdpSocket;
use tokio::time::Instant;

const MAX_PACKET_SIZE: usize = 1400;
const MAX_CHALLENGES: usize = 3;

/// Health probe speaking the Source engine `A2S_INFO` query over UDP.
pub struct A2sProbe {
    addr: SocketAddr,
    timeout: Duration,
}

impl A2sProbe {
    pub fn new(addr: SocketAddr, timeout: Duration) -> Self {
        Self { addr, timeout }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run one query. Latency covers the whole exchange, challenge included.
    pub async fn query(&self) -> SupervisorResult<HealthInfo> {
        let start = Instant::now();

        let info = tokio::time::timeout(self.timeout, self.exchange())
            .await
            .map_err(|_| SupervisorError::ProbeTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
                location: ErrorLocation::from(Location::caller()),
            })??;

        Ok(HealthInfo {
            server_name: info.name,
            map_name: info.map,
            player_count: u32::from(info.players),
            max_players: u32::from(info.max_players),
            ping_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn exchange(&self) -> SupervisorResult<ServerInfo> {
        let bind: SocketAddr = if self.addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind).await?;
        socket.connect(self.addr).await?;

        let mut request = encode_info_request(None);
        let mut buf = [0u8; MAX_PACKET_SIZE];

        for _ in 0..=MAX_CHALLENGES {
            socket.send(&request).await?;
            let len = socket.recv(&mut buf).await?;

            match decode_info_reply(&buf[..len])? {
                InfoReply::Info(info) => return Ok(info),
                InfoReply::Challenge(challenge) => {
                    debug!("{} answered with a challenge, resending", self.addr);
                    request = encode_info_request(Some(challenge));
                }
            }
        }

        Err(SupervisorError::protocol(
            "server kept answering with challenges",
        ))
    }
}

#[async_trait]
impl HealthProbe for A2sProbe {
    async fn probe(&self) -> ProbeOutcome {
        match self.query().await {
            Ok(info) => ProbeOutcome::Reachable(info),
            Err(e) => {
                debug!("Probe of {} failed: {e}", self.addr);
                ProbeOutcome::Unreachable
            }
        }
    }
}
