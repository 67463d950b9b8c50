//! Source engine `A2S_INFO` query codec.
//!
//! Request:  `FF FF FF FF 54 "Source Engine Query\0" [challenge]`
//! Replies:  `FF FF FF FF 41 <challenge:4>` or `FF FF FF FF 49 <info>`

use crate::{SupervisorError, SupervisorResult};

use bytes::{Buf, BufMut, Bytes, BytesMut};

const SIMPLE_HEADER: i32 = -1;
const SPLIT_HEADER: i32 = -2;
const A2S_INFO: u8 = 0x54;
const S2C_CHALLENGE: u8 = 0x41;
const S2A_INFO: u8 = 0x49;
const INFO_QUERY: &[u8] = b"Source Engine Query\0";

/// Fields of an `S2A_INFO` reply up to the bot count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub protocol: u8,
    pub name: String,
    pub map: String,
    pub folder: String,
    pub game: String,
    pub app_id: u16,
    pub players: u8,
    pub max_players: u8,
    pub bots: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoReply {
    /// Resend the query with this challenge appended
    Challenge([u8; 4]),
    Info(ServerInfo),
}

pub fn encode_info_request(challenge: Option<[u8; 4]>) -> Bytes {
    let mut buf = BytesMut::with_capacity(4 + 1 + INFO_QUERY.len() + 4);
    buf.put_i32_le(SIMPLE_HEADER);
    buf.put_u8(A2S_INFO);
    buf.put_slice(INFO_QUERY);
    if let Some(challenge) = challenge {
        buf.put_slice(&challenge);
    }
    buf.freeze()
}

pub fn decode_info_reply(mut buf: &[u8]) -> SupervisorResult<InfoReply> {
    if buf.remaining() < 5 {
        return Err(SupervisorError::protocol(format!(
            "reply of {} bytes is shorter than the header",
            buf.remaining()
        )));
    }

    match buf.get_i32_le() {
        SIMPLE_HEADER => {}
        SPLIT_HEADER => return Err(SupervisorError::protocol("split replies are not supported")),
        other => {
            return Err(SupervisorError::protocol(format!(
                "unexpected packet header {other:#010x}"
            )));
        }
    }

    match buf.get_u8() {
        S2C_CHALLENGE => {
            if buf.remaining() < 4 {
                return Err(SupervisorError::protocol("truncated challenge"));
            }
            let mut challenge = [0u8; 4];
            buf.copy_to_slice(&mut challenge);
            Ok(InfoReply::Challenge(challenge))
        }
        S2A_INFO => parse_info(&mut buf).map(InfoReply::Info),
        kind => Err(SupervisorError::protocol(format!(
            "unexpected reply type {kind:#04x}"
        ))),
    }
}

fn parse_info(buf: &mut &[u8]) -> SupervisorResult<ServerInfo> {
    let protocol = take_u8(buf, "protocol")?;
    let name = take_string(buf, "name")?;
    let map = take_string(buf, "map")?;
    let folder = take_string(buf, "folder")?;
    let game = take_string(buf, "game")?;

    if buf.remaining() < 2 {
        return Err(SupervisorError::protocol("truncated app id"));
    }
    let app_id = buf.get_u16_le();

    let players = take_u8(buf, "players")?;
    let max_players = take_u8(buf, "max players")?;
    // Everything past max players is optional for our purposes
    let bots = if buf.has_remaining() { buf.get_u8() } else { 0 };

    Ok(ServerInfo {
        protocol,
        name,
        map,
        folder,
        game,
        app_id,
        players,
        max_players,
        bots,
    })
}

fn take_u8(buf: &mut &[u8], field: &str) -> SupervisorResult<u8> {
    if !buf.has_remaining() {
        return Err(SupervisorError::protocol(format!("truncated {field}")));
    }
    Ok(buf.get_u8())
}

fn take_string(buf: &mut &[u8], field: &str) -> SupervisorResult<String> {
    let bytes: &[u8] = *buf;
    let Some(end) = bytes.iter().position(|&b| b == 0) else {
        return Err(SupervisorError::protocol(format!("unterminated {field}")));
    };

    let value = String::from_utf8_lossy(&bytes[..end]).into_owned();
    buf.advance(end + 1);
    Ok(value)
}
