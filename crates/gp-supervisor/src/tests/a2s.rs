use crate::SupervisorError;
use crate::probe::{InfoReply, decode_info_reply, encode_info_request};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};

const HEADER: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const INFO_PREFIX: [u8; 5] = [0xFF, 0xFF, 0xFF, 0xFF, 0x54];
const CHALLENGE: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

fn info_packet(name: &str, map: &str, players: u8, max_players: u8) -> Vec<u8> {
    let mut packet = HEADER.to_vec();
    packet.push(0x49);
    packet.push(17);
    for field in [name, map, "cstrike", "Counter-Strike: Source"] {
        packet.extend_from_slice(field.as_bytes());
        packet.push(0);
    }
    packet.extend_from_slice(&240u16.to_le_bytes());
    packet.push(players);
    packet.push(max_players);
    packet
}

// =========================================================================
// Request encoding
// =========================================================================

#[test]
fn given_no_challenge_when_encode_then_plain_info_query() {
    // When
    let request = encode_info_request(None);

    // Then
    assert_that!(&request[..5], eq(&INFO_PREFIX[..]));
    assert_that!(&request[5..], eq(&b"Source Engine Query\0"[..]));
}

#[test]
fn given_challenge_when_encode_then_challenge_appended() {
    // When
    let request = encode_info_request(Some(CHALLENGE));

    // Then
    assert_that!(request.len(), eq(5 + 20 + 4));
    assert_that!(&request[request.len() - 4..], eq(&CHALLENGE[..]));
}

// =========================================================================
// Reply decoding
// =========================================================================

#[test]
fn given_info_reply_when_decode_then_fields_parsed() {
    // Given
    let mut packet = info_packet("Public #1", "de_dust2", 12, 24);
    packet.push(3);

    // When
    let reply = decode_info_reply(&packet);

    // Then
    assert_that!(reply, ok(anything()));
    let InfoReply::Info(info) = reply.unwrap() else {
        panic!("expected an info reply");
    };
    assert_that!(info.protocol, eq(17));
    assert_that!(info.name.as_str(), eq("Public #1"));
    assert_that!(info.map.as_str(), eq("de_dust2"));
    assert_that!(info.folder.as_str(), eq("cstrike"));
    assert_that!(info.app_id, eq(240));
    assert_that!(info.players, eq(12));
    assert_that!(info.max_players, eq(24));
    assert_that!(info.bots, eq(3));
}

#[test]
fn given_info_reply_without_trailer_when_decode_then_bots_zero() {
    // Given
    let packet = info_packet("Public #1", "cs_office", 0, 16);

    // When
    let reply = decode_info_reply(&packet).unwrap();

    // Then
    let InfoReply::Info(info) = reply else {
        panic!("expected an info reply");
    };
    assert_that!(info.bots, eq(0));
    assert_that!(info.max_players, eq(16));
}

#[test]
fn given_challenge_reply_when_decode_then_challenge_returned() {
    // Given
    let packet = [0xFF, 0xFF, 0xFF, 0xFF, 0x41, 0x01, 0x02, 0x03, 0x04];

    // When
    let reply = decode_info_reply(&packet);

    // Then
    assert_that!(reply.unwrap(), eq(&InfoReply::Challenge([1, 2, 3, 4])));
}

#[test]
fn given_truncated_challenge_when_decode_then_protocol_error() {
    // Given
    let packet = [0xFF, 0xFF, 0xFF, 0xFF, 0x41, 0x01];

    // When
    let result = decode_info_reply(&packet);

    // Then
    assert!(matches!(result, Err(SupervisorError::Protocol { .. })));
}

#[test]
fn given_short_packet_when_decode_then_error() {
    assert_that!(decode_info_reply(&[0xFF, 0xFF]), err(anything()));
}

#[test]
fn given_split_header_when_decode_then_error() {
    // Given
    let packet = [0xFE, 0xFF, 0xFF, 0xFF, 0x49, 0x00];

    // When
    let result = decode_info_reply(&packet);

    // Then
    let error = result.unwrap_err();
    assert!(error.to_string().contains("split replies are not supported"));
}

#[test]
fn given_unknown_reply_type_when_decode_then_error() {
    // Given
    let packet = [0xFF, 0xFF, 0xFF, 0xFF, 0x44, 0x00];

    // When
    let result = decode_info_reply(&packet);

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_unterminated_name_when_decode_then_error() {
    // Given
    let mut packet = HEADER.to_vec();
    packet.extend_from_slice(&[0x49, 17]);
    packet.extend_from_slice(b"no terminator");

    // When
    let result = decode_info_reply(&packet);

    // Then
    assert!(matches!(result, Err(SupervisorError::Protocol { .. })));
}

#[test]
fn given_missing_player_counts_when_decode_then_error() {
    // Given
    let mut packet = info_packet("Public #1", "de_dust2", 1, 2);
    packet.truncate(packet.len() - 2);

    // When
    let result = decode_info_reply(&packet);

    // Then
    assert_that!(result, err(anything()));
}
