use bytes::{Bytes, BytesMut};
use citrinedb::core::protocol::{RespFrame, RespFrameCodec};
use tokio_util::codec::{Decoder, Encoder};

fn encode(frame: RespFrame) -> BytesMut {
    let mut buf = BytesMut::new();
    RespFrameCodec.encode(frame, &mut buf).unwrap();
    buf
}

#[test]
fn test_encode_wire_forms() {
    assert_eq!(&encode(RespFrame::SimpleString("OK".into()))[..], b"+OK\r\n");
    assert_eq!(&encode(RespFrame::Error("ERR boom".into()))[..], b"-ERR boom\r\n");
    assert_eq!(&encode(RespFrame::Integer(42))[..], b":42\r\n");
    assert_eq!(
        &encode(RespFrame::BulkString(Bytes::from_static(b"hello")))[..],
        b"$5\r\nhello\r\n"
    );
    assert_eq!(&encode(RespFrame::Null)[..], b"$-1\r\n");
    assert_eq!(&encode(RespFrame::NullArray)[..], b"*-1\r\n");
    assert_eq!(
        &encode(RespFrame::Array(vec![
            RespFrame::BulkString(Bytes::from_static(b"q")),
            RespFrame::BulkString(Bytes::from_static(b"hello")),
        ]))[..],
        b"*2\r\n$1\r\nq\r\n$5\r\nhello\r\n"
    );
}

#[test]
fn test_decode_multi_bulk_request() {
    let mut buf = BytesMut::from(&b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n"[..]);
    let frame = RespFrameCodec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(
        frame,
        RespFrame::Array(vec![
            RespFrame::BulkString(Bytes::from_static(b"GET")),
            RespFrame::BulkString(Bytes::from_static(b"k")),
        ])
    );
    assert!(buf.is_empty());
}

#[test]
fn test_decode_incomplete_frame_waits_for_more_data() {
    let mut codec = RespFrameCodec;
    let mut buf = BytesMut::from(&b"*2\r\n$3\r\nGE"[..]);
    assert!(codec.decode(&mut buf).unwrap().is_none());
    // The buffer is left untouched until the frame completes.
    buf.extend_from_slice(b"T\r\n$1\r\nk\r\n");
    assert!(codec.decode(&mut buf).unwrap().is_some());
}

#[test]
fn test_decode_nulls() {
    let mut buf = BytesMut::from(&b"$-1\r\n*-1\r\n"[..]);
    assert_eq!(RespFrameCodec.decode(&mut buf).unwrap(), Some(RespFrame::Null));
    assert_eq!(RespFrameCodec.decode(&mut buf).unwrap(), Some(RespFrame::NullArray));
}

#[test]
fn test_decode_rejects_unknown_type_byte() {
    let mut buf = BytesMut::from(&b"!boom\r\n"[..]);
    assert!(RespFrameCodec.decode(&mut buf).is_err());
}

#[test]
fn test_encode_decode_round_trip() {
    let frame = RespFrame::Array(vec![
        RespFrame::BulkString(Bytes::from_static(b"with\r\nbinary\0data")),
        RespFrame::Integer(-7),
        RespFrame::SimpleString("PONG".into()),
    ]);
    let mut buf = encode(frame.clone());
    let decoded = RespFrameCodec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(decoded, frame);
}
