// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::rushdb::protocol::request::{try_parse, Request};

    fn frame(args: &[&[u8]]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&(args.len() as u32).to_le_bytes());
        for arg in args {
            body.extend_from_slice(&(arg.len() as u32).to_le_bytes());
            body.extend_from_slice(arg);
        }
        let mut out = Vec::new();
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn test_empty_buffer_is_incomplete() {
        assert_eq!(try_parse(&[]), Request::Incomplete);
        assert_eq!(try_parse(&[1, 0]), Request::Incomplete);
    }

    #[test]
    fn test_partial_body_is_incomplete() {
        let mut buf = frame(&[b"get", b"foo"]);
        buf.truncate(buf.len() - 2);
        assert_eq!(try_parse(&buf), Request::Incomplete);
    }

    #[test]
    fn test_oversized_length_is_malformed() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&5000u32.to_le_bytes());
        assert_eq!(try_parse(&buf), Request::Malformed);
    }

    #[test]
    fn test_complete_frame() {
        let buf = frame(&[b"set", b"foo", b"bar"]);
        match try_parse(&buf) {
            Request::Complete { args, frame_len } => {
                assert_eq!(frame_len, buf.len());
                assert_eq!(args, vec![b"set".to_vec(), b"foo".to_vec(), b"bar".to_vec()]);
            }
            other => panic!("expected a complete frame, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_arguments_parse() {
        let buf = frame(&[]);
        match try_parse(&buf) {
            Request::Complete { args, frame_len } => {
                assert!(args.is_empty());
                assert_eq!(frame_len, 8);
            }
            other => panic!("expected a complete frame, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_argument_round_trips() {
        let buf = frame(&[b"zquery", b"s", b"0", b"", b"0", b"10"]);
        match try_parse(&buf) {
            Request::Complete { args, .. } => {
                assert_eq!(args[3], Vec::<u8>::new());
                assert_eq!(args.len(), 6);
            }
            other => panic!("expected a complete frame, got {:?}", other),
        }
    }

    #[test]
    fn test_pipelined_buffer_parses_head_only() {
        let mut buf = frame(&[b"get", b"a"]);
        let first_len = buf.len();
        buf.extend_from_slice(&frame(&[b"get", b"b"]));
        match try_parse(&buf) {
            Request::Complete { args, frame_len } => {
                assert_eq!(frame_len, first_len);
                assert_eq!(args[1], b"a".to_vec());
            }
            other => panic!("expected a complete frame, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_garbage_is_malformed() {
        let mut body = Vec::new();
        body.extend_from_slice(&1u32.to_le_bytes());
        body.extend_from_slice(&3u32.to_le_bytes());
        body.extend_from_slice(b"getXX");
        let mut buf = Vec::new();
        buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&body);
        assert_eq!(try_parse(&buf), Request::Malformed);
    }

    #[test]
    fn test_argument_overrun_is_malformed() {
        // one argument claiming 100 bytes inside a 10-byte body
        let mut body = Vec::new();
        body.extend_from_slice(&1u32.to_le_bytes());
        body.extend_from_slice(&100u32.to_le_bytes());
        body.extend_from_slice(b"xx");
        let mut buf = Vec::new();
        buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&body);
        assert_eq!(try_parse(&buf), Request::Malformed);
    }

    #[test]
    fn test_absurd_argument_count_is_malformed() {
        let mut body = Vec::new();
        body.extend_from_slice(&1_000_000u32.to_le_bytes());
        let mut buf = Vec::new();
        buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&body);
        assert_eq!(try_parse(&buf), Request::Malformed);
    }
}
