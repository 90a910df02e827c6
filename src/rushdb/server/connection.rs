// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Per-connection state and the request/response pump.
//!
//! A connection is either waiting to read or waiting to write, never both.
//! Reads drain as many pipelined requests as the incoming buffer holds,
//! append the framed replies to the outgoing buffer and flip to write
//! intent with one optimistic write (the client that just sent a request is
//! almost certainly ready to receive the response).

use crate::rushdb::commands::dispatch::dispatch;
use crate::rushdb::protocol::request::{self, Request};
use crate::rushdb::protocol::response;
use crate::rushdb::server::idle::ListHandle;
use crate::rushdb::server::net;
use crate::rushdb::store::keyspace::Keyspace;
use std::io;
use std::os::unix::io::RawFd;

/// Bytes read from the socket per readiness event.
pub const READ_CHUNK: usize = 64 * 1024;

pub struct Conn {
    pub fd: RawFd,
    pub want_read: bool,
    pub want_write: bool,
    pub want_close: bool,
    pub incoming: Vec<u8>,
    pub outgoing: Vec<u8>,
    pub last_active_ms: u64,
    pub idle_handle: ListHandle,
    max_outgoing: usize,
}

impl Conn {
    pub fn new(fd: RawFd, now_ms: u64, idle_handle: ListHandle, max_outgoing: usize) -> Self {
        Conn {
            fd,
            want_read: true,
            want_write: false,
            want_close: false,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            last_active_ms: now_ms,
            idle_handle,
            max_outgoing,
        }
    }

    /// Services a read-ready socket.
    ///
    /// ## Behaviour
    /// - One read of up to `READ_CHUNK` bytes (the loop delivers further
    ///   readiness events for the rest)
    /// - EOF and hard errors set `want_close`
    /// - Every complete buffered request is dispatched in arrival order
    /// - Pending output flips the connection to write intent and attempts
    ///   one immediate write
    pub fn handle_read(&mut self, keyspace: &mut Keyspace) {
        let mut buf = [0u8; READ_CHUNK];
        let n = match net::read_fd(self.fd, &mut buf) {
            Ok(n) => n,
            Err(err) => {
                if err.kind() == io::ErrorKind::WouldBlock {
                    return;
                }
                self.want_close = true;
                return;
            }
        };
        if n == 0 {
            // EOF
            self.want_close = true;
            return;
        }
        self.incoming.extend_from_slice(&buf[..n]);

        while self.try_one_request(keyspace) {}

        if !self.outgoing.is_empty() {
            self.want_read = false;
            self.want_write = true;
            self.handle_write();
        }
    }

    /// Services a write-ready socket.
    pub fn handle_write(&mut self) {
        if self.outgoing.is_empty() {
            return;
        }
        let n = match net::write_fd(self.fd, &self.outgoing) {
            Ok(n) => n,
            Err(err) => {
                if err.kind() == io::ErrorKind::WouldBlock {
                    return;
                }
                self.want_close = true;
                return;
            }
        };
        self.outgoing.drain(..n);
        if self.outgoing.is_empty() {
            self.want_read = true;
            self.want_write = false;
        }
    }

    // parses and answers one request from the buffer head; false when the
    // buffer holds no complete frame (or the connection is doomed)
    fn try_one_request(&mut self, keyspace: &mut Keyspace) -> bool {
        match request::try_parse(&self.incoming) {
            Request::Incomplete => false,
            Request::Malformed => {
                self.want_close = true;
                false
            }
            Request::Complete { args, frame_len } => {
                let reply = dispatch(keyspace, &args);
                response::write_response(&mut self.outgoing, &reply);
                self.incoming.drain(..frame_len);
                if self.outgoing.len() > self.max_outgoing {
                    self.want_close = true;
                    return false;
                }
                true
            }
        }
    }
}
