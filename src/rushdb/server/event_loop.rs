// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! The poll event loop.
//!
//! One thread, one `poll` call per iteration. The poll vector is rebuilt
//! every time: slot 0 is the listener, the rest mirror the live connections
//! and their current read/write intent. The poll timeout is derived from
//! the oldest connection's idle deadline, so eviction needs no separate
//! timer machinery.

use crate::rushdb::rushstream::{server_error, RushResult};
use crate::rushdb::server::config::ServerConfig;
use crate::rushdb::server::connection::Conn;
use crate::rushdb::server::idle::DList;
use crate::rushdb::server::net;
use crate::rushdb::store::keyspace::Keyspace;
use std::os::unix::io::RawFd;
use std::time::Instant;

/// The server: listener, keyspace and connection bookkeeping in one value,
/// owned by the loop. No global state.
pub struct Server {
    listen_fd: RawFd,
    config: ServerConfig,
    keyspace: Keyspace,
    conns: Vec<Option<Conn>>,
    idle: DList<RawFd>,
    started: Instant,
}

impl Server {
    /// Binds the listening socket and prepares an empty keyspace.
    pub fn bind(config: ServerConfig) -> RushResult<Server> {
        let listen_fd = net::listen_socket(&config.bind, config.port)?;
        Ok(Server {
            listen_fd,
            config,
            keyspace: Keyspace::new(),
            conns: Vec::new(),
            idle: DList::new(),
            started: Instant::now(),
        })
    }

    /// Port the listener is bound to (useful after binding port 0).
    pub fn local_port(&self) -> RushResult<u16> {
        net::local_port(self.listen_fd)
    }

    /// Runs the event loop. Only returns on a fatal poll error.
    pub fn run(&mut self) -> RushResult<()> {
        println!("✓ Listening on {}:{}", self.config.bind, self.config.port);
        loop {
            self.tick()?;
        }
    }

    /// One loop iteration: poll, accept, service, sweep timers.
    fn tick(&mut self) -> RushResult<()> {
        let mut poll_args: Vec<libc::pollfd> = Vec::with_capacity(self.conns.len() + 1);
        poll_args.push(libc::pollfd {
            fd: self.listen_fd,
            events: libc::POLLIN,
            revents: 0,
        });
        for conn in self.conns.iter().flatten() {
            let mut events = libc::POLLERR;
            if conn.want_read {
                events |= libc::POLLIN;
            }
            if conn.want_write {
                events |= libc::POLLOUT;
            }
            poll_args.push(libc::pollfd {
                fd: conn.fd,
                events,
                revents: 0,
            });
        }

        let timeout = self.next_timer_ms();
        if let Err(err) = net::poll_fds(&mut poll_args, timeout) {
            if err.raw_os_error() == Some(libc::EINTR) {
                return Ok(());
            }
            return Err(server_error("event_loop", format!("poll failed: {}", err)));
        }

        if poll_args[0].revents != 0 {
            self.handle_accept();
        }

        for i in 1..poll_args.len() {
            let ready = poll_args[i].revents;
            if ready == 0 {
                continue;
            }
            let fd = poll_args[i].fd;
            let now = self.now_ms();

            let idle_handle = {
                let conn = match self.conns.get_mut(fd as usize).and_then(|c| c.as_mut()) {
                    Some(conn) => conn,
                    None => continue,
                };
                conn.last_active_ms = now;
                conn.idle_handle
            };
            self.idle.move_to_back(idle_handle);

            let conn = self.conns[fd as usize]
                .as_mut()
                .expect("connection checked above");
            if (ready & libc::POLLIN) != 0 {
                conn.handle_read(&mut self.keyspace);
            }
            if (ready & libc::POLLOUT) != 0 {
                conn.handle_write();
            }
            if (ready & libc::POLLERR) != 0 || conn.want_close {
                self.destroy_conn(fd);
            }
        }

        self.process_timers();
        Ok(())
    }

    fn handle_accept(&mut self) {
        let fd = match net::accept_conn(self.listen_fd) {
            Some(fd) => fd,
            None => return,
        };
        if let Err(err) = net::set_nonblocking(fd) {
            eprintln!("Dropping connection on fd {}: {}", fd, err);
            net::close_fd(fd);
            return;
        }
        let now = self.now_ms();
        let idle_handle = self.idle.push_back(fd);
        if self.conns.len() <= fd as usize {
            self.conns.resize_with(fd as usize + 1, || None);
        }
        self.conns[fd as usize] = Some(Conn::new(fd, now, idle_handle, self.config.max_outgoing));
    }

    // evicts connections whose idle deadline has passed, oldest first
    fn process_timers(&mut self) {
        let now = self.now_ms();
        loop {
            let fd = match self.idle.front() {
                Some((_, &fd)) => fd,
                None => break,
            };
            let deadline = match self.conns.get(fd as usize).and_then(|c| c.as_ref()) {
                Some(conn) => conn.last_active_ms + self.config.idle_timeout_ms,
                None => break,
            };
            if deadline > now {
                break;
            }
            self.destroy_conn(fd);
        }
    }

    // close first, then unhook: a freed fd number can be reused by accept
    // within the same iteration
    fn destroy_conn(&mut self, fd: RawFd) {
        let conn = match self.conns.get_mut(fd as usize).and_then(|c| c.take()) {
            Some(conn) => conn,
            None => return,
        };
        net::close_fd(conn.fd);
        self.idle.detach(conn.idle_handle);
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    // poll timeout: -1 blocks until I/O when nothing can expire
    fn next_timer_ms(&self) -> i32 {
        let fd = match self.idle.front() {
            Some((_, &fd)) => fd,
            None => return -1,
        };
        let conn = match self.conns.get(fd as usize).and_then(|c| c.as_ref()) {
            Some(conn) => conn,
            None => return 0,
        };
        let deadline = conn.last_active_ms + self.config.idle_timeout_ms;
        let now = self.now_ms();
        if deadline <= now {
            0
        } else {
            (deadline - now).min(i32::MAX as u64) as i32
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        for conn in self.conns.iter().flatten() {
            net::close_fd(conn.fd);
        }
        net::close_fd(self.listen_fd);
    }
}
