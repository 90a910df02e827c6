// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Socket syscall wrappers.
//!
//! Thin `libc` plumbing for the event loop: everything here is
//! non-blocking-friendly and reports OS failures either as `RushError`
//! (setup paths) or `std::io::Error` (per-connection I/O, where the caller
//! inspects `WouldBlock`).

use crate::rushdb::rushstream::{config_error, server_error, RushError, RushResult};
use std::io;
use std::net::Ipv4Addr;
use std::os::unix::io::RawFd;

/// Creates the listening socket: SO_REUSEADDR, bound, listening,
/// non-blocking.
///
/// ## Input
/// - `bind`: Dotted IPv4 address, e.g. "0.0.0.0"
/// - `port`: TCP port; 0 lets the kernel pick one (see `local_port`)
///
/// ## Error Conditions
/// - Unparsable bind address
/// - socket/setsockopt/bind/listen failures (address in use, privileges)
pub fn listen_socket(bind: &str, port: u16) -> RushResult<RawFd> {
    let ip: Ipv4Addr = bind
        .parse()
        .map_err(|_| config_error("server", format!("invalid bind address '{}'", bind)))?;

    let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_STREAM, 0) };
    if fd < 0 {
        return Err(os_error("socket"));
    }

    let val: libc::c_int = 1;
    let rv = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_REUSEADDR,
            &val as *const libc::c_int as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if rv != 0 {
        return Err(close_on_error(fd, "setsockopt"));
    }

    let addr = sockaddr_for(ip, port);
    let rv = unsafe {
        libc::bind(
            fd,
            &addr as *const libc::sockaddr_in as *const libc::sockaddr,
            std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
        )
    };
    if rv != 0 {
        return Err(close_on_error(fd, "bind"));
    }

    let rv = unsafe { libc::listen(fd, libc::SOMAXCONN) };
    if rv != 0 {
        return Err(close_on_error(fd, "listen"));
    }

    if let Err(err) = set_nonblocking(fd) {
        close_fd(fd);
        return Err(err);
    }
    Ok(fd)
}

/// Switches a file descriptor to non-blocking mode.
pub fn set_nonblocking(fd: RawFd) -> RushResult<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL, 0) };
    if flags < 0 {
        return Err(os_error("fcntl"));
    }
    let rv = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rv < 0 {
        return Err(os_error("fcntl"));
    }
    Ok(())
}

/// Accepts one pending connection; None when nothing is queued.
pub fn accept_conn(listen_fd: RawFd) -> Option<RawFd> {
    let mut addr: libc::sockaddr_in = unsafe { std::mem::zeroed() };
    let mut addrlen = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
    let fd = unsafe {
        libc::accept(
            listen_fd,
            &mut addr as *mut libc::sockaddr_in as *mut libc::sockaddr,
            &mut addrlen,
        )
    };
    if fd < 0 {
        None
    } else {
        Some(fd)
    }
}

pub fn read_fd(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
    let rv = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
    if rv < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(rv as usize)
    }
}

pub fn write_fd(fd: RawFd, buf: &[u8]) -> io::Result<usize> {
    let rv = unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
    if rv < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(rv as usize)
    }
}

pub fn close_fd(fd: RawFd) {
    unsafe {
        libc::close(fd);
    }
}

/// Waits for readiness; timeout in milliseconds, -1 blocks indefinitely.
pub fn poll_fds(fds: &mut [libc::pollfd], timeout_ms: i32) -> io::Result<usize> {
    let rv = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };
    if rv < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(rv as usize)
    }
}

/// Port the socket is actually bound to (after binding port 0).
pub fn local_port(fd: RawFd) -> RushResult<u16> {
    let mut addr: libc::sockaddr_in = unsafe { std::mem::zeroed() };
    let mut addrlen = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
    let rv = unsafe {
        libc::getsockname(
            fd,
            &mut addr as *mut libc::sockaddr_in as *mut libc::sockaddr,
            &mut addrlen,
        )
    };
    if rv != 0 {
        return Err(os_error("getsockname"));
    }
    Ok(u16::from_be(addr.sin_port))
}

fn sockaddr_for(ip: Ipv4Addr, port: u16) -> libc::sockaddr_in {
    let mut addr: libc::sockaddr_in = unsafe { std::mem::zeroed() };
    addr.sin_family = libc::AF_INET as libc::sa_family_t;
    addr.sin_port = port.to_be();
    addr.sin_addr = libc::in_addr {
        s_addr: u32::from(ip).to_be(),
    };
    addr
}

fn os_error(operation: &str) -> RushError {
    server_error(
        "net",
        format!("{} failed: {}", operation, io::Error::last_os_error()),
    )
}

fn close_on_error(fd: RawFd, operation: &str) -> RushError {
    let err = os_error(operation);
    close_fd(fd);
    err
}
