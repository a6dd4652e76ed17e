//! Marketplace TCP server.
//!
//! A single-threaded, readiness-multiplexed event loop: one `mio::Poll`
//! watches the listener and every client stream, and each ready client gets
//! exactly one read / dispatch / write round before the loop returns to the
//! poll. The catalog is only ever touched from this thread, so commands from
//! different clients can never interleave mid-processing.
//!
//! The only other thread in the system is the idle-shutdown timer, which
//! talks to the loop exclusively through [`ServerHandle::stop`]. The running
//! flag and the connected-client counter are the shared state between the
//! two threads and are atomics.

use log::{error, info, trace, warn};

use bytes::BytesMut;
use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token, Waker};

use std::collections::HashMap;
use std::io::{ErrorKind, Read};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::command::Command;
use crate::executor::Executor;
use crate::helper::write_response;
use crate::shutdown::IdleTimer;
use crate::{MarketErr, Result};

const SERVER_TOKEN: Token = Token(0);
const WAKER_TOKEN: Token = Token(1);
const FIRST_CLIENT_TOKEN: usize = 2;

const BUFFER_SIZE: usize = 1024;
const DEFAULT_IDLE_SHUTDOWN: Duration = Duration::from_secs(10);

pub struct ServerBuilder {
    host: String,
    port: u16,
    max_clients: usize,
    idle_shutdown: Duration,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            host: String::from("localhost"),
            port: 6666,
            max_clients: 1024,
            idle_shutdown: DEFAULT_IDLE_SHUTDOWN,
        }
    }
    pub fn host(mut self, host: &str) -> Self {
        self.host = String::from(host);
        self
    }
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
    pub fn max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients;
        self
    }
    pub fn idle_shutdown(mut self, delay: Duration) -> Self {
        self.idle_shutdown = delay;
        self
    }

    pub fn build(self) -> Result<Server> {
        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                MarketErr::IOError(format!("cannot resolve {}:{}", self.host, self.port))
            })?;
        let mut listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;

        let poll = Poll::new()?;
        poll.registry()
            .register(&mut listener, SERVER_TOKEN, Interest::READABLE)?;
        let waker = Waker::new(poll.registry(), WAKER_TOKEN)?;

        Ok(Server {
            listener,
            local_addr,
            poll,
            events: Events::with_capacity(self.max_clients),
            connections: HashMap::new(),
            next_token: FIRST_CLIENT_TOKEN,
            buffer: BytesMut::zeroed(BUFFER_SIZE),
            executor: Executor::default(),
            idle: IdleTimer::new(self.idle_shutdown),
            shared: Arc::new(Shared {
                running: AtomicBool::new(true),
                connected_clients: AtomicUsize::new(0),
                waker,
            }),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct Shared {
    running: AtomicBool,
    connected_clients: AtomicUsize,
    waker: Waker,
}

/// Cloneable, thread-safe handle to a running server. This is the only way
/// any other thread (the idle timer included) interacts with the loop.
#[derive(Clone)]
pub struct ServerHandle {
    shared: Arc<Shared>,
}

impl ServerHandle {
    /// Flip the running flag and wake the blocked poll. Idempotent; safe to
    /// call from any thread.
    pub fn stop(&self) {
        if self.shared.running.swap(false, Ordering::SeqCst) {
            if let Err(e) = self.shared.waker.wake() {
                warn!("failed to wake event loop: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    pub fn connected_clients(&self) -> usize {
        self.shared.connected_clients.load(Ordering::SeqCst)
    }
}

pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    poll: Poll,
    events: Events,
    connections: HashMap<Token, TcpStream>,
    next_token: usize,
    // one receive buffer shared by all clients; sound because each readiness
    // event is processed to completion before the next read
    buffer: BytesMut,
    executor: Executor,
    idle: IdleTimer,
    shared: Arc<Shared>,
}

impl Server {
    /// Bind to `host:port` with the default 10 second idle-shutdown window.
    pub fn new(host: &str, port: u16, max_clients: usize) -> Result<Self> {
        ServerBuilder::new()
            .host(host)
            .port(port)
            .max_clients(max_clients)
            .build()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Run the event loop until [`ServerHandle::stop`] is observed.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "server listening on {}, idle shutdown after {:?}",
            self.local_addr,
            self.idle.delay()
        );
        // no clients yet, start the idle countdown immediately
        let handle = self.handle();
        self.idle.arm(move || handle.stop());

        while self.shared.running.load(Ordering::SeqCst) {
            if let Err(e) = self.poll.poll(&mut self.events, None) {
                if e.kind() == ErrorKind::Interrupted {
                    continue;
                }
                return Err(e.into());
            }

            for event in self.events.iter() {
                match event.token() {
                    SERVER_TOKEN => loop {
                        match self.listener.accept() {
                            Ok((mut stream, addr)) => {
                                let token = Token(self.next_token);
                                self.next_token += 1;
                                if let Err(e) = self.poll.registry().register(
                                    &mut stream,
                                    token,
                                    Interest::READABLE,
                                ) {
                                    error!("failed to register client {}: {}", addr, e);
                                    continue;
                                }
                                self.connections.insert(token, stream);
                                let connected = self
                                    .shared
                                    .connected_clients
                                    .fetch_add(1, Ordering::SeqCst)
                                    + 1;
                                self.idle.disarm();
                                info!("new connection: {} ({} connected)", addr, connected);
                            }
                            Err(ref e) if e.kind() == ErrorKind::WouldBlock => break,
                            Err(e) => {
                                error!("failed to accept connection: {}", e);
                                break;
                            }
                        }
                    },
                    // woken by stop(); the while condition re-checks the flag
                    WAKER_TOKEN => {}
                    token => {
                        if !event.is_readable() {
                            continue;
                        }
                        let Some(stream) = self.connections.get_mut(&token) else {
                            continue;
                        };

                        let mut disconnect = false;
                        match stream.read(&mut self.buffer[..]) {
                            // EOF, the peer hung up
                            Ok(0) => disconnect = true,
                            Ok(n) => {
                                let input = String::from_utf8_lossy(&self.buffer[..n]);
                                trace!("client {:?} sent {:?}", token, input);
                                let response =
                                    self.executor.execute(Command::from_input(&input));
                                if let Err(e) = write_response(stream, response.as_bytes()) {
                                    warn!("write to client {:?} failed: {}", token, e);
                                    disconnect = true;
                                }
                            }
                            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {}
                            Err(e) => {
                                warn!("read from client {:?} failed: {}", token, e);
                                disconnect = true;
                            }
                        }

                        if disconnect {
                            if let Some(mut stream) = self.connections.remove(&token) {
                                if let Err(e) = self.poll.registry().deregister(&mut stream) {
                                    warn!("failed to deregister client {:?}: {}", token, e);
                                }
                            }
                            let remaining = self
                                .shared
                                .connected_clients
                                .fetch_sub(1, Ordering::SeqCst)
                                - 1;
                            info!("connection closed ({} connected)", remaining);
                            if remaining == 0 {
                                let handle = ServerHandle {
                                    shared: Arc::clone(&self.shared),
                                };
                                self.idle.arm(move || handle.stop());
                            }
                        }
                    }
                }
            }
        }

        info!("server stopped");
        Ok(())
    }
}
