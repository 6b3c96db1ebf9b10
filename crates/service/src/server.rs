use crate::errors::Result;
use crate::registry::Registry;

use log::{info, warn};
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default time a connection may stay idle before being closed
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

/// A TCP server answering line-delimited JSON requests on registered selectors.
///
/// Connections are served one after the other, calls on a selector are thus
/// never interleaved. A connection idle for longer than the read timeout is
/// closed so that the next client gets served.
pub struct Server {
    listener: TcpListener,
    registry: Registry,
    read_timeout: Option<Duration>,
}

impl Server {
    /// Bind the server to the given address
    pub fn bind<A: ToSocketAddrs>(addr: A, registry: Registry) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Server {
            listener,
            registry,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        })
    }

    /// Sets the idle time after which a connection is closed, `None` waits forever
    pub fn read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout.filter(|t| !t.is_zero());
        self
    }

    /// Address the server is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Served selectors
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Serve connections until the listener fails
    pub fn serve(&mut self) -> Result<()> {
        info!("Serving {:?} on {}", self.registry.names(), self.local_addr()?);
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(err) = handle_connection(&mut self.registry, stream, self.read_timeout) {
                        warn!("Connection closed on error: {err}");
                    }
                }
                Err(err) => warn!("Connection failed: {err}"),
            }
        }
        Ok(())
    }
}

/// Answer every request line of the connection until the client hangs up
/// or stays idle longer than `read_timeout`
pub fn handle_connection(
    registry: &mut Registry,
    stream: TcpStream,
    read_timeout: Option<Duration>,
) -> Result<()> {
    let peer = stream.peer_addr()?;
    info!("Connection from {peer}");
    stream.set_read_timeout(read_timeout)?;
    let reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = registry.handle_line(&line);
        writeln!(writer, "{reply}")?;
        writer.flush()?;
    }
    info!("Connection from {peer} closed");
    Ok(())
}
