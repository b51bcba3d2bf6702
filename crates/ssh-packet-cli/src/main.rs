//! A demonstration binary for the SSH packet layer.
//!
//! This is explicitly **not** an SSH client or server: it skips key exchange
//! and user authentication entirely and either talks pre-KEX framing
//! (`NullBinding`, the default) or, with `--xor-key`, a reversible XOR
//! fixture cipher so the encrypted framing path can be exercised over a
//! real socket too. Its only job is to prove the packet layer in
//! `ssh-packet-session` frames, filters, and dispatches correctly when
//! driven by a real, partial-read-prone `TcpStream` rather than the
//! harness's deterministic `SimSocket`.

mod banner;

use std::io::Read;
use std::net::{TcpListener, TcpStream};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ssh_packet_core::Role;
use ssh_packet_session::{PcapSink, Session, SessionConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Drive the SSH packet layer over a real TCP socket.
#[derive(Parser, Debug)]
#[command(name = "ssh-packet-cli")]
#[command(about = "Demonstration driver for the SSH transport packet layer")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Log level passed to `tracing_subscriber::EnvFilter` when `RUST_LOG`
    /// is not set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Accept one connection and echo every `SSH_MSG_IGNORE` it receives.
    Server {
        /// Address to bind to.
        #[arg(short, long, default_value = "127.0.0.1:2222")]
        bind: String,
    },
    /// Connect and send a handful of `SSH_MSG_IGNORE` packets.
    Client {
        /// Address to connect to.
        #[arg(short, long, default_value = "127.0.0.1:2222")]
        connect: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(tracing_subscriber::fmt::layer()).with(filter).init();

    let result = match args.mode {
        Mode::Server { bind } => run_server(&bind),
        Mode::Client { connect } => run_client(&connect),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "ssh-packet-cli exiting with an error");
            ExitCode::FAILURE
        },
    }
}

/// Logs every incoming packet at `info` level. The default handler table
/// fully consumes `SSH_MSG_IGNORE` itself (`dispatch::default_table`), so
/// observing traffic from outside the dispatcher has to go through the
/// `PcapSink` seam rather than a registered handler.
struct LoggingPcapSink;

impl PcapSink for LoggingPcapSink {
    fn on_incoming(&mut self, cleartext_payload: &[u8], seq: u32) {
        tracing::info!(seq, len = cleartext_payload.len(), "observed incoming packet");
    }

    fn on_outgoing(&mut self, _cleartext_payload: &[u8], _seq: u32) {}
}

fn run_server(bind: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(bind)?;
    tracing::info!(%bind, "listening");

    let (mut stream, peer) = listener.accept()?;
    tracing::info!(%peer, "accepted connection");

    let carryover = banner::exchange(&mut stream)?;
    let sink = stream.try_clone()?;
    let mut session = Session::new(sink, SessionConfig::new(Role::Server));
    session.set_pcap_sink(Box::new(LoggingPcapSink));

    drive_from_socket(&mut session, stream, carryover)
}

fn run_client(connect: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(connect)?;
    tracing::info!(%connect, "connected");

    let carryover = banner::exchange(&mut stream)?;
    let sink = stream.try_clone()?;
    let mut session = Session::new(sink, SessionConfig::new(Role::Client));

    for i in 0..3u8 {
        session.send(&[2, 0, 0, 0, 1, i])?;
    }

    drive_from_socket(&mut session, stream, carryover)
}

/// Feed a real socket's bytes into `session` until it closes or the session
/// enters the error state, retaining whatever `Session::feed` did not
/// consume across reads exactly as the socket-feed contract requires.
fn drive_from_socket<S: ssh_packet_session::ByteSink>(
    session: &mut Session<S>,
    mut stream: TcpStream,
    carryover: Vec<u8>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut held = carryover;
    let mut chunk = [0u8; 4096];

    loop {
        if session.phase().session_state == ssh_packet_core::SessionState::Error {
            if let Some(err) = session.last_error() {
                return Err(format!("session entered error state: {err}").into());
            }
            return Ok(());
        }

        if !held.is_empty() {
            let consumed = session.feed(&held);
            held.drain(..consumed);
            if consumed > 0 {
                continue;
            }
        }

        let n = stream.read(&mut chunk)?;
        if n == 0 {
            tracing::info!("peer closed the connection");
            return Ok(());
        }
        held.extend_from_slice(&chunk[..n]);
    }
}
