use clap::{Parser, Subcommand};
use dronectl::{Command, Point, Ring, Role, SOCKET_PATH};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dronectl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Socket of the running drone daemon
    #[arg(short, long, default_value = SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Report the pointer at a viewport position
    #[command(allow_negative_numbers = true)]
    Move { x: f64, y: f64 },
    /// Report a new viewport width
    Resize { width: f64 },
    /// Click at a viewport position
    #[command(allow_negative_numbers = true)]
    Click {
        x: f64,
        y: f64,
        /// Hold shift while clicking
        #[arg(long)]
        shift: bool,
        /// Roles of the clicked element, target first (e.g. orbit-item)
        #[arg(short, long = "target")]
        target: Vec<Role>,
    },
    /// Print the current marker, angles and lock state as JSON
    Status,
    /// Print the offset of one ring item as JSON
    Orbit {
        ring: Ring,
        index: usize,
        total: usize,
    },
    /// Unmount the widget and stop the daemon
    Quit,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Move { x, y } => Command::Move(Point::new(x, y)),
            Commands::Resize { width } => Command::Resize(width),
            Commands::Click {
                x,
                y,
                shift,
                target,
            } => Command::Click {
                position: Point::new(x, y),
                shift,
                path: target,
            },
            Commands::Status => Command::Status,
            Commands::Orbit { ring, index, total } => Command::Orbit { ring, index, total },
            Commands::Quit => Command::Quit,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let command = Command::from(cli.command);

    if let Some(reply) = send_command(&cli.socket, &command)? {
        if let Some(message) = reply.strip_prefix("error: ") {
            anyhow::bail!("Daemon rejected '{}': {}", command, message);
        }
        println!("{}", reply);
    }
    Ok(())
}

fn send_command(socket: &Path, command: &Command) -> anyhow::Result<Option<String>> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to drone daemon at {}: {}. Is droned running?",
            socket.display(),
            e
        )
    })?;

    log::debug!("sending '{}'", command);
    writeln!(stream, "{}", command)?;

    if !command.expects_reply() {
        return Ok(None);
    }

    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply)?;
    if reply.is_empty() {
        anyhow::bail!("Daemon closed the connection without replying");
    }
    Ok(Some(reply.trim_end().to_string()))
}
