//! Line protocol spoken between `dronectl` and the `droned` socket.
//!
//! One command per line, whitespace separated:
//!
//! ```text
//! move 310 42
//! resize 1280
//! click 300 40 shift orbit-item
//! status
//! orbit outer 2 6
//! quit
//! ```

use crate::point::Point;
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/drone.sock";

/// Role tag of an element in a click target's ancestry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Role {
    Canvas,
    Element,
    OrbitItem,
    OrbitLink,
}

impl Role {
    /// Clicks on these elements belong to the element's own handler and never
    /// change the lock.
    pub fn passes_through(self) -> bool {
        matches!(self, Self::OrbitItem | Self::OrbitLink)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Ring {
    Inner,
    Outer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move(Point),
    Resize(f64),
    Click {
        position: Point,
        shift: bool,
        /// Target first, then its ancestors.
        path: Vec<Role>,
    },
    Status,
    Orbit {
        ring: Ring,
        index: usize,
        total: usize,
    },
    Quit,
}

impl Command {
    pub fn expects_reply(&self) -> bool {
        matches!(self, Self::Status | Self::Orbit { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing argument <{0}>")]
    MissingArgument(&'static str),
    #[error("invalid value '{value}' for <{name}>")]
    InvalidArgument { name: &'static str, value: String },
    #[error("unknown click modifier or role '{0}'")]
    UnknownFlag(String),
    #[error("unexpected trailing argument '{0}'")]
    Unexpected(String),
}

fn next_arg<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<&'a str, ProtocolError> {
    args.next().ok_or(ProtocolError::MissingArgument(name))
}

fn parse_arg<'a, T: FromStr>(
    args: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<T, ProtocolError> {
    let raw = next_arg(args, name)?;
    raw.parse().map_err(|_| ProtocolError::InvalidArgument {
        name,
        value: raw.to_string(),
    })
}

fn parse_coordinate<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<f64, ProtocolError> {
    let raw = next_arg(args, name)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProtocolError::InvalidArgument {
            name,
            value: raw.to_string(),
        })
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut args = line.split_whitespace();
        let verb = args.next().ok_or(ProtocolError::Empty)?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "move" => Command::Move(Point::new(
                parse_coordinate(&mut args, "x")?,
                parse_coordinate(&mut args, "y")?,
            )),
            "resize" => Command::Resize(parse_coordinate(&mut args, "width")?),
            "click" => {
                let position = Point::new(
                    parse_coordinate(&mut args, "x")?,
                    parse_coordinate(&mut args, "y")?,
                );
                let mut shift = false;
                let mut path = Vec::new();
                for arg in args.by_ref() {
                    if arg.eq_ignore_ascii_case("shift") {
                        shift = true;
                    } else {
                        let role = arg
                            .parse::<Role>()
                            .map_err(|_| ProtocolError::UnknownFlag(arg.to_string()))?;
                        path.push(role);
                    }
                }
                Command::Click {
                    position,
                    shift,
                    path,
                }
            }
            "status" => Command::Status,
            "orbit" => Command::Orbit {
                ring: parse_arg(&mut args, "ring")?,
                index: parse_arg(&mut args, "index")?,
                total: parse_arg(&mut args, "total")?,
            },
            "quit" => Command::Quit,
            other => return Err(ProtocolError::UnknownCommand(other.to_string())),
        };

        match args.next() {
            Some(extra) => Err(ProtocolError::Unexpected(extra.to_string())),
            None => Ok(command),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(p) => write!(f, "move {} {}", p.x, p.y),
            Self::Resize(width) => write!(f, "resize {width}"),
            Self::Click {
                position,
                shift,
                path,
            } => {
                write!(f, "click {} {}", position.x, position.y)?;
                if *shift {
                    f.write_str(" shift")?;
                }
                path.iter().try_for_each(|role| write!(f, " {role}"))
            }
            Self::Status => f.write_str("status"),
            Self::Orbit { ring, index, total } => write!(f, "orbit {ring} {index} {total}"),
            Self::Quit => f.write_str("quit"),
        }
    }
}
