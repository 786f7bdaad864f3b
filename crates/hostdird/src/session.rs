//! Line handling shared by the shell and the server

use hostdir_core::{Command, Directory};
use tracing::debug;

use crate::input::InputLine;

/// Outcome of one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Text to write back (may be empty, may span several lines)
    pub text: String,
    /// Whether the session should end after this response
    pub quit: bool,
}

impl Response {
    fn error(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("ERROR: {message}"),
            quit: false,
        }
    }
}

/// Response to one framed line, `None` for blank lines
pub async fn respond_to_input(
    directory: &Directory,
    input: InputLine,
    max_line_bytes: usize,
) -> Option<Response> {
    match input {
        InputLine::Command(line) if line.trim().is_empty() => None,
        InputLine::Command(line) => Some(respond(directory, &line, max_line_bytes).await),
        InputLine::TooLong => {
            debug!("Rejected line longer than {} bytes", max_line_bytes);
            Some(Response::error(format!("line exceeds {max_line_bytes} bytes")))
        }
        InputLine::NotUtf8 => {
            debug!("Rejected non UTF-8 line");
            Some(Response::error("line is not valid UTF-8"))
        }
    }
}

/// Parse and run one line, turning failures into `ERROR:` text
pub async fn respond(directory: &Directory, line: &str, max_line_bytes: usize) -> Response {
    if line.len() > max_line_bytes {
        return Response::error(format!("line exceeds {max_line_bytes} bytes"));
    }

    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(e) => {
            debug!("Rejected input {:?}: {}", line, e);
            return Response::error(e);
        }
    };

    match command.execute(directory).await {
        Ok(reply) => Response {
            text: reply.to_string(),
            quit: command.is_quit(),
        },
        Err(e) => Response::error(e),
    }
}
