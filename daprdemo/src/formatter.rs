use colored::*;
use daprdemo_core::{
    caller::CallerError, client::ConnectError, dapr_proto::pb::daprexamples::SayResponse,
};
use std::fmt::Display;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct GenericError<T: Display>(pub &'static str, pub T);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0)
    }
}

impl<T: Display> From<GenericError<T>> for FormattedString {
    fn from(GenericError(msg, err): GenericError<T>) -> Self {
        FormattedString(format!("{}:\n\n'{}'", msg.red().bold(), err))
    }
}

impl From<ConnectError> for FormattedString {
    fn from(err: ConnectError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Connection Error:".red().bold(), err))
    }
}

impl From<CallerError> for FormattedString {
    fn from(err: CallerError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Call Failed:".red().bold(), err))
    }
}

impl From<SayResponse> for FormattedString {
    fn from(response: SayResponse) -> Self {
        let timestamp = match response.timestamp {
            Some(ts) => ts.to_string().green().to_string(),
            None => "<no timestamp>".yellow().to_string(),
        };
        FormattedString(format!("Client: got response => {timestamp}"))
    }
}
