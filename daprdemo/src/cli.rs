//! # CLI
//!
//! Command-line interface of `daprdemo`, defined with `clap`.
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "daprdemo",
    version,
    about = "Invoke a service and publish an event through a Dapr sidecar"
)]
pub struct Cli {
    /// gRPC port of the Dapr sidecar (e.g. 50001)
    #[arg(short, long)]
    pub port: u16,

    /// Messages sent to OrderService/say before the event is published
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// dapr run --app-protocol grpc --dapr-grpc-port 50001 -- daprdemo -p 50001 'message one' 'message two'
    /// ```
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_port_and_messages() {
        let cli = Cli::try_parse_from(["daprdemo", "-p", "50001", "message one", "two"]).unwrap();

        assert_eq!(cli.port, 50001);
        assert_eq!(cli.messages, vec!["message one", "two"]);
    }

    #[test]
    fn long_port_flag_without_messages() {
        let cli = Cli::try_parse_from(["daprdemo", "--port", "3500"]).unwrap();

        assert_eq!(cli.port, 3500);
        assert!(cli.messages.is_empty());
    }

    #[test]
    fn port_flag_is_required() {
        assert!(Cli::try_parse_from(["daprdemo"]).is_err());
        assert!(Cli::try_parse_from(["daprdemo", "message one"]).is_err());
    }

    #[test]
    fn malformed_port_is_rejected() {
        assert!(Cli::try_parse_from(["daprdemo", "-p", "fifty"]).is_err());
        assert!(Cli::try_parse_from(["daprdemo", "-p", "70000"]).is_err());
    }
}
