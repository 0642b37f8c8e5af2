use clap::{Parser, Subcommand};

use bridges_verify::VerifyConfig;

use super::commands::employer::EmployerArgs;
use super::commands::participant::ParticipantArgs;
use super::commands::show::ShowArgs;

#[derive(Parser, Debug)]
#[command(
    name = "bridges-verify",
    version,
    about = "Complete a Bridges work verification link from the terminal"
)]
pub struct Cli {
    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a verification link and show its form
    Show(ShowArgs),
    /// Upload proof of employment as the participant
    Participant(ParticipantArgs),
    /// Confirm or deny employment as the employer
    Employer(EmployerArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Verification endpoint base URL
    #[arg(long, global = true, env = "BRIDGES_VERIFY_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    /// Default: 30
    #[arg(long, global = true, env = "BRIDGES_VERIFY_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl ServiceArgs {
    pub fn config(&self) -> VerifyConfig {
        let mut config = VerifyConfig::default();
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout_secs(secs);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_employer_args() {
        let cli = Cli::try_parse_from([
            "bridges-verify",
            "employer",
            "/e/TOK",
            "--employed",
            "false",
            "--last-work-date",
            "2026-02-28",
            "--signature-name",
            "Pat Lee",
            "--api-url",
            "http://127.0.0.1:9/verify",
        ])
        .unwrap();

        assert_eq!(cli.service.api_url.as_deref(), Some("http://127.0.0.1:9/verify"));
        match cli.cmd {
            Command::Employer(args) => {
                assert_eq!(args.address, "/e/TOK");
                assert_eq!(args.employed, Some(false));
                assert_eq!(args.last_work_date, NaiveDate::from_ymd_opt(2026, 2, 28));
                assert_eq!(args.signature_name.as_deref(), Some("Pat Lee"));
                assert!(args.comments.is_none());
            }
            other => panic!("expected employer command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_participant_args() {
        let cli = Cli::try_parse_from([
            "bridges-verify",
            "participant",
            "https://verify.example.org/p/TOK",
            "--file",
            "stub.pdf",
            "--mime",
            "application/pdf",
        ])
        .unwrap();

        match cli.cmd {
            Command::Participant(args) => {
                assert_eq!(args.file.as_deref(), Some(std::path::Path::new("stub.pdf")));
                assert_eq!(args.mime.as_deref(), Some("application/pdf"));
                assert!(args.last_work_date.is_none());
            }
            other => panic!("expected participant command, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_malformed_date() {
        let result = Cli::try_parse_from([
            "bridges-verify",
            "employer",
            "/e/TOK",
            "--last-work-date",
            "03/01/2026",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_service_config_overrides() {
        let service = ServiceArgs {
            api_url: Some("http://localhost:8080/verify".to_string()),
            timeout: Some(5),
        };
        let config = service.config();
        assert_eq!(config.api_url, "http://localhost:8080/verify");
        assert_eq!(config.timeout_secs, 5);

        let config = ServiceArgs::default().config();
        assert_eq!(config.timeout_secs, 30);
    }
}
