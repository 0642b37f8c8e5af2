use bridges_verify::{Role, VerificationFlow, VerifyError, VerifyResult};

use super::args::{Cli, Command};
use crate::exit_codes::{LINK_ERROR, SUCCESS, WRONG_FORM};
use crate::render::render_flow;

pub mod employer;
pub mod participant;
pub mod show;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Show(args) => show::run(args, &cli.service).await,
        Command::Participant(args) => participant::run(args, &cli.service).await,
        Command::Employer(args) => employer::run(args, &cli.service).await,
    }
}

/// Print the loaded screen; `Some(code)` when the expected form is not showing.
async fn require_form(flow: &VerificationFlow, role: Role) -> Option<i32> {
    let screen = flow.screen().await;
    print!("{}", render_flow(flow).await);

    match screen.form_role() {
        Some(active) if active == role => None,
        Some(active) => {
            eprintln!(
                "This link is for the {} form. Run `bridges-verify {}` instead.",
                active.as_str().to_lowercase(),
                active.as_str().to_lowercase()
            );
            Some(WRONG_FORM)
        }
        None => Some(LINK_ERROR),
    }
}

/// Report a form failure and pick the exit code.
async fn report_failure(flow: &VerificationFlow, err: &VerifyError) -> i32 {
    let message = flow.notice().await.unwrap_or_else(|| err.form_message());
    eprintln!("{}", message);
    err.exit_code()
}

/// Render the outcome of a submission.
async fn finish(flow: &VerificationFlow, result: VerifyResult<()>) -> anyhow::Result<i32> {
    match result {
        Ok(()) => {
            print!("{}", render_flow(flow).await);
            Ok(SUCCESS)
        }
        Err(e) => Ok(report_failure(flow, &e).await),
    }
}
