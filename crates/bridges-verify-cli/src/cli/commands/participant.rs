use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use bridges_verify::{FileHandle, Role, VerificationFlow, VerifyClient};

use super::super::args::ServiceArgs;
use super::{finish, report_failure, require_form};

#[derive(Args, Debug)]
pub struct ParticipantArgs {
    /// Verification link, e.g. https://.../p/TOKEN
    pub address: String,

    /// Document proving employment (pay stub, letter, photo; max 10MB)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// MIME type to report instead of the one guessed from the extension
    #[arg(long, requires = "file")]
    pub mime: Option<String>,

    /// Last day worked (YYYY-MM-DD). Default: today
    #[arg(long)]
    pub last_work_date: Option<NaiveDate>,
}

pub async fn run(args: ParticipantArgs, service: &ServiceArgs) -> anyhow::Result<i32> {
    let client = VerifyClient::new(service.config())?;
    let flow = VerificationFlow::start(client, &args.address).await;

    if let Some(code) = require_form(&flow, Role::Participant).await {
        return Ok(code);
    }

    let mut form = flow.participant_form();
    if let Some(date) = args.last_work_date {
        if let Err(e) = form.last_work_date.set(date) {
            eprintln!("{}", e.form_message());
            return Ok(e.exit_code());
        }
    }

    if let Some(path) = &args.file {
        let handle = match FileHandle::open(path).await {
            Ok(handle) => handle,
            Err(e) => return Ok(report_failure(&flow, &e).await),
        };
        let handle = match &args.mime {
            Some(mime) => handle.with_mime_type(mime.clone()),
            None => handle,
        };

        info!(file = %handle.name(), size = handle.size(), "staging document");
        if let Err(e) = flow.select_file(handle).await {
            return Ok(report_failure(&flow, &e).await);
        }
    }

    let result = flow.submit_participant(&form).await;
    finish(&flow, result).await
}
