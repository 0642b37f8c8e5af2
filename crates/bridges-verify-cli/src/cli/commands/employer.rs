use chrono::NaiveDate;
use clap::Args;

use bridges_verify::{Role, VerificationFlow, VerifyClient};

use super::super::args::ServiceArgs;
use super::{finish, require_form};

#[derive(Args, Debug)]
pub struct EmployerArgs {
    /// Verification link, e.g. https://.../e/TOKEN
    pub address: String,

    /// Whether the person is still employed (true/false)
    #[arg(long)]
    pub employed: Option<bool>,

    /// Last day worked (YYYY-MM-DD). Default: today
    #[arg(long)]
    pub last_work_date: Option<NaiveDate>,

    /// Free-form comments for the case manager
    #[arg(long)]
    pub comments: Option<String>,

    /// Name of the person signing
    #[arg(long)]
    pub signature_name: Option<String>,

    /// Title of the person signing
    #[arg(long)]
    pub signature_title: Option<String>,
}

pub async fn run(args: EmployerArgs, service: &ServiceArgs) -> anyhow::Result<i32> {
    let client = VerifyClient::new(service.config())?;
    let flow = VerificationFlow::start(client, &args.address).await;

    if let Some(code) = require_form(&flow, Role::Employer).await {
        return Ok(code);
    }

    let mut form = flow.employer_form();
    form.is_employed = args.employed;
    if let Some(date) = args.last_work_date {
        if let Err(e) = form.last_work_date.set(date) {
            eprintln!("{}", e.form_message());
            return Ok(e.exit_code());
        }
    }
    form.comments = args.comments.unwrap_or_default();
    form.signature_name = args.signature_name.unwrap_or_default();
    form.signature_title = args.signature_title.unwrap_or_default();

    let result = flow.submit_employer(&form).await;
    finish(&flow, result).await
}
