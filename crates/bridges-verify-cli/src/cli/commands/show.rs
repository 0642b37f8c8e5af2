use clap::Args;

use bridges_verify::{VerificationFlow, VerifyClient};

use super::super::args::ServiceArgs;
use crate::exit_codes::{LINK_ERROR, SUCCESS};
use crate::render::render_flow;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Verification link, path (/p/TOKEN, /e/TOKEN) or query (?token=...&type=...)
    pub address: String,
}

pub async fn run(args: ShowArgs, service: &ServiceArgs) -> anyhow::Result<i32> {
    let client = VerifyClient::new(service.config())?;
    let flow = VerificationFlow::start(client, &args.address).await;

    print!("{}", render_flow(&flow).await);

    if flow.screen().await.is_terminal() {
        Ok(LINK_ERROR)
    } else {
        Ok(SUCCESS)
    }
}
