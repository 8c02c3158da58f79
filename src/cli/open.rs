//! Open command - opens the Claude usage page in the default browser

use clap::Args;

use crate::providers::claude::USAGE_PAGE_URL;

/// Arguments for the open command
#[derive(Args, Debug, Default)]
pub struct OpenArgs {
    /// Print the URL instead of launching a browser
    #[arg(long)]
    pub print: bool,
}

/// Run the open command
pub fn run(args: OpenArgs) -> anyhow::Result<()> {
    if args.print {
        println!("{}", USAGE_PAGE_URL);
        return Ok(());
    }

    tracing::debug!(url = USAGE_PAGE_URL, "Opening usage page");
    open::that(USAGE_PAGE_URL)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", USAGE_PAGE_URL, e))?;
    Ok(())
}
