// Entrypoint for the CLI application.
// - Keeps `main` small: read the config, then hand a desktop presenter and
//   the HTTP client constructor to the flow in `app`.
// - Returns `anyhow::Result`, so unhandled failures print and exit non-zero.

use vision_ledger::{api::VisionClient, app, config::Config, logging, ui::DesktopUi};

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = Config::from_env()?;
    tracing::debug!(db = %config.db_path.display(), endpoint = %config.endpoint, "starting");

    let outcome = app::run(&mut DesktopUi, &config, VisionClient::from_config)?;
    tracing::info!(?outcome, "finished");
    Ok(())
}
