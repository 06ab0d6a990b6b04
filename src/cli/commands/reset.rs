use crate::cli::cli::StoreArgs;
use crate::cli::ui::display_success;
use crate::protocol::DEVICE_ID_KEY;
use crate::storage::{JsonFileStore, KeyValueStore};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "reset",
    about = "Forget the stored device id so the next resolve fingerprints again"
)]
pub struct ResetCommand {
    #[command(flatten)]
    store: StoreArgs,
}

pub async fn execute(command: ResetCommand) -> anyhow::Result<()> {
    let store = JsonFileStore::new(command.store.store_path());
    store.remove(DEVICE_ID_KEY).await?;
    tracing::info!("Removed {} from {}", DEVICE_ID_KEY, store.path().display());
    display_success("Device id cleared");
    Ok(())
}
