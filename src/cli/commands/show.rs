use crate::cli::cli::StoreArgs;
use crate::protocol::DEVICE_ID_KEY;
use crate::storage::{JsonFileStore, KeyValueStore};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "show", about = "Print the stored device id without contacting the service")]
pub struct ShowCommand {
    #[command(flatten)]
    store: StoreArgs,
}

pub async fn execute(command: ShowCommand) -> anyhow::Result<()> {
    let store = JsonFileStore::new(command.store.store_path());

    match store.get(DEVICE_ID_KEY).await? {
        Some(device_id) => println!("{}", device_id),
        None => println!("No device id stored in {}", store.path().display()),
    }

    Ok(())
}
