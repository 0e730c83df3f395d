use anyhow::Result;
use audiobook_organizer::component::AudiobookOrganizer;
use audiobook_organizer::init;
use audiobook_organizer::signal::setup_shutdown_signal;
use console::style;
use log::{info, warn};

fn main() -> Result<()> {
    init::init();
    let shutdown_signal = setup_shutdown_signal()?;

    let organizer = AudiobookOrganizer::new(shutdown_signal);

    match organizer.run() {
        Ok(()) => info!("Program exited normally"),
        Err(e) => {
            warn!("Program error: {e:#}");
            eprintln!("{} {e:#}", style("Error:").red().bold());
        }
    }

    Ok(())
}
