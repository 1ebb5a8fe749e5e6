//! Power-on demonstration
//!
//! Walks the panel through icons, two words and a counter.

use alloc::format;

use defmt::*;
use embassy_time::Timer;

use sonyvfd_core::traits::PanelDriver;
use sonyvfd_drivers::VfdDisplay;

/// Brightness used for the whole run
const DEMO_BRIGHTNESS: u8 = 1;

/// Run the demonstration once
pub async fn run<P: PanelDriver>(display: &mut VfdDisplay<P>) -> Result<(), P::Error> {
    info!("Demo: {} character positions", display.positions());
    display.set_brightness(DEMO_BRIGHTNESS)?;

    debug!("Demo: icons");
    display.set_icon("icon_mp3", true);
    display.flush()?;
    Timer::after_millis(500).await;
    display.set_icon("icon_pgm", true);
    display.flush()?;
    Timer::after_millis(500).await;

    // Icons held
    Timer::after_secs(2).await;
    display.clear()?;

    debug!("Demo: strings");
    display.write_string("SONY")?;
    Timer::after_secs(2).await;

    display.write_string("PLAY")?;
    display.set_icon("icon_play", true);
    display.flush()?;
    Timer::after_secs(2).await;

    debug!("Demo: counter");
    for i in 0..100u32 {
        display.write_string(&format!("{:4}", i))?;
        Timer::after_millis(100).await;
    }

    info!("Demo done");
    Ok(())
}
