//! Opens a window and clears it every frame until it is closed.

use hellogl::{App, DemoConfig, logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DemoConfig::from_args()?;
    logging::init(config.log_level)?;

    let mut app = App::new(&config.window, "Hello window")?;

    while app.handle_events() {
        app.clear(config.clear_color);
        app.swap();
    }

    Ok(())
}
