use anyhow::{Context, Result};
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

// Global clipboard keeper channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Start the keeper thread if it is not running yet.
///
/// On Linux the clipboard contents vanish with the `Clipboard` that set
/// them, so each copy is held alive for a while on a background thread to
/// give clipboard managers time to pick it up.
fn init_clipboard_keeper() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                match Clipboard::new() {
                    Ok(mut clipboard) => {
                        if let Err(e) = clipboard.set_text(&text) {
                            tracing::warn!("clipboard set failed: {e}");
                            continue;
                        }
                        std::thread::sleep(Duration::from_secs(2));
                    }
                    Err(e) => tracing::warn!("clipboard unavailable: {e}"),
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard keeper"))
}

/// Queue text for the system clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_keeper()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard keeper channel closed"))?;
    Ok(())
}

/// Read text from the system clipboard.
pub fn paste_from_clipboard() -> Result<String> {
    let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
    clipboard.get_text().context("read clipboard text")
}
