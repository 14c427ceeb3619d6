use std::io;
use std::sync::Once;

use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

static INIT: Once = Once::new();

/// Route `tracing` output to the browser console. Safe to call repeatedly.
pub fn init() {
    INIT.call_once(|| {
        // no clock on wasm32-unknown-unknown, so no timestamps
        let _ = tracing_subscriber::fmt()
            .with_writer(ConsoleMakeWriter)
            .without_time()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter(Vec::new())
    }
}

/// Buffers one formatted event and emits it as a single console line.
struct ConsoleWriter(Vec<u8>);

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.0.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.0);
        console::log_1(&JsValue::from_str(line.trim_end()));
    }
}
