pub mod build_info;
pub mod clock;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Every workspace crate that logs gets the same default level.
const DEFAULT_DIRECTIVES: [&str; 3] = [
    "lot_ledger=info",
    "lotledger_core=info",
    "lotledger_storage_json=info",
];

/// Initializes the global tracing subscriber; `RUST_LOG` adds to the default directives.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(with_default_directives(EnvFilter::from_default_env()))
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    });
}

fn with_default_directives(mut filter: EnvFilter) -> EnvFilter {
    for directive in DEFAULT_DIRECTIVES {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn default_directives_cover_member_crates() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(with_default_directives(EnvFilter::new("")))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "lotledger_core::ledger", "event recorded");
            tracing::warn!(target: "lotledger_core::ledger", "command rolled back");
            tracing::info!(target: "lotledger_storage_json", "journal saved");
            tracing::debug!(target: "lotledger_core::replay", "replaying event");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("event recorded"));
        assert!(output.contains("command rolled back"));
        assert!(output.contains("journal saved"));
        assert!(!output.contains("replaying event"));
    }
}
