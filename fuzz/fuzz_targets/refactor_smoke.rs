// Run locally (from the repo root):
//   cargo +nightly fuzz run refactor_smoke -- -runs=1000
#![no_main]

use std::sync::mpsc;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use lathe_refactor::{compute_refactorings, CancellationToken, Document, FileId, RefactoringsConfig, TextSpan};
use lathe_semantic::LocalSemanticModelProvider;
use libfuzzer_sys::fuzz_target;

mod utils;

const TIMEOUT: Duration = Duration::from_secs(2);

/// Carets tried per input, spread over the text.
const CARETS: usize = 16;

struct Runner {
    input_tx: mpsc::SyncSender<String>,
    output_rx: Mutex<mpsc::Receiver<()>>,
}

fn runner() -> &'static Runner {
    static RUNNER: OnceLock<Runner> = OnceLock::new();
    RUNNER.get_or_init(|| {
        let (input_tx, input_rx) = mpsc::sync_channel::<String>(0);
        let (output_tx, output_rx) = mpsc::sync_channel::<()>(0);

        std::thread::spawn(move || {
            // Defects must surface as panics here, not be logged away.
            let config = RefactoringsConfig::fail_fast();
            for input in input_rx {
                let document = Document::new(FileId::new("Fuzz.cs"), input.as_str())
                    .with_semantics(Arc::new(LocalSemanticModelProvider));
                for offset in caret_offsets(&input) {
                    let Ok(actions) =
                        compute_refactorings(&document, TextSpan::at(offset), &config, &CancellationToken::new())
                    else {
                        continue;
                    };
                    for action in actions {
                        // Rules may decline at apply time; only panics are bugs.
                        if let Ok(change) = action.apply(&CancellationToken::new()) {
                            let _ = change.apply_to(document.text());
                        }
                    }
                }
                let _ = output_tx.send(());
            }
        });

        Runner {
            input_tx,
            output_rx: Mutex::new(output_rx),
        }
    })
}

fn caret_offsets(text: &str) -> Vec<usize> {
    let step = (text.len() / CARETS).max(1);
    (0..=text.len())
        .step_by(step)
        .filter(|offset| text.is_char_boundary(*offset))
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    let runner = runner();
    runner
        .input_tx
        .send(text.to_owned())
        .expect("refactor_smoke worker thread exited");

    match runner
        .output_rx
        .lock()
        .expect("refactor_smoke worker receiver poisoned")
        .recv_timeout(TIMEOUT)
    {
        Ok(()) => {}
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("refactor_smoke fuzz target timed out"),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            panic!("refactor_smoke worker thread panicked")
        }
    }
});
