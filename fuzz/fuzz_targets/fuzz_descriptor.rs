#![no_main]

use std::sync::mpsc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

use canon_config::AnalysisConfig;
use canon_model::{ClassDescriptor, ClassId, MemberId, MemorySupplier, RawMember};
use libfuzzer_sys::fuzz_target;

mod utils;

const TIMEOUT: Duration = Duration::from_secs(1);

struct Runner {
    input_tx: mpsc::SyncSender<String>,
    output_rx: Mutex<mpsc::Receiver<()>>,
}

/// Each input line is `name descriptor flags`; parseable lines become members
/// of one class, which is then analysed.
fn analyze_lines(input: &str) {
    let mut supplier = MemorySupplier::new();
    let class = supplier.add_class(ClassDescriptor::new(ClassId::new(1), "fuzz.Target"));

    for (idx, line) in input.lines().take(utils::MAX_MEMBERS).enumerate() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(descriptor)) = (parts.next(), parts.next()) else {
            continue;
        };
        let flags = parts
            .next()
            .and_then(|flags| u16::from_str_radix(flags, 16).ok())
            .unwrap_or(0);
        let id = MemberId::new(idx as u32 + 1);

        let member = if descriptor.starts_with('(') {
            RawMember::from_method_stub(id, class, name, descriptor, flags)
        } else {
            RawMember::from_field_stub(id, class, name, descriptor, flags)
        };
        if let Ok(member) = member {
            supplier.add_member(member);
        }
    }

    let model = canon_analysis::analyze_class(&supplier, class, &AnalysisConfig::default())
        .expect("single class without supertypes cannot be cyclic");
    let json = model.to_json().expect("model serializes");
    let restored = canon_model::CanonicalModel::from_json(&json).expect("model deserializes");
    assert_eq!(restored, model);
}

fn runner() -> &'static Runner {
    static RUNNER: OnceLock<Runner> = OnceLock::new();
    RUNNER.get_or_init(|| {
        let (input_tx, input_rx) = mpsc::sync_channel::<String>(0);
        let (output_tx, output_rx) = mpsc::sync_channel::<()>(0);

        std::thread::spawn(move || {
            for input in input_rx {
                let _ = canon_types::parse_method_descriptor(&input);
                let _ = canon_types::parse_field_descriptor(&input);
                analyze_lines(&input);
                let _ = output_tx.send(());
            }
        });

        Runner {
            input_tx,
            output_rx: Mutex::new(output_rx),
        }
    })
}

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    let runner = runner();
    runner
        .input_tx
        .send(text.to_owned())
        .expect("fuzz_descriptor worker thread exited");

    match runner
        .output_rx
        .lock()
        .expect("fuzz_descriptor worker receiver poisoned")
        .recv_timeout(TIMEOUT)
    {
        Ok(()) => {}
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("fuzz_descriptor fuzz target timed out"),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            panic!("fuzz_descriptor worker thread panicked")
        }
    }
});
