use std::time::Instant;

use log_json_serializer::{
    make_serializer_from_config, record, BackendKind, OptionFlag, SerializerConfig,
};

fn main() {
    let n: u64 = 100_000;

    for kind in BackendKind::ALL.into_iter().filter(|k| k.is_available()) {
        let cfg = SerializerConfig::new(kind).with_option(OptionFlag::SortKeys);
        let serializer = match make_serializer_from_config(&cfg) {
            Ok(serializer) => serializer,
            Err(e) => {
                eprintln!("{kind}: {e}");
                continue;
            }
        };

        let start = Instant::now();
        let mut bytes = 0usize;
        for i in 0..n {
            let rec = record! {
                "level" => "ERROR",
                "target" => "auth",
                "iteration" => i,
                "message" => "default load test error",
            };
            match serializer.to_json(&rec) {
                Ok(text) => bytes += text.len(),
                Err(e) => eprintln!("{kind}: {e}"),
            }
        }

        let elapsed = start.elapsed();
        println!(
            "{kind}: encoded {} records ({} bytes) in {:?} (~{:.0} rec/s)",
            n,
            bytes,
            elapsed,
            n as f64 / elapsed.as_secs_f64()
        );
    }
}
