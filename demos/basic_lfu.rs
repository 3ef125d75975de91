use lfukit::policy::lfu::LfuCache;
use lfukit::policy::placement::Variant;
use lfukit::traits::TraceCache;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // (key, size) references: "a"=1 is hot, "b"=2 and "c"=3 compete for the rest.
    let trace = [(1, 1), (2, 1), (1, 1), (3, 1), (2, 1), (1, 1)];

    for variant in Variant::ALL {
        let mut cache = match LfuCache::open(2, variant) {
            Ok(cache) => cache,
            Err(err) => {
                eprintln!("cannot open cache: {err}");
                return;
            },
        };
        match cache.replay(trace) {
            Ok(replay) => println!(
                "{variant:>12}: hits={} misses={} freq(b)={:?}",
                replay.hits,
                replay.misses,
                cache.frequency(2)
            ),
            Err(err) => eprintln!("{variant}: {err}"),
        }
        println!("{:>12}  {}", "", cache.close());
    }
}

// Expected output (first line per variant):
//        basic: hits=2 misses=4 freq(b)=Some(1)
//      perfect: hits=2 misses=4 freq(b)=Some(2)
// fast-perfect: hits=2 misses=4 freq(b)=Some(2)
//
// Explanation: capacity=2; "c" evicts "b" (lowest frequency, oldest). When
// "b" returns, Basic restarts it at frequency 1 while the Perfect variants
// resume from its remembered frequency.
