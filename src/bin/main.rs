#![warn(rust_2018_idioms)]

use std::{
    io::{stdout, Write},
    thread,
};

use anyhow::{Context, Result};
use memprobe::{args::Args, options, runtime::MaxMemorySource, MemoryProbe, MemorySnapshot};

fn write_plain(
    out: &mut impl Write, snapshot: &MemorySnapshot, source: MaxMemorySource,
) -> std::io::Result<()> {
    fn optional(value: Option<u64>) -> String {
        value.map_or_else(|| "unsupported".to_string(), |bytes| format!("{bytes} B"))
    }

    writeln!(out, "max memory:        {} B ({source})", snapshot.max_memory)?;
    writeln!(out, "committed memory:  {} B", snapshot.committed_memory)?;
    writeln!(out, "collection time:   {} ms", snapshot.collection_time_ms)?;
    writeln!(
        out,
        "total physical:    {}",
        optional(snapshot.total_physical_memory)
    )?;
    writeln!(
        out,
        "free physical:     {}",
        optional(snapshot.free_physical_memory)
    )
}

fn main() -> Result<()> {
    let args = Args::get();

    #[cfg(all(feature = "logging", debug_assertions))]
    {
        memprobe::utils::logging::init_logger(
            log::LevelFilter::Debug,
            std::ffi::OsStr::new("debug.log"),
        )?;
    }

    let config = options::init_config(&args)
        .context("Found an issue while trying to build the config options.")?;
    let probe = MemoryProbe::from_config(&config);
    let source = probe.runtime().max_memory_source();

    let mut out = stdout().lock();
    for sample in 0..args.count {
        if sample > 0 {
            thread::sleep(args.interval);
            if !args.json {
                writeln!(out)?;
            }
        }

        let snapshot = probe.snapshot();
        if args.json {
            serde_json::to_writer(&mut out, &snapshot).context("Unable to write the sample.")?;
            writeln!(out)?;
        } else {
            write_plain(&mut out, &snapshot, source)?;
        }
        out.flush()?;
    }

    Ok(())
}
