use std::{error, fs, io::Read, path::Path, path::PathBuf};

use clap::Parser;
use emu::ring_buffer::RingBuffer;
use emu::{Arm2, DisassemblySink, Fault};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Lines kept around to show what led to a fault.
const RECENT_LINES: usize = 16;

#[derive(Parser, Debug)]
#[command(version, about = "Acorn Archimedes (ARM2) emulator.", long_about = None)]
struct Args {
    /// Raw ROM dump, mapped at 0x3800000 and at 0 until the first ROM access.
    #[arg(name = "ROM")]
    rom: PathBuf,

    /// Log to $TMPDIR/archimedes-<timestamp>.log instead of stdout.
    #[arg(long)]
    log_file: bool,

    /// Stop after this many steps. Runs until a fault when absent.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Steps executed per slice of the run loop.
    #[arg(long, default_value_t = 4096, value_parser = clap::value_parser!(u64).range(1..))]
    batch: u64,

    /// Do not print the disassembly of each step.
    #[arg(long)]
    quiet: bool,
}

/// Prints each line unless quiet, and remembers the latest ones.
struct ConsoleSink {
    quiet: bool,
    recent: RingBuffer<String>,
}

impl DisassemblySink for ConsoleSink {
    fn consume(&mut self, line: String) {
        if !self.quiet {
            println!("{line}");
        }
        self.recent.push(line);
    }
}

fn main() {
    let args = Args::parse();

    let _guard = init_tracing(args.log_file);

    tracing::info!("archimedes v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("loading {}", args.rom.display());

    let rom = match read_file(&args.rom) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{}: {e}", args.rom.display());
            std::process::exit(2);
        }
    };

    let sink = ConsoleSink {
        quiet: args.quiet,
        recent: RingBuffer::new(RECENT_LINES),
    };
    let mut cpu = Arm2::with_sink(&rom, sink);

    match run(&mut cpu, args.max_steps, args.batch) {
        Ok(steps) => tracing::info!("stopped after {steps} steps"),
        Err(fault) => {
            tracing::warn!("{fault} after {} steps", cpu.steps());
            if args.quiet {
                for line in cpu.sink().recent.iter() {
                    eprintln!("{line}");
                }
            }
            eprintln!("{fault}");
            eprintln!("{cpu:?}");
            std::process::exit(3);
        }
    }
}

/// Runs `cpu` in slices of `batch` steps until `max_steps` or a fault.
fn run<S: DisassemblySink>(
    cpu: &mut Arm2<'_, S>,
    max_steps: Option<u64>,
    batch: u64,
) -> Result<u64, Fault> {
    loop {
        let slice = max_steps.map_or(batch, |max| batch.min(max.saturating_sub(cpu.steps())));
        if slice == 0 {
            return Ok(cpu.steps());
        }

        cpu.run_for(slice)?;

        if let Some(diagnostic) = cpu.memory.take_diagnostic() {
            tracing::debug!("last memory diagnostic: {diagnostic}");
        }
    }
}

/// Logs to stdout, or to a file in the temp dir. The guard flushes the file
/// writer when dropped.
fn init_tracing(log_file: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if log_file {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let filename = format!("archimedes-{timestamp}.log");
        let dir = std::env::temp_dir();
        println!("Logging to file: {:?}", dir.join(&filename));

        let appender = tracing_appender::rolling::never(dir, filename);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();

        Some(guard)
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        None
    }
}

fn read_file(filepath: &Path) -> Result<Vec<u8>, Box<dyn error::Error>> {
    let mut f = fs::File::open(filepath)?;
    let mut buf = vec![];
    f.read_to_end(&mut buf)?;

    Ok(buf)
}
