#![forbid(unsafe_code)]

// Native-only runner. A wasm32 stub keeps `--workspace` builds for that target working.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::{self, Write};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use clap::Parser;
    use tracing::info;
    use tracing_subscriber::EnvFilter;
    use xt_cpu::Flags;
    use xt_machine::{
        FirmwareImage, FrameSlot, Machine, MachineConfig, RunExit, TextFrame, BASIC_BASE,
        BIOS_BASE,
    };

    const SLICE_INST_BUDGET: u64 = 100_000;

    #[derive(Debug, Parser)]
    #[command(about = "Runs the XT machine against a BIOS/BASIC ROM pair")]
    pub struct Args {
        /// JSON machine configuration. Flags below override its fields.
        #[arg(long)]
        config: Option<PathBuf>,

        /// BIOS image, loaded at 0xFE000.
        #[arg(long)]
        bios: Option<PathBuf>,

        /// ROM BASIC image, loaded at 0xF6000.
        #[arg(long)]
        basic: Option<PathBuf>,

        /// Stop after executing at most N instructions (0 = until halt).
        #[arg(long, default_value_t = 0)]
        max_insts: u64,

        /// Log every executed instruction at `trace` level.
        #[arg(long)]
        trace: bool,

        /// Print the text screen to stdout on exit.
        #[arg(long)]
        dump_screen: bool,

        /// Redraw the text screen on stdout every N milliseconds.
        #[arg(long)]
        present_ms: Option<u64>,
    }

    impl Args {
        fn machine_config(&self) -> Result<MachineConfig> {
            let mut cfg = match &self.config {
                Some(path) => MachineConfig::from_json_file(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => MachineConfig::default(),
            };
            override_image(&mut cfg, BIOS_BASE, self.bios.as_ref());
            override_image(&mut cfg, BASIC_BASE, self.basic.as_ref());
            Ok(cfg)
        }
    }

    fn override_image(cfg: &mut MachineConfig, base: u32, path: Option<&PathBuf>) {
        let Some(path) = path else {
            return;
        };
        match cfg.firmware.iter_mut().find(|img| img.base == base) {
            Some(img) => img.path = path.clone(),
            None => cfg.firmware.push(FirmwareImage {
                path: path.clone(),
                base,
            }),
        }
    }

    fn init_logging(trace: bool) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if trace { "info,xt_cpu=trace" } else { "info" })
        });
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    fn spawn_presenter(
        slot: FrameSlot,
        period: Duration,
        stop: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let mut shown: Option<Arc<TextFrame>> = None;
            while !stop.load(Ordering::Relaxed) {
                let frame = slot.latest();
                if shown.as_ref().map_or(true, |prev| !Arc::ptr_eq(prev, &frame)) {
                    let mut out = io::stdout().lock();
                    // Home the cursor and clear before each redraw.
                    let _ = write!(out, "\x1b[H\x1b[2J{}", frame.to_text());
                    let _ = out.flush();
                    shown = Some(frame);
                }
                thread::sleep(period);
            }
        })
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();
        init_logging(args.trace);

        let cfg = args.machine_config()?;
        let mut machine = Machine::new(cfg).context("failed to build machine")?;
        machine.set_trace(args.trace);

        let stop = Arc::new(AtomicBool::new(false));
        let presenter = args.present_ms.map(|ms| {
            spawn_presenter(
                machine.frame_slot(),
                Duration::from_millis(ms.max(1)),
                stop.clone(),
            )
        });

        let mut total_executed: u64 = 0;
        loop {
            let budget = if args.max_insts == 0 {
                SLICE_INST_BUDGET
            } else if total_executed >= args.max_insts {
                break;
            } else {
                (args.max_insts - total_executed).min(SLICE_INST_BUDGET)
            };

            let exit = machine.run_slice(budget);
            total_executed = total_executed.saturating_add(exit.executed());
            if let RunExit::Halted { .. } = exit {
                // A halted core waits for the next interrupt; with IF clear
                // nothing can wake it.
                if !machine.cpu().state.flag(Flags::IF) {
                    info!(total_executed, "guest halted with interrupts disabled");
                    break;
                }
            }
            if presenter.is_some() {
                machine.publish_text_frame();
            }
        }
        info!(total_executed, "run finished");

        stop.store(true, Ordering::Relaxed);
        if let Some(handle) = presenter {
            let _ = handle.join();
        }

        if args.dump_screen {
            print!("{}", machine.text_frame().to_text());
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}
