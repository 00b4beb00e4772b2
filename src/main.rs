use anyhow::Result;
use clap::Parser;
use segregation_lib::app::App;
use segregation_lib::cli::{Args, Mode};
use segregation_tui::Tui;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.mode {
        Mode::Headless => {
            segregation_core::init_logging();
            let config = args.resolve_config()?;
            let mut app = App::new(config)?;
            let report = app.run_headless(args.export.as_deref(), args.stride)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} after {} steps ({} moves). A: {} B: {} Empty: {}, unhappy: {}",
                    if report.summary.converged {
                        "Converged"
                    } else {
                        "Stopped"
                    },
                    report.summary.steps,
                    report.summary.total_moves,
                    report.counts.type_a,
                    report.counts.type_b,
                    report.counts.empty,
                    report.unhappy
                );
            }
        }
        Mode::Tui => {
            // no log subscriber here: output would tear the alternate screen
            let config = args.resolve_config()?;
            let mut app =
                App::new(config)?.with_frame_interval(Duration::from_millis(args.interval_ms));

            let mut tui = Tui::new()?;
            tui.init()?;
            let res = app.run(&mut tui).await;
            tui.exit()?;

            if let Err(e) = res {
                eprintln!("Application error: {e}");
            } else {
                println!(
                    "Exited after {} steps ({} moves).",
                    app.sim.steps(),
                    app.sim.metrics.total_moves()
                );
            }
        }
    }

    Ok(())
}
