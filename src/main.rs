use clap::{Parser, Subcommand};

use release_gate::artifacts::{CommandPackager, CommandPublisher};
use release_gate::config;
use release_gate::pipeline::{self, ReleaseContext};
use release_gate::ui;
use release_gate::vcs::SystemGit;
use release_gate::version;

#[derive(clap::Parser)]
#[command(
    name = "release-gate",
    about = "Gate, package, publish, and tag-sync library releases"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the release preconditions and stop
    CheckRelease,
    /// Run the full pipeline: gate, clean, package, publish, push tags
    Release {
        #[arg(long, help = "Run the gate and show the plan without side effects")]
        dry_run: bool,
    },
    /// Print the resolved release version, tag, and next version
    Version,
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        ui::display_error(&err.to_string());
        std::process::exit(err.exit_code());
    }
}

fn run(args: Args) -> release_gate::Result<()> {
    let config = config::load_config(args.config.as_deref())?;
    config.validate()?;

    // The version is computed exactly once; everything downstream reads it.
    let vcs = SystemGit::open(".")?;
    let version = version::resolve(&vcs, &config.base_version)?;

    match args.command {
        Command::Version => {
            println!("version: {}", version);
            println!("tag:     {}", version.tag());
            println!("next:    {}", version.next());
            Ok(())
        }
        Command::CheckRelease => {
            let ctx = ReleaseContext::new(config, version);
            pipeline::check_release_ready(&ctx, &vcs)?;
            ui::display_success(&format!("ready to release {}", ctx.version.tag()));
            Ok(())
        }
        Command::Release { dry_run } => {
            let ctx = ReleaseContext::new(config, version);

            if dry_run {
                pipeline::check_release_ready(&ctx, &vcs)?;
                ui::display_release_plan(&ctx);
                return Ok(());
            }

            ui::display_status(&format!("releasing {} {}", ctx.config.name, ctx.version));
            let packager = CommandPackager::new();
            let publisher = CommandPublisher::new(ctx.config.publish_command.clone());
            let ctx = pipeline::run_release(ctx, &vcs, &packager, &publisher)?;
            ui::display_success(&format!(
                "released {} {} and pushed {}",
                ctx.config.name,
                ctx.version,
                ctx.version.tag()
            ));
            Ok(())
        }
    }
}
