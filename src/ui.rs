//! Display helpers for operator-facing output.
//!
//! Pure formatting; no prompts. Errors go to stderr, everything else to
//! stdout.

use console::style;

use crate::pipeline::ReleaseContext;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with a green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with a yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Show the steps a release run would perform, without running them.
pub fn display_release_plan(ctx: &ReleaseContext) {
    println!(
        "\n{}",
        style(format!(
            "Release plan for {} {}",
            ctx.config.name, ctx.version
        ))
        .bold()
    );
    println!("  1. clear {}/", ctx.config.dist_dir);
    println!(
        "  2. package {}-{}.tar.gz with its provenance manifest",
        ctx.config.name, ctx.version
    );
    println!("  3. publish the archive");
    println!(
        "  4. push {} and {} to {}",
        ctx.version.tag(),
        ctx.config.branch,
        ctx.config.remote
    );
}
