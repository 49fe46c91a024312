use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Build checks: label, cargo arguments, whether failure aborts the run.
const CHECKS: &[(&str, &[&str], bool)] = &[
    (
        "hardware target (thumbv7em, defmt)",
        &[
            "check",
            "-p",
            "firmware",
            "--target",
            "thumbv7em-none-eabihf",
            "--features",
            "hardware",
        ],
        true,
    ),
    (
        "host build (std, tracing)",
        &["check", "-p", "firmware", "--features", "std"],
        true,
    ),
    (
        "platform + ui (no_std)",
        &[
            "check",
            "-p",
            "platform",
            "-p",
            "ui",
            "--target",
            "thumbv7em-none-eabihf",
            "--no-default-features",
        ],
        true,
    ),
    (
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        false,
    ),
    ("formatting", &["fmt", "--all", "--check"], false),
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking firmware builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for (label, args, required) in CHECKS {
        println!("{}", format!("  Checking {label}...").cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(*args)
            .output()
            .with_context(|| format!("Failed to run {label} check"))?;

        if output.status.success() {
            println!(
                "{}",
                format!(
                    "  ✓ {label} passed in {:.2}s",
                    start.elapsed().as_secs_f64()
                )
                .green()
            );
        } else if *required {
            eprintln!("{}", format!("  ✗ {label} failed").red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{label} check failed");
        } else {
            // Warnings only: show them, keep going
            eprintln!("{}", format!("  ⚠ {label} reported issues").yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        }
        println!();
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
