use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// Crates whose docs are built, in dependency order.
const CRATES: &[&str] = &["platform", "ui", "firmware"];

/// Doc builds: label, extra cargo arguments. The hardware build documents
/// the defmt logging and driver paths the host build compiles out.
const BUILDS: &[(&str, &[&str])] = &[
    ("host (std, tracing)", &["--features", "firmware/std"]),
    (
        "hardware (thumbv7em, defmt)",
        &[
            "--target",
            "thumbv7em-none-eabihf",
            "--features",
            "firmware/hardware",
        ],
    ),
];

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // `ui` cannot link into `firmware`, so rustdoc never sees these paths.
    println!("{}", "  Checking cross-crate references...".cyan());
    let root = workspace_root()?;
    let stale = stale_references(&root)?;
    if !stale.is_empty() {
        eprintln!("{}", "  ✗ Docs name items that do not exist".red().bold());
        for (file, path) in &stale {
            eprintln!("    {}: `{path}`", file.display());
        }
        anyhow::bail!("{} stale doc reference(s)", stale.len());
    }
    println!("{}", "  ✓ Cross-crate references resolve".green());

    for (label, extra) in BUILDS {
        println!("{}", format!("  Documenting {label}...").cyan());
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.arg("doc").arg("--no-deps").arg("--document-private-items");
        for name in CRATES {
            cmd.args(["-p", name]);
        }
        cmd.args(*extra);
        cmd.env("RUSTDOCFLAGS", "-D rustdoc::broken_intra_doc_links");

        let output = cmd
            .output()
            .with_context(|| format!("Failed to document {label}"))?;
        if !output.status.success() {
            eprintln!("{}", format!("  ✗ {label} documentation failed").red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{label} documentation failed");
        }
        println!(
            "{}",
            format!(
                "  ✓ {label} documented in {:.2}s",
                start.elapsed().as_secs_f64()
            )
            .green()
        );
    }

    println!();
    println!(
        "{}",
        format!(
            "✓ Documentation built in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();
    for name in CRATES {
        println!("   {}", format!("target/doc/{name}/index.html").dimmed());
    }

    if open {
        // The host build is the one most readers want.
        let index = root.join("target/doc/firmware/index.html");
        open_in_browser(&index)?;
    }
    println!();

    Ok(())
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask is not inside the workspace")
}

fn open_in_browser(index: &Path) -> Result<()> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    };
    Command::new(opener)
        .arg(index)
        .status()
        .with_context(|| format!("Failed to open {}", index.display()))?;
    Ok(())
}

/// Every `` `crate::item` `` in a doc comment whose first segment is not a
/// module or re-export of that crate.
fn stale_references(root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut exports = Vec::new();
    for name in CRATES {
        let lib = root.join("crates").join(name).join("src/lib.rs");
        let src = fs::read_to_string(&lib)
            .with_context(|| format!("Failed to read {}", lib.display()))?;
        exports.push((*name, exported_names(&src)));
    }

    let mut stale = Vec::new();
    for name in CRATES {
        let mut files = Vec::new();
        rust_files(&root.join("crates").join(name).join("src"), &mut files)?;
        for file in files {
            let src = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            for (krate, names) in &exports {
                for item in doc_references(&src, krate) {
                    if !names.contains(&item) {
                        stale.push((file.clone(), format!("{krate}::{item}")));
                    }
                }
            }
        }
    }
    Ok(stale)
}

fn rust_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            rust_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
    Ok(())
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Module names and re-exported items of a crate root.
fn exported_names(lib_src: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_use = false;
    for line in lib_src.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("pub mod ").or_else(|| line.strip_prefix("mod ")) {
            names.push(rest.chars().take_while(|c| is_ident(*c)).collect());
            continue;
        }
        if let Some(rest) = line.strip_prefix("pub use ") {
            in_use = true;
            names.extend(idents(rest));
        } else if in_use {
            names.extend(idents(line));
        }
        if line.contains(';') {
            in_use = false;
        }
    }
    names
}

fn idents(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !is_ident(c))
        .filter(|w| !w.is_empty() && *w != "self")
        .map(String::from)
}

/// First path segment after `` `krate:: `` in doc comments.
fn doc_references(src: &str, krate: &str) -> Vec<String> {
    let needle = format!("`{krate}::");
    src.lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with("//!") || line.starts_with("///"))
        .flat_map(|line| line.split(needle.as_str()).skip(1))
        .map(|rest| rest.chars().take_while(|c| is_ident(*c)).collect::<String>())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LIB: &str = "\
pub mod display;
pub mod render;

pub use display::{
    FlushPipeline, St7796,
};
pub use render::render_dirty;
";

    #[test]
    fn modules_and_reexports_are_exported() {
        let names = exported_names(LIB);
        for name in ["display", "render", "FlushPipeline", "St7796", "render_dirty"] {
            assert!(names.iter().any(|n| n == name), "{name} missing");
        }
        assert!(!names.iter().any(|n| n == "ui"));
    }

    #[test]
    fn only_doc_comments_are_scanned() {
        let src = "//! Drawing lives in `firmware::ui`.\n// `firmware::gone`\n/// See [`firmware::render_dirty`].\n";
        assert_eq!(doc_references(src, "firmware"), ["ui", "render_dirty"]);
    }

    #[test]
    fn workspace_docs_have_no_stale_references() {
        let stale = stale_references(&workspace_root().unwrap()).unwrap();
        assert!(stale.is_empty(), "{stale:?}");
    }
}
