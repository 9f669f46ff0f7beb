use clap::Parser;
use std::path::Path;

mod cli;

const DIST_ROOT: &str = "CastMatch";

async fn run(program: &str, args: &[&str], dir: Option<&Path>) -> Result<(), String> {
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let status = cmd
        .spawn()
        .map_err(|e| format!("failed to start {program}: {e}"))?
        .wait()
        .await
        .map_err(|e| format!("failed to wait on {program}: {e}"))?;
    if !status.success() {
        return Err(format!("{program} {} exited with {status}", args.join(" ")));
    }
    Ok(())
}

async fn build_frontend(release: bool) -> Result<(), String> {
    let args: &[&str] = if release { &["build", "--release"] } else { &["build"] };
    run("trunk", args, Some(Path::new("frontend"))).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Launch => {
            build_frontend(false).await?;
            run(
                "cargo",
                &[
                    "run",
                    "--package",
                    "castmatch-launcher",
                    "--",
                    "--dist-dir",
                    "frontend/dist",
                ],
                None,
            )
            .await?;
        }
        cli::Command::Dist { target_triple } => {
            let mut args = vec!["build", "--package", "castmatch-launcher", "--release"];
            if let Some(target_triple) = &target_triple {
                args.push("--target");
                args.push(target_triple);
            }
            run("cargo", &args, None).await?;
            build_frontend(true).await?;

            // Re-runs overwrite the previous bundle.
            if tokio::fs::try_exists(DIST_ROOT).await? {
                tokio::fs::remove_dir_all(DIST_ROOT).await?;
            }
            tokio::fs::create_dir_all(format!("{DIST_ROOT}/dist")).await?;
            tokio::fs::copy(
                "target/release/castmatch-launcher",
                format!("{DIST_ROOT}/castmatch-launcher"),
            )
            .await?;
            let mut entries = tokio::fs::read_dir("frontend/dist").await?;
            while let Some(file) = entries.next_entry().await? {
                tokio::fs::copy(
                    file.path(),
                    format!("{DIST_ROOT}/dist/{}", file.file_name().to_string_lossy()),
                )
                .await?;
            }
        }
    }

    Ok(())
}
