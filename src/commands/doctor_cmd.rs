use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::config::load_config_or_default;
use crate::credentials::fetch_credentials;

pub async fn run_doctor() -> Result<()> {
    let cfg = load_config_or_default()?;
    println!("== agentcore-chat doctor ==");
    println!("Agent: {}", cfg.agent.name);

    let mut healthy = true;
    for program in [&cfg.credentials.program, &cfg.agent.program] {
        match find_program(program) {
            Some(path) => println!("[ok] {program} found at {}", path.display()),
            None => {
                println!("[fail] {program} not found on PATH");
                healthy = false;
            }
        }
    }
    if !healthy {
        bail!("required commands are missing");
    }

    match fetch_credentials(&cfg.credentials).await {
        Ok(creds) => println!("[ok] credentials obtained (access key {})", creds.access_key_id),
        Err(e) => bail!("{}", e.user_message()),
    }

    println!("doctor finished: healthy");
    Ok(())
}

/// Resolves `program` the way the OS would when spawning it.
fn find_program(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    let search = env::var_os("PATH")?;
    env::split_paths(&search).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}
