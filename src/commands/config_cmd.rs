use anyhow::Result;

use crate::cli::ConfigCommand;
use crate::config::{Config, config_path, load_config_or_default, save_config};

pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            let cfg = Config::default();
            save_config(&cfg)?;
            println!("Initialized config at {}", config_path()?.display());
            println!("Edit credentials.args to point at your credential profile.");
        }
        ConfigCommand::Show => {
            let cfg = load_config_or_default()?;
            println!("{}", toml::to_string_pretty(&cfg)?);
            println!("Config path: {}", config_path()?.display());
        }
        ConfigCommand::Set {
            host,
            port,
            agent,
            agent_program,
            agent_args,
            agent_timeout_secs,
            region,
            credential_program,
            credential_args,
            credential_timeout_secs,
        } => {
            let mut cfg = load_config_or_default()?;
            if let Some(v) = host {
                cfg.host = v;
            }
            if let Some(v) = port {
                cfg.port = v;
            }
            if let Some(v) = agent {
                cfg.agent.name = v;
            }
            if let Some(v) = agent_program {
                cfg.agent.program = v;
            }
            if let Some(v) = agent_args {
                cfg.agent.args = parse_csv_list(&v);
            }
            if let Some(v) = agent_timeout_secs {
                cfg.agent.timeout_secs = v.max(1);
            }
            if let Some(v) = region {
                cfg.agent.region = if v.trim().is_empty() { None } else { Some(v) };
            }
            if let Some(v) = credential_program {
                cfg.credentials.program = v;
            }
            if let Some(v) = credential_args {
                cfg.credentials.args = parse_csv_list(&v);
            }
            if let Some(v) = credential_timeout_secs {
                cfg.credentials.timeout_secs = v.max(1);
            }
            save_config(&cfg)?;
            println!("Config updated:");
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}

fn parse_csv_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| x.to_string())
        .collect()
}
