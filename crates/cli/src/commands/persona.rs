// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ttsbus persona` — persona administration against `config.json` (§6).

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use ttsbus_daemon::Config;

use crate::output::OutputFormat;

#[derive(Args)]
pub struct PersonaArgs {
    #[command(subcommand)]
    pub command: PersonaCommand,
}

#[derive(Subcommand)]
pub enum PersonaCommand {
    /// List registered personas
    List,
    /// Show one persona's settings
    Show {
        name: String,
    },
    /// Set the global default persona, or the default for one project
    SetDefault {
        name: String,
        /// Register this as the default for a project path instead of globally
        #[arg(long)]
        project: Option<String>,
    },
}

pub fn run(args: PersonaArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    match args.command {
        PersonaCommand::List => {
            let persona_config = config.load_persona_config()?;
            match format {
                OutputFormat::Text => {
                    for (name, persona) in &persona_config.personas {
                        let marker = if *name == persona_config.active_persona { "*" } else { " " };
                        println!("{marker} {name} (voice: {}, speed: {})", persona.voice, persona.speed);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&persona_config.personas)?);
                }
            }
        }
        PersonaCommand::Show { name } => {
            let persona_config = config.load_persona_config()?;
            let persona = persona_config
                .persona(&name)
                .map_err(|_| anyhow!("unknown persona {name:?}"))?;
            match format {
                OutputFormat::Text => {
                    println!("name:         {}", persona.name);
                    println!("voice:        {}", persona.voice);
                    println!("speed:        {}", persona.speed);
                    println!("speed_method: {:?}", persona.speed_method);
                    if let Some(speaker) = persona.speaker {
                        println!("speaker:      {speaker}");
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(persona)?);
                }
            }
        }
        PersonaCommand::SetDefault { name, project } => {
            let mut persona_config = config.load_persona_config()?;
            persona_config
                .persona(&name)
                .map_err(|_| anyhow!("unknown persona {name:?}"))?;

            match project {
                Some(project) => {
                    persona_config.project_personas.insert(project.clone(), name.clone());
                    println!("Default persona for project {project} set to {name}");
                }
                None => {
                    persona_config.active_persona = name.clone();
                    println!("Default persona set to {name}");
                }
            }
            persona_config.save(&config.config_path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "persona_tests.rs"]
mod tests;
