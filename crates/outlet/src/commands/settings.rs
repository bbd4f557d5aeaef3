//! Local settings file handlers.

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

pub fn handle(args: SettingsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Show => {
            let mut cfg = outlet_config::load_config()?;
            crate::apply_overrides(&mut cfg, global);
            outlet_config::to_session_config(&cfg)?;

            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |c| format!("{}:{}", c.connection.host, c.connection.port),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Path => {
            output::print_output(&outlet_config::config_path().display().to_string(), false);
            Ok(())
        }

        SettingsCommand::Init => {
            let mut cfg = outlet_config::Config::default();
            crate::apply_overrides(&mut cfg, global);
            outlet_config::to_session_config(&cfg)?;
            let path = outlet_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}
