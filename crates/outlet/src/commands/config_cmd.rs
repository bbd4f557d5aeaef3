//! Remote config get/put.

use std::collections::BTreeMap;

use tabled::Tabled;

use outlet_core::Session;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(serde::Serialize)]
struct Entry {
    key: String,
    value: String,
}

pub async fn handle(session: &Session, args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Get { keys, default } => {
            let entries: Vec<Entry> = if let [key] = keys.as_slice() {
                let value = session.get_config(key, default.as_deref()).await?;
                vec![Entry {
                    key: key.clone(),
                    value,
                }]
            } else {
                if default.is_some() {
                    return Err(CliError::Validation {
                        field: "--default".into(),
                        reason: "only valid with a single key".into(),
                    });
                }
                let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
                let values: BTreeMap<String, String> =
                    session.get_config_list(&refs).await?.into_iter().collect();
                values
                    .into_iter()
                    .map(|(key, value)| Entry { key, value })
                    .collect()
            };

            let out = output::render_list(
                &global.output,
                &entries,
                |e| EntryRow {
                    key: e.key.clone(),
                    value: e.value.clone(),
                },
                |e| e.value.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Put { key, value } => {
            session.put_config(&key, &value).await?;
            if !global.quiet {
                eprintln!("Set {key}");
            }
            Ok(())
        }
    }
}
