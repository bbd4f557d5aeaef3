//! Device listing.

use tabled::Tabled;

use outlet_core::{Device, Session};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "UID")]
    uid: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    tree_type: String,
    #[tabled(rename = "Device ID")]
    long_id: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            uid: d.device_uid,
            name: d.friendly_name.clone(),
            tree_type: d.tree_type.to_string(),
            long_id: d.long_device_id.clone(),
        }
    }
}

pub async fn handle(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let mut devices = session.get_device_list().await?;
    devices.sort_by_key(|d| d.device_uid);

    let out = output::render_list(
        &global.output,
        &devices,
        |d| DeviceRow::from(d),
        |d| d.device_uid.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
