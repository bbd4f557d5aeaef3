//! Single-node lookup.

use outlet_core::model::timestamp_to_datetime;
use outlet_core::{Session, TNode};

use crate::cli::{GlobalOpts, NodeArgs};
use crate::error::CliError;
use crate::output;

fn detail(node: &TNode) -> String {
    let modified = node
        .modify_ts()
        .and_then(timestamp_to_datetime)
        .map_or_else(|| "-".into(), |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    let size = node.size_bytes().map_or_else(|| "-".into(), |s| s.to_string());

    [
        format!("Name:       {}", node.name()),
        format!("Identifier: {}", node.identifier()),
        format!("Kind:       {}", node.payload().kind_name()),
        format!("Size:       {size}"),
        format!("Modified:   {modified}"),
        format!("Trashed:    {}", node.trashed),
        format!("Shared:     {}", node.is_shared),
    ]
    .join("\n")
}

pub async fn handle(session: &Session, args: NodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let node = session
        .get_node_for_uid(args.uid, args.device)
        .await?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "node".into(),
            identifier: format!("{}:{}", args.device, args.uid),
        })?;

    let out = output::render_single(&global.output, &node, detail, |n| n.identifier().guid());
    output::print_output(&out, global.quiet);
    Ok(())
}
