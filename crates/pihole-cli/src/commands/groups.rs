//! Group commands: `groups list|enable|disable`.

use tabled::Tabled;

use pihole_api::{Error, Group, PiholeClient};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::output;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        Self {
            name: g.name.clone(),
            state: output::state_label(g.enabled),
            comment: g.comment.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    client: &PiholeClient,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), Error> {
    // Toggles need the cached comment, so every path lists first.
    client.list_groups().await?;

    match args.command {
        GroupsCommand::List => {}
        GroupsCommand::Enable { name } => {
            client.group_enable(&name).await?;
            client.list_groups().await?;
        }
        GroupsCommand::Disable { name } => {
            client.group_disable(&name).await?;
            client.list_groups().await?;
        }
    }

    let groups: Vec<Group> = client.groups_cache().into_values().collect();
    let out = output::render_list(
        &global.output,
        &groups,
        |g| GroupRow::from(g),
        |g| g.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
