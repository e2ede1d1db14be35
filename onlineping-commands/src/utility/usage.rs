use onlineping_core::{Context, Error};

use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "!usage <command>",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name"]
    #[rest]
    command: Option<String>,
) -> Result<(), Error> {
    let Some(raw_name) = command.as_deref() else {
        ctx.say(format!("Usage: `{}`", META.usage)).await?;
        return Ok(());
    };

    let lookup = normalize_command_name(raw_name);

    let Some(command) = COMMANDS.iter().find(|command| command.name == lookup) else {
        ctx.say(format!("Unknown command: `{}`", lookup)).await?;
        return Ok(());
    };

    ctx.say(format!("Usage: `{}`", command.usage)).await?;
    Ok(())
}

/// Lower-case, strip the prefix, and fold the long group name onto `op`.
fn normalize_command_name(raw: &str) -> String {
    let lowered = raw.trim().trim_start_matches('!').to_ascii_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    match words.as_slice() {
        ["onlineping" | "op"] => "onlineping".to_owned(),
        ["onlineping" | "op", sub, ..] => format!("op {}", sub),
        _ => words.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_command_name;

    #[test]
    fn folds_group_aliases() {
        assert_eq!(normalize_command_name("!onlineping  Track"), "op track");
        assert_eq!(normalize_command_name("op cooldown"), "op cooldown");
        assert_eq!(normalize_command_name("op"), "onlineping");
        assert_eq!(normalize_command_name("HELP"), "help");
    }
}
