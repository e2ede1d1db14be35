use onlineping_database::model::settings::{Prefs, wants_mention};

use crate::status::PresenceStatus;

/// Build the notification text.
///
/// The description always comes first. Watchers who want mentions follow in
/// subscription order, separated by single spaces; with no such watcher the
/// text ends at the description.
pub fn compose_notification(
    target_id: u64,
    before: PresenceStatus,
    after: PresenceStatus,
    pingers: &[u64],
    prefs: &Prefs,
) -> String {
    let mut text = format!(
        "{} <@{}> status changed: **{} → {}**.",
        after.emoji(),
        target_id,
        before.label(),
        after.label()
    );

    let mentions = mention_list(pingers, prefs);
    if !mentions.is_empty() {
        text.push(' ');
        text.push_str(&mentions);
    }

    text
}

fn mention_list(pingers: &[u64], prefs: &Prefs) -> String {
    pingers
        .iter()
        .filter(|watcher| wants_mention(prefs, **watcher))
        .map(|watcher| format!("<@{}>", watcher))
        .collect::<Vec<_>>()
        .join(" ")
}
