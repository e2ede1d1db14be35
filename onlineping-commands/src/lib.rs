pub mod onlineping;
pub mod utility;

use onlineping_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    utility::usage::META,
    onlineping::META,
    onlineping::track::META,
    onlineping::untrack::META,
    onlineping::list::META,
    onlineping::mode::META,
    onlineping::cooldown::META,
    onlineping::pingme::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::help::help(),
        utility::usage::usage(),
        onlineping::onlineping(),
    ]
}
