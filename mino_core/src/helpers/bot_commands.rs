use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Show the welcome message and the main menu.")]
    Start,
    #[command(description = "Display this text.")]
    Help,
    #[command(description = "Browse players by rarity, position, club or country.")]
    Players,
    #[command(description = "Show a player's card, e.g. /player Messi")]
    Player(String),
    #[command(description = "Show the top earners for a period.")]
    Earnings,
    #[command(description = "Show a player's earnings chart, e.g. /chart Messi")]
    Chart(String),
}
