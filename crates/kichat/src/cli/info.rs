//! Config summary command

use crate::Config;
use anyhow::Result;
use kicore::command::{CommandContext, CommandRegistry};

pub fn run(config: &Config) -> Result<()> {
    let registry = CommandRegistry::build(&CommandContext {
        area: config.area.name.clone(),
        privileged: config.player.privileged,
    });
    let fade = &config.chat.fade;
    let roster = &config.roster;

    println!("KI Chat Information");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Player:      {} (#{})", config.player.name, config.player.id);
    println!("Privileged:  {}", if config.player.privileged { "yes" } else { "no" });
    println!("Area:        {}", config.area.name);
    println!();
    println!("History:     {} line(s)", config.chat.history_capacity);
    println!("Recents:     {} player(s)", config.chat.recents_capacity);
    if fade.is_enabled() {
        println!(
            "Fade:        {} x {}ms visible, {} x {}ms fading",
            fade.full_ticks, fade.full_tick_ms, fade.fade_ticks, fade.fade_tick_ms
        );
    } else {
        println!("Fade:        disabled");
    }
    println!();
    println!("Age members: {}", roster.age_members.len());
    println!("Buddies:     {}", roster.buddies.len());
    println!("Neighbors:   {}", roster.neighbors.len());
    println!("Ignored:     {}", roster.ignored.len());
    println!();
    println!("Commands:    {}", registry.entries().len());

    Ok(())
}
