//! Moment shop commands

use anyhow::Result;
use clap::Subcommand;

use ascend::ledger::Ledger;

#[derive(Subcommand)]
pub enum ShopCommand {
    /// Show this week's offer
    List,

    /// Buy a moment from this week's offer
    Buy {
        /// Moment id (see `ascend shop list`)
        id: String,
    },
}

pub async fn shop_command(ledger: &Ledger, user_id: &str, command: ShopCommand) -> Result<()> {
    match command {
        ShopCommand::List => {
            let user = ledger.user(user_id).await?;
            println!("This week's moments ({} coins available):\n", user.coins);
            for moment in ledger.weekly_offer() {
                let bought = if user.moments_bought.iter().any(|m| m == moment.id) {
                    " (bought)"
                } else {
                    ""
                };
                println!(
                    "  {:<8} {:<22} {:>4} coins  +{} life{}",
                    moment.id, moment.name, moment.price, moment.life_restored, bought
                );
            }
        }
        ShopCommand::Buy { id } => {
            for event in ledger.purchase_moment(user_id, &id).await? {
                println!("{}", event);
            }
        }
    }
    Ok(())
}
