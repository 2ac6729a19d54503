use pokebat_protocol::Player;

use crate::error::BattleError;

/// Message channel between the battle engine and both seats.
///
/// Implement this trait to plug the engine into a transport. `ask` sends a
/// prompt and suspends until the addressed seat answers; answers from the
/// other seat must never satisfy it.
///
/// # Example
///
/// ```ignore
/// struct Console;
///
/// impl PlayerLink for Console {
///     async fn send(&mut self, player: Player, text: &str) -> Result<(), BattleError> {
///         println!("[{}] {}", player, text);
///         Ok(())
///     }
///
///     async fn ask(&mut self, player: Player, prompt: &str) -> Result<String, BattleError> {
///         println!("[{}] {}", player, prompt);
///         Ok(read_line())
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait PlayerLink {
    /// Deliver narration to one seat
    async fn send(&mut self, player: Player, text: &str) -> Result<(), BattleError>;

    /// Prompt one seat and wait for its reply
    async fn ask(&mut self, player: Player, prompt: &str) -> Result<String, BattleError>;

    /// Called between narration phases so humans can follow along
    async fn pause(&mut self) {}
}
