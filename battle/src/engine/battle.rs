//! Battle - the turn state machine for one match

use pokebat_protocol::{Player, parse_confirm, parse_slot, prompt};

use super::link::PlayerLink;
use super::roll::AttackRoll;
use super::state::{AttackReport, BattleOutcome, BattleState, Outcome};
use crate::error::BattleError;
use crate::narration::{self, DIVIDER};
use crate::rules::{AttackKind, damage, distribute_exp, exp_bonus};
use crate::types::Participant;

/// Where the engine is between two suspension points
#[derive(Debug)]
enum Phase {
    Init,
    Attacking,
    FaintCheck(AttackReport),
    OfferSwitch,
    BattleOver { winner: Player },
}

/// Seat that acts on turn 1
///
/// Faster active fighter goes first; on equal speed the first seat does.
pub fn first_attacker(p1: &Participant, p2: &Participant) -> Player {
    if p1.active_fighter().speed >= p2.active_fighter().speed {
        Player::P1
    } else {
        Player::P2
    }
}

/// A paired match between two participants
///
/// The battle owns both participants for its whole lifetime; nothing
/// else may touch their HP, active fighter or experience.
#[derive(Debug, Clone)]
pub struct Battle {
    sides: [Participant; 2],
    state: BattleState,
}

impl Battle {
    /// Create a battle; `p1` is the participant that registered first
    pub fn new(p1: Participant, p2: Participant) -> Self {
        let attacker = first_attacker(&p1, &p2);
        Self {
            sides: [p1, p2],
            state: BattleState::new(attacker),
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn side(&self, player: Player) -> &Participant {
        &self.sides[player.index()]
    }

    pub fn side_mut(&mut self, player: Player) -> &mut Participant {
        &mut self.sides[player.index()]
    }

    /// Apply one attack from the current attacker to the current defender
    pub fn resolve_attack(&mut self, kind: AttackKind) -> AttackReport {
        let attacker = self.state.attacker;
        let defender = self.state.defender();

        let dealt = damage(
            self.side(attacker).active_fighter(),
            self.side(defender).active_fighter(),
            kind,
        );
        let remaining_hp = self.side_mut(defender).active_fighter_mut().take_damage(dealt);

        AttackReport {
            attacker,
            defender,
            kind,
            damage: dealt,
            remaining_hp,
            fainted: remaining_hp == 0,
        }
    }

    /// The defender of this turn attacks next
    pub fn swap_roles(&mut self) {
        self.state.attacker = self.state.defender();
    }

    /// Record the winner and hand out experience
    pub fn conclude(&mut self, winner: Player) -> BattleOutcome {
        let loser = winner.opponent();
        let bonus = exp_bonus(&self.side(loser).roster);
        let gained = distribute_exp(&mut self.side_mut(winner).roster, bonus);

        self.state.outcome = Outcome::Concluded { winner };

        BattleOutcome {
            winner,
            loser,
            winner_name: self.side(winner).name.clone(),
            loser_name: self.side(loser).name.clone(),
            turns: self.state.turn,
            exp_bonus: bonus,
            exp_gained: gained,
        }
    }

    /// Drive the battle to completion
    ///
    /// Every prompt suspends until the addressed seat replies. Without a
    /// deadline in `link`, a silent peer keeps this future pending forever.
    pub async fn run<L, R>(&mut self, link: &mut L, roll: &mut R) -> Result<BattleOutcome, BattleError>
    where
        L: PlayerLink,
        R: AttackRoll,
    {
        let mut phase = Phase::Init;

        loop {
            phase = match phase {
                Phase::Init => {
                    self.announce_start(link).await?;
                    Phase::Attacking
                }
                Phase::Attacking => Phase::FaintCheck(self.attack(link, roll).await?),
                Phase::FaintCheck(report) => self.faint_check(link, report).await?,
                Phase::OfferSwitch => {
                    self.offer_switch(link).await?;
                    self.swap_roles();
                    Phase::Attacking
                }
                Phase::BattleOver { winner } => return self.finish(link, winner).await,
            };
        }
    }

    async fn announce_start<L: PlayerLink>(&mut self, link: &mut L) -> Result<(), BattleError> {
        broadcast(link, "Two players connected. Starting the battle!\n").await?;

        let first = self.side(self.state.attacker);
        let line = format!(
            "{}'s {} is faster and attacks first!\n",
            first.name,
            first.active_fighter().name
        );
        broadcast(link, &line).await
    }

    async fn attack<L, R>(&mut self, link: &mut L, roll: &mut R) -> Result<AttackReport, BattleError>
    where
        L: PlayerLink,
        R: AttackRoll,
    {
        self.state.turn += 1;
        let attacker = self.state.attacker;
        let defender = self.state.defender();

        broadcast(link, DIVIDER).await?;
        let header = format!("Turn {}, attacker {}: \n", self.state.turn, self.side(attacker).name);
        broadcast(link, &header).await?;

        let kind = roll.roll();

        let side = self.side(attacker);
        let attacking = format!(
            "Attacking: \n{}",
            narration::fighter_info(side.active_slot(), side.active_fighter())
        );
        broadcast(link, &attacking).await?;
        link.pause().await;

        let side = self.side(defender);
        let defending = format!(
            "Defending: \n{}",
            narration::fighter_info(side.active_slot(), side.active_fighter())
        );
        broadcast(link, &defending).await?;
        link.pause().await;

        let report = self.resolve_attack(kind);

        let attacker_name = self.side(attacker).active_fighter().name.clone();
        let target = self.side(defender).active_fighter();
        tracing::info!(
            turn = self.state.turn,
            attacker = %self.side(attacker).name,
            fighter = %attacker_name,
            target = %target.name,
            kind = %kind,
            damage = report.damage,
            remaining_hp = report.remaining_hp,
            "Attack resolved"
        );

        let summary = format!(
            "{} used a {} attack!\n{}\nDamage dealt: {}\n{}'s HP: {}\n",
            attacker_name, kind, DIVIDER, report.damage, target.name, report.remaining_hp
        );
        broadcast(link, &summary).await?;
        link.pause().await;

        Ok(report)
    }

    async fn faint_check<L: PlayerLink>(
        &mut self,
        link: &mut L,
        report: AttackReport,
    ) -> Result<Phase, BattleError> {
        if !report.fainted {
            return Ok(Phase::OfferSwitch);
        }

        let defender = report.defender;
        let side = self.side(defender);
        let notice = format!(
            "{}'s {} fainted!\n",
            side.name,
            side.active_fighter().name
        );
        tracing::info!(player = %side.name, fighter = %side.active_fighter().name, "Fighter fainted");
        broadcast(link, &notice).await?;

        if !self.side(defender).has_reserve() {
            link.send(defender, "You have no available fighters left!").await?;
            return Ok(Phase::BattleOver {
                winner: report.attacker,
            });
        }

        link.send(defender, "You have to switch your fighter!").await?;
        link.send(
            report.attacker,
            "The opponent's fighter is fainted! Wait for them to switch the fighter.",
        )
        .await?;

        self.choose_fighter(link, defender).await?;
        Ok(Phase::OfferSwitch)
    }

    async fn offer_switch<L: PlayerLink>(&mut self, link: &mut L) -> Result<(), BattleError> {
        let attacker = self.state.attacker;
        let offer = prompt::switch_offer(&self.side(attacker).name);

        let answer = link.ask(attacker, &offer).await?;
        if parse_confirm(&answer) {
            self.choose_fighter(link, attacker).await?;
            link.send(attacker, "You have switched your fighter.").await?;
        }

        Ok(())
    }

    /// Prompt `player` until they name a living fighter
    async fn choose_fighter<L: PlayerLink>(&mut self, link: &mut L, player: Player) -> Result<(), BattleError> {
        let listing = narration::living_listing(&self.side(player).roster);
        link.send(player, &listing).await?;

        loop {
            let answer = link.ask(player, prompt::SELECT_FIGHTER).await?;
            let max = self.side(player).roster.len();

            let slot = match parse_slot(&answer, max) {
                Ok(slot) => slot,
                Err(e) => {
                    tracing::debug!(player = %self.side(player).name, error = %e, "Rejected fighter choice");
                    link.send(player, "Invalid input. Please enter a valid fighter number.")
                        .await?;
                    continue;
                }
            };

            let chosen = match self.side_mut(player).switch_to(slot) {
                Ok(fighter) => fighter.name.clone(),
                Err(e) => {
                    tracing::debug!(player = %self.side(player).name, error = %e, "Rejected fighter choice");
                    link.send(player, "Invalid selection or selected Pokemon has fainted.")
                        .await?;
                    continue;
                }
            };

            link.send(player, &format!("Selected fighter: {}\n", chosen)).await?;
            let news = format!("{} sent out {}!\n", self.side(player).name, chosen);
            link.send(player.opponent(), &news).await?;
            return Ok(());
        }
    }

    async fn finish<L: PlayerLink>(&mut self, link: &mut L, winner: Player) -> Result<BattleOutcome, BattleError> {
        let outcome = self.conclude(winner);

        tracing::info!(
            winner = %outcome.winner_name,
            loser = %outcome.loser_name,
            turns = outcome.turns,
            exp_bonus = outcome.exp_bonus,
            "Battle concluded"
        );

        let bonus = format!(
            "Each pokemon of {} will have {} bonus exp!",
            outcome.winner_name, outcome.exp_bonus
        );
        link.send(winner, &bonus).await?;
        link.send(outcome.loser, "You lose!").await?;
        link.send(winner, "You win!").await?;
        broadcast(link, "Battle ended!").await?;

        Ok(outcome)
    }
}

async fn broadcast<L: PlayerLink>(link: &mut L, text: &str) -> Result<(), BattleError> {
    for player in Player::BOTH {
        link.send(player, text).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::engine::FixedRoll;
    use crate::types::{FighterRecord, Roster};

    /// Link that replays canned answers and records everything sent
    #[derive(Default)]
    struct ScriptedLink {
        answers: [VecDeque<&'static str>; 2],
        sent: [Vec<String>; 2],
        prompts: [Vec<String>; 2],
    }

    impl ScriptedLink {
        fn new(p1: &[&'static str], p2: &[&'static str]) -> Self {
            Self {
                answers: [p1.iter().copied().collect(), p2.iter().copied().collect()],
                ..Default::default()
            }
        }

        fn saw(&self, player: Player, needle: &str) -> bool {
            self.sent[player.index()].iter().any(|m| m.contains(needle))
        }
    }

    impl PlayerLink for ScriptedLink {
        async fn send(&mut self, player: Player, text: &str) -> Result<(), BattleError> {
            self.sent[player.index()].push(text.to_string());
            Ok(())
        }

        async fn ask(&mut self, player: Player, prompt: &str) -> Result<String, BattleError> {
            self.prompts[player.index()].push(prompt.to_string());
            self.answers[player.index()]
                .pop_front()
                .map(str::to_string)
                .ok_or(BattleError::StalledPeer(player))
        }
    }

    fn fighter(id: u32, speed: u32, attack: u32, defense: u32, hp: u32) -> FighterRecord {
        let mut f = FighterRecord::new(id, format!("Mon{}", id));
        f.speed = speed;
        f.attack = attack;
        f.defense = defense;
        f.special_attack = attack;
        f.special_defense = defense;
        f.hp = hp;
        f.base_exp = 100;
        f
    }

    fn participant(name: &str, fighters: Vec<FighterRecord>) -> Participant {
        let ids: Vec<u32> = fighters.iter().map(|f| f.id).collect();
        Participant::new(name, Roster::select(&fighters, &ids).unwrap())
    }

    /// ash one-shots everything; misty chips for 1 damage
    fn lopsided() -> Battle {
        let ash = participant(
            "ash",
            vec![fighter(1, 80, 100, 50, 100), fighter(2, 80, 100, 50, 100), fighter(3, 80, 100, 50, 100)],
        );
        let mut misty = participant(
            "misty",
            vec![fighter(7, 60, 10, 10, 20), fighter(8, 60, 10, 10, 20), fighter(9, 60, 10, 10, 20)],
        );
        misty.roster.iter_mut().for_each(|f| f.current_exp = 100);
        Battle::new(ash, misty)
    }

    #[test]
    fn test_faster_fighter_attacks_first() {
        let fast = participant("a", vec![fighter(1, 80, 1, 1, 1), fighter(2, 1, 1, 1, 1), fighter(3, 1, 1, 1, 1)]);
        let slow = participant("b", vec![fighter(4, 60, 1, 1, 1), fighter(5, 1, 1, 1, 1), fighter(6, 1, 1, 1, 1)]);

        assert_eq!(Battle::new(fast.clone(), slow.clone()).state().attacker, Player::P1);
        assert_eq!(Battle::new(slow, fast).state().attacker, Player::P2);
    }

    #[test]
    fn test_speed_tie_goes_to_first_seat() {
        let a = participant("a", vec![fighter(1, 70, 1, 1, 1), fighter(2, 1, 1, 1, 1), fighter(3, 1, 1, 1, 1)]);
        let b = participant("b", vec![fighter(4, 70, 1, 1, 1), fighter(5, 1, 1, 1, 1), fighter(6, 1, 1, 1, 1)]);

        for _ in 0..10 {
            assert_eq!(first_attacker(&a, &b), Player::P1);
            assert_eq!(first_attacker(&b, &a), Player::P1);
        }
    }

    #[test]
    fn test_resolve_attack_floors_damage_and_persists_hp() {
        let mut battle = lopsided();
        battle.swap_roles(); // misty attacks

        let report = battle.resolve_attack(AttackKind::Normal);
        assert_eq!(report.attacker, Player::P2);
        assert_eq!(report.damage, 1);
        assert_eq!(report.remaining_hp, 99);
        assert!(!report.fainted);
        assert_eq!(battle.side(Player::P1).roster.get(1).unwrap().hp, 99);
    }

    #[test]
    fn test_resolve_attack_clamps_hp_at_zero() {
        let mut battle = lopsided();

        let report = battle.resolve_attack(AttackKind::Special);
        assert_eq!(report.damage, 90);
        assert_eq!(report.remaining_hp, 0);
        assert!(report.fainted);
        assert_eq!(battle.side(Player::P2).roster.get(7).unwrap().hp, 0);
    }

    #[tokio::test]
    async fn test_full_battle_to_knockout() {
        let mut battle = lopsided();
        let mut link = ScriptedLink::new(
            &["N", "n"],
            // fainted pick, junk, valid pick, decline, valid pick, decline
            &["1", "x", "2", "n", "3", "N"],
        );

        let outcome = battle
            .run(&mut link, &mut FixedRoll(AttackKind::Normal))
            .await
            .unwrap();

        assert_eq!(outcome.winner, Player::P1);
        assert_eq!(outcome.winner_name, "ash");
        assert_eq!(outcome.loser_name, "misty");
        assert_eq!(outcome.turns, 5);
        assert_eq!(outcome.exp_bonus, 33);
        assert!(battle.state().is_over());

        assert!(battle.side(Player::P2).is_eliminated());
        assert_eq!(battle.side(Player::P1).roster.get(1).unwrap().hp, 98);
        assert!(battle.side(Player::P1).roster.iter().all(|f| f.current_exp == 33));

        assert!(link.saw(Player::P2, "Invalid selection or selected Pokemon has fainted."));
        assert!(link.saw(Player::P2, "Invalid input."));
        assert!(link.saw(Player::P2, "You lose!"));
        assert!(link.saw(Player::P1, "You win!"));
        assert!(link.saw(Player::P1, "bonus exp"));
        assert!(link.answers.iter().all(VecDeque::is_empty));
    }

    #[tokio::test]
    async fn test_switch_offer_goes_to_attacker_only() {
        let mut battle = lopsided();
        let mut link = ScriptedLink::new(&["N", "N"], &["2", "N", "3", "N"]);

        battle
            .run(&mut link, &mut FixedRoll(AttackKind::Normal))
            .await
            .unwrap();

        let p1_offers = link.prompts[0].iter().filter(|p| prompt::is_switch_offer(p)).count();
        let p2_offers = link.prompts[1].iter().filter(|p| prompt::is_switch_offer(p)).count();
        // ash attacks on turns 1, 3, 5; the last ends the match
        assert_eq!(p1_offers, 2);
        assert_eq!(p2_offers, 2);
    }

    #[tokio::test]
    async fn test_voluntary_switch() {
        let mut battle = lopsided();
        // ash switches to slot 2 after turn 1, then stalls
        let mut link = ScriptedLink::new(&["Y", "2"], &["2"]);

        let err = battle
            .run(&mut link, &mut FixedRoll(AttackKind::Normal))
            .await
            .unwrap_err();

        assert_eq!(err, BattleError::StalledPeer(Player::P2));
        assert_eq!(battle.side(Player::P1).active_id(), 2);
        assert!(link.saw(Player::P1, "You have switched your fighter."));
        assert!(link.saw(Player::P2, "ash sent out Mon2!"));
        assert!(!battle.state().is_over());
    }

    #[tokio::test]
    async fn test_stalled_peer_stops_battle() {
        let mut battle = lopsided();
        let mut link = ScriptedLink::new(&[], &[]);

        let err = battle
            .run(&mut link, &mut FixedRoll(AttackKind::Normal))
            .await
            .unwrap_err();

        // misty's fighter fainted on turn 1 and misty never answers
        assert_eq!(err, BattleError::StalledPeer(Player::P2));
        assert_eq!(battle.state().turn, 1);
    }

    #[test]
    fn test_conclude_caps_exp() {
        let mut battle = lopsided();
        battle.side_mut(Player::P1).roster.iter_mut().for_each(|f| {
            f.base_exp = 20;
        });

        let outcome = battle.conclude(Player::P1);
        assert_eq!(outcome.exp_bonus, 33);
        assert_eq!(outcome.exp_gained, 60);
        assert!(battle.side(Player::P1).roster.iter().all(|f| f.current_exp == 20));
    }
}
