use crate::cards::{PlayerHand, OPENER};
use crate::error::{IllegalMove, MoveError};
use crate::hand::{beats, classify, Hand};

pub const PLAYER_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    cursor: usize,
    hands: Vec<Hand>,
    winner: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayOutcome {
    pub hand: Hand,
    pub next_turn: usize,
    pub winner: Option<usize>,
}

impl Table {
    pub fn new(first: usize) -> Self {
        Table {
            cursor: first % PLAYER_COUNT,
            hands: Vec::new(),
            winner: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn last_hand(&self) -> Option<&Hand> {
        self.hands.last()
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn is_fresh_round(&self, player: usize) -> bool {
        self.last_hand().map_or(true, |hand| hand.owner == player)
    }

    fn check_turn(&self, player: usize) -> Result<(), MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if player != self.cursor {
            return Err(MoveError::OutOfTurn);
        }
        Ok(())
    }

    fn advance(&mut self) -> usize {
        self.cursor = (self.cursor + 1) % PLAYER_COUNT;
        self.cursor
    }

    pub fn pass(&mut self, player: usize) -> Result<usize, MoveError> {
        self.check_turn(player)?;
        if self.is_fresh_round(player) {
            return Err(IllegalMove::PassOnFreshRound.into());
        }
        Ok(self.advance())
    }

    /// Plays the cards at `indices` of `holding`. Every check runs before the
    /// first mutation, so a rejected move leaves both the table and the
    /// holding untouched.
    pub fn play(
        &mut self,
        player: usize,
        holding: &mut PlayerHand,
        indices: &[usize],
    ) -> Result<PlayOutcome, MoveError> {
        self.check_turn(player)?;
        let selection = holding
            .select(indices)
            .ok_or(MoveError::InvalidSelection)?;
        let hand = classify(player, &selection).ok_or(MoveError::InvalidSelection)?;

        match self.last_hand() {
            None => {
                if !hand.contains(&OPENER) {
                    return Err(IllegalMove::MissingOpener.into());
                }
            }
            Some(last) if last.owner == player => {}
            Some(last) => {
                if hand.len() != last.len() {
                    return Err(IllegalMove::SizeMismatch.into());
                }
                if !beats(&hand, last) {
                    return Err(IllegalMove::DoesNotBeat.into());
                }
            }
        }

        holding.remove_cards(&hand.cards);
        self.hands.push(hand.clone());

        if holding.is_empty() {
            self.winner = Some(player);
            return Ok(PlayOutcome {
                hand,
                next_turn: self.cursor,
                winner: Some(player),
            });
        }

        let next_turn = self.advance();
        Ok(PlayOutcome {
            hand,
            next_turn,
            winner: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};
    use crate::hand::Category;

    fn holding(cards: &[Card]) -> PlayerHand {
        let mut hand = PlayerHand::new();
        hand.add_cards(cards);
        hand
    }

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn first_play_must_contain_opener() {
        let mut table = Table::new(0);
        let mut hand = holding(&[OPENER, card(Rank::Four, Suit::Clubs)]);
        let result = table.play(0, &mut hand, &[1]);
        assert_eq!(result.err(), Some(MoveError::Illegal(IllegalMove::MissingOpener)));
        let outcome = table.play(0, &mut hand, &[0]).unwrap();
        assert_eq!(outcome.hand.category, Category::Single);
        assert_eq!(outcome.next_turn, 1);
        assert_eq!(table.cursor(), 1);
    }

    #[test]
    fn pass_rejected_on_first_move() {
        let mut table = Table::new(2);
        assert_eq!(
            table.pass(2).err(),
            Some(MoveError::Illegal(IllegalMove::PassOnFreshRound))
        );
        assert_eq!(table.cursor(), 2);
    }

    #[test]
    fn out_of_turn_moves_are_rejected() {
        let mut table = Table::new(0);
        let mut hand = holding(&[OPENER, card(Rank::Four, Suit::Clubs)]);
        assert_eq!(table.play(1, &mut hand, &[0]).err(), Some(MoveError::OutOfTurn));
        assert_eq!(table.pass(3).err(), Some(MoveError::OutOfTurn));
        assert_eq!(hand.len(), 2);
    }

    #[test]
    fn continuation_requires_same_size() {
        let mut table = Table::new(0);
        let mut first = holding(&[OPENER, card(Rank::Nine, Suit::Clubs)]);
        table.play(0, &mut first, &[0]).unwrap();
        let mut second = holding(&[
            card(Rank::Five, Suit::Clubs),
            card(Rank::Five, Suit::Hearts),
            card(Rank::Six, Suit::Spades),
        ]);
        let result = table.play(1, &mut second, &[0, 1]);
        assert_eq!(result.err(), Some(MoveError::Illegal(IllegalMove::SizeMismatch)));
    }

    #[test]
    fn continuation_requires_beating_last_hand() {
        let mut table = Table::new(0);
        let mut first = holding(&[
            OPENER,
            card(Rank::Three, Suit::Spades),
            card(Rank::Nine, Suit::Clubs),
        ]);
        table.play(0, &mut first, &[0, 1]).unwrap();
        let mut second = holding(&[
            card(Rank::Three, Suit::Clubs),
            card(Rank::Three, Suit::Hearts),
            card(Rank::Four, Suit::Diamonds),
            card(Rank::Four, Suit::Spades),
        ]);
        let before = second.clone();
        let result = table.play(1, &mut second, &[0, 1]);
        assert_eq!(result.err(), Some(MoveError::Illegal(IllegalMove::DoesNotBeat)));
        assert_eq!(second, before);
        let outcome = table.play(1, &mut second, &[2, 3]).unwrap();
        assert_eq!(outcome.hand.category, Category::Pair);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn invalid_selection_is_rejected() {
        let mut table = Table::new(0);
        let mut hand = holding(&[OPENER, card(Rank::Four, Suit::Clubs)]);
        assert_eq!(
            table.play(0, &mut hand, &[0, 1]).err(),
            Some(MoveError::InvalidSelection)
        );
        assert_eq!(table.play(0, &mut hand, &[5]).err(), Some(MoveError::InvalidSelection));
        assert!(table.hands().is_empty());
    }

    #[test]
    fn round_returns_to_leader_after_three_passes() {
        let mut table = Table::new(0);
        let mut leader = holding(&[
            OPENER,
            card(Rank::Four, Suit::Diamonds),
            card(Rank::Three, Suit::Clubs),
            card(Rank::King, Suit::Hearts),
        ]);
        let mut follower = holding(&[
            card(Rank::Four, Suit::Hearts),
            card(Rank::Five, Suit::Clubs),
        ]);
        table.play(0, &mut leader, &[0]).unwrap();
        table.play(1, &mut follower, &[0]).unwrap();
        table.pass(2).unwrap();
        table.pass(3).unwrap();
        table.pass(0).unwrap();
        assert_eq!(table.cursor(), 1);
        assert!(table.is_fresh_round(1));
        assert!(!table.is_fresh_round(2));
        assert_eq!(
            table.pass(1).err(),
            Some(MoveError::Illegal(IllegalMove::PassOnFreshRound))
        );
    }

    #[test]
    fn emptying_hand_ends_game_without_advancing() {
        let mut table = Table::new(3);
        let mut hand = holding(&[OPENER]);
        let outcome = table.play(3, &mut hand, &[0]).unwrap();
        assert_eq!(outcome.winner, Some(3));
        assert_eq!(outcome.next_turn, 3);
        assert_eq!(table.cursor(), 3);
        assert_eq!(table.winner(), Some(3));
        assert_eq!(table.pass(3).err(), Some(MoveError::GameOver));
    }
}
