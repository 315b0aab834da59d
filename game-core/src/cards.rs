use crate::error::DeckError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

pub const DECK_SIZE: usize = 52;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Diamonds,
    Clubs,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Diamonds, Suit::Clubs, Suit::Hearts, Suit::Spades];

    fn from_char(ch: char) -> Option<Self> {
        match ch {
            'D' => Some(Suit::Diamonds),
            'C' => Some(Suit::Clubs),
            'H' => Some(Suit::Hearts),
            'S' => Some(Suit::Spades),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }
}

/// Big Two rank order: three is the lowest rank and two the highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    Two,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
        Rank::Two,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "3" => Some(Rank::Three),
            "4" => Some(Rank::Four),
            "5" => Some(Rank::Five),
            "6" => Some(Rank::Six),
            "7" => Some(Rank::Seven),
            "8" => Some(Rank::Eight),
            "9" => Some(Rank::Nine),
            "10" => Some(Rank::Ten),
            "J" => Some(Rank::Jack),
            "Q" => Some(Rank::Queen),
            "K" => Some(Rank::King),
            "A" => Some(Rank::Ace),
            "2" => Some(Rank::Two),
            _ => None,
        }
    }

    fn to_str(self) -> &'static str {
        match self {
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Two => "2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

pub const OPENER: Card = Card {
    rank: Rank::Three,
    suit: Suit::Diamonds,
};

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn code(&self) -> String {
        format!("{}{}", self.suit.to_char(), self.rank.to_str())
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let suit = Suit::from_char(chars.next()?)?;
        let rank = Rank::from_str(chars.as_str())?;
        Some(Card { rank, suit })
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.suit.cmp(&other.suit))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

pub fn sort_hand(hand: &mut [Card]) {
    hand.sort();
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Suit-major canonical order: Diamonds 3..2, Clubs 3..2, Hearts 3..2,
    /// Spades 3..2.
    pub fn ordered() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card { rank, suit });
            }
        }
        Deck { cards }
    }

    pub fn shuffled(seed: u64) -> Self {
        let mut deck = Deck::ordered();
        let mut rng = StdRng::seed_from_u64(seed);
        deck.shuffle(&mut rng);
        deck
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.len() != DECK_SIZE {
            return Err(DeckError::WrongSize(cards.len()));
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in cards.iter() {
            if !seen.insert(*card) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        Ok(Deck { cards })
    }

    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self, DeckError> {
        let cards = codes
            .iter()
            .map(|code| {
                Card::from_code(code.as_ref())
                    .ok_or_else(|| DeckError::UnknownCard(code.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Deck::from_cards(cards)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn codes(&self) -> Vec<String> {
        self.cards.iter().map(|card| card.code()).collect()
    }
}

impl TryFrom<Vec<Card>> for Deck {
    type Error = DeckError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Deck::from_cards(cards)
    }
}

impl From<Deck> for Vec<Card> {
    fn from(deck: Deck) -> Self {
        deck.cards
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerHand {
    cards: Vec<Card>,
}

impl PlayerHand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cards(&mut self, cards: &[Card]) {
        for card in cards.iter() {
            if !self.cards.contains(card) {
                self.cards.push(*card);
            }
        }
        sort_hand(&mut self.cards);
    }

    pub fn select(&self, indices: &[usize]) -> Option<Vec<Card>> {
        let mut seen = HashSet::with_capacity(indices.len());
        indices
            .iter()
            .map(|idx| {
                if !seen.insert(*idx) {
                    return None;
                }
                self.cards.get(*idx).copied()
            })
            .collect()
    }

    pub fn remove_cards(&mut self, cards: &[Card]) {
        self.cards.retain(|card| !cards.contains(card));
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.binary_search(card).is_ok()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
