use crate::cards::{Card, Rank};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Single,
    Pair,
    Triple,
    Straight,
    Flush,
    FullHouse,
    Quad,
    StraightFlush,
}

impl Category {
    fn strength(self) -> u8 {
        match self {
            Category::StraightFlush => 5,
            Category::Straight => 4,
            Category::Flush => 3,
            Category::FullHouse => 2,
            Category::Quad => 1,
            Category::Single | Category::Pair | Category::Triple => 0,
        }
    }

    pub fn size(self) -> usize {
        match self {
            Category::Single => 1,
            Category::Pair => 2,
            Category::Triple => 3,
            _ => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Single => "Single",
            Category::Pair => "Pair",
            Category::Triple => "Triple",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "FullHouse",
            Category::Quad => "Quad",
            Category::StraightFlush => "StraightFlush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub owner: usize,
    pub category: Category,
    pub cards: Vec<Card>,
    pub key: Card,
}

impl Hand {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.category)?;
        for card in self.cards.iter() {
            write!(f, " [{}]", card)?;
        }
        Ok(())
    }
}

type KeyFn = fn(&[Card]) -> Option<Card>;

const FIVE_CARD_PRIORITY: [(Category, KeyFn); 5] = [
    (Category::StraightFlush, straight_flush_key),
    (Category::Straight, straight_key),
    (Category::Flush, flush_key),
    (Category::FullHouse, full_house_key),
    (Category::Quad, quad_key),
];

fn counts_by_rank(cards: &[Card]) -> BTreeMap<Rank, usize> {
    let mut counts = BTreeMap::new();
    for card in cards.iter() {
        *counts.entry(card.rank).or_insert(0) += 1;
    }
    counts
}

// `sorted` must already be in card order.
fn is_consecutive(sorted: &[Card]) -> bool {
    sorted
        .windows(2)
        .all(|pair| pair[1].rank.index() == pair[0].rank.index() + 1)
}

fn is_same_suit(cards: &[Card]) -> bool {
    cards.windows(2).all(|pair| pair[0].suit == pair[1].suit)
}

fn highest_of_rank(sorted: &[Card], rank: Rank) -> Option<Card> {
    sorted.iter().rev().find(|card| card.rank == rank).copied()
}

fn straight_flush_key(sorted: &[Card]) -> Option<Card> {
    if is_consecutive(sorted) && is_same_suit(sorted) {
        return sorted.last().copied();
    }
    None
}

fn straight_key(sorted: &[Card]) -> Option<Card> {
    if is_consecutive(sorted) && !is_same_suit(sorted) {
        return sorted.last().copied();
    }
    None
}

fn flush_key(sorted: &[Card]) -> Option<Card> {
    if is_same_suit(sorted) && !is_consecutive(sorted) {
        return sorted.last().copied();
    }
    None
}

fn full_house_key(sorted: &[Card]) -> Option<Card> {
    let counts = counts_by_rank(sorted);
    if counts.len() != 2 {
        return None;
    }
    let (rank, _) = counts.iter().find(|(_, count)| **count == 3)?;
    highest_of_rank(sorted, *rank)
}

fn quad_key(sorted: &[Card]) -> Option<Card> {
    let counts = counts_by_rank(sorted);
    if counts.len() != 2 {
        return None;
    }
    let (rank, _) = counts.iter().find(|(_, count)| **count == 4)?;
    highest_of_rank(sorted, *rank)
}

fn same_rank_key(sorted: &[Card]) -> Option<Card> {
    if counts_by_rank(sorted).len() == 1 {
        return sorted.last().copied();
    }
    None
}

pub fn classify(owner: usize, cards: &[Card]) -> Option<Hand> {
    let mut sorted = cards.to_vec();
    sorted.sort();
    if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
        return None;
    }

    let (category, key) = match sorted.len() {
        1 => (Category::Single, sorted[0]),
        2 => (Category::Pair, same_rank_key(&sorted)?),
        3 => (Category::Triple, same_rank_key(&sorted)?),
        5 => FIVE_CARD_PRIORITY
            .iter()
            .find_map(|(category, key_fn)| key_fn(&sorted).map(|key| (*category, key)))?,
        _ => return None,
    };

    Some(Hand {
        owner,
        category,
        cards: sorted,
        key,
    })
}

/// True when `next` beats `prev`. Both hands must hold the same number of
/// cards; the turn logic checks sizes before ever asking.
pub fn beats(next: &Hand, prev: &Hand) -> bool {
    assert_eq!(
        next.len(),
        prev.len(),
        "beats called on hands of different sizes"
    );
    next.category
        .strength()
        .cmp(&prev.category.strength())
        .then_with(|| next.key.cmp(&prev.key))
        == Ordering::Greater
}
