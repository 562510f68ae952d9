//! Deck construction and shuffling.

use rand::seq::SliceRandom;
use rand::Rng;
use triplet_protocol::{Card, CardNumber, Color, Shading, Shape};

/// Number of cards in a complete deck: the Cartesian product of the four
/// attribute domains, 3⁴.
pub const DECK_SIZE: usize = 81;

/// Builds the full deck in canonical attribute order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for &number in &CardNumber::ALL {
        for &shape in &Shape::ALL {
            for &color in &Color::ALL {
                for &shading in &Shading::ALL {
                    deck.push(Card {
                        number,
                        shape,
                        color,
                        shading,
                    });
                }
            }
        }
    }
    deck
}

/// Builds a freshly shuffled deck.
///
/// `SliceRandom::shuffle` is a uniform Fisher–Yates shuffle, so every
/// permutation of the 81 cards is equally likely.
pub fn create_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = full_deck();
    deck.shuffle(rng);
    deck
}
