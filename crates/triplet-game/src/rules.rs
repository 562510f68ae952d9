//! The set rules: validity of a triple, and exhaustive board search.

use triplet_protocol::Card;

/// True when the three values are all identical or pairwise distinct.
/// A 2-and-1 split fails the attribute.
fn attribute_matches<T: PartialEq>(a: T, b: T, c: T) -> bool {
    let all_same = a == b && b == c;
    let all_distinct = a != b && b != c && a != c;
    all_same || all_distinct
}

/// Whether three cards form a valid set: every one of the four attributes
/// must be all-same or all-different across the triple.
pub fn is_valid_set(cards: &[Card; 3]) -> bool {
    let [a, b, c] = *cards;
    attribute_matches(a.number, b.number, c.number)
        && attribute_matches(a.shape, b.shape, c.shape)
        && attribute_matches(a.color, b.color, c.color)
        && attribute_matches(a.shading, b.shading, c.shading)
}

/// Every valid set on the board, as index triples `i < j < k` in ascending
/// lexicographic order.
///
/// O(n³), but the board stays near 12–15 cards so the scan is a few
/// hundred triples at most.
pub fn find_sets(board: &[Card]) -> Vec<[usize; 3]> {
    let mut sets = Vec::new();
    for i in 0..board.len() {
        for j in (i + 1)..board.len() {
            for k in (j + 1)..board.len() {
                if is_valid_set(&[board[i], board[j], board[k]]) {
                    sets.push([i, j, k]);
                }
            }
        }
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::full_deck;
    use std::collections::HashSet;
    use triplet_protocol::{CardNumber, Color, Shading, Shape};

    fn card(number: CardNumber, shape: Shape, color: Color, shading: Shading) -> Card {
        Card {
            number,
            shape,
            color,
            shading,
        }
    }

    /// Three cards identical in everything but number: a valid set.
    fn number_run() -> [Card; 3] {
        [
            card(CardNumber::One, Shape::Diamond, Color::Red, Shading::Solid),
            card(CardNumber::Two, Shape::Diamond, Color::Red, Shading::Solid),
            card(CardNumber::Three, Shape::Diamond, Color::Red, Shading::Solid),
        ]
    }

    /// Four cards spanning only two numbers and two shapes: no triple among
    /// them can be all-same or all-distinct in number, so no set exists.
    /// All green, so they can't complete a set with the red `number_run`
    /// cards either (any mixed triple has a 2-1 color split).
    fn setless_cards() -> Vec<Card> {
        vec![
            card(CardNumber::One, Shape::Diamond, Color::Green, Shading::Solid),
            card(CardNumber::Two, Shape::Diamond, Color::Green, Shading::Solid),
            card(CardNumber::One, Shape::Oval, Color::Green, Shading::Solid),
            card(CardNumber::Two, Shape::Oval, Color::Green, Shading::Solid),
        ]
    }

    #[test]
    fn test_all_distinct_everywhere_is_valid() {
        let cards = [
            card(CardNumber::One, Shape::Diamond, Color::Red, Shading::Solid),
            card(CardNumber::Two, Shape::Oval, Color::Green, Shading::Striped),
            card(CardNumber::Three, Shape::Squiggle, Color::Purple, Shading::Empty),
        ];
        assert!(is_valid_set(&cards));
    }

    #[test]
    fn test_all_same_but_one_attribute_is_valid() {
        assert!(is_valid_set(&number_run()));
    }

    #[test]
    fn test_two_and_one_split_is_invalid() {
        let mut cards = number_run();
        // Break the shape attribute: two diamonds, one oval.
        cards[2].shape = Shape::Oval;
        assert!(!is_valid_set(&cards));
    }

    #[test]
    fn test_validity_matches_attribute_counting_exhaustively() {
        // Independent oracle: count distinct values per attribute; a set
        // needs 1 or 3 distinct values in each. Checked over every one of
        // the C(81, 3) triples.
        fn distinct<T: Eq + std::hash::Hash>(values: [T; 3]) -> usize {
            values.into_iter().collect::<HashSet<_>>().len()
        }
        let deck = full_deck();
        let mut valid_count = 0usize;
        for i in 0..deck.len() {
            for j in (i + 1)..deck.len() {
                for k in (j + 1)..deck.len() {
                    let (a, b, c) = (deck[i], deck[j], deck[k]);
                    let expected = [
                        distinct([a.number, b.number, c.number]),
                        distinct([a.shape, b.shape, c.shape]),
                        distinct([a.color, b.color, c.color]),
                        distinct([a.shading, b.shading, c.shading]),
                    ]
                    .iter()
                    .all(|&n| n == 1 || n == 3);
                    assert_eq!(is_valid_set(&[a, b, c]), expected);
                    if expected {
                        valid_count += 1;
                    }
                }
            }
        }
        // Every pair of cards completes to exactly one set: 81·80/6.
        assert_eq!(valid_count, 1080);
    }

    #[test]
    fn test_find_sets_returns_ascending_triples() {
        // Board: setless padding up front, a planted run at 4, 5, 6.
        let mut board = setless_cards();
        board.extend(number_run());
        let sets = find_sets(&board);
        assert_eq!(sets, vec![[4, 5, 6]], "only the planted run is a set");

        // A second run planted earlier surfaces first, in ascending order.
        let mut board = Vec::from(number_run());
        board.extend(setless_cards());
        board.extend({
            let mut run = number_run();
            for c in &mut run {
                c.shading = Shading::Striped;
            }
            run
        });
        let sets = find_sets(&board);
        for set in &sets {
            assert!(set[0] < set[1] && set[1] < set[2]);
        }
        let mut sorted = sets.clone();
        sorted.sort_unstable();
        assert_eq!(sets, sorted, "results come in lexicographic order");
        assert_eq!(sets[0], [0, 1, 2]);
    }

    #[test]
    fn test_find_sets_empty_board() {
        assert!(find_sets(&[]).is_empty());
        assert!(find_sets(&setless_cards()).is_empty());
    }
}
