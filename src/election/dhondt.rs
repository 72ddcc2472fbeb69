//! D'Hondt highest-averages seat allocation.

use std::collections::HashMap;

use rust_decimal::Decimal;

/// Allocate `seats` seats among lists by the D'Hondt method.
///
/// Every list produces the quotients `votes / 1, votes / 2, ..,
/// votes / seats`; the owners of the `seats` highest quotients each gain a
/// seat. Ties are broken by list id ascending so the allocation is
/// deterministic. Every input list appears in the output, zero-seat lists
/// included.
pub fn dhondt_alloc(votes_by_list: &HashMap<String, Decimal>, seats: u32) -> HashMap<String, u32> {
    let mut quotients: Vec<(Decimal, &str)> =
        Vec::with_capacity(votes_by_list.len() * seats as usize);

    for (list, votes) in votes_by_list {
        for divisor in 1..=seats {
            quotients.push((*votes / Decimal::from(divisor), list.as_str()));
        }
    }

    quotients.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    let mut allocation: HashMap<String, u32> =
        votes_by_list.keys().map(|list| (list.clone(), 0)).collect();

    for (_, list) in quotients.into_iter().take(seats as usize) {
        *allocation.get_mut(list).expect("list present") += 1;
    }

    allocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn votes(pairs: &[(&str, Decimal)]) -> HashMap<String, Decimal> {
        pairs
            .iter()
            .map(|(list, votes)| (list.to_string(), *votes))
            .collect()
    }

    #[test]
    fn textbook_example_allocates_correctly() {
        // The classic worked example: 7 seats over 340/280/160/60/15.
        let input = votes(&[
            ("A", dec!(340)),
            ("B", dec!(280)),
            ("C", dec!(160)),
            ("D", dec!(60)),
            ("E", dec!(15)),
        ]);

        let allocation = dhondt_alloc(&input, 7);

        assert_eq!(allocation["A"], 3);
        assert_eq!(allocation["B"], 3);
        assert_eq!(allocation["C"], 1);
        assert_eq!(allocation["D"], 0);
        assert_eq!(allocation["E"], 0);
    }

    #[test]
    fn distributes_exactly_the_requested_seats() {
        let input = votes(&[("A", dec!(1000)), ("B", dec!(700)), ("C", dec!(299))]);

        for seats in [1, 3, 5, 8] {
            let allocation = dhondt_alloc(&input, seats);
            let total: u32 = allocation.values().sum();
            assert_eq!(total, seats);
        }
    }

    #[test]
    fn zero_vote_list_gets_zero_seats_but_appears() {
        let input = votes(&[("A", dec!(100)), ("B", dec!(0))]);

        let allocation = dhondt_alloc(&input, 5);

        assert_eq!(allocation["A"], 5);
        assert_eq!(allocation["B"], 0);
        assert_eq!(allocation.len(), 2);
    }

    #[test]
    fn ties_break_by_list_id() {
        let input = votes(&[("B", dec!(100)), ("A", dec!(100))]);

        // 3 seats: quotients 100/100/50/50/33.3/33.3; the third seat is the
        // tied 50-quotient, which goes to "A" by id order.
        let allocation = dhondt_alloc(&input, 3);

        assert_eq!(allocation["A"], 2);
        assert_eq!(allocation["B"], 1);
    }

    #[test]
    fn zero_seats_yields_empty_allocation() {
        let input = votes(&[("A", dec!(100))]);

        let allocation = dhondt_alloc(&input, 0);

        assert_eq!(allocation["A"], 0);
    }
}
