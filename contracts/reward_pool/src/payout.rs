use crate::error::Error;

/// Fixed-point denominator for share arithmetic
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

/// Compute the redemption amount for one token.
///
/// Half the pool is distributed by mint order, half by burn order. Each half
/// uses arithmetic-progression shares: on the mint side rank 1 holds
/// `mint_ratio` shares and rank `total_issued` holds 1, interpolated
/// linearly; the burn side is inverted, rank 1 holds 1 share and rank
/// `total_issued` holds `burn_ratio`.
///
/// Formula per side: amount = shares(rank) × half / total_shares, with
/// shares scaled by `PRECISION` and a single terminal division. Per-rank
/// share truncation keeps the sum of shares at or below total_shares, so
/// the sum of all payouts never exceeds the pool.
///
/// # Errors
/// - `RankOutOfRange`: `total_issued == 0` or a rank outside
///   `[1, total_issued]`. Unreachable through the gated entrypoints.
/// - `InvalidAmount`: negative pool amount
/// - `Overflow`: checked arithmetic overflowed
pub fn payout_for(
    total_issued: u32,
    pool_amount: i128,
    mint_ratio: i128,
    burn_ratio: i128,
    mint_rank: u32,
    burn_rank: u32,
) -> Result<i128, Error> {
    if total_issued == 0
        || mint_rank == 0
        || burn_rank == 0
        || mint_rank > total_issued
        || burn_rank > total_issued
    {
        return Err(Error::RankOutOfRange);
    }

    if pool_amount < 0 {
        return Err(Error::InvalidAmount);
    }

    // With a single token there is no order to weight
    if total_issued == 1 {
        return Ok(pool_amount);
    }

    let mint_half = pool_amount / 2;
    // The burn side takes the odd unit, so the halves sum to the pool exactly
    let burn_half = pool_amount - mint_half;

    let n = i128::from(total_issued);

    let mint_shares = shares_for_mint(n, mint_ratio, i128::from(mint_rank))?;
    let mint_total = total_shares(n, mint_ratio)?;
    let mint_amount = side_amount(mint_shares, mint_half, mint_total)?;

    let burn_shares = shares_for_burn(n, burn_ratio, i128::from(burn_rank))?;
    let burn_total = total_shares(n, burn_ratio)?;
    let burn_amount = side_amount(burn_shares, burn_half, burn_total)?;

    mint_amount.checked_add(burn_amount).ok_or(Error::Overflow)
}

/// Total shares across all ranks of one side, scaled by PRECISION.
///
/// Sum of the arithmetic series from `ratio` down to 1 over `n` ranks:
/// n × (1 + ratio) / 2. PRECISION is even, so the division is exact.
fn total_shares(n: i128, ratio: i128) -> Result<i128, Error> {
    n.checked_mul(ratio.checked_add(1).ok_or(Error::Overflow)?)
        .and_then(|v| v.checked_mul(PRECISION))
        .map(|v| v / 2)
        .ok_or(Error::Overflow)
}

/// Shares for a mint rank: ratio at rank 1 falling linearly to 1 at rank n.
fn shares_for_mint(n: i128, ratio: i128, rank: i128) -> Result<i128, Error> {
    let slope = (n - rank)
        .checked_mul(ratio - 1)
        .and_then(|v| v.checked_mul(PRECISION))
        .ok_or(Error::Overflow)?
        / (n - 1);

    PRECISION.checked_add(slope).ok_or(Error::Overflow)
}

/// Shares for a burn rank: 1 at rank 1 rising linearly to ratio at rank n.
fn shares_for_burn(n: i128, ratio: i128, rank: i128) -> Result<i128, Error> {
    let slope = (rank - 1)
        .checked_mul(ratio - 1)
        .and_then(|v| v.checked_mul(PRECISION))
        .ok_or(Error::Overflow)?
        / (n - 1);

    PRECISION.checked_add(slope).ok_or(Error::Overflow)
}

fn side_amount(shares: i128, half: i128, total: i128) -> Result<i128, Error> {
    shares
        .checked_mul(half)
        .and_then(|v| v.checked_div(total))
        .ok_or(Error::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINT_RATIO: i128 = 4;
    const BURN_RATIO: i128 = 40;

    fn payout(total_issued: u32, pool: i128, mint_rank: u32, burn_rank: u32) -> i128 {
        payout_for(total_issued, pool, MINT_RATIO, BURN_RATIO, mint_rank, burn_rank).unwrap()
    }

    #[test]
    fn test_single_token_takes_whole_pool() {
        assert_eq!(payout(1, 300, 1, 1), 300);
        assert_eq!(payout(1, 0, 1, 1), 0);
        assert_eq!(payout(1, i128::MAX, 1, 1), i128::MAX);
    }

    #[test]
    fn test_three_token_scenario() {
        // 300 split: mint half 80/50/20, burn half 2/50/97 (floor)
        assert_eq!(payout(3, 300, 1, 3), 177);
        assert_eq!(payout(3, 300, 2, 2), 100);
        assert_eq!(payout(3, 300, 3, 1), 22);

        assert!(payout(3, 300, 1, 3) > payout(3, 300, 2, 2));
        assert!(payout(3, 300, 2, 2) > payout(3, 300, 3, 1));
    }

    #[test]
    fn test_three_token_permutations_conserve_pool() {
        let pool = 300i128;
        // every full assignment of burn ranks to the three mint ranks
        let permutations: [[u32; 3]; 6] = [
            [1, 2, 3],
            [1, 3, 2],
            [2, 1, 3],
            [2, 3, 1],
            [3, 1, 2],
            [3, 2, 1],
        ];

        for burn_ranks in permutations {
            let mut sum = 0i128;
            for (i, burn_rank) in burn_ranks.iter().enumerate() {
                sum += payout(3, pool, (i + 1) as u32, *burn_rank);
            }
            assert!(sum <= pool, "overpaid: {} > {}", sum, pool);
            assert!(sum >= pool - 6, "lost too much to rounding: {}", sum);
        }
    }

    #[test]
    fn test_conservation_across_sizes() {
        let pool = 1_000_000i128;
        for n in [2u32, 3, 5, 10, 50, 101] {
            let mut sum = 0i128;
            for rank in 1..=n {
                sum += payout(n, pool, rank, rank);
            }
            let tolerance = 2 * i128::from(n);
            assert!(sum <= pool, "n={}: overpaid {}", n, sum);
            assert!(sum >= pool - tolerance, "n={}: underpaid {}", n, sum);
        }
    }

    #[test]
    fn test_mint_rank_monotonicity() {
        let pool = 999_999i128;
        for n in [2u32, 7, 33] {
            for rank in 1..n {
                assert!(
                    payout(n, pool, rank, 1) >= payout(n, pool, rank + 1, 1),
                    "n={} mint rank {} paid less than rank {}",
                    n,
                    rank,
                    rank + 1
                );
            }
        }
    }

    #[test]
    fn test_burn_rank_monotonicity() {
        let pool = 999_999i128;
        for n in [2u32, 7, 33] {
            for rank in 1..n {
                assert!(
                    payout(n, pool, n, rank + 1) >= payout(n, pool, n, rank),
                    "n={} burn rank {} paid less than rank {}",
                    n,
                    rank + 1,
                    rank
                );
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let first = payout(17, 123_456_789, 5, 9);
        let second = payout(17, 123_456_789, 5, 9);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_out_of_range() {
        let cases = [
            (0u32, 1u32, 1u32),
            (3, 0, 1),
            (3, 1, 0),
            (3, 4, 1),
            (3, 1, 4),
        ];
        for (n, mint_rank, burn_rank) in cases {
            assert_eq!(
                payout_for(n, 300, MINT_RATIO, BURN_RATIO, mint_rank, burn_rank),
                Err(Error::RankOutOfRange)
            );
        }
    }

    #[test]
    fn test_negative_pool_rejected() {
        assert_eq!(
            payout_for(3, -1, MINT_RATIO, BURN_RATIO, 1, 1),
            Err(Error::InvalidAmount)
        );
    }

    #[test]
    fn test_extreme_pool_overflows_loudly() {
        assert_eq!(
            payout_for(2, i128::MAX - 1, MINT_RATIO, BURN_RATIO, 1, 1),
            Err(Error::Overflow)
        );
    }

    #[test]
    fn test_ratio_one_splits_evenly() {
        // ratio 1 means no order weighting on that side
        let per_token = payout_for(4, 400, 1, 1, 2, 3).unwrap();
        assert_eq!(per_token, 100);
        for mint_rank in 1..=4u32 {
            for burn_rank in 1..=4u32 {
                assert_eq!(payout_for(4, 400, 1, 1, mint_rank, burn_rank).unwrap(), 100);
            }
        }
    }
}
